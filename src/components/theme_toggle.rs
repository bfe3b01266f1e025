use crate::theme::ThemeContext;
use yew::prelude::*;

#[function_component(ThemeToggle)]
pub fn theme_toggle() -> Html {
    let Some(ctx) = use_context::<ThemeContext>() else {
        return html! {};
    };
    let label = if ctx.theme.is_dark() { "☀ Light" } else { "☾ Dark" };
    let onclick = {
        let toggle = ctx.toggle.clone();
        Callback::from(move |_: MouseEvent| toggle.emit(()))
    };
    html! {
        <button {onclick} style="padding:4px 10px; font-size:12px; border-radius:8px; cursor:pointer;">{ label }</button>
    }
}
