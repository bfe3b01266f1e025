use super::{skill_sphere::SkillSphere, theme_toggle::ThemeToggle};
use crate::model::default_skills;
use crate::sphere::SphereConfig;
use crate::theme::{initial_theme, persist_theme, ThemeContext};
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let theme = use_state(initial_theme);
    let skills = use_memo((), |_| default_skills());

    // Persist theme changes
    {
        use_effect_with(*theme, move |theme| {
            persist_theme(*theme);
            || ()
        });
    }

    let toggle = {
        let theme = theme.clone();
        Callback::from(move |_: ()| theme.set(theme.toggled()))
    };
    let theme_ctx = ThemeContext {
        theme: *theme,
        toggle,
    };

    let (page_bg, text, muted) = if theme.is_dark() {
        ("#0f172a", "#f1f5f9", "#94a3b8")
    } else {
        ("#f8fafc", "#0f172a", "#475569")
    };

    html! {
        <ContextProvider<ThemeContext> context={theme_ctx}>
            <div style={format!("min-height:100vh; background:{}; color:{}; font-family:system-ui, sans-serif; transition:background 0.3s;", page_bg, text)}>
                <div style="display:flex; justify-content:flex-end; padding:12px 16px;">
                    <ThemeToggle />
                </div>
                <section id="skills" style="padding:48px 16px;">
                    <div style="text-align:center; margin-bottom:24px;">
                        <span style={format!("font-size:13px; font-weight:500; color:{};", muted)}>{"My Skills"}</span>
                        <h2 style="margin:8px 0 0 0; font-size:32px;">{"What I Know"}</h2>
                    </div>
                    <SkillSphere skills={(*skills).clone()} config={SphereConfig::default()} />
                </section>
            </div>
        </ContextProvider<ThemeContext>>
    }
}
