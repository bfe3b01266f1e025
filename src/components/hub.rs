use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HubProps {
    pub dark: bool,
}

/// Static center badge the tentacles grow from.
#[function_component(Hub)]
pub fn hub(props: &HubProps) -> Html {
    let bg = if props.dark { "#2563eb" } else { "#3b82f6" };
    html! {
        <div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; z-index:40; pointer-events:none;">
            <div style={format!("width:80px; height:80px; border-radius:50%; background:{}; display:flex; flex-direction:column; align-items:center; justify-content:center; box-shadow:0 10px 15px rgba(0,0,0,0.2);", bg)}>
                <svg xmlns="http://www.w3.org/2000/svg" width="22" height="22" viewBox="0 0 24 24" fill="none" stroke="white" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                    <path d="M3 22v-3.92a2.52 2.52 0 0 1 .52-1.55l5-6.08a2.5 2.5 0 0 1 4 .1l4.5 6a2.51 2.51 0 0 1 .5 1.5V22"></path>
                    <path d="M2 13h2"></path>
                    <path d="M20 13h2"></path>
                    <path d="M14 2v2"></path>
                    <path d="M10 2v2"></path>
                    <path d="m10 12 4 10"></path>
                    <path d="m14 12-4 10"></path>
                </svg>
                <span style="font-size:12px; font-weight:600; color:#fff; margin-top:4px;">{"My Toolkit"}</span>
            </div>
        </div>
    }
}
