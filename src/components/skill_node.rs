use crate::icons::{icon_url, PLACEHOLDER_ICON};
use crate::model::SkillItem;
use crate::sphere::SpherePosition;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SkillNodeProps {
    pub skill: SkillItem,
    pub position: SpherePosition,
    /// Marker offset from the container center, in px.
    pub offset: (f64, f64),
    pub opacity_floor: f64,
    pub dark: bool,
    /// Keyboard focus and blur.
    pub on_select: Callback<Option<usize>>,
    /// Mouse enter and leave; the sphere drops these while a tap is replayed.
    pub on_hover: Callback<Option<usize>>,
    pub on_touch_start: Callback<usize>,
}

#[function_component(SkillNode)]
pub fn skill_node(props: &SkillNodeProps) -> Html {
    // Swapped to the placeholder after the first load error; same 48px box.
    let icon_failed = use_state(|| false);
    let p = props.position;
    let index = p.index;
    let selected = p.selected;

    let select_cb = {
        let cb = props.on_hover.clone();
        Callback::from(move |_: MouseEvent| cb.emit(Some(index)))
    };
    let clear_cb = {
        let cb = props.on_hover.clone();
        Callback::from(move |_: MouseEvent| cb.emit(None))
    };
    let focus_cb = {
        let cb = props.on_select.clone();
        Callback::from(move |_: FocusEvent| cb.emit(Some(index)))
    };
    let blur_cb = {
        let cb = props.on_select.clone();
        Callback::from(move |_: FocusEvent| cb.emit(None))
    };
    let touch_cb = {
        let cb = props.on_touch_start.clone();
        Callback::from(move |_: TouchEvent| cb.emit(index))
    };
    let error_cb = {
        let icon_failed = icon_failed.clone();
        Callback::from(move |_: Event| {
            if !*icon_failed {
                icon_failed.set(true);
            }
        })
    };

    let src = if *icon_failed {
        PLACEHOLDER_ICON.to_string()
    } else {
        icon_url(&props.skill.name)
    };
    let blur = p.blur_px();
    let filter = if blur > 0.0 { format!("blur({:.2}px)", blur) } else { "none".to_string() };
    let wrapper_style = format!(
        "position:absolute; top:50%; left:50%; display:flex; flex-direction:column; align-items:center; \
         transform:translate(calc(-50% + {:.2}px), calc(-50% + {:.2}px)); z-index:{}; opacity:{:.3}; \
         filter:{}; transition:opacity 0.2s ease-out, filter 0.2s ease-out; cursor:pointer; outline:none;",
        props.offset.0,
        props.offset.1,
        p.stacking_order(),
        p.node_opacity(props.opacity_floor),
        filter,
    );
    let (disc_bg, disc_border, shadow) = match (selected, props.dark) {
        (true, true) => ("rgba(30,41,59,0.95)", "#3b82f6", "0 10px 15px rgba(96,165,250,0.5)"),
        (true, false) => ("rgba(255,255,255,0.95)", "#3b82f6", "0 10px 15px rgba(59,130,246,0.4)"),
        (false, true) => ("rgba(30,41,59,0.95)", "#475569", "0 4px 6px rgba(0,0,0,0.3)"),
        (false, false) => ("rgba(255,255,255,0.95)", "#e2e8f0", "0 4px 6px rgba(0,0,0,0.1)"),
    };
    let disc_style = format!(
        "width:72px; height:72px; box-sizing:border-box; border-radius:50%; padding:10px; background:{}; \
         border:4px solid {}; box-shadow:{}; display:flex; align-items:center; justify-content:center; \
         transform:scale({:.3}); transition:transform 0.2s ease-out, box-shadow 0.3s ease;",
        disc_bg,
        disc_border,
        shadow,
        p.size_scale(),
    );
    let label_style = if selected {
        "margin-top:6px; font-size:12px; font-weight:600; padding:4px 12px; border-radius:9999px; background:#3b82f6; color:#fff; max-width:100px; overflow:hidden; text-overflow:ellipsis; white-space:nowrap;"
    } else if props.dark {
        "margin-top:6px; font-size:12px; font-weight:600; padding:4px 12px; border-radius:9999px; background:rgba(30,41,59,0.95); color:#fff; border:1px solid #475569; max-width:100px; overflow:hidden; text-overflow:ellipsis; white-space:nowrap;"
    } else {
        "margin-top:6px; font-size:12px; font-weight:600; padding:4px 12px; border-radius:9999px; background:rgba(255,255,255,0.95); color:#1e293b; border:1px solid #cbd5e1; max-width:100px; overflow:hidden; text-overflow:ellipsis; white-space:nowrap;"
    };

    html! {
        <div
            class="skill-node"
            style={wrapper_style}
            tabindex="0"
            aria-label={props.skill.name.clone()}
            onmouseenter={select_cb}
            onmouseleave={clear_cb}
            onfocus={focus_cb}
            onblur={blur_cb}
            ontouchstart={touch_cb}
        >
            <div style={disc_style}>
                <img
                    src={src}
                    alt={props.skill.name.clone()}
                    width="48"
                    height="48"
                    style="width:48px; height:48px; object-fit:contain;"
                    onerror={error_cb}
                />
            </div>
            <span style={label_style}>{ props.skill.name.clone() }</span>
        </div>
    }
}
