use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlImageElement, TouchEvent};
use yew::prelude::*;

use super::{hub::Hub, skill_node::SkillNode};
use crate::icons::{icon_url, PreloadTracker};
use crate::model::{display_skills, SkillItem};
use crate::sphere::{layout_scene, Scene, SphereConfig};
use crate::state::{pointer_direction, AnimationAction, AnimationState, TouchState};
use crate::tentacles::draw_frame;
use crate::theme::ThemeContext;
use crate::util::{clog, now_ms};

#[derive(Properties, PartialEq, Clone)]
pub struct SkillSphereProps {
    pub skills: Vec<SkillItem>,
    #[prop_or_default]
    pub config: SphereConfig,
}

/// Normalized pointer offset from the element's center.
fn direction_in(el: &HtmlElement, client_x: f64, client_y: f64) -> (f64, f64) {
    let rect = el.get_bounding_client_rect();
    pointer_direction(client_x - rect.left(), client_y - rect.top(), rect.width(), rect.height())
}

#[function_component(SkillSphere)]
pub fn skill_sphere(props: &SkillSphereProps) -> Html {
    let container_ref = use_node_ref();
    let canvas_ref = use_node_ref();
    let shown = use_memo(props.skills.clone(), |skills| display_skills(skills));
    let anim = use_mut_ref(|| AnimationState::new(&props.config));
    let scene = use_state(Scene::default);
    let icons_ready = use_state(|| false);
    let touch_state = use_mut_ref(TouchState::default);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let theme = use_context::<ThemeContext>().map(|c| c.theme).unwrap_or_default();
    let palette_ref = use_mut_ref(|| theme.palette());
    let count_ref = use_mut_ref(|| shown.len());
    // Read by the frame loop and listeners, so prop changes reach them
    let config_ref = use_mut_ref(|| props.config.clone());

    // New tunables take effect on the next frame and redraw now
    {
        let config_ref = config_ref.clone();
        let draw_ref = draw_ref.clone();
        use_effect_with(props.config.clone(), move |config| {
            *config_ref.borrow_mut() = config.clone();
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }
    // Theme switch: swap palette and redraw even when the loop is paused
    {
        let palette_ref = palette_ref.clone();
        let draw_ref = draw_ref.clone();
        use_effect_with(theme, move |theme| {
            *palette_ref.borrow_mut() = theme.palette();
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }
    // Skill list change: new item count for the layout
    {
        let count_ref = count_ref.clone();
        let draw_ref = draw_ref.clone();
        use_effect_with(shown.len(), move |count| {
            *count_ref.borrow_mut() = *count;
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }
    // Preload every logo; markers appear once all have loaded or failed
    {
        let icons_ready = icons_ready.clone();
        use_effect_with(shown.clone(), move |skills| {
            icons_ready.set(false);
            let tracker = Rc::new(RefCell::new(PreloadTracker::new(skills.len())));
            if tracker.borrow_mut().take_completion() {
                icons_ready.set(true);
            }
            let mut pending: Vec<(HtmlImageElement, Closure<dyn FnMut()>)> = Vec::new();
            for skill in skills.iter() {
                let settle = {
                    let tracker = tracker.clone();
                    let icons_ready = icons_ready.clone();
                    move || {
                        if tracker.borrow_mut().settle() {
                            clog("skill icons settled");
                            icons_ready.set(true);
                        }
                    }
                };
                let Ok(img) = HtmlImageElement::new() else {
                    settle();
                    continue;
                };
                let cb = Closure::wrap(Box::new(settle) as Box<dyn FnMut()>);
                img.set_onload(Some(cb.as_ref().unchecked_ref()));
                img.set_onerror(Some(cb.as_ref().unchecked_ref()));
                img.set_src(&icon_url(&skill.name));
                pending.push((img, cb));
            }
            move || {
                for (img, _cb) in &pending {
                    img.set_onload(None);
                    img.set_onerror(None);
                }
            }
        });
    }
    // Mount: canvas sizing, frame loop, visibility and touch listeners
    {
        let container_ref = container_ref.clone();
        let canvas_ref = canvas_ref.clone();
        let anim = anim.clone();
        let scene = scene.clone();
        let draw_ref = draw_ref.clone();
        let palette_ref = palette_ref.clone();
        let count_ref = count_ref.clone();
        let config_ref = config_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let document = window.document().expect("document");
            let canvas: HtmlCanvasElement = canvas_ref.cast::<HtmlCanvasElement>().expect("canvas");
            let container: HtmlElement = container_ref.cast::<HtmlElement>().expect("container");

            let fit_canvas = {
                let canvas = canvas.clone();
                let container = container.clone();
                move || {
                    canvas.set_width(container.offset_width().max(0) as u32);
                    canvas.set_height(container.offset_height().max(0) as u32);
                }
            };
            fit_canvas();

            // One scene per redraw, painted on the canvas and handed to the markers
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let config_ref = config_ref.clone();
                let anim = anim.clone();
                let scene = scene.clone();
                let palette_ref = palette_ref.clone();
                let count_ref = count_ref.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let mut ctx = match canvas.get_context("2d").ok().flatten() {
                        Some(c) => match c.dyn_into::<CanvasRenderingContext2d>() {
                            Ok(ctx) => ctx,
                            Err(_) => return,
                        },
                        None => return,
                    };
                    let w = canvas.width() as f64;
                    let h = canvas.height() as f64;
                    let config = config_ref.borrow();
                    let frame = layout_scene(*count_ref.borrow(), &anim.borrow(), w, h, &config);
                    draw_frame(&mut ctx, &frame, &palette_ref.borrow(), &config, w, h);
                    scene.set(frame);
                })
            };
            *draw_ref.borrow_mut() = Some(draw_closure.clone());
            (draw_closure)();

            // Frame loop
            let raf_id: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
            let frame_cb: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
            let schedule: Rc<dyn Fn()> = {
                let window = window.clone();
                let raf_id = raf_id.clone();
                let frame_cb = frame_cb.clone();
                Rc::new(move || {
                    if raf_id.borrow().is_some() {
                        return;
                    }
                    if let Some(cb) = frame_cb.borrow().as_ref() {
                        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                            *raf_id.borrow_mut() = Some(id);
                        }
                    }
                })
            };
            {
                let raf_id = raf_id.clone();
                let schedule = schedule.clone();
                let anim = anim.clone();
                let config_ref = config_ref.clone();
                let draw = draw_closure.clone();
                *frame_cb.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
                    *raf_id.borrow_mut() = None;
                    let (next, advanced) = anim.borrow().frame(now, &config_ref.borrow());
                    let running = next.is_running();
                    *anim.borrow_mut() = next;
                    if advanced {
                        draw();
                    }
                    if running {
                        schedule();
                    }
                }) as Box<dyn FnMut(f64)>));
            }
            schedule();

            // Pause while the tab is hidden; rebase the clock on return
            let visibility_cb = {
                let document = document.clone();
                let window = window.clone();
                let raf_id = raf_id.clone();
                let schedule = schedule.clone();
                let anim = anim.clone();
                let config_ref = config_ref.clone();
                Closure::wrap(Box::new(move || {
                    let config = config_ref.borrow().clone();
                    if document.hidden() {
                        let next = anim.borrow().apply(AnimationAction::Pause, &config);
                        *anim.borrow_mut() = next;
                        if let Some(id) = raf_id.borrow_mut().take() {
                            let _ = window.cancel_animation_frame(id);
                        }
                        clog("skill sphere paused");
                    } else {
                        let next = anim
                            .borrow()
                            .apply(AnimationAction::Resume { now_ms: now_ms() }, &config);
                        *anim.borrow_mut() = next;
                        schedule();
                        clog("skill sphere resumed");
                    }
                }) as Box<dyn FnMut()>)
            };
            document
                .add_event_listener_with_callback("visibilitychange", visibility_cb.as_ref().unchecked_ref())
                .ok();

            let resize_cb = {
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move || {
                    fit_canvas();
                    draw();
                }) as Box<dyn FnMut()>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();

            // Registered by hand so preventDefault can stop page scrolling
            let touch_move_cb = {
                let container = container.clone();
                let anim = anim.clone();
                let config_ref = config_ref.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    let Some(t0) = e.touches().item(0) else {
                        return;
                    };
                    let (dir_x, dir_y) = direction_in(&container, t0.client_x() as f64, t0.client_y() as f64);
                    let next = anim
                        .borrow()
                        .apply(AnimationAction::Nudge { dir_x, dir_y }, &config_ref.borrow());
                    *anim.borrow_mut() = next;
                }) as Box<dyn FnMut(TouchEvent)>)
            };
            container
                .add_event_listener_with_callback("touchmove", touch_move_cb.as_ref().unchecked_ref())
                .ok();

            // Cleanup
            move || {
                let _ = document.remove_event_listener_with_callback(
                    "visibilitychange",
                    visibility_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                let _ = container.remove_event_listener_with_callback(
                    "touchmove",
                    touch_move_cb.as_ref().unchecked_ref(),
                );
                if let Some(id) = raf_id.borrow_mut().take() {
                    let _ = window.cancel_animation_frame(id);
                }
                let next = anim.borrow().pause();
                *anim.borrow_mut() = next;
                // breaks the frame closure <-> schedule cycle
                frame_cb.borrow_mut().take();
                *draw_ref.borrow_mut() = None;
            }
        });
    }

    let on_select = {
        let anim = anim.clone();
        let draw_ref = draw_ref.clone();
        let config_ref = config_ref.clone();
        Callback::from(move |sel: Option<usize>| {
            let next = anim.borrow().apply(AnimationAction::Select(sel), &config_ref.borrow());
            *anim.borrow_mut() = next;
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
        })
    };
    let on_hover = {
        let touch_state = touch_state.clone();
        let on_select = on_select.clone();
        Callback::from(move |sel: Option<usize>| {
            if touch_state.borrow().accepts_hover(now_ms()) {
                on_select.emit(sel);
            }
        })
    };
    let on_touch_start = {
        let touch_state = touch_state.clone();
        let on_select = on_select.clone();
        Callback::from(move |index: usize| {
            touch_state.borrow_mut().begin(Some(index));
            on_select.emit(Some(index));
        })
    };
    let container_touch_start = {
        let touch_state = touch_state.clone();
        Callback::from(move |_: TouchEvent| touch_state.borrow_mut().begin(None))
    };
    let container_touch_end = {
        let touch_state = touch_state.clone();
        let on_select = on_select.clone();
        Callback::from(move |_: TouchEvent| {
            let released = touch_state.borrow_mut().end(now_ms());
            if released.is_some() {
                on_select.emit(None);
            }
        })
    };
    let on_mouse_move = {
        let container_ref = container_ref.clone();
        let anim = anim.clone();
        let config_ref = config_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(container) = container_ref.cast::<HtmlElement>() else {
                return;
            };
            let (dir_x, dir_y) = direction_in(&container, e.client_x() as f64, e.client_y() as f64);
            let next = anim
                .borrow()
                .apply(AnimationAction::Nudge { dir_x, dir_y }, &config_ref.borrow());
            *anim.borrow_mut() = next;
        })
    };

    let dark = theme.is_dark();
    let markers = if *icons_ready {
        shown
            .iter()
            .enumerate()
            .filter_map(|(i, skill)| {
                let p = *scene.position(i)?;
                if !p.visible {
                    return None;
                }
                Some(html! {
                    <SkillNode
                        key={skill.name.clone()}
                        skill={skill.clone()}
                        position={p}
                        offset={p.offset_from(scene.center_x, scene.center_y)}
                        opacity_floor={props.config.node_opacity_floor}
                        dark={dark}
                        on_select={on_select.clone()}
                        on_hover={on_hover.clone()}
                        on_touch_start={on_touch_start.clone()}
                    />
                })
            })
            .collect::<Html>()
    } else {
        html! {}
    };

    html! {
        <div
            ref={container_ref}
            style="position:relative; height:550px; width:100%; max-width:750px; margin:0 auto; touch-action:none;"
            onmousemove={on_mouse_move}
            ontouchstart={container_touch_start}
            ontouchend={container_touch_end.clone()}
            ontouchcancel={container_touch_end}
        >
            <canvas
                ref={canvas_ref}
                width="750"
                height="550"
                style="position:absolute; inset:0; width:100%; height:100%;"
            />
            { markers }
            <Hub dark={dark} />
        </div>
    }
}
