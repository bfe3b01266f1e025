//! Tentacle layer: curved connectors from the hub to every visible marker,
//! redrawn in full from a `Scene` each frame.

use std::f64::consts::{FRAC_PI_2, PI};

use web_sys::CanvasRenderingContext2d;

use crate::sphere::{Scene, SphereConfig, SpherePosition};
use crate::theme::Palette;

const MARKER_STOPS: [f64; 3] = [0.25, 0.5, 0.75];
const CONTROL_BEND: f64 = 0.3;
const SELECTED_WIDTH: f64 = 5.0;
const GLOW_BLUR: f64 = 8.0;
const PARTICLE_RADIUS: f64 = 3.0;

/// The subset of an immediate-mode 2D context the tentacle layer needs.
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn circle(&mut self, x: f64, y: f64, radius: f64);
    fn set_stroke(&mut self, color: &str, width: f64);
    fn set_fill(&mut self, color: &str);
    fn set_shadow(&mut self, color: &str, blur: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
}

impl Surface for CanvasRenderingContext2d {
    fn clear(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }
    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        CanvasRenderingContext2d::quadratic_curve_to(self, cx, cy, x, y);
    }
    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        self.arc(x, y, radius, 0.0, PI * 2.0).ok();
    }
    fn set_stroke(&mut self, color: &str, width: f64) {
        self.set_stroke_style_str(color);
        self.set_line_width(width);
        self.set_line_cap("round");
    }
    fn set_fill(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }
    fn set_shadow(&mut self, color: &str, blur: f64) {
        self.set_shadow_color(color);
        self.set_shadow_blur(blur);
    }
    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }
    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }
}

/// Geometry of one connector: quadratic curve center → control → end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tentacle {
    pub index: usize,
    pub start: (f64, f64),
    pub control: (f64, f64),
    pub end: (f64, f64),
    pub opacity: f64,
    pub selected: bool,
}

impl Tentacle {
    pub fn new(center: (f64, f64), p: &SpherePosition) -> Self {
        let dx = p.screen_x - center.0;
        let dy = p.screen_y - center.1;
        let reach = (dx * dx + dy * dy).sqrt() * 0.5;
        let bend = dy.atan2(dx) + FRAC_PI_2 * CONTROL_BEND;
        Self {
            index: p.index,
            start: center,
            control: (center.0 + bend.cos() * reach, center.1 + bend.sin() * reach),
            end: (p.screen_x, p.screen_y),
            opacity: p.tentacle_opacity(),
            selected: p.selected,
        }
    }

    /// Point on the curve at parameter `t` in 0..=1.
    pub fn point_at(&self, t: f64) -> (f64, f64) {
        let u = 1.0 - t;
        (
            u * u * self.start.0 + 2.0 * u * t * self.control.0 + t * t * self.end.0,
            u * u * self.start.1 + 2.0 * u * t * self.control.1 + t * t * self.end.1,
        )
    }

    fn trace<S: Surface>(&self, surface: &mut S) {
        surface.begin_path();
        surface.move_to(self.start.0, self.start.1);
        surface.quadratic_curve_to(self.control.0, self.control.1, self.end.0, self.end.1);
    }
}

fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
    format!("rgba({}, {}, {}, {:.3})", r, g, b, alpha.clamp(0.0, 1.0))
}

/// Connectors worth drawing this frame: visible or selected, and not faded
/// below the opacity floor. The selected connector is last.
pub fn tentacles_for(scene: &Scene, config: &SphereConfig) -> Vec<Tentacle> {
    let center = (scene.center_x, scene.center_y);
    let mut out: Vec<Tentacle> = scene
        .positions
        .iter()
        .filter(|p| p.visible || p.selected)
        .map(|p| Tentacle::new(center, p))
        .filter(|t| t.selected || t.opacity >= config.tentacle_opacity_floor)
        .collect();
    out.sort_by_key(|t| t.selected);
    out
}

/// Parameters along the selected curve for the travelling particles.
pub fn particle_stops(horizontal_angle: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| ((horizontal_angle / 3.0 + i as f64 * 30.0) % 90.0) / 100.0)
        .collect()
}

/// Full redraw: curves, then marker dots, then particles on the selected curve.
pub fn draw_frame<S: Surface>(
    surface: &mut S,
    scene: &Scene,
    palette: &Palette,
    config: &SphereConfig,
    width: f64,
    height: f64,
) {
    surface.clear(width, height);
    let tentacles = tentacles_for(scene, config);

    for t in &tentacles {
        t.trace(surface);
        if t.selected {
            surface.set_stroke(palette.selected_stroke, SELECTED_WIDTH);
            surface.stroke();
            surface.set_shadow(palette.glow, GLOW_BLUR);
            surface.stroke();
            surface.set_shadow(palette.glow, 0.0);
        } else {
            let color = rgba(palette.stroke_rgb, t.opacity * palette.stroke_alpha);
            surface.set_stroke(&color, 2.0 + t.opacity * 2.0);
            surface.stroke();
        }
    }

    for t in &tentacles {
        let (color, radius) = if t.selected {
            (palette.selected_dot.to_string(), 3.0)
        } else {
            (rgba(palette.dot_rgb, t.opacity * palette.dot_alpha), 2.0)
        };
        surface.set_fill(&color);
        for stop in MARKER_STOPS {
            let (x, y) = t.point_at(stop);
            surface.begin_path();
            surface.circle(x, y, radius);
            surface.fill();
        }
    }

    if let Some(sel) = tentacles.iter().find(|t| t.selected) {
        surface.set_fill(palette.particle);
        for stop in particle_stops(scene.horizontal_angle, config.particle_count) {
            let (x, y) = sel.point_at(stop);
            surface.begin_path();
            surface.circle(x, y, PARTICLE_RADIUS);
            surface.fill();
        }
    }
}
