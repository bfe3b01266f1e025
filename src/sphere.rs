//! Sphere geometry: golden-angle placement, vertical tilt and perspective
//! projection. Everything here is pure so the canvas layer and the DOM layer
//! can share one `Scene` per frame.

use serde::{Deserialize, Serialize};

use crate::state::AnimationState;

/// Golden angle in degrees.
pub const GOLDEN_ANGLE_DEG: f64 = 137.5;

/// Tunables for the sphere. Defaults match the live site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub base_radius: f64,
    /// Below this container width the radius is multiplied by `narrow_scale`.
    pub narrow_breakpoint: f64,
    pub narrow_scale: f64,
    pub focal_length: f64,
    /// Items with rotated z at or below `fraction * radius` are hidden.
    pub visibility_depth_fraction: f64,
    pub tentacle_opacity_floor: f64,
    pub node_opacity_floor: f64,
    /// Horizontal degrees per 16ms of elapsed time.
    pub rotation_step: f64,
    pub vertical_factor: f64,
    pub min_frame_ms: f64,
    pub nudge_gain: f64,
    pub particle_count: usize,
    pub initial_vertical_angle: f64,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            base_radius: 220.0,
            narrow_breakpoint: 640.0,
            narrow_scale: 0.7,
            focal_length: 1400.0,
            visibility_depth_fraction: -0.8,
            tentacle_opacity_floor: 0.2,
            node_opacity_floor: 0.4,
            rotation_step: 0.8,
            vertical_factor: 0.15,
            min_frame_ms: 16.0,
            nudge_gain: 0.5,
            particle_count: 3,
            initial_vertical_angle: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpherePosition {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale: f64,
    pub visible: bool,
    pub selected: bool,
    /// Sphere radius the point was laid out with; depth helpers are relative to it.
    pub radius: f64,
}

impl SpherePosition {
    fn depth_ratio(&self) -> f64 {
        if self.radius <= 0.0 {
            return 1.0;
        }
        (self.z + self.radius) / self.radius
    }

    pub fn tentacle_opacity(&self) -> f64 {
        if self.selected { 1.0 } else { self.depth_ratio().clamp(0.0, 1.0) }
    }

    pub fn node_opacity(&self, floor: f64) -> f64 {
        if self.selected { 1.0 } else { self.depth_ratio().clamp(floor, 1.0) }
    }

    /// CSS z-index; the selected marker always sits on top.
    pub fn stacking_order(&self) -> i32 {
        if self.selected {
            SELECTED_STACKING
        } else {
            (self.z + 100.0).round() as i32
        }
    }

    pub fn blur_px(&self) -> f64 {
        if self.z < 0.0 && !self.selected { (self.z / 800.0).abs() } else { 0.0 }
    }

    pub fn size_scale(&self) -> f64 {
        if self.selected { 1.3 } else { (self.scale * 1.1).clamp(0.9, 1.2) }
    }

    /// Offset from the surface center, as the DOM layer positions markers.
    pub fn offset_from(&self, center_x: f64, center_y: f64) -> (f64, f64) {
        (self.screen_x - center_x, self.screen_y - center_y)
    }
}

const SELECTED_STACKING: i32 = 10_000;

/// One frame's worth of projected positions, shared by both render layers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub horizontal_angle: f64,
    pub vertical_angle: f64,
    pub selected: Option<usize>,
    pub positions: Vec<SpherePosition>,
}

impl Scene {
    pub fn position(&self, index: usize) -> Option<&SpherePosition> {
        self.positions.get(index)
    }
}

pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unrotated point for item `index` of `count`: `(x, y, z)`.
pub fn base_point(index: usize, count: usize, horizontal_angle: f64, radius: f64) -> (f64, f64, f64) {
    let y = if count <= 1 {
        0.0
    } else {
        1.0 - (2.0 * index as f64) / (count - 1) as f64
    };
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let angle = wrap_degrees(index as f64 * GOLDEN_ANGLE_DEG + horizontal_angle).to_radians();
    (
        radius * ring * angle.cos(),
        radius * y,
        radius * ring * angle.sin(),
    )
}

/// Tilt around the horizontal axis.
pub fn rotate_vertical(y: f64, z: f64, vertical_angle: f64) -> (f64, f64) {
    let (sin, cos) = vertical_angle.to_radians().sin_cos();
    (y * cos - z * sin, y * sin + z * cos)
}

/// Perspective divide: `(screen_x, screen_y, scale)`.
pub fn project(x: f64, y: f64, z: f64, center_x: f64, center_y: f64, focal_length: f64) -> (f64, f64, f64) {
    let denom = focal_length + z;
    let scale = if denom.abs() < f64::EPSILON { 1.0 } else { focal_length / denom };
    (center_x + x * scale, center_y + y * scale, scale)
}

pub fn radius_for_width(width: f64, config: &SphereConfig) -> f64 {
    if width < config.narrow_breakpoint {
        config.base_radius * config.narrow_scale
    } else {
        config.base_radius
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Viewport {
    pub fn for_surface(width: f64, height: f64, config: &SphereConfig) -> Self {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        Self {
            center_x: width / 2.0,
            center_y: height / 2.0,
            radius: radius_for_width(width, config),
        }
    }
}

pub fn position_for(
    index: usize,
    count: usize,
    horizontal_angle: f64,
    vertical_angle: f64,
    selected: Option<usize>,
    viewport: Viewport,
    config: &SphereConfig,
) -> SpherePosition {
    let radius = viewport.radius;
    let (x, y_base, z_base) = base_point(index, count, horizontal_angle, radius);
    let (y, z) = rotate_vertical(y_base, z_base, vertical_angle);
    let (screen_x, screen_y, scale) =
        project(x, y, z, viewport.center_x, viewport.center_y, config.focal_length);
    let is_selected = selected == Some(index);
    SpherePosition {
        index,
        x,
        y,
        z,
        screen_x,
        screen_y,
        scale,
        visible: z > radius * config.visibility_depth_fraction || is_selected,
        selected: is_selected,
        radius,
    }
}

/// Lay out `count` items for the given animation state on a `width`×`height` surface.
pub fn layout_scene(count: usize, state: &AnimationState, width: f64, height: f64, config: &SphereConfig) -> Scene {
    let viewport = Viewport::for_surface(width, height, config);
    let selected = state.selected.filter(|&i| i < count);
    let positions = (0..count)
        .map(|i| {
            position_for(
                i,
                count,
                state.horizontal_angle,
                state.vertical_angle,
                selected,
                viewport,
                config,
            )
        })
        .collect();
    Scene {
        center_x: viewport.center_x,
        center_y: viewport.center_y,
        radius: viewport.radius,
        horizontal_angle: state.horizontal_angle,
        vertical_angle: state.vertical_angle,
        selected,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn norm(x: f64, y: f64, z: f64) -> f64 {
        (x * x + y * y + z * z).sqrt()
    }

    #[test]
    fn points_lie_on_the_sphere() {
        for count in 1..=12 {
            for index in 0..count {
                for h in [0.0, 45.0, 137.5, 359.0] {
                    let (x, y, z) = base_point(index, count, h, 100.0);
                    assert!((norm(x, y, z) - 100.0).abs() < 1e-6, "count={count} index={index}");
                    for v in [0.0, 20.0, 200.0] {
                        let (ry, rz) = rotate_vertical(y, z, v);
                        assert!((norm(x, ry, rz) - 100.0).abs() < 1e-6);
                    }
                }
            }
        }
    }

    #[test]
    fn middle_of_three_sits_on_the_equator() {
        let (x, y, z) = base_point(1, 3, 0.0, 100.0);
        assert!(y.abs() < EPS);
        let angle = z.atan2(x).to_degrees();
        assert!((angle - 137.5).abs() < 1e-9);
        assert!((norm(x, y, z) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn first_and_last_are_the_poles() {
        let (_, top, _) = base_point(0, 5, 30.0, 50.0);
        let (_, bottom, _) = base_point(4, 5, 30.0, 50.0);
        assert!((top - 50.0).abs() < EPS);
        assert!((bottom + 50.0).abs() < EPS);
    }

    #[test]
    fn single_item_does_not_divide_by_zero() {
        let (x, y, z) = base_point(0, 1, 0.0, 80.0);
        assert_eq!(y, 0.0);
        assert!((x - 80.0).abs() < EPS);
        assert!(z.abs() < EPS);
    }

    #[test]
    fn layout_is_deterministic() {
        let config = SphereConfig::default();
        let mut state = AnimationState::new(&config);
        state.horizontal_angle = 211.3;
        state.vertical_angle = 47.9;
        state.selected = Some(3);
        let a = layout_scene(10, &state, 750.0, 550.0, &config);
        let b = layout_scene(10, &state, 750.0, 550.0, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn projection_is_centered_and_scaled() {
        let (sx, sy, scale) = project(0.0, 0.0, 0.0, 375.0, 275.0, 1400.0);
        assert_eq!((sx, sy, scale), (375.0, 275.0, 1.0));
        let (sx, _, scale) = project(100.0, 0.0, 1400.0, 0.0, 0.0, 1400.0);
        assert!((scale - 0.5).abs() < EPS);
        assert!((sx - 50.0).abs() < EPS);
    }

    #[test]
    fn radius_shrinks_on_narrow_viewports() {
        let config = SphereConfig::default();
        assert_eq!(radius_for_width(750.0, &config), 220.0);
        assert!((radius_for_width(375.0, &config) - 154.0).abs() < EPS);
    }

    #[test]
    fn selection_forces_visibility() {
        let config = SphereConfig::default();
        let mut state = AnimationState::new(&config);
        let hidden = (0..360)
            .map(|h| h as f64)
            .find_map(|h| {
                state.horizontal_angle = h;
                let scene = layout_scene(10, &state, 750.0, 550.0, &config);
                scene.positions.iter().find(|p| !p.visible).map(|p| (h, p.index))
            })
            .expect("some item should be behind the sphere");
        state.horizontal_angle = hidden.0;
        state.selected = Some(hidden.1);
        let scene = layout_scene(10, &state, 750.0, 550.0, &config);
        let p = scene.position(hidden.1).unwrap();
        assert!(p.visible);
        assert!(p.selected);
        assert_eq!(p.tentacle_opacity(), 1.0);
        assert!(scene.positions.iter().all(|q| q.stacking_order() < p.stacking_order() || q.index == p.index));
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let config = SphereConfig::default();
        let mut state = AnimationState::new(&config);
        state.selected = Some(42);
        let scene = layout_scene(3, &state, 400.0, 400.0, &config);
        assert_eq!(scene.selected, None);
        assert!(scene.positions.iter().all(|p| !p.selected));
    }

    #[test]
    fn zero_sized_surface_is_centered_at_origin() {
        let config = SphereConfig::default();
        let state = AnimationState::new(&config);
        let scene = layout_scene(4, &state, 0.0, 0.0, &config);
        assert_eq!((scene.center_x, scene.center_y), (0.0, 0.0));
        assert!(scene.positions.iter().all(|p| p.screen_x.is_finite() && p.screen_y.is_finite()));
    }

    #[test]
    fn depth_helpers_follow_z() {
        let near = SpherePosition {
            index: 0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            screen_x: 0.0,
            screen_y: 0.0,
            scale: 1.0,
            visible: true,
            selected: false,
            radius: 100.0,
        };
        let far = SpherePosition { z: -70.0, ..near };
        assert_eq!(near.tentacle_opacity(), 1.0);
        assert!((far.tentacle_opacity() - 0.3).abs() < EPS);
        assert_eq!(far.node_opacity(0.4), 0.4);
        assert!(far.blur_px() > 0.0);
        assert_eq!(near.blur_px(), 0.0);
        assert!((near.size_scale() - 1.1).abs() < EPS);
    }

    #[test]
    fn wrap_handles_negative_and_large_angles() {
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(-10.0), 350.0);
        assert!(wrap_degrees(-1e-20) < 360.0);
    }
}
