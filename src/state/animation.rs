// Rotation state for the skill sphere, advanced by the animation-frame loop.
use crate::sphere::{wrap_degrees, SphereConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverPhase {
    Running,
    Paused,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    /// Degrees, always in [0, 360).
    pub horizontal_angle: f64,
    /// Degrees, always in [0, 360).
    pub vertical_angle: f64,
    pub phase: DriverPhase,
    pub selected: Option<usize>,
    /// Timestamp of the last frame that advanced the angles.
    pub last_frame_ms: Option<f64>,
}

#[derive(Clone, Debug)]
pub enum AnimationAction {
    Pause,
    Resume { now_ms: f64 },
    /// Pointer offset from the container center, each axis in -1..=1.
    Nudge { dir_x: f64, dir_y: f64 },
    Select(Option<usize>),
}

impl AnimationState {
    pub fn new(config: &SphereConfig) -> Self {
        Self {
            horizontal_angle: 0.0,
            vertical_angle: wrap_degrees(config.initial_vertical_angle),
            phase: DriverPhase::Running,
            selected: None,
            last_frame_ms: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == DriverPhase::Running
    }

    /// Advance by `elapsed_ms` of wall time. Short or paused frames are no-ops.
    pub fn tick(&self, elapsed_ms: f64, config: &SphereConfig) -> Self {
        let mut next = self.clone();
        if !self.is_running() || !(elapsed_ms > config.min_frame_ms) {
            return next;
        }
        let step = config.rotation_step * (elapsed_ms / 16.0);
        next.horizontal_angle = wrap_degrees(self.horizontal_angle + step);
        next.vertical_angle = wrap_degrees(self.vertical_angle + step * config.vertical_factor);
        next
    }

    /// Frame callback: returns the next state and whether the angles moved.
    /// The first frame after mount only records the baseline.
    pub fn frame(&self, now_ms: f64, config: &SphereConfig) -> (Self, bool) {
        let Some(last) = self.last_frame_ms else {
            let mut next = self.clone();
            next.last_frame_ms = Some(now_ms);
            return (next, false);
        };
        let elapsed = now_ms - last;
        let mut next = self.tick(elapsed, config);
        let advanced = next.horizontal_angle != self.horizontal_angle
            || next.vertical_angle != self.vertical_angle;
        if advanced {
            next.last_frame_ms = Some(now_ms);
        }
        (next, advanced)
    }

    pub fn pause(&self) -> Self {
        Self { phase: DriverPhase::Paused, ..self.clone() }
    }

    /// Resume and rebase the clock so the next delta is small.
    pub fn resume(&self, now_ms: f64) -> Self {
        Self {
            phase: DriverPhase::Running,
            last_frame_ms: Some(now_ms),
            ..self.clone()
        }
    }

    /// Pointer drift, composed with the automatic rotation.
    pub fn nudge(&self, dir_x: f64, dir_y: f64, config: &SphereConfig) -> Self {
        if !self.is_running() || !dir_x.is_finite() || !dir_y.is_finite() {
            return self.clone();
        }
        Self {
            horizontal_angle: wrap_degrees(self.horizontal_angle + dir_x * config.nudge_gain),
            vertical_angle: wrap_degrees(self.vertical_angle + dir_y * config.nudge_gain),
            ..self.clone()
        }
    }

    pub fn select(&self, selected: Option<usize>) -> Self {
        Self { selected, ..self.clone() }
    }

    pub fn apply(&self, action: AnimationAction, config: &SphereConfig) -> Self {
        use AnimationAction::*;
        match action {
            Pause => self.pause(),
            Resume { now_ms } => self.resume(now_ms),
            Nudge { dir_x, dir_y } => self.nudge(dir_x, dir_y, config),
            Select(sel) => self.select(sel),
        }
    }
}

/// Pointer position relative to a `width`×`height` box, normalized to -1..=1 per axis.
pub fn pointer_direction(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    let cx = width / 2.0;
    let cy = height / 2.0;
    if cx <= 0.0 || cy <= 0.0 {
        return (0.0, 0.0);
    }
    ((x - cx) / cx, (y - cy) / cy)
}
