pub mod animation;
pub mod touch;

pub use animation::{pointer_direction, AnimationAction, AnimationState};
pub use touch::TouchState;
