pub mod app;
pub mod hub;
pub mod skill_node;
pub mod skill_sphere;
pub mod theme_toggle;

pub use app::App;
