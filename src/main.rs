mod components;
mod icons;
mod model;
mod sphere;
mod state;
mod tentacles;
mod theme;
mod util;

use components::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
