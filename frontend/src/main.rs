use crate::app::App;

mod api;
mod app;
mod components;
mod config;
mod export;
mod filters;
mod history;
mod session;

fn main() {
    yew::Renderer::<App>::new().render();
}
