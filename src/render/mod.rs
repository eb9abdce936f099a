pub mod renderer;

pub use renderer::{Renderer, snake_color};
