mod component;
mod host;
mod render;
mod state;

pub use component::GraphCanvas;
pub use host::{CanvasHost, Renderer};
