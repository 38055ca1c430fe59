//! Operator-facing console output.

pub mod render;
mod renderer;
mod settings;

pub use render::{RecordingSink, RenderSink};
pub use renderer::Renderer;
