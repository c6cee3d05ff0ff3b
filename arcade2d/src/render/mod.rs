pub mod debug_font;
mod error;
mod surface;
mod wgpu_backend;

pub use error::RenderError;
pub use surface::{CommandList, DrawCommand, Drawable, Surface, DEBUG_TEXT_ORIGIN};
pub use wgpu_backend::{Frame, Renderer};
