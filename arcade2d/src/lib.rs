//! Arcade2D - a tiny harness for fixed-canvas 2D arcade games.
//!
//! The engine owns the window, the tick clock and the renderer; games implement
//! [`Game`] and draw through the [`Surface`] trait.

pub mod engine;
pub mod input;
pub mod math;
pub mod render;

pub use crate::engine::{Engine, EngineConfig, EngineContext, FixedStep, Game};
pub use crate::input::InputState;
pub use crate::math::{letterbox, Color, Rect, Vec2, Viewport};
pub use crate::render::{
    CommandList, DrawCommand, Drawable, Frame, RenderError, Renderer, Surface,
};
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
