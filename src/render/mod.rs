//! Rendering: the surface capability, a recording implementation and the scene

pub mod commands;
pub mod scene;
pub mod surface;

pub use commands::{CommandBuffer, DrawCommand};
pub use surface::{Blend, Paint, Surface};
