//! Recording surface: captures draw calls as serializable commands the
//! browser replays on its canvas

use serde::Serialize;

use super::surface::{Blend, Paint, Surface};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Blend { mode: Blend },
    Glow { blur: f64, color: String },
    Alpha { value: f64 },
    FillRect { x: f64, y: f64, w: f64, h: f64, paint: Paint },
    StrokeRect { x: f64, y: f64, w: f64, h: f64, color: String, width: f64 },
    FillCircle { x: f64, y: f64, r: f64, paint: Paint },
    StrokeCircle { x: f64, y: f64, r: f64, color: String, width: f64 },
    Line { x0: f64, y0: f64, x1: f64, y1: f64, color: String, width: f64 },
}

/// Surface that records instead of drawing
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand out the recorded frame and start a fresh one
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for CommandBuffer {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DrawCommand::Translate { dx, dy });
    }

    fn set_blend(&mut self, blend: Blend) {
        self.commands.push(DrawCommand::Blend { mode: blend });
    }

    fn set_glow(&mut self, blur: f64, color: &str) {
        self.commands.push(DrawCommand::Glow {
            blur,
            color: color.to_string(),
        });
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::Alpha { value: alpha });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            w,
            h,
            paint: paint.clone(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str, width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
            width,
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            x,
            y,
            r: radius,
            paint: paint.clone(),
        });
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64) {
        self.commands.push(DrawCommand::StrokeCircle {
            x,
            y,
            r: radius,
            color: color.to_string(),
            width,
        });
    }

    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: &str, width: f64) {
        self.commands.push(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            color: color.to_string(),
            width,
        });
    }
}
