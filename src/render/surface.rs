//! Drawing surface capability the renderer draws into

use serde::Serialize;

/// Compositing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Blend {
    Normal,
    Additive,
}

/// Gradient colour stop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f64, color: &str) -> Self {
        Self {
            offset,
            color: color.to_string(),
        }
    }
}

/// Fill style for shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Paint {
    Solid {
        color: String,
    },
    Linear {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        stops: Vec<ColorStop>,
    },
    Radial {
        x: f64,
        y: f64,
        r0: f64,
        r1: f64,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    pub fn solid(color: &str) -> Self {
        Paint::Solid {
            color: color.to_string(),
        }
    }
}

/// 2D canvas-like drawing target.
///
/// Coordinates are pixels with the origin at the top-left corner.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn set_blend(&mut self, blend: Blend);
    /// Blur radius and colour of the glow drawn behind following shapes; 0 disables it
    fn set_glow(&mut self, blur: f64, color: &str);
    fn set_alpha(&mut self, alpha: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str, width: f64);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: &Paint);
    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64);
    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: &str, width: f64);
}
