//! Grid cell positions

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A logical position on the playfield grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    /// Create a new cell
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in the given direction.
    ///
    /// The playfield does not wrap, so the result may lie outside the grid.
    pub fn step(&self, direction: Direction) -> GridCell {
        let (dx, dy) = direction.delta();
        GridCell::new(self.x + dx, self.y + dy)
    }

    /// Whether the cell lies inside a `width` x `height` grid
    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }

    /// Whether the cell is within `margin` cells of any wall
    pub fn near_wall(&self, width: i32, height: i32, margin: i32) -> bool {
        self.x < margin || self.x >= width - margin || self.y < margin || self.y >= height - margin
    }

    /// Top-left corner in pixels
    pub fn origin_px(&self, cell_size: f64) -> (f64, f64) {
        (self.x as f64 * cell_size, self.y as f64 * cell_size)
    }

    /// Centre in pixels
    pub fn center_px(&self, cell_size: f64) -> (f64, f64) {
        let (x, y) = self.origin_px(cell_size);
        (x + cell_size / 2.0, y + cell_size / 2.0)
    }

    /// Uniformly random cell on the grid
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: i32, height: i32) -> Self {
        GridCell::new(rng.gen_range(0..width), rng.gen_range(0..height))
    }

    /// Random cell at least `margin` cells away from every wall
    pub fn random_inset<R: Rng + ?Sized>(rng: &mut R, width: i32, height: i32, margin: i32) -> Self {
        GridCell::new(
            margin + rng.gen_range(0..width - margin * 2),
            margin + rng.gen_range(0..height - margin * 2),
        )
    }
}
