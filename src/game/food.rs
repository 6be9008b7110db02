//! Food entity - placed on a random free cell

use rand::Rng;
use tracing::warn;

use super::cell::GridCell;

/// Pulse phase advance per draw
pub const PULSE_STEP: f64 = 0.14;

/// The single food item on the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    /// Position of the food
    pub position: GridCell,
    /// Animation phase driving the pulsing glow
    pub pulse: f64,
}

impl Food {
    /// Create food at a specific cell
    pub fn at(position: GridCell) -> Self {
        Self { position, pulse: 0.0 }
    }

    /// Move the food to a uniformly random cell not covered by `occupied`.
    ///
    /// Samples until a free cell turns up. A grid with no free cell keeps the
    /// current position.
    pub fn place<R: Rng + ?Sized>(
        &mut self,
        occupied: &[GridCell],
        width: i32,
        height: i32,
        rng: &mut R,
    ) {
        self.pulse = 0.0;

        let cells = width.max(0) as usize * height.max(0) as usize;
        if occupied.len() >= cells {
            warn!("No free cell left for food");
            return;
        }

        loop {
            let candidate = GridCell::random(rng, width, height);
            if !occupied.contains(&candidate) {
                self.position = candidate;
                return;
            }
        }
    }

    /// Check if a cell matches the food position
    pub fn is_at(&self, cell: GridCell) -> bool {
        self.position == cell
    }

    /// Advance the pulse phase and return the (radius scale, glow) pair
    pub fn advance_pulse(&mut self) -> (f64, f64) {
        self.pulse += PULSE_STEP;
        let wave = self.pulse.sin();
        (1.0 + wave * 0.12, 18.0 + wave * 8.0)
    }
}
