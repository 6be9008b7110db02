//! Direction enum for snake movement

use serde::{Deserialize, Serialize};

/// One of the four cardinal unit vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Moving up (0, -1)
    North,
    /// Moving down (0, 1)
    South,
    /// Moving left (-1, 0)
    West,
    /// Moving right (1, 0)
    #[default]
    East,
}

impl Direction {
    /// Parse a direction from a key name.
    ///
    /// Accepts arrow keys as well as WASD and ZQSD layouts.
    pub fn from_key(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "up" | "arrowup" | "w" | "z" => Some(Direction::North),
            "south" | "down" | "arrowdown" | "s" => Some(Direction::South),
            "west" | "left" | "arrowleft" | "a" | "q" => Some(Direction::West),
            "east" | "right" | "arrowright" | "d" => Some(Direction::East),
            _ => None,
        }
    }

    /// Unit vector as (dx, dy); y grows downwards
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }

    /// The direction pointing the other way
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Check if this direction is opposite to another
    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }
}
