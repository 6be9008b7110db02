//! Difficulty presets and level progression

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Selectable difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Extreme,
}

/// Speed curve carried by a difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    /// Tick interval at level 1, in milliseconds
    pub start_interval: f64,
    /// Interval removed per level reached
    pub interval_decrease: f64,
    /// Score needed per level
    pub level_threshold: u32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn settings(&self) -> DifficultySettings {
        let (start_interval, interval_decrease, level_threshold) = match self {
            Difficulty::Easy => (150.0, 3.0, 50),
            Difficulty::Medium => (120.0, 5.0, 40),
            Difficulty::Hard => (100.0, 8.0, 30),
            Difficulty::Extreme => (80.0, 15.0, 25),
        };
        DifficultySettings {
            start_interval,
            interval_decrease,
            level_threshold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }
}

impl DifficultySettings {
    /// Level reached at `score`, starting from 1
    pub fn level_for(&self, score: u32) -> u32 {
        score / self.level_threshold + 1
    }

    /// Tick interval at `level`, never below `min_interval`
    pub fn interval_for(&self, level: u32, min_interval: f64) -> f64 {
        (self.start_interval - level as f64 * self.interval_decrease).max(min_interval)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownDifficulty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_level_two() {
        let medium = Difficulty::Medium.settings();
        assert_eq!(medium.level_for(30), 1);
        assert_eq!(medium.level_for(40), 2);
        assert_eq!(medium.interval_for(2, 30.0), 110.0);
    }

    #[test]
    fn test_interval_clamped() {
        let extreme = Difficulty::Extreme.settings();
        assert_eq!(extreme.interval_for(3, 30.0), 35.0);
        assert_eq!(extreme.interval_for(4, 30.0), 30.0);
        assert_eq!(extreme.interval_for(40, 30.0), 30.0);
    }

    #[test]
    fn test_monotonic_progression() {
        for difficulty in Difficulty::ALL {
            let settings = difficulty.settings();
            let mut last_level = 1;
            let mut last_interval = f64::MAX;
            for score in (0..2000).step_by(10) {
                let level = settings.level_for(score);
                let interval = settings.interval_for(level, 30.0);
                assert!(level >= last_level);
                assert!(interval <= last_interval);
                assert!(interval >= 30.0);
                last_level = level;
                last_interval = interval;
            }
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "nightmare".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty(_))
        ));
    }
}
