//! Game configuration constants and runtime overrides

use std::path::Path;

use serde::Deserialize;

use crate::error::GameError;

/// Playfield width in cells
pub const TILE_COUNT_X: i32 = 50;

/// Playfield height in cells
pub const TILE_COUNT_Y: i32 = 38;

/// Cell size in pixels
pub const CELL_SIZE: f64 = 18.0;

/// Wall collision forgiveness window in milliseconds
pub const WALL_GRACE_MS: f64 = 150.0;

/// Self collision forgiveness window in milliseconds
pub const TAIL_GRACE_MS: f64 = 150.0;

/// Longest frame delta fed to the accumulator, in milliseconds
pub const MAX_FRAME_DELTA_MS: f64 = 50.0;

/// Reference frame duration used to normalise particle motion
pub const REFERENCE_FRAME_MS: f64 = 16.67;

/// Fastest allowed tick interval in milliseconds
pub const MIN_TICK_INTERVAL_MS: f64 = 30.0;

/// Points awarded per food
pub const FOOD_REWARD: u32 = 10;

/// Particles spawned per burst
pub const BURST_PARTICLE_COUNT: usize = 15;

/// Distance from a wall (in cells) at which the input queue widens
pub const DANGER_MARGIN: i32 = 5;

/// Input queue capacity away from walls
pub const QUEUE_CAPACITY: usize = 2;

/// Input queue capacity near a wall
pub const QUEUE_CAPACITY_NEAR_WALL: usize = 4;

/// Per-draw smoothing applied to drawn segment positions
pub const SEGMENT_SMOOTHING: f64 = 0.24;

/// Minimum distance from any wall for a fresh spawn
pub const SPAWN_MARGIN: i32 = 8;

// =============================================================================
// Visual feedback
// =============================================================================

/// Shake magnitude after eating
pub const EAT_SHAKE: f64 = 6.0;

/// Shake magnitude after a rejected reversal
pub const REVERSAL_SHAKE: f64 = 3.0;

/// Shake magnitude on death
pub const DEATH_SHAKE: f64 = 15.0;

/// Multiplicative shake decay per frame
pub const SHAKE_DECAY: f64 = 0.88;

/// Shake below this magnitude is not applied
pub const SHAKE_EPSILON: f64 = 0.02;

/// Duration of the host's full screen death shake
pub const DEATH_SHAKE_MS: u64 = 600;

/// Particle life lost per reference frame
pub const PARTICLE_DECAY: f64 = 0.03;

/// Velocity damping per advance
pub const PARTICLE_DAMPING: f64 = 0.98;

/// Particle palette
pub const PARTICLE_COLORS: [&str; 2] = ["#00ffff", "#ff00ff"];

// =============================================================================
// Server
// =============================================================================

/// Default WebSocket server port
pub const SERVER_PORT: u16 = 8080;

/// Frames per second pushed to each client
pub const FRAME_RATE: u64 = 60;

/// Pending UI commands buffered per connection
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Default high score file
pub const SCORES_FILE: &str = "highscores.json";

/// Store key for the high score
pub const HIGH_SCORE_KEY: &str = "neonSnakeHighScore";

/// Enable game event logging
pub const ENABLE_EVENT_LOGGING: bool = true;

/// Log file path
pub const EVENT_LOG_FILE: &str = "game_events.log";

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tiles_x: i32,
    pub tiles_y: i32,
    pub cell_size: f64,
    pub wall_grace_ms: f64,
    pub tail_grace_ms: f64,
    pub max_frame_delta_ms: f64,
    pub reference_frame_ms: f64,
    pub min_interval_ms: f64,
    pub food_reward: u32,
    pub burst_count: usize,
    pub danger_margin: i32,
    pub queue_capacity: usize,
    pub queue_capacity_near_wall: usize,
    pub smoothing: f64,
    pub spawn_margin: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tiles_x: TILE_COUNT_X,
            tiles_y: TILE_COUNT_Y,
            cell_size: CELL_SIZE,
            wall_grace_ms: WALL_GRACE_MS,
            tail_grace_ms: TAIL_GRACE_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            reference_frame_ms: REFERENCE_FRAME_MS,
            min_interval_ms: MIN_TICK_INTERVAL_MS,
            food_reward: FOOD_REWARD,
            burst_count: BURST_PARTICLE_COUNT,
            danger_margin: DANGER_MARGIN,
            queue_capacity: QUEUE_CAPACITY,
            queue_capacity_near_wall: QUEUE_CAPACITY_NEAR_WALL,
            smoothing: SEGMENT_SMOOTHING,
            spawn_margin: SPAWN_MARGIN,
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let raw = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the game loop cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        if self.spawn_margin < 0 || self.danger_margin < 0 {
            return Err(GameError::Config(format!(
                "margins must not be negative (spawn {}, danger {})",
                self.spawn_margin, self.danger_margin
            )));
        }
        if self.tiles_x.checked_mul(self.tiles_y).is_none() {
            return Err(GameError::Config(format!(
                "grid {}x{} has too many cells",
                self.tiles_x, self.tiles_y
            )));
        }
        let min_side = self.spawn_margin.saturating_mul(2);
        if self.tiles_x <= min_side || self.tiles_y <= min_side {
            return Err(GameError::Config(format!(
                "grid {}x{} too small for spawn margin {}",
                self.tiles_x, self.tiles_y, self.spawn_margin
            )));
        }
        if self.cell_size <= 0.0 || self.reference_frame_ms <= 0.0 {
            return Err(GameError::Config("cell size and reference frame must be positive".into()));
        }
        if self.min_interval_ms <= 0.0 || self.max_frame_delta_ms <= 0.0 {
            return Err(GameError::Config("intervals must be positive".into()));
        }
        if self.wall_grace_ms < 0.0 || self.tail_grace_ms < 0.0 {
            return Err(GameError::Config(format!(
                "grace periods must not be negative (wall {}, tail {})",
                self.wall_grace_ms, self.tail_grace_ms
            )));
        }
        if self.queue_capacity == 0 || self.queue_capacity_near_wall < self.queue_capacity {
            return Err(GameError::Config(format!(
                "queue capacities {}/{} are inconsistent",
                self.queue_capacity, self.queue_capacity_near_wall
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(GameError::Config(format!("smoothing {} outside [0, 1]", self.smoothing)));
        }
        Ok(())
    }

    /// Canvas width in pixels
    pub fn canvas_width(&self) -> f64 {
        self.tiles_x as f64 * self.cell_size
    }

    /// Canvas height in pixels
    pub fn canvas_height(&self) -> f64 {
        self.tiles_y as f64 * self.cell_size
    }
}

/// Process level settings read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub scores_file: String,
    pub event_log_file: Option<String>,
    pub game: GameConfig,
}

impl ServerConfig {
    /// Read `NEON_SNAKE_*` variables, falling back to the constants above
    pub fn from_env() -> Result<Self, GameError> {
        let port = match std::env::var("NEON_SNAKE_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| GameError::Config(format!("invalid port: {}", raw)))?,
            Err(_) => SERVER_PORT,
        };

        let scores_file = std::env::var("NEON_SNAKE_SCORES").unwrap_or_else(|_| SCORES_FILE.to_string());

        let event_log_file = match std::env::var("NEON_SNAKE_EVENT_LOG") {
            Ok(path) if path.is_empty() => None,
            Ok(path) => Some(path),
            Err(_) if ENABLE_EVENT_LOGGING => Some(EVENT_LOG_FILE.to_string()),
            Err(_) => None,
        };

        let game = match std::env::var("NEON_SNAKE_CONFIG") {
            Ok(path) => GameConfig::load(path)?,
            Err(_) => GameConfig::default(),
        };

        Ok(Self {
            port,
            scores_file,
            event_log_file,
            game,
        })
    }
}
