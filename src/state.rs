//! Application state shared across all handlers

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{GameConfig, ServerConfig};
use crate::error::GameError;
use crate::event_logger::EventLogger;
use crate::game::difficulty::Difficulty;
use crate::game::session::RunState;
use crate::scores::{FileScores, HighScoreStore, MemoryScores};

/// Snapshot of a live session for the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub score: u32,
    pub level: u32,
    pub started: bool,
    pub paused: bool,
    pub difficulty: Difficulty,
}

impl SessionInfo {
    pub fn new(id: Uuid, run: &RunState) -> Self {
        Self {
            id,
            score: run.score,
            level: run.level,
            started: run.started,
            paused: run.paused,
            difficulty: run.difficulty,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Live sessions, keyed by connection UUID
    pub sessions: DashMap<Uuid, SessionInfo>,
    /// High score persistence
    pub scores: Arc<dyn HighScoreStore>,
    /// Event logger for post-game analysis
    pub event_logger: Arc<EventLogger>,
    /// Gameplay parameters for new sessions
    pub game: GameConfig,
}

impl AppState {
    /// Build state from the process configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, GameError> {
        Ok(Self {
            sessions: DashMap::new(),
            scores: Arc::new(FileScores::open(&config.scores_file)?),
            event_logger: Arc::new(EventLogger::new(config.event_log_file.as_deref())),
            game: config.game.clone(),
        })
    }

    /// State with in-memory scores and no event log
    pub fn in_memory(game: GameConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            scores: Arc::new(MemoryScores::new()),
            event_logger: Arc::new(EventLogger::disabled()),
            game,
        }
    }

    /// Get the number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn update_session(&self, id: Uuid, run: &RunState) {
        self.sessions.insert(id, SessionInfo::new(id, run));
    }

    pub fn remove_session(&self, id: &Uuid) {
        self.sessions.remove(id);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(GameConfig::default())
    }
}
