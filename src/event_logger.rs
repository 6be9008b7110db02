//! Game event logging for post-game analysis

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::game::cell::GridCell;
use crate::game::difficulty::Difficulty;
use crate::game::session::SessionEvent;
use crate::game::snake::GraceKind;

/// Types of game events that can be logged
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Browser connected
    SessionJoin { session_id: String },
    /// Browser disconnected
    SessionLeave { session_id: String },
    /// A run began
    RunStarted {
        session_id: String,
        difficulty: Difficulty,
    },
    /// Snake ate food
    FoodEaten {
        session_id: String,
        location: LocationData,
        score: u32,
    },
    /// Speed went up
    LevelUp {
        session_id: String,
        level: u32,
        interval_ms: f64,
    },
    /// A collision opened a grace window
    GraceStarted { session_id: String, kind: String },
    /// The snake escaped a grace window
    GraceRecovered { session_id: String, kind: String },
    /// Run ended
    GameOver {
        session_id: String,
        score: u32,
        level: u32,
        cause: String,
        new_high_score: bool,
    },
    /// Player went back to the start screen
    ReturnedToStart { session_id: String },
}

/// Location data for serialization
#[derive(Debug, Clone, Serialize)]
pub struct LocationData {
    pub x: i32,
    pub y: i32,
}

impl From<GridCell> for LocationData {
    fn from(cell: GridCell) -> Self {
        Self { x: cell.x, y: cell.y }
    }
}

fn grace_name(kind: GraceKind) -> String {
    match kind {
        GraceKind::Wall => "wall".to_string(),
        GraceKind::Tail => "tail".to_string(),
    }
}

impl GameEvent {
    /// Tag a session event with the session it came from
    pub fn from_session(session_id: Uuid, event: &SessionEvent) -> Self {
        let session_id = session_id.to_string();
        match *event {
            SessionEvent::RunStarted { difficulty } => GameEvent::RunStarted {
                session_id,
                difficulty,
            },
            SessionEvent::FoodEaten { cell, score } => GameEvent::FoodEaten {
                session_id,
                location: cell.into(),
                score,
            },
            SessionEvent::LevelUp { level, interval } => GameEvent::LevelUp {
                session_id,
                level,
                interval_ms: interval,
            },
            SessionEvent::GraceStarted(kind) => GameEvent::GraceStarted {
                session_id,
                kind: grace_name(kind),
            },
            SessionEvent::GraceRecovered(kind) => GameEvent::GraceRecovered {
                session_id,
                kind: grace_name(kind),
            },
            SessionEvent::GameOver {
                score,
                level,
                cause,
                new_high_score,
            } => GameEvent::GameOver {
                session_id,
                score,
                level,
                cause: grace_name(cause),
                new_high_score,
            },
            SessionEvent::ReturnedToStart => GameEvent::ReturnedToStart { session_id },
        }
    }
}

/// Logged event with timestamp
#[derive(Debug, Serialize)]
struct LogEntry {
    /// Unix timestamp in milliseconds
    timestamp_ms: u128,
    /// The event data
    #[serde(flatten)]
    event: GameEvent,
}

/// Game event logger
pub struct EventLogger {
    /// File writer (None if logging disabled)
    writer: Option<Mutex<BufWriter<File>>>,
}

impl EventLogger {
    /// Append to `path`, or log nothing when `path` is `None`
    pub fn new(path: Option<&str>) -> Self {
        let Some(path) = path else {
            info!("Event logging is disabled");
            return Self::disabled();
        };

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                info!("Event logging enabled, writing to {}", path);
                Self {
                    writer: Some(Mutex::new(BufWriter::new(file))),
                }
            }
            Err(e) => {
                error!("Failed to open event log file: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Log a game event
    pub fn log(&self, event: GameEvent) {
        let Some(ref writer) = self.writer else {
            return;
        };

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        let entry = LogEntry { timestamp_ms, event };

        if let Ok(mut w) = writer.lock() {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
    }

    /// Log a session event
    pub fn log_session(&self, session_id: Uuid, event: &SessionEvent) {
        self.log(GameEvent::from_session(session_id, event));
    }

    /// Log browser join
    pub fn log_join(&self, session_id: Uuid) {
        self.log(GameEvent::SessionJoin {
            session_id: session_id.to_string(),
        });
    }

    /// Log browser leave
    pub fn log_leave(&self, session_id: Uuid) {
        self.log(GameEvent::SessionLeave {
            session_id: session_id.to_string(),
        });
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
