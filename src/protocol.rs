//! Protocol messages for WebSocket communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::difficulty::Difficulty;
use crate::game::direction::Direction;
use crate::game::session::RunState;
use crate::render::DrawCommand;
use crate::sound::SoundCue;

/// Messages sent from the browser to the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Start playing from the start screen
    Start,
    /// Play again after game over
    Restart,
    /// Back to the start screen
    Home,
    /// Toggle pause
    Pause,
    /// Direction intent
    Direction { dir: Direction },
    /// Difficulty selection
    Difficulty { level: Difficulty },
    /// Keep-alive
    Ping,
}

impl ClientMessage {
    /// Parse a client message from a string.
    ///
    /// Accepts tagged JSON objects as well as bare key words such as
    /// `"up"`, `"space"` or `"hard"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if s.starts_with('{') {
            return serde_json::from_str(s).ok();
        }

        if let Some(dir) = Direction::from_key(s) {
            return Some(ClientMessage::Direction { dir });
        }

        if let Ok(level) = s.parse::<Difficulty>() {
            return Some(ClientMessage::Difficulty { level });
        }

        match s.to_lowercase().as_str() {
            "start" => Some(ClientMessage::Start),
            "restart" => Some(ClientMessage::Restart),
            "home" => Some(ClientMessage::Home),
            "pause" | "space" => Some(ClientMessage::Pause),
            "ping" => Some(ClientMessage::Ping),
            _ => None,
        }
    }
}

/// Messages sent from the server to the browser
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message on a new connection
    Hello {
        session: Uuid,
        width: f64,
        height: f64,
        high_score: u32,
        difficulties: Vec<Difficulty>,
    },
    /// One rendered frame
    Frame {
        commands: Vec<DrawCommand>,
        sounds: Vec<SoundCue>,
        hud: RunState,
    },
    /// The run ended
    GameOver {
        score: u32,
        level: u32,
        high_score: u32,
        /// How long the host should shake the whole page
        shake_ms: u64,
    },
}

impl ServerMessage {
    /// Serialize message to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
