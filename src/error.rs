use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
