//! Neon Snake
//!
//! Single-player snake game core: fixed-step logic with forgiving
//! collisions, a particle system and a canvas render loop, served to the
//! browser over WebSocket as recorded draw commands.

pub mod config;
pub mod error;
pub mod event_logger;
pub mod game;
pub mod protocol;
pub mod render;
pub mod scores;
pub mod sink;
pub mod sound;
pub mod state;
pub mod ws;

pub use error::GameError;
pub use game::GameSession;
pub use state::AppState;
