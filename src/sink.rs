//! Frame delivery abstraction
//!
//! The session driver pushes every rendered frame through a `FrameSink`.
//! The WebSocket connection is the production sink; the channel sink feeds
//! frames to in-process consumers such as tests.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::GameError;
use crate::protocol::ServerMessage;

/// Destination for server messages of one session
#[async_trait]
pub trait FrameSink: Send {
    /// Deliver a message; an error ends the session
    async fn send(&mut self, msg: ServerMessage) -> Result<(), GameError>;
}

/// Sink backed by an unbounded tokio channel
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl ChannelSink {
    /// Create a sink and the receiver that observes it
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn send(&mut self, msg: ServerMessage) -> Result<(), GameError> {
        self.tx.send(msg).map_err(|_| {
            debug!("Frame receiver dropped");
            GameError::SessionClosed
        })
    }
}
