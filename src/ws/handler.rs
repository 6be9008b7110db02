//! WebSocket handler for browser sessions

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::COMMAND_CHANNEL_CAPACITY;
use crate::error::GameError;
use crate::game::game_loop::{open_session, run_session};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::sink::FrameSink;
use crate::state::AppState;

/// Write half of the socket as a frame sink
pub struct WsSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send(&mut self, msg: ServerMessage) -> Result<(), GameError> {
        self.sender
            .send(Message::Text(msg.to_json().into()))
            .await
            .map_err(|e| GameError::WebSocket(e.to_string()))
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    let session = open_session(&state);

    info!("Session {} connected", session_id);
    state.event_logger.log_join(session_id);
    state.update_session(session_id, session.run());

    let (sender, mut receiver) = socket.split();
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);

    // Task driving the render loop for this browser
    let mut drive_task = {
        let state = state.clone();
        tokio::spawn(async move {
            let mut sink = WsSink { sender };
            run_session(session_id, session, command_rx, &mut sink, state).await
        })
    };

    // Task forwarding browser signals to the driver
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match ClientMessage::parse(&text) {
                    Some(msg) => {
                        debug!("Session {} sent {:?}", session_id, msg);
                        if command_tx.send(msg).await.is_err() {
                            break;
                        }
                    }
                    None => warn!("Session {} sent unknown message: {}", session_id, text.as_str()),
                },
                Ok(Message::Close(_)) => {
                    info!("Session {} sent close frame", session_id);
                    break;
                }
                Ok(_) => {
                    // Ignore binary, ping, pong frames
                }
                Err(e) => {
                    error!("WebSocket error for session {}: {}", session_id, e);
                    break;
                }
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        result = &mut drive_task => {
            match result {
                Ok(Err(e)) => debug!("Session {} driver stopped: {}", session_id, e),
                Err(e) => error!("Session {} driver panicked: {}", session_id, e),
                Ok(Ok(())) => {}
            }
            recv_task.abort();
        }
        _ = &mut recv_task => {
            drive_task.abort();
        }
    }

    info!("Session {} disconnected", session_id);
    state.event_logger.log_leave(session_id);
    state.remove_session(&session_id);
}
