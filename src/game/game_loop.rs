//! Session driver - the per-connection render loop

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, warn};
use uuid::Uuid;

use super::difficulty::Difficulty;
use super::session::{GameSession, SessionEvent};
use crate::config::{DEATH_SHAKE_MS, FRAME_RATE, HIGH_SCORE_KEY};
use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::render::CommandBuffer;
use crate::scores::HighScoreStore;
use crate::sink::FrameSink;
use crate::sound::CueBuffer;
use crate::state::AppState;

/// Open a fresh session seeded with the stored high score.
///
/// Storage failures are logged and treated as no high score.
pub fn open_session(state: &AppState) -> GameSession {
    let high_score = state.scores.get(HIGH_SCORE_KEY).unwrap_or_else(|e| {
        warn!("Could not read high score: {}", e);
        0
    });
    GameSession::new(state.game.clone(), high_score)
}

/// Drive `session` until the command channel closes or the sink fails.
///
/// Each frame tick stamps a monotonic millisecond timestamp, runs
/// `GameSession::frame` into a recording surface and ships the result.
pub async fn run_session<S: FrameSink>(
    id: Uuid,
    mut session: GameSession,
    mut commands: mpsc::Receiver<ClientMessage>,
    sink: &mut S,
    state: Arc<AppState>,
) -> Result<(), GameError> {
    sink.send(ServerMessage::Hello {
        session: id,
        width: session.config().canvas_width(),
        height: session.config().canvas_height(),
        high_score: session.run().high_score,
        difficulties: Difficulty::ALL.to_vec(),
    })
    .await?;
    state.update_session(id, session.run());

    let mut frame_interval = interval(Duration::from_micros(1_000_000 / FRAME_RATE));
    frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let clock = Instant::now();
    let mut surface = CommandBuffer::new();
    let mut cues = CueBuffer::new();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => apply_command(&mut session, command),
                None => {
                    debug!("Session {} command channel closed", id);
                    break;
                }
            },
            _ = frame_interval.tick() => {
                let now = clock.elapsed().as_secs_f64() * 1000.0;
                session.frame(now, &mut surface, &mut cues);
                let published = publish_events(id, &mut session, &state);
                if let Some(score) = published.new_high_score {
                    record_high_score(state.scores.clone(), score).await;
                }

                sink.send(ServerMessage::Frame {
                    commands: surface.take(),
                    sounds: cues.take(),
                    hud: session.run().clone(),
                })
                .await?;

                if let Some(msg) = published.game_over {
                    sink.send(msg).await?;
                }
                state.update_session(id, session.run());
            }
        }
    }

    Ok(())
}

/// Apply one UI signal to the session
pub fn apply_command(session: &mut GameSession, command: ClientMessage) {
    match command {
        ClientMessage::Start => session.start(),
        ClientMessage::Restart => session.restart(),
        ClientMessage::Home => session.return_to_start(),
        ClientMessage::Pause => {
            let paused = session.toggle_pause();
            debug!("Paused: {}", paused);
        }
        ClientMessage::Direction { dir } => {
            if let Some(outcome) = session.queue_direction(dir) {
                debug!("Direction {:?}: {:?}", dir, outcome);
            }
        }
        ClientMessage::Difficulty { level } => session.select_difficulty(level),
        ClientMessage::Ping => {}
    }
}

/// What a frame's events asked the driver to do
#[derive(Debug, Default)]
struct Published {
    game_over: Option<ServerMessage>,
    new_high_score: Option<u32>,
}

/// Log drained session events.
///
/// Returns the game-over message to send and the score to store, if the
/// run ended.
fn publish_events(id: Uuid, session: &mut GameSession, state: &AppState) -> Published {
    let mut published = Published::default();

    for event in session.drain_events() {
        state.event_logger.log_session(id, &event);

        if let SessionEvent::GameOver {
            score,
            level,
            new_high_score,
            ..
        } = event
        {
            if new_high_score {
                published.new_high_score = Some(score);
            }
            published.game_over = Some(ServerMessage::GameOver {
                score,
                level,
                high_score: session.run().high_score,
                shake_ms: DEATH_SHAKE_MS,
            });
        }
    }

    published
}

/// Store a new best score off the async runtime; failures are logged
async fn record_high_score(scores: Arc<dyn HighScoreStore>, score: u32) {
    match tokio::task::spawn_blocking(move || scores.record(HIGH_SCORE_KEY, score)).await {
        Ok(Ok(true)) => debug!("High score {} stored", score),
        Ok(Ok(false)) => {}
        Ok(Err(e)) => warn!("Could not store high score {}: {}", score, e),
        Err(e) => warn!("High score task failed: {}", e),
    }
}
