//! Ingest Engine
//!
//! Manages exactly one remote-model turn: open the connection, send the
//! request, consume the response stream, and deliver the finished text.
//!
//! The engine runs as a spawned task and reports progress over a per-turn
//! channel, so it can mutate nothing but the placeholder it is bound to
//! (the session applies the events). The returned [`TurnHandle`] owns the
//! connection: dropping it aborts the task and closes the socket, with no
//! partial-accumulation commit.
//!
//! Transport errors are logged and reported as events but never finish the
//! turn; without an end-of-turn frame the placeholder stays in `Processing`.

use futures_util::{SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, trace, warn};

use super::accumulator::{FrameOutcome, TurnAccumulator};
use super::buffer::{FeedOutcome, FrameBuffer};
use crate::protocol::TurnRequest;

/// Progress event for the turn in flight
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    /// The endpoint signaled the start of the reply
    Started,
    /// An incremental text fragment arrived
    Delta {
        /// The fragment text
        fragment: String,
    },
    /// The reply is complete
    Finished {
        /// The fully reassembled reply text
        message: String,
    },
    /// The connection failed or errored; the turn stays in flight
    TransportError {
        /// Transport diagnostic
        error: String,
    },
}

/// Spawns one connection-owning task per turn
#[derive(Clone, Debug)]
pub struct IngestEngine {
    endpoint: String,
}

impl IngestEngine {
    /// Create an engine bound to a WebSocket endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint this engine connects to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start a turn: connect, send the request, and stream the reply.
    ///
    /// Events arrive on `events` in delivery order. The turn is abandoned
    /// (connection closed, nothing committed) when the returned handle is
    /// dropped.
    #[must_use]
    pub fn spawn(&self, request: TurnRequest, events: mpsc::Sender<TurnEvent>) -> TurnHandle {
        let endpoint = self.endpoint.clone();
        let task = tokio::spawn(run_turn(endpoint, request, events));
        TurnHandle { task }
    }
}

/// Owned handle to the turn in flight.
///
/// Dropping the handle tears the connection down; the bound placeholder is
/// left in `Processing` and no partial text is committed.
#[derive(Debug)]
pub struct TurnHandle {
    task: JoinHandle<()>,
}

impl TurnHandle {
    /// Check whether the turn task has run to completion
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TurnHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_turn(endpoint: String, request: TurnRequest, events: mpsc::Sender<TurnEvent>) {
    let (ws, _) = match connect_async(&endpoint).await {
        Ok(connected) => connected,
        Err(e) => {
            warn!(error = %e, %endpoint, "websocket connect failed");
            let _ = events
                .send(TurnEvent::TransportError {
                    error: e.to_string(),
                })
                .await;
            return;
        }
    };
    debug!(%endpoint, "websocket connected");

    let (mut sink, stream) = ws.split();

    let payload = match serde_json::to_string(&request) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "turn request serialization failed");
            let _ = events
                .send(TurnEvent::TransportError {
                    error: e.to_string(),
                })
                .await;
            return;
        }
    };

    if let Err(e) = sink.send(Message::Text(payload)).await {
        warn!(error = %e, "failed to send turn request");
        let _ = events
            .send(TurnEvent::TransportError {
                error: e.to_string(),
            })
            .await;
        return;
    }
    trace!("turn request sent");

    drive_stream(stream, &events).await;

    // Completed or server went away: close our half and go inert.
    if let Err(e) = sink.close().await {
        debug!(error = %e, "websocket close failed");
    }
}

/// Drive a stream of WebSocket deliveries through the frame buffer and turn
/// accumulator, emitting [`TurnEvent`]s until the turn ends or the stream
/// is exhausted.
///
/// Transport-agnostic on purpose: tests and alternate transports can feed
/// any stream of messages.
pub async fn drive_stream<S>(mut deliveries: S, events: &mpsc::Sender<TurnEvent>)
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    let mut buffer = FrameBuffer::new();
    let mut turn = TurnAccumulator::new();

    while let Some(delivery) = deliveries.next().await {
        let chunk = match delivery {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(Message::Close(frame)) => {
                debug!(?frame, "server closed connection");
                break;
            }
            // Ping/pong handled by the transport
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "websocket transport error");
                if events
                    .send(TurnEvent::TransportError {
                        error: e.to_string(),
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                continue;
            }
        };

        let event = match buffer.feed(&chunk) {
            FeedOutcome::Frame(frame) => match turn.apply(frame) {
                FrameOutcome::Started => TurnEvent::Started,
                FrameOutcome::Appended { fragment } => TurnEvent::Delta { fragment },
                FrameOutcome::Finished { message } => {
                    debug!(len = message.len(), "end of turn");
                    let _ = events.send(TurnEvent::Finished { message }).await;
                    return;
                }
                FrameOutcome::Ignored => continue,
            },
            FeedOutcome::Incomplete => {
                trace!(buffered = buffer.len(), "incomplete frame, waiting for more data");
                continue;
            }
            FeedOutcome::Invalid { error } => {
                warn!(%error, "discarding undecodable frame buffer");
                continue;
            }
        };

        if events.send(event).await.is_err() {
            // Session side went away; nothing left to deliver to.
            return;
        }
    }

    debug!("stream ended without end-of-turn frame");
}
