//! Conversation Session
//!
//! Single source of truth for the ordered message list and the system-wide
//! `processing` flag. Mediates between user input, the upload collaborator,
//! and the ingest engine.
//!
//! The session is event-driven and logically single-threaded: engine and
//! upload tasks run on the runtime but communicate only through channels,
//! and all state mutation happens inside [`ChatSession::poll_events`] or
//! the operation calls themselves. The history is exclusively owned here;
//! the engine reaches its placeholder only through the per-turn channel.

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::ingest::{IngestEngine, TurnEvent, TurnHandle};
use crate::message::{MessageBlock, MessageKind, MessageState, Sender};
use crate::protocol::TurnRequest;
use crate::upload::UploadStatus;

/// Why a send was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SendError {
    /// The message was empty after trimming
    #[error("message is empty")]
    EmptyMessage,
    /// A turn is already in flight; the single-slot handle is occupied
    #[error("a turn is already in flight")]
    TurnInFlight,
}

/// The turn in flight: its connection handle and event channel
struct ActiveTurn {
    handle: TurnHandle,
    events: mpsc::Receiver<TurnEvent>,
}

/// A chat conversation with the remote model
pub struct ChatSession {
    config: ChatConfig,
    engine: IngestEngine,
    messages: Vec<MessageBlock>,
    processing: bool,
    /// Join of the fragments received so far, for live rendering
    live_text: String,
    turn: Option<ActiveTurn>,
    upload_tx: mpsc::Sender<MessageBlock>,
    upload_rx: mpsc::Receiver<MessageBlock>,
}

impl ChatSession {
    /// Create a session against the configured endpoint
    #[must_use]
    pub fn new(config: ChatConfig) -> Self {
        let engine = IngestEngine::new(config.endpoint.clone());
        let (upload_tx, upload_rx) = mpsc::channel(config.event_capacity);
        Self {
            config,
            engine,
            messages: Vec::new(),
            processing: false,
            live_text: String::new(),
            turn: None,
            upload_tx,
            upload_rx,
        }
    }

    /// Send a user message and start streaming the bot reply.
    ///
    /// Appends a USER/TEXT/SENT block and a BOT/TEXT/PROCESSING placeholder,
    /// then binds a new ingest engine turn to that placeholder. The turn
    /// request carries the history as it stood before this send.
    ///
    /// # Errors
    ///
    /// [`SendError::EmptyMessage`] when the input trims to nothing;
    /// [`SendError::TurnInFlight`] while a previous turn is still
    /// processing.
    pub fn send_user_message(&mut self, text: &str) -> Result<(), SendError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyMessage);
        }
        if self.processing {
            return Err(SendError::TurnInFlight);
        }

        let request = TurnRequest::new(text, self.config.language.clone(), &self.messages);

        self.processing = true;
        self.messages.push(MessageBlock::user_text(text));
        self.messages.push(MessageBlock::bot_placeholder());
        self.live_text.clear();

        let (tx, rx) = mpsc::channel(self.config.event_capacity);
        let handle = self.engine.spawn(request, tx);
        self.turn = Some(ActiveTurn { handle, events: rx });

        debug!(prompt_len = text.len(), "turn started");
        Ok(())
    }

    /// Record a completed file upload and schedule the simulated bot reply.
    ///
    /// Appends a USER/FILE/SENT block immediately; after the configured
    /// delay a BOT/FILE/RECEIVED block with the status-mapped reply text is
    /// delivered through [`ChatSession::poll_events`]. This path never
    /// touches `processing` or the ingest engine.
    pub fn complete_file_upload(&mut self, file_name: &str, status: UploadStatus) {
        self.messages.push(MessageBlock::with_file(
            format!("File uploaded: {file_name}"),
            Sender::User,
            MessageKind::File,
            MessageState::Sent,
            file_name,
            status.status_line(),
        ));

        let reply = MessageBlock::with_file(
            status.reply_text(),
            Sender::Bot,
            MessageKind::File,
            MessageState::Received,
            file_name,
            status.status_line(),
        );
        let tx = self.upload_tx.clone();
        let delay = self.config.upload_reply_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(reply).await;
        });

        debug!(file_name, status = %status, "file upload recorded");
    }

    /// Drain and apply all pending events, non-blockingly.
    ///
    /// Returns the number of events applied.
    pub fn poll_events(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(active) = self.turn.as_mut() {
            while let Ok(event) = active.events.try_recv() {
                pending.push(event);
            }
        }

        let mut applied = pending.len();
        for event in pending {
            self.apply_turn_event(event);
        }

        while let Ok(block) = self.upload_rx.try_recv() {
            self.messages.push(block);
            applied += 1;
        }

        applied
    }

    fn apply_turn_event(&mut self, event: TurnEvent) {
        match event {
            TurnEvent::Started => {
                self.live_text.clear();
            }
            TurnEvent::Delta { fragment } => {
                self.live_text.push_str(&fragment);
            }
            TurnEvent::Finished { message } => {
                match self.messages.iter_mut().find(|m| m.is_processing()) {
                    Some(placeholder) => {
                        placeholder.finish(message);
                    }
                    None => warn!("turn finished with no processing placeholder"),
                }
                self.live_text.clear();
                self.processing = false;
                self.turn = None;
                debug!("turn finished");
            }
            TurnEvent::TransportError { error } => {
                // Observed only: the placeholder stays in Processing and no
                // state is mutated. A stream that errors without an end
                // frame leaves the turn in flight indefinitely.
                warn!(%error, "transport error during turn");
            }
        }
    }

    /// Tear down the in-flight turn, if any.
    ///
    /// Closes the connection without committing partial text; the
    /// placeholder is left in `Processing`.
    pub fn abandon_turn(&mut self) {
        if self.turn.take().is_some() {
            debug!("in-flight turn abandoned");
        }
    }

    /// Clear the whole conversation, abandoning any in-flight turn
    pub fn clear(&mut self) {
        self.abandon_turn();
        self.messages.clear();
        self.live_text.clear();
        self.processing = false;
    }

    /// The ordered conversation history
    #[must_use]
    pub fn messages(&self) -> &[MessageBlock] {
        &self.messages
    }

    /// Whether a turn is in flight (renderers treat the input surface as
    /// send-disabled while true)
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// The partial reply accumulated so far, for live rendering.
    ///
    /// Empty outside an in-flight turn; the finished text lives in the
    /// promoted message block.
    #[must_use]
    pub fn live_text(&self) -> &str {
        &self.live_text
    }

    /// The session configuration
    #[must_use]
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn test_config() -> ChatConfig {
        // Nothing listens on port 9; sends fail fast with a transport error.
        ChatConfig::default()
            .with_endpoint("ws://127.0.0.1:9")
            .with_upload_reply_delay(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let mut session = ChatSession::new(test_config());
        assert_eq!(session.send_user_message(""), Err(SendError::EmptyMessage));
        assert_eq!(
            session.send_user_message("   \n"),
            Err(SendError::EmptyMessage)
        );
        assert!(session.messages().is_empty());
        assert!(!session.is_processing());
    }

    #[tokio::test]
    async fn test_send_appends_user_and_placeholder() {
        let mut session = ChatSession::new(test_config());
        session.send_user_message("Hello").unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message, "Hello");
        assert_eq!(messages[0].sent_by, Sender::User);
        assert_eq!(messages[0].state, MessageState::Sent);
        assert_eq!(messages[1].message, "");
        assert_eq!(messages[1].sent_by, Sender::Bot);
        assert_eq!(messages[1].state, MessageState::Processing);
        assert!(session.is_processing());
    }

    #[tokio::test]
    async fn test_send_while_in_flight_rejected() {
        let mut session = ChatSession::new(test_config());
        session.send_user_message("first").unwrap();
        assert_eq!(
            session.send_user_message("second"),
            Err(SendError::TurnInFlight)
        );
        // History untouched by the rejected send
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let mut session = ChatSession::new(test_config());
        session.send_user_message("  Hello  ").unwrap();
        assert_eq!(session.messages()[0].message, "Hello");
    }

    #[tokio::test]
    async fn test_transport_error_leaves_turn_in_flight() {
        let mut session = ChatSession::new(test_config());
        session.send_user_message("Hello").unwrap();

        // Wait for the refused connection to surface its event.
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.poll_events();

        assert!(session.is_processing());
        assert!(session.messages()[1].is_processing());
    }

    #[tokio::test]
    async fn test_upload_round_trip() {
        let mut session = ChatSession::new(test_config());
        session.complete_file_upload("report.pdf", UploadStatus::SizeLimitExceeded);

        // The user block appears immediately; the reply waits for the delay.
        assert_eq!(session.messages().len(), 1);
        let user = &session.messages()[0];
        assert_eq!(user.message, "File uploaded: report.pdf");
        assert_eq!(user.kind, MessageKind::File);
        assert_eq!(user.state, MessageState::Sent);
        assert!(!session.is_processing());

        tokio::time::sleep(Duration::from_millis(50)).await;
        session.poll_events();

        assert_eq!(session.messages().len(), 2);
        let reply = &session.messages()[1];
        assert_eq!(
            reply.message,
            "File size limit exceeded. Please upload a smaller file."
        );
        assert_eq!(reply.sent_by, Sender::Bot);
        assert_eq!(reply.state, MessageState::Received);
        assert_eq!(reply.file_name.as_deref(), Some("report.pdf"));
        assert!(!session.is_processing());
    }

    #[tokio::test]
    async fn test_upload_success_reply() {
        let mut session = ChatSession::new(test_config());
        session.complete_file_upload("notes.txt", UploadStatus::PageCheckPassed);

        tokio::time::sleep(Duration::from_millis(50)).await;
        session.poll_events();

        assert_eq!(session.messages()[1].message, "Checking file size.");
    }

    #[tokio::test]
    async fn test_abandon_leaves_placeholder_processing() {
        let mut session = ChatSession::new(test_config());
        session.send_user_message("Hello").unwrap();
        session.abandon_turn();

        // No partial commit: the placeholder stays in Processing and the
        // flag stays up, matching teardown semantics.
        assert!(session.is_processing());
        assert!(session.messages()[1].is_processing());
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let mut session = ChatSession::new(test_config());
        session.send_user_message("Hello").unwrap();
        session.clear();

        assert!(session.messages().is_empty());
        assert!(!session.is_processing());
        assert!(session.live_text().is_empty());

        // A fresh send is accepted again.
        session.send_user_message("again").unwrap();
        assert_eq!(session.messages().len(), 2);
    }
}
