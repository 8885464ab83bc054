//! Message Model
//!
//! The canonical representation of one conversation turn. The session owns an
//! ordered list of these blocks; renderers display them and never mutate them.
//!
//! # Lifecycle
//!
//! - USER blocks are created directly in a terminal state (`Sent` or
//!   `Received`) and never change afterwards.
//! - A BOT text block is created in `Processing` as a placeholder for an
//!   in-flight turn and transitions exactly once, to `Finished`, when the
//!   ingest engine delivers the reassembled reply.
//! - FILE blocks are appended by the upload collaborator and are terminal on
//!   creation.

use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The human user
    User,
    /// The remote conversational model
    Bot,
}

/// What kind of content a message carries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Plain conversational text
    Text,
    /// A file-upload round trip (upload notice or upload reply)
    File,
}

/// Lifecycle state of a message block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageState {
    /// User message delivered to the session (terminal)
    Sent,
    /// Bot placeholder waiting for the streamed reply
    Processing,
    /// Bot reply fully reassembled (terminal)
    Finished,
    /// Bot file-upload reply (terminal)
    Received,
}

impl MessageState {
    /// Check whether this state can still change
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

/// One turn in the conversation history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBlock {
    /// The message text
    pub message: String,
    /// Who sent this message
    pub sent_by: Sender,
    /// Content kind
    pub kind: MessageKind,
    /// Current lifecycle state
    pub state: MessageState,
    /// File name, for FILE blocks
    pub file_name: Option<String>,
    /// Upload outcome line, for FILE blocks
    pub file_status: Option<String>,
}

impl MessageBlock {
    /// Create a text message block
    ///
    /// Pure construction: no validation beyond the closed enum sets.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        sent_by: Sender,
        kind: MessageKind,
        state: MessageState,
    ) -> Self {
        Self {
            message: message.into(),
            sent_by,
            kind,
            state,
            file_name: None,
            file_status: None,
        }
    }

    /// Create a message block carrying file metadata
    #[must_use]
    pub fn with_file(
        message: impl Into<String>,
        sent_by: Sender,
        kind: MessageKind,
        state: MessageState,
        file_name: impl Into<String>,
        file_status: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            sent_by,
            kind,
            state,
            file_name: Some(file_name.into()),
            file_status: Some(file_status.into()),
        }
    }

    /// Create a sent user text block
    #[must_use]
    pub fn user_text(message: impl Into<String>) -> Self {
        Self::new(message, Sender::User, MessageKind::Text, MessageState::Sent)
    }

    /// Create the empty bot placeholder for an in-flight turn
    #[must_use]
    pub fn bot_placeholder() -> Self {
        Self::new(
            String::new(),
            Sender::Bot,
            MessageKind::Text,
            MessageState::Processing,
        )
    }

    /// Check whether this block is the in-flight placeholder
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.state == MessageState::Processing
    }

    /// Promote the placeholder to `Finished`, replacing its text wholesale.
    ///
    /// Only applies to a block in `Processing`; returns whether the
    /// promotion happened. No other field changes.
    pub fn finish(&mut self, message: impl Into<String>) -> bool {
        if self.state != MessageState::Processing {
            return false;
        }
        self.message = message.into();
        self.state = MessageState::Finished;
        true
    }
}
