//! Wire Protocol
//!
//! Shapes exchanged with the remote endpoint over the streaming connection:
//! the outbound turn request (sent once per turn, immediately after
//! connection establishment) and the inbound stream frames that carry the
//! reply incrementally.
//!
//! The endpoint speaks two dialects for turn boundaries (`start`/`end` and
//! `content_block_start`/`content_block_stop`); both map onto the same frame
//! variants here.

use serde::{Deserialize, Serialize};

use crate::message::MessageBlock;

/// Action identifier carried by every outbound turn request
pub const SEND_MESSAGE_ACTION: &str = "sendMessage";

/// One structured unit received over the streaming connection
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum StreamFrame {
    /// A new turn begins; any previously accumulated text is discarded
    #[serde(rename = "start", alias = "content_block_start")]
    Start,
    /// An incremental text fragment of the current turn
    #[serde(rename = "delta")]
    Delta {
        /// The fragment text (empty when the field is absent)
        #[serde(default)]
        text: String,
    },
    /// The turn is complete
    #[serde(rename = "end", alias = "content_block_stop")]
    End,
    /// Structurally valid input with an unrecognized `type`; ignored
    #[serde(other)]
    Unknown,
}

/// One prior `{user, bot}` turn pair sent as conversation context
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPair {
    /// The user's side of the turn
    pub user: String,
    /// The bot's reply
    pub bot: String,
}

/// The outbound request object, sent once per turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    /// Action identifier (always [`SEND_MESSAGE_ACTION`])
    pub action: String,
    /// The new user prompt
    pub prompt: String,
    /// Locale/language tag (default "auto")
    pub language: String,
    /// Prior turns, paired user/bot
    pub chat_history: Vec<TurnPair>,
}

impl TurnRequest {
    /// Build a request for a new prompt against the prior history.
    ///
    /// The history must be the conversation as it stood *before* the new
    /// user turn was appended.
    #[must_use]
    pub fn new(prompt: impl Into<String>, language: impl Into<String>, history: &[MessageBlock]) -> Self {
        Self {
            action: SEND_MESSAGE_ACTION.to_string(),
            prompt: prompt.into(),
            language: language.into(),
            chat_history: pair_history(history),
        }
    }
}

/// Pair the history into `{user, bot}` turns.
///
/// Walks the list two elements at a time, assuming strict USER/BOT
/// alternation. A trailing unmatched element is silently dropped.
#[must_use]
pub fn pair_history(history: &[MessageBlock]) -> Vec<TurnPair> {
    history
        .chunks_exact(2)
        .map(|pair| TurnPair {
            user: pair[0].message.clone(),
            bot: pair[1].message.clone(),
        })
        .collect()
}
