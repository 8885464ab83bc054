//! Wirechat Core - Streaming Chat Client Engine
//!
//! This crate is the streaming ingestion and message-lifecycle core of the
//! wirechat client: one logical bot reply, delivered as an unbounded
//! sequence of partial frames over a WebSocket, is buffered, reassembled,
//! and atomically promoted into a stable conversation history. UI surfaces
//! are passive renderers of that history.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      ChatSession                          │
//! │   messages: Vec<MessageBlock>      processing: bool       │
//! │        ▲                                 ▲                │
//! │        │ apply (poll_events)             │                │
//! │   ┌────┴─────────────┐        ┌──────────┴───────────┐   │
//! │   │  TurnEvent chan  │        │  upload reply chan   │   │
//! │   └────▲─────────────┘        └──────────▲───────────┘   │
//! └────────┼─────────────────────────────────┼───────────────┘
//!          │                                 │
//!   ┌──────┴────────┐                 ┌──────┴────────┐
//!   │ IngestEngine  │                 │ delayed reply │
//!   │ (one / turn)  │                 │     task      │
//!   │ FrameBuffer → │                 └───────────────┘
//!   │ TurnAccumulator
//!   └──────▲────────┘
//!          │ frames (possibly fragmented)
//!    remote model endpoint (WebSocket)
//! ```
//!
//! # Key Types
//!
//! - [`ChatSession`]: message list, `processing` flag, send/upload surface
//! - [`MessageBlock`]: one conversation turn and its lifecycle
//! - [`IngestEngine`] / [`TurnHandle`]: one owned connection per turn
//! - [`FrameBuffer`]: incomplete→wait / invalid→drop reassembly policy
//! - [`StreamFrame`] / [`TurnRequest`]: the wire protocol
//!
//! # Quick Start
//!
//! ```ignore
//! use wirechat_core::{ChatConfig, ChatSession};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut session = ChatSession::new(ChatConfig::from_env());
//!     session.send_user_message("Hello").unwrap();
//!
//!     while session.is_processing() {
//!         session.poll_events();
//!         // render session.messages() and session.live_text()
//!         tokio::time::sleep(std::time::Duration::from_millis(25)).await;
//!     }
//! }
//! ```
//!
//! # No UI Dependencies
//!
//! This crate has zero dependencies on any UI framework. Renderers,
//! file-upload widgets, voice input, and prompt-suggestion panels consume
//! the message list and the `processing` flag through [`ChatSession`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod ingest;
pub mod message;
pub mod protocol;
pub mod session;
pub mod upload;

pub use config::ChatConfig;
pub use ingest::{
    drive_stream, FeedOutcome, FrameBuffer, FrameOutcome, IngestEngine, TurnAccumulator,
    TurnEvent, TurnHandle,
};
pub use message::{MessageBlock, MessageKind, MessageState, Sender};
pub use protocol::{pair_history, StreamFrame, TurnPair, TurnRequest, SEND_MESSAGE_ACTION};
pub use session::{ChatSession, SendError};
pub use upload::UploadStatus;
