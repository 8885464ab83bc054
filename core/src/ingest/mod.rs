//! Streaming Ingest
//!
//! Owns the connection lifecycle for a single bot turn: buffering and
//! parsing of fragmented frames ([`FrameBuffer`]), accumulation of delta
//! fragments ([`TurnAccumulator`]), and the connection-owning engine that
//! ties them to a live WebSocket ([`IngestEngine`]).

mod accumulator;
mod buffer;
mod engine;

pub use accumulator::{FrameOutcome, TurnAccumulator};
pub use buffer::{FeedOutcome, FrameBuffer};
pub use engine::{drive_stream, IngestEngine, TurnEvent, TurnHandle};
