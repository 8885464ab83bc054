//! Frame Buffer
//!
//! Frames may arrive fragmented at arbitrary byte boundaries because the
//! transport delivers a raw text stream, not a framed message protocol. The
//! buffer appends every delivery and re-attempts a whole-buffer parse each
//! time: the simplest correct strategy when frame boundaries are not
//! otherwise signaled, acceptable because turns are short-lived and bounded.
//!
//! Error policy:
//! - parse failed because the input ends early: incomplete, keep the buffer
//!   and wait for more data (the normal case for a split frame);
//! - parse failed for any other structural reason: invalid, discard the
//!   buffer and resynchronize rather than crash;
//! - parse succeeded: clear the buffer and hand the frame up.

use crate::protocol::StreamFrame;

/// Result of feeding one delivery into the buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The buffer parsed as one complete frame; the buffer was cleared
    Frame(StreamFrame),
    /// The buffer is an incomplete prefix; retained for the next delivery
    Incomplete,
    /// The buffer was structurally invalid and has been discarded
    Invalid {
        /// Parser diagnostic for logging
        error: String,
    },
}

/// Growing buffer of raw deliveries awaiting a parseable frame
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: String,
}

impl FrameBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delivery and attempt to parse the entire buffer as one frame
    pub fn feed(&mut self, chunk: &str) -> FeedOutcome {
        self.buf.push_str(chunk);
        match serde_json::from_str::<StreamFrame>(&self.buf) {
            Ok(frame) => {
                self.buf.clear();
                FeedOutcome::Frame(frame)
            }
            Err(e) if e.is_eof() => FeedOutcome::Incomplete,
            Err(e) => {
                self.buf.clear();
                FeedOutcome::Invalid {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Current number of buffered bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check whether the buffer holds no pending data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop any pending data
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
