//! Turn Accumulator
//!
//! Collects the delta fragments of one bot turn in delivery order. A start
//! frame resets the sequence, an end frame yields the join of everything
//! received since the last start. The accumulated text at any point is the
//! concatenation of the fragments so far.

use crate::protocol::StreamFrame;

/// Result of applying one frame to the accumulator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A new turn began; prior fragments were discarded
    Started,
    /// A fragment was appended
    Appended {
        /// The fragment that arrived
        fragment: String,
    },
    /// The turn completed with the fully reassembled text
    Finished {
        /// Concatenation of all fragments in delivery order
        message: String,
    },
    /// The frame carried no meaning for this turn
    Ignored,
}

/// Ordered fragment sequence for the turn in flight
#[derive(Debug, Default)]
pub struct TurnAccumulator {
    fragments: Vec<String>,
}

impl TurnAccumulator {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one parsed frame
    pub fn apply(&mut self, frame: StreamFrame) -> FrameOutcome {
        match frame {
            StreamFrame::Start => {
                self.fragments.clear();
                FrameOutcome::Started
            }
            StreamFrame::Delta { text } => {
                self.fragments.push(text.clone());
                FrameOutcome::Appended { fragment: text }
            }
            StreamFrame::End => {
                let message = std::mem::take(&mut self.fragments).concat();
                FrameOutcome::Finished { message }
            }
            StreamFrame::Unknown => FrameOutcome::Ignored,
        }
    }

    /// The current accumulated text (join of fragments so far)
    #[must_use]
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    /// Number of fragments received since the last start
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }
}
