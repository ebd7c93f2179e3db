//! Append-only transcript accumulation.

use super::message::TranscriptTurn;

/// Accumulates role-tagged turns in strict arrival order.
///
/// Turns are never reordered, deduplicated, or mutated after insertion;
/// the only mutations are appending a turn and clearing the whole
/// transcript for a fresh call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptRecorder {
    turns: Vec<TranscriptTurn>,
}

impl TranscriptRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one turn at the end of the transcript.
    pub fn record(&mut self, turn: TranscriptTurn) {
        self.turns.push(turn);
    }

    /// The recorded turns, oldest first.
    pub fn turns(&self) -> &[TranscriptTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Consumes the recorder, yielding the ordered turns.
    pub fn into_turns(self) -> Vec<TranscriptTurn> {
        self.turns
    }

    /// Drops all recorded turns for a fresh call.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
