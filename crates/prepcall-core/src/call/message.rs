//! Transcript turn types.
//!
//! This module contains types for representing the turns of a call
//! transcript, including roles and turn content.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the speaker of a turn in a call transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Turn spoken by the user.
    User,
    /// Turn spoken by the AI interviewer.
    Assistant,
    /// System-generated turn.
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        };
        f.write_str(name)
    }
}

/// A single role-tagged utterance in a call transcript.
///
/// Turns are immutable once recorded; the recorder only ever appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    /// The speaker of this turn.
    pub role: MessageRole,
    /// The transcribed text.
    pub content: String,
}

impl TranscriptTurn {
    /// Creates a new turn.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}
