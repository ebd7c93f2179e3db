//! Voice platform event model.
//!
//! Re-expresses the platform SDK's fire-and-forget callbacks as a typed
//! event enum, so the state machine can be driven without a live or
//! mocked event emitter.

use serde::{Deserialize, Serialize};

use super::message::MessageRole;

/// Whether a transcript event carries interim or final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptKind {
    /// Interim recognition result, subject to change.
    Partial,
    /// Final recognition result for one utterance.
    Final,
}

/// Events delivered by the voice platform for one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceEvent {
    /// The call has connected.
    CallStart,
    /// The call has ended on the platform side.
    CallEnd,
    /// The interviewer started speaking.
    SpeechStart,
    /// The interviewer stopped speaking.
    SpeechEnd,
    /// A transcript fragment for one utterance.
    Transcript {
        role: MessageRole,
        kind: TranscriptKind,
        text: String,
    },
    /// The platform reported an error; the call is over.
    Error { message: String },
}
