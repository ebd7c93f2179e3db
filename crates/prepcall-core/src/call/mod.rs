//! Call session domain module.
//!
//! This module contains the transcript types, the voice-platform event
//! model, the call-session state machine, and the heuristic transcript
//! extractor.
//!
//! # Module Structure
//!
//! - `message`: transcript turn types (`MessageRole`, `TranscriptTurn`)
//! - `transcript`: append-only turn accumulation (`TranscriptRecorder`)
//! - `event`: platform event model (`VoiceEvent`, `TranscriptKind`)
//! - `controller`: the call state machine (`CallSessionController`)
//! - `extract`: heuristic field extraction (`extract_interview_info`)

mod controller;
mod event;
mod extract;
mod message;
mod transcript;

// Re-export public API
pub use controller::{
    CallHandoff, CallSessionController, CallStatus, SessionPurpose, VoiceClient,
};
pub use event::{TranscriptKind, VoiceEvent};
pub use extract::{ExtractedInterviewInfo, extract_interview_info};
pub use message::{MessageRole, TranscriptTurn};
pub use transcript::TranscriptRecorder;
