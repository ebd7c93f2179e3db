//! Application use cases for PrepCall.
//!
//! Orchestrates the domain layer against the outbound clients: the
//! interview generation pipeline, the feedback dispatch, and the live
//! call-session registry.

pub mod call_usecase;
pub mod feedback;
pub mod generation;
pub mod prompts;

// Re-export public API
pub use call_usecase::{CallSessionUseCase, SessionResolution};
pub use feedback::{FeedbackCreator, FeedbackService, Route, UnconfiguredFeedbackCreator};
pub use generation::{GenerationError, GenerationService, strip_code_fence};
