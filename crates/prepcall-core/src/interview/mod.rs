//! Interview domain module.
//!
//! Contains the interview/feedback record models, the cover-image
//! chooser, and the repository interface for the persistence gateway.

mod cover;
mod model;
mod repository;

// Re-export public API
pub use cover::random_cover;
pub use model::{CreateFeedbackOutcome, FeedbackRequest, InterviewRecord};
pub use repository::{DEFAULT_LATEST_LIMIT, InterviewRepository};
