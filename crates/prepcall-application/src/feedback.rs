//! Feedback dispatch for practice interviews.
//!
//! The feedback content itself is produced by an external collaborator;
//! this module only supplies the interview id, the owning user and the
//! transcript, then interprets the result to pick a navigation target.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use prepcall_core::Result;
use prepcall_core::call::TranscriptTurn;
use prepcall_core::interview::{CreateFeedbackOutcome, FeedbackRequest};

/// Out-of-scope collaborator that turns a transcript into feedback.
#[async_trait]
pub trait FeedbackCreator: Send + Sync {
    /// Creates feedback for one finished practice interview.
    async fn create_feedback(&self, request: &FeedbackRequest) -> Result<CreateFeedbackOutcome>;
}

/// Navigation target decided after a call finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    /// The feedback page of a finished practice interview.
    InterviewFeedback {
        #[serde(rename = "interviewId")]
        interview_id: String,
    },
    /// Fallback landing page.
    Home,
}

/// Dispatches finished practice transcripts to the feedback creator.
pub struct FeedbackService {
    creator: Arc<dyn FeedbackCreator>,
}

impl FeedbackService {
    /// Creates a new `FeedbackService` instance.
    pub fn new(creator: Arc<dyn FeedbackCreator>) -> Self {
        Self { creator }
    }

    /// Hands the transcript to the feedback creator and picks the route.
    ///
    /// Creator failures are logged and collapse into the home route; no
    /// error reaches the caller.
    pub async fn submit(
        &self,
        interview_id: &str,
        user_id: &str,
        turns: Vec<TranscriptTurn>,
    ) -> Route {
        let request = FeedbackRequest {
            interview_id: interview_id.to_string(),
            user_id: user_id.to_string(),
            transcript: turns,
        };

        match self.creator.create_feedback(&request).await {
            Ok(outcome) if outcome.success => Route::InterviewFeedback {
                interview_id: request.interview_id,
            },
            Ok(_) => Route::Home,
            Err(err) => {
                tracing::error!(error = %err, interview_id, "feedback creation failed");
                Route::Home
            }
        }
    }
}

/// Placeholder creator used until a feedback backend is wired in.
///
/// Always reports failure, which routes the user to the home page.
pub struct UnconfiguredFeedbackCreator;

#[async_trait]
impl FeedbackCreator for UnconfiguredFeedbackCreator {
    async fn create_feedback(&self, request: &FeedbackRequest) -> Result<CreateFeedbackOutcome> {
        tracing::warn!(
            interview_id = %request.interview_id,
            "no feedback creator configured; dropping transcript"
        );
        Ok(CreateFeedbackOutcome {
            success: false,
            feedback_id: None,
        })
    }
}
