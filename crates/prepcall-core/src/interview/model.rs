//! Interview and feedback record models.

use serde::{Deserialize, Serialize};

use crate::call::TranscriptTurn;

/// A generated interview, persisted in the interview collection.
///
/// Created exactly once by the generation pipeline and immutable
/// thereafter. `tech_stack` is derived from a comma-delimited string and
/// is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    /// Document id assigned by the store; `None` before the first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Job role the interview targets.
    pub role: String,
    /// Interview focus: technical, behavioral, or mixed.
    #[serde(rename = "type")]
    pub interview_type: String,
    /// Job experience level.
    pub level: String,
    pub tech_stack: Vec<String>,
    pub questions: Vec<String>,
    /// Owning user.
    pub user_id: String,
    /// Complete and eligible for listing feeds.
    pub finalized: bool,
    pub cover_image: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Input handed to the feedback-creation collaborator.
///
/// Fields beyond these three are the collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptTurn>,
}

/// Result reported by the feedback-creation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interview_record_uses_the_original_wire_names() {
        let record = InterviewRecord {
            id: None,
            role: "Backend Engineer".to_string(),
            interview_type: "technical".to_string(),
            level: "Senior".to_string(),
            tech_stack: vec!["rust".to_string()],
            questions: vec!["Why Rust?".to_string()],
            user_id: "u1".to_string(),
            finalized: true,
            cover_image: "/covers/quora.png".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "technical");
        assert_eq!(json["techStack"][0], "rust");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["coverImage"], "/covers/quora.png");
        assert_eq!(json["createdAt"], "2025-01-01T00:00:00Z");
        assert!(json.get("id").is_none());
    }
}
