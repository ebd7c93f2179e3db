//! Interview generation pipeline.
//!
//! A linear two-step chain: extract structured interview parameters from
//! a transcript, then generate the question list, then persist. The two
//! LLM round-trips are strictly sequential - the second prompt depends on
//! the first's parsed output - and nothing here retries.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use prepcall_core::PrepcallError;
use prepcall_core::call::TranscriptTurn;
use prepcall_core::interview::{InterviewRecord, InterviewRepository, random_cover};
use prepcall_interaction::{AgentError, TextAgent};

use crate::prompts;

/// Failure kinds of the generation pipeline.
///
/// The HTTP layer maps each kind onto a status code and response body.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The transcript was empty; there is nothing to extract from.
    #[error("Missing or invalid messages array.")]
    EmptyTranscript,

    /// One of the extracted fields (or the user id) was missing or empty.
    #[error("Missing required fields.")]
    MissingFields,

    /// An LLM response could not be parsed as the expected JSON shape.
    #[error("Failed to parse AI response as JSON.")]
    ResponseParse {
        /// The raw offending text, for diagnosis.
        raw: String,
    },

    /// The LLM call itself failed.
    #[error("LLM request failed: {0}")]
    Agent(#[from] AgentError),

    /// The assembled record could not be persisted.
    #[error("Failed to store interview: {0}")]
    Store(#[source] PrepcallError),
}

/// Runs the transcript-to-interview pipeline.
pub struct GenerationService {
    agent: Arc<dyn TextAgent>,
    interviews: Arc<dyn InterviewRepository>,
}

impl GenerationService {
    /// Creates a new `GenerationService` instance.
    pub fn new(agent: Arc<dyn TextAgent>, interviews: Arc<dyn InterviewRepository>) -> Self {
        Self { agent, interviews }
    }

    /// Turns a finished call transcript into a persisted interview record.
    ///
    /// Steps: render the transcript into the extraction prompt, call the
    /// LLM, normalize and parse the JSON object, validate the five fields
    /// plus the user id, call the LLM again for the question list, parse
    /// it, assemble the record and persist it.
    pub async fn generate_interview(
        &self,
        turns: &[TranscriptTurn],
        user_id: &str,
    ) -> Result<InterviewRecord, GenerationError> {
        if turns.is_empty() {
            return Err(GenerationError::EmptyTranscript);
        }

        let extraction = self.agent.generate(&prompts::extraction_prompt(turns)).await?;
        let cleaned = strip_code_fence(&extraction);
        let fields: Value = serde_json::from_str(&cleaned).map_err(|err| {
            tracing::warn!(error = %err, "first-step LLM response was not valid JSON");
            GenerationError::ResponseParse { raw: extraction }
        })?;

        let extracted = (
            non_empty_field(&fields, "type"),
            non_empty_field(&fields, "role"),
            non_empty_field(&fields, "level"),
            non_empty_field(&fields, "techstack"),
            non_empty_field(&fields, "amount"),
        );
        let (Some(interview_type), Some(role), Some(level), Some(techstack), Some(amount)) =
            extracted
        else {
            return Err(GenerationError::MissingFields);
        };
        if user_id.trim().is_empty() {
            return Err(GenerationError::MissingFields);
        }

        let tech_stack: Vec<String> = techstack
            .split(',')
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        if tech_stack.is_empty() {
            return Err(GenerationError::MissingFields);
        }

        let questions_response = self
            .agent
            .generate(&prompts::question_prompt(
                &role,
                &level,
                &techstack,
                &interview_type,
                &amount,
            ))
            .await?;
        let cleaned_questions = strip_code_fence(&questions_response);
        let questions: Vec<String> = serde_json::from_str(&cleaned_questions).map_err(|err| {
            tracing::warn!(error = %err, "second-step LLM response was not a JSON array of strings");
            GenerationError::ResponseParse {
                raw: questions_response,
            }
        })?;

        let mut interview = InterviewRecord {
            id: None,
            role,
            interview_type,
            level,
            tech_stack,
            questions,
            user_id: user_id.to_string(),
            finalized: true,
            cover_image: random_cover(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let id = self
            .interviews
            .create(&interview)
            .await
            .map_err(GenerationError::Store)?;
        interview.id = Some(id);

        tracing::info!(
            interview_id = interview.id.as_deref().unwrap_or_default(),
            role = %interview.role,
            "interview generated from call transcript"
        );
        Ok(interview)
    }
}

/// Removes a leading/trailing triple-backtick fence (with an optional
/// language tag) before parsing.
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim().to_string()
}

/// Reads a field as a non-empty string, also accepting JSON numbers (the
/// model sometimes returns `amount` unquoted).
fn non_empty_field(fields: &Value, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}
