//! HTTP adapter for PrepCall.
//!
//! Exposes the generation endpoint, the interview read surface, and the
//! call-session routes over axum. Handlers translate pipeline error kinds
//! into the response envelope; store errors on the list routes are logged
//! and collapsed into empty lists.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use prepcall_application::{
    CallSessionUseCase, GenerationError, GenerationService, Route as NavRoute, SessionResolution,
};
use prepcall_core::call::{SessionPurpose, TranscriptTurn, VoiceEvent};
use prepcall_core::interview::{DEFAULT_LATEST_LIMIT, InterviewRecord, InterviewRepository};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<GenerationService>,
    pub calls: Arc<CallSessionUseCase>,
    pub interviews: Arc<dyn InterviewRepository>,
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/vapi/generate",
            get(generate_probe).post(generate_interview),
        )
        .route("/api/interviews/latest", get(latest_interviews))
        .route("/api/interviews/:id", get(interview_by_id))
        .route("/api/users/:user_id/interviews", get(interviews_by_user))
        .route("/api/calls", post(start_call))
        .route("/api/calls/:id/events", post(call_event))
        .route("/api/calls/:id/end", post(end_call))
        .with_state(state)
}

/// Response envelope of the generation endpoint.
#[derive(Debug, Serialize, PartialEq)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl GenerateResponse {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            raw: None,
        }
    }

    fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            raw: None,
        }
    }
}

async fn generate_probe() -> (StatusCode, Json<GenerateResponse>) {
    (
        StatusCode::OK,
        Json(GenerateResponse::ok(Value::String("Thank you.".to_string()))),
    )
}

async fn generate_interview(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<GenerateResponse>) {
    let Some(turns) = parse_messages(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(GenerateResponse::err("Missing or invalid messages array.")),
        );
    };
    let user_id = body.get("userid").and_then(Value::as_str).unwrap_or_default();

    match state.generation.generate_interview(&turns, user_id).await {
        Ok(interview) => match serde_json::to_value(&interview) {
            Ok(data) => (StatusCode::OK, Json(GenerateResponse::ok(data))),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize generated interview");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(GenerateResponse::err("Internal server error.")),
                )
            }
        },
        Err(err) => generation_error_response(err),
    }
}

/// Accepts the request body's `messages` only when it is a non-empty
/// array of well-formed turns.
fn parse_messages(body: &Value) -> Option<Vec<TranscriptTurn>> {
    let messages = body.get("messages")?.as_array()?;
    if messages.is_empty() {
        return None;
    }
    messages
        .iter()
        .map(|message| serde_json::from_value(message.clone()).ok())
        .collect()
}

fn generation_error_response(err: GenerationError) -> (StatusCode, Json<GenerateResponse>) {
    match err {
        GenerationError::EmptyTranscript => (
            StatusCode::BAD_REQUEST,
            Json(GenerateResponse::err("Missing or invalid messages array.")),
        ),
        GenerationError::MissingFields => (
            StatusCode::BAD_REQUEST,
            Json(GenerateResponse::err("Missing required fields.")),
        ),
        GenerationError::ResponseParse { raw } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GenerateResponse {
                success: false,
                data: None,
                error: Some("Failed to parse AI response as JSON.".to_string()),
                raw: Some(raw),
            }),
        ),
        other => {
            tracing::error!(error = %other, "generate endpoint failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenerateResponse::err("Internal server error.")),
            )
        }
    }
}

#[derive(Deserialize)]
struct LatestQuery {
    excluding: Option<String>,
    limit: Option<usize>,
}

async fn latest_interviews(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Json<Vec<InterviewRecord>> {
    let excluding = query.excluding.unwrap_or_default();
    let limit = query.limit.unwrap_or(DEFAULT_LATEST_LIMIT);

    match state.interviews.find_latest(&excluding, limit).await {
        Ok(interviews) => Json(interviews),
        Err(err) => {
            tracing::error!(error = %err, "failed to list latest interviews");
            Json(Vec::new())
        }
    }
}

async fn interviews_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<InterviewRecord>> {
    match state.interviews.find_by_user(&user_id).await {
        Ok(interviews) => Json(interviews),
        Err(err) => {
            tracing::error!(error = %err, user_id, "failed to list user interviews");
            Json(Vec::new())
        }
    }
}

async fn interview_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewRecord>, StatusCode> {
    match state.interviews.find_by_id(&id).await {
        Ok(Some(interview)) => Ok(Json(interview)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            tracing::error!(error = %err, id, "failed to fetch interview");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartCallRequest {
    purpose: SessionPurpose,
    user_name: String,
    user_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartCallResponse {
    session_id: String,
}

async fn start_call(
    State(state): State<AppState>,
    Json(request): Json<StartCallRequest>,
) -> Result<Json<StartCallResponse>, StatusCode> {
    match state
        .calls
        .start_session(request.purpose, &request.user_name, &request.user_id)
        .await
    {
        Ok(session_id) => Ok(Json(StartCallResponse { session_id })),
        Err(err) => {
            tracing::error!(error = %err, "failed to start call session");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

/// Body returned by the event and end routes.
#[derive(Debug, Serialize, PartialEq)]
struct ResolutionResponse {
    finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<NavRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interview: Option<InterviewRecord>,
}

impl From<Option<SessionResolution>> for ResolutionResponse {
    fn from(resolution: Option<SessionResolution>) -> Self {
        match resolution {
            Some(resolution) => Self {
                finished: true,
                route: Some(resolution.route),
                interview: resolution.interview,
            },
            None => Self {
                finished: false,
                route: None,
                interview: None,
            },
        }
    }
}

async fn call_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(event): Json<VoiceEvent>,
) -> Result<Json<ResolutionResponse>, StatusCode> {
    match state.calls.handle_event(&id, event).await {
        Ok(resolution) => Ok(Json(resolution.into())),
        Err(err) if err.is_not_found() => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            tracing::error!(error = %err, id, "failed to apply call event");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn end_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResolutionResponse>, StatusCode> {
    match state.calls.end_session(&id).await {
        Ok(resolution) => Ok(Json(resolution.into())),
        Err(err) if err.is_not_found() => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            tracing::error!(error = %err, id, "failed to end call session");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prepcall_application::{FeedbackService, UnconfiguredFeedbackCreator};
    use prepcall_core::Result as CoreResult;
    use prepcall_core::call::VoiceClient;
    use prepcall_infrastructure::MemoryInterviewRepository;
    use prepcall_interaction::{AgentError, TextAgent};
    use serde_json::json;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    struct ScriptedAgent {
        responses: Mutex<VecDeque<String>>,
    }

    impl ScriptedAgent {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl TextAgent for ScriptedAgent {
        async fn generate(&self, _prompt: &str) -> Result<String, AgentError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AgentError::ExecutionFailed("no scripted response left".into()))
        }
    }

    struct NullVoiceClient;

    #[async_trait]
    impl VoiceClient for NullVoiceClient {
        async fn start(
            &self,
            _workflow_id: &str,
            _bindings: &HashMap<String, String>,
        ) -> CoreResult<()> {
            Ok(())
        }

        async fn stop(&self) -> CoreResult<()> {
            Ok(())
        }
    }

    fn state(agent_responses: &[&str]) -> AppState {
        let interviews: Arc<dyn InterviewRepository> = Arc::new(MemoryInterviewRepository::new());
        let generation = Arc::new(GenerationService::new(
            Arc::new(ScriptedAgent::new(agent_responses)),
            interviews.clone(),
        ));
        let feedback = Arc::new(FeedbackService::new(Arc::new(UnconfiguredFeedbackCreator)));
        let calls = Arc::new(CallSessionUseCase::new(
            Arc::new(NullVoiceClient),
            Some("wf-1".to_string()),
            generation.clone(),
            feedback,
        ));
        AppState {
            generation,
            calls,
            interviews,
        }
    }

    const EXTRACTION: &str = r#"{"type":"technical","role":"Backend Engineer","level":"Senior","techstack":"rust, go","amount":"3"}"#;
    const QUESTIONS: &str = r#"["Why Rust?","Explain ownership."]"#;

    fn valid_body() -> Value {
        json!({
            "messages": [
                { "role": "assistant", "content": "What role?" },
                { "role": "user", "content": "Backend Engineer" },
            ],
            "userid": "u1",
        })
    }

    #[tokio::test]
    async fn probe_returns_the_liveness_body() {
        let (status, Json(body)) = generate_probe().await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        assert_eq!(body.data, Some(Value::String("Thank you.".to_string())));
    }

    #[tokio::test]
    async fn generate_succeeds_with_well_formed_llm_responses() {
        let state = state(&[EXTRACTION, QUESTIONS]);

        let (status, Json(body)) =
            generate_interview(State(state), Json(valid_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        let data = body.data.expect("interview payload");
        assert_eq!(data["type"], "technical");
        assert_eq!(data["techStack"], json!(["rust", "go"]));
        assert_eq!(data["finalized"], true);
    }

    #[tokio::test]
    async fn missing_messages_array_is_a_bad_request() {
        for body in [
            json!({ "userid": "u1" }),
            json!({ "messages": [], "userid": "u1" }),
            json!({ "messages": "not a list", "userid": "u1" }),
            json!({ "messages": [{ "role": "narrator", "content": "hm" }], "userid": "u1" }),
        ] {
            let state = state(&[EXTRACTION, QUESTIONS]);
            let (status, Json(response)) = generate_interview(State(state), Json(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                response.error.as_deref(),
                Some("Missing or invalid messages array.")
            );
        }
    }

    #[tokio::test]
    async fn unparseable_llm_output_returns_500_with_the_raw_text() {
        let state = state(&["definitely not json"]);

        let (status, Json(body)) =
            generate_interview(State(state), Json(valid_body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.error.as_deref(),
            Some("Failed to parse AI response as JSON.")
        );
        assert_eq!(body.raw.as_deref(), Some("definitely not json"));
    }

    #[tokio::test]
    async fn missing_extracted_fields_return_400() {
        let missing_level =
            r#"{"type":"technical","role":"Backend Engineer","techstack":"rust","amount":"3"}"#;
        let state = state(&[missing_level]);

        let (status, Json(body)) =
            generate_interview(State(state), Json(valid_body())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.as_deref(), Some("Missing required fields."));
    }

    #[tokio::test]
    async fn agent_failures_collapse_into_internal_server_error() {
        // An exhausted script makes the agent fail outright.
        let state = state(&[]);

        let (status, Json(body)) =
            generate_interview(State(state), Json(valid_body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error."));
        assert!(body.raw.is_none());
    }

    #[tokio::test]
    async fn interview_detail_distinguishes_absent_from_found() {
        let state = state(&[]);
        let id = state
            .interviews
            .create(&prepcall_core::interview::InterviewRecord {
                id: None,
                role: "SRE".to_string(),
                interview_type: "mixed".to_string(),
                level: "Mid".to_string(),
                tech_stack: vec!["go".to_string()],
                questions: vec!["Why Go?".to_string()],
                user_id: "u1".to_string(),
                finalized: true,
                cover_image: "/covers/skype.png".to_string(),
                created_at: "2025-06-01T10:00:00Z".to_string(),
            })
            .await
            .unwrap();

        let found = interview_by_id(State(state.clone()), Path(id)).await;
        assert!(found.is_ok());

        let missing = interview_by_id(State(state), Path("absent".to_string())).await;
        assert_eq!(missing.unwrap_err(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn call_routes_drive_a_session_end_to_end() {
        let state = state(&[EXTRACTION, QUESTIONS]);

        let Json(started) = start_call(
            State(state.clone()),
            Json(StartCallRequest {
                purpose: SessionPurpose::Generate,
                user_name: "Jane".to_string(),
                user_id: "u1".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(applied) = call_event(
            State(state.clone()),
            Path(started.session_id.clone()),
            Json(VoiceEvent::CallStart),
        )
        .await
        .unwrap();
        assert!(!applied.finished);

        call_event(
            State(state.clone()),
            Path(started.session_id.clone()),
            Json(serde_json::from_value(json!({
                "type": "transcript",
                "role": "user",
                "kind": "final",
                "text": "Backend Engineer",
            }))
            .unwrap()),
        )
        .await
        .unwrap();

        let Json(resolved) = call_event(
            State(state.clone()),
            Path(started.session_id.clone()),
            Json(VoiceEvent::CallEnd),
        )
        .await
        .unwrap();
        assert!(resolved.finished);
        assert_eq!(resolved.route, Some(NavRoute::Home));
        assert!(resolved.interview.is_some());

        // The session is gone afterwards.
        let gone = call_event(
            State(state),
            Path(started.session_id),
            Json(VoiceEvent::CallEnd),
        )
        .await;
        assert_eq!(gone.unwrap_err(), StatusCode::NOT_FOUND);
    }
}
