use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use prepcall_application::{
    CallSessionUseCase, FeedbackService, GenerationService, UnconfiguredFeedbackCreator,
};
use prepcall_core::call::VoiceClient;
use prepcall_core::interview::InterviewRepository;
use prepcall_infrastructure::{AppConfig, FirestoreInterviewRepository};
use prepcall_interaction::{DEFAULT_GEMINI_MODEL, GeminiTextAgent, VapiVoiceClient};
use prepcall_server::{AppState, router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    if config.vapi.workflow_id.is_none() {
        tracing::warn!("VAPI_WORKFLOW_ID is not set; call initiation will be refused");
    }

    let model = config
        .gemini
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
    let agent = GeminiTextAgent::new(config.gemini.api_key.clone(), model);

    let interviews: Arc<dyn InterviewRepository> = Arc::new(FirestoreInterviewRepository::new(
        config.firestore.project_id.clone(),
        config.firestore.access_token.clone(),
    ));
    let voice: Arc<dyn VoiceClient> = Arc::new(VapiVoiceClient::new(config.vapi.api_key.clone()));

    let generation = Arc::new(GenerationService::new(Arc::new(agent), interviews.clone()));
    let feedback = Arc::new(FeedbackService::new(Arc::new(UnconfiguredFeedbackCreator)));
    let calls = Arc::new(CallSessionUseCase::new(
        voice,
        config.vapi.workflow_id.clone(),
        generation.clone(),
        feedback,
    ));

    let app = router(AppState {
        generation,
        calls,
        interviews,
    });

    tracing::info!(addr = %config.bind_addr, "prepcall server listening");
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
