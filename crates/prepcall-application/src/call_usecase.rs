//! Live call-session registry and finish hand-off.
//!
//! Owns the in-memory `CallSessionController` instances, applies platform
//! events one at a time, and on termination drives either the generation
//! pipeline or the feedback dispatch with the accumulated turns.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use prepcall_core::call::{
    CallHandoff, CallSessionController, SessionPurpose, VoiceClient, VoiceEvent,
};
use prepcall_core::interview::InterviewRecord;
use prepcall_core::{PrepcallError, Result};

use crate::feedback::{FeedbackService, Route};
use crate::generation::GenerationService;

/// What the caller should do once a session has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResolution {
    pub route: Route,
    /// The generated interview, when the session's purpose produced one.
    pub interview: Option<InterviewRecord>,
}

/// Manages the live call sessions and their lifecycle.
///
/// Sessions live in memory only; each owns its turn sequence exclusively,
/// and events are applied under the registry's write lock, one at a time
/// in arrival order.
pub struct CallSessionUseCase {
    /// In-memory session registry
    sessions: Arc<RwLock<HashMap<String, CallSessionController>>>,
    voice: Arc<dyn VoiceClient>,
    /// Workflow to start calls against; absence blocks call initiation.
    workflow_id: Option<String>,
    generation: Arc<GenerationService>,
    feedback: Arc<FeedbackService>,
}

impl CallSessionUseCase {
    /// Creates a new `CallSessionUseCase` instance.
    pub fn new(
        voice: Arc<dyn VoiceClient>,
        workflow_id: Option<String>,
        generation: Arc<GenerationService>,
        feedback: Arc<FeedbackService>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            voice,
            workflow_id,
            generation,
            feedback,
        }
    }

    /// Creates a session and issues the platform start command.
    ///
    /// With no workflow configured the session is registered but stays
    /// `Inactive`; the controller logs the diagnostic.
    pub async fn start_session(
        &self,
        purpose: SessionPurpose,
        user_name: &str,
        user_id: &str,
    ) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        let mut controller = CallSessionController::new(purpose, user_name, user_id);
        controller
            .start_call(self.voice.as_ref(), self.workflow_id.as_deref())
            .await?;

        self.sessions
            .write()
            .await
            .insert(session_id.clone(), controller);
        Ok(session_id)
    }

    /// Applies one platform event to a session.
    ///
    /// Returns a resolution exactly when the event finished the call.
    pub async fn handle_event(
        &self,
        session_id: &str,
        event: VoiceEvent,
    ) -> Result<Option<SessionResolution>> {
        let handoff = {
            let mut sessions = self.sessions.write().await;
            let controller = sessions
                .get_mut(session_id)
                .ok_or_else(|| PrepcallError::not_found("call session", session_id))?;

            let handoff = controller.handle_event(event);
            if handoff.is_some() {
                sessions.remove(session_id);
            }
            handoff
        };

        match handoff {
            Some(handoff) => Ok(Some(self.resolve(session_id, handoff).await)),
            None => Ok(None),
        }
    }

    /// Ends a session on the user's request.
    pub async fn end_session(&self, session_id: &str) -> Result<Option<SessionResolution>> {
        let handoff = {
            let mut sessions = self.sessions.write().await;
            let controller = sessions
                .get_mut(session_id)
                .ok_or_else(|| PrepcallError::not_found("call session", session_id))?;

            let handoff = controller.end_call(self.voice.as_ref()).await;
            if handoff.is_some() {
                sessions.remove(session_id);
            }
            handoff
        };

        match handoff {
            Some(handoff) => Ok(Some(self.resolve(session_id, handoff).await)),
            None => Ok(None),
        }
    }

    /// Number of sessions currently registered.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn resolve(&self, session_id: &str, handoff: CallHandoff) -> SessionResolution {
        match handoff.purpose {
            SessionPurpose::Generate => {
                match self
                    .generation
                    .generate_interview(&handoff.turns, &handoff.user_id)
                    .await
                {
                    Ok(interview) => SessionResolution {
                        route: Route::Home,
                        interview: Some(interview),
                    },
                    Err(err) => {
                        tracing::error!(
                            session_id,
                            error = %err,
                            "interview generation after call failed"
                        );
                        SessionResolution {
                            route: Route::Home,
                            interview: None,
                        }
                    }
                }
            }
            SessionPurpose::Interview { interview_id } => {
                let route = self
                    .feedback
                    .submit(&interview_id, &handoff.user_id, handoff.turns)
                    .await;
                SessionResolution {
                    route,
                    interview: None,
                }
            }
        }
    }
}
