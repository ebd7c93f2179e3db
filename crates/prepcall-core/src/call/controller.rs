//! Call session state machine.
//!
//! `CallSessionController` drives one interview call through
//! `Inactive -> Connecting -> Active -> Finished`. Transitions are driven
//! exclusively by user actions (`start_call`, `end_call`) and platform
//! events (`handle_event`); the controller issues platform commands
//! through an injected [`VoiceClient`] and never talks to a subscription
//! mechanism directly.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::event::{TranscriptKind, VoiceEvent};
use super::message::TranscriptTurn;
use super::transcript::TranscriptRecorder;
use crate::error::Result;

/// Status of a call session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// No call yet, or the previous call has been reset.
    Inactive,
    /// The start command was issued; waiting for the platform to connect.
    Connecting,
    /// The call is live.
    Active,
    /// The call has terminated; the transcript is ready for hand-off.
    Finished,
}

/// What a finished session should be used for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionPurpose {
    /// Collect interview parameters and generate a new interview.
    Generate,
    /// Practice an existing interview; feedback follows.
    Interview {
        #[serde(rename = "interviewId")]
        interview_id: String,
    },
}

/// Command sink for the voice platform.
///
/// The platform itself is an external collaborator; this trait covers the
/// only two commands a session ever issues. Events flow back separately
/// as [`VoiceEvent`]s.
#[async_trait]
pub trait VoiceClient: Send + Sync {
    /// Starts a platform call against the given workflow, with variable
    /// bindings made available to the workflow.
    async fn start(&self, workflow_id: &str, bindings: &HashMap<String, String>) -> Result<()>;

    /// Asks the platform to terminate the live call.
    async fn stop(&self) -> Result<()>;
}

/// Hand-off produced exactly once when a session reaches `Finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallHandoff {
    pub purpose: SessionPurpose,
    pub user_id: String,
    pub turns: Vec<TranscriptTurn>,
}

/// Drives one interview call.
///
/// Events are applied one at a time in arrival order; the turn sequence
/// is append-only. The session owns its transcript exclusively.
pub struct CallSessionController {
    status: CallStatus,
    recorder: TranscriptRecorder,
    is_speaking: bool,
    purpose: SessionPurpose,
    user_name: String,
    user_id: String,
}

impl CallSessionController {
    /// Creates a controller in the `Inactive` state.
    pub fn new(
        purpose: SessionPurpose,
        user_name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            status: CallStatus::Inactive,
            recorder: TranscriptRecorder::new(),
            is_speaking: false,
            purpose,
            user_name: user_name.into(),
            user_id: user_id.into(),
        }
    }

    /// Starts a call: `Inactive | Finished -> Connecting`.
    ///
    /// A missing workflow id aborts the action silently apart from a
    /// logged diagnostic; the state does not advance. Starting while a
    /// call is already in progress is a logged no-op. A failing start
    /// command is propagated, but the session stays in `Connecting` -
    /// absent a platform event it may sit there indefinitely.
    pub async fn start_call(
        &mut self,
        client: &dyn VoiceClient,
        workflow_id: Option<&str>,
    ) -> Result<()> {
        match self.status {
            CallStatus::Connecting | CallStatus::Active => {
                tracing::warn!(status = ?self.status, "start requested while a call is in progress");
                return Ok(());
            }
            CallStatus::Inactive | CallStatus::Finished => {}
        }

        let Some(workflow_id) = workflow_id else {
            tracing::error!("voice workflow id is not configured; call not started");
            return Ok(());
        };

        // Reset per-call state before connecting.
        self.recorder.clear();
        self.is_speaking = false;
        self.status = CallStatus::Connecting;

        let mut bindings = HashMap::new();
        bindings.insert("username".to_string(), self.user_name.clone());
        bindings.insert("userid".to_string(), self.user_id.clone());
        client.start(workflow_id, &bindings).await
    }

    /// Applies one platform event.
    ///
    /// Returns the hand-off exactly when the transition enters
    /// `Finished`. Events that do not apply in the current status are
    /// discarded.
    pub fn handle_event(&mut self, event: VoiceEvent) -> Option<CallHandoff> {
        match (self.status, event) {
            (CallStatus::Connecting, VoiceEvent::CallStart) => {
                self.status = CallStatus::Active;
                None
            }
            (CallStatus::Active, VoiceEvent::SpeechStart) => {
                self.is_speaking = true;
                None
            }
            (CallStatus::Active, VoiceEvent::SpeechEnd) => {
                self.is_speaking = false;
                None
            }
            (CallStatus::Active, VoiceEvent::Transcript { role, kind, text }) => {
                // Interim fragments are discarded; only final text is recorded.
                if kind == TranscriptKind::Final {
                    self.recorder.record(TranscriptTurn::new(role, text));
                }
                None
            }
            (CallStatus::Connecting | CallStatus::Active, VoiceEvent::CallEnd) => {
                Some(self.finish())
            }
            (CallStatus::Connecting | CallStatus::Active, VoiceEvent::Error { message }) => {
                tracing::error!(error = %message, "voice platform reported an error");
                Some(self.finish())
            }
            (status, event) => {
                tracing::debug!(?status, ?event, "discarding event outside its applicable status");
                None
            }
        }
    }

    /// Ends the call on the user's request: `Connecting | Active -> Finished`.
    ///
    /// Issues the platform stop command; a stop failure is logged but does
    /// not prevent the transition.
    pub async fn end_call(&mut self, client: &dyn VoiceClient) -> Option<CallHandoff> {
        match self.status {
            CallStatus::Connecting | CallStatus::Active => {
                if let Err(err) = client.stop().await {
                    tracing::error!(error = %err, "failed to issue stop command to voice platform");
                }
                Some(self.finish())
            }
            status => {
                tracing::warn!(?status, "end requested without a call in progress");
                None
            }
        }
    }

    fn finish(&mut self) -> CallHandoff {
        self.status = CallStatus::Finished;
        self.is_speaking = false;
        CallHandoff {
            purpose: self.purpose.clone(),
            user_id: self.user_id.clone(),
            turns: self.recorder.turns().to_vec(),
        }
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    pub fn turns(&self) -> &[TranscriptTurn] {
        self.recorder.turns()
    }

    pub fn purpose(&self) -> &SessionPurpose {
        &self.purpose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::MessageRole;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Mock VoiceClient that records issued commands
    #[derive(Default)]
    struct MockVoiceClient {
        started: Mutex<Vec<(String, HashMap<String, String>)>>,
        stop_count: AtomicUsize,
        fail_stop: bool,
    }

    #[async_trait]
    impl VoiceClient for MockVoiceClient {
        async fn start(
            &self,
            workflow_id: &str,
            bindings: &HashMap<String, String>,
        ) -> Result<()> {
            self.started
                .lock()
                .unwrap()
                .push((workflow_id.to_string(), bindings.clone()));
            Ok(())
        }

        async fn stop(&self) -> Result<()> {
            self.stop_count.fetch_add(1, Ordering::SeqCst);
            if self.fail_stop {
                return Err(crate::PrepcallError::upstream("stop rejected"));
            }
            Ok(())
        }
    }

    fn controller() -> CallSessionController {
        CallSessionController::new(SessionPurpose::Generate, "Jane", "u1")
    }

    fn final_transcript(role: MessageRole, text: &str) -> VoiceEvent {
        VoiceEvent::Transcript {
            role,
            kind: TranscriptKind::Final,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn start_call_connects_and_binds_user_variables() {
        let client = MockVoiceClient::default();
        let mut session = controller();

        session.start_call(&client, Some("wf-1")).await.unwrap();

        assert_eq!(session.status(), CallStatus::Connecting);
        let started = client.started.lock().unwrap();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].0, "wf-1");
        assert_eq!(started[0].1.get("username").unwrap(), "Jane");
        assert_eq!(started[0].1.get("userid").unwrap(), "u1");
    }

    #[tokio::test]
    async fn start_call_without_workflow_id_is_a_silent_no_op() {
        let client = MockVoiceClient::default();
        let mut session = controller();

        session.start_call(&client, None).await.unwrap();

        assert_eq!(session.status(), CallStatus::Inactive);
        assert!(client.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn start_call_is_ignored_while_a_call_is_in_progress() {
        let client = MockVoiceClient::default();
        let mut session = controller();

        session.start_call(&client, Some("wf-1")).await.unwrap();
        session.handle_event(VoiceEvent::CallStart);
        session.start_call(&client, Some("wf-1")).await.unwrap();

        assert_eq!(session.status(), CallStatus::Active);
        assert_eq!(client.started.lock().unwrap().len(), 1);
    }

    #[test]
    fn turns_are_appended_in_order_and_interim_fragments_are_dropped() {
        let mut session = controller();
        session.status = CallStatus::Active;

        session.handle_event(final_transcript(MessageRole::Assistant, "What role?"));
        session.handle_event(VoiceEvent::Transcript {
            role: MessageRole::User,
            kind: TranscriptKind::Partial,
            text: "Back".to_string(),
        });
        session.handle_event(final_transcript(MessageRole::User, "Backend Engineer"));

        let contents: Vec<_> = session.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["What role?", "Backend Engineer"]);
    }

    #[test]
    fn speech_events_toggle_the_speaking_flag_without_changing_status() {
        let mut session = controller();
        session.status = CallStatus::Active;

        session.handle_event(VoiceEvent::SpeechStart);
        assert!(session.is_speaking());
        assert_eq!(session.status(), CallStatus::Active);

        session.handle_event(VoiceEvent::SpeechEnd);
        assert!(!session.is_speaking());
    }

    #[tokio::test]
    async fn finished_is_reachable_from_active_via_all_three_triggers() {
        // Platform call-end
        let mut session = controller();
        session.status = CallStatus::Active;
        let handoff = session.handle_event(VoiceEvent::CallEnd);
        assert!(handoff.is_some());
        assert_eq!(session.status(), CallStatus::Finished);

        // User end action (also issues the stop command)
        let client = MockVoiceClient::default();
        let mut session = controller();
        session.status = CallStatus::Active;
        let handoff = session.end_call(&client).await;
        assert!(handoff.is_some());
        assert_eq!(session.status(), CallStatus::Finished);
        assert_eq!(client.stop_count.load(Ordering::SeqCst), 1);

        // Platform error
        let mut session = controller();
        session.status = CallStatus::Active;
        let handoff = session.handle_event(VoiceEvent::Error {
            message: "ICE failure".to_string(),
        });
        assert!(handoff.is_some());
        assert_eq!(session.status(), CallStatus::Finished);
    }

    #[test]
    fn finished_is_not_reachable_directly_from_inactive() {
        let mut session = controller();

        assert!(session.handle_event(VoiceEvent::CallEnd).is_none());
        assert!(
            session
                .handle_event(VoiceEvent::Error {
                    message: "boom".to_string(),
                })
                .is_none()
        );
        assert_eq!(session.status(), CallStatus::Inactive);
    }

    #[tokio::test]
    async fn end_call_finishes_even_when_the_stop_command_fails() {
        let client = MockVoiceClient {
            fail_stop: true,
            ..Default::default()
        };
        let mut session = controller();
        session.status = CallStatus::Active;

        let handoff = session.end_call(&client).await;
        assert!(handoff.is_some());
        assert_eq!(session.status(), CallStatus::Finished);
    }

    #[test]
    fn handoff_carries_purpose_user_and_ordered_turns() {
        let mut session = CallSessionController::new(
            SessionPurpose::Interview {
                interview_id: "iv-7".to_string(),
            },
            "Jane",
            "u1",
        );
        session.status = CallStatus::Active;
        session.handle_event(final_transcript(MessageRole::Assistant, "Tell me about Rust."));
        session.handle_event(final_transcript(MessageRole::User, "Ownership and borrowing."));

        let handoff = session.handle_event(VoiceEvent::CallEnd).unwrap();
        assert_eq!(
            handoff.purpose,
            SessionPurpose::Interview {
                interview_id: "iv-7".to_string()
            }
        );
        assert_eq!(handoff.user_id, "u1");
        assert_eq!(handoff.turns.len(), 2);
        assert_eq!(handoff.turns[0].content, "Tell me about Rust.");
    }

    #[tokio::test]
    async fn a_new_call_resets_the_previous_transcript() {
        let client = MockVoiceClient::default();
        let mut session = controller();
        session.status = CallStatus::Active;
        session.handle_event(final_transcript(MessageRole::User, "old turn"));
        session.handle_event(VoiceEvent::CallEnd);

        session.start_call(&client, Some("wf-1")).await.unwrap();

        assert_eq!(session.status(), CallStatus::Connecting);
        assert!(session.turns().is_empty());
        assert!(!session.is_speaking());
    }

    #[test]
    fn events_after_finish_are_discarded() {
        let mut session = controller();
        session.status = CallStatus::Active;
        session.handle_event(VoiceEvent::CallEnd);

        assert!(session.handle_event(final_transcript(MessageRole::User, "late")).is_none());
        assert!(session.turns().is_empty());
        assert_eq!(session.status(), CallStatus::Finished);
    }
}
