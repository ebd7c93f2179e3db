//! Voice platform client (Vapi REST API).
//!
//! Implements the [`VoiceClient`] command sink: starting a workflow call
//! and stopping the live one. Platform events flow back through the
//! server's webhook route, not through this client.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use prepcall_core::call::VoiceClient;
use prepcall_core::{PrepcallError, Result};

const BASE_URL: &str = "https://api.vapi.ai";

/// Client for the voice platform's call commands.
///
/// Remembers the platform call id returned by `start` so `stop` can
/// address the live call.
pub struct VapiVoiceClient {
    client: Client,
    api_key: String,
    base_url: String,
    live_call_id: Mutex<Option<String>>,
}

impl VapiVoiceClient {
    /// Creates a new client with the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            live_call_id: Mutex::new(None),
        }
    }

    /// Points the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCallRequest<'a> {
    workflow_id: &'a str,
    workflow_overrides: WorkflowOverrides<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowOverrides<'a> {
    variable_values: &'a HashMap<String, String>,
}

#[derive(Deserialize)]
struct CreateCallResponse {
    id: String,
}

#[async_trait]
impl VoiceClient for VapiVoiceClient {
    async fn start(&self, workflow_id: &str, bindings: &HashMap<String, String>) -> Result<()> {
        let body = CreateCallRequest {
            workflow_id,
            workflow_overrides: WorkflowOverrides {
                variable_values: bindings,
            },
        };

        let response = self
            .client
            .post(format!("{}/call", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                PrepcallError::upstream(format!("Voice platform start request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read voice platform error body".to_string());
            return Err(PrepcallError::upstream(format!(
                "Voice platform rejected call start ({status}): {body_text}"
            )));
        }

        let created: CreateCallResponse = response.json().await.map_err(|err| {
            PrepcallError::upstream(format!("Failed to parse call creation response: {err}"))
        })?;

        tracing::info!(call_id = %created.id, workflow_id, "voice platform call started");
        *self.live_call_id.lock().await = Some(created.id);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let call_id = self.live_call_id.lock().await.take();
        let Some(call_id) = call_id else {
            tracing::warn!("stop requested without a live platform call");
            return Ok(());
        };

        let response = self
            .client
            .post(format!("{}/call/{}/control", self.base_url, call_id))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "type": "end-call" }))
            .send()
            .await
            .map_err(|err| {
                PrepcallError::upstream(format!("Voice platform stop request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PrepcallError::upstream(format!(
                "Voice platform rejected call stop ({status})"
            )));
        }

        tracing::info!(%call_id, "voice platform call stopped");
        Ok(())
    }
}
