//! Environment-backed application configuration.

use std::env;

use prepcall_core::{PrepcallError, Result};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Top-level service configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP adapter binds to.
    pub bind_addr: String,
    pub gemini: GeminiConfig,
    pub vapi: VapiConfig,
    pub firestore: FirestoreConfig,
}

/// LLM API settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model override; the agent's default is used when unset.
    pub model: Option<String>,
}

/// Voice platform settings.
#[derive(Debug, Clone)]
pub struct VapiConfig {
    pub api_key: String,
    /// Workflow to start calls against. Absence does not fail
    /// configuration loading; it blocks call initiation at runtime with a
    /// logged diagnostic.
    pub workflow_id: Option<String>,
}

/// Document store settings.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub access_token: String,
}

impl AppConfig {
    /// Loads the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the first missing required key.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_addr: env::var("PREPCALL_HTTP_BIND")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            gemini: GeminiConfig {
                api_key: require("GEMINI_API_KEY")?,
                model: optional("GEMINI_MODEL_NAME"),
            },
            vapi: VapiConfig {
                api_key: require("VAPI_API_KEY")?,
                workflow_id: optional("VAPI_WORKFLOW_ID"),
            },
            firestore: FirestoreConfig {
                project_id: require("FIRESTORE_PROJECT_ID")?,
                access_token: require("FIRESTORE_ACCESS_TOKEN")?,
            },
        })
    }
}

fn require(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| PrepcallError::config(format!("{key} is not set")))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_keys_name_the_key() {
        let err = require("PREPCALL_TEST_DEFINITELY_UNSET").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("PREPCALL_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn optional_keys_load_as_none_when_absent() {
        assert_eq!(optional("PREPCALL_TEST_DEFINITELY_UNSET"), None);
    }
}
