//! Outbound service clients for PrepCall.
//!
//! Each external collaborator (LLM text API, voice platform, icon CDN)
//! gets a thin reqwest-based client. Nothing here retries; failures
//! surface to the caller and are handled at the outermost boundary.

pub mod agent;
pub mod gemini_api_agent;
pub mod tech_logos;
pub mod vapi_client;

// Re-export public API
pub use agent::{AgentError, TextAgent};
pub use gemini_api_agent::{DEFAULT_GEMINI_MODEL, GeminiTextAgent};
pub use tech_logos::{TechLogo, get_tech_logos, normalize_tech_name};
pub use vapi_client::VapiVoiceClient;
