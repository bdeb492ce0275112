//! LLM backends — the single point of entry for all model calls in this service.
//!
//! Two interchangeable backends sit behind the `LlmBackend` trait: an
//! Ollama-style generate endpoint and an OpenAI-style chat-completion API.
//! The backend is selected once at startup and carried in `AppState` as
//! `Arc<dyn LlmBackend>`.
//!
//! One request per call, no retries: failures propagate to the pipeline, which
//! converts them into a degraded report.

use async_trait::async_trait;
use thiserror::Error;

mod ollama;
mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiChatClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("LLM authentication failed (status {status}): {message}")]
    AuthenticationFailed { status: u16, message: String },
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::BackendUnavailable(e.to_string())
    }
}

/// Connection settings for an LLM backend. Passed in at construction —
/// no process-wide endpoint or key constants.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint_url: String,
    pub model_id: String,
    pub api_key: Option<String>,
    pub timeout: std::time::Duration,
}

/// The LLM backend trait. Implement this to swap providers without touching
/// the pipeline or handler code.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Sends one prompt and returns the model's raw text reply.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logging.
    fn model_id(&self) -> &str;
}

fn build_http_client(timeout: std::time::Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::BackendUnavailable(format!("failed to build HTTP client: {e}")))
}
