use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{build_http_client, LlmBackend, LlmConfig, LlmError};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    /// The endpoint contract carries the reply here. Absent field means an
    /// empty reply, which the parser degrades gracefully — not a client error.
    #[serde(default)]
    response: String,
}

/// HTTP-generate backend: POSTs `{model, prompt, stream: false}` to an
/// Ollama-style endpoint and reads the `response` text field.
pub struct OllamaClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_http_client(config.timeout)?,
            config,
        })
    }
}

#[async_trait]
impl LlmBackend for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            model: &self.config.model_id,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::BackendUnavailable(format!(
                "generate endpoint returned {status}: {body}"
            )));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::BackendUnavailable(format!("malformed response body: {e}")))?;

        debug!(
            "generate call succeeded: model={}, reply_len={}",
            self.config.model_id,
            reply.response.len()
        );

        Ok(reply.response)
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}
