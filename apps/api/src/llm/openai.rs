use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{build_http_client, LlmBackend, LlmConfig, LlmError};

/// System instruction sent with every chat-completion call. The actual
/// evaluation instructions travel in the user message built by the prompt
/// template, so this stays generic.
const CHAT_SYSTEM: &str =
    "You are an expert technical recruiter evaluating resumes against job descriptions. \
    Follow the response format requested in the user message exactly.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Chat-completion backend: sends a system + user message pair to an
/// OpenAI-style hosted API and reads `choices[0].message.content`.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiChatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_http_client(config.timeout)?,
            config,
        })
    }
}

#[async_trait]
impl LlmBackend for OpenAiChatClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.config.model_id,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: CHAT_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // 401/403 = bad key, 429 = quota exhausted
            return Err(match status.as_u16() {
                401 | 403 | 429 => LlmError::AuthenticationFailed {
                    status: status.as_u16(),
                    message: body,
                },
                _ => LlmError::BackendUnavailable(format!(
                    "chat endpoint returned {status}: {body}"
                )),
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::BackendUnavailable(format!("malformed response body: {e}")))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::BackendUnavailable("response contained no choices".into()))?;

        debug!(
            "chat call succeeded: model={}, reply_len={}",
            self.config.model_id,
            content.len()
        );

        Ok(content)
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}
