use anyhow::{bail, Context, Result};

use crate::llm::LlmConfig;

/// Which LLM backend the service talks to. Selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Local/remote generate endpoint (Ollama-style `{model, prompt, stream}`).
    Ollama,
    /// Hosted chat-completion API (OpenAI-style `messages` array).
    OpenAi,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub llm: LlmConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = match std::env::var("LLM_BACKEND")
            .unwrap_or_else(|_| "ollama".to_string())
            .to_lowercase()
            .as_str()
        {
            "ollama" => BackendKind::Ollama,
            "openai" => BackendKind::OpenAi,
            other => bail!("LLM_BACKEND must be 'ollama' or 'openai', got '{other}'"),
        };

        let endpoint_url = std::env::var("LLM_ENDPOINT").unwrap_or_else(|_| {
            match backend {
                BackendKind::Ollama => "http://localhost:11434/api/generate",
                BackendKind::OpenAi => "https://api.openai.com/v1/chat/completions",
            }
            .to_string()
        });

        let model_id = std::env::var("LLM_MODEL").unwrap_or_else(|_| {
            match backend {
                BackendKind::Ollama => "mistral",
                BackendKind::OpenAi => "gpt-4o",
            }
            .to_string()
        });

        let api_key = std::env::var("OPENAI_API_KEY").ok();
        if backend == BackendKind::OpenAi && api_key.is_none() {
            bail!("Required environment variable 'OPENAI_API_KEY' is not set (LLM_BACKEND=openai)");
        }

        let timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<u64>()
            .context("LLM_TIMEOUT_SECS must be a number of seconds")?;

        Ok(Config {
            backend,
            llm: LlmConfig {
                endpoint_url,
                model_id,
                api_key,
                timeout: std::time::Duration::from_secs(timeout_secs),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
