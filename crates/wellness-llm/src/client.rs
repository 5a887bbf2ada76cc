//! Chat-completion clients.

use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use crate::prompts::ChatMessage;

/// Completion errors.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// Something that turns a chat transcript into a reply.
pub trait CompletionClient {
    fn complete(&self, messages: &[ChatMessage]) -> CompletionResult<String>;
}

/// Canned client for testing without a model.
pub struct MockCompletion {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl MockCompletion {
    /// Always answer with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail as if no API key were configured.
    pub fn unconfigured() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completed or failed calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl CompletionClient for MockCompletion {
    fn complete(&self, _messages: &[ChatMessage]) -> CompletionResult<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.reply.clone().ok_or(CompletionError::MissingApiKey)
    }
}

#[cfg(feature = "http")]
pub use http::{HttpCompletionClient, API_KEY_ENV};

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::{CompletionClient, CompletionError, CompletionResult};
    use crate::prompts::ChatMessage;

    /// Environment variable holding the API key.
    pub const API_KEY_ENV: &str = "WELLNESS_LLM_API_KEY";

    const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
    const DEFAULT_MODEL: &str = "gpt-4o-mini";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Blocking client for OpenAI-compatible chat-completions endpoints.
    pub struct HttpCompletionClient {
        client: reqwest::blocking::Client,
        endpoint: String,
        model: String,
        api_key: Option<String>,
    }

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: &'a [ChatMessage],
        temperature: f32,
        response_format: ResponseFormat,
    }

    #[derive(Serialize)]
    struct ResponseFormat {
        #[serde(rename = "type")]
        kind: &'static str,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: ChatMessage,
    }

    impl HttpCompletionClient {
        pub fn new(endpoint: Option<String>, model: Option<String>, api_key: Option<String>) -> CompletionResult<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(|e| CompletionError::Transport(e.to_string()))?;
            Ok(Self {
                client,
                endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_key: api_key.filter(|k| !k.trim().is_empty()),
            })
        }

        /// Default endpoint and model, key from [`API_KEY_ENV`].
        pub fn from_env() -> CompletionResult<Self> {
            Self::new(None, None, std::env::var(API_KEY_ENV).ok())
        }
    }

    impl CompletionClient for HttpCompletionClient {
        fn complete(&self, messages: &[ChatMessage]) -> CompletionResult<String> {
            let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;

            let request = ChatRequest {
                model: &self.model,
                messages,
                temperature: 0.0,
                response_format: ResponseFormat { kind: "json_object" },
            };

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(&request)
                .send()
                .map_err(|e| CompletionError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(CompletionError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: ChatResponse = response
                .json()
                .map_err(|e| CompletionError::Transport(e.to_string()))?;
            parsed
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| CompletionError::Transport("response had no choices".into()))
        }
    }

}
