//! Generative-model client abstraction.
//!
//! The engine talks to a [`ModelClient`] trait object so tests can inject
//! scripted clients; the production implementation is an OpenAI-compatible
//! blocking HTTP client.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default endpoint for OpenAI-compatible servers.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Failures surfaced by a model client. The engine converts all of these
/// into in-band error strings; they never abort a generation run.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("missing api key (set OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("authentication failed: {0}")]
    AuthFailed(String),
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("model not found: {0}")]
    ModelNotFound(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
        }
    }
}

/// Chat message.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// One synchronous completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Synchronous chat-completion client.
pub trait ModelClient: Send + Sync {
    /// Return the completion text, or a typed failure. Implementations must
    /// not panic on transport errors.
    fn complete(&self, request: &CompletionRequest) -> Result<String, ClientError>;
}

// OpenAI-compatible wire structures.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Blocking client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ClientError::RequestFailed(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
        })
    }

    /// Build from `OPENAI_API_KEY` / `OPENAI_BASE_URL`. A missing key is not
    /// an error here; calls fail with [`ClientError::MissingApiKey`] instead.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("OPENAI_BASE_URL").ok(),
        )
    }
}

impl ModelClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ClientError> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::MissingApiKey)?;

        let wire_request = ChatCompletionRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status.as_u16() {
                401 => ClientError::AuthFailed(body),
                429 => ClientError::RateLimited(body),
                404 => ClientError::ModelNotFound(body),
                _ => ClientError::RequestFailed(format!("status {status}: {body}")),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .map_err(|err| ClientError::InvalidResponse(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ClientError::InvalidResponse("no choices in response".to_string()))
    }
}

fn map_transport_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::RequestFailed(format!("request timeout: {error}"))
    } else if error.is_connect() {
        ClientError::RequestFailed(format!("connection error: {error}"))
    } else {
        ClientError::RequestFailed(error.to_string())
    }
}
