use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LLM_API_VERSION;
use crate::error::{Result, TruthTraceError};
use crate::http::truncate;

const SERVICE: &str = "LLM";

/// Role of a message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request to the LLM.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Response from the LLM.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
}

/// Trait for LLM clients, enabling mocking in tests.
pub trait LlmClient: Send + Sync {
    fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Chat completions client for Azure AI inference style endpoints.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
/// If Debug is needed, implement it manually with the key redacted.
pub struct ChatCompletionsClient {
    http: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatErrorResponse {
    error: Option<ChatErrorDetail>,
}

#[derive(Deserialize)]
struct ChatErrorDetail {
    message: String,
}

impl ChatCompletionsClient {
    pub fn new(
        http: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

impl LlmClient for ChatCompletionsClient {
    fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(model = %self.model, messages = request.messages.len(), "sending chat completion");

        let resp = self
            .http
            .post(self.url())
            .query(&[("api-version", LLM_API_VERSION)])
            .header("api-key", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|source| TruthTraceError::Request {
                service: SERVICE,
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().unwrap_or_default();
            warn!(status = status.as_u16(), "LLM request rejected");
            let message = serde_json::from_str::<ChatErrorResponse>(&body_text)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or_else(|| truncate(&body_text, 300));
            return Err(TruthTraceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        let api_response: ChatResponse =
            resp.json().map_err(|e| TruthTraceError::MalformedResponse {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            warn!("LLM returned empty response");
            return Err(TruthTraceError::LlmEmptyResponse);
        }

        Ok(LlmResponse { content })
    }
}

/// Test utilities for the LLM client.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Mock LLM client for testing. Returns pre-configured responses in order
    /// and keeps every request it receives.
    pub struct MockLlmClient {
        responses: Mutex<Vec<Result<LlmResponse>>>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<LlmResponse>>) -> Self {
            // Reverse so we can pop from the end
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(content: &str) -> Self {
            Self::new(vec![Ok(LlmResponse {
                content: content.to_string(),
            })])
        }

        pub fn failing(error: TruthTraceError) -> Self {
            Self::new(vec![Err(error)])
        }

        /// Requests received so far.
        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests
                .lock()
                .map(|r| r.clone())
                .unwrap_or_default()
        }
    }

    impl LlmClient for MockLlmClient {
        fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.clone());
            }
            let mut responses = self
                .responses
                .lock()
                .map_err(|e| TruthTraceError::Config(format!("mock lock poisoned: {e}")))?;
            responses.pop().unwrap_or(Err(TruthTraceError::LlmEmptyResponse))
        }
    }
}
