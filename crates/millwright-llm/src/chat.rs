//! Chat Provider Implementation
//!
//! HTTP integration with an Ollama-style `/api/chat` endpoint in JSON
//! format mode. The same provider type serves both tiers of the router:
//! the cloud-hosted primary (endpoint + API credential) and the local
//! fallback (plain localhost endpoint).
//!
//! # Examples
//!
//! ```no_run
//! use millwright_llm::ChatProvider;
//!
//! // Local fallback model
//! let local = ChatProvider::new("http://localhost:11434", "llama3.1:8b");
//!
//! // Cloud-hosted primary model
//! let cloud = ChatProvider::new("https://ollama.com", "gpt-oss:120b-cloud")
//!     .with_api_key("sk-...");
//! ```

use crate::LlmError;
use millwright_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default local endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for one chat request (seconds). This bounds the
/// worst-case stall of a hung call; there is no other cancellation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat API provider
///
/// One instance wraps one endpoint + model pair. Construct a fresh
/// instance per worker rather than sharing one through global state.
pub struct ChatProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    reasoning_effort: String,
}

/// Request body for the chat API: JSON format mode, single user message,
/// low reasoning effort.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    format: String,
    messages: Vec<ChatMessage>,
    options: ChatOptions,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

impl ChatProvider {
    /// Create a provider for the given endpoint and model
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with an explicit per-request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client with static configuration");

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            client,
        }
    }

    /// Create a provider against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Attach a bearer credential (required for the cloud host)
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Send one chat request and return the raw message content
    ///
    /// Exactly one attempt; retry and fallback policy belongs to the
    /// router, not the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable, the credential is
    /// rejected, the model is unknown, or the response body is malformed.
    pub async fn chat_json(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.endpoint);

        let request_body = ChatRequest {
            model: self.model.clone(),
            format: "json".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            options: ChatOptions {
                reasoning_effort: "low".to_string(),
            },
            stream: false,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending chat request");

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(LlmError::Auth(format!("HTTP {}", status)));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(chat_response.message.content)
    }
}

impl LlmProviderTrait for ChatProvider {
    type Error = LlmError;

    fn complete_json(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call; callers on a runtime go
        // through spawn_blocking.
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Runtime error: {}", e)))?
            .block_on(self.chat_json(prompt))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
