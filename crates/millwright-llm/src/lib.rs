//! Millwright LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `millwright-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic, scriptable mock for testing
//! - `ChatProvider`: Ollama-style chat API over HTTP, used for both the
//!   cloud-hosted primary model (with an API credential) and the local
//!   fallback model
//!
//! # Examples
//!
//! ```
//! use millwright_llm::MockProvider;
//! use millwright_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"assets": []}"#);
//! let result = provider.complete_json("test prompt").unwrap();
//! assert_eq!(result, r#"{"assets": []}"#);
//! ```

#![warn(missing_docs)]

pub mod chat;

use millwright_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use chat::ChatProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available on the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Authentication failure (bad or missing credential)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without any network calls. Outcomes
/// can be scripted as an ordered sequence (e.g. three failures then a
/// success) to exercise router retry and fallback paths; once the script
/// is exhausted the default response is returned.
///
/// # Examples
///
/// ```
/// use millwright_llm::MockProvider;
/// use millwright_domain::traits::LlmProvider;
///
/// let provider = MockProvider::new("[]");
/// provider.script_failure("connection refused");
/// assert!(provider.complete_json("prompt").is_err());
/// assert_eq!(provider.complete_json("prompt").unwrap(), "[]");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
    model: String,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            model: "mock".to_string(),
        }
    }

    /// Create a provider that fails every call
    pub fn always_failing(reason: impl Into<String>) -> Self {
        Self::new(format!("__fail__:{}", reason.into()))
    }

    /// Set the reported model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Queue a successful response to be returned on the next call
    pub fn script_response(&self, response: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(response.into()));
    }

    /// Queue a failure to be returned on the next call
    pub fn script_failure(&self, reason: impl Into<String>) {
        self.script.lock().unwrap().push_back(Err(reason.into()));
    }

    /// Number of times the provider has been called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call counter
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn complete_json(&self, _prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(outcome) = self.script.lock().unwrap().pop_front() {
            return outcome.map_err(LlmError::Communication);
        }

        if let Some(reason) = self.default_response.strip_prefix("__fail__:") {
            return Err(LlmError::Communication(reason.to_string()));
        }

        Ok(self.default_response.clone())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
