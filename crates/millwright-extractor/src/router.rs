//! Two-tier model routing with retry and fallback
//!
//! The primary ("cloud") model is assumed higher-quality but rate-limited
//! and occasionally unavailable; the fallback ("local") model is always
//! reachable but weaker. Batch correctness must never depend on the
//! primary being up, so after the primary's attempt budget is exhausted
//! the router unconditionally tries the fallback once.

use millwright_domain::traits::LlmProvider;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Routing policy configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Attempts against the primary model before falling back
    pub primary_attempts: u32,

    /// Fixed delay between primary attempts
    pub backoff: Duration,

    /// Optional courtesy delay before the first call (rate-limit relief)
    pub pre_attempt_delay: Option<Duration>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            primary_attempts: 3,
            backoff: Duration::from_secs(1),
            pre_attempt_delay: None,
        }
    }
}

/// Routing failure: both tiers exhausted
///
/// The caller must treat the document as having zero extracted assets;
/// this error never aborts the batch.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Primary budget spent and the single fallback attempt failed too
    #[error("all routes exhausted (primary: {primary}; fallback: {fallback})")]
    Exhausted {
        /// Terminal error of the last primary attempt
        primary: String,
        /// Error of the fallback attempt
        fallback: String,
    },
}

/// Routes one extraction prompt across a primary and a fallback provider
pub struct ModelRouter<P, F> {
    primary: Arc<P>,
    fallback: Arc<F>,
    config: RouterConfig,
}

impl<P, F> ModelRouter<P, F>
where
    P: LlmProvider + Send + Sync + 'static,
    F: LlmProvider + Send + Sync + 'static,
    P::Error: Display + Send,
    F::Error: Display + Send,
{
    /// Create a router over the two providers
    pub fn new(primary: P, fallback: F, config: RouterConfig) -> Self {
        Self {
            primary: Arc::new(primary),
            fallback: Arc::new(fallback),
            config,
        }
    }

    /// Send the prompt, retrying the primary then falling back.
    ///
    /// Attempts are strictly sequential: up to `primary_attempts` calls to
    /// the primary with a fixed backoff between them, then exactly one
    /// fallback call. Any provider error is treated as retryable. Returns
    /// the raw model response text on the first success.
    pub async fn route(&self, prompt: &str) -> Result<String, RouterError> {
        if let Some(delay) = self.config.pre_attempt_delay {
            sleep(delay).await;
        }

        let mut last_primary_error = String::new();

        for attempt in 1..=self.config.primary_attempts {
            debug!(
                model = self.primary.model(),
                attempt,
                of = self.config.primary_attempts,
                "primary attempt"
            );

            match call_blocking(Arc::clone(&self.primary), prompt).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(
                        model = self.primary.model(),
                        attempt,
                        error = %e,
                        "primary attempt failed"
                    );
                    last_primary_error = e;
                }
            }

            if attempt < self.config.primary_attempts {
                sleep(self.config.backoff).await;
            }
        }

        warn!(
            primary = self.primary.model(),
            fallback = self.fallback.model(),
            "primary exhausted, switching to fallback"
        );

        match call_blocking(Arc::clone(&self.fallback), prompt).await {
            Ok(response) => Ok(response),
            Err(fallback_error) => Err(RouterError::Exhausted {
                primary: last_primary_error,
                fallback: fallback_error,
            }),
        }
    }

    /// Model identifier of the primary provider
    pub fn primary_model(&self) -> &str {
        self.primary.model()
    }
}

/// Run one synchronous provider call off the async runtime.
async fn call_blocking<L>(provider: Arc<L>, prompt: &str) -> Result<String, String>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        provider
            .complete_json(&prompt)
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("task join error: {}", e))?
}
