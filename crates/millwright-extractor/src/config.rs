//! Configuration for the Extractor

use crate::filter::FilterConfig;
use crate::router::RouterConfig;
use std::time::Duration;

/// Configuration for the full extraction path
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Keyword pre-filter settings
    pub filter: FilterConfig,

    /// Retry/fallback routing policy
    pub router: RouterConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            router: RouterConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Cap the candidate text at `max_lines` lines
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.filter.max_lines = max_lines;
        self
    }

    /// Add a courtesy delay before each document's first model call
    pub fn with_pre_attempt_delay(mut self, delay: Duration) -> Self {
        self.router.pre_attempt_delay = Some(delay);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.filter.max_lines == 0 {
            return Err("filter.max_lines must be greater than 0".to_string());
        }
        if self.filter.asset_vocabulary.is_empty() {
            return Err("filter.asset_vocabulary must not be empty".to_string());
        }
        if self.router.primary_attempts == 0 {
            return Err("router.primary_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}
