//! Configuration management for the CLI.
//!
//! Layering: optional `millwright.toml` file, overridden by flags and
//! environment variables (clap's `env` attributes). The cloud credential
//! has no file fallback and no default; resolving a run without one is a
//! fatal startup error.

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default cloud endpoint (credentialed)
pub const DEFAULT_CLOUD_ENDPOINT: &str = "https://ollama.com";

/// Default cloud model
pub const DEFAULT_CLOUD_MODEL: &str = "gpt-oss:120b-cloud";

/// Default local fallback model
pub const DEFAULT_LOCAL_MODEL: &str = "llama3.1:8b";

/// On-disk configuration file, all sections optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Cloud-hosted primary model
    #[serde(default)]
    pub primary: ModelSection,

    /// Local fallback model
    #[serde(default)]
    pub fallback: ModelSection,

    /// Batch processing settings
    #[serde(default)]
    pub pipeline: PipelineSection,
}

/// Endpoint + model pair for one tier of the router.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelSection {
    /// Chat API endpoint
    pub endpoint: Option<String>,

    /// Model identifier
    pub model: Option<String>,
}

/// Batch processing settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSection {
    /// Width of the conversion worker pool
    pub workers: Option<usize>,

    /// Cap on candidate lines sent to the model per document
    pub max_lines: Option<usize>,
}

impl FileConfig {
    /// Load from the given path, or from `millwright.toml` in the current
    /// directory if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => {
                // An explicitly named config file must exist
                if !explicit.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        explicit.display()
                    )));
                }
                explicit.to_path_buf()
            }
            None => {
                let default = Path::new("millwright.toml");
                if !default.exists() {
                    return Ok(Self::default());
                }
                default.to_path_buf()
            }
        };

        let contents = fs::read_to_string(&path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Cloud endpoint
    pub cloud_endpoint: String,
    /// Cloud model identifier
    pub cloud_model: String,
    /// Cloud credential
    pub api_key: String,
    /// Local endpoint
    pub local_endpoint: String,
    /// Local model identifier
    pub local_model: String,
    /// Conversion worker pool width
    pub workers: usize,
    /// Candidate line cap per document
    pub max_lines: usize,
}

impl RunConfig {
    /// Merge file config with run arguments (flags and env win).
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` when no API key is present anywhere;
    /// the cloud primary cannot be called without one.
    pub fn resolve(file: &FileConfig, args: &RunArgs) -> Result<Self> {
        let api_key = args
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CliError::MissingCredential("no API key configured".to_string()))?;

        Ok(Self {
            cloud_endpoint: file
                .primary
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_CLOUD_ENDPOINT.to_string()),
            cloud_model: args
                .cloud_model
                .clone()
                .or_else(|| file.primary.model.clone())
                .unwrap_or_else(|| DEFAULT_CLOUD_MODEL.to_string()),
            api_key,
            local_endpoint: file
                .fallback
                .endpoint
                .clone()
                .unwrap_or_else(|| millwright_llm::chat::DEFAULT_ENDPOINT.to_string()),
            local_model: args
                .local_model
                .clone()
                .or_else(|| file.fallback.model.clone())
                .unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string()),
            workers: args
                .workers
                .or(file.pipeline.workers)
                .unwrap_or(millwright_pipeline::worker::DEFAULT_WORKERS),
            max_lines: file.pipeline.max_lines.unwrap_or(5000),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["run", "--manifest", "sites.csv", "--work-dir", "work"];
        argv.extend_from_slice(extra);
        RunArgs::parse_from(argv)
    }

    #[test]
    fn test_missing_credential_is_fatal() {
        let args = run_args(&[]);
        let result = RunConfig::resolve(&FileConfig::default(), &args);
        assert!(matches!(result, Err(CliError::MissingCredential(_))));
    }

    #[test]
    fn test_blank_credential_is_fatal() {
        let args = run_args(&["--api-key", "  "]);
        let result = RunConfig::resolve(&FileConfig::default(), &args);
        assert!(matches!(result, Err(CliError::MissingCredential(_))));
    }

    #[test]
    fn test_defaults_with_credential() {
        let args = run_args(&["--api-key", "sk-test"]);
        let config = RunConfig::resolve(&FileConfig::default(), &args).unwrap();

        assert_eq!(config.cloud_endpoint, DEFAULT_CLOUD_ENDPOINT);
        assert_eq!(config.cloud_model, DEFAULT_CLOUD_MODEL);
        assert_eq!(config.local_model, DEFAULT_LOCAL_MODEL);
        assert_eq!(config.workers, millwright_pipeline::worker::DEFAULT_WORKERS);
        assert_eq!(config.max_lines, 5000);
    }

    #[test]
    fn test_flags_override_file() {
        let file: FileConfig = toml::from_str(
            r#"
            [primary]
            model = "from-file"

            [pipeline]
            workers = 8
            max_lines = 100
            "#,
        )
        .unwrap();

        let args = run_args(&["--api-key", "sk-test", "--cloud-model", "from-flag"]);
        let config = RunConfig::resolve(&file, &args).unwrap();

        assert_eq!(config.cloud_model, "from-flag");
        assert_eq!(config.workers, 8);
        assert_eq!(config.max_lines, 100);
    }

    #[test]
    fn test_file_fills_gaps() {
        let file: FileConfig = toml::from_str(
            r#"
            [fallback]
            endpoint = "http://gpu-box:11434"
            model = "qwen2.5:14b"
            "#,
        )
        .unwrap();

        let args = run_args(&["--api-key", "sk-test"]);
        let config = RunConfig::resolve(&file, &args).unwrap();

        assert_eq!(config.local_endpoint, "http://gpu-box:11434");
        assert_eq!(config.local_model, "qwen2.5:14b");
    }

    #[test]
    fn test_missing_explicit_config_file_errors() {
        let result = FileConfig::load(Some(Path::new("/nonexistent/millwright.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
