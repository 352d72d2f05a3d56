//! Error types for the pipeline

use thiserror::Error;

/// Errors that can occur while driving the pipeline
///
/// Per-document failures (conversion, extraction) are recorded and skipped,
/// never raised; these errors cover the batch-level machinery itself
/// (work directory, manifest, export).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// I/O error touching checkpoint artifacts or the work directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact (de)serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest or export CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid manifest contents
    #[error("Manifest error: {0}")]
    Manifest(String),
}
