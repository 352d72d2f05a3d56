//! Millwright Pipeline
//!
//! Checkpoint-driven batch processing: download → text conversion →
//! extraction → export, resumable at every stage.
//!
//! # Resume model
//!
//! Completion is defined purely by the existence of a stage artifact at a
//! deterministic path (`<work_dir>/pdf|txt|json/<document id>.<ext>`).
//! Re-running a batch re-derives what work is needed by testing artifact
//! existence and skips everything already done — including documents whose
//! extraction failed, which persist an empty-assets artifact rather than
//! being retried forever.
//!
//! # Components
//!
//! - [`CheckpointManager`]: artifact paths, existence tests, atomic writes
//! - [`convert_batch`]: fixed-size worker pool for document conversion
//! - [`BatchRunner`]: drives all stages for a batch
//! - [`aggregate`] / [`write_csv`]: joins extraction artifacts back onto
//!   site metadata for the final export

#![warn(missing_docs)]

pub mod aggregate;
pub mod checkpoint;
mod error;
pub mod manifest;
pub mod runner;
pub mod worker;

pub use aggregate::{aggregate, write_csv, ExportRow, NO_ASSETS_MARKER};
pub use checkpoint::CheckpointManager;
pub use error::PipelineError;
pub use manifest::{load_manifest, BatchItem, SiteRecord};
pub use runner::{BatchRunner, LocalOnlyFetcher, RunReport, RunnerConfig};
pub use worker::{convert_batch, ConversionOutcome, ConversionTask};
