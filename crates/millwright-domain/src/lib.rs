//! Millwright Domain Layer
//!
//! Core types and trait interfaces for the asset-extraction pipeline.
//! Everything other crates exchange — documents, asset records, checkpoint
//! artifacts, stage states — is defined here, along with the boundary traits
//! that infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Document**: one converted source document (text + language tag)
//! - **AssetRecord**: one physical equipment mention (type, capacity, unit, count)
//! - **ExtractionArtifact**: the persisted per-document extraction checkpoint
//! - **Stage**: the pipeline stages (download → convert → extract)
//!
//! ## Architecture
//!
//! Trait definitions for all external interactions live in [`traits`];
//! implementations (HTTP providers, PDF converters, translators) live in
//! other crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod asset;
pub mod document;
pub mod stage;
pub mod traits;

// Re-exports for convenience
pub use asset::{AssetRecord, ExtractionArtifact, Scalar};
pub use document::{Document, DocumentId, Language};
pub use stage::{Stage, StageStatus};
