//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline core and its
//! collaborators. Infrastructure implementations live in other crates;
//! each collaborator has a deliberately narrow contract so the core can be
//! tested with cheap in-memory fakes.

use crate::document::Language;
use std::path::Path;

/// Trait for LLM chat completion in JSON mode
///
/// Implemented by the infrastructure layer (millwright-llm). Each worker
/// constructs its own provider instance; providers are never shared as
/// lazily-initialized globals.
pub trait LlmProvider {
    /// Error type for provider operations
    type Error;

    /// Send one prompt and return the model's raw JSON text
    fn complete_json(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Model identifier, for logs and audit trails
    fn model(&self) -> &str;
}

/// Trait for converting a source document into plain text
///
/// Contract: any non-empty text is valid output regardless of the
/// original formatting. An empty document is an error, not empty text.
pub trait DocumentConverter {
    /// Error type for conversion operations
    type Error;

    /// Convert the file at `source` into plain text
    fn convert(&self, source: &Path) -> Result<String, Self::Error>;
}

/// Trait for bringing text into the canonical language
///
/// The implementation detects the language and translates only when the
/// detected tag is in the translated set (fr, nl, de); anything else is a
/// no-op. Translation quality is not re-verified by the core.
pub trait Translator {
    /// Error type for translation operations
    type Error;

    /// Return the canonical-language text and the detected source tag
    fn canonicalize(&self, text: &str) -> Result<(String, Language), Self::Error>;
}

/// Trait for fetching a remote source document to a local path
pub trait SourceFetcher {
    /// Error type for fetch operations
    type Error;

    /// Download `url` to `dest`, overwriting nothing if `dest` exists
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), Self::Error>;
}
