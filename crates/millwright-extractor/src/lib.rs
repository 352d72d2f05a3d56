//! Millwright Extractor
//!
//! Converts a document's text into structured asset records.
//!
//! # Architecture
//!
//! ```text
//! Text → KeywordFilter → PromptBuilder → ModelRouter → Normalizer → AssetRecords
//! ```
//!
//! # Key Features
//!
//! - **Keyword pre-filter**: shrinks a document to the lines plausibly
//!   describing physical assets before the expensive LLM call
//! - **Two-tier routing**: retries a cloud-hosted primary model, then
//!   falls back to an always-available local model
//! - **Tolerant normalization**: accepts several response shapes and
//!   degrades to "fewer assets" instead of failing the batch
//!
//! # Example Usage
//!
//! ```
//! use millwright_domain::Document;
//! use millwright_extractor::{Extractor, ExtractorConfig, ExtractionOutcome};
//! use millwright_llm::MockProvider;
//!
//! # async fn example() {
//! let primary = MockProvider::new(r#"{"assets": [{"asset_type": "boiler"}]}"#);
//! let fallback = MockProvider::new(r#"{"assets": []}"#);
//! let extractor = Extractor::new(primary, fallback, ExtractorConfig::default());
//!
//! let doc = Document::new("doc_1", "Boiler capacity 500 kW installed in hall 3");
//! let extraction = extractor.extract_document(&doc).await;
//! assert_eq!(extraction.assets.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod extractor;
pub mod filter;
pub mod keywords;
pub mod normalize;
pub mod prompt;
pub mod router;

pub use config::ExtractorConfig;
pub use extractor::{DocumentExtraction, ExtractionOutcome, Extractor};
pub use filter::{FilterConfig, KeywordFilter};
pub use normalize::{normalize_response, Normalized};
pub use prompt::PromptBuilder;
pub use router::{ModelRouter, RouterConfig, RouterError};
