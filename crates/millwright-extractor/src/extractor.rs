//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::filter::KeywordFilter;
use crate::normalize::normalize_response;
use crate::prompt::PromptBuilder;
use crate::router::{ModelRouter, RouterConfig};
use millwright_domain::traits::LlmProvider;
use millwright_domain::{AssetRecord, Document, DocumentId, ExtractionArtifact};
use std::fmt::Display;
use tracing::{info, warn};

/// How a document's extraction concluded.
///
/// All three outcomes leave the batch running; the distinction exists so
/// logs and metrics can separate "the document had nothing" from "the
/// models were down", which the persisted artifact deliberately does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The model responded and the response was normalized
    Extracted {
        /// Candidates dropped during validation
        dropped: usize,
    },
    /// The keyword filter found nothing; no model call was made
    NoCandidates,
    /// Both model routes were exhausted
    Failed(String),
}

/// Result of extracting one document
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    /// Identifier of the source document
    pub source: DocumentId,

    /// Validated asset records (empty for NoCandidates and Failed)
    pub assets: Vec<AssetRecord>,

    /// How the extraction concluded
    pub outcome: ExtractionOutcome,
}

impl DocumentExtraction {
    /// Convert into the persisted checkpoint artifact.
    ///
    /// The artifact shape is identical for all outcomes: failed and empty
    /// extractions persist an empty asset list so reruns terminate instead
    /// of retrying forever.
    pub fn into_artifact(self) -> ExtractionArtifact {
        ExtractionArtifact {
            source: self.source,
            assets: self.assets,
        }
    }
}

/// The Extractor converts a document into asset records
pub struct Extractor<P, F> {
    router: ModelRouter<P, F>,
    filter: KeywordFilter,
}

impl<P, F> Extractor<P, F>
where
    P: LlmProvider + Send + Sync + 'static,
    F: LlmProvider + Send + Sync + 'static,
    P::Error: Display + Send,
    F::Error: Display + Send,
{
    /// Create an Extractor over a primary and a fallback provider
    pub fn new(primary: P, fallback: F, config: ExtractorConfig) -> Self {
        let ExtractorConfig { filter, router } = config;
        Self {
            router: ModelRouter::new(primary, fallback, router),
            filter: KeywordFilter::new(filter),
        }
    }

    /// Create an Extractor with an explicit router configuration
    pub fn with_router_config(primary: P, fallback: F, router: RouterConfig) -> Self {
        Self {
            router: ModelRouter::new(primary, fallback, router),
            filter: KeywordFilter::default(),
        }
    }

    /// Extract asset records from one document.
    ///
    /// Never returns an error: missing candidates short-circuit without a
    /// model call, and route exhaustion degrades to an empty asset list
    /// with a `Failed` outcome.
    pub async fn extract_document(&self, document: &Document) -> DocumentExtraction {
        let candidate_text = self.filter.filter(&document.text);

        if candidate_text.is_empty() {
            info!(source = %document.id, "no candidate lines, skipping model call");
            return DocumentExtraction {
                source: document.id.clone(),
                assets: Vec::new(),
                outcome: ExtractionOutcome::NoCandidates,
            };
        }

        let prompt = PromptBuilder::new(candidate_text).build();

        match self.router.route(&prompt).await {
            Ok(raw) => {
                let normalized = normalize_response(&raw);
                info!(
                    source = %document.id,
                    assets = normalized.assets.len(),
                    dropped = normalized.dropped,
                    "extraction complete"
                );
                DocumentExtraction {
                    source: document.id.clone(),
                    assets: normalized.assets,
                    outcome: ExtractionOutcome::Extracted {
                        dropped: normalized.dropped,
                    },
                }
            }
            Err(e) => {
                warn!(source = %document.id, error = %e, "extraction failed, recording zero assets");
                DocumentExtraction {
                    source: document.id.clone(),
                    assets: Vec::new(),
                    outcome: ExtractionOutcome::Failed(e.to_string()),
                }
            }
        }
    }
}
