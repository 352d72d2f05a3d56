//! Batch runner - drives all stages for one batch
//!
//! Every stage is gated by the checkpoint manager, so an interrupted run
//! picks up exactly where it stopped: downloads and conversions are skipped
//! when their artifact exists, and extraction performs zero model calls for
//! documents whose JSON artifact is already on disk.

use crate::checkpoint::CheckpointManager;
use crate::error::PipelineError;
use crate::manifest::BatchItem;
use crate::worker::{convert_batch, ConversionTask};
use millwright_domain::traits::{DocumentConverter, SourceFetcher, Translator};
use millwright_domain::{Document, Stage};
use millwright_extractor::{ExtractionOutcome, Extractor};
use std::fmt::Display;
use tracing::{info, warn};

/// Batch-level settings
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Width of the conversion worker pool
    pub workers: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: crate::worker::DEFAULT_WORKERS,
        }
    }
}

/// Counters for one batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Source files fetched this run
    pub fetched: usize,
    /// Fetch failures (document proceeds no further this run)
    pub fetch_failures: usize,
    /// Documents whose text artifact exists after the conversion stage
    pub converted: usize,
    /// Conversion failures
    pub conversion_failures: usize,
    /// Documents extracted by a model call this run
    pub extracted: usize,
    /// Documents skipped because their extraction artifact already existed
    pub resumed: usize,
    /// Documents with no candidate lines (no model call made)
    pub no_candidates: usize,
    /// Documents whose model routes were exhausted (empty artifact written)
    pub extraction_failures: usize,
}

/// Drives download, conversion, and extraction over a batch of items
pub struct BatchRunner<P, F> {
    checkpoints: CheckpointManager,
    extractor: Extractor<P, F>,
    config: RunnerConfig,
}

impl<P, F> BatchRunner<P, F>
where
    P: millwright_domain::traits::LlmProvider + Send + Sync + 'static,
    F: millwright_domain::traits::LlmProvider + Send + Sync + 'static,
    P::Error: Display + Send,
    F::Error: Display + Send,
{
    /// Create a runner over a work directory and an extractor
    pub fn new(
        checkpoints: CheckpointManager,
        extractor: Extractor<P, F>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            checkpoints,
            extractor,
            config,
        }
    }

    /// The checkpoint manager backing this runner
    pub fn checkpoints(&self) -> &CheckpointManager {
        &self.checkpoints
    }

    /// Run the full pipeline for the batch.
    ///
    /// Individual document failures degrade to "zero assets recorded"; the
    /// batch always runs to completion unless the checkpoint store itself
    /// breaks.
    pub async fn run<Ftch, C, T, MC, MT>(
        &self,
        items: &[BatchItem],
        fetcher: &Ftch,
        make_converter: MC,
        make_translator: MT,
    ) -> Result<RunReport, PipelineError>
    where
        Ftch: SourceFetcher,
        Ftch::Error: Display,
        C: DocumentConverter + Send + 'static,
        T: Translator + Send + 'static,
        C::Error: Display,
        T::Error: Display,
        MC: Fn() -> C + Send + Sync + 'static,
        MT: Fn() -> T + Send + Sync + 'static,
    {
        let mut report = RunReport::default();

        let ready = self.download_stage(items, fetcher, &mut report);
        self.convert_stage(ready, make_converter, make_translator, &mut report)
            .await?;
        self.extract_stage(items, &mut report).await?;

        info!(?report, "batch complete");
        Ok(report)
    }

    /// Fetch missing source files; returns the items with a source on disk.
    fn download_stage<'a, Ftch>(
        &self,
        items: &'a [BatchItem],
        fetcher: &Ftch,
        report: &mut RunReport,
    ) -> Vec<&'a BatchItem>
    where
        Ftch: SourceFetcher,
        Ftch::Error: Display,
    {
        let mut ready = Vec::with_capacity(items.len());

        for item in items {
            let dest = self.checkpoints.artifact_path(Stage::Download, &item.document_id);
            if dest.exists() {
                ready.push(item);
                continue;
            }

            match fetcher.fetch(&item.site.document_url, &dest) {
                Ok(()) => {
                    report.fetched += 1;
                    ready.push(item);
                }
                Err(e) => {
                    warn!(
                        document = %item.document_id,
                        url = %item.site.document_url,
                        error = %e,
                        "fetch failed"
                    );
                    report.fetch_failures += 1;
                }
            }
        }

        ready
    }

    async fn convert_stage<C, T, MC, MT>(
        &self,
        items: Vec<&BatchItem>,
        make_converter: MC,
        make_translator: MT,
        report: &mut RunReport,
    ) -> Result<(), PipelineError>
    where
        C: DocumentConverter + Send + 'static,
        T: Translator + Send + 'static,
        C::Error: Display,
        T::Error: Display,
        MC: Fn() -> C + Send + Sync + 'static,
        MT: Fn() -> T + Send + Sync + 'static,
    {
        let tasks: Vec<ConversionTask> = items
            .iter()
            .map(|item| ConversionTask {
                id: item.document_id.clone(),
                source: self.checkpoints.artifact_path(Stage::Download, &item.document_id),
            })
            .collect();

        let outcomes = convert_batch(
            tasks,
            &self.checkpoints,
            make_converter,
            make_translator,
            self.config.workers,
        )
        .await?;

        for outcome in outcomes {
            if outcome.succeeded() {
                report.converted += 1;
            } else {
                report.conversion_failures += 1;
            }
        }

        Ok(())
    }

    /// Extract every converted document whose JSON artifact is missing.
    ///
    /// Runs sequentially: model calls are the scarce resource and the
    /// router's retries are already blocking per document.
    async fn extract_stage(
        &self,
        items: &[BatchItem],
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        for item in items {
            if self.checkpoints.is_complete(Stage::Extract, &item.document_id) {
                report.resumed += 1;
                continue;
            }

            let text = match self.checkpoints.read_text(&item.document_id)? {
                Some(text) => text,
                // Conversion never succeeded; leave for a future run
                None => continue,
            };

            let document = Document::new(item.document_id.clone(), text);
            let extraction = self.extractor.extract_document(&document).await;

            match &extraction.outcome {
                ExtractionOutcome::Extracted { .. } => report.extracted += 1,
                ExtractionOutcome::NoCandidates => report.no_candidates += 1,
                ExtractionOutcome::Failed(_) => report.extraction_failures += 1,
            }

            // Written for every outcome, including failures, so reruns
            // terminate instead of retrying forever.
            self.checkpoints
                .write_extraction(&item.document_id, &extraction.into_artifact())?;
        }

        Ok(())
    }
}

/// A fetcher for batches whose source files are already on disk.
///
/// Succeeds when the destination exists and fails otherwise; useful for
/// pre-downloaded corpora and tests.
#[derive(Debug, Clone, Default)]
pub struct LocalOnlyFetcher;

impl SourceFetcher for LocalOnlyFetcher {
    type Error = std::io::Error;

    fn fetch(&self, url: &str, dest: &std::path::Path) -> Result<(), Self::Error> {
        if dest.exists() {
            Ok(())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no local copy for {}", url),
            ))
        }
    }
}
