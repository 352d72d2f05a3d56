//! Conversion worker pool
//!
//! Document conversion (PDF → text → canonical language) is CPU- and
//! I/O-heavy external work, so it runs on a fixed-size pool of blocking
//! workers. Each worker handles one document end-to-end with its own
//! converter and translator instances — collaborator clients are never
//! shared across workers — and returns the converted text to the
//! coordinator, which owns all checkpoint writes.

use crate::checkpoint::CheckpointManager;
use crate::error::PipelineError;
use millwright_domain::traits::{DocumentConverter, Translator};
use millwright_domain::{DocumentId, Stage};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Default pool width
pub const DEFAULT_WORKERS: usize = 4;

/// One document to convert
#[derive(Debug, Clone)]
pub struct ConversionTask {
    /// Document identifier
    pub id: DocumentId,
    /// Path of the downloaded source file
    pub source: PathBuf,
}

/// Per-document result returned to the coordinator
#[derive(Debug)]
pub struct ConversionOutcome {
    /// Document identifier
    pub id: DocumentId,
    /// Detected language code, for the audit log
    pub language: Option<String>,
    /// Failure reason, if the document could not be converted
    pub failure: Option<String>,
}

impl ConversionOutcome {
    /// Whether the document's text artifact now exists
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Convert a batch of documents on a fixed-size worker pool.
///
/// Documents whose text artifact already exists are skipped (counted as
/// successes). Per-document failures are recorded in the outcome and never
/// abort the batch; only checkpoint write failures propagate, since they
/// poison resumability itself.
pub async fn convert_batch<C, T, MC, MT>(
    tasks: Vec<ConversionTask>,
    checkpoints: &CheckpointManager,
    make_converter: MC,
    make_translator: MT,
    workers: usize,
) -> Result<Vec<ConversionOutcome>, PipelineError>
where
    C: DocumentConverter + Send + 'static,
    T: Translator + Send + 'static,
    C::Error: Display,
    T::Error: Display,
    MC: Fn() -> C + Send + Sync + 'static,
    MT: Fn() -> T + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let make_converter = Arc::new(make_converter);
    let make_translator = Arc::new(make_translator);

    let mut join_set: JoinSet<(DocumentId, Result<(String, String), String>)> = JoinSet::new();
    let mut outcomes = Vec::with_capacity(tasks.len());

    for task in tasks {
        if checkpoints.is_complete(Stage::Convert, &task.id) {
            debug!(document = %task.id, "text artifact exists, skipping conversion");
            outcomes.push(ConversionOutcome {
                id: task.id,
                language: None,
                failure: None,
            });
            continue;
        }

        if !task.source.exists() {
            outcomes.push(ConversionOutcome {
                failure: Some(format!("missing source file: {}", task.source.display())),
                id: task.id,
                language: None,
            });
            continue;
        }

        let semaphore = Arc::clone(&semaphore);
        let make_converter = Arc::clone(&make_converter);
        let make_translator = Arc::clone(&make_translator);

        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore never closed");

            let id = task.id.clone();
            let result = tokio::task::spawn_blocking(move || {
                // Fresh collaborator instances per worker task
                let converter = make_converter();
                let translator = make_translator();
                convert_one(&converter, &translator, &task)
            })
            .await
            .unwrap_or_else(|e| Err(format!("worker panicked: {}", e)));

            (id, result)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        let (id, result) = joined.expect("conversion task never aborted");
        match result {
            Ok((text, language)) => {
                // Coordinator-owned state: the artifact write happens here,
                // not in the worker.
                checkpoints.write_text(&id, &text)?;
                outcomes.push(ConversionOutcome {
                    id,
                    language: Some(language),
                    failure: None,
                });
            }
            Err(reason) => {
                warn!(document = %id, reason = %reason, "conversion failed");
                outcomes.push(ConversionOutcome {
                    id,
                    language: None,
                    failure: Some(reason),
                });
            }
        }
    }

    Ok(outcomes)
}

/// One worker's end-to-end document job: convert, then canonicalize.
fn convert_one<C, T>(
    converter: &C,
    translator: &T,
    task: &ConversionTask,
) -> Result<(String, String), String>
where
    C: DocumentConverter,
    T: Translator,
    C::Error: Display,
    T::Error: Display,
{
    let raw_text = converter
        .convert(&task.source)
        .map_err(|e| format!("conversion: {}", e))?;

    if raw_text.trim().is_empty() {
        return Err("conversion produced empty text".to_string());
    }

    let (canonical, language) = translator
        .canonicalize(&raw_text)
        .map_err(|e| format!("translation: {}", e))?;

    Ok((canonical, language.as_code().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use millwright_domain::Language;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Reads the source file as UTF-8, standing in for a PDF converter.
    struct PassthroughConverter;

    impl DocumentConverter for PassthroughConverter {
        type Error = std::io::Error;

        fn convert(&self, source: &Path) -> Result<String, Self::Error> {
            fs::read_to_string(source)
        }
    }

    /// Uppercases text tagged "fr", passes everything else through.
    struct FakeTranslator;

    impl Translator for FakeTranslator {
        type Error = std::convert::Infallible;

        fn canonicalize(&self, text: &str) -> Result<(String, Language), Self::Error> {
            if let Some(rest) = text.strip_prefix("fr:") {
                Ok((rest.to_uppercase(), Language::Fr))
            } else {
                Ok((text.to_string(), Language::En))
            }
        }
    }

    fn setup(docs: &[(&str, &str)]) -> (TempDir, CheckpointManager, Vec<ConversionTask>) {
        let dir = TempDir::new().unwrap();
        let checkpoints = CheckpointManager::new(dir.path()).unwrap();

        let tasks = docs
            .iter()
            .map(|(id, contents)| {
                let id = DocumentId::new(*id);
                let source = checkpoints.artifact_path(Stage::Download, &id);
                fs::write(&source, contents).unwrap();
                ConversionTask { id, source }
            })
            .collect();

        (dir, checkpoints, tasks)
    }

    #[tokio::test]
    async fn test_converts_and_writes_text_artifacts() {
        let (_dir, checkpoints, tasks) =
            setup(&[("doc_1", "Boiler 500 kW"), ("doc_2", "fr:chaudière")]);

        let outcomes = convert_batch(
            tasks,
            &checkpoints,
            || PassthroughConverter,
            || FakeTranslator,
            2,
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.succeeded()));
        assert_eq!(
            checkpoints
                .read_text(&DocumentId::new("doc_1"))
                .unwrap()
                .as_deref(),
            Some("Boiler 500 kW")
        );
        // Translated set goes through the translator
        assert_eq!(
            checkpoints
                .read_text(&DocumentId::new("doc_2"))
                .unwrap()
                .as_deref(),
            Some("CHAUDIÈRE")
        );
    }

    #[tokio::test]
    async fn test_existing_artifact_skips_work() {
        let (_dir, checkpoints, tasks) = setup(&[("doc_1", "new contents")]);
        checkpoints
            .write_text(&DocumentId::new("doc_1"), "old contents")
            .unwrap();

        let outcomes = convert_batch(
            tasks,
            &checkpoints,
            || PassthroughConverter,
            || FakeTranslator,
            2,
        )
        .await
        .unwrap();

        assert!(outcomes[0].succeeded());
        // Resume semantics: the existing artifact is authoritative
        assert_eq!(
            checkpoints
                .read_text(&DocumentId::new("doc_1"))
                .unwrap()
                .as_deref(),
            Some("old contents")
        );
    }

    #[tokio::test]
    async fn test_missing_source_is_recorded_not_fatal() {
        let (_dir, checkpoints, _tasks) = setup(&[]);
        let tasks = vec![ConversionTask {
            id: DocumentId::new("ghost"),
            source: PathBuf::from("/nonexistent/ghost.pdf"),
        }];

        let outcomes = convert_batch(
            tasks,
            &checkpoints,
            || PassthroughConverter,
            || FakeTranslator,
            2,
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].succeeded());
        assert!(outcomes[0].failure.as_ref().unwrap().contains("missing source"));
    }

    #[tokio::test]
    async fn test_empty_conversion_is_a_failure() {
        let (_dir, checkpoints, tasks) = setup(&[("doc_1", "   \n  ")]);

        let outcomes = convert_batch(
            tasks,
            &checkpoints,
            || PassthroughConverter,
            || FakeTranslator,
            1,
        )
        .await
        .unwrap();

        assert!(!outcomes[0].succeeded());
        assert!(!checkpoints.is_complete(Stage::Convert, &DocumentId::new("doc_1")));
    }
}
