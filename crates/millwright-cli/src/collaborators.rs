//! Built-in collaborator implementations.
//!
//! The pipeline core only sees the traits in `millwright-domain`; these
//! are the stock implementations the binary wires in. Deployments with a
//! real PDF converter or translation service swap theirs in at the same
//! seams.

use millwright_domain::traits::{DocumentConverter, SourceFetcher, Translator};
use millwright_domain::Language;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default per-download timeout (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// Errors from the built-in collaborators.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// HTTP failure while downloading a source document
    #[error("Download failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source file needs an external converter
    #[error("Unsupported source: {0}")]
    Unsupported(String),
}

/// Downloads source documents over HTTP.
///
/// Each fetch runs on its own short-lived thread with its own client, so
/// the blocking download never sits on a runtime worker and nothing is
/// shared across fetches.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    /// Create a fetcher with an explicit per-download timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFetcher for HttpFetcher {
    type Error = CollaboratorError;

    fn fetch(&self, url: &str, dest: &Path) -> Result<(), Self::Error> {
        let url = url.to_string();
        let dest = dest.to_path_buf();
        let timeout = self.timeout;

        let handle = std::thread::spawn(move || download(&url, &dest, timeout));
        handle.join().map_err(|_| {
            CollaboratorError::Io(std::io::Error::other("download thread panicked"))
        })?
    }
}

fn download(url: &str, dest: &PathBuf, timeout: Duration) -> Result<(), CollaboratorError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let response = client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        // Temp sibling then rename, so an interrupted download never
        // looks like a completed stage on the next run.
        let tmp = dest.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, dest)?;

        debug!(url = %url, bytes = bytes.len(), dest = %dest.display(), "source downloaded");
        Ok(())
    })
}

/// Reads plain-text and UTF-8 sources directly.
///
/// Binary formats (PDF and friends) are rejected with a clear error
/// instead of producing garbage text; converting those is the job of an
/// external converter plugged into the same trait.
#[derive(Debug, Clone, Default)]
pub struct PlainTextConverter;

impl DocumentConverter for PlainTextConverter {
    type Error = CollaboratorError;

    fn convert(&self, source: &Path) -> Result<String, Self::Error> {
        let bytes = fs::read(source)?;

        if bytes.starts_with(b"%PDF") {
            return Err(CollaboratorError::Unsupported(format!(
                "{} is a PDF; configure an external converter",
                source.display()
            )));
        }

        String::from_utf8(bytes).map_err(|_| {
            CollaboratorError::Unsupported(format!("{} is not UTF-8 text", source.display()))
        })
    }
}

/// Passes text through untranslated.
///
/// Reports the undetermined language tag; documents are extracted as-is,
/// which matches the pipeline's behavior for any tag outside the
/// translated set.
#[derive(Debug, Clone, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    type Error = std::convert::Infallible;

    fn canonicalize(&self, text: &str) -> Result<(String, Language), Self::Error> {
        Ok((text.to_string(), Language::Other("und".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plain_text_converter_reads_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "Boiler 500 kW").unwrap();

        let text = PlainTextConverter.convert(&path).unwrap();
        assert_eq!(text, "Boiler 500 kW");
    }

    #[test]
    fn test_plain_text_converter_rejects_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.pdf");
        fs::write(&path, b"%PDF-1.7 binary innards").unwrap();

        let err = PlainTextConverter.convert(&path).unwrap_err();
        assert!(matches!(err, CollaboratorError::Unsupported(_)));
    }

    #[test]
    fn test_passthrough_translator_keeps_text() {
        let (text, language) = PassthroughTranslator.canonicalize("chaudière").unwrap();
        assert_eq!(text, "chaudière");
        assert!(!language.needs_translation());
    }

    #[tokio::test]
    async fn test_http_fetcher_unreachable_host() {
        let dir = TempDir::new().unwrap();
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(2));

        let result = fetcher.fetch("http://127.0.0.1:9/doc.pdf", &dir.path().join("doc.pdf"));
        assert!(matches!(result, Err(CollaboratorError::Http(_))));
        assert!(!dir.path().join("doc.pdf").exists());
    }
}
