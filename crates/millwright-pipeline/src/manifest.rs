//! Batch manifest - the input collaborator's rows
//!
//! The loader supplies one CSV row per site document: a site identifier, a
//! numeric sub-identifier, a source document URL, and any further metadata
//! columns, which are carried through untouched to the final export.

use crate::error::PipelineError;
use millwright_domain::DocumentId;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Required manifest columns, in no particular order.
const REQUIRED_COLUMNS: [&str; 3] = ["site_id", "sub_id", "document_url"];

/// One input row: a site and one of its source documents
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRecord {
    /// Site identifier
    pub site_id: String,

    /// Numeric sub-identifier within the site
    pub sub_id: u32,

    /// URL of the source document
    pub document_url: String,

    /// Remaining columns, carried through to the export verbatim
    pub metadata: BTreeMap<String, String>,
}

/// One unit of batch work: a site row plus its derived document identity
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// The originating manifest row
    pub site: SiteRecord,

    /// Stable document identifier, also the artifact file stem
    pub document_id: DocumentId,
}

impl BatchItem {
    /// Build an item from a manifest row.
    ///
    /// The document id is `<site>_<sub>_<suffix>` where the suffix is the
    /// tail of the document URL with path separators flattened, which keeps
    /// ids stable across runs and unique enough per site.
    pub fn from_site(site: SiteRecord) -> Self {
        let suffix = url_suffix(&site.document_url);
        let document_id = DocumentId::new(format!("{}_{}_{}", site.site_id, site.sub_id, suffix));
        Self { site, document_id }
    }
}

/// Last few characters of the URL, sanitized for use in a file name.
fn url_suffix(url: &str) -> String {
    let tail: String = url
        .chars()
        .rev()
        .take(5)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    tail.replace(['/', '\\', ':'], "_")
}

/// Load the batch manifest from a CSV file.
///
/// Columns `site_id`, `sub_id`, and `document_url` are required; all other
/// columns become metadata. Rows with a non-numeric `sub_id` are rejected
/// loudly — a malformed manifest is a configuration failure, not a
/// per-document one.
pub fn load_manifest(path: &Path) -> Result<Vec<BatchItem>, PipelineError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(PipelineError::Manifest(format!(
                "missing required column '{}'",
                required
            )));
        }
    }

    let mut items = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let mut site_id = String::new();
        let mut sub_id_raw = String::new();
        let mut document_url = String::new();
        let mut metadata = BTreeMap::new();

        for (header, value) in headers.iter().zip(record.iter()) {
            match header {
                "site_id" => site_id = value.to_string(),
                "sub_id" => sub_id_raw = value.to_string(),
                "document_url" => document_url = value.to_string(),
                other => {
                    metadata.insert(other.to_string(), value.to_string());
                }
            }
        }

        let sub_id: u32 = sub_id_raw.parse().map_err(|_| {
            PipelineError::Manifest(format!(
                "row {}: sub_id '{}' is not numeric",
                row_idx + 1,
                sub_id_raw
            ))
        })?;

        // Site identity belongs in the export too
        metadata.insert("site_id".to_string(), site_id.clone());
        metadata.insert("sub_id".to_string(), sub_id.to_string());

        items.push(BatchItem::from_site(SiteRecord {
            site_id,
            sub_id,
            document_url,
            metadata,
        }));
    }

    info!(items = items.len(), manifest = %path.display(), "manifest loaded");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_manifest(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_manifest() {
        let file = write_manifest(
            "site_id,sub_id,document_url,province\n1024,3,https://example.org/docs/fiche.pdf,Antwerp\n",
        );
        let items = load_manifest(file.path()).unwrap();
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.site.site_id, "1024");
        assert_eq!(item.site.sub_id, 3);
        assert_eq!(item.site.metadata.get("province").unwrap(), "Antwerp");
        assert_eq!(item.site.metadata.get("site_id").unwrap(), "1024");
        assert_eq!(item.document_id.as_str(), "1024_3_e.pdf");
    }

    #[test]
    fn test_missing_column_is_loud() {
        let file = write_manifest("site_id,document_url\n1024,https://example.org/a.pdf\n");
        let err = load_manifest(file.path()).unwrap_err();
        assert!(err.to_string().contains("sub_id"));
    }

    #[test]
    fn test_non_numeric_sub_id_is_loud() {
        let file = write_manifest("site_id,sub_id,document_url\n1024,abc,https://example.org/a.pdf\n");
        let err = load_manifest(file.path()).unwrap_err();
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn test_url_suffix_sanitized() {
        assert_eq!(url_suffix("https://example.org/ab/cd"), "ab_cd");
        assert_eq!(url_suffix("x.pdf"), "x.pdf");
    }

    #[test]
    fn test_document_ids_stable_across_calls() {
        let site = SiteRecord {
            site_id: "7".to_string(),
            sub_id: 1,
            document_url: "https://example.org/permit.pdf".to_string(),
            metadata: BTreeMap::new(),
        };
        let a = BatchItem::from_site(site.clone());
        let b = BatchItem::from_site(site);
        assert_eq!(a.document_id, b.document_id);
    }
}
