//! Result aggregation and export
//!
//! Joins per-document extraction artifacts back onto the originating
//! site's metadata: one export row per asset record, with record fields
//! winning on column collisions, or one sentinel row for documents that
//! yielded no assets — items are never silently absent from the output.

use crate::checkpoint::CheckpointManager;
use crate::error::PipelineError;
use crate::manifest::BatchItem;
use millwright_domain::AssetRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{info, warn};

/// Marker written in the `asset_type` column of a sentinel row.
pub const NO_ASSETS_MARKER: &str = "no assets found";

/// Asset columns, appended after the metadata columns in this order.
const ASSET_COLUMNS: [&str; 4] = [
    "asset_type",
    "capacity_value",
    "capacity_unit",
    "count_of_units",
];

/// One flattened export row
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// Column name → value
    pub values: BTreeMap<String, String>,
}

impl ExportRow {
    fn from_site(item: &BatchItem) -> Self {
        let mut values: BTreeMap<String, String> = item.site.metadata.clone();
        values.insert("document_id".to_string(), item.document_id.to_string());
        Self { values }
    }

    fn with_record(mut self, record: &AssetRecord) -> Self {
        // Record fields take precedence over same-named metadata columns
        self.values
            .insert("asset_type".to_string(), record.asset_type.clone());
        self.values.insert(
            "capacity_value".to_string(),
            record
                .capacity_value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default(),
        );
        self.values.insert(
            "capacity_unit".to_string(),
            record.capacity_unit.clone().unwrap_or_default(),
        );
        self.values.insert(
            "count_of_units".to_string(),
            record
                .count_of_units
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default(),
        );
        self
    }

    fn sentinel(item: &BatchItem) -> Self {
        let mut row = Self::from_site(item);
        row.values
            .insert("asset_type".to_string(), NO_ASSETS_MARKER.to_string());
        for column in &ASSET_COLUMNS[1..] {
            row.values.insert(column.to_string(), String::new());
        }
        row
    }
}

/// Build the flattened export rows from completed extraction artifacts.
///
/// Items without an extraction artifact (conversion never succeeded) are
/// logged and skipped; items with an empty asset list produce one sentinel
/// row each.
pub fn aggregate(
    items: &[BatchItem],
    checkpoints: &CheckpointManager,
) -> Result<Vec<ExportRow>, PipelineError> {
    let mut rows = Vec::new();

    for item in items {
        let artifact = match checkpoints.read_extraction(&item.document_id)? {
            Some(artifact) => artifact,
            None => {
                warn!(document = %item.document_id, "no extraction artifact, excluded from export");
                continue;
            }
        };

        if artifact.assets.is_empty() {
            rows.push(ExportRow::sentinel(item));
        } else {
            for record in &artifact.assets {
                rows.push(ExportRow::from_site(item).with_record(record));
            }
        }
    }

    info!(items = items.len(), rows = rows.len(), "aggregation complete");
    Ok(rows)
}

/// Write the export rows as CSV with a stable header: all metadata columns
/// in sorted order, then the four asset columns.
pub fn write_csv(rows: &[ExportRow], path: &Path) -> Result<(), PipelineError> {
    let mut metadata_columns: BTreeSet<String> = BTreeSet::new();
    for row in rows {
        for key in row.values.keys() {
            if !ASSET_COLUMNS.contains(&key.as_str()) {
                metadata_columns.insert(key.clone());
            }
        }
    }

    let header: Vec<&str> = metadata_columns
        .iter()
        .map(|s| s.as_str())
        .chain(ASSET_COLUMNS)
        .collect();

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&header)?;

    for row in rows {
        let record: Vec<&str> = header
            .iter()
            .map(|column| row.values.get(*column).map(|v| v.as_str()).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!(rows = rows.len(), path = %path.display(), "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::SiteRecord;
    use millwright_domain::{DocumentId, ExtractionArtifact};
    use tempfile::TempDir;

    fn item(id: &str) -> BatchItem {
        let mut metadata = BTreeMap::new();
        metadata.insert("site_id".to_string(), "1024".to_string());
        metadata.insert("province".to_string(), "Antwerp".to_string());
        BatchItem {
            site: SiteRecord {
                site_id: "1024".to_string(),
                sub_id: 3,
                document_url: "https://example.org/a.pdf".to_string(),
                metadata,
            },
            document_id: DocumentId::new(id),
        }
    }

    fn record(asset_type: &str, capacity: &str) -> AssetRecord {
        AssetRecord {
            asset_type: asset_type.to_string(),
            capacity_value: Some(capacity.into()),
            capacity_unit: Some("kW".to_string()),
            count_of_units: None,
        }
    }

    #[test]
    fn test_one_row_per_asset() {
        let dir = TempDir::new().unwrap();
        let checkpoints = CheckpointManager::new(dir.path()).unwrap();
        let item = item("doc_1");

        checkpoints
            .write_extraction(
                &item.document_id,
                &ExtractionArtifact {
                    source: item.document_id.clone(),
                    assets: vec![record("boiler", "500"), record("generator", "200")],
                },
            )
            .unwrap();

        let rows = aggregate(std::slice::from_ref(&item), &checkpoints).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values["asset_type"], "boiler");
        assert_eq!(rows[0].values["province"], "Antwerp");
        assert_eq!(rows[1].values["asset_type"], "generator");
    }

    #[test]
    fn test_empty_assets_emit_sentinel_row() {
        let dir = TempDir::new().unwrap();
        let checkpoints = CheckpointManager::new(dir.path()).unwrap();
        let item = item("doc_1");

        checkpoints
            .write_extraction(
                &item.document_id,
                &ExtractionArtifact::empty(item.document_id.clone()),
            )
            .unwrap();

        let rows = aggregate(std::slice::from_ref(&item), &checkpoints).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values["asset_type"], NO_ASSETS_MARKER);
        assert_eq!(rows[0].values["province"], "Antwerp");
    }

    #[test]
    fn test_record_fields_win_collisions() {
        let dir = TempDir::new().unwrap();
        let checkpoints = CheckpointManager::new(dir.path()).unwrap();
        let mut item = item("doc_1");
        item.site
            .metadata
            .insert("asset_type".to_string(), "from manifest".to_string());

        checkpoints
            .write_extraction(
                &item.document_id,
                &ExtractionArtifact {
                    source: item.document_id.clone(),
                    assets: vec![record("boiler", "500")],
                },
            )
            .unwrap();

        let rows = aggregate(std::slice::from_ref(&item), &checkpoints).unwrap();
        assert_eq!(rows[0].values["asset_type"], "boiler");
    }

    #[test]
    fn test_missing_artifact_skipped() {
        let dir = TempDir::new().unwrap();
        let checkpoints = CheckpointManager::new(dir.path()).unwrap();
        let rows = aggregate(&[item("doc_1")], &checkpoints).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_csv_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let checkpoints = CheckpointManager::new(dir.path()).unwrap();
        let item = item("doc_1");

        checkpoints
            .write_extraction(
                &item.document_id,
                &ExtractionArtifact {
                    source: item.document_id.clone(),
                    assets: vec![record("boiler", "500")],
                },
            )
            .unwrap();

        let rows = aggregate(std::slice::from_ref(&item), &checkpoints).unwrap();
        let out = dir.path().join("final.csv");
        write_csv(&rows, &out).unwrap();

        let contents = std::fs::read_to_string(&out).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        // Metadata columns sorted first, asset columns last in fixed order
        assert_eq!(
            header,
            "document_id,province,site_id,asset_type,capacity_value,capacity_unit,count_of_units"
        );
        let row = lines.next().unwrap();
        assert_eq!(row, "doc_1,Antwerp,1024,boiler,500,kW,");
    }
}
