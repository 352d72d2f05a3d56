//! Asset module - structured records extracted from documents

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A field value that models emit as either a string or a number.
///
/// Capacity and count fields come back from the LLM in whichever form the
/// source text suggested ("500", 500, 500.0); both are preserved verbatim
/// rather than coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Textual value, kept as emitted
    Text(String),
    /// Numeric value
    Number(f64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

/// One physical equipment mention extracted from a document.
///
/// `asset_type` is the only required field; a record without a non-empty
/// asset type is invalid and is dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Equipment type (e.g. "boiler", "generator"). Required, non-empty.
    pub asset_type: String,

    /// Rated capacity, if stated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_value: Option<Scalar>,

    /// Unit of the capacity (e.g. "kW", "kVA")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_unit: Option<String>,

    /// Number of installed units, if stated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_of_units: Option<Scalar>,
}

impl AssetRecord {
    /// Create a record with only the asset type populated
    pub fn of_type(asset_type: impl Into<String>) -> Self {
        Self {
            asset_type: asset_type.into(),
            capacity_value: None,
            capacity_unit: None,
            count_of_units: None,
        }
    }

    /// Validate that the record carries a usable asset type
    pub fn validate(&self) -> Result<(), String> {
        if self.asset_type.trim().is_empty() {
            return Err("asset_type is empty".to_string());
        }
        Ok(())
    }
}

/// The persisted extraction checkpoint for one document.
///
/// Written as pretty-printed JSON, one file per document. Once this file
/// exists the document's extraction stage is complete and is never re-run,
/// including for documents whose extraction failed (empty asset list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionArtifact {
    /// Identifier of the originating document
    pub source: DocumentId,

    /// Validated asset records, possibly empty
    pub assets: Vec<AssetRecord>,
}

impl ExtractionArtifact {
    /// Artifact for a document that yielded no assets (or failed)
    pub fn empty(source: DocumentId) -> Self {
        Self {
            source,
            assets: Vec::new(),
        }
    }
}
