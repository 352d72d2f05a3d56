//! Document module - the unit of work flowing through the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a source document.
///
/// Derived from the input manifest (`<site id>_<sub id>_<file suffix>`), so
/// it is stable across runs — every checkpoint artifact path is derived
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a DocumentId from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Language tag of a converted document, as detected externally.
///
/// Only the three tags in the translated set trigger the translation
/// collaborator; everything else passes through untranslated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    /// French
    Fr,
    /// Dutch
    Nl,
    /// German
    De,
    /// English (the canonical language, never translated)
    En,
    /// Any other detected tag, carried verbatim
    Other(String),
}

impl Language {
    /// Parse a detected language code
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "fr" => Language::Fr,
            "nl" => Language::Nl,
            "de" => Language::De,
            "en" => Language::En,
            other => Language::Other(other.to_string()),
        }
    }

    /// Get the language code as a string
    pub fn as_code(&self) -> &str {
        match self {
            Language::Fr => "fr",
            Language::Nl => "nl",
            Language::De => "de",
            Language::En => "en",
            Language::Other(code) => code,
        }
    }

    /// Whether this language is in the translated set (fr, nl, de).
    ///
    /// Documents outside this set are extracted as-is, untranslated.
    pub fn needs_translation(&self) -> bool {
        matches!(self, Language::Fr | Language::Nl | Language::De)
    }
}

/// A source document after text conversion.
///
/// Immutable once produced; owned by the pipeline driver for its lifetime.
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable identifier, also the checkpoint artifact stem
    pub id: DocumentId,

    /// Full converted text
    pub text: String,

    /// Externally detected language tag
    pub language: Language,
}

impl Document {
    /// Create a document with an already-canonical (English) text
    pub fn new(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            language: Language::En,
        }
    }

    /// Set the detected language tag
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
