//! Stage module - pipeline stages and per-document completion state

/// A pipeline stage for one document.
///
/// Stages run strictly in order; an artifact for stage N is produced only
/// from successfully processed stage N-1 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Source file fetched to disk
    Download,
    /// Source converted to plain text (and translated if needed)
    Convert,
    /// Asset records extracted and persisted as JSON
    Extract,
}

impl Stage {
    /// Stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Download => "download",
            Stage::Convert => "convert",
            Stage::Extract => "extract",
        }
    }

    /// File extension of this stage's checkpoint artifact
    pub fn artifact_extension(&self) -> &'static str {
        match self {
            Stage::Download => "pdf",
            Stage::Convert => "txt",
            Stage::Extract => "json",
        }
    }

    /// The stage that must complete before this one
    pub fn previous(&self) -> Option<Self> {
        match self {
            Stage::Download => None,
            Stage::Convert => Some(Stage::Download),
            Stage::Extract => Some(Stage::Convert),
        }
    }
}

/// How far a document has progressed, derived purely from which checkpoint
/// artifacts exist on disk.
///
/// Making this an explicit enum (rather than scattered `exists()` checks)
/// keeps the resume logic in one place: the furthest stage whose artifact
/// exists wins, and anything before it is never re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    /// No artifact exists yet
    Pending,
    /// Source file present, text conversion still needed
    Downloaded,
    /// Text artifact present, extraction still needed
    Converted,
    /// Extraction artifact present; the document is done
    Extracted,
}

impl StageStatus {
    /// Whether the given stage is complete at this status
    pub fn is_complete(&self, stage: Stage) -> bool {
        match stage {
            Stage::Download => {
                matches!(self, StageStatus::Downloaded | StageStatus::Converted | StageStatus::Extracted)
            }
            Stage::Convert => matches!(self, StageStatus::Converted | StageStatus::Extracted),
            Stage::Extract => matches!(self, StageStatus::Extracted),
        }
    }
}
