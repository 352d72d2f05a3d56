//! Checkpoint manager - artifact existence as pipeline state
//!
//! No separate state store exists: the artifact IS the state. A stage is
//! complete for a document exactly when its artifact file exists at the
//! deterministic path derived from the document id. Writes go through a
//! temp-file-then-rename so a crashed run can never leave a
//! partially-written artifact that a later run would mistake for a
//! completed stage.

use crate::error::PipelineError;
use millwright_domain::{DocumentId, ExtractionArtifact, Stage, StageStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manages the per-stage artifact directories under one work directory.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    work_dir: PathBuf,
}

impl CheckpointManager {
    /// Open (creating if needed) the work directory and its stage subdirs
    pub fn new(work_dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let work_dir = work_dir.into();
        for stage in [Stage::Download, Stage::Convert, Stage::Extract] {
            fs::create_dir_all(work_dir.join(stage_dir_name(stage)))?;
        }
        Ok(Self { work_dir })
    }

    /// Root of the work directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Deterministic artifact path for a stage and document
    pub fn artifact_path(&self, stage: Stage, id: &DocumentId) -> PathBuf {
        self.work_dir
            .join(stage_dir_name(stage))
            .join(format!("{}.{}", id, stage.artifact_extension()))
    }

    /// Whether the stage is complete for the document
    pub fn is_complete(&self, stage: Stage, id: &DocumentId) -> bool {
        self.artifact_path(stage, id).exists()
    }

    /// Derive the document's overall status from artifact presence.
    ///
    /// The furthest stage with an existing artifact wins.
    pub fn status(&self, id: &DocumentId) -> StageStatus {
        if self.is_complete(Stage::Extract, id) {
            StageStatus::Extracted
        } else if self.is_complete(Stage::Convert, id) {
            StageStatus::Converted
        } else if self.is_complete(Stage::Download, id) {
            StageStatus::Downloaded
        } else {
            StageStatus::Pending
        }
    }

    /// Persist the converted text, completing the Convert stage
    pub fn write_text(&self, id: &DocumentId, text: &str) -> Result<(), PipelineError> {
        let path = self.artifact_path(Stage::Convert, id);
        write_atomic(&path, text.as_bytes())?;
        debug!(document = %id, path = %path.display(), "text artifact written");
        Ok(())
    }

    /// Read the converted text, if the Convert stage is complete
    pub fn read_text(&self, id: &DocumentId) -> Result<Option<String>, PipelineError> {
        let path = self.artifact_path(Stage::Convert, id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Persist the extraction artifact, completing the Extract stage.
    ///
    /// Written pretty-printed for human auditability. Called for every
    /// processed document, including failures (empty asset list), so reruns
    /// terminate instead of retrying indefinitely.
    pub fn write_extraction(
        &self,
        id: &DocumentId,
        artifact: &ExtractionArtifact,
    ) -> Result<(), PipelineError> {
        let path = self.artifact_path(Stage::Extract, id);
        let json = serde_json::to_vec_pretty(artifact)?;
        write_atomic(&path, &json)?;
        debug!(
            document = %id,
            assets = artifact.assets.len(),
            path = %path.display(),
            "extraction artifact written"
        );
        Ok(())
    }

    /// Read the extraction artifact, if the Extract stage is complete
    pub fn read_extraction(
        &self,
        id: &DocumentId,
    ) -> Result<Option<ExtractionArtifact>, PipelineError> {
        let path = self.artifact_path(Stage::Extract, id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

fn stage_dir_name(stage: Stage) -> &'static str {
    stage.artifact_extension()
}

/// Write to a temp sibling, then rename into place.
///
/// Rename within one directory is atomic on the platforms we care about,
/// so a reader never observes a half-written artifact.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PipelineError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
