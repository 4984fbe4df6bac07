//! The upload batch and its previews.
//!
//! [`UploadState`] owns the ordered batch of admitted files plus the preview
//! data URLs produced for them. Preview reads run asynchronously and may
//! finish in any order, so finished previews are stored by [`FileId`] and
//! only assembled into batch order when read back.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{CandidateFile, FileId, ImagePart};
use crate::validator::{ImageValidator, ValidationError};

/// One admitted file together with its stable identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Identity used to key asynchronous work on this file
    pub id: FileId,

    /// The admitted file
    pub file: CandidateFile,
}

/// Ordered sequence of admitted files; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadBatch {
    entries: Vec<BatchEntry>,
}

impl UploadBatch {
    /// Returns the entries in display order.
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Number of files in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the batch holds no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a file with this id is still in the batch.
    pub fn contains(&self, id: FileId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Packages the batch for submission, in display order.
    pub fn to_parts(&self) -> Vec<ImagePart> {
        self.entries.iter().map(|e| e.file.to_part()).collect()
    }
}

/// Preview state of one batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// The read for this file has not finished yet.
    Pending,

    /// `data:` URL ready for display.
    Ready(String),
}

impl Preview {
    /// Returns the data URL if the preview is ready.
    pub fn data_url(&self) -> Option<&str> {
        match self {
            Preview::Pending => None,
            Preview::Ready(url) => Some(url),
        }
    }
}

/// Work item for generating the preview of a newly admitted file.
#[derive(Debug, Clone)]
pub struct PreviewJob {
    /// File the preview belongs to
    pub id: FileId,

    /// MIME type embedded in the data URL
    pub mime_type: String,

    /// File contents
    pub bytes: Arc<[u8]>,
}

/// Result of [`UploadState::add_files`].
#[derive(Debug, Default)]
pub struct AddOutcome {
    /// Ids of the files appended to the batch, in order
    pub admitted: Vec<FileId>,

    /// Validation failures for this addition
    pub rejected: Vec<ValidationError>,

    /// Preview work for the newly admitted files only
    pub jobs: Vec<PreviewJob>,
}

impl AddOutcome {
    /// Returns `true` if the batch changed.
    pub fn changed(&self) -> bool {
        !self.admitted.is_empty()
    }
}

/// Batch plus previews, mutated only through its transition methods.
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    validator: ImageValidator,
    batch: UploadBatch,
    previews: HashMap<FileId, String>,
}

impl UploadState {
    /// Creates an empty upload state with the given validator.
    pub fn new(validator: ImageValidator) -> Self {
        Self {
            validator,
            batch: UploadBatch::default(),
            previews: HashMap::new(),
        }
    }

    /// Returns the validator in use.
    pub fn validator(&self) -> &ImageValidator {
        &self.validator
    }

    /// Returns the current batch.
    pub fn batch(&self) -> &UploadBatch {
        &self.batch
    }

    /// Validates `candidates` and appends the survivors to the batch.
    pub fn add_files(&mut self, candidates: Vec<CandidateFile>) -> AddOutcome {
        let admission = self.validator.admit(self.batch.len(), candidates);
        let mut outcome = AddOutcome {
            rejected: admission.rejected,
            ..AddOutcome::default()
        };

        for file in admission.accepted {
            let id = FileId::new();
            outcome.jobs.push(PreviewJob {
                id,
                mime_type: file.mime_type.clone(),
                bytes: Arc::clone(&file.bytes),
            });
            outcome.admitted.push(id);
            self.batch.entries.push(BatchEntry { id, file });
        }

        tracing::debug!(
            admitted = outcome.admitted.len(),
            rejected = outcome.rejected.len(),
            batch_len = self.batch.len(),
            "Added files to batch"
        );

        outcome
    }

    /// Removes the entry at `index` together with its preview.
    pub fn remove_file(&mut self, index: usize) -> Result<&UploadBatch> {
        if index >= self.batch.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.batch.len(),
            });
        }

        let entry = self.batch.entries.remove(index);
        self.previews.remove(&entry.id);
        tracing::debug!(index, id = %entry.id, "Removed file from batch");
        Ok(&self.batch)
    }

    /// Clears the batch and every preview.
    pub fn reset(&mut self) {
        self.batch.entries.clear();
        self.previews.clear();
    }

    /// Records a finished preview read.
    ///
    /// Returns `false` and drops the data URL when the file has left the
    /// batch since the read was started.
    pub fn complete_preview(&mut self, id: FileId, data_url: String) -> bool {
        if !self.batch.contains(id) {
            tracing::debug!(%id, "Discarding preview for file no longer in batch");
            return false;
        }
        self.previews.insert(id, data_url);
        true
    }

    /// Previews aligned index-for-index with the batch.
    pub fn previews(&self) -> Vec<Preview> {
        self.batch
            .entries
            .iter()
            .map(|e| match self.previews.get(&e.id) {
                Some(url) => Preview::Ready(url.clone()),
                None => Preview::Pending,
            })
            .collect()
    }

    /// Returns `true` once every entry in the batch has a preview.
    pub fn previews_complete(&self) -> bool {
        self.batch
            .entries
            .iter()
            .all(|e| self.previews.contains_key(&e.id))
    }
}
