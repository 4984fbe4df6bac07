//! Image validation for candidate uploads.
//!
//! A file is admissible when its MIME type starts with `image/` and it is
//! no larger than [`MAX_IMAGE_BYTES`]. On top of the per-file checks the
//! validator enforces a batch cap: an addition that would push the batch
//! past the cap is rejected as a whole, never truncated.

use crate::types::CandidateFile;

/// Largest accepted image, in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Default maximum number of images in one batch.
pub const DEFAULT_MAX_IMAGES: usize = 5;

/// Why a candidate (or a whole addition) was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The declared MIME type is not `image/*`
    #[error("{name} is not an image ({mime_type}); please upload an ECG image file")]
    NotAnImage {
        /// File name
        name: String,
        /// Declared MIME type
        mime_type: String,
    },

    /// The file exceeds the size limit
    #[error("{name} is too large ({size} bytes); images must be at most {limit} bytes")]
    TooLarge {
        /// File name
        name: String,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Admitting the addition would exceed the batch cap
    #[error("Too many images: {attempted} selected but only {available} of {max} slots remain")]
    BatchFull {
        /// Number of valid files in the attempted addition
        attempted: usize,
        /// Free slots left in the batch
        available: usize,
        /// Batch cap
        max: usize,
    },
}

/// Decision for one attempted addition.
#[derive(Debug, Default)]
pub struct Admission {
    /// Files that may be appended, in the order they were offered
    pub accepted: Vec<CandidateFile>,

    /// One entry per refused file, or a single `BatchFull` for the addition
    pub rejected: Vec<ValidationError>,
}

/// Checks candidates against type, size and count limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageValidator {
    max_bytes: u64,
    max_images: usize,
}

impl ImageValidator {
    /// Creates a validator with the default limits.
    pub fn new() -> Self {
        Self {
            max_bytes: MAX_IMAGE_BYTES,
            max_images: DEFAULT_MAX_IMAGES,
        }
    }

    /// Sets a custom batch cap.
    pub fn with_max_images(mut self, max: usize) -> Self {
        self.max_images = max;
        self
    }

    /// Sets a custom per-file size limit.
    pub fn with_max_bytes(mut self, max: u64) -> Self {
        self.max_bytes = max;
        self
    }

    /// Returns the batch cap.
    pub fn max_images(&self) -> usize {
        self.max_images
    }

    /// Returns the per-file size limit.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Checks a single candidate.
    pub fn check(&self, candidate: &CandidateFile) -> Result<(), ValidationError> {
        if !candidate.mime_type.starts_with("image/") {
            return Err(ValidationError::NotAnImage {
                name: candidate.name.clone(),
                mime_type: candidate.mime_type.clone(),
            });
        }

        let size = candidate.byte_size();
        if size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                name: candidate.name.clone(),
                size,
                limit: self.max_bytes,
            });
        }

        Ok(())
    }

    /// Decides which candidates join a batch that already holds `existing` files.
    ///
    /// Individually invalid files are reported and skipped; they do not
    /// count against the cap. If the remaining valid files do not all fit,
    /// none of them are accepted.
    pub fn admit(&self, existing: usize, candidates: Vec<CandidateFile>) -> Admission {
        let mut admission = Admission::default();

        for candidate in candidates {
            match self.check(&candidate) {
                Ok(()) => admission.accepted.push(candidate),
                Err(reason) => {
                    tracing::debug!(name = %candidate.name, %reason, "Rejected candidate");
                    admission.rejected.push(reason);
                }
            }
        }

        let available = self.max_images.saturating_sub(existing);
        if admission.accepted.len() > available {
            tracing::debug!(
                attempted = admission.accepted.len(),
                available,
                max = self.max_images,
                "Rejected addition over batch cap"
            );
            admission.rejected.push(ValidationError::BatchFull {
                attempted: admission.accepted.len(),
                available,
                max: self.max_images,
            });
            admission.accepted.clear();
        }

        admission
    }
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self::new()
    }
}
