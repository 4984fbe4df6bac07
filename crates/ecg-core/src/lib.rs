#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! ECG Core Library
//!
//! Client-side model of the ECG analyzer: image validation, the upload batch
//! with its previews, the analysis lifecycle, and the view models the
//! front-end renders. Everything that talks HTTP lives in `ecg-relay` and
//! `ecg-client`; this crate only sees the [`AnalysisBackend`] trait.

pub mod analysis;
pub mod backend;
pub mod error;
pub mod preview;
pub mod session;
pub mod types;
pub mod upload;
pub mod validator;
pub mod view;

// Re-exports for convenience
pub use analysis::{AnalysisSnapshot, AnalysisState};
pub use backend::{AnalysisBackend, MockAnalysisBackend};
pub use error::{Error, Result};
pub use session::{AnalyzerSession, Notification, NotificationLevel, SubmissionTicket};
pub use types::{
    ANALYZE_PATH, AnalysisResponse, CandidateFile, ErrorResponse, FileId, IMAGES_FIELD, ImagePart,
};
pub use upload::{AddOutcome, BatchEntry, Preview, PreviewJob, UploadBatch, UploadState};
pub use validator::{ImageValidator, ValidationError};
pub use view::{ActiveView, ResultView, Screen, UploadItem, UploadView};
