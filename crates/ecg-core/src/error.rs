//! Error types for the ECG core library.

use crate::validator::ValidationError;

/// Errors that can occur while driving an analysis session.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A candidate file was rejected by the image validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Submission attempted with no images in the batch
    #[error("No image selected: please upload an ECG image first")]
    EmptyBatch,

    /// Submission attempted while another analysis is still loading
    #[error("An analysis is already in progress")]
    AnalysisInProgress,

    /// Batch index does not refer to an entry
    #[error("Index {index} is out of range for a batch of {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current batch length
        len: usize,
    },

    /// The analysis backend (relay, mock, ...) reported a failure
    #[error("{message}")]
    Backend {
        /// User-facing message as reported by the backend
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A preview read task failed to complete
    #[error("Preview generation failed: {message}")]
    Preview {
        /// What went wrong
        message: String,
    },
}

/// Convenience `Result` type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new backend error with a message.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Error::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new backend error with a message and source error.
    pub fn backend_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new preview error.
    pub fn preview<S: Into<String>>(message: S) -> Self {
        Error::Preview {
            message: message.into(),
        }
    }

    /// Returns `true` if the error was raised before anything left the client.
    ///
    /// Client-side errors never reach the relay endpoint.
    pub fn is_client_side(&self) -> bool {
        match self {
            Error::Validation(_) => true,
            Error::EmptyBatch => true,
            Error::AnalysisInProgress => true,
            Error::IndexOutOfRange { .. } => true,
            Error::Preview { .. } => true,
            Error::Backend { .. } => false,
        }
    }
}
