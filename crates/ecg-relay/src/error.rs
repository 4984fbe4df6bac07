//! Error types for the relay endpoint.
//!
//! Every variant maps to an HTTP status and a user-facing message. Details
//! of internal failures are logged and never sent to the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ecg_core::ErrorResponse;

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur while handling an analysis request.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    /// The request carried no image files
    #[error("No images provided. Please upload one or more ECG images.")]
    NoImages,

    /// The upstream credential is not configured
    #[error(
        "API key not configured. Please set GOOGLE_CLOUD_API_KEY in your environment variables."
    )]
    ServerMisconfigured,

    /// The upstream API answered with a non-success status
    #[error("Error from Gemini API: {message}")]
    Upstream {
        /// Status reported by the upstream, propagated to the caller
        status: StatusCode,
        /// Message extracted from the upstream error body
        message: String,
    },

    /// The upstream answered success but without a usable analysis
    #[error("Gemini API did not return a valid analysis.")]
    UpstreamInvalidResponse,

    /// Anything else that went wrong while processing the request
    #[error("Internal error: {source}")]
    Internal {
        /// Underlying failure, logged server-side only
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RelayError {
    /// Creates an upstream error.
    pub fn upstream<S: Into<String>>(status: StatusCode, message: S) -> Self {
        RelayError::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Wraps any failure as an internal error.
    pub fn internal<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        RelayError::Internal {
            source: source.into(),
        }
    }

    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::NoImages => StatusCode::BAD_REQUEST,
            RelayError::ServerMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Upstream { status, .. } => *status,
            RelayError::UpstreamInvalidResponse => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the caller.
    pub fn client_message(&self) -> String {
        match self {
            RelayError::Internal { .. } => {
                "Internal server error. Please check server logs for details.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            RelayError::Internal { .. } | RelayError::ServerMisconfigured => {
                tracing::error!(status = status.as_u16(), error = %self, "Analysis request failed");
            }
            _ => {
                tracing::warn!(status = status.as_u16(), error = %self, "Analysis request rejected");
            }
        }

        let body = ErrorResponse {
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}
