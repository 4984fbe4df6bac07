//! Error types for ecg-client

use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when the relay fails without saying why.
pub const FALLBACK_MESSAGE: &str = "Failed to analyze ECG";

/// Result type alias for ecg-client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while calling the relay
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with a non-success status
    #[error("{message}")]
    Relay {
        /// Status returned by the relay
        status: StatusCode,
        /// The relay's `message`, or the fallback text
        message: String,
    },

    /// A success status with a body that is not `{analysis}`
    #[error("Relay returned an unexpected response body")]
    InvalidResponse,
}

impl ClientError {
    /// The text a user should see for this failure.
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::Relay { message, .. } => message,
            ClientError::Http(_) | ClientError::InvalidResponse => FALLBACK_MESSAGE,
        }
    }
}

impl From<ClientError> for ecg_core::Error {
    fn from(err: ClientError) -> Self {
        let message = err.user_message().to_string();
        ecg_core::Error::backend_with_source(message, err)
    }
}
