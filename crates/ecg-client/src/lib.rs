//! # ecg-client
//!
//! Client for the ECG relay endpoint.
//!
//! [`RelayClient`] packages a batch of images as `multipart/form-data`
//! (one repeated `images` field per file), posts it to `/api/analyze`, and
//! maps the JSON reply back to either the analysis text or the relay's
//! user-facing message. It implements [`ecg_core::AnalysisBackend`] so an
//! [`ecg_core::AnalyzerSession`] can submit through it directly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod client;
pub mod error;

pub use client::{DEFAULT_RELAY_URL, RelayClient};
pub use error::{ClientError, Result};
