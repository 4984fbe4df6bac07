//! # ecg-relay
//!
//! HTTP relay between the ECG analyzer front-end and a multimodal model.
//!
//! This crate provides:
//! - `POST /api/analyze`: multipart upload of one or more ECG images
//! - A Gemini `generateContent` client behind the [`Upstream`] trait
//! - Mapping of every failure onto a `{message}` body and HTTP status
//! - Server configuration from flags and environment

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod gemini;
pub mod handler;
pub mod prompt;
pub mod server;
pub mod upstream;

pub use config::{RelayArgs, RelayConfig};
pub use error::{RelayError, Result};
pub use gemini::GeminiClient;
pub use server::{AppState, router, serve};
pub use upstream::Upstream;
