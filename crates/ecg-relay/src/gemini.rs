//! Gemini `generateContent` client.
//!
//! Request shape:
//!
//! ```json
//! {"contents": [{"parts": [{"text": "..."}, {"inline_data": {"mime_type": "image/png", "data": "<base64>"}}]}]}
//! ```
//!
//! Only the first text part of the first candidate is used from the reply.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ecg_core::ImagePart;
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::upstream::Upstream;

/// Header carrying the API key, so it never shows up in request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Top-level `generateContent` request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation turns; always exactly one here
    pub contents: Vec<Content>,
}

/// One turn of the request.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    /// Prompt text followed by the images
    pub parts: Vec<Part>,
}

/// Text or inline image.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    /// Instruction text
    Text {
        /// The text
        text: String,
    },
    /// Base64-encoded image
    InlineData {
        /// The image payload
        inline_data: InlineData,
    },
}

/// Inline image payload.
#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    /// MIME type as uploaded
    pub mime_type: String,
    /// Base64 (standard alphabet, padded) image bytes
    pub data: String,
}

impl GenerateContentRequest {
    /// Builds a request with `prompt` first and then every image in order.
    pub fn new(prompt: &str, images: &[ImagePart]) -> Self {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(Part::Text {
            text: prompt.to_string(),
        });
        parts.extend(images.iter().map(|image| Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: STANDARD.encode(&image.data),
            },
        }));

        Self {
            contents: vec![Content { parts }],
        }
    }
}

/// Top-level `generateContent` response. Every level is optional so that a
/// structurally incomplete reply parses and is then rejected explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates
    pub candidates: Option<Vec<Candidate>>,
}

/// One generated candidate.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    /// Candidate content
    pub content: Option<CandidateContent>,
}

/// Content of a candidate.
#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    /// Generated parts
    pub parts: Option<Vec<ResponsePart>>,
}

/// One generated part; only text is of interest.
#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    /// Generated text
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if present.
    pub fn into_first_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Extracts `error.message` from an upstream error body, if there is one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()?
        .error?
        .message
        .filter(|m| !m.is_empty())
}

/// Client for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    /// Creates a client for the configured origin, model and timeout.
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RelayError::internal)?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.upstream_url.trim_end_matches('/'),
                config.model
            ),
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Upstream for GeminiClient {
    async fn generate(&self, api_key: &str, prompt: &str, images: &[ImagePart]) -> Result<String> {
        let request = GenerateContentRequest::new(prompt, images);

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(RelayError::internal)?;

        let status = response.status();
        let body = response.text().await.map_err(RelayError::internal)?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), %message, "Gemini API error");
            return Err(RelayError::upstream(status, message));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "Gemini API returned an unparseable body");
            RelayError::UpstreamInvalidResponse
        })?;

        let analysis = parsed
            .into_first_text()
            .ok_or(RelayError::UpstreamInvalidResponse)?;

        tracing::debug!(chars = analysis.len(), "Gemini API returned analysis");
        Ok(analysis)
    }
}
