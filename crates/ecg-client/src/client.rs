//! HTTP client for `POST /api/analyze`.

use async_trait::async_trait;
use ecg_core::{ANALYZE_PATH, AnalysisBackend, AnalysisResponse, ErrorResponse, IMAGES_FIELD, ImagePart};
use reqwest::multipart::{Form, Part};

use crate::error::{ClientError, FALLBACK_MESSAGE, Result};

/// Relay origin used when none is configured.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

/// Client for the relay's analysis endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    /// Creates a client for the relay at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), ANALYZE_PATH),
        }
    }

    /// Full URL of the analysis endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the images, in order, and returns the analysis text.
    pub async fn analyze_images(&self, images: &[ImagePart]) -> Result<String> {
        let form = build_form(images)?;

        tracing::debug!(image_count = images.len(), endpoint = %self.endpoint, "Submitting ECG images");

        let response = self.http.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            tracing::warn!(status = status.as_u16(), %message, "Relay rejected analysis request");
            return Err(ClientError::Relay { status, message });
        }

        let parsed: AnalysisResponse =
            serde_json::from_str(&body).map_err(|_| ClientError::InvalidResponse)?;
        Ok(parsed.analysis)
    }
}

/// One `images` part per image, carrying its file name and MIME type.
fn build_form(images: &[ImagePart]) -> Result<Form> {
    let mut form = Form::new();
    for image in images {
        let part = Part::bytes(image.data.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        form = form.part(IMAGES_FIELD, part);
    }
    Ok(form)
}

#[async_trait]
impl AnalysisBackend for RelayClient {
    async fn analyze(&self, images: Vec<ImagePart>) -> ecg_core::Result<String> {
        Ok(self.analyze_images(&images).await?)
    }
}
