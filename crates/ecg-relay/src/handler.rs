//! Request handlers.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use ecg_core::{AnalysisResponse, IMAGES_FIELD, ImagePart};
use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};
use crate::prompt;
use crate::server::AppState;

/// Fallback MIME type for parts uploaded without one.
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// `POST /api/analyze`
///
/// Collects every file part named `images`, forwards them with the fixed
/// prompt to the upstream in a single call, and returns the first text of
/// the reply.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>> {
    let mut multipart = multipart.map_err(RelayError::internal)?;
    let images = collect_images(&mut multipart).await?;

    if images.is_empty() {
        return Err(RelayError::NoImages);
    }

    let api_key = state
        .config
        .api_key()
        .ok_or(RelayError::ServerMisconfigured)?;

    tracing::info!(image_count = images.len(), "Forwarding ECG images for analysis");

    let prompt = prompt::for_image_count(images.len());
    let analysis = state.upstream.generate(api_key, prompt, &images).await?;

    Ok(Json(AnalysisResponse { analysis }))
}

/// Reads the image parts out of the multipart body, in upload order.
///
/// Parts with another name, and non-file parts, are skipped.
async fn collect_images(multipart: &mut Multipart) -> Result<Vec<ImagePart>> {
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(RelayError::internal)? {
        if field.name() != Some(IMAGES_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let data = field.bytes().await.map_err(RelayError::internal)?;

        tracing::debug!(%file_name, %mime_type, bytes = data.len(), "Received image part");
        images.push(ImagePart::new(file_name, mime_type, data.to_vec()));
    }

    Ok(images)
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server status ("ok").
    pub status: String,
    /// Server version.
    pub version: String,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
