//! JSON contract between the relay endpoint and its clients.

use serde::{Deserialize, Serialize};

/// Path of the analysis endpoint.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Multipart field name carrying each image (repeated once per image).
pub const IMAGES_FIELD: &str = "images";

/// Body of a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Model interpretation, passed through unmodified
    pub analysis: String,
}

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// User-facing message
    pub message: String,
}
