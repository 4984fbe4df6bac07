//! The seam between the handler and the external model API.

use async_trait::async_trait;
use ecg_core::ImagePart;

use crate::error::Result;

/// A multimodal text-generation service.
///
/// Implementations perform exactly one outbound call per invocation and
/// never retry.
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    /// Sends `prompt` followed by `images`, in order, and returns the first
    /// text the model produced.
    async fn generate(&self, api_key: &str, prompt: &str, images: &[ImagePart]) -> Result<String>;
}
