//! Preview generation for admitted images.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio::task::JoinSet;

use crate::error::{Error, Result};
use crate::types::FileId;
use crate::upload::PreviewJob;

/// Encodes raw image bytes as a `data:` URL.
///
/// # Examples
///
/// ```
/// use ecg_core::preview::data_url;
///
/// assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
/// ```
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Generates previews for every job concurrently.
///
/// Each job runs as its own blocking task. Results are returned in
/// completion order, which need not match the order of `jobs`; apply them
/// with [`UploadState::complete_preview`](crate::UploadState::complete_preview).
pub async fn generate_previews(jobs: Vec<PreviewJob>) -> Result<Vec<(FileId, String)>> {
    let mut set = JoinSet::new();
    for job in jobs {
        set.spawn_blocking(move || (job.id, data_url(&job.mime_type, &job.bytes)));
    }

    let mut completed = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        let (id, url) = joined.map_err(|e| Error::preview(e.to_string()))?;
        completed.push((id, url));
    }
    Ok(completed)
}
