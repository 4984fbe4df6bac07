//! Loading local files as upload candidates.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ecg_core::CandidateFile;

/// MIME type declared for a file, from its extension.
///
/// Unknown extensions map to `application/octet-stream`, which the
/// validator then refuses as not an image.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Reads every path, in order.
pub async fn load_candidates(paths: &[PathBuf]) -> Result<Vec<CandidateFile>> {
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(%name, bytes = bytes.len(), "Loaded candidate file");
        candidates.push(CandidateFile::new(name, mime_type_for(path), bytes));
    }
    Ok(candidates)
}
