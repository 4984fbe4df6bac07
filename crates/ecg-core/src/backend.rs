//! The seam between the session and whatever performs the analysis.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::ImagePart;

/// Something that turns a batch of ECG images into a free-text analysis.
///
/// The production implementation is `ecg_client::RelayClient`, which posts
/// the images to the relay endpoint.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyzes the images, in order, and returns the interpretation text.
    async fn analyze(&self, images: Vec<ImagePart>) -> Result<String>;
}

/// Canned backend for tests and offline runs.
///
/// Replies are served in order; once they run out, the last one repeats.
#[derive(Debug)]
pub struct MockAnalysisBackend {
    replies: Vec<std::result::Result<String, String>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<Vec<ImagePart>>>,
}

impl MockAnalysisBackend {
    /// Creates a mock that serves the given replies in order.
    pub fn new(replies: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            replies,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Creates a mock that always returns `text`.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Creates a mock that always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![Err(message.into())])
    }

    /// Number of times [`AnalysisBackend::analyze`] was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Images passed to the most recent call.
    pub fn last_request(&self) -> Option<Vec<ImagePart>> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl AnalysisBackend for MockAnalysisBackend {
    async fn analyze(&self, images: Vec<ImagePart>) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(images);

        let reply = self
            .replies
            .get(n)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or_else(|| Err("mock backend has no replies".to_string()));

        reply.map_err(Error::backend)
    }
}
