//! Image payloads: what the user picked, and what goes over the wire.

use std::sync::Arc;

/// A file the user selected, before validation.
///
/// The bytes are shared so that preview reads and the eventual submission
/// can hold the same buffer without copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Original file name, for display and for the multipart part
    pub name: String,

    /// Declared MIME type (e.g. `image/png`)
    pub mime_type: String,

    /// File contents
    pub bytes: Arc<[u8]>,
}

impl CandidateFile {
    /// Creates a new candidate file.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the file in bytes.
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Converts into the wire representation sent to the relay.
    pub fn to_part(&self) -> ImagePart {
        ImagePart {
            file_name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            data: Arc::clone(&self.bytes),
        }
    }
}

/// One image of an analysis request: raw bytes plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    /// File name carried in the multipart part
    pub file_name: String,

    /// MIME type forwarded to the upstream model
    pub mime_type: String,

    /// Raw image bytes (base64-encoded only at the upstream boundary)
    pub data: Arc<[u8]>,
}

impl ImagePart {
    /// Creates a new image part.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}
