//! Core types shared by the session, the relay and the client.

mod ids;
mod image;
mod proptests;
pub mod wire;

pub use ids::FileId;
pub use image::{CandidateFile, ImagePart};
pub use wire::{ANALYZE_PATH, AnalysisResponse, ErrorResponse, IMAGES_FIELD};
