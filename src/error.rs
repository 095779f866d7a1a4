//! Errors from the editor's file-facing edges.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The screenshot did not overlap the canvas, so there was nothing to flatten.
    #[error("snapshot region is empty")]
    EmptySnapshot,
}

pub type Result<T> = std::result::Result<T, EditorError>;
