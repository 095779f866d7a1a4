//! Photo annotation editor: a background photo, a freehand drawing layer and text overlays
//! that can be dragged, corner-resized, pinched, rotated and panned.
//!
//! The overlay geometry lives in [`resize`] (single-pointer corner drags) and [`gesture`]
//! (concurrent pinch/pan/rotate composition); [`app`] wires both to egui input.

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod gesture;
pub mod overlay;
pub mod resize;

pub use config::EditorConfig;
pub use error::{EditorError, Result};
