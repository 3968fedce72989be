//! Facial Landmark Frames
//!
//! Types describing what an external face-landmark detector delivers per
//! video frame, plus sources that feed those frames into the blink pipeline:
//! - Normalized 2D landmark points (MediaPipe FaceMesh numbering)
//! - Per-frame input with a "face present" flag
//! - Eye contour index tables
//! - JSON-lines replay of recorded sessions

pub mod frame;
pub mod mesh;
pub mod source;

pub use frame::{FrameInput, LandmarkFrame, Point};
pub use mesh::{Eye, EyeContour, FACE_MESH_LANDMARKS, FACE_MESH_REFINED_LANDMARKS};
pub use source::{JsonLinesSource, LandmarkSource, VecSource};

use thiserror::Error;

/// Landmark source error types
#[derive(Error, Debug)]
pub enum LandmarkError {
    #[error("Failed to read landmark stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed frame on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
