//! FaceMesh landmark numbering for the eye regions

use serde::{Deserialize, Serialize};

/// Landmarks produced by FaceMesh without iris refinement
pub const FACE_MESH_LANDMARKS: usize = 468;

/// Landmarks produced by FaceMesh with iris refinement
pub const FACE_MESH_REFINED_LANDMARKS: usize = 478;

const LEFT_EYE_CONTOUR: [usize; 16] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];

const RIGHT_EYE_CONTOUR: [usize; 16] = [
    362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
];

/// Eye selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Contour table for this eye
    pub fn contour(self) -> EyeContour {
        match self {
            Eye::Left => EyeContour(&LEFT_EYE_CONTOUR),
            Eye::Right => EyeContour(&RIGHT_EYE_CONTOUR),
        }
    }
}

/// 16-point eye contour as laid out by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeContour(&'static [usize; 16]);

impl EyeContour {
    /// Landmark id of the upper eyelid reference point
    pub fn upper_lid(&self) -> usize {
        self.0[1]
    }

    /// Landmark id of the lower eyelid reference point
    pub fn lower_lid(&self) -> usize {
        self.0[5]
    }

    /// Landmark ids of the two eye corners
    pub fn corners(&self) -> (usize, usize) {
        (self.0[0], self.0[8])
    }

    pub fn ids(&self) -> &'static [usize; 16] {
        self.0
    }
}
