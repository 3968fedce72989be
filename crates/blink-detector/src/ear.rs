//! Eye aspect ratio extraction

use landmarks::{Eye, LandmarkFrame, Point};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// EAR reported when the eye geometry cannot be measured
pub const DEFAULT_EAR: f32 = 0.3;

/// Raw eye geometry for one eye
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeMeasurement {
    /// Vertical eyelid separation
    pub height: f32,
    /// Horizontal eye-corner separation
    pub width: f32,
}

impl EyeMeasurement {
    /// Measure one eye, `None` if a reference landmark is missing or not finite
    pub fn measure(frame: &LandmarkFrame, eye: Eye) -> Option<Self> {
        let point = |id: usize| frame.get(id).filter(Point::is_finite);
        let contour = eye.contour();
        let (a, b) = contour.corners();
        let upper = point(contour.upper_lid())?;
        let lower = point(contour.lower_lid())?;
        let corner_a = point(a)?;
        let corner_b = point(b)?;

        Some(Self {
            height: (upper.y - lower.y).abs(),
            width: (corner_a.x - corner_b.x).abs(),
        })
    }

    /// Height over width, `None` when the ratio is undefined
    pub fn ratio(&self) -> Option<f32> {
        if self.width == 0.0 {
            return None;
        }
        let ratio = self.height / self.width;
        ratio.is_finite().then_some(ratio)
    }
}

/// Turns landmark frames into eye aspect ratios.
///
/// Never fails: degenerate or malformed geometry yields the fallback ratio.
#[derive(Debug, Clone, Copy)]
pub struct EarExtractor {
    fallback: f32,
}

impl Default for EarExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_EAR)
    }
}

impl EarExtractor {
    pub fn new(fallback: f32) -> Self {
        Self { fallback }
    }

    /// EAR of a single eye
    pub fn eye(&self, frame: &LandmarkFrame, eye: Eye) -> f32 {
        match EyeMeasurement::measure(frame, eye) {
            Some(m) => {
                trace!(?eye, height = m.height, width = m.width, "eye geometry");
                m.ratio().unwrap_or(self.fallback)
            }
            None => {
                trace!(?eye, landmarks = frame.len(), "eye landmarks missing");
                self.fallback
            }
        }
    }

    /// Mean EAR of both eyes
    pub fn average(&self, frame: &LandmarkFrame) -> f32 {
        (self.eye(frame, Eye::Left) + self.eye(frame, Eye::Right)) / 2.0
    }
}
