//! Landmark frame types

use serde::{Deserialize, Serialize};

/// A landmark position in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Landmarks of a single detected face
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture timestamp (milliseconds)
    pub timestamp_ms: u64,
    /// Points ordered by detector landmark id
    pub landmarks: Vec<Point>,
}

impl LandmarkFrame {
    /// Create a new landmark frame
    pub fn new(timestamp_ms: u64, landmarks: Vec<Point>) -> Self {
        Self {
            timestamp_ms,
            landmarks,
        }
    }

    /// Look up a landmark by detector id
    pub fn get(&self, id: usize) -> Option<Point> {
        self.landmarks.get(id).copied()
    }

    /// Number of landmarks in the frame
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// Per-frame payload delivered by the landmark detector callback
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Capture timestamp (milliseconds)
    pub timestamp_ms: u64,
    /// Whether the detector found a face in this frame
    #[serde(default = "default_present")]
    pub present: bool,
    /// Landmarks of the first detected face (empty when absent)
    #[serde(default)]
    pub landmarks: Vec<Point>,
}

fn default_present() -> bool {
    true
}

impl FrameInput {
    /// Frame with a detected face
    pub fn with_face(timestamp_ms: u64, landmarks: Vec<Point>) -> Self {
        Self {
            timestamp_ms,
            present: true,
            landmarks,
        }
    }

    /// Frame where detection failed
    pub fn no_face(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            present: false,
            landmarks: Vec::new(),
        }
    }

    /// Whether there is a face to analyze.
    ///
    /// A frame flagged present but carrying no points counts as absent.
    pub fn has_face(&self) -> bool {
        self.present && !self.landmarks.is_empty()
    }

    /// Landmarks to analyze, if a face is actually present
    pub fn into_face(self) -> Option<LandmarkFrame> {
        if self.has_face() {
            Some(LandmarkFrame::new(self.timestamp_ms, self.landmarks))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_landmark_lookup() {
        let frame = LandmarkFrame::new(0, vec![Point::new(0.1, 0.2)]);
        assert_eq!(frame.get(0), Some(Point::new(0.1, 0.2)));
        assert_eq!(frame.get(1), None);
    }

    #[test]
    fn test_empty_present_frame_has_no_face() {
        let input = FrameInput::with_face(10, Vec::new());
        assert!(!input.has_face());
        assert!(input.into_face().is_none());
        assert!(FrameInput::no_face(10).into_face().is_none());
    }

    #[test]
    fn test_present_defaults_to_true() {
        let input: FrameInput =
            serde_json::from_str(r#"{"timestamp_ms": 5, "landmarks": [{"x": 0.5, "y": 0.5}]}"#).unwrap();
        assert!(input.present);
        assert_eq!(input.into_face().unwrap().len(), 1);
    }

    #[test]
    fn test_non_finite_point() {
        assert!(Point::new(0.2, 0.3).is_finite());
        assert!(!Point::new(f32::NAN, 0.3).is_finite());
    }
}
