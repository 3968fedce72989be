//! Face presence and detection confidence

use serde::{Deserialize, Serialize};

/// Confidence gained per frame with a face
const CONFIDENCE_GAIN: u8 = 2;
/// Confidence lost per frame without a face
const CONFIDENCE_DECAY: u8 = 1;
const MAX_CONFIDENCE: u8 = 100;

/// Face presence summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Presence {
    /// Face found in the latest frame
    pub face_present: bool,
    /// Detection confidence score (0-100)
    pub confidence: u8,
    /// Consecutive frames without a face
    pub absent_frames: u32,
}

/// Ramps a detection confidence score up and down with face presence.
///
/// Purely informational, blink detection does not read it.
#[derive(Debug, Clone, Default)]
pub struct PresenceTracker {
    presence: Presence,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, face_present: bool) -> Presence {
        let p = &mut self.presence;
        p.face_present = face_present;
        if face_present {
            p.confidence = p.confidence.saturating_add(CONFIDENCE_GAIN).min(MAX_CONFIDENCE);
            p.absent_frames = 0;
        } else {
            p.confidence = p.confidence.saturating_sub(CONFIDENCE_DECAY);
            p.absent_frames = p.absent_frames.saturating_add(1);
        }
        *p
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn reset(&mut self) {
        self.presence = Presence::default();
    }
}
