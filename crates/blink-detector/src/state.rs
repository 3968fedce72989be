//! Blink state machine and blink events

use serde::{Deserialize, Serialize};

use crate::Thresholds;

/// Eye state tracked across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkState {
    #[default]
    EyesOpen,
    EyesClosed,
}

/// State change produced by a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Eyes just closed; this is the blink
    Closed,
    /// Eyes reopened
    Opened,
}

/// Where a blink came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkSource {
    /// Detected from the EAR signal
    Detected,
    /// Registered by hand (test button, API call)
    Manual,
}

/// A single counted blink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinkEvent {
    /// When the eyes closed (milliseconds)
    pub timestamp_ms: u64,
    /// Session blink count including this one
    pub count: u64,
    /// Smoothed EAR that triggered the blink
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f32>,
    pub source: BlinkSource,
}

/// Two-state machine with hysteresis between the closed and open thresholds
#[derive(Debug, Clone, Default)]
pub struct BlinkStateMachine {
    state: BlinkState,
}

impl BlinkStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one smoothed EAR sample
    pub fn step(&mut self, smoothed_ear: f32, thresholds: &Thresholds) -> Option<Transition> {
        match self.state {
            BlinkState::EyesOpen if smoothed_ear < thresholds.closed => {
                self.state = BlinkState::EyesClosed;
                Some(Transition::Closed)
            }
            BlinkState::EyesClosed if smoothed_ear > thresholds.open => {
                self.state = BlinkState::EyesOpen;
                Some(Transition::Opened)
            }
            _ => None,
        }
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Thresholds = Thresholds { closed: 0.2, open: 0.28 };

    #[test]
    fn test_close_then_open() {
        let mut machine = BlinkStateMachine::new();
        assert_eq!(machine.step(0.3, &T), None);
        assert_eq!(machine.step(0.19, &T), Some(Transition::Closed));
        assert_eq!(machine.state(), BlinkState::EyesClosed);
        assert_eq!(machine.step(0.1, &T), None);
        assert_eq!(machine.step(0.29, &T), Some(Transition::Opened));
        assert_eq!(machine.state(), BlinkState::EyesOpen);
    }

    #[test]
    fn test_dead_zone_holds_state() {
        let mut machine = BlinkStateMachine::new();
        machine.step(0.1, &T);
        for _ in 0..10 {
            assert_eq!(machine.step(0.19, &T), None);
            assert_eq!(machine.step(0.25, &T), None);
        }
        assert_eq!(machine.state(), BlinkState::EyesClosed);
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        let mut machine = BlinkStateMachine::new();
        assert_eq!(machine.step(0.2, &T), None);
        machine.step(0.1, &T);
        assert_eq!(machine.step(0.28, &T), None);
        assert_eq!(machine.state(), BlinkState::EyesClosed);
    }
}
