//! Blink Detector
//!
//! Turns per-frame facial landmarks into a stream of blink events:
//! - Eye aspect ratio (EAR) extraction
//! - Adaptive closed/open thresholds from recent EAR history
//! - Hysteresis state machine emitting one event per eye closure
//! - Blink rate and cadence analysis
//! - Face presence / detection confidence
//!
//! Frames are processed strictly one at a time through `&mut self`. Callers
//! receiving frames from a re-entrant or async source must serialize them
//! before they reach the detector.

pub mod analysis;
pub mod config;
pub mod ear;
pub mod presence;
pub mod sink;
pub mod state;
pub mod threshold;

pub use analysis::{BlinkAnalyzer, BlinkPattern, BlinkStats};
pub use config::{AnalyzerConfig, BlinkConfig};
pub use ear::{EarExtractor, EyeMeasurement, DEFAULT_EAR};
pub use presence::{Presence, PresenceTracker};
pub use sink::{BlinkNotification, BlinkSink};
pub use state::{BlinkEvent, BlinkSource, BlinkState, BlinkStateMachine, Transition};
pub use threshold::{AdaptiveThresholdTracker, Thresholds};

use landmarks::FrameInput;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Blink detector error types
#[derive(Error, Debug)]
pub enum BlinkError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result of processing one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameOutcome {
    pub timestamp_ms: u64,

    /// Whether the frame carried a face
    pub face_detected: bool,

    /// Average EAR of this frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f32>,

    /// Smoothed EAR fed to the state machine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothed_ear: Option<f32>,

    /// Thresholds in effect after this frame
    pub thresholds: Thresholds,

    /// Eye state after this frame
    pub state: BlinkState,

    /// Blink emitted by this frame, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink: Option<BlinkNotification>,

    pub presence: Presence,
}

/// Pull-queryable detector state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorSnapshot {
    /// Blinks counted this session
    pub total_blinks: u64,
    /// Blinks registered by hand
    pub manual_blinks: u64,
    /// Rate and cadence at the snapshot time
    pub stats: BlinkStats,
    pub thresholds: Thresholds,
    pub baseline: f32,
    pub calibrated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothed_ear: Option<f32>,
    pub state: BlinkState,
    pub presence: Presence,
}

/// Blink detection pipeline
pub struct BlinkDetector {
    config: BlinkConfig,
    extractor: EarExtractor,
    tracker: AdaptiveThresholdTracker,
    machine: BlinkStateMachine,
    analyzer: BlinkAnalyzer,
    presence: PresenceTracker,
    total_blinks: u64,
    manual_blinks: u64,
    sinks: Vec<Box<dyn BlinkSink>>,
}

impl BlinkDetector {
    /// Create a new detector with configuration
    pub fn new(config: BlinkConfig) -> Result<Self, BlinkError> {
        config.validate()?;
        info!(
            history = config.history_size,
            closed_ratio = config.closed_ratio,
            open_ratio = config.open_ratio,
            "Creating blink detector"
        );
        Ok(Self {
            extractor: EarExtractor::new(config.fallback_ear),
            tracker: AdaptiveThresholdTracker::new(&config),
            machine: BlinkStateMachine::new(),
            analyzer: BlinkAnalyzer::new(config.analyzer.clone()),
            presence: PresenceTracker::new(),
            total_blinks: 0,
            manual_blinks: 0,
            sinks: Vec::new(),
            config,
        })
    }

    /// Subscribe a consumer to blink events
    pub fn add_sink(&mut self, sink: impl BlinkSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Process one landmark frame.
    ///
    /// A frame without a face only updates presence; the EAR pipeline and
    /// the blink state are left untouched.
    pub fn process_frame(&mut self, input: FrameInput) -> FrameOutcome {
        let timestamp_ms = input.timestamp_ms;
        let presence = self.presence.update(input.has_face());

        match input.into_face() {
            Some(face) => {
                let ear = self.extractor.average(&face);
                self.process_ear(timestamp_ms, ear)
            }
            None => FrameOutcome {
                timestamp_ms,
                face_detected: false,
                ear: None,
                smoothed_ear: None,
                thresholds: self.tracker.thresholds(),
                state: self.machine.state(),
                blink: None,
                presence,
            },
        }
    }

    /// Feed an already extracted average EAR sample
    pub fn process_ear(&mut self, timestamp_ms: u64, ear: f32) -> FrameOutcome {
        let thresholds = self.tracker.observe(ear);
        let smoothed = self.tracker.smoothed().unwrap_or(ear);

        let blink = match self.machine.step(smoothed, &thresholds) {
            Some(Transition::Closed) => {
                debug!(
                    ear = smoothed,
                    closed = thresholds.closed,
                    "Eyes closed, blink detected"
                );
                Some(self.emit(timestamp_ms, Some(smoothed), BlinkSource::Detected))
            }
            Some(Transition::Opened) => {
                debug!(ear = smoothed, open = thresholds.open, "Eyes reopened");
                None
            }
            None => None,
        };

        FrameOutcome {
            timestamp_ms,
            face_detected: true,
            ear: Some(ear),
            smoothed_ear: Some(smoothed),
            thresholds,
            state: self.machine.state(),
            blink,
            presence: self.presence.presence(),
        }
    }

    /// Count a blink that did not come from the EAR signal
    pub fn register_manual_blink(&mut self, timestamp_ms: u64) -> BlinkNotification {
        self.manual_blinks += 1;
        debug!(timestamp_ms, "Manual blink registered");
        self.emit(timestamp_ms, None, BlinkSource::Manual)
    }

    fn emit(&mut self, timestamp_ms: u64, ear: Option<f32>, source: BlinkSource) -> BlinkNotification {
        self.total_blinks += 1;
        let stats = self.analyzer.on_blink_event(timestamp_ms);
        let notification = BlinkNotification {
            event: BlinkEvent {
                timestamp_ms,
                count: self.total_blinks,
                ear,
                source,
            },
            stats,
        };
        for sink in &mut self.sinks {
            sink.on_blink(&notification);
        }
        notification
    }

    /// Current state as seen at `now_ms`
    pub fn snapshot(&self, now_ms: u64) -> DetectorSnapshot {
        DetectorSnapshot {
            total_blinks: self.total_blinks,
            manual_blinks: self.manual_blinks,
            stats: self.analyzer.stats_at(now_ms),
            thresholds: self.tracker.thresholds(),
            baseline: self.tracker.baseline(),
            calibrated: self.tracker.is_calibrated(),
            smoothed_ear: self.tracker.smoothed(),
            state: self.machine.state(),
            presence: self.presence.presence(),
        }
    }

    pub fn total_blinks(&self) -> u64 {
        self.total_blinks
    }

    pub fn config(&self) -> &BlinkConfig {
        &self.config
    }

    /// Start a fresh count; calibration, eye state and sinks carry over
    pub fn reset(&mut self) {
        info!(total_blinks = self.total_blinks, "Resetting blink detector");
        self.analyzer.reset();
        self.presence.reset();
        self.total_blinks = 0;
        self.manual_blinks = 0;
    }
}
