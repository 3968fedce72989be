//! Adaptive closed/open thresholds derived from recent EAR samples

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::BlinkConfig;

/// Closed/open decision thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Smoothed EAR below this closes the eyes
    pub closed: f32,
    /// Smoothed EAR above this reopens the eyes
    pub open: f32,
}

impl Thresholds {
    /// Derive both thresholds from an open-eye baseline
    pub fn from_baseline(baseline: f32, closed_ratio: f32, open_ratio: f32) -> Self {
        Self {
            closed: baseline * closed_ratio,
            open: baseline * open_ratio,
        }
    }

    /// Width of the hysteresis dead zone
    pub fn band(&self) -> f32 {
        self.open - self.closed
    }
}

/// Keeps a sliding window of EAR samples and recalibrates thresholds from it
#[derive(Debug, Clone)]
pub struct AdaptiveThresholdTracker {
    history: VecDeque<f32>,
    capacity: usize,
    min_samples: usize,
    percentile: f32,
    closed_ratio: f32,
    open_ratio: f32,
    smoothing_window: usize,
    min_baseline: f32,
    thresholds: Thresholds,
    baseline: f32,
    calibrated: bool,
}

impl AdaptiveThresholdTracker {
    pub fn new(config: &BlinkConfig) -> Self {
        let initial = Thresholds {
            closed: config.initial_closed_threshold,
            open: config.initial_open_threshold,
        };
        Self {
            history: VecDeque::with_capacity(config.history_size + 1),
            capacity: config.history_size,
            min_samples: config.min_calibration_samples,
            percentile: config.baseline_percentile,
            closed_ratio: config.closed_ratio,
            open_ratio: config.open_ratio,
            smoothing_window: config.smoothing_window,
            min_baseline: config.min_baseline,
            thresholds: initial,
            baseline: config.initial_baseline,
            calibrated: false,
        }
    }

    /// Record a new average EAR sample and return the current thresholds
    pub fn observe(&mut self, ear: f32) -> Thresholds {
        if !ear.is_finite() {
            warn!("Ignoring non-finite EAR sample");
            return self.thresholds;
        }

        self.history.push_back(ear);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }

        if self.history.len() < self.min_samples {
            return self.thresholds;
        }

        let baseline = self.percentile_value();
        if baseline <= self.min_baseline {
            // a zero baseline would collapse both thresholds onto each other
            debug!(baseline, "Baseline too small, keeping previous thresholds");
            return self.thresholds;
        }

        self.baseline = baseline;
        self.thresholds = Thresholds::from_baseline(baseline, self.closed_ratio, self.open_ratio);
        if !self.calibrated {
            debug!(
                baseline,
                closed = self.thresholds.closed,
                open = self.thresholds.open,
                "Thresholds calibrated"
            );
            self.calibrated = true;
        }
        self.thresholds
    }

    fn percentile_value(&self) -> f32 {
        let mut sorted: Vec<f32> = self.history.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let index = (sorted.len() as f32 * self.percentile).floor() as usize;
        sorted[index.min(sorted.len() - 1)]
    }

    /// Mean of the most recent samples, `None` before the first sample
    pub fn smoothed(&self) -> Option<f32> {
        let n = self.smoothing_window.min(self.history.len());
        if n == 0 {
            return None;
        }
        let sum: f32 = self.history.iter().rev().take(n).sum();
        Some(sum / n as f32)
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Current open-eye baseline
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Whether thresholds have been derived from real samples yet
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
