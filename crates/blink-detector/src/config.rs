//! Blink detection configuration

use serde::{Deserialize, Serialize};

use crate::BlinkError;

/// Blink detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Number of recent EAR samples kept for calibration
    pub history_size: usize,

    /// Samples required before thresholds are recalibrated
    pub min_calibration_samples: usize,

    /// Percentile of the history treated as the open-eye baseline (0-1)
    pub baseline_percentile: f32,

    /// Closed threshold as a fraction of the baseline
    pub closed_ratio: f32,

    /// Open threshold as a fraction of the baseline
    pub open_ratio: f32,

    /// Samples averaged into the smoothed EAR fed to the state machine
    pub smoothing_window: usize,

    /// Thresholds used until enough samples have accumulated
    pub initial_closed_threshold: f32,
    pub initial_open_threshold: f32,

    /// Baseline assumed before calibration
    pub initial_baseline: f32,

    /// Baselines at or below this value never recalibrate
    pub min_baseline: f32,

    /// EAR reported for degenerate or malformed eye geometry
    pub fallback_ear: f32,

    /// Rate and cadence analysis
    pub analyzer: AnalyzerConfig,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            history_size: 30,
            min_calibration_samples: 8,
            baseline_percentile: 0.75,
            closed_ratio: 0.72,
            open_ratio: 0.88,
            smoothing_window: 3,
            initial_closed_threshold: 0.2,
            initial_open_threshold: 0.28,
            initial_baseline: 0.3,
            min_baseline: 0.01,
            fallback_ear: 0.3,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl BlinkConfig {
    /// Create strict config (eyes must close further to count)
    pub fn strict() -> Self {
        Self {
            closed_ratio: 0.65,
            open_ratio: 0.85,
            smoothing_window: 4,
            ..Default::default()
        }
    }

    /// Create lenient config (shallow closures count)
    pub fn lenient() -> Self {
        Self {
            closed_ratio: 0.78,
            open_ratio: 0.92,
            smoothing_window: 2,
            ..Default::default()
        }
    }

    /// Check the configuration for values that would break detection
    pub fn validate(&self) -> Result<(), BlinkError> {
        if self.history_size == 0 {
            return Err(BlinkError::Config("history_size must be > 0".into()));
        }
        if self.min_calibration_samples == 0 || self.min_calibration_samples > self.history_size {
            return Err(BlinkError::Config(format!(
                "min_calibration_samples must be in [1, {}], got {}",
                self.history_size, self.min_calibration_samples
            )));
        }
        if !(0.0..=1.0).contains(&self.baseline_percentile) {
            return Err(BlinkError::Config(format!(
                "baseline_percentile must be in [0, 1], got {}",
                self.baseline_percentile
            )));
        }
        if !(self.closed_ratio > 0.0 && self.closed_ratio < self.open_ratio) {
            return Err(BlinkError::Config(format!(
                "closed_ratio ({}) must be positive and below open_ratio ({})",
                self.closed_ratio, self.open_ratio
            )));
        }
        if !(self.initial_closed_threshold.is_finite() && self.initial_open_threshold.is_finite()) {
            return Err(BlinkError::Config("initial thresholds must be finite".into()));
        }
        if self.initial_closed_threshold >= self.initial_open_threshold {
            return Err(BlinkError::Config(format!(
                "initial_closed_threshold ({}) must be below initial_open_threshold ({})",
                self.initial_closed_threshold, self.initial_open_threshold
            )));
        }
        if self.smoothing_window == 0 {
            return Err(BlinkError::Config("smoothing_window must be > 0".into()));
        }
        if !(self.min_baseline >= 0.0) {
            return Err(BlinkError::Config("min_baseline must be >= 0".into()));
        }
        if !(self.fallback_ear.is_finite() && self.fallback_ear >= 0.0) {
            return Err(BlinkError::Config("fallback_ear must be a finite, non-negative ratio".into()));
        }
        self.analyzer.validate()
    }
}

/// Rate and cadence analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Trailing window for the blinks-per-second rate (milliseconds)
    pub rate_window_ms: u64,

    /// Blink timestamps kept for cadence classification
    pub pattern_history: usize,

    /// Trailing window inspected for cadence (milliseconds)
    pub pattern_window_ms: u64,

    /// Total blinks required before any cadence is reported
    pub min_pattern_blinks: usize,

    /// Blinks required inside the cadence window
    pub min_recent_blinks: usize,

    /// Mean interval below which blinking is fast (milliseconds)
    pub fast_interval_ms: f64,

    /// Mean interval above which blinking is slow (milliseconds)
    pub slow_interval_ms: f64,

    /// Largest relative deviation from the mean interval that is still rhythmic
    pub rhythm_tolerance: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            rate_window_ms: 5000,
            pattern_history: 10,
            pattern_window_ms: 3000,
            min_pattern_blinks: 5,
            min_recent_blinks: 3,
            fast_interval_ms: 500.0,
            slow_interval_ms: 2000.0,
            rhythm_tolerance: 0.2,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), BlinkError> {
        if self.rate_window_ms == 0 {
            return Err(BlinkError::Config("rate_window_ms must be > 0".into()));
        }
        if self.pattern_history == 0 {
            return Err(BlinkError::Config("pattern_history must be > 0".into()));
        }
        if self.min_recent_blinks < 2 {
            return Err(BlinkError::Config(
                "min_recent_blinks must be >= 2 to form an interval".into(),
            ));
        }
        if self.fast_interval_ms > self.slow_interval_ms {
            return Err(BlinkError::Config(format!(
                "fast_interval_ms ({}) must not exceed slow_interval_ms ({})",
                self.fast_interval_ms, self.slow_interval_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(BlinkConfig::default().validate().is_ok());
        assert!(BlinkConfig::strict().validate().is_ok());
        assert!(BlinkConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_collapsed_hysteresis_rejected() {
        let config = BlinkConfig {
            closed_ratio: 0.8,
            open_ratio: 0.8,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BlinkError::Config(_))));
    }

    #[test]
    fn test_non_finite_initial_thresholds_rejected() {
        for (closed, open) in [(f32::NAN, 0.28), (0.2, f32::NAN), (0.2, f32::INFINITY)] {
            let config = BlinkConfig {
                initial_closed_threshold: closed,
                initial_open_threshold: open,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_calibration_larger_than_history_rejected() {
        let config = BlinkConfig {
            history_size: 5,
            min_calibration_samples: 8,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_single_blink_window_rejected() {
        let config = BlinkConfig {
            analyzer: AnalyzerConfig {
                min_recent_blinks: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
