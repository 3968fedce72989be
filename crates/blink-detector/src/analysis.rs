//! Blink rate and cadence analysis

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::AnalyzerConfig;

/// Blink cadence classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlinkPattern {
    #[default]
    None,
    Fast,
    Slow,
    /// Evenly spaced blinks
    #[serde(rename = "pattern")]
    Rhythmic,
}

/// Derived blink statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlinkStats {
    /// Moving-average rate over the rate window
    pub blinks_per_second: f64,
    /// Blinks inside the rate window
    pub window_count: usize,
    /// Current cadence
    pub pattern: BlinkPattern,
}

/// Tracks blink timestamps for rate and cadence
#[derive(Debug, Clone)]
pub struct BlinkAnalyzer {
    config: AnalyzerConfig,
    /// Blinks inside the rate window
    rate_window: VecDeque<u64>,
    /// Most recent blinks for cadence
    recent: VecDeque<u64>,
}

impl BlinkAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            rate_window: VecDeque::new(),
            recent: VecDeque::with_capacity(config.pattern_history + 1),
            config,
        }
    }

    /// Record a blink and return the updated statistics.
    ///
    /// A blink older than the newest one is slotted in at its own time, so
    /// the history stays sorted and statistics are taken at the newest blink.
    pub fn on_blink_event(&mut self, timestamp_ms: u64) -> BlinkStats {
        insert_sorted(&mut self.rate_window, timestamp_ms);
        insert_sorted(&mut self.recent, timestamp_ms);
        let now_ms = self.recent.back().copied().unwrap_or(timestamp_ms);

        let window = self.config.rate_window_ms;
        self.rate_window.retain(|&t| now_ms.saturating_sub(t) < window);
        while self.recent.len() > self.config.pattern_history {
            self.recent.pop_front();
        }

        self.stats_at(now_ms)
    }

    /// Statistics as seen at `now_ms`, without recording anything
    pub fn stats_at(&self, now_ms: u64) -> BlinkStats {
        let window = self.config.rate_window_ms;
        let window_count = self
            .rate_window
            .iter()
            .filter(|&&t| now_ms.saturating_sub(t) < window)
            .count();

        BlinkStats {
            blinks_per_second: window_count as f64 / (window as f64 / 1000.0),
            window_count,
            pattern: self.classify(now_ms),
        }
    }

    /// Classify cadence from the blinks inside the pattern window
    pub fn classify(&self, now_ms: u64) -> BlinkPattern {
        if self.recent.len() < self.config.min_pattern_blinks {
            return BlinkPattern::None;
        }

        let window = self.config.pattern_window_ms;
        let recent: Vec<u64> = self
            .recent
            .iter()
            .copied()
            .filter(|&t| now_ms.saturating_sub(t) < window)
            .collect();
        if recent.len() < self.config.min_recent_blinks {
            return BlinkPattern::None;
        }

        let intervals: Vec<f64> = recent
            .windows(2)
            .map(|w| w[1].saturating_sub(w[0]) as f64)
            .collect();
        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;

        if mean < self.config.fast_interval_ms {
            BlinkPattern::Fast
        } else if mean > self.config.slow_interval_ms {
            BlinkPattern::Slow
        } else if is_rhythmic(&intervals, mean, self.config.rhythm_tolerance) {
            BlinkPattern::Rhythmic
        } else {
            BlinkPattern::None
        }
    }

    /// Total blinks retained for cadence
    pub fn recent_len(&self) -> usize {
        self.recent.len()
    }

    pub fn reset(&mut self) {
        self.rate_window.clear();
        self.recent.clear();
    }
}

fn insert_sorted(times: &mut VecDeque<u64>, timestamp_ms: u64) {
    let at = times.partition_point(|&t| t <= timestamp_ms);
    times.insert(at, timestamp_ms);
}

fn is_rhythmic(intervals: &[f64], mean: f64, tolerance: f64) -> bool {
    mean > 0.0
        && intervals
            .iter()
            .all(|interval| (interval - mean).abs() / mean < tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(analyzer: &mut BlinkAnalyzer, intervals: &[u64]) -> BlinkStats {
        let mut t = 0;
        let mut stats = analyzer.on_blink_event(t);
        for &dt in intervals {
            t += dt;
            stats = analyzer.on_blink_event(t);
        }
        stats
    }

    #[test]
    fn test_rate_over_five_seconds() {
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        feed(&mut analyzer, &[1000, 1000, 1000, 1000]);

        let stats = analyzer.stats_at(4500);
        assert_eq!(stats.window_count, 5);
        assert_eq!(stats.blinks_per_second, 1.0);
    }

    #[test]
    fn test_rate_window_evicts_old_blinks() {
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        analyzer.on_blink_event(0);
        assert_eq!(analyzer.stats_at(6000).blinks_per_second, 0.0);

        // a later blink also drops the stale one from storage
        let stats = analyzer.on_blink_event(6000);
        assert_eq!(stats.window_count, 1);
        assert!((stats.blinks_per_second - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_fast_pattern() {
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        let stats = feed(&mut analyzer, &[300, 300, 300, 300]);
        assert_eq!(stats.pattern, BlinkPattern::Fast);
    }

    #[test]
    fn test_late_blink_is_slotted_in_order() {
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        for t in [1000, 1600, 2200, 2800, 3400] {
            analyzer.on_blink_event(t);
        }
        let stats = analyzer.on_blink_event(0);
        assert_eq!(stats.pattern, BlinkPattern::Rhythmic);
        assert_eq!(stats.window_count, 6);
        assert_eq!(analyzer.recent_len(), 6);
    }

    #[test]
    fn test_rhythmic_pattern() {
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        let stats = feed(&mut analyzer, &[1000, 1000, 1000, 1000]);
        assert_eq!(stats.pattern, BlinkPattern::Rhythmic);
    }

    #[test]
    fn test_irregular_pattern() {
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        let stats = feed(&mut analyzer, &[200, 1800, 600, 1500]);
        assert_eq!(stats.pattern, BlinkPattern::None);
    }

    #[test]
    fn test_slow_pattern_needs_wide_window() {
        // three blinks inside 3 s cannot average more than 1.5 s apart
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        let stats = feed(&mut analyzer, &[2500, 2500, 2500, 2500]);
        assert_eq!(stats.pattern, BlinkPattern::None);

        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig {
            pattern_window_ms: 12_000,
            ..Default::default()
        });
        let stats = feed(&mut analyzer, &[2500, 2500, 2500, 2500]);
        assert_eq!(stats.pattern, BlinkPattern::Slow);
    }

    #[test]
    fn test_too_few_blinks() {
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        let stats = feed(&mut analyzer, &[100, 100, 100]);
        assert_eq!(stats.pattern, BlinkPattern::None);
    }

    #[test]
    fn test_pattern_history_bounded() {
        let mut analyzer = BlinkAnalyzer::new(AnalyzerConfig::default());
        feed(&mut analyzer, &[100; 20]);
        assert_eq!(analyzer.recent_len(), 10);
    }
}
