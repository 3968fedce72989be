//! Prometheus metrics

use blink_detector::{BlinkNotification, BlinkSink, FrameOutcome};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::ApiError;

pub const FRAMES_TOTAL: &str = "blinkmeter_frames_total";
pub const FACELESS_FRAMES_TOTAL: &str = "blinkmeter_faceless_frames_total";
pub const BLINKS_TOTAL: &str = "blinkmeter_blinks_total";
pub const BLINKS_PER_SECOND: &str = "blinkmeter_blinks_per_second";

/// Install the global Prometheus recorder
pub fn install_recorder() -> Result<PrometheusHandle, ApiError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Metrics(e.to_string()))?;

    describe_counter!(FRAMES_TOTAL, "Landmark frames processed");
    describe_counter!(FACELESS_FRAMES_TOTAL, "Frames without a detected face");
    describe_counter!(BLINKS_TOTAL, "Blinks counted, by source");
    describe_gauge!(BLINKS_PER_SECOND, "Blink rate over the trailing window");
    Ok(handle)
}

pub fn record_frame(outcome: &FrameOutcome) {
    counter!(FRAMES_TOTAL).increment(1);
    if !outcome.face_detected {
        counter!(FACELESS_FRAMES_TOTAL).increment(1);
    }
}

/// Blink sink feeding the blink counter and rate gauge
#[derive(Debug, Default)]
pub struct MetricsSink;

impl BlinkSink for MetricsSink {
    fn on_blink(&mut self, notification: &BlinkNotification) {
        let source = match notification.event.source {
            blink_detector::BlinkSource::Detected => "detected",
            blink_detector::BlinkSource::Manual => "manual",
        };
        counter!(BLINKS_TOTAL, "source" => source).increment(1);
        gauge!(BLINKS_PER_SECOND).set(notification.stats.blinks_per_second);
    }
}
