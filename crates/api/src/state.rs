//! Shared application state

use std::time::Instant;

use blink_detector::{BlinkDetector, BlinkNotification, FrameOutcome};
use chrono::{DateTime, Utc};
use flavor::FlavorClient;
use landmarks::FrameInput;
use metrics_exporter_prometheus::PrometheusHandle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rewards::{RewardEngine, RewardUpdate};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::metrics::{self, MetricsSink};
use crate::ApiError;

/// Identity of the current counting session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    clock: Instant,
}

impl SessionInfo {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            clock: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }
}

/// Detector, rewards and session bookkeeping behind one lock.
///
/// Every frame, blink and reset goes through this lock, so no two state
/// mutations interleave.
pub struct BlinkSession {
    pub detector: BlinkDetector,
    pub rewards: RewardEngine,
    pub info: SessionInfo,
    rng: StdRng,
    last_timestamp_ms: u64,
}

impl BlinkSession {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        let mut detector = BlinkDetector::new(config.detector.clone())?;
        if config.metrics {
            detector.add_sink(MetricsSink);
        }
        let rewards = RewardEngine::new(config.rewards.clone())?;

        Ok(Self {
            detector,
            rewards,
            info: SessionInfo::new(),
            rng: StdRng::from_entropy(),
            last_timestamp_ms: 0,
        })
    }

    /// Session clock: the newest timestamp seen, never behind wall time
    /// since the session started
    pub fn now_ms(&self) -> u64 {
        self.last_timestamp_ms.max(self.info.elapsed_ms())
    }

    /// Run one frame through detection and, on a blink, through rewards
    pub fn process_frame(&mut self, input: FrameInput) -> (FrameOutcome, Option<RewardUpdate>) {
        self.last_timestamp_ms = self.last_timestamp_ms.max(input.timestamp_ms);
        self.rewards.observe_frame(input.timestamp_ms);
        let outcome = self.detector.process_frame(input);
        metrics::record_frame(&outcome);

        let rewards = outcome
            .blink
            .map(|notification| self.rewards.on_blink(&notification, &mut self.rng));
        (outcome, rewards)
    }

    /// Count a blink by hand at `timestamp_ms`, or now
    pub fn manual_blink(&mut self, timestamp_ms: Option<u64>) -> (BlinkNotification, RewardUpdate) {
        let timestamp_ms = timestamp_ms.unwrap_or_else(|| self.now_ms());
        self.last_timestamp_ms = self.last_timestamp_ms.max(timestamp_ms);
        let notification = self.detector.register_manual_blink(timestamp_ms);
        let update = self.rewards.on_blink(&notification, &mut self.rng);
        (notification, update)
    }

    pub fn reminder_due(&self, now_ms: u64) -> bool {
        let face_present = self.detector.snapshot(now_ms).presence.face_present;
        self.rewards.reminder_due(now_ms, face_present)
    }

    /// Start a new session with fresh counters and a new id
    pub fn reset(&mut self) {
        info!(session = %self.info.id, blinks = self.detector.total_blinks(), "Resetting session");
        self.detector.reset();
        self.info = SessionInfo::new();
        self.last_timestamp_ms = 0;
        self.rewards.reset();
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Application state shared across handlers
pub struct AppState {
    pub session: Mutex<BlinkSession>,
    pub flavor: FlavorClient,
    /// Prometheus render handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: &ServiceConfig, metrics: Option<PrometheusHandle>) -> Result<Self, ApiError> {
        Ok(Self {
            session: Mutex::new(BlinkSession::new(config)?),
            flavor: FlavorClient::new(config.flavor.clone())?,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        })
    }
}
