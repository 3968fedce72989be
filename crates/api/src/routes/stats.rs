//! Stats Route

use axum::{
    extract::{Query, State},
    Json,
};
use blink_detector::DetectorSnapshot;
use rewards::RewardSummary;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

/// Query parameters for the stats endpoint
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Evaluate rate and cadence at this session time (ms)
    pub now_ms: Option<u64>,
}

/// Response for the stats endpoint
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub session_id: Uuid,
    pub now_ms: u64,
    #[serde(flatten)]
    pub detector: DetectorSnapshot,
    pub rewards: RewardSummary,
    pub reminder_due: bool,
}

/// Get session statistics
pub async fn get_stats(State(state): State<Arc<AppState>>, Query(params): Query<StatsQuery>) -> Json<StatsResponse> {
    let session = state.session.lock().await;
    let now_ms = params.now_ms.unwrap_or_else(|| session.now_ms());

    Json(StatsResponse {
        session_id: session.info.id,
        now_ms,
        detector: session.detector.snapshot(now_ms),
        rewards: session.rewards.summary(),
        reminder_due: session.reminder_due(now_ms),
    })
}
