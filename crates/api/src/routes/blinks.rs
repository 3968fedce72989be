//! Manual Blink and Reset Routes

use axum::{extract::State, Json};
use blink_detector::BlinkNotification;
use chrono::{DateTime, Utc};
use rewards::RewardUpdate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;

/// Optional body for a manual blink
#[derive(Debug, Default, Deserialize)]
pub struct ManualBlinkRequest {
    /// Blink time on the session clock; defaults to now
    pub timestamp_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ManualBlinkResponse {
    #[serde(flatten)]
    pub blink: BlinkNotification,
    pub rewards: RewardUpdate,
}

/// Register a blink by hand
pub async fn post_blink(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ManualBlinkRequest>>,
) -> Json<ManualBlinkResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let mut session = state.session.lock().await;
    let (blink, rewards) = session.manual_blink(request.timestamp_ms);

    Json(ManualBlinkResponse { blink, rewards })
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
}

/// Reset counters and start a new session
pub async fn post_reset(State(state): State<Arc<AppState>>) -> Json<ResetResponse> {
    let mut session = state.session.lock().await;
    session.reset();

    Json(ResetResponse {
        session_id: session.info.id,
        started_at: session.info.started_at,
    })
}
