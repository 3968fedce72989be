//! Frame Ingestion Route

use axum::{extract::State, Json};
use blink_detector::FrameOutcome;
use landmarks::FrameInput;
use rewards::RewardUpdate;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Response for one processed frame
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    #[serde(flatten)]
    pub outcome: FrameOutcome,
    /// Present when the frame produced a blink
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<RewardUpdate>,
    /// Show the "remember to blink" reminder
    pub reminder_due: bool,
}

/// Process one landmark frame
pub async fn post_frame(State(state): State<Arc<AppState>>, Json(input): Json<FrameInput>) -> Json<FrameResponse> {
    let mut session = state.session.lock().await;
    let timestamp_ms = input.timestamp_ms;
    let (outcome, rewards) = session.process_frame(input);
    let reminder_due = session.reminder_due(timestamp_ms);

    Json(FrameResponse {
        outcome,
        rewards,
        reminder_due,
    })
}
