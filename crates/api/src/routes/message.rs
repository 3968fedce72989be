//! Cheer Message Route

use axum::{extract::State, Json};
use flavor::LineSource;
use rewards::MessageBoard;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub icon: &'static str,
    pub text: String,
    pub source: LineSource,
}

/// Get a cheer line, from the model server when available
pub async fn get_message(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    let fallback = {
        let mut session = state.session.lock().await;
        MessageBoard::random_cheer(session.rng())
    };

    let line = state.flavor.line_or_fallback(fallback.text).await;

    Json(MessageResponse {
        icon: fallback.icon,
        text: line.text,
        source: line.source,
    })
}
