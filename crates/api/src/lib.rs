//! Blinkmeter API Server
//!
//! REST API for the blink counter: landmark frame ingestion, session stats,
//! manual blinks, cheer messages and Prometheus metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod metrics;
pub mod rate_limit;
pub mod replay;
mod routes;
mod state;

pub use config::{ServerConfig, ServiceConfig};
pub use rate_limit::{create_governor_config, RateLimitConfig};
pub use replay::{replay, replay_file, ReplaySummary};
pub use state::{AppState, BlinkSession, SessionInfo};

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] ::config::ConfigError),

    #[error("Detector error: {0}")]
    Detector(#[from] blink_detector::BlinkError),

    #[error("Rewards error: {0}")]
    Rewards(#[from] rewards::RewardError),

    #[error("Flavor client error: {0}")]
    Flavor(#[from] flavor::FlavorError),

    #[error("Landmark source error: {0}")]
    Landmarks(#[from] landmarks::LandmarkError),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create the application router
///
/// With a rate limit, the message endpoint is limited per peer IP and the
/// router must be served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_router(state: Arc<AppState>, rate_limit: Option<&RateLimitConfig>) -> Result<Router, ApiError> {
    let mut message = Router::new().route("/api/v1/message", get(routes::message::get_message));
    if let Some(limit) = rate_limit {
        message = message.layer(GovernorLayer {
            config: create_governor_config(limit)?,
        });
    }

    let router = Router::new()
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/frames", post(routes::frames::post_frame))
        .route("/api/v1/blinks", post(routes::blinks::post_blink))
        .route("/api/v1/reset", post(routes::blinks::post_reset))
        .route("/api/v1/stats", get(routes::stats::get_stats))
        .route("/metrics", get(metrics_handler))
        .merge(message)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    Ok(router)
}

/// Prometheus exposition handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Initialize logging at the given level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) -> Result<(), ApiError> {
    let level = level
        .parse::<Level>()
        .map_err(|_| ApiError::Config(format!("unknown log level: {}", level)))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(|e| ApiError::Config(e.to_string()))
}

/// Run the server
pub async fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = if config.metrics {
        Some(metrics::install_recorder()?)
    } else {
        None
    };
    let state = Arc::new(AppState::new(&config, metrics)?);
    let app = create_router(state, config.rate_limit.as_ref())?;

    let addr = config.server.addr();
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
