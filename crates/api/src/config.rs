//! Service configuration
//!
//! Layered from defaults, an optional `blinkmeter.toml` in the working
//! directory, and `BLINKMETER__*` environment variables
//! (e.g. `BLINKMETER__SERVER__PORT=9090`, `BLINKMETER__DETECTOR__CLOSED_RATIO=0.7`).

use blink_detector::BlinkConfig;
use config::{Config, Environment, File};
use flavor::FlavorConfig;
use rewards::RewardConfig;
use serde::{Deserialize, Serialize};

use crate::rate_limit::RateLimitConfig;
use crate::ApiError;

/// Default configuration file name, without extension
pub const CONFIG_FILE: &str = "blinkmeter";
/// Environment variable prefix
pub const ENV_PREFIX: &str = "BLINKMETER";

/// Listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Whole-service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    /// `tracing` level filter: error, warn, info, debug, trace
    pub log_level: String,
    pub detector: BlinkConfig,
    pub rewards: RewardConfig,
    pub flavor: FlavorConfig,
    /// Limits on the message endpoint; `None` disables limiting
    pub rate_limit: Option<RateLimitConfig>,
    /// Serve Prometheus metrics at `/metrics`
    pub metrics: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_level: "info".to_string(),
            detector: BlinkConfig::default(),
            rewards: RewardConfig::default(),
            flavor: FlavorConfig::default(),
            rate_limit: Some(RateLimitConfig::default()),
            metrics: true,
        }
    }
}

impl ServiceConfig {
    /// Load from `blinkmeter.toml` (optional) and the environment
    pub fn load() -> Result<Self, ApiError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from the named file (optional) and the environment
    pub fn load_from(file: &str) -> Result<Self, ApiError> {
        let settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: ServiceConfig = settings.try_deserialize()?;
        config.flavor = config.flavor.with_env();
        Ok(config)
    }
}
