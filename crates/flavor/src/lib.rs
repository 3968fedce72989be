//! Flavor Text
//!
//! Thin client for a local text-generation server (Ollama `/api/generate`
//! contract). Purely cosmetic: every caller gets a line back, either from
//! the model or from the fallback it supplied.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable holding the model server base URL
pub const BASE_URL_ENV: &str = "OLLAMA_URL";

/// Prompt used for cheer lines
pub const CHEER_PROMPT: &str = "You are a playful assistant for a blink counter app called Blinkmeter. \
Generate a very short, fun, positive one-liner (max 10 words) to motivate the user. \
Avoid emojis. Keep it family-friendly.";

/// Flavor client error types
#[derive(Error, Debug)]
pub enum FlavorError {
    #[error("Model server not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model server returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("Model server returned no text")]
    EmptyResponse,
}

/// Flavor client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorConfig {
    /// Model server base URL; `None` disables generation
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    /// Request timeout (milliseconds)
    pub timeout_ms: u64,
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: "llama3.1".to_string(),
            temperature: 0.6,
            timeout_ms: 4000,
        }
    }
}

impl FlavorConfig {
    /// Fill a missing base URL from `OLLAMA_URL`
    pub fn with_env(mut self) -> Self {
        if self.base_url.is_none() {
            self.base_url = std::env::var(BASE_URL_ENV).ok().filter(|url| !url.trim().is_empty());
        }
        self
    }

    fn endpoint(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}/api/generate", base.trim_end_matches('/')))
    }
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Where a line of text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSource {
    Model,
    Fallback,
}

/// A cheer line and its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlavorLine {
    pub text: String,
    pub source: LineSource,
}

impl FlavorLine {
    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source: LineSource::Fallback,
        }
    }
}

/// Text-generation client
#[derive(Debug, Clone)]
pub struct FlavorClient {
    config: FlavorConfig,
    http: reqwest::Client,
}

impl FlavorClient {
    pub fn new(config: FlavorConfig) -> Result<Self, FlavorError> {
        info!("Creating flavor client with config: {:?}", config);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.base_url.is_some()
    }

    pub fn config(&self) -> &FlavorConfig {
        &self.config
    }

    /// Generate one line of text
    pub async fn generate(&self, prompt: &str) -> Result<String, FlavorError> {
        let endpoint = self.config.endpoint().ok_or(FlavorError::NotConfigured)?;
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        debug!("POST {}", endpoint);
        let response = self.http.post(&endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FlavorError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let body: GenerateResponse = response.json().await?;
        body.response
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(FlavorError::EmptyResponse)
    }

    /// Generated cheer line, or `fallback` on any failure
    pub async fn line_or_fallback(&self, fallback: &str) -> FlavorLine {
        if !self.is_configured() {
            return FlavorLine::fallback(fallback);
        }
        match self.generate(CHEER_PROMPT).await {
            Ok(text) => FlavorLine {
                text,
                source: LineSource::Model,
            },
            Err(e) => {
                warn!("Flavor text unavailable, using fallback: {}", e);
                FlavorLine::fallback(fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = FlavorConfig {
            base_url: Some("http://localhost:11434/".into()),
            ..Default::default()
        };
        assert_eq!(config.endpoint().unwrap(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            model: "llama3.1",
            prompt: "hi",
            stream: false,
            options: GenerateOptions { temperature: 0.6 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.1");
        assert_eq!(json["stream"], false);
        assert!((json["options"]["temperature"].as_f64().unwrap() - 0.6).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unconfigured_is_error() {
        let client = FlavorClient::new(FlavorConfig::default()).unwrap();
        assert!(matches!(client.generate("hi").await, Err(FlavorError::NotConfigured)));
        let line = client.line_or_fallback("Keep blinking!").await;
        assert_eq!(line.text, "Keep blinking!");
        assert_eq!(line.source, LineSource::Fallback);
    }
}
