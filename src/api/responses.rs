//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::SessionStatus;

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionStatus,
}

impl ApiResponse {
    /// Create a new API response; `status` mirrors the playback flag
    pub fn new(message: impl Into<String>, session: SessionStatus) -> Self {
        let status = if session.is_playing { "playing" } else { "stopped" };
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            session,
        }
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub session: SessionStatus,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of POST /sound
#[derive(Debug, Clone, Deserialize)]
pub struct SoundRequest {
    pub file: String,
    #[serde(default)]
    pub autoplay: bool,
}

/// Body of POST /volume and POST /brightness
#[derive(Debug, Clone, Deserialize)]
pub struct PercentRequest {
    pub percent: f64,
}

/// Body of POST /timer; `null` or `"Infinity"` disables the timer, the field
/// itself is required
#[derive(Debug, Clone, Deserialize)]
pub struct TimerRequest {
    pub minutes: Value,
}

/// Body of POST /theme
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeRequest {
    pub theme: String,
}
