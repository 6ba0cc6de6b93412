//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{shutdown::ShutdownOutcome, state::StateCounts};

/// API response structure for write endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
        }
    }

    /// Create a success response
    pub fn ok(message: String) -> Self {
        Self::new("ok", message)
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error", message)
    }
}

/// Response for the window-closing hook
#[derive(Debug, Clone, Serialize)]
pub struct ClosingResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub result: ShutdownOutcome,
}

/// Server status with a summary of the stored timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub state_file: String,
    pub is_paused: bool,
    pub timer_count: usize,
    pub timers_by_state: StateCounts,
    pub shutting_down: bool,
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
