//! Liveness payload for `/health`.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::app_state::AppState;
use crate::obs::MemoryUsage;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
    /// Seconds since the service state was built.
    pub uptime: f64,
    pub memory: MemoryUsage,
    pub version: String,
    pub environment: String,
}

impl HealthReport {
    pub fn collect(state: &AppState) -> Self {
        let server = &state.cfg().server;
        Self {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            uptime: state.uptime().as_secs_f64(),
            memory: state.process().memory(),
            version: server.app_version.clone(),
            environment: server.environment.clone(),
        }
    }
}
