use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Coarse health state reported by monitor endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The checked component is operating normally.
    Healthy,
    /// The checked component is not reachable.
    Unhealthy,
}

impl From<bool> for HealthStatus {
    fn from(is_healthy: bool) -> Self {
        if is_healthy {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }
}

/// Process liveness report.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always [`HealthStatus::Healthy`] while the process serves requests.
    pub status: HealthStatus,
    /// Time of the check.
    pub timestamp: Timestamp,
    /// Seconds since the service state was created.
    pub uptime: f64,
}

/// Record store reachability report.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHealthResponse {
    /// Result of the store round trip.
    pub status: HealthStatus,
    /// Time of the check.
    pub timestamp: Timestamp,
}
