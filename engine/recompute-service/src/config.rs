use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the recompute service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeConfig {
    /// Per-source fetch timeout in seconds; a slow source is treated the
    /// same as one that returned nothing
    pub source_timeout_secs: u64,

    /// How many completed weeks of history feed the weight learning
    pub history_weeks: u32,

    /// Master switch for outbound notifications
    pub notifications_enabled: bool,
}

impl Default for RecomputeConfig {
    fn default() -> Self {
        Self { source_timeout_secs: 30, history_weeks: 6, notifications_enabled: true }
    }
}

impl RecomputeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("RECOMPUTE_SOURCE_TIMEOUT_SECS") {
            config.source_timeout_secs = timeout.parse().unwrap_or(30);
        }

        if let Ok(weeks) = std::env::var("RECOMPUTE_HISTORY_WEEKS") {
            config.history_weeks = weeks.parse().unwrap_or(6);
        }

        if let Ok(enabled) = std::env::var("RECOMPUTE_NOTIFICATIONS_ENABLED") {
            config.notifications_enabled = enabled.parse().unwrap_or(true);
        }

        Ok(config)
    }

    /// Per-source timeout as a `Duration`
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }
}
