use serde::{Deserialize, Serialize};

/// Configuration for lineup assignment
///
/// Injury penalties are tuning defaults, not invariants; override them per
/// deployment rather than editing code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupConfig {
    /// Points subtracted for a QUESTIONABLE designation
    pub questionable_penalty: f64,

    /// Points subtracted for a DOUBTFUL designation
    pub doubtful_penalty: f64,

    /// Sentinel score that keeps a player out of every slot
    pub unplaceable_score: f64,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            questionable_penalty: -2.0,
            doubtful_penalty: -5.0,
            unplaceable_score: -1.0e9,
        }
    }
}

impl LineupConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(penalty) = std::env::var("LINEUP_QUESTIONABLE_PENALTY") {
            config.questionable_penalty = penalty.parse().unwrap_or(-2.0);
        }

        if let Ok(penalty) = std::env::var("LINEUP_DOUBTFUL_PENALTY") {
            config.doubtful_penalty = penalty.parse().unwrap_or(-5.0);
        }

        Ok(config)
    }
}
