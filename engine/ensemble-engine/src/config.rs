use serde::{Deserialize, Serialize};

/// Configuration for the projection ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Source ids expected to contribute projections
    pub sources: Vec<String>,

    /// Weight learning parameters
    pub weighting: WeightingParameters,

    /// Blending parameters
    pub blend: BlendParameters,

    /// Tier cut points
    pub tiers: TierCuts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightingParameters {
    /// Guard against division by zero for a perfect historical record
    pub epsilon: f64,

    /// Sensitivity of the inverse-error weight (1.0 = linear in 1/RMSE)
    pub alpha: f64,

    /// Shrinkage constant: a source with k historical samples sits halfway
    /// between its raw weight and the neutral prior
    pub shrinkage_k: f64,

    /// Strength of the redundancy penalty for correlated residuals
    pub correlation_penalty_strength: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendParameters {
    /// z value for the confidence interval (1.96 = 95%)
    pub confidence_z: f64,
}

/// Rank-quantile boundaries for tiers A/B/C/D
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCuts {
    /// Fraction of a position ranked tier A
    pub a_cut: f64,
    /// Cumulative fraction through tier B
    pub b_cut: f64,
    /// Cumulative fraction through tier C
    pub c_cut: f64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                "sharpstats".to_string(),
                "gridiron_iq".to_string(),
                "fanforecast".to_string(),
            ],
            weighting: WeightingParameters {
                epsilon: 1e-6,
                alpha: 1.0,
                shrinkage_k: 50.0,
                correlation_penalty_strength: 0.5,
            },
            blend: BlendParameters { confidence_z: 1.96 },
            tiers: TierCuts { a_cut: 0.15, b_cut: 0.50, c_cut: 0.85 },
        }
    }
}

impl EnsembleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(sources) = std::env::var("ENSEMBLE_SOURCES") {
            config.sources = sources.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(alpha) = std::env::var("ENSEMBLE_ALPHA") {
            config.weighting.alpha = alpha.parse().unwrap_or(1.0);
        }

        if let Ok(k) = std::env::var("ENSEMBLE_SHRINKAGE_K") {
            config.weighting.shrinkage_k = k.parse().unwrap_or(50.0);
        }

        if let Ok(strength) = std::env::var("ENSEMBLE_CORRELATION_PENALTY") {
            config.weighting.correlation_penalty_strength = strength.parse().unwrap_or(0.5);
        }

        if let Ok(z) = std::env::var("ENSEMBLE_CONFIDENCE_Z") {
            config.blend.confidence_z = z.parse().unwrap_or(1.96);
        }

        Ok(config)
    }
}
