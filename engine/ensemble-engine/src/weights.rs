//! Per-source blending weights learned from historical error
//!
//! Three forces shape a source's weight at a position: how accurate it has
//! been (inverse RMSE), how much history backs that accuracy up (shrinkage
//! toward a neutral prior on thin samples), and how redundant its errors
//! are with other sources (correlated sources carry less new information).

use crate::config::{EnsembleConfig, WeightingParameters};
use crate::models::{PerSourceWeight, Position, Residual};
use std::collections::HashMap;
use tracing::debug;

/// Neutral pre-normalization weight a source regresses toward with no history
const NEUTRAL_PRIOR: f64 = 1.0;

/// Compute normalized blending weights, one full set per position
///
/// Every configured source gets a weight at every position, history or not;
/// weights at each position sum to 1.
pub fn compute_weights(residuals: &[Residual], config: &EnsembleConfig) -> Vec<PerSourceWeight> {
    let mut weights = Vec::with_capacity(config.sources.len() * Position::ALL.len());

    for position in Position::ALL {
        let at_position: Vec<&Residual> =
            residuals.iter().filter(|r| r.position == position).collect();

        let mut by_source: HashMap<&str, Vec<&Residual>> = HashMap::new();
        for residual in at_position.iter().copied() {
            if config.sources.iter().any(|s| s == &residual.source_id) {
                by_source.entry(residual.source_id.as_str()).or_default().push(residual);
            }
        }

        let mut raw: Vec<f64> = Vec::with_capacity(config.sources.len());
        for source_id in &config.sources {
            let weight = match by_source.get(source_id.as_str()) {
                Some(series) => {
                    let shrunk = shrunk_weight(series, &config.weighting);
                    let redundancy = avg_abs_correlation(source_id, &by_source);
                    shrunk / (1.0 + config.weighting.correlation_penalty_strength * redundancy)
                }
                // No history at this position: sit at the prior
                None => NEUTRAL_PRIOR,
            };
            raw.push(weight);
        }

        let total: f64 = raw.iter().sum();
        for (source_id, weight) in config.sources.iter().zip(raw) {
            let normalized = if total > 0.0 {
                weight / total
            } else {
                1.0 / config.sources.len() as f64
            };
            weights.push(PerSourceWeight {
                source_id: source_id.clone(),
                position,
                weight: normalized,
            });
        }

        debug!("Computed weights for {} sources at {}", config.sources.len(), position);
    }

    weights
}

/// Inverse-error weight shrunk toward the neutral prior by sample size
fn shrunk_weight(series: &[&Residual], params: &WeightingParameters) -> f64 {
    let n = series.len() as f64;
    let rmse = (series.iter().map(|r| r.error * r.error).sum::<f64>() / n).sqrt();
    let raw = 1.0 / (rmse + params.epsilon).powf(params.alpha);
    let shrink = n / (n + params.shrinkage_k);
    shrink * raw + (1.0 - shrink) * NEUTRAL_PRIOR
}

/// Average absolute Pearson correlation of a source's errors against every
/// other source at the same position
///
/// Residuals are aligned by (player, week); pairs lacking one side are
/// excluded. Sources with no overlapping pairs contribute nothing.
fn avg_abs_correlation(source_id: &str, by_source: &HashMap<&str, Vec<&Residual>>) -> f64 {
    let Some(own) = by_source.get(source_id) else {
        return 0.0;
    };

    let own_errors: HashMap<(&str, u32), f64> =
        own.iter().map(|r| ((r.player_id.as_str(), r.week), r.error)).collect();

    let mut correlations = Vec::new();
    for (other_id, other_series) in by_source {
        if *other_id == source_id {
            continue;
        }
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for residual in other_series {
            if let Some(own_error) = own_errors.get(&(residual.player_id.as_str(), residual.week)) {
                xs.push(*own_error);
                ys.push(residual.error);
            }
        }
        if let Some(corr) = pearson(&xs, &ys) {
            correlations.push(corr.abs());
        }
    }

    if correlations.is_empty() {
        0.0
    } else {
        correlations.iter().sum::<f64>() / correlations.len() as f64
    }
}

/// Pearson correlation of two aligned series
///
/// Returns `None` below two points or when either series is constant, where
/// the statistic is undefined.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
