//! Weighted blending of the current week's projections
//!
//! Disagreement among sources and each source's own track record are both
//! real uncertainty; the interval carries both so that a single
//! confidently-wrong source cannot produce a falsely tight band.

use crate::config::BlendParameters;
use crate::models::{BlendedEstimate, PerSourcePerformance, PerSourceWeight, Position, ProjectionRow};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Blend one week of normalized projections into per-player estimates
///
/// Weights are renormalized over the sources actually present for each
/// player; a player absent from every weighted feed falls back to uniform
/// weighting across whatever sources did project them.
pub fn blend_week(
    current: &[ProjectionRow],
    weights: &[PerSourceWeight],
    performance: &[PerSourcePerformance],
    params: &BlendParameters,
) -> Vec<BlendedEstimate> {
    let weight_by_key: HashMap<(&str, Position), f64> =
        weights.iter().map(|w| ((w.source_id.as_str(), w.position), w.weight)).collect();
    let rmse_by_key: HashMap<(&str, Position), f64> =
        performance.iter().map(|p| ((p.source_id.as_str(), p.position), p.rmse)).collect();

    // BTreeMap keeps output order deterministic for identical inputs
    let mut by_player: BTreeMap<(&str, Position), Vec<&ProjectionRow>> = BTreeMap::new();
    for row in current {
        by_player.entry((row.player_id.as_str(), row.position)).or_default().push(row);
    }

    let mut estimates = Vec::with_capacity(by_player.len());
    for ((player_id, position), rows) in by_player {
        let configured: Vec<f64> = rows
            .iter()
            .map(|r| weight_by_key.get(&(r.source_id.as_str(), position)).copied().unwrap_or(0.0))
            .collect();

        let present_total: f64 = configured.iter().sum();
        let effective: Vec<f64> = if present_total > 0.0 {
            configured.iter().map(|w| w / present_total).collect()
        } else {
            // Nothing weighted is present; trust whoever showed up equally
            vec![1.0 / rows.len() as f64; rows.len()]
        };

        let mean: f64 = rows.iter().zip(&effective).map(|(r, w)| w * r.points).sum();

        let variance_between: f64 = rows
            .iter()
            .zip(&effective)
            .map(|(r, w)| w * (r.points - mean).powi(2))
            .sum();

        let variance_within: f64 = rows
            .iter()
            .zip(&effective)
            .map(|(r, w)| {
                let rmse =
                    rmse_by_key.get(&(r.source_id.as_str(), position)).copied().unwrap_or(0.0);
                w * w * rmse * rmse
            })
            .sum();

        let std_dev = (variance_between + variance_within).max(0.0).sqrt();
        let half_width = params.confidence_z * std_dev;

        estimates.push(BlendedEstimate {
            player_id: player_id.to_string(),
            position,
            mean,
            std_dev,
            ci_low: mean - half_width,
            ci_high: mean + half_width,
            tier: None,
        });
    }

    debug!("Blended {} rows into {} estimates", current.len(), estimates.len());
    estimates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn params() -> BlendParameters {
        BlendParameters { confidence_z: 1.96 }
    }

    fn row(player: &str, position: Position, points: f64, source: &str) -> ProjectionRow {
        ProjectionRow {
            player_id: player.to_string(),
            position,
            season: 2025,
            week: 5,
            points,
            source_id: source.to_string(),
            updated_at: Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap(),
        }
    }

    fn weight(source: &str, position: Position, weight: f64) -> PerSourceWeight {
        PerSourceWeight { source_id: source.to_string(), position, weight }
    }

    fn perf(source: &str, position: Position, rmse: f64) -> PerSourcePerformance {
        PerSourcePerformance {
            source_id: source.to_string(),
            position,
            rmse,
            mae: rmse,
            sample_count: 10,
        }
    }

    #[test]
    fn test_mean_uses_renormalized_present_weights() {
        // "c" is configured at 0.5 but missing for this player, so a and b
        // renormalize to 0.25/0.75 of the remaining mass
        let rows = vec![row("p1", Position::RB, 10.0, "a"), row("p1", Position::RB, 20.0, "b")];
        let weights = vec![
            weight("a", Position::RB, 0.125),
            weight("b", Position::RB, 0.375),
            weight("c", Position::RB, 0.5),
        ];

        let estimates = blend_week(&rows, &weights, &[], &params());
        assert_eq!(estimates.len(), 1);
        assert!((estimates[0].mean - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_present_weight_falls_back_to_uniform() {
        let rows = vec![row("p1", Position::WR, 8.0, "x"), row("p1", Position::WR, 12.0, "y")];
        // Neither x nor y has a configured weight at WR
        let weights = vec![weight("a", Position::WR, 1.0)];

        let estimates = blend_week(&rows, &weights, &[], &params());
        assert!((estimates[0].mean - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_disagreement_widens_the_interval() {
        let weights = vec![weight("a", Position::QB, 0.5), weight("b", Position::QB, 0.5)];

        let agree = vec![row("p1", Position::QB, 20.0, "a"), row("p1", Position::QB, 20.0, "b")];
        let disagree = vec![row("p1", Position::QB, 10.0, "a"), row("p1", Position::QB, 30.0, "b")];

        let tight = blend_week(&agree, &weights, &[], &params());
        let wide = blend_week(&disagree, &weights, &[], &params());
        assert!(tight[0].std_dev < 1e-9);
        assert!(wide[0].std_dev > 9.0);
        assert!((wide[0].mean - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_track_record_keeps_single_source_interval_open() {
        // One source, fully agreeing with itself: between-source variance is
        // zero, but its own history still widens the band
        let rows = vec![row("p1", Position::TE, 9.0, "a")];
        let weights = vec![weight("a", Position::TE, 1.0)];
        let performance = vec![perf("a", Position::TE, 4.0)];

        let estimates = blend_week(&rows, &weights, &performance, &params());
        assert!((estimates[0].std_dev - 4.0).abs() < 1e-9);
        assert!((estimates[0].ci_high - (9.0 + 1.96 * 4.0)).abs() < 1e-9);
        assert!((estimates[0].ci_low - (9.0 - 1.96 * 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_blend_is_deterministic() {
        let rows = vec![
            row("p2", Position::RB, 14.0, "b"),
            row("p1", Position::QB, 21.0, "a"),
            row("p2", Position::RB, 11.0, "a"),
            row("p1", Position::QB, 19.0, "b"),
        ];
        let weights = vec![
            weight("a", Position::QB, 0.6),
            weight("b", Position::QB, 0.4),
            weight("a", Position::RB, 0.6),
            weight("b", Position::RB, 0.4),
        ];
        let performance = vec![perf("a", Position::QB, 3.0), perf("b", Position::QB, 5.0)];

        let first = blend_week(&rows, &weights, &performance, &params());
        let second = blend_week(&rows, &weights, &performance, &params());
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(&second) {
            assert_eq!(x.player_id, y.player_id);
            assert_eq!(x.mean.to_bits(), y.mean.to_bits());
            assert_eq!(x.std_dev.to_bits(), y.std_dev.to_bits());
        }
    }
}
