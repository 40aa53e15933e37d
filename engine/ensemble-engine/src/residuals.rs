//! Historical residuals and per-source error statistics
//!
//! Joins past projections against recorded outcomes to measure how far off
//! each source has been, per position. Rows without a matching outcome
//! contribute no signal at all.

use crate::models::{ActualRow, PerSourcePerformance, Position, ProjectionRow, Residual};
use std::collections::HashMap;
use tracing::debug;

/// Join historical projections against actual outcomes
///
/// Inner join on (player, position, week): a projection with no recorded
/// outcome, or an outcome no source projected, is silently excluded.
pub fn compute_residuals(projections: &[ProjectionRow], actuals: &[ActualRow]) -> Vec<Residual> {
    let mut outcomes: HashMap<(&str, Position, u32), f64> = HashMap::new();
    for actual in actuals {
        outcomes.insert((actual.player_id.as_str(), actual.position, actual.week), actual.points);
    }

    let residuals: Vec<Residual> = projections
        .iter()
        .filter_map(|proj| {
            let actual_points =
                *outcomes.get(&(proj.player_id.as_str(), proj.position, proj.week))?;
            Some(Residual {
                player_id: proj.player_id.clone(),
                position: proj.position,
                season: proj.season,
                week: proj.week,
                projected_points: proj.points,
                actual_points,
                error: proj.points - actual_points,
                source_id: proj.source_id.clone(),
            })
        })
        .collect();

    debug!(
        "Joined {} of {} historical projections against {} outcomes",
        residuals.len(),
        projections.len(),
        actuals.len()
    );
    residuals
}

/// Aggregate residuals into per-(source, position) error statistics
///
/// A (source, position) pair with zero samples simply does not appear in
/// the output; the weight computer supplies the fallback.
pub fn aggregate_performance(residuals: &[Residual]) -> Vec<PerSourcePerformance> {
    let mut groups: HashMap<(&str, Position), Vec<f64>> = HashMap::new();
    for residual in residuals {
        groups
            .entry((residual.source_id.as_str(), residual.position))
            .or_default()
            .push(residual.error);
    }

    let mut performance: Vec<PerSourcePerformance> = groups
        .into_iter()
        .map(|((source_id, position), errors)| {
            let n = errors.len() as f64;
            let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt();
            let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
            PerSourcePerformance {
                source_id: source_id.to_string(),
                position,
                rmse,
                mae,
                sample_count: errors.len(),
            }
        })
        .collect();

    // Deterministic output order for logging and tests
    performance.sort_by(|a, b| (a.source_id.as_str(), a.position).cmp(&(b.source_id.as_str(), b.position)));
    performance
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(player: &str, position: Position, week: u32, points: f64, source: &str) -> ProjectionRow {
        ProjectionRow {
            player_id: player.to_string(),
            position,
            season: 2025,
            week,
            points,
            source_id: source.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_inner_join_excludes_unmatched_rows() {
        let projections = vec![
            row("p1", Position::QB, 1, 20.0, "a"),
            row("p2", Position::RB, 1, 12.0, "a"),
            row("p1", Position::QB, 2, 18.0, "a"),
        ];
        // No outcome for p2 week 1, and an outcome nobody projected
        let actuals = vec![
            row("p1", Position::QB, 1, 17.0, "stats"),
            row("p1", Position::QB, 2, 25.0, "stats"),
            row("p9", Position::WR, 1, 9.0, "stats"),
        ];

        let residuals = compute_residuals(&projections, &actuals);
        assert_eq!(residuals.len(), 2);
        assert!((residuals[0].error - 3.0).abs() < 1e-9);
        assert!((residuals[1].error - (-7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_groups_by_source_and_position() {
        let projections = vec![
            row("p1", Position::QB, 1, 20.0, "a"),
            row("p1", Position::QB, 2, 14.0, "a"),
            row("p2", Position::RB, 1, 10.0, "a"),
            row("p1", Position::QB, 1, 16.0, "b"),
        ];
        let actuals = vec![
            row("p1", Position::QB, 1, 17.0, "stats"),
            row("p1", Position::QB, 2, 18.0, "stats"),
            row("p2", Position::RB, 1, 10.0, "stats"),
        ];

        let performance = aggregate_performance(&compute_residuals(&projections, &actuals));
        assert_eq!(performance.len(), 3);

        let a_qb = performance
            .iter()
            .find(|p| p.source_id == "a" && p.position == Position::QB)
            .unwrap();
        assert_eq!(a_qb.sample_count, 2);
        // errors 3 and -4
        assert!((a_qb.mae - 3.5).abs() < 1e-9);
        assert!((a_qb.rmse - (12.5f64).sqrt()).abs() < 1e-9);

        let a_rb = performance
            .iter()
            .find(|p| p.source_id == "a" && p.position == Position::RB)
            .unwrap();
        assert_eq!(a_rb.sample_count, 1);
        assert!(a_rb.rmse.abs() < 1e-9);
    }

    #[test]
    fn test_zero_history_pair_is_absent() {
        let performance = aggregate_performance(&[]);
        assert!(performance.is_empty());
    }
}
