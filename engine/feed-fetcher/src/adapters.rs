//! Source adapters: one per upstream feed shape
//!
//! Each adapter owns the full knowledge of its feed's wire format and
//! nothing else. Rows with unmappable positions or missing points are
//! dropped individually; a payload that fails to parse at all is an
//! error the registry absorbs into an empty row set.

use crate::models::{
    FanForecastEnvelope, GridironIqEnvelope, MetadataRow, SharpStatsRow, StatsVaultEnvelope,
};
use chrono::{DateTime, Utc};
use ensemble_engine::{parse_position, EnsembleError, ProjectionRow, Result, SourceAdapter};
use lineup_engine::{InjuryStatus, PlayerMeta};
use std::collections::HashMap;
use tracing::debug;

pub const SHARPSTATS: &str = "sharpstats";
pub const GRIDIRON_IQ: &str = "gridiron_iq";
pub const FANFORECAST: &str = "fanforecast";
pub const STATSVAULT: &str = "statsvault";

/// Adapter for the SharpStats flat PascalCase feed
pub struct SharpStatsAdapter;

impl SourceAdapter for SharpStatsAdapter {
    fn source_id(&self) -> &str {
        SHARPSTATS
    }

    fn normalize(
        &self,
        raw: &serde_json::Value,
        season: i32,
        week: u32,
    ) -> Result<Vec<ProjectionRow>> {
        let rows: Vec<SharpStatsRow> = serde_json::from_value(raw.clone())
            .map_err(|e| EnsembleError::malformed(SHARPSTATS, e.to_string()))?;

        let normalized = rows
            .into_iter()
            .filter_map(|row| {
                let Some(position) = parse_position(&row.position) else {
                    debug!("Dropping SharpStats row for '{}': position '{}'", row.name, row.position);
                    return None;
                };
                let points = row.fantasy_points?;
                let updated_at = row
                    .updated
                    .as_deref()
                    .and_then(|u| u.parse::<DateTime<Utc>>().ok())
                    .unwrap_or_else(Utc::now);
                Some(ProjectionRow {
                    player_id: row.player_id,
                    position,
                    season,
                    week: row.week.unwrap_or(week),
                    points,
                    source_id: SHARPSTATS.to_string(),
                    updated_at,
                })
            })
            .collect();
        Ok(normalized)
    }
}

/// Adapter for the GridironIQ envelope feed with string-typed points
pub struct GridironIqAdapter;

impl SourceAdapter for GridironIqAdapter {
    fn source_id(&self) -> &str {
        GRIDIRON_IQ
    }

    fn normalize(
        &self,
        raw: &serde_json::Value,
        season: i32,
        week: u32,
    ) -> Result<Vec<ProjectionRow>> {
        let envelope: GridironIqEnvelope = serde_json::from_value(raw.clone())
            .map_err(|e| EnsembleError::malformed(GRIDIRON_IQ, e.to_string()))?;

        let normalized = envelope
            .data
            .into_iter()
            .filter_map(|row| {
                let position = parse_position(&row.pos)?;
                let points = row.projected_pts.as_deref()?.parse::<f64>().ok()?;
                Some(ProjectionRow {
                    player_id: row.player_id,
                    position,
                    season,
                    week: row.week.unwrap_or(week),
                    points,
                    source_id: GRIDIRON_IQ.to_string(),
                    updated_at: Utc::now(),
                })
            })
            .collect();
        Ok(normalized)
    }
}

/// Adapter for the FanForecast nested feed
pub struct FanForecastAdapter;

impl SourceAdapter for FanForecastAdapter {
    fn source_id(&self) -> &str {
        FANFORECAST
    }

    fn normalize(
        &self,
        raw: &serde_json::Value,
        season: i32,
        week: u32,
    ) -> Result<Vec<ProjectionRow>> {
        let envelope: FanForecastEnvelope = serde_json::from_value(raw.clone())
            .map_err(|e| EnsembleError::malformed(FANFORECAST, e.to_string()))?;

        let normalized = envelope
            .players
            .into_iter()
            .filter_map(|row| {
                let position = parse_position(&row.player.position)?;
                let points = row.projection.points?;
                Some(ProjectionRow {
                    player_id: row.player.id,
                    position,
                    season,
                    week: row.projection.week.unwrap_or(week),
                    points,
                    source_id: FANFORECAST.to_string(),
                    updated_at: Utc::now(),
                })
            })
            .collect();
        Ok(normalized)
    }
}

/// Adapter for StatsVault realized outcomes
///
/// Outcome rows always carry their own week, so the fallback week is
/// effectively unused for well-formed payloads.
pub struct StatsVaultAdapter;

impl SourceAdapter for StatsVaultAdapter {
    fn source_id(&self) -> &str {
        STATSVAULT
    }

    fn normalize(
        &self,
        raw: &serde_json::Value,
        season: i32,
        _week: u32,
    ) -> Result<Vec<ProjectionRow>> {
        let envelope: StatsVaultEnvelope = serde_json::from_value(raw.clone())
            .map_err(|e| EnsembleError::malformed(STATSVAULT, e.to_string()))?;

        let normalized = envelope
            .stats
            .into_iter()
            .filter_map(|row| {
                let position = parse_position(&row.pos)?;
                Some(ProjectionRow {
                    player_id: row.player_id,
                    position,
                    season,
                    week: row.week,
                    points: row.points,
                    source_id: STATSVAULT.to_string(),
                    updated_at: Utc::now(),
                })
            })
            .collect();
        Ok(normalized)
    }
}

/// Registry pre-loaded with every adapter this crate ships
pub fn default_registry() -> ensemble_engine::AdapterRegistry {
    let mut registry = ensemble_engine::AdapterRegistry::new();
    registry.register(Box::new(SharpStatsAdapter));
    registry.register(Box::new(GridironIqAdapter));
    registry.register(Box::new(FanForecastAdapter));
    registry.register(Box::new(StatsVaultAdapter));
    registry
}

/// Convert metadata service rows into per-player metadata
pub fn metadata_from_rows(rows: Vec<MetadataRow>) -> HashMap<String, PlayerMeta> {
    rows.into_iter()
        .filter_map(|row| {
            let position = parse_position(&row.position)?;
            Some((
                row.player_id,
                PlayerMeta {
                    position,
                    team: row.team.unwrap_or_else(|| "FA".to_string()),
                    injury_status: parse_injury(row.injury_status.as_deref()),
                },
            ))
        })
        .collect()
}

/// Map an upstream injury designation onto the known statuses
fn parse_injury(raw: Option<&str>) -> InjuryStatus {
    match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
        Some("OUT") | Some("IR") | Some("SUSPENDED") => InjuryStatus::Out,
        Some("DOUBTFUL") | Some("D") => InjuryStatus::Doubtful,
        Some("QUESTIONABLE") | Some("Q") => InjuryStatus::Questionable,
        _ => InjuryStatus::Healthy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sharpstats_normalizes_and_drops_partial_rows() {
        let raw = json!([
            {"PlayerID": "184", "Name": "A QB", "Position": "QB", "Week": 5, "FantasyPoints": 18.7},
            {"PlayerID": "220", "Name": "A Back", "Position": "RB", "FantasyPoints": 12.3},
            {"PlayerID": "301", "Name": "No Points", "Position": "WR"},
            {"PlayerID": "302", "Name": "A Lineman", "Position": "OT", "FantasyPoints": 1.0}
        ]);

        let rows = SharpStatsAdapter.normalize(&raw, 2025, 5).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player_id, "184");
        assert_eq!(rows[0].week, 5);
        // Missing week falls back to the requested one
        assert_eq!(rows[1].week, 5);
    }

    #[test]
    fn test_sharpstats_rejects_non_array_payload() {
        let result = SharpStatsAdapter.normalize(&json!({"error": "rate limited"}), 2025, 5);
        assert!(matches!(result, Err(EnsembleError::MalformedPayload { .. })));
    }

    #[test]
    fn test_gridiron_iq_parses_string_points() {
        let raw = json!({"data": [
            {"player_id": "184", "pos": "QB", "week": 5, "projected_pts": "18.7"},
            {"player_id": "220", "pos": "RB", "week": 5, "projected_pts": "not a number"},
            {"player_id": "221", "pos": "RB", "week": 5}
        ]});

        let rows = GridironIqAdapter.normalize(&raw, 2025, 5).unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].points - 18.7).abs() < 1e-9);
    }

    #[test]
    fn test_fanforecast_flattens_nested_rows() {
        let raw = json!({"players": [
            {"player": {"id": "184", "position": "QB"}, "projection": {"points": 17.2, "week": 5}},
            {"player": {"id": "400", "position": "D/ST"}, "projection": {"points": 6.0}}
        ]});

        let rows = FanForecastAdapter.normalize(&raw, 2025, 5).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].position, ensemble_engine::Position::DST);
        assert_eq!(rows[1].week, 5);
    }

    #[test]
    fn test_statsvault_rows_keep_their_own_weeks() {
        let raw = json!({"stats": [
            {"player_id": "184", "pos": "QB", "week": 1, "points": 22.0},
            {"player_id": "184", "pos": "QB", "week": 2, "points": 8.5}
        ]});

        let rows = StatsVaultAdapter.normalize(&raw, 2025, 4).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].week, 1);
        assert_eq!(rows[1].week, 2);
    }

    #[test]
    fn test_injury_parsing() {
        assert_eq!(parse_injury(Some("OUT")), InjuryStatus::Out);
        assert_eq!(parse_injury(Some("questionable")), InjuryStatus::Questionable);
        assert_eq!(parse_injury(Some("Doubtful")), InjuryStatus::Doubtful);
        assert_eq!(parse_injury(Some("ACTIVE")), InjuryStatus::Healthy);
        assert_eq!(parse_injury(None), InjuryStatus::Healthy);
    }

    #[test]
    fn test_metadata_rows_skip_unknown_positions() {
        let rows = vec![
            MetadataRow {
                player_id: "184".to_string(),
                position: "QB".to_string(),
                team: Some("BUF".to_string()),
                injury_status: Some("Q".to_string()),
            },
            MetadataRow {
                player_id: "900".to_string(),
                position: "COACH".to_string(),
                team: None,
                injury_status: None,
            },
        ];

        let meta = metadata_from_rows(rows);
        assert_eq!(meta.len(), 1);
        assert_eq!(meta["184"].injury_status, InjuryStatus::Questionable);
        assert_eq!(meta["184"].team, "BUF");
    }
}
