//! The weekly recompute cycle
//!
//! Each run is an independent, stateless unit of work: all inputs are
//! snapshotted at the start, the computation is pure, and the only shared
//! resource is the previously persisted lineup, read once and replaced
//! once. Concurrent runs for different rosters are safe; concurrent runs
//! for the same (roster, week) are last-writer-wins by contract.

use crate::config::RecomputeConfig;
use crate::error::{RecomputeError, Result};
use crate::models::{LineupSummary, RecomputeEvent, RecomputeOutcome};
use crate::providers::{
    ActualsProvider, NotificationService, PlayerMetadataProvider, ProjectionProvider, RosterStore,
};
use chrono::Utc;
use ensemble_engine::{
    aggregate_performance, assign_tiers, blend_week, compute_residuals, compute_weights,
    ActualRow, AdapterRegistry, BlendedEstimate, EnsembleConfig, ProjectionRow,
};
use futures::future::join_all;
use lineup_engine::{assign_lineup, should_notify, AdminOverrides, LineupConfig, UserRoster, WeeklyLineup};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Orchestrates one weekly recompute per (roster, week)
pub struct RecomputeEngine {
    registry: AdapterRegistry,
    sources: Vec<Arc<dyn ProjectionProvider>>,
    actuals: Arc<dyn ActualsProvider>,
    metadata: Arc<dyn PlayerMetadataProvider>,
    store: Arc<dyn RosterStore>,
    notifier: Arc<dyn NotificationService>,
    ensemble_config: EnsembleConfig,
    lineup_config: LineupConfig,
    config: RecomputeConfig,
}

impl RecomputeEngine {
    /// Create an engine over the given collaborators
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: AdapterRegistry,
        sources: Vec<Arc<dyn ProjectionProvider>>,
        actuals: Arc<dyn ActualsProvider>,
        metadata: Arc<dyn PlayerMetadataProvider>,
        store: Arc<dyn RosterStore>,
        notifier: Arc<dyn NotificationService>,
        ensemble_config: EnsembleConfig,
        lineup_config: LineupConfig,
        config: RecomputeConfig,
    ) -> Self {
        Self {
            registry,
            sources,
            actuals,
            metadata,
            store,
            notifier,
            ensemble_config,
            lineup_config,
            config,
        }
    }

    /// Recompute the lineup for one roster-week and notify on material change
    pub async fn run_cycle(
        &self,
        roster_id: &str,
        season: i32,
        week: u32,
    ) -> Result<RecomputeOutcome> {
        info!("Starting recompute for roster '{}' season {} week {}", roster_id, season, week);
        let mut events = Vec::new();

        // Snapshot every input up front; nothing is re-read mid-cycle
        let roster = self.store.roster(roster_id).await?;
        let overrides =
            self.store.overrides(week).await?.unwrap_or_else(|| AdminOverrides::none(week));
        let previous = self.store.lineup(roster_id, week).await?;

        let current = self.fetch_current(season, week, &mut events).await;
        if current.is_empty() {
            return Err(RecomputeError::NoProjectionData {
                season,
                week,
                sources: self.sources.len(),
            });
        }

        let (historical, actuals) = self.fetch_history(season, week, &mut events).await;
        let residuals = compute_residuals(&historical, &actuals);
        let weights = compute_weights(&residuals, &self.ensemble_config);
        let performance = aggregate_performance(&residuals);

        let estimates = assign_tiers(
            blend_week(&current, &weights, &performance, &self.ensemble_config.blend),
            &self.ensemble_config.tiers,
        );
        let blended_by_player: HashMap<String, BlendedEstimate> =
            estimates.into_iter().map(|e| (e.player_id.clone(), e)).collect();

        let meta = self
            .metadata
            .lookup(&roster.players)
            .await
            .map_err(|e| RecomputeError::MetadataUnavailable(e.to_string()))?;

        let lineup = assign_lineup(
            &roster,
            &roster.rules,
            &blended_by_player,
            &overrides,
            &meta,
            &self.lineup_config,
        );

        let changed = should_notify(&lineup, previous.as_ref());
        self.store.store_lineup(roster_id, &lineup).await?;
        events.push(RecomputeEvent::LineupComputed {
            roster_id: roster_id.to_string(),
            week,
            changed,
            timestamp: Utc::now(),
        });

        let notified = self.maybe_notify(roster_id, &roster, &lineup, changed, &mut events).await;

        info!(
            "Recompute complete for roster '{}' week {}: changed={}, notified={}",
            roster_id, week, changed, notified
        );
        Ok(RecomputeOutcome { lineup, changed, notified, events })
    }

    /// Fetch and normalize the target week from every source concurrently
    ///
    /// Sources are fail-open: an error or timeout contributes zero rows
    /// and an event, never a cycle failure.
    async fn fetch_current(
        &self,
        season: i32,
        week: u32,
        events: &mut Vec<RecomputeEvent>,
    ) -> Vec<ProjectionRow> {
        let fetches = self.sources.iter().map(|source| {
            fetch_with_timeout(Arc::clone(source), season, week, self.config.source_timeout())
        });

        let mut rows = Vec::new();
        for (source_id, result) in join_all(fetches).await {
            match result {
                Ok(raw) => {
                    rows.extend(self.registry.normalize_source(&source_id, &raw, season, week));
                }
                Err(error) => {
                    warn!("Source '{}' failed for week {}: {}", source_id, week, error);
                    events.push(RecomputeEvent::SourceFailed {
                        source_id,
                        error,
                        timestamp: Utc::now(),
                    });
                }
            }
        }
        rows
    }

    /// Fetch the historical window: past projections per source per week,
    /// plus the realized outcomes, all concurrently and all fail-open
    async fn fetch_history(
        &self,
        season: i32,
        week: u32,
        events: &mut Vec<RecomputeEvent>,
    ) -> (Vec<ProjectionRow>, Vec<ActualRow>) {
        let last_completed = week.saturating_sub(1);
        let first = week.saturating_sub(self.config.history_weeks).max(1);
        if last_completed < first {
            return (Vec::new(), Vec::new());
        }

        let limit = self.config.source_timeout();
        let projection_fetches = self.sources.iter().flat_map(|source| {
            (first..=last_completed)
                .map(|past_week| fetch_with_timeout(Arc::clone(source), season, past_week, limit))
        });

        let actuals_provider = Arc::clone(&self.actuals);
        let actuals_fetch = async move {
            match timeout(limit, actuals_provider.fetch_actuals(season, first..=last_completed))
                .await
            {
                Ok(Ok(raw)) => Ok(raw),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("timed out after {limit:?}")),
            }
        };

        let (projection_results, actuals_result) =
            tokio::join!(join_all(projection_fetches), actuals_fetch);

        let mut historical = Vec::new();
        for (source_id, result) in projection_results {
            match result {
                Ok(raw) => {
                    // The week passed here is the fallback; rows carry their own
                    historical.extend(self.registry.normalize_source(
                        &source_id,
                        &raw,
                        season,
                        last_completed,
                    ));
                }
                Err(error) => {
                    warn!("Historical fetch from '{}' failed: {}", source_id, error);
                    events.push(RecomputeEvent::SourceFailed {
                        source_id,
                        error,
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        let actuals = match actuals_result {
            Ok(raw) => self.registry.normalize_source(
                self.actuals.source_id(),
                &raw,
                season,
                last_completed,
            ),
            Err(error) => {
                warn!("Actuals fetch failed, weighting falls back to priors: {}", error);
                events.push(RecomputeEvent::SourceFailed {
                    source_id: self.actuals.source_id().to_string(),
                    error,
                    timestamp: Utc::now(),
                });
                Vec::new()
            }
        };

        (historical, actuals)
    }

    async fn maybe_notify(
        &self,
        roster_id: &str,
        roster: &UserRoster,
        lineup: &WeeklyLineup,
        changed: bool,
        events: &mut Vec<RecomputeEvent>,
    ) -> bool {
        let suppress_reason = if !changed {
            Some("lineup unchanged")
        } else if !roster.notify {
            Some("user opted out")
        } else if !self.config.notifications_enabled {
            Some("notifications disabled")
        } else {
            None
        };

        if let Some(reason) = suppress_reason {
            events.push(RecomputeEvent::NotificationSuppressed {
                roster_id: roster_id.to_string(),
                week: lineup.week,
                reason: reason.to_string(),
                timestamp: Utc::now(),
            });
            return false;
        }

        let summary = LineupSummary::from_lineup(roster_id, lineup);
        match self.notifier.notify(roster_id, &summary).await {
            Ok(()) => {
                events.push(RecomputeEvent::NotificationSent {
                    roster_id: roster_id.to_string(),
                    week: lineup.week,
                    timestamp: Utc::now(),
                });
                true
            }
            Err(e) => {
                // Delivery is fire-and-forget; a failed send never fails the cycle
                warn!("Notification delivery failed for roster '{}': {}", roster_id, e);
                false
            }
        }
    }
}

/// Fetch one source-week with a timeout, flattening both failure modes
async fn fetch_with_timeout(
    source: Arc<dyn ProjectionProvider>,
    season: i32,
    week: u32,
    limit: Duration,
) -> (String, std::result::Result<serde_json::Value, String>) {
    let source_id = source.source_id().to_string();
    let result = match timeout(limit, source.fetch_projections(season, week)).await {
        Ok(Ok(raw)) => Ok(raw),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("timed out after {limit:?}")),
    };
    (source_id, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryNotifier, MemoryRosterStore};
    use ensemble_engine::{parse_position, Result as EnsembleResult, SourceAdapter};
    use lineup_engine::{InjuryStatus, PlayerMeta, RosterRules, ScoringProfile};
    use serde_json::{json, Value};

    /// Adapter for the plain test feed shape: [{"id","pos","pts","week"?}]
    struct TestAdapter {
        id: &'static str,
    }

    impl SourceAdapter for TestAdapter {
        fn source_id(&self) -> &str {
            self.id
        }

        fn normalize(
            &self,
            raw: &Value,
            season: i32,
            week: u32,
        ) -> EnsembleResult<Vec<ensemble_engine::ProjectionRow>> {
            let rows = raw
                .as_array()
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| {
                            Some(ensemble_engine::ProjectionRow {
                                player_id: entry["id"].as_str()?.to_string(),
                                position: parse_position(entry["pos"].as_str()?)?,
                                season,
                                week: entry["week"].as_u64().map(|w| w as u32).unwrap_or(week),
                                points: entry["pts"].as_f64()?,
                                source_id: self.id.to_string(),
                                updated_at: Utc::now(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            Ok(rows)
        }
    }

    struct StaticSource {
        id: &'static str,
        payload: Value,
    }

    #[async_trait::async_trait]
    impl ProjectionProvider for StaticSource {
        fn source_id(&self) -> &str {
            self.id
        }

        async fn fetch_projections(&self, _season: i32, _week: u32) -> anyhow::Result<Value> {
            Ok(self.payload.clone())
        }
    }

    struct FailingSource {
        id: &'static str,
    }

    #[async_trait::async_trait]
    impl ProjectionProvider for FailingSource {
        fn source_id(&self) -> &str {
            self.id
        }

        async fn fetch_projections(&self, _season: i32, _week: u32) -> anyhow::Result<Value> {
            anyhow::bail!("connection refused")
        }
    }

    struct StaticActuals {
        payload: Value,
    }

    #[async_trait::async_trait]
    impl ActualsProvider for StaticActuals {
        fn source_id(&self) -> &str {
            "statsvault"
        }

        async fn fetch_actuals(
            &self,
            _season: i32,
            _weeks: std::ops::RangeInclusive<u32>,
        ) -> anyhow::Result<Value> {
            Ok(self.payload.clone())
        }
    }

    struct StaticMetadata {
        meta: HashMap<String, PlayerMeta>,
    }

    #[async_trait::async_trait]
    impl PlayerMetadataProvider for StaticMetadata {
        async fn lookup(
            &self,
            _player_ids: &[String],
        ) -> anyhow::Result<HashMap<String, PlayerMeta>> {
            Ok(self.meta.clone())
        }
    }

    const PLAYERS: [(&str, &str, f64); 9] = [
        ("P1", "QB", 20.0),
        ("P2", "RB", 18.0),
        ("P3", "RB", 15.0),
        ("P4", "RB", 12.0),
        ("P5", "WR", 14.0),
        ("P6", "WR", 10.0),
        ("P7", "TE", 8.0),
        ("P8", "DST", 7.0),
        ("P9", "K", 6.0),
    ];

    fn projection_payload(offset: f64) -> Value {
        Value::Array(
            PLAYERS
                .iter()
                .map(|(id, pos, pts)| json!({"id": id, "pos": pos, "pts": pts + offset}))
                .collect(),
        )
    }

    fn actuals_payload() -> Value {
        Value::Array(
            PLAYERS
                .iter()
                .flat_map(|(id, pos, pts)| {
                    (1..=2).map(move |week| {
                        json!({"id": id, "pos": pos, "pts": pts - 1.0, "week": week})
                    })
                })
                .collect(),
        )
    }

    fn sample_roster(notify: bool) -> UserRoster {
        UserRoster {
            id: "team-1".to_string(),
            players: PLAYERS.iter().map(|(id, _, _)| id.to_string()).collect(),
            rules: RosterRules::default(),
            scoring_profile: ScoringProfile::Standard,
            flex_pins: Vec::new(),
            notify,
        }
    }

    fn sample_meta() -> HashMap<String, PlayerMeta> {
        PLAYERS
            .iter()
            .map(|(id, pos, _)| {
                (
                    id.to_string(),
                    PlayerMeta {
                        position: parse_position(pos).unwrap(),
                        team: "FA".to_string(),
                        injury_status: InjuryStatus::Healthy,
                    },
                )
            })
            .collect()
    }

    fn registry_for(ids: &[&'static str]) -> AdapterRegistry {
        let mut registry = AdapterRegistry::new();
        for &id in ids {
            registry.register(Box::new(TestAdapter { id }));
        }
        registry.register(Box::new(TestAdapter { id: "statsvault" }));
        registry
    }

    fn ensemble_config(sources: &[&str]) -> EnsembleConfig {
        let mut config = EnsembleConfig::default();
        config.sources = sources.iter().map(|s| s.to_string()).collect();
        config
    }

    fn engine_with(
        sources: Vec<Arc<dyn ProjectionProvider>>,
        source_ids: &[&'static str],
        store: Arc<MemoryRosterStore>,
        notifier: Arc<MemoryNotifier>,
    ) -> RecomputeEngine {
        RecomputeEngine::new(
            registry_for(source_ids),
            sources,
            Arc::new(StaticActuals { payload: actuals_payload() }),
            Arc::new(StaticMetadata { meta: sample_meta() }),
            store,
            notifier,
            ensemble_config(source_ids),
            LineupConfig::default(),
            RecomputeConfig { history_weeks: 2, ..Default::default() },
        )
    }

    #[tokio::test]
    async fn test_cycle_notifies_once_then_suppresses() {
        let store = Arc::new(MemoryRosterStore::new());
        store.insert_roster(sample_roster(true)).await;
        let notifier = Arc::new(MemoryNotifier::new());

        let engine = engine_with(
            vec![
                Arc::new(StaticSource { id: "alpha", payload: projection_payload(0.0) }),
                Arc::new(StaticSource { id: "beta", payload: projection_payload(1.0) }),
            ],
            &["alpha", "beta"],
            Arc::clone(&store),
            Arc::clone(&notifier),
        );

        let first = engine.run_cycle("team-1", 2025, 3).await.unwrap();
        assert!(first.changed);
        assert!(first.notified);
        assert_eq!(first.lineup.slots[&lineup_engine::SlotKind::QB], vec!["P1".to_string()]);

        // Identical inputs: the recompute must be silent the second time
        let second = engine.run_cycle("team-1", 2025, 3).await.unwrap();
        assert!(!second.changed);
        assert!(!second.notified);
        assert_eq!(notifier.sent().await.len(), 1);
        assert_eq!(store.lineup_count().await, 1);
    }

    #[tokio::test]
    async fn test_all_sources_failing_is_fatal() {
        let store = Arc::new(MemoryRosterStore::new());
        store.insert_roster(sample_roster(true)).await;
        let notifier = Arc::new(MemoryNotifier::new());

        let engine = engine_with(
            vec![
                Arc::new(FailingSource { id: "alpha" }),
                Arc::new(FailingSource { id: "beta" }),
            ],
            &["alpha", "beta"],
            Arc::clone(&store),
            Arc::clone(&notifier),
        );

        let result = engine.run_cycle("team-1", 2025, 3).await;
        assert!(matches!(result, Err(RecomputeError::NoProjectionData { .. })));
        assert_eq!(store.lineup_count().await, 0);
        assert!(notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_single_source_failure_degrades_gracefully() {
        let store = Arc::new(MemoryRosterStore::new());
        store.insert_roster(sample_roster(true)).await;
        let notifier = Arc::new(MemoryNotifier::new());

        let engine = engine_with(
            vec![
                Arc::new(StaticSource { id: "alpha", payload: projection_payload(0.0) }),
                Arc::new(FailingSource { id: "beta" }),
            ],
            &["alpha", "beta"],
            Arc::clone(&store),
            Arc::clone(&notifier),
        );

        let outcome = engine.run_cycle("team-1", 2025, 3).await.unwrap();
        assert!(outcome.notified);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, RecomputeEvent::SourceFailed { source_id, .. } if source_id == "beta")));
    }

    #[tokio::test]
    async fn test_missing_roster_is_propagated() {
        let store = Arc::new(MemoryRosterStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let engine = engine_with(
            vec![Arc::new(StaticSource { id: "alpha", payload: projection_payload(0.0) })],
            &["alpha"],
            store,
            notifier,
        );

        let result = engine.run_cycle("ghost-team", 2025, 3).await;
        assert!(matches!(result, Err(RecomputeError::RosterNotFound(_))));
    }

    #[tokio::test]
    async fn test_opted_out_roster_is_never_notified() {
        let store = Arc::new(MemoryRosterStore::new());
        store.insert_roster(sample_roster(false)).await;
        let notifier = Arc::new(MemoryNotifier::new());

        let engine = engine_with(
            vec![Arc::new(StaticSource { id: "alpha", payload: projection_payload(0.0) })],
            &["alpha"],
            Arc::clone(&store),
            Arc::clone(&notifier),
        );

        let outcome = engine.run_cycle("team-1", 2025, 3).await.unwrap();
        assert!(outcome.changed);
        assert!(!outcome.notified);
        assert!(notifier.sent().await.is_empty());
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, RecomputeEvent::NotificationSuppressed { reason, .. } if reason == "user opted out")));
    }

    #[tokio::test]
    async fn test_week_one_has_no_history_window() {
        let store = Arc::new(MemoryRosterStore::new());
        store.insert_roster(sample_roster(true)).await;
        let notifier = Arc::new(MemoryNotifier::new());

        let engine = engine_with(
            vec![Arc::new(StaticSource { id: "alpha", payload: projection_payload(0.0) })],
            &["alpha"],
            Arc::clone(&store),
            Arc::clone(&notifier),
        );

        // No completed weeks: weighting degrades to priors, the cycle still runs
        let outcome = engine.run_cycle("team-1", 2025, 1).await.unwrap();
        assert_eq!(outcome.lineup.week, 1);
        assert!(outcome.lineup.bench.is_empty());
    }
}
