//! In-memory roster store and notifier
//!
//! Backs tests and the demo binary. Real deployments implement the same
//! traits over whatever persistence and delivery they already run.

use crate::error::{RecomputeError, Result};
use crate::models::LineupSummary;
use crate::providers::{NotificationService, RosterStore};
use lineup_engine::{AdminOverrides, UserRoster, WeeklyLineup};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Default)]
struct StoreInner {
    rosters: HashMap<String, UserRoster>,
    overrides: HashMap<u32, AdminOverrides>,
    lineups: HashMap<(String, u32), WeeklyLineup>,
}

/// Roster store held entirely in memory
#[derive(Default)]
pub struct MemoryRosterStore {
    inner: Mutex<StoreInner>,
}

impl MemoryRosterStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a roster
    pub async fn insert_roster(&self, roster: UserRoster) {
        self.inner.lock().await.rosters.insert(roster.id.clone(), roster);
    }

    /// Set the administrator overrides for a week
    pub async fn insert_overrides(&self, overrides: AdminOverrides) {
        self.inner.lock().await.overrides.insert(overrides.week, overrides);
    }

    /// Number of persisted lineups, across all keys
    pub async fn lineup_count(&self) -> usize {
        self.inner.lock().await.lineups.len()
    }
}

#[async_trait::async_trait]
impl RosterStore for MemoryRosterStore {
    async fn roster(&self, roster_id: &str) -> Result<UserRoster> {
        self.inner
            .lock()
            .await
            .rosters
            .get(roster_id)
            .cloned()
            .ok_or_else(|| RecomputeError::RosterNotFound(roster_id.to_string()))
    }

    async fn overrides(&self, week: u32) -> Result<Option<AdminOverrides>> {
        Ok(self.inner.lock().await.overrides.get(&week).cloned())
    }

    async fn lineup(&self, roster_id: &str, week: u32) -> Result<Option<WeeklyLineup>> {
        Ok(self.inner.lock().await.lineups.get(&(roster_id.to_string(), week)).cloned())
    }

    async fn store_lineup(&self, roster_id: &str, lineup: &WeeklyLineup) -> Result<()> {
        // Last writer wins, matching the store contract
        self.inner
            .lock()
            .await
            .lineups
            .insert((roster_id.to_string(), lineup.week), lineup.clone());
        Ok(())
    }
}

/// Notifier that records summaries instead of delivering anything
#[derive(Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<LineupSummary>>,
}

impl MemoryNotifier {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Summaries recorded so far
    pub async fn sent(&self) -> Vec<LineupSummary> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl NotificationService for MemoryNotifier {
    async fn notify(&self, roster_id: &str, summary: &LineupSummary) -> anyhow::Result<()> {
        info!(
            "Notifying roster '{}' of week {} lineup ({} starters, {:.1} projected)",
            roster_id,
            summary.week,
            summary.starters.len(),
            summary.total_score
        );
        self.sent.lock().await.push(summary.clone());
        Ok(())
    }
}
