//! Collaborator traits the recompute cycle depends on
//!
//! The cycle owns no persistence and no wire format. Everything it reads
//! or writes goes through these traits; implementations live elsewhere
//! (HTTP clients, databases, the in-memory store used by tests).

use crate::error::Result;
use crate::models::LineupSummary;
use lineup_engine::{AdminOverrides, PlayerMeta, UserRoster, WeeklyLineup};
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// One upstream provider of weekly point projections
///
/// Returns the raw source-specific payload; the matching `SourceAdapter`
/// is the only place that understands its shape.
#[async_trait::async_trait]
pub trait ProjectionProvider: Send + Sync {
    /// Stable id, matching the adapter registered for this source
    fn source_id(&self) -> &str;

    /// Fetch the raw projection payload for one week
    async fn fetch_projections(&self, season: i32, week: u32) -> anyhow::Result<serde_json::Value>;
}

/// Provider of realized outcomes for past weeks
#[async_trait::async_trait]
pub trait ActualsProvider: Send + Sync {
    /// Stable id, matching the adapter registered for this feed
    fn source_id(&self) -> &str;

    /// Fetch the raw actuals payload covering a week range
    async fn fetch_actuals(
        &self,
        season: i32,
        weeks: RangeInclusive<u32>,
    ) -> anyhow::Result<serde_json::Value>;
}

/// Player metadata lookup: position, team, injury designation
#[async_trait::async_trait]
pub trait PlayerMetadataProvider: Send + Sync {
    async fn lookup(&self, player_ids: &[String]) -> anyhow::Result<HashMap<String, PlayerMeta>>;
}

/// Reads and writes owned by the roster-store collaborator
///
/// The core only decides the shapes; persistence mechanics (and any
/// same-key serialization stricter than last-writer-wins) belong to the
/// implementation.
#[async_trait::async_trait]
pub trait RosterStore: Send + Sync {
    /// Read a roster by id
    async fn roster(&self, roster_id: &str) -> Result<UserRoster>;

    /// Read the administrator overrides for a week, if any were set
    async fn overrides(&self, week: u32) -> Result<Option<AdminOverrides>>;

    /// Read the previously persisted lineup for (roster, week), if any
    async fn lineup(&self, roster_id: &str, week: u32) -> Result<Option<WeeklyLineup>>;

    /// Persist a lineup for (roster, week), replacing any previous one
    async fn store_lineup(&self, roster_id: &str, lineup: &WeeklyLineup) -> Result<()>;
}

/// Fire-and-forget delivery of a "new lineup" notification
///
/// The cycle decides whether to call this, never how the message is
/// delivered or formatted.
#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    async fn notify(&self, roster_id: &str, summary: &LineupSummary) -> anyhow::Result<()>;
}
