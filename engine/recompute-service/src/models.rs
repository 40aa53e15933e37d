use chrono::{DateTime, Utc};
use lineup_engine::{SlotKind, WeeklyLineup};
use serde::{Deserialize, Serialize};

/// One started player in a rendered lineup summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotLine {
    pub slot: SlotKind,
    pub player_id: String,
    pub points: f64,
}

/// Rendered summary handed to the notification service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupSummary {
    pub roster_id: String,
    pub week: u32,
    pub starters: Vec<SlotLine>,
    pub total_score: f64,
}

impl LineupSummary {
    /// Build a summary from a computed lineup
    pub fn from_lineup(roster_id: &str, lineup: &WeeklyLineup) -> Self {
        let starters = lineup
            .slots
            .iter()
            .flat_map(|(slot, players)| {
                players.iter().map(|player_id| SlotLine {
                    slot: *slot,
                    player_id: player_id.clone(),
                    points: lineup
                        .per_player_detail
                        .get(player_id)
                        .map(|d| d.points)
                        .unwrap_or(0.0),
                })
            })
            .collect();

        Self {
            roster_id: roster_id.to_string(),
            week: lineup.week,
            starters,
            total_score: lineup.total_score,
        }
    }
}

/// Events emitted during a recompute cycle
#[derive(Debug, Clone, Serialize)]
pub enum RecomputeEvent {
    /// A source feed failed or timed out and contributed zero rows
    SourceFailed {
        source_id: String,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// A lineup was computed and persisted
    LineupComputed {
        roster_id: String,
        week: u32,
        changed: bool,
        timestamp: DateTime<Utc>,
    },

    /// The notification service was invoked
    NotificationSent {
        roster_id: String,
        week: u32,
        timestamp: DateTime<Utc>,
    },

    /// A notification was deliberately not sent
    NotificationSuppressed {
        roster_id: String,
        week: u32,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// Result of one recompute cycle
#[derive(Debug)]
pub struct RecomputeOutcome {
    pub lineup: WeeklyLineup,
    /// Whether the slot assignments differ from the previous lineup
    pub changed: bool,
    /// Whether the notification service was actually invoked
    pub notified: bool,
    pub events: Vec<RecomputeEvent>,
}
