use chrono::{DateTime, Utc};
use ensemble_engine::{Position, Tier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// A named roster slot with a required starter count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    QB,
    RB,
    WR,
    TE,
    FLEX,
    DST,
    K,
}

impl SlotKind {
    /// All slot kinds in display order
    pub const ALL: [SlotKind; 7] = [
        SlotKind::QB,
        SlotKind::RB,
        SlotKind::WR,
        SlotKind::TE,
        SlotKind::FLEX,
        SlotKind::DST,
        SlotKind::K,
    ];

    /// Single-position slots, in greedy fill order
    pub const SINGLE_POSITION: [SlotKind; 6] =
        [SlotKind::QB, SlotKind::RB, SlotKind::WR, SlotKind::TE, SlotKind::DST, SlotKind::K];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::QB => "QB",
            SlotKind::RB => "RB",
            SlotKind::WR => "WR",
            SlotKind::TE => "TE",
            SlotKind::FLEX => "FLEX",
            SlotKind::DST => "DST",
            SlotKind::K => "K",
        }
    }

    /// Whether a player at this position can fill this slot
    pub fn accepts(&self, position: Position) -> bool {
        match self {
            SlotKind::QB => position == Position::QB,
            SlotKind::RB => position == Position::RB,
            SlotKind::WR => position == Position::WR,
            SlotKind::TE => position == Position::TE,
            SlotKind::FLEX => {
                matches!(position, Position::RB | Position::WR | Position::TE)
            }
            SlotKind::DST => position == Position::DST,
            SlotKind::K => position == Position::K,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Required starter counts per slot kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRules {
    pub qb: usize,
    pub rb: usize,
    pub wr: usize,
    pub te: usize,
    pub flex: usize,
    pub dst: usize,
    pub k: usize,
}

impl RosterRules {
    /// Required count for one slot kind
    pub fn required(&self, kind: SlotKind) -> usize {
        match kind {
            SlotKind::QB => self.qb,
            SlotKind::RB => self.rb,
            SlotKind::WR => self.wr,
            SlotKind::TE => self.te,
            SlotKind::FLEX => self.flex,
            SlotKind::DST => self.dst,
            SlotKind::K => self.k,
        }
    }

    /// Total number of starting slots
    pub fn total_slots(&self) -> usize {
        SlotKind::ALL.iter().map(|k| self.required(*k)).sum()
    }
}

impl Default for RosterRules {
    /// The common single-QB league shape
    fn default() -> Self {
        Self { qb: 1, rb: 2, wr: 2, te: 1, flex: 1, dst: 1, k: 1 }
    }
}

/// Scoring profile a roster's projections are normalized to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringProfile {
    Standard,
    HalfPpr,
    Ppr,
}

/// A user's roster as read from the roster store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoster {
    pub id: String,
    /// Player ids in the order the user drafted or listed them
    pub players: Vec<String>,
    pub rules: RosterRules,
    pub scoring_profile: ScoringProfile,
    /// Players the user prefers for the FLEX slot
    pub flex_pins: Vec<String>,
    /// Whether the user opted into lineup change notifications
    pub notify: bool,
}

/// Week-scoped administrator overrides, applied to every roster that week
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminOverrides {
    pub week: u32,
    /// Signed adjustment added to a player's blended points
    pub point_delta: HashMap<String, f64>,
    pub force_start: HashSet<String>,
    pub force_sit: HashSet<String>,
    pub note: Option<String>,
}

impl AdminOverrides {
    /// Overrides that change nothing for the given week
    pub fn none(week: u32) -> Self {
        Self { week, ..Default::default() }
    }
}

/// Injury designation from the player metadata provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InjuryStatus {
    #[default]
    Healthy,
    Questionable,
    Doubtful,
    Out,
}

/// Player metadata used for slot eligibility and injury penalties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMeta {
    pub position: Position,
    pub team: String,
    pub injury_status: InjuryStatus,
}

/// Per-player explanation attached to a computed lineup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDetail {
    /// Adjusted points the assignment ordered this player by
    pub points: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub tier: Option<Tier>,
    pub note: Option<String>,
}

/// The computed starting lineup and bench for one roster-week
///
/// Persisted by the roster store keyed by (roster, week); a recompute for
/// the same key supersedes the previous lineup, last writer wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyLineup {
    pub week: u32,
    /// Starters per slot kind, in the order they were placed
    pub slots: BTreeMap<SlotKind, Vec<String>>,
    /// Unplaced players, best first
    pub bench: Vec<String>,
    pub per_player_detail: BTreeMap<String, PlayerDetail>,
    pub total_score: f64,
    /// Fingerprint of `slots` only, for change detection
    pub content_hash: u64,
    pub computed_at: DateTime<Utc>,
}

impl WeeklyLineup {
    /// All started player ids across every slot
    pub fn starters(&self) -> impl Iterator<Item = &String> {
        self.slots.values().flatten()
    }
}
