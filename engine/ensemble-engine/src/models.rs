use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fantasy positions the ensemble knows how to score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DST,
}

impl Position {
    /// All positions, in canonical order
    pub const ALL: [Position; 6] =
        [Position::QB, Position::RB, Position::WR, Position::TE, Position::K, Position::DST];

    /// Short string form as used in feeds and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DST => "DST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One normalized projection from one source for one player-week
///
/// Produced by a source adapter; immutable once built. `points` is already
/// normalized to the scoring profile, so rows from different sources are
/// directly comparable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub player_id: String,
    pub position: Position,
    pub season: i32,
    pub week: u32,
    pub points: f64,
    pub source_id: String,
    pub updated_at: DateTime<Utc>,
}

/// A realized outcome for a past player-week
///
/// Same shape as a projection row; `points` is what actually happened.
pub type ActualRow = ProjectionRow;

/// A historical projection joined against its realized outcome
#[derive(Debug, Clone)]
pub struct Residual {
    pub player_id: String,
    pub position: Position,
    pub season: i32,
    pub week: u32,
    pub projected_points: f64,
    pub actual_points: f64,
    /// projected minus actual; positive means the source was too optimistic
    pub error: f64,
    pub source_id: String,
}

/// Historical error statistics for one (source, position) pair
#[derive(Debug, Clone)]
pub struct PerSourcePerformance {
    pub source_id: String,
    pub position: Position,
    pub rmse: f64,
    pub mae: f64,
    pub sample_count: usize,
}

/// Blending weight for one (source, position) pair
///
/// Weights for a given position sum to 1 across all configured sources.
#[derive(Debug, Clone)]
pub struct PerSourceWeight {
    pub source_id: String,
    pub position: Position,
    pub weight: f64,
}

/// Ordinal quality bucket for a blended estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
    D,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::A => write!(f, "A"),
            Tier::B => write!(f, "B"),
            Tier::C => write!(f, "C"),
            Tier::D => write!(f, "D"),
        }
    }
}

/// The blended point estimate for one player for the target week
///
/// This is the canonical ensemble output consumed by the lineup engine.
/// `tier` is filled in by the tier assigner after blending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendedEstimate {
    pub player_id: String,
    pub position: Position,
    pub mean: f64,
    pub std_dev: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub tier: Option<Tier>,
}
