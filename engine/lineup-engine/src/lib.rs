//! Lineup assignment and change detection
//!
//! Takes blended estimates plus injury signals, administrator overrides,
//! and user pins, and produces a concrete slot-by-slot starting lineup
//! with a bench, a per-player explanation, and a content hash used to
//! decide whether anything materially changed.

pub mod assign;
pub mod config;
pub mod hashing;
pub mod models;

pub use assign::assign_lineup;
pub use config::LineupConfig;
pub use hashing::{should_notify, slot_hash};
pub use models::{
    AdminOverrides, InjuryStatus, PlayerDetail, PlayerMeta, RosterRules, ScoringProfile, SlotKind,
    UserRoster, WeeklyLineup,
};
