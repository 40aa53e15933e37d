//! Weekly lineup recompute service
//!
//! Wires the projection ensemble and the lineup engine into the
//! "recompute and notify only on material change" contract: snapshot all
//! inputs, fetch every source concurrently with fail-open isolation,
//! blend, assign, persist, and fire the notifier only when the starting
//! slots actually changed.

pub mod config;
pub mod cycle;
pub mod error;
pub mod memory;
pub mod models;
pub mod providers;

pub use config::RecomputeConfig;
pub use cycle::RecomputeEngine;
pub use error::{RecomputeError, Result};
pub use memory::{MemoryNotifier, MemoryRosterStore};
pub use models::{LineupSummary, RecomputeEvent, RecomputeOutcome, SlotLine};
pub use providers::{
    ActualsProvider, NotificationService, PlayerMetadataProvider, ProjectionProvider, RosterStore,
};
