//! Error types for the recompute cycle

use thiserror::Error;

/// Result type alias for recompute operations
pub type Result<T> = std::result::Result<T, RecomputeError>;

/// Errors that end a recompute cycle
///
/// Per-source failures are absorbed upstream and never appear here; only
/// cross-cutting unavailability surfaces to the caller.
#[derive(Error, Debug)]
pub enum RecomputeError {
    /// Every configured source failed or returned nothing for the target week
    #[error("no projection data for season {season} week {week}: all {sources} configured sources failed or returned nothing")]
    NoProjectionData { season: i32, week: u32, sources: usize },

    /// The requested roster does not exist
    #[error("roster '{0}' not found")]
    RosterNotFound(String),

    /// The roster store could not be reached
    #[error("roster store unavailable: {0}")]
    StoreUnavailable(String),

    /// Player metadata could not be fetched, so slot eligibility is unknown
    #[error("player metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// Generic error with context
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
