//! Error types for the projection ensemble

use thiserror::Error;

/// Result type alias for ensemble operations
pub type Result<T> = std::result::Result<T, EnsembleError>;

/// Errors that can occur while building blended estimates
#[derive(Error, Debug)]
pub enum EnsembleError {
    /// Every configured source failed or returned nothing for the target week
    #[error("no projection data for season {season} week {week}")]
    NoProjectionData { season: i32, week: u32 },

    /// A payload did not match the shape its adapter expects
    #[error("malformed payload from source '{source_id}': {reason}")]
    MalformedPayload { source_id: String, reason: String },

    /// A source id with no registered adapter
    #[error("no adapter registered for source '{0}'")]
    UnknownSource(String),
}

impl EnsembleError {
    /// Create a malformed-payload error
    pub fn malformed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPayload { source_id: source.into(), reason: reason.into() }
    }
}
