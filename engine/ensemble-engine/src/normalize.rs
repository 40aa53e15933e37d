//! Source normalization
//!
//! Every upstream feed has its own ad hoc shape. Format knowledge lives
//! here and nowhere else: one `SourceAdapter` per feed turns a raw payload
//! into common `ProjectionRow`s, and the registry runs each adapter in
//! isolation so one broken feed never takes down the others.

use crate::error::Result;
use crate::models::{Position, ProjectionRow};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Adapter from one upstream feed shape to normalized projection rows
pub trait SourceAdapter: Send + Sync {
    /// Stable id of the source this adapter understands
    fn source_id(&self) -> &str;

    /// Normalize a raw payload into projection rows for the given week
    ///
    /// Rows with unmappable positions or missing required fields are
    /// dropped, not errored; an `Err` means the payload as a whole was
    /// unusable.
    fn normalize(&self, raw: &serde_json::Value, season: i32, week: u32)
        -> Result<Vec<ProjectionRow>>;
}

/// Map an upstream position string to a known position
///
/// Upstream feeds disagree on defense and kicker spellings; this is the
/// fixed alias table. Unknown strings return `None` and the caller drops
/// the row.
pub fn parse_position(raw: &str) -> Option<Position> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "QB" => Some(Position::QB),
        "RB" | "HB" | "FB" => Some(Position::RB),
        "WR" => Some(Position::WR),
        "TE" => Some(Position::TE),
        "K" | "PK" => Some(Position::K),
        "DST" | "D/ST" | "DEF" | "D" => Some(Position::DST),
        _ => None,
    }
}

/// Registry of source adapters keyed by source id
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Box<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { adapters: HashMap::new() }
    }

    /// Register an adapter; replaces any previous adapter for the same id
    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        self.adapters.insert(adapter.source_id().to_string(), adapter);
    }

    /// Look up the adapter for a source id
    pub fn get(&self, source_id: &str) -> Option<&dyn SourceAdapter> {
        self.adapters.get(source_id).map(|a| a.as_ref())
    }

    /// Registered source ids, in no particular order
    pub fn source_ids(&self) -> Vec<&str> {
        self.adapters.keys().map(|s| s.as_str()).collect()
    }

    /// Normalize one source's payload, absorbing failures into an empty set
    pub fn normalize_source(
        &self,
        source_id: &str,
        raw: &serde_json::Value,
        season: i32,
        week: u32,
    ) -> Vec<ProjectionRow> {
        let Some(adapter) = self.get(source_id) else {
            warn!("No adapter registered for source '{}', dropping payload", source_id);
            return Vec::new();
        };

        match adapter.normalize(raw, season, week) {
            Ok(rows) => {
                debug!("Normalized {} rows from source '{}'", rows.len(), source_id);
                rows
            }
            Err(e) => {
                warn!("Failed to normalize source '{}', treating as empty: {}", source_id, e);
                Vec::new()
            }
        }
    }

    /// Normalize every source's payload independently
    ///
    /// Sources are fail-open: a malformed payload contributes zero rows and
    /// the rest are unaffected.
    pub fn normalize_all(
        &self,
        raw_by_source: &HashMap<String, serde_json::Value>,
        season: i32,
        week: u32,
    ) -> Vec<ProjectionRow> {
        let mut rows = Vec::new();
        for (source_id, raw) in raw_by_source {
            rows.extend(self.normalize_source(source_id, raw, season, week));
        }
        rows
    }
}
