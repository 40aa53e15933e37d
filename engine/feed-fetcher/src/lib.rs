//! Upstream feed integrations
//!
//! Everything that knows a wire format lives here: the raw serde models
//! for each projection feed, the adapters that normalize them, and the
//! reqwest clients implementing the recompute service's provider traits.

pub mod adapters;
pub mod config;
pub mod fetcher;
pub mod models;

pub use adapters::{
    default_registry, metadata_from_rows, FanForecastAdapter, GridironIqAdapter,
    SharpStatsAdapter, StatsVaultAdapter, FANFORECAST, GRIDIRON_IQ, SHARPSTATS, STATSVAULT,
};
pub use config::{FeedEndpoint, FeedFetcherConfig};
pub use fetcher::{HttpFeedClient, HttpMetadataClient, StatsVaultClient};
