//! Projection ensemble
//!
//! Turns heterogeneous upstream projection feeds into a single trusted
//! estimate per player: normalization into a common row shape, per-source
//! error statistics over a historical window, accuracy-and-redundancy
//! aware blending weights, a blended mean with a confidence interval, and
//! an ordinal quality tier.

pub mod blend;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod residuals;
pub mod tiers;
pub mod weights;

pub use blend::blend_week;
pub use config::{BlendParameters, EnsembleConfig, TierCuts, WeightingParameters};
pub use error::{EnsembleError, Result};
pub use models::{
    ActualRow, BlendedEstimate, PerSourcePerformance, PerSourceWeight, Position, ProjectionRow,
    Residual, Tier,
};
pub use normalize::{parse_position, AdapterRegistry, SourceAdapter};
pub use residuals::{aggregate_performance, compute_residuals};
pub use tiers::assign_tiers;
pub use weights::compute_weights;
