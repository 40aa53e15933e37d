//! Raw wire models for each upstream feed
//!
//! These structs mirror the feeds byte for byte; nothing outside this
//! crate ever sees them. All fields the adapters do not need are simply
//! omitted, and serde ignores them.

use serde::{Deserialize, Serialize};

/// SharpStats: a flat PascalCase array
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SharpStatsRow {
    #[serde(rename = "PlayerID")]
    pub player_id: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Position")]
    pub position: String,

    #[serde(rename = "Week")]
    pub week: Option<u32>,

    #[serde(rename = "FantasyPoints")]
    pub fantasy_points: Option<f64>,

    #[serde(rename = "Updated")]
    pub updated: Option<String>,
}

/// GridironIQ: an envelope with snake_case rows and string-typed points
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GridironIqEnvelope {
    pub data: Vec<GridironIqRow>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GridironIqRow {
    pub player_id: String,
    pub pos: String,
    pub week: Option<u32>,
    /// Points arrive as a decimal string, e.g. "18.7"
    pub projected_pts: Option<String>,
}

/// FanForecast: player identity and projection nested separately
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FanForecastEnvelope {
    pub players: Vec<FanForecastRow>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FanForecastRow {
    pub player: FanForecastPlayer,
    pub projection: FanForecastProjection,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FanForecastPlayer {
    pub id: String,
    pub position: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FanForecastProjection {
    pub points: Option<f64>,
    pub week: Option<u32>,
}

/// StatsVault: realized outcomes for completed weeks
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StatsVaultEnvelope {
    pub stats: Vec<StatsVaultRow>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StatsVaultRow {
    pub player_id: String,
    pub pos: String,
    pub week: u32,
    pub points: f64,
}

/// Player metadata service row
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MetadataRow {
    pub player_id: String,
    pub position: String,
    pub team: Option<String>,
    pub injury_status: Option<String>,
}
