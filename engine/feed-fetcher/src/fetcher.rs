//! HTTP clients implementing the recompute service's provider traits
//!
//! One client per upstream endpoint. Payloads come back as opaque JSON;
//! the adapters own all format knowledge.

use crate::config::FeedEndpoint;
use crate::models::MetadataRow;
use anyhow::{Context, Result};
use lineup_engine::PlayerMeta;
use recompute_service::{ActualsProvider, PlayerMetadataProvider, ProjectionProvider};
use reqwest::Client;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::info;

/// HTTP client for one projection feed
pub struct HttpFeedClient {
    endpoint: FeedEndpoint,
    client: Client,
}

impl HttpFeedClient {
    /// Create a client for one endpoint
    pub fn new(endpoint: FeedEndpoint, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { endpoint, client })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch from '{}'", self.endpoint.source_id))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "'{}' request failed with status: {}",
                self.endpoint.source_id,
                response.status()
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON from '{}'", self.endpoint.source_id))
    }
}

#[async_trait::async_trait]
impl ProjectionProvider for HttpFeedClient {
    fn source_id(&self) -> &str {
        &self.endpoint.source_id
    }

    async fn fetch_projections(&self, season: i32, week: u32) -> Result<serde_json::Value> {
        let url = format!(
            "{}/projections/{}/{}?key={}",
            self.endpoint.base_url,
            season,
            week,
            self.endpoint.api_key()
        );
        info!("Fetching week {} projections from '{}'", week, self.endpoint.source_id);
        let raw = self.get_json(&url).await?;
        Ok(raw)
    }
}

/// HTTP client for the realized-outcomes endpoint
pub struct StatsVaultClient {
    endpoint: FeedEndpoint,
    client: Client,
}

impl StatsVaultClient {
    /// Create a client for the stats endpoint
    pub fn new(endpoint: FeedEndpoint, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait::async_trait]
impl ActualsProvider for StatsVaultClient {
    fn source_id(&self) -> &str {
        &self.endpoint.source_id
    }

    async fn fetch_actuals(
        &self,
        season: i32,
        weeks: RangeInclusive<u32>,
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}/stats/{}?from={}&to={}&key={}",
            self.endpoint.base_url,
            season,
            weeks.start(),
            weeks.end(),
            self.endpoint.api_key()
        );
        info!(
            "Fetching actuals for weeks {}..={} from '{}'",
            weeks.start(),
            weeks.end(),
            self.endpoint.source_id
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch actuals")?;
        if !response.status().is_success() {
            anyhow::bail!("Actuals request failed with status: {}", response.status());
        }
        response.json().await.context("Failed to parse actuals JSON")
    }
}

/// HTTP client for the player metadata endpoint
pub struct HttpMetadataClient {
    endpoint: FeedEndpoint,
    client: Client,
}

impl HttpMetadataClient {
    /// Create a client for the metadata endpoint
    pub fn new(endpoint: FeedEndpoint, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait::async_trait]
impl PlayerMetadataProvider for HttpMetadataClient {
    async fn lookup(&self, player_ids: &[String]) -> Result<HashMap<String, PlayerMeta>> {
        let url = format!(
            "{}/players?ids={}&key={}",
            self.endpoint.base_url,
            player_ids.join(","),
            self.endpoint.api_key()
        );
        info!("Looking up metadata for {} players", player_ids.len());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch player metadata")?;
        if !response.status().is_success() {
            anyhow::bail!("Metadata request failed with status: {}", response.status());
        }

        let rows: Vec<MetadataRow> =
            response.json().await.context("Failed to parse player metadata JSON")?;
        Ok(crate::adapters::metadata_from_rows(rows))
    }
}
