use serde::{Deserialize, Serialize};

/// One upstream endpoint: where to fetch and which env var holds its key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEndpoint {
    /// Source id, matching the registered adapter
    pub source_id: String,

    /// Base URL of the feed API
    pub base_url: String,

    /// Environment variable the API key is read from
    pub api_key_env: String,
}

/// Configuration for the feed fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedFetcherConfig {
    /// Projection feed endpoints
    pub projections: Vec<FeedEndpoint>,

    /// Realized-outcomes endpoint
    pub stats: FeedEndpoint,

    /// Player metadata endpoint
    pub metadata: FeedEndpoint,

    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FeedFetcherConfig {
    fn default() -> Self {
        Self {
            projections: vec![
                FeedEndpoint {
                    source_id: "sharpstats".to_string(),
                    base_url: "https://api.sharpstats.io/v2/nfl".to_string(),
                    api_key_env: "SHARPSTATS_API_KEY".to_string(),
                },
                FeedEndpoint {
                    source_id: "gridiron_iq".to_string(),
                    base_url: "https://data.gridironiq.com/api".to_string(),
                    api_key_env: "GRIDIRON_IQ_API_KEY".to_string(),
                },
                FeedEndpoint {
                    source_id: "fanforecast".to_string(),
                    base_url: "https://fanforecast.net/v1".to_string(),
                    api_key_env: "FANFORECAST_API_KEY".to_string(),
                },
            ],
            stats: FeedEndpoint {
                source_id: "statsvault".to_string(),
                base_url: "https://api.statsvault.com/nfl".to_string(),
                api_key_env: "STATSVAULT_API_KEY".to_string(),
            },
            metadata: FeedEndpoint {
                source_id: "statsvault".to_string(),
                base_url: "https://api.statsvault.com/nfl".to_string(),
                api_key_env: "STATSVAULT_API_KEY".to_string(),
            },
            timeout_secs: 30,
        }
    }
}

impl FeedFetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("FEED_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().unwrap_or(30);
        }

        for endpoint in &mut config.projections {
            let url_var = format!("{}_BASE_URL", endpoint.source_id.to_uppercase());
            if let Ok(url) = std::env::var(&url_var) {
                endpoint.base_url = url;
            }
        }

        Ok(config)
    }
}

impl FeedEndpoint {
    /// Resolve the API key, empty when the env var is unset
    pub fn api_key(&self) -> String {
        std::env::var(&self.api_key_env).unwrap_or_default()
    }
}
