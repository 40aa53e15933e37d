use ensemble_engine::EnsembleConfig;
use feed_fetcher::{
    default_registry, FeedFetcherConfig, HttpFeedClient, HttpMetadataClient, StatsVaultClient,
};
use lineup_engine::{LineupConfig, RosterRules, ScoringProfile, UserRoster};
use recompute_service::{
    MemoryNotifier, MemoryRosterStore, ProjectionProvider, RecomputeConfig, RecomputeEngine,
};
use std::sync::Arc;
use tracing::{error, info};

fn demo_roster() -> UserRoster {
    UserRoster {
        id: "demo-team".to_string(),
        players: (184..196).map(|id| id.to_string()).collect(),
        rules: RosterRules::default(),
        scoring_profile: ScoringProfile::Standard,
        flex_pins: Vec::new(),
        notify: true,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting lineup recompute demo");

    let feed_config = FeedFetcherConfig::from_env()?;

    let sources: Vec<Arc<dyn ProjectionProvider>> = feed_config
        .projections
        .iter()
        .cloned()
        .map(|endpoint| {
            HttpFeedClient::new(endpoint, feed_config.timeout_secs)
                .map(|client| Arc::new(client) as Arc<dyn ProjectionProvider>)
        })
        .collect::<anyhow::Result<_>>()?;

    let actuals = Arc::new(StatsVaultClient::new(feed_config.stats.clone(), feed_config.timeout_secs)?);
    let metadata =
        Arc::new(HttpMetadataClient::new(feed_config.metadata.clone(), feed_config.timeout_secs)?);

    let store = Arc::new(MemoryRosterStore::new());
    store.insert_roster(demo_roster()).await;
    let store: Arc<dyn recompute_service::RosterStore> = store;
    let notifier = Arc::new(MemoryNotifier::new());
    let notifier: Arc<dyn recompute_service::NotificationService> = notifier;

    let engine = RecomputeEngine::new(
        default_registry(),
        sources,
        actuals,
        metadata,
        Arc::clone(&store),
        Arc::clone(&notifier),
        EnsembleConfig::from_env()?,
        LineupConfig::from_env()?,
        RecomputeConfig::from_env()?,
    );

    match engine.run_cycle("demo-team", 2025, 5).await {
        Ok(outcome) => {
            info!(
                "Computed week {} lineup: {:.1} projected points, changed={}, notified={}",
                outcome.lineup.week,
                outcome.lineup.total_score,
                outcome.changed,
                outcome.notified
            );
            for (slot, players) in &outcome.lineup.slots {
                info!("  {}: {}", slot, players.join(", "));
            }
            info!("  bench: {}", outcome.lineup.bench.join(", "));
            Ok(())
        }
        Err(e) => {
            error!("Recompute failed: {}", e);
            Err(e.into())
        }
    }
}
