//! Application state

use crate::cache::TimedCache;
use crate::config::AppConfig;
use crate::error::Result;
use crate::providers::ProviderRegistry;
use reqwest::Client;
use std::sync::Arc;

/// State shared by all pipelines: configuration, one HTTP client, the
/// persistent cache and the provider registry.
pub struct AppState {
    pub config: AppConfig,
    pub client: Client,
    pub cache: Arc<TimedCache>,
    pub providers: Arc<ProviderRegistry>,
}

impl AppState {
    /// Build state from configuration, opening the cache at its configured
    /// path.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        let cache = Arc::new(TimedCache::open(&config.cache_path));
        tracing::info!("Cache database: {:?}", config.cache_path);

        Ok(Self {
            config,
            client,
            cache,
            providers: Arc::new(ProviderRegistry::new()),
        })
    }

    /// State with an in-memory cache, for tests.
    #[cfg(test)]
    pub fn ephemeral(config: AppConfig, providers: ProviderRegistry) -> Self {
        Self {
            config,
            client: Client::new(),
            cache: Arc::new(TimedCache::in_memory()),
            providers: Arc::new(providers),
        }
    }
}
