//! News Service
//!
//! Fetches each configured topic query in order, combines the results,
//! removes duplicates by title plus source and keeps the top five for the
//! featured/sidebar/headlines layout.

use crate::cache::prefix;
use crate::error::Result;
use crate::format::dedup_articles;
use crate::providers::types::Article;
use crate::state::AppState;
use std::time::Duration;
use tracing::{info, warn};

/// Articles kept after combining all topics.
const MAX_ARTICLES: usize = 5;
/// Pause between consecutive topic fetches.
const INTER_TOPIC_DELAY: Duration = Duration::from_millis(500);

/// News pipeline logic
pub struct NewsService;

impl NewsService {
    /// Load all configured topics. A failed topic is logged and skipped;
    /// the combined list is deduplicated with order preserved.
    pub async fn load_all(state: &AppState) -> Result<Vec<Article>> {
        let provider = state.providers.news_provider(&state.config.providers.news)?;
        let api_key = state.config.keys.get(provider.id());

        if provider.requires_key() && api_key.is_none() {
            warn!("{} key not configured, skipping news", provider.name());
            return Ok(Vec::new());
        }

        info!(
            "NewsService::load_all - {} topics via {}",
            state.config.news_topics.len(),
            provider.name()
        );
        let ttl = Duration::from_secs(state.config.news_ttl_secs);

        let mut combined = Vec::new();
        let mut fetched_live = false;
        for topic in &state.config.news_topics {
            let cache_key = format!("{}{}", prefix::NEWS, topic.key);
            if let Some(articles) = state.cache.get::<Vec<Article>>(&cache_key, ttl) {
                combined.extend(articles);
                continue;
            }

            if fetched_live {
                tokio::time::sleep(INTER_TOPIC_DELAY).await;
            }
            fetched_live = true;

            match provider
                .fetch_articles(&state.client, api_key, &topic.query, topic.max_results)
                .await
            {
                Ok(articles) => {
                    state.cache.set(&cache_key, &articles);
                    combined.extend(articles);
                }
                Err(e) => {
                    warn!("Failed to load news topic '{}': {}", topic.key, e);
                }
            }
        }

        let mut articles = dedup_articles(combined);
        articles.truncate(MAX_ARTICLES);
        info!("Loaded {} news articles", articles.len());
        Ok(articles)
    }

    /// Direct single-query search, uncached and independent of the
    /// configured topics.
    pub async fn search(state: &AppState, query: &str, max_results: usize) -> Result<Vec<Article>> {
        let provider = state.providers.news_provider(&state.config.providers.news)?;
        let api_key = state.config.keys.get(provider.id());
        provider
            .fetch_articles(&state.client, api_key, query, max_results)
            .await
    }

    /// Drop every cached news topic.
    pub fn clear_cache(state: &AppState) {
        state.cache.clear_prefix(prefix::NEWS);
        info!("News cache cleared");
    }
}
