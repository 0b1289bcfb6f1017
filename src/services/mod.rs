//! Data pipelines
//!
//! One service per data domain, each running the same refresh cycle:
//! consult the cache, fetch what is stale, normalize, cache the result and
//! hand the records to the renderer. A failure for one item never aborts
//! the remaining items in the same run.
//!
//! The pipelines share one render surface but load independently: the
//! surface mutex is taken only for the render itself, never across a
//! network await, so a slow fetch in one domain cannot stall the others.

pub mod news_service;
pub mod quotes_service;
pub mod sports_service;

pub use news_service::NewsService;
pub use quotes_service::QuotesService;
pub use sports_service::SportsService;

use crate::render::{dashboard, Surface};
use crate::state::AppState;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::error;

/// Run the stocks pipeline once: fetch, then render. The manual
/// refresh-now entry point for the stocks domain.
pub async fn refresh_stocks<S: Surface>(state: &AppState, surface: &Mutex<S>) {
    match QuotesService::load_all(state).await {
        Ok(quotes) => dashboard::render_quotes(&mut *surface.lock().await, &quotes),
        Err(e) => error!("Stock pipeline failed: {}", e),
    }
}

/// Run the sports pipeline once: odds plus headlines, then render.
pub async fn refresh_sports<S: Surface>(state: &AppState, surface: &Mutex<S>) {
    match SportsService::load_all(state).await {
        Ok(load) => {
            let mut surface = surface.lock().await;
            dashboard::render_games(&mut *surface, &load.games);
            dashboard::render_articles(&mut *surface, &load.headlines, Utc::now());
        }
        Err(e) => error!("Sports pipeline failed: {}", e),
    }
}

/// Run the news pipeline once: topic search, dedup, then render.
pub async fn refresh_news<S: Surface>(state: &AppState, surface: &Mutex<S>) {
    match NewsService::load_all(state).await {
        Ok(articles) => {
            dashboard::render_articles(&mut *surface.lock().await, &articles, Utc::now())
        }
        Err(e) => error!("News pipeline failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::Result;
    use crate::providers::types::Quote;
    use crate::providers::{ProviderRegistry, QuoteProvider};
    use crate::render::MemorySurface;
    use async_trait::async_trait;
    use reqwest::Client;
    use std::sync::Arc;
    use std::time::Duration;

    /// Provider whose every fetch spends simulated network time.
    struct SlowProvider;

    #[async_trait]
    impl QuoteProvider for SlowProvider {
        fn id(&self) -> &'static str {
            "slow"
        }

        fn name(&self) -> &'static str {
            "Slow"
        }

        fn requires_key(&self) -> bool {
            false
        }

        fn inter_request_delay(&self) -> Duration {
            Duration::from_secs(12)
        }

        async fn fetch_quote(
            &self,
            _client: &Client,
            _api_key: Option<&str>,
            symbol: &str,
        ) -> Result<Quote> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Quote {
                symbol: symbol.to_string(),
                display_name: format!("{} Inc", symbol),
                price: 100.0,
                ..Quote::default()
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn surface_stays_unlocked_while_quotes_load() {
        let mut registry = ProviderRegistry::new();
        registry.register_quote("slow", Arc::new(SlowProvider));

        let mut config = AppConfig::default();
        config.providers.stocks = "slow".to_string();
        config.stocks = vec!["AAPL".to_string(), "MSFT".to_string()];
        config.reits = Vec::new();

        let state = Arc::new(AppState::ephemeral(config, registry));
        let surface = Arc::new(Mutex::new(MemorySurface::new()));

        let run = {
            let state = state.clone();
            let surface = surface.clone();
            tokio::spawn(async move { refresh_stocks(&state, &surface).await })
        };

        // Mid-run, while the first fetch is still on the wire, the surface
        // must be available to the other pipelines.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!run.is_finished());
        assert!(surface.try_lock().is_ok());

        run.await.unwrap();
        assert!(!surface.lock().await.texts.is_empty());
    }
}
