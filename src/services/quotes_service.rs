//! Quotes Service
//!
//! Loads tracked stock and REIT quotes through the configured provider,
//! one symbol per logical request, with a provider-specific delay between
//! live fetches to stay under free-tier rate limits.

use crate::cache::prefix;
use crate::error::{Error, Result};
use crate::providers::types::Quote;
use crate::state::AppState;
use std::time::Duration;
use tracing::{info, warn};

/// Quotes pipeline logic
pub struct QuotesService;

impl QuotesService {
    /// Load every tracked symbol in card order. A failed symbol is logged
    /// and skipped; the rest of the run continues.
    pub async fn load_all(state: &AppState) -> Result<Vec<Quote>> {
        let provider = state
            .providers
            .quote_provider(&state.config.providers.stocks)?;
        let symbols = state.config.tracked_symbols();
        info!(
            "QuotesService::load_all - {} symbols via {}",
            symbols.len(),
            provider.name()
        );

        let ttl = Duration::from_secs(state.config.quote_ttl_secs);
        let mut quotes = Vec::with_capacity(symbols.len());
        let mut fetched_live = false;

        for symbol in &symbols {
            let cache_key = format!("{}{}", prefix::QUOTE, symbol);
            if let Some(quote) = state.cache.get::<Quote>(&cache_key, ttl) {
                quotes.push(quote);
                continue;
            }

            // Space out live calls; cached symbols cost nothing.
            if fetched_live {
                tokio::time::sleep(provider.inter_request_delay()).await;
            }
            fetched_live = true;

            let api_key = state.config.keys.get(provider.id());
            match provider.fetch_quote(&state.client, api_key, symbol).await {
                Ok(quote) => {
                    state.cache.set(&cache_key, &quote);
                    quotes.push(quote);
                }
                Err(e) => {
                    warn!("Failed to load {}: {}", symbol, e);
                }
            }
        }

        info!("Loaded {}/{} quotes", quotes.len(), symbols.len());
        Ok(quotes)
    }

    /// Direct single-symbol fetch, independent of the tracked list.
    pub async fn load_one(state: &AppState, symbol: &str) -> Result<Quote> {
        let provider = state
            .providers
            .quote_provider(&state.config.providers.stocks)?;
        let ttl = Duration::from_secs(state.config.quote_ttl_secs);
        let cache_key = format!("{}{}", prefix::QUOTE, symbol);

        if let Some(quote) = state.cache.get::<Quote>(&cache_key, ttl) {
            return Ok(quote);
        }

        let api_key = state.config.keys.get(provider.id());
        let quote = provider.fetch_quote(&state.client, api_key, symbol).await?;
        state.cache.set(&cache_key, &quote);
        Ok(quote)
    }

    /// Drop every cached quote; the next run refetches everything.
    pub fn clear_cache(state: &AppState) {
        state.cache.clear_prefix(prefix::QUOTE);
        info!("Quote cache cleared");
    }

    /// Look up a loaded quote by symbol.
    pub fn find<'a>(quotes: &'a [Quote], symbol: &str) -> Result<&'a Quote> {
        quotes
            .iter()
            .find(|q| q.symbol == symbol)
            .ok_or_else(|| Error::NotFound(format!("Quote not found for {}", symbol)))
    }
}
