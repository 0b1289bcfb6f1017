//! Provider adapters module
//!
//! Each data domain has one capability trait and two interchangeable
//! implementations. Pipelines pick one by configured id; variants are never
//! composed in a single call path.

pub mod types;

pub mod alpha_vantage;
pub mod espn;
pub mod fmp;
pub mod newsapi;
pub mod odds_api;

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use types::{Article, Game, Quote};

/// Check response status before touching the body.
pub(crate) fn ensure_success(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::RequestFailed {
            status: status.as_u16(),
        })
    }
}

/// Stock quote provider
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider id (e.g. "alpha_vantage", "fmp")
    fn id(&self) -> &'static str;

    /// Provider display name
    fn name(&self) -> &'static str;

    /// Whether the provider needs an API key
    fn requires_key(&self) -> bool;

    /// Delay to insert between consecutive live fetches, to stay under the
    /// provider's free-tier rate limit.
    fn inter_request_delay(&self) -> Duration;

    /// Fetch one symbol's quote and fundamentals
    async fn fetch_quote(&self, client: &Client, api_key: Option<&str>, symbol: &str)
        -> Result<Quote>;
}

/// Betting odds / scores provider
#[async_trait]
pub trait SportsProvider: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn requires_key(&self) -> bool;

    /// Fetch upcoming games with whatever lines the provider carries
    async fn fetch_games(
        &self,
        client: &Client,
        api_key: Option<&str>,
        sport_key: &str,
    ) -> Result<Vec<Game>>;
}

/// News article provider
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn requires_key(&self) -> bool;

    /// Fetch articles for one query/topic
    async fn fetch_articles(
        &self,
        client: &Client,
        api_key: Option<&str>,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Article>>;
}

/// Registry of all supported providers, looked up by configured id.
pub struct ProviderRegistry {
    quotes: HashMap<String, Arc<dyn QuoteProvider>>,
    sports: HashMap<String, Arc<dyn SportsProvider>>,
    news: HashMap<String, Arc<dyn NewsProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        let mut quotes: HashMap<String, Arc<dyn QuoteProvider>> = HashMap::new();
        quotes.insert(
            "alpha_vantage".to_string(),
            Arc::new(alpha_vantage::AlphaVantage::new()),
        );
        quotes.insert("fmp".to_string(), Arc::new(fmp::FinancialModelingPrep::new()));

        let mut sports: HashMap<String, Arc<dyn SportsProvider>> = HashMap::new();
        sports.insert("odds_api".to_string(), Arc::new(odds_api::OddsApi::new()));
        sports.insert("espn".to_string(), Arc::new(espn::Espn::new()));

        let mut news: HashMap<String, Arc<dyn NewsProvider>> = HashMap::new();
        news.insert("newsapi".to_string(), Arc::new(newsapi::NewsApi::new()));
        news.insert("espn".to_string(), Arc::new(espn::Espn::new()));

        Self {
            quotes,
            sports,
            news,
        }
    }

    /// Register or replace a quote provider under an id.
    pub fn register_quote(&mut self, id: &str, provider: Arc<dyn QuoteProvider>) {
        self.quotes.insert(id.to_string(), provider);
    }

    /// Register or replace a sports provider under an id.
    pub fn register_sports(&mut self, id: &str, provider: Arc<dyn SportsProvider>) {
        self.sports.insert(id.to_string(), provider);
    }

    /// Register or replace a news provider under an id.
    pub fn register_news(&mut self, id: &str, provider: Arc<dyn NewsProvider>) {
        self.news.insert(id.to_string(), provider);
    }

    pub fn quote_provider(&self, id: &str) -> Result<Arc<dyn QuoteProvider>> {
        self.quotes
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Config(format!("Unknown quote provider '{}'", id)))
    }

    pub fn sports_provider(&self, id: &str) -> Result<Arc<dyn SportsProvider>> {
        self.sports
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Config(format!("Unknown sports provider '{}'", id)))
    }

    pub fn news_provider(&self, id: &str) -> Result<Arc<dyn NewsProvider>> {
        self.news
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Config(format!("Unknown news provider '{}'", id)))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
