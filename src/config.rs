//! Application configuration
//!
//! Replaces the scattered module-level constants of the original dashboard
//! scripts with one explicit config object passed into each pipeline.
//! API keys are resolved from the environment and never persisted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Placeholder fragments that mark a key as not configured.
const KEY_PLACEHOLDERS: [&str; 2] = ["YOUR_", "_HERE"];

/// Which provider implementation serves each data domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSelection {
    /// "alpha_vantage" or "fmp"
    pub stocks: String,
    /// "odds_api" or "espn"
    pub sports: String,
    /// "newsapi" or "espn"
    pub news: String,
}

impl Default for ProviderSelection {
    fn default() -> Self {
        Self {
            stocks: "alpha_vantage".to_string(),
            sports: "odds_api".to_string(),
            news: "newsapi".to_string(),
        }
    }
}

/// API keys, one per keyed provider. ESPN needs none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    pub alpha_vantage: Option<String>,
    pub fmp: Option<String>,
    pub odds_api: Option<String>,
    pub news_api: Option<String>,
}

impl ApiKeys {
    /// Read keys from the environment.
    pub fn from_env() -> Self {
        Self {
            alpha_vantage: std::env::var("NOVAFEED_ALPHA_VANTAGE_KEY").ok(),
            fmp: std::env::var("NOVAFEED_FMP_KEY").ok(),
            odds_api: std::env::var("NOVAFEED_ODDS_API_KEY").ok(),
            news_api: std::env::var("NOVAFEED_NEWS_API_KEY").ok(),
        }
    }

    /// A key is configured if present, non-empty and not a placeholder
    /// copied verbatim from setup docs.
    pub fn is_configured(key: &Option<String>) -> bool {
        match key {
            Some(k) => !k.is_empty() && !KEY_PLACEHOLDERS.iter().any(|p| k.contains(p)),
            None => false,
        }
    }

    pub fn get(&self, provider_id: &str) -> Option<&str> {
        let key = match provider_id {
            "alpha_vantage" => &self.alpha_vantage,
            "fmp" => &self.fmp,
            "odds_api" => &self.odds_api,
            "newsapi" => &self.news_api,
            _ => return None,
        };
        if Self::is_configured(key) {
            key.as_deref()
        } else {
            None
        }
    }
}

/// A news search topic: one query string per logical request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsTopic {
    /// Short key used for cache entries, e.g. "reits".
    pub key: String,
    pub query: String,
    pub max_results: usize,
}

/// Application configuration shared by all pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub providers: ProviderSelection,
    #[serde(skip)]
    pub keys: ApiKeys,

    /// Stock symbols to track, rendered in card order.
    pub stocks: Vec<String>,
    /// REIT symbols appended after the stocks.
    pub reits: Vec<String>,
    /// Sport keys in The Odds API notation, e.g. "basketball_nba".
    pub sports: Vec<String>,
    /// News search topics fetched in order.
    pub news_topics: Vec<NewsTopic>,

    pub use_stock_data: bool,
    pub use_sports_data: bool,
    pub use_news_data: bool,

    /// Refresh intervals per domain.
    pub stock_refresh_secs: u64,
    pub sports_refresh_secs: u64,
    pub news_refresh_secs: u64,

    /// Cache TTL classes per domain.
    pub quote_ttl_secs: u64,
    pub odds_ttl_secs: u64,
    pub espn_ttl_secs: u64,
    pub news_ttl_secs: u64,

    /// Path of the SQLite cache file.
    pub cache_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            providers: ProviderSelection::default(),
            keys: ApiKeys::default(),
            stocks: ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"]
                .map(String::from)
                .to_vec(),
            reits: ["O", "VNQ", "PLD", "AMT"].map(String::from).to_vec(),
            sports: [
                "basketball_nba",
                "baseball_mlb",
                "americanfootball_nfl",
                "icehockey_nhl",
                "soccer_epl",
            ]
            .map(String::from)
            .to_vec(),
            news_topics: vec![
                NewsTopic {
                    key: "reits".to_string(),
                    query: "multi-family REIT OR real estate investment trust".to_string(),
                    max_results: 3,
                },
                NewsTopic {
                    key: "housing".to_string(),
                    query: "housing market trends OR home prices".to_string(),
                    max_results: 2,
                },
            ],
            use_stock_data: true,
            use_sports_data: true,
            use_news_data: true,
            stock_refresh_secs: 5 * 60,
            sports_refresh_secs: 2 * 60,
            news_refresh_secs: 24 * 60 * 60,
            quote_ttl_secs: 5 * 60,
            odds_ttl_secs: 2 * 60,
            espn_ttl_secs: 5 * 60,
            news_ttl_secs: 24 * 60 * 60,
            cache_path: PathBuf::from("novafeed-cache.db"),
        }
    }
}

impl AppConfig {
    /// Defaults with API keys taken from the environment.
    pub fn from_env() -> Self {
        Self {
            keys: ApiKeys::from_env(),
            ..Self::default()
        }
    }

    /// All tracked symbols in render order: stocks first, then REITs.
    pub fn tracked_symbols(&self) -> Vec<String> {
        self.stocks.iter().chain(self.reits.iter()).cloned().collect()
    }

    pub fn stock_refresh(&self) -> Duration {
        Duration::from_secs(self.stock_refresh_secs)
    }

    pub fn sports_refresh(&self) -> Duration {
        Duration::from_secs(self.sports_refresh_secs)
    }

    pub fn news_refresh(&self) -> Duration {
        Duration::from_secs(self.news_refresh_secs)
    }

    /// Validate configuration and collect warnings for enabled domains whose
    /// provider needs a key that is missing. Warnings are advisory, the
    /// affected pipeline simply falls back to cached or sample data.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.use_stock_data && self.keys.get(&self.providers.stocks).is_none() {
            warnings.push(format!(
                "Stock API key not configured for '{}'. Stock data will not load.",
                self.providers.stocks
            ));
        }
        if self.use_sports_data
            && self.providers.sports != "espn"
            && self.keys.get(&self.providers.sports).is_none()
        {
            warnings.push(format!(
                "Sports API key not configured for '{}'. Betting odds will not load.",
                self.providers.sports
            ));
        }
        if self.use_news_data
            && self.providers.news != "espn"
            && self.keys.get(&self.providers.news).is_none()
        {
            warnings.push(format!(
                "News API key not configured for '{}'. News articles will not load.",
                self.providers.news
            ));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_keys_count_as_unconfigured() {
        assert!(!ApiKeys::is_configured(&Some(
            "YOUR_ODDS_API_KEY_HERE".to_string()
        )));
        assert!(!ApiKeys::is_configured(&Some(String::new())));
        assert!(!ApiKeys::is_configured(&None));
        assert!(ApiKeys::is_configured(&Some("abc123".to_string())));
    }

    #[test]
    fn validate_warns_per_missing_key() {
        let config = AppConfig::default();
        // All keys missing, all domains enabled.
        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);

        let mut config = AppConfig::default();
        config.keys.alpha_vantage = Some("k".to_string());
        config.providers.news = "espn".to_string();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("odds_api"));
    }

    #[test]
    fn tracked_symbols_keep_card_order() {
        let config = AppConfig::default();
        let symbols = config.tracked_symbols();
        assert_eq!(symbols[0], "AAPL");
        assert_eq!(symbols[5], "O");
        assert_eq!(symbols.len(), 9);
    }
}
