//! Sports Service
//!
//! Loads betting odds per tracked sport plus ESPN headlines for the sports
//! page. When the odds provider is unconfigured or every sport fails, the
//! pipeline falls back to static sample games so the cards never go blank.

use crate::cache::prefix;
use crate::error::Result;
use crate::providers::types::{Article, Game, Moneyline, SpreadLine, TotalLine};
use crate::state::AppState;
use std::time::Duration;
use tracing::{info, warn};

/// Games shown per sport.
const GAMES_PER_SPORT: usize = 3;
/// ESPN headlines fetched for the sports page.
const HEADLINE_COUNT: usize = 5;
/// Pause between consecutive sport fetches.
const INTER_SPORT_DELAY: Duration = Duration::from_secs(1);

/// One sports refresh cycle's worth of data.
#[derive(Debug, Default)]
pub struct SportsLoad {
    pub games: Vec<Game>,
    pub headlines: Vec<Article>,
    /// True when the games are the static fallback, not live data.
    pub sample_data: bool,
}

/// Sports pipeline logic
pub struct SportsService;

impl SportsService {
    /// Load odds for every tracked sport and the ESPN headline feed. A
    /// failure in one sport, or in the headline fetch, leaves the rest of
    /// the run intact.
    pub async fn load_all(state: &AppState) -> Result<SportsLoad> {
        let mut load = SportsLoad {
            headlines: Self::load_headlines(state).await,
            ..SportsLoad::default()
        };

        let provider = state
            .providers
            .sports_provider(&state.config.providers.sports)?;
        let api_key = state.config.keys.get(provider.id());

        if provider.requires_key() && api_key.is_none() {
            warn!(
                "{} key not configured, using sample games",
                provider.name()
            );
            load.games = sample_games();
            load.sample_data = true;
            return Ok(load);
        }

        info!(
            "SportsService::load_all - {} sports via {}",
            state.config.sports.len(),
            provider.name()
        );
        let ttl = Duration::from_secs(state.config.odds_ttl_secs);

        let mut fetched_live = false;
        for sport_key in &state.config.sports {
            let cache_key = format!("{}{}", prefix::ODDS, sport_key);
            if let Some(mut games) = state.cache.get::<Vec<Game>>(&cache_key, ttl) {
                games.truncate(GAMES_PER_SPORT);
                load.games.extend(games);
                continue;
            }

            if fetched_live {
                tokio::time::sleep(INTER_SPORT_DELAY).await;
            }
            fetched_live = true;

            match provider.fetch_games(&state.client, api_key, sport_key).await {
                Ok(games) => {
                    state.cache.set(&cache_key, &games);
                    load.games
                        .extend(games.into_iter().take(GAMES_PER_SPORT));
                }
                Err(e) => {
                    warn!("Failed to load games for {}: {}", sport_key, e);
                }
            }
        }

        if load.games.is_empty() {
            warn!("No live games available, using sample games");
            load.games = sample_games();
            load.sample_data = true;
        }

        Ok(load)
    }

    /// Direct single-sport fetch, bypassing the tracked list but not the
    /// cache.
    pub async fn load_sport(state: &AppState, sport_key: &str) -> Result<Vec<Game>> {
        let provider = state
            .providers
            .sports_provider(&state.config.providers.sports)?;
        let ttl = Duration::from_secs(state.config.odds_ttl_secs);
        let cache_key = format!("{}{}", prefix::ODDS, sport_key);

        if let Some(games) = state.cache.get::<Vec<Game>>(&cache_key, ttl) {
            return Ok(games);
        }

        let api_key = state.config.keys.get(provider.id());
        let games = provider.fetch_games(&state.client, api_key, sport_key).await?;
        state.cache.set(&cache_key, &games);
        Ok(games)
    }

    /// ESPN headlines, cached separately from the odds. Failures here only
    /// cost the headline section.
    async fn load_headlines(state: &AppState) -> Vec<Article> {
        let provider = match state.providers.news_provider("espn") {
            Ok(provider) => provider,
            Err(e) => {
                warn!("ESPN provider unavailable: {}", e);
                return Vec::new();
            }
        };

        let ttl = Duration::from_secs(state.config.espn_ttl_secs);
        let cache_key = format!("{}news_nba", prefix::ESPN);
        if let Some(articles) = state.cache.get::<Vec<Article>>(&cache_key, ttl) {
            return articles;
        }

        match provider
            .fetch_articles(&state.client, None, "nba", HEADLINE_COUNT)
            .await
        {
            Ok(articles) => {
                state.cache.set(&cache_key, &articles);
                articles
            }
            Err(e) => {
                warn!("Failed to load ESPN headlines: {}", e);
                Vec::new()
            }
        }
    }

    /// Drop cached odds, scores and ESPN entries; quote and news caches
    /// are untouched.
    pub fn clear_cache(state: &AppState) {
        state.cache.clear_prefix(prefix::ODDS);
        state.cache.clear_prefix(prefix::SCORES);
        state.cache.clear_prefix(prefix::ESPN);
        info!("Sports cache cleared");
    }
}

/// Static fallback shown while no odds provider is reachable.
pub fn sample_games() -> Vec<Game> {
    vec![
        Game {
            sport: "NBA".to_string(),
            home_team: "Boston Celtics".to_string(),
            away_team: "Dallas Mavericks".to_string(),
            start_time: None,
            venue: Some("TD Garden".to_string()),
            spread: Some(SpreadLine {
                team: "Boston Celtics".to_string(),
                points: -5.5,
                odds: Some(-110),
            }),
            total: Some(TotalLine {
                points: 213.5,
                over_odds: Some(-108),
                under_odds: Some(-112),
            }),
            moneyline: Moneyline {
                home: Some(-195),
                away: Some(162),
            },
        },
        Game {
            sport: "MLB".to_string(),
            home_team: "New York Yankees".to_string(),
            away_team: "Boston Red Sox".to_string(),
            start_time: None,
            venue: Some("Yankee Stadium".to_string()),
            spread: Some(SpreadLine {
                team: "New York Yankees".to_string(),
                points: -1.5,
                odds: Some(130),
            }),
            total: Some(TotalLine {
                points: 8.5,
                over_odds: Some(-115),
                under_odds: Some(-105),
            }),
            moneyline: Moneyline {
                home: Some(-160),
                away: Some(140),
            },
        },
    ]
}
