//! ESPN provider (unauthenticated)
//!
//! ESPN's site API needs no key and serves two capabilities here: sports
//! headlines, and scoreboard games used as the odds-free sports fallback.
//! Sport keys arrive in Odds-API notation and are mapped to ESPN paths.

use crate::error::{Error, Result};
use crate::providers::types::{Article, Game, Moneyline};
use crate::providers::{ensure_success, NewsProvider, SportsProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports";

/// ESPN adapter
pub struct Espn;

impl Espn {
    pub fn new() -> Self {
        Self
    }

    /// Translate a sport key ("basketball_nba", or a short alias like
    /// "nba") into an ESPN league path.
    fn league_path(sport_key: &str) -> &'static str {
        match sport_key {
            "basketball_nba" | "nba" => "basketball/nba",
            "americanfootball_nfl" | "nfl" => "football/nfl",
            "baseball_mlb" | "mlb" => "baseball/mlb",
            "icehockey_nhl" | "nhl" => "hockey/nhl",
            "soccer_epl" | "soccer" => "soccer/eng.1",
            _ => "basketball/nba",
        }
    }
}

impl Default for Espn {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Default, Deserialize)]
struct RawArticle {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    links: Option<RawLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLinks {
    #[serde(default)]
    web: Option<RawWebLink>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWebLink {
    #[serde(default)]
    href: Option<String>,
}

fn parse_time(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn normalize_article(raw: &RawArticle) -> Article {
    Article {
        title: if raw.headline.is_empty() {
            "N/A".to_string()
        } else {
            raw.headline.clone()
        },
        description: raw.description.clone().unwrap_or_default(),
        source_name: "ESPN".to_string(),
        published_at: parse_time(raw.published.as_deref()),
        url: raw
            .links
            .as_ref()
            .and_then(|l| l.web.as_ref())
            .and_then(|w| w.href.clone()),
    }
}

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvent {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    competitions: Vec<RawCompetition>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCompetition {
    #[serde(default)]
    venue: Option<RawVenue>,
    #[serde(default)]
    competitors: Vec<RawCompetitor>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVenue {
    #[serde(rename = "fullName", default)]
    full_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCompetitor {
    #[serde(rename = "homeAway", default)]
    home_away: String,
    #[serde(default)]
    team: Option<RawTeam>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTeam {
    #[serde(rename = "displayName", default)]
    display_name: String,
}

/// ESPN scoreboard games carry no betting lines; spread, total and
/// moneyline stay unset and render as N/A. Pure.
fn normalize_event(sport: &str, raw: &RawEvent) -> Game {
    let competition = raw.competitions.first();
    let team_named = |side: &str| -> String {
        competition
            .map(|c| c.competitors.as_slice())
            .unwrap_or(&[])
            .iter()
            .find(|c| c.home_away == side)
            .and_then(|c| c.team.as_ref())
            .map(|t| t.display_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "TBD".to_string())
    };

    Game {
        sport: sport.to_string(),
        home_team: team_named("home"),
        away_team: team_named("away"),
        start_time: parse_time(raw.date.as_deref()),
        venue: competition
            .and_then(|c| c.venue.as_ref())
            .and_then(|v| v.full_name.clone()),
        spread: None,
        total: None,
        moneyline: Moneyline::default(),
    }
}

#[async_trait]
impl NewsProvider for Espn {
    fn id(&self) -> &'static str {
        "espn"
    }

    fn name(&self) -> &'static str {
        "ESPN"
    }

    fn requires_key(&self) -> bool {
        false
    }

    async fn fetch_articles(
        &self,
        client: &Client,
        _api_key: Option<&str>,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Article>> {
        let path = Self::league_path(query);
        debug!("Fetching ESPN news for {}", path);
        let response = client
            .get(format!("{}/{}/news", BASE_URL, path))
            .send()
            .await?;
        ensure_success(&response)?;
        let payload: NewsResponse = response.json().await?;

        Ok(payload
            .articles
            .iter()
            .take(max_results)
            .map(normalize_article)
            .collect())
    }
}

#[async_trait]
impl SportsProvider for Espn {
    fn id(&self) -> &'static str {
        "espn"
    }

    fn name(&self) -> &'static str {
        "ESPN"
    }

    fn requires_key(&self) -> bool {
        false
    }

    async fn fetch_games(
        &self,
        client: &Client,
        _api_key: Option<&str>,
        sport_key: &str,
    ) -> Result<Vec<Game>> {
        let path = Self::league_path(sport_key);
        debug!("Fetching ESPN scoreboard for {}", path);
        let response = client
            .get(format!("{}/{}/scoreboard", BASE_URL, path))
            .send()
            .await?;
        ensure_success(&response)?;
        let payload: ScoreboardResponse = response.json().await?;

        if payload.events.is_empty() {
            return Err(Error::Provider(format!("No games for {}", sport_key)));
        }

        Ok(payload
            .events
            .iter()
            .map(|event| normalize_event(sport_key, event))
            .collect())
    }
}
