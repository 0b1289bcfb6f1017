//! The Odds API sports provider
//!
//! Free tier: 500 calls/month; the remaining quota rides along as a response
//! header. Lines are read from the first bookmaker that carries each market.

use crate::error::{Error, Result};
use crate::providers::types::{Game, Moneyline, SpreadLine, TotalLine};
use crate::providers::{ensure_success, SportsProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

const BASE_URL: &str = "https://api.the-odds-api.com/v4";

/// Moneyline, spreads and over/under.
const MARKETS: &str = "h2h,spreads,totals";

/// The Odds API adapter
pub struct OddsApi;

impl OddsApi {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OddsApi {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawGame {
    #[serde(default)]
    sport_title: String,
    #[serde(default)]
    commence_time: Option<String>,
    #[serde(default)]
    home_team: String,
    #[serde(default)]
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBookmaker {
    #[serde(default)]
    markets: Vec<RawMarket>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMarket {
    #[serde(default)]
    key: String,
    #[serde(default)]
    outcomes: Vec<RawOutcome>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOutcome {
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: Option<i64>,
    #[serde(default)]
    point: Option<f64>,
}

fn parse_time(value: &Option<String>) -> Option<DateTime<Utc>> {
    value
        .as_deref()
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Map one raw game into the view model. Reads lines from the first
/// bookmaker only, matching what the dashboard displays. Pure.
fn normalize(raw: &RawGame) -> Game {
    let markets = raw
        .bookmakers
        .first()
        .map(|b| b.markets.as_slice())
        .unwrap_or(&[]);
    let find = |key: &str| markets.iter().find(|m| m.key == key);

    let spread = find("spreads")
        .and_then(|m| m.outcomes.first())
        .and_then(|o| {
            Some(SpreadLine {
                team: o.name.clone(),
                points: o.point?,
                odds: o.price,
            })
        });

    let total = find("totals").and_then(|m| {
        let over = m.outcomes.first()?;
        let under = m.outcomes.iter().find(|o| o.name == "Under");
        Some(TotalLine {
            points: over.point?,
            over_odds: over.price,
            under_odds: under.and_then(|o| o.price),
        })
    });

    let moneyline = find("h2h")
        .map(|m| Moneyline {
            home: m
                .outcomes
                .iter()
                .find(|o| o.name == raw.home_team)
                .and_then(|o| o.price),
            away: m
                .outcomes
                .iter()
                .find(|o| o.name == raw.away_team)
                .and_then(|o| o.price),
        })
        .unwrap_or_default();

    Game {
        sport: if raw.sport_title.is_empty() {
            "N/A".to_string()
        } else {
            raw.sport_title.clone()
        },
        home_team: if raw.home_team.is_empty() {
            "TBD".to_string()
        } else {
            raw.home_team.clone()
        },
        away_team: if raw.away_team.is_empty() {
            "TBD".to_string()
        } else {
            raw.away_team.clone()
        },
        start_time: parse_time(&raw.commence_time),
        venue: None,
        spread,
        total,
        moneyline,
    }
}

#[async_trait]
impl SportsProvider for OddsApi {
    fn id(&self) -> &'static str {
        "odds_api"
    }

    fn name(&self) -> &'static str {
        "The Odds API"
    }

    fn requires_key(&self) -> bool {
        true
    }

    async fn fetch_games(
        &self,
        client: &Client,
        api_key: Option<&str>,
        sport_key: &str,
    ) -> Result<Vec<Game>> {
        let api_key =
            api_key.ok_or_else(|| Error::Config("Odds API key required".to_string()))?;

        debug!("Fetching odds for {}", sport_key);
        let response = client
            .get(format!("{}/sports/{}/odds/", BASE_URL, sport_key))
            .query(&[
                ("apiKey", api_key),
                ("regions", "us"),
                ("markets", MARKETS),
                ("oddsFormat", "american"),
            ])
            .send()
            .await?;
        ensure_success(&response)?;

        if let Some(remaining) = response
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
        {
            info!("Odds API calls remaining: {}", remaining);
        }

        let games: Vec<RawGame> = response.json().await?;
        Ok(games.iter().map(normalize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_game() -> RawGame {
        serde_json::from_str(
            r#"{
                "sport_title": "NBA",
                "commence_time": "2025-06-15T23:30:00Z",
                "home_team": "Boston Celtics",
                "away_team": "Dallas Mavericks",
                "bookmakers": [{
                    "markets": [
                        {"key": "h2h", "outcomes": [
                            {"name": "Boston Celtics", "price": -195},
                            {"name": "Dallas Mavericks", "price": 162}
                        ]},
                        {"key": "spreads", "outcomes": [
                            {"name": "Boston Celtics", "price": -110, "point": -5.5},
                            {"name": "Dallas Mavericks", "price": -110, "point": 5.5}
                        ]},
                        {"key": "totals", "outcomes": [
                            {"name": "Over", "price": -108, "point": 213.5},
                            {"name": "Under", "price": -112, "point": 213.5}
                        ]}
                    ]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn normalizes_first_bookmaker_lines() {
        let game = normalize(&sample_game());
        assert_eq!(game.sport, "NBA");
        assert_eq!(game.home_team, "Boston Celtics");
        let spread = game.spread.unwrap();
        assert_eq!(spread.points, -5.5);
        assert_eq!(spread.team, "Boston Celtics");
        let total = game.total.unwrap();
        assert_eq!(total.points, 213.5);
        assert_eq!(total.under_odds, Some(-112));
        assert_eq!(game.moneyline.home, Some(-195));
        assert_eq!(game.moneyline.away, Some(162));
        assert!(game.start_time.is_some());
    }

    #[test]
    fn empty_payload_normalizes_to_defaults() {
        let game = normalize(&RawGame::default());
        assert_eq!(game.home_team, "TBD");
        assert_eq!(game.sport, "N/A");
        assert!(game.spread.is_none());
        assert!(game.total.is_none());
        assert_eq!(game.moneyline.home, None);
        assert!(game.start_time.is_none());
    }

    #[test]
    fn missing_markets_leave_lines_unset() {
        let mut raw = sample_game();
        raw.bookmakers[0].markets.retain(|m| m.key == "h2h");
        let game = normalize(&raw);
        assert!(game.spread.is_none());
        assert!(game.total.is_none());
        assert_eq!(game.moneyline.away, Some(162));
    }
}
