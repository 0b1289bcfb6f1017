//! Common view-model types
//!
//! Normalized, UI-ready records independent of any provider's raw schema.
//! Missing provider fields become defaults instead of failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stock quote with the fundamentals shown on a dashboard card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub display_name: String,
    pub price: f64,
    /// Absolute day change in dollars.
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub pe_ratio: Option<f64>,
    pub dividend_yield_percent: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
}

impl Default for Quote {
    fn default() -> Self {
        Self {
            symbol: "N/A".to_string(),
            display_name: "N/A".to_string(),
            price: 0.0,
            change: 0.0,
            change_percent: 0.0,
            volume: 0.0,
            market_cap: 0.0,
            pe_ratio: None,
            dividend_yield_percent: 0.0,
            fifty_two_week_high: 0.0,
            fifty_two_week_low: 0.0,
        }
    }
}

/// One side of a point-spread market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadLine {
    pub team: String,
    pub points: f64,
    pub odds: Option<i64>,
}

/// Over/under market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalLine {
    pub points: f64,
    pub over_odds: Option<i64>,
    pub under_odds: Option<i64>,
}

/// Moneyline prices in American odds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Moneyline {
    pub home: Option<i64>,
    pub away: Option<i64>,
}

/// Upcoming or live game, rebuilt each refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub spread: Option<SpreadLine>,
    pub total: Option<TotalLine>,
    pub moneyline: Moneyline,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            sport: "N/A".to_string(),
            home_team: "TBD".to_string(),
            away_team: "TBD".to_string(),
            start_time: None,
            venue: None,
            spread: None,
            total: None,
            moneyline: Moneyline::default(),
        }
    }
}

/// News article for the featured/sidebar/headline sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub source_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl Default for Article {
    fn default() -> Self {
        Self {
            title: "N/A".to_string(),
            description: String::new(),
            source_name: "N/A".to_string(),
            published_at: None,
            url: None,
        }
    }
}
