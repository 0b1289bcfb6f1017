//! Alpha Vantage quote provider
//!
//! Free tier: 25 calls/day, 5 calls/minute. Every field in the payload is a
//! string; rate-limit notices and invalid-symbol errors arrive inside a 200
//! response, so both are checked before normalization.

use crate::error::{Error, Result};
use crate::providers::types::Quote;
use crate::providers::{ensure_success, QuoteProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage adapter
pub struct AlphaVantage;

impl AlphaVantage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AlphaVantage {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    quote: Option<RawGlobalQuote>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawGlobalQuote {
    #[serde(rename = "01. symbol", default)]
    symbol: String,
    #[serde(rename = "05. price", default)]
    price: String,
    #[serde(rename = "06. volume", default)]
    volume: String,
    #[serde(rename = "09. change", default)]
    change: String,
    #[serde(rename = "10. change percent", default)]
    change_percent: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawOverview {
    #[serde(rename = "Symbol", default)]
    symbol: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "PERatio", default)]
    pe_ratio: String,
    #[serde(rename = "DividendYield", default)]
    dividend_yield: String,
    #[serde(rename = "MarketCapitalization", default)]
    market_cap: String,
    #[serde(rename = "52WeekHigh", default)]
    week_high: String,
    #[serde(rename = "52WeekLow", default)]
    week_low: String,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

fn parse_num(value: &str) -> f64 {
    value.trim().trim_end_matches('%').parse().unwrap_or(0.0)
}

fn parse_optional(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

/// Map the two raw payloads into a quote. Pure; missing fields default.
fn normalize(symbol: &str, overview: &RawOverview, quote: &RawGlobalQuote) -> Quote {
    let display_name = if overview.name.is_empty() {
        symbol.to_string()
    } else {
        overview.name.clone()
    };
    Quote {
        symbol: if overview.symbol.is_empty() {
            symbol.to_string()
        } else {
            overview.symbol.clone()
        },
        display_name,
        price: parse_num(&quote.price),
        change: parse_num(&quote.change),
        change_percent: parse_num(&quote.change_percent),
        volume: parse_num(&quote.volume),
        market_cap: parse_num(&overview.market_cap),
        pe_ratio: parse_optional(&overview.pe_ratio),
        // DividendYield arrives as a fraction, e.g. "0.0055".
        dividend_yield_percent: parse_num(&overview.dividend_yield) * 100.0,
        fifty_two_week_high: parse_num(&overview.week_high),
        fifty_two_week_low: parse_num(&overview.week_low),
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantage {
    fn id(&self) -> &'static str {
        "alpha_vantage"
    }

    fn name(&self) -> &'static str {
        "Alpha Vantage"
    }

    fn requires_key(&self) -> bool {
        true
    }

    fn inter_request_delay(&self) -> Duration {
        // Free tier allows 5 calls/minute and each symbol costs two calls.
        Duration::from_secs(12)
    }

    async fn fetch_quote(
        &self,
        client: &Client,
        api_key: Option<&str>,
        symbol: &str,
    ) -> Result<Quote> {
        let api_key =
            api_key.ok_or_else(|| Error::Config("Alpha Vantage API key required".to_string()))?;

        debug!("Fetching overview for {}", symbol);
        let response = client
            .get(BASE_URL)
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .send()
            .await?;
        ensure_success(&response)?;
        let overview: RawOverview = response.json().await?;

        if let Some(note) = &overview.note {
            return Err(Error::Provider(format!("Rate limit reached: {}", note)));
        }
        if overview.error_message.is_some() {
            return Err(Error::Provider(format!("Invalid symbol: {}", symbol)));
        }

        debug!("Fetching quote for {}", symbol);
        let response = client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .send()
            .await?;
        ensure_success(&response)?;
        let payload: GlobalQuoteResponse = response.json().await?;

        if let Some(note) = payload.note {
            return Err(Error::Provider(format!("Rate limit reached: {}", note)));
        }
        if payload.error_message.is_some() {
            return Err(Error::Provider(format!("Invalid symbol: {}", symbol)));
        }
        let quote = payload
            .quote
            .ok_or_else(|| Error::Provider(format!("No quote data for {}", symbol)))?;

        Ok(normalize(symbol, &overview, &quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_complete_payloads() {
        let overview: RawOverview = serde_json::from_str(
            r#"{
                "Symbol": "AAPL",
                "Name": "Apple Inc",
                "PERatio": "28.5",
                "DividendYield": "0.0055",
                "MarketCapitalization": "2500000000000",
                "52WeekHigh": "199.62",
                "52WeekLow": "142.00"
            }"#,
        )
        .unwrap();
        let quote: RawGlobalQuote = serde_json::from_str(
            r#"{
                "01. symbol": "AAPL",
                "05. price": "186.12",
                "06. volume": "54000000",
                "09. change": "1.43",
                "10. change percent": "0.77%"
            }"#,
        )
        .unwrap();

        let normalized = normalize("AAPL", &overview, &quote);
        assert_eq!(normalized.display_name, "Apple Inc");
        assert_eq!(normalized.price, 186.12);
        assert_eq!(normalized.change_percent, 0.77);
        assert_eq!(normalized.pe_ratio, Some(28.5));
        assert!((normalized.dividend_yield_percent - 0.55).abs() < 1e-9);
        assert_eq!(normalized.market_cap, 2.5e12);
    }

    #[test]
    fn empty_payloads_normalize_to_defaults() {
        let normalized = normalize("TSLA", &RawOverview::default(), &RawGlobalQuote::default());
        assert_eq!(normalized.symbol, "TSLA");
        assert_eq!(normalized.display_name, "TSLA");
        assert_eq!(normalized.price, 0.0);
        assert_eq!(normalized.pe_ratio, None);
        assert_eq!(normalized.dividend_yield_percent, 0.0);
    }

    #[test]
    fn rate_limit_note_deserializes() {
        let payload: GlobalQuoteResponse = serde_json::from_str(
            r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#,
        )
        .unwrap();
        assert!(payload.note.is_some());
        assert!(payload.quote.is_none());
    }
}
