//! Financial Modeling Prep quote provider
//!
//! Free tier: 250 calls/day. Unlike Alpha Vantage the payloads are typed
//! arrays; an empty array for a symbol is a provider error.

use crate::error::{Error, Result};
use crate::providers::types::Quote;
use crate::providers::{ensure_success, QuoteProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Financial Modeling Prep adapter
pub struct FinancialModelingPrep;

impl FinancialModelingPrep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FinancialModelingPrep {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawQuote {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    change: f64,
    #[serde(rename = "changesPercentage", default)]
    changes_percentage: f64,
    #[serde(default)]
    pe: Option<f64>,
    #[serde(rename = "marketCap", default)]
    market_cap: f64,
    #[serde(rename = "yearHigh", default)]
    year_high: f64,
    #[serde(rename = "yearLow", default)]
    year_low: f64,
    #[serde(default)]
    volume: f64,
}

#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    #[serde(rename = "companyName", default)]
    company_name: Option<String>,
    #[serde(rename = "lastDiv", default)]
    last_div: f64,
    #[serde(rename = "mktCap", default)]
    mkt_cap: f64,
}

/// Merge quote and optional profile into a view model. Pure.
fn normalize(symbol: &str, quote: &RawQuote, profile: Option<&RawProfile>) -> Quote {
    let display_name = quote
        .name
        .clone()
        .or_else(|| profile.and_then(|p| p.company_name.clone()))
        .unwrap_or_else(|| symbol.to_string());
    let market_cap = if quote.market_cap > 0.0 {
        quote.market_cap
    } else {
        profile.map(|p| p.mkt_cap).unwrap_or(0.0)
    };
    // Trailing dividend divided by price, as a percentage.
    let dividend_yield_percent = match profile {
        Some(p) if quote.price > 0.0 => (p.last_div / quote.price) * 100.0,
        _ => 0.0,
    };
    Quote {
        symbol: if quote.symbol.is_empty() {
            symbol.to_string()
        } else {
            quote.symbol.clone()
        },
        display_name,
        price: quote.price,
        change: quote.change,
        change_percent: quote.changes_percentage,
        volume: quote.volume,
        market_cap,
        pe_ratio: quote.pe,
        dividend_yield_percent,
        fifty_two_week_high: quote.year_high,
        fifty_two_week_low: quote.year_low,
    }
}

#[async_trait]
impl QuoteProvider for FinancialModelingPrep {
    fn id(&self) -> &'static str {
        "fmp"
    }

    fn name(&self) -> &'static str {
        "Financial Modeling Prep"
    }

    fn requires_key(&self) -> bool {
        true
    }

    fn inter_request_delay(&self) -> Duration {
        Duration::from_millis(500)
    }

    async fn fetch_quote(
        &self,
        client: &Client,
        api_key: Option<&str>,
        symbol: &str,
    ) -> Result<Quote> {
        let api_key = api_key.ok_or_else(|| Error::Config("FMP API key required".to_string()))?;

        debug!("Fetching FMP quote for {}", symbol);
        let response = client
            .get(format!("{}/quote/{}", BASE_URL, symbol))
            .query(&[("apikey", api_key)])
            .send()
            .await?;
        ensure_success(&response)?;
        let quotes: Vec<RawQuote> = response.json().await?;
        let quote = quotes
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provider(format!("No data for {}", symbol)))?;

        // The profile is supplementary; a failure here only loses the
        // dividend yield and long company name.
        let profile = match self.fetch_profile(client, api_key, symbol).await {
            Ok(profile) => profile,
            Err(e) => {
                debug!("FMP profile for {} unavailable: {}", symbol, e);
                None
            }
        };

        Ok(normalize(symbol, &quote, profile.as_ref()))
    }
}

impl FinancialModelingPrep {
    async fn fetch_profile(
        &self,
        client: &Client,
        api_key: &str,
        symbol: &str,
    ) -> Result<Option<RawProfile>> {
        let response = client
            .get(format!("{}/profile/{}", BASE_URL, symbol))
            .query(&[("apikey", api_key)])
            .send()
            .await?;
        ensure_success(&response)?;
        let profiles: Vec<RawProfile> = response.json().await?;
        Ok(profiles.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_quote_with_profile() {
        let quote: RawQuote = serde_json::from_str(
            r#"{
                "symbol": "O",
                "name": "Realty Income",
                "price": 55.0,
                "change": -0.30,
                "changesPercentage": -0.54,
                "pe": 41.2,
                "marketCap": 48000000000,
                "yearHigh": 64.88,
                "yearLow": 45.03,
                "volume": 4200000
            }"#,
        )
        .unwrap();
        let profile: RawProfile =
            serde_json::from_str(r#"{"companyName": "Realty Income Corp", "lastDiv": 3.08}"#)
                .unwrap();

        let normalized = normalize("O", &quote, Some(&profile));
        assert_eq!(normalized.display_name, "Realty Income");
        assert_eq!(normalized.market_cap, 4.8e10);
        assert!((normalized.dividend_yield_percent - 5.6).abs() < 0.01);
    }

    #[test]
    fn normalizes_without_profile() {
        let quote = RawQuote {
            symbol: "VNQ".to_string(),
            price: 85.0,
            ..RawQuote::default()
        };
        let normalized = normalize("VNQ", &quote, None);
        assert_eq!(normalized.display_name, "VNQ");
        assert_eq!(normalized.dividend_yield_percent, 0.0);
        assert_eq!(normalized.pe_ratio, None);
    }

    #[test]
    fn profile_market_cap_backfills_missing_quote_field() {
        let quote = RawQuote::default();
        let profile = RawProfile {
            mkt_cap: 1_000_000.0,
            ..RawProfile::default()
        };
        let normalized = normalize("X", &quote, Some(&profile));
        assert_eq!(normalized.market_cap, 1_000_000.0);
    }
}
