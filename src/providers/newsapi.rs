//! NewsAPI article provider
//!
//! Searches `/v2/everything` over the last 30 days. NewsAPI reports errors
//! both as non-2xx statuses (401 bad key, 429 rate limit) and as a
//! `status: "error"` body inside a 200 response; both are mapped.

use crate::error::{Error, Result};
use crate::providers::types::Article;
use crate::providers::{ensure_success, NewsProvider};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const BASE_URL: &str = "https://newsapi.org/v2/everything";

/// Search window in days.
const SEARCH_WINDOW_DAYS: i64 = 30;

/// NewsAPI adapter
pub struct NewsApi;

impl NewsApi {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NewsApi {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Default, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
    #[serde(default)]
    source: RawSource,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    #[serde(default)]
    name: Option<String>,
}

fn normalize(raw: &RawArticle) -> Article {
    Article {
        title: raw.title.clone().unwrap_or_else(|| "N/A".to_string()),
        // Fall back through description, content, title.
        description: raw
            .description
            .clone()
            .or_else(|| raw.content.clone())
            .or_else(|| raw.title.clone())
            .unwrap_or_default(),
        source_name: raw.source.name.clone().unwrap_or_else(|| "N/A".to_string()),
        published_at: raw
            .published_at
            .as_deref()
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        url: raw.url.clone(),
    }
}

#[async_trait]
impl NewsProvider for NewsApi {
    fn id(&self) -> &'static str {
        "newsapi"
    }

    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    fn requires_key(&self) -> bool {
        true
    }

    async fn fetch_articles(
        &self,
        client: &Client,
        api_key: Option<&str>,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Article>> {
        let api_key =
            api_key.ok_or_else(|| Error::Config("News API key required".to_string()))?;

        let to_date = Utc::now().date_naive();
        let from_date = (Utc::now() - Duration::days(SEARCH_WINDOW_DAYS)).date_naive();

        debug!("Fetching news for query '{}'", query);
        let response = client
            .get(BASE_URL)
            .query(&[
                ("q", query),
                ("from", &from_date.to_string()),
                ("to", &to_date.to_string()),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", &max_results.to_string()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;
        ensure_success(&response)?;
        let payload: SearchResponse = response.json().await?;

        if payload.status == "error" {
            return Err(Error::Provider(
                payload
                    .message
                    .unwrap_or_else(|| "News API error".to_string()),
            ));
        }

        debug!("Fetched {} articles for '{}'", payload.articles.len(), query);
        Ok(payload.articles.iter().map(normalize).collect())
    }
}
