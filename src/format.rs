//! Display formatting helpers
//!
//! Pure functions shared by the render layer. Numeric formatting follows
//! fixed unit thresholds (1e3/1e6/1e9/1e12) with two-decimal rounding.

use crate::providers::types::Article;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Format a market capitalization with a dollar sign and K-less unit
/// suffixes: `1_500_000_000.0` becomes `"$1.50B"`, `999.0` stays `"$999.00"`.
pub fn format_market_cap(value: f64) -> String {
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else {
        format!("${:.2}", value)
    }
}

/// Format a share volume: `2_500_000.0` becomes `"2.50M"`.
pub fn format_volume(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

/// Format American odds: positive prices carry an explicit plus sign.
pub fn format_odds(odds: Option<i64>) -> String {
    match odds {
        Some(price) if price > 0 => format!("+{}", price),
        Some(price) => price.to_string(),
        None => "N/A".to_string(),
    }
}

/// Signed day change, e.g. `"+1.23 (+0.85%)"`.
pub fn format_change(change: f64, change_percent: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!(
        "{}{:.2} ({}{:.2}%)",
        sign, change, sign, change_percent
    )
}

/// Drop articles whose title and source both match an earlier article.
/// First occurrence wins; order is otherwise preserved.
pub fn dedup_articles(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert((article.title.clone(), article.source_name.clone())))
        .collect()
}

/// Relative age for article metadata: hours under a day, days after.
pub fn relative_age(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(published) = published_at else {
        return "N/A".to_string();
    };
    let hours = (now - published).num_hours().max(0);
    if hours < 24 {
        format!("{} hours ago", hours)
    } else {
        format!("{} days ago", hours / 24)
    }
}

/// Uppercase tag for the featured article: `"TODAY"` on the publish day.
pub fn age_tag(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(published) = published_at else {
        return "NEWS".to_string();
    };
    let days = (now - published).num_days().max(0);
    if days == 0 {
        "TODAY".to_string()
    } else {
        format!("{} DAYS AGO", days)
    }
}

/// Truncate to at most `max` characters, appending an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn market_cap_unit_thresholds() {
        assert_eq!(format_market_cap(1_500_000_000.0), "$1.50B");
        assert_eq!(format_market_cap(999.0), "$999.00");
        assert_eq!(format_market_cap(2_000_000.0), "$2.00M");
        assert_eq!(format_market_cap(3_250_000_000_000.0), "$3.25T");
    }

    #[test]
    fn volume_unit_thresholds() {
        assert_eq!(format_volume(2_500_000.0), "2.50M");
        assert_eq!(format_volume(1_500.0), "1.50K");
        assert_eq!(format_volume(4_100_000_000.0), "4.10B");
        assert_eq!(format_volume(999.0), "999");
    }

    #[test]
    fn odds_signing() {
        assert_eq!(format_odds(Some(150)), "+150");
        assert_eq!(format_odds(Some(-110)), "-110");
        assert_eq!(format_odds(None), "N/A");
    }

    #[test]
    fn change_signing() {
        assert_eq!(format_change(1.234, 0.851), "+1.23 (+0.85%)");
        assert_eq!(format_change(-2.5, -1.2), "-2.50 (-1.20%)");
    }

    #[test]
    fn dedup_by_title_and_source() {
        let make = |title: &str, source: &str| Article {
            title: title.to_string(),
            source_name: source.to_string(),
            ..Article::default()
        };
        let deduped = dedup_articles(vec![make("A", "X"), make("A", "X"), make("A", "Y")]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].source_name, "X");
        assert_eq!(deduped[1].source_name, "Y");
    }

    #[test]
    fn relative_age_switches_to_days() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let three_hours = now - chrono::Duration::hours(3);
        let two_days = now - chrono::Duration::days(2);
        assert_eq!(relative_age(Some(three_hours), now), "3 hours ago");
        assert_eq!(relative_age(Some(two_days), now), "2 days ago");
        assert_eq!(relative_age(None, now), "N/A");
    }

    #[test]
    fn age_tag_today() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(age_tag(Some(now - chrono::Duration::hours(2)), now), "TODAY");
        assert_eq!(
            age_tag(Some(now - chrono::Duration::days(3)), now),
            "3 DAYS AGO"
        );
    }

    #[test]
    fn truncation_appends_ellipsis() {
        assert_eq!(truncate("short", 60), "short");
        let long = "x".repeat(70);
        let cut = truncate(&long, 60);
        assert_eq!(cut.chars().count(), 63);
        assert!(cut.ends_with("..."));
    }
}
