//! Dashboard placement rules
//!
//! Maps view-model records onto surface slots: quotes and games by card
//! index, articles split between the featured slot, the sidebar list and
//! the headlines section.

use crate::format;
use crate::providers::types::{Article, Game, Quote};
use crate::render::{Slot, Surface};
use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;

/// Sidebar shows at most four articles.
const SIDEBAR_ITEMS: usize = 4;
/// Headlines section shows at most three.
const HEADLINE_ITEMS: usize = 3;
/// Featured excerpt and sidebar title length limits.
const EXCERPT_MAX: usize = 200;
const SIDEBAR_TITLE_MAX: usize = 60;
const HEADLINE_DESC_MAX: usize = 120;

/// Write stock quotes into their cards, in tracked order.
pub fn render_quotes(surface: &mut dyn Surface, quotes: &[Quote]) {
    for (index, quote) in quotes.iter().enumerate() {
        surface.set_text(
            Slot::StockTitle(index),
            &format!("{} ({})", quote.display_name, quote.symbol),
        );
        surface.set_text(Slot::StockPrice(index), &format!("${:.2}", quote.price));
        surface.set_text(
            Slot::StockChange(index),
            &format::format_change(quote.change, quote.change_percent),
        );
        let pe = match quote.pe_ratio {
            Some(pe) => format!("{:.2}", pe),
            None => "N/A".to_string(),
        };
        surface.set_text(Slot::StockPeRatio(index), &pe);
        surface.set_text(
            Slot::StockDividendYield(index),
            &format!("{:.2}%", quote.dividend_yield_percent),
        );
        surface.set_text(
            Slot::StockMarketCap(index),
            &format::format_market_cap(quote.market_cap),
        );
        surface.set_text(
            Slot::StockVolume(index),
            &format::format_volume(quote.volume),
        );
    }
}

/// Short team name for compact moneyline display ("Boston Celtics" ->
/// "Celtics").
fn short_team(name: &str) -> &str {
    name.rsplit(' ').next().unwrap_or(name)
}

fn format_start_time(start: Option<DateTime<Utc>>) -> String {
    match start {
        Some(dt) => dt
            .with_timezone(&New_York)
            .format("%a, %b %-d, %-I:%M %p ET")
            .to_string(),
        None => "TBD".to_string(),
    }
}

/// Write games into the betting cards.
pub fn render_games(surface: &mut dyn Surface, games: &[Game]) {
    for (index, game) in games.iter().enumerate() {
        surface.set_text(
            Slot::GameTitle(index),
            &format!("{} @ {}", game.away_team, game.home_team),
        );
        surface.set_text(Slot::GameTime(index), &format_start_time(game.start_time));

        let spread = match &game.spread {
            Some(line) => format!(
                "{} {}{}",
                line.team,
                if line.points > 0.0 { "+" } else { "" },
                line.points
            ),
            None => "N/A".to_string(),
        };
        surface.set_text(Slot::GameSpread(index), &spread);

        let total = match &game.total {
            Some(line) => format!("{}", line.points),
            None => "N/A".to_string(),
        };
        surface.set_text(Slot::GameTotal(index), &total);

        surface.set_text(
            Slot::GameMoneyline(index),
            &format!(
                "{} {} / {} {}",
                short_team(&game.home_team),
                format::format_odds(game.moneyline.home),
                short_team(&game.away_team),
                format::format_odds(game.moneyline.away)
            ),
        );
    }
}

/// Write articles: first to the featured slot, the next four to the
/// sidebar, the top three to the headlines section.
pub fn render_articles(surface: &mut dyn Surface, articles: &[Article], now: DateTime<Utc>) {
    let Some(featured) = articles.first() else {
        return;
    };

    surface.set_text(Slot::FeaturedTitle, &featured.title);
    surface.set_text(
        Slot::FeaturedExcerpt,
        &format::truncate(&featured.description, EXCERPT_MAX),
    );
    surface.set_text(Slot::FeaturedTag, &format::age_tag(featured.published_at, now));
    if let Some(url) = &featured.url {
        surface.set_link(Slot::FeaturedLink, url);
        surface.set_text(
            Slot::FeaturedLink,
            &format!("Read Full Article at {}", featured.source_name),
        );
    }

    for (index, article) in articles.iter().skip(1).take(SIDEBAR_ITEMS).enumerate() {
        surface.set_text(
            Slot::SidebarTitle(index),
            &format::truncate(&article.title, SIDEBAR_TITLE_MAX),
        );
        surface.set_text(
            Slot::SidebarMeta(index),
            &format!(
                "{} \u{2022} {}",
                article.source_name,
                format::relative_age(article.published_at, now)
            ),
        );
        if let Some(url) = &article.url {
            surface.set_link(Slot::SidebarLink(index), url);
        }
    }

    for (index, article) in articles.iter().take(HEADLINE_ITEMS).enumerate() {
        surface.set_text(Slot::HeadlineTitle(index), &article.title);
        surface.set_text(
            Slot::HeadlineDescription(index),
            &format::truncate(&article.description, HEADLINE_DESC_MAX),
        );
        surface.set_text(
            Slot::HeadlineMeta(index),
            &format::relative_age(article.published_at, now),
        );
        if let Some(url) = &article.url {
            surface.set_link(Slot::HeadlineLink(index), url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::{Moneyline, SpreadLine};
    use crate::render::MemorySurface;
    use chrono::TimeZone;

    fn article(title: &str, url: Option<&str>) -> Article {
        Article {
            title: title.to_string(),
            description: format!("{} description", title),
            source_name: "Source".to_string(),
            published_at: Some(Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap()),
            url: url.map(String::from),
        }
    }

    #[test]
    fn articles_fill_featured_sidebar_and_headlines() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let articles: Vec<Article> = (0..6)
            .map(|i| article(&format!("A{}", i), Some("https://example.com")))
            .collect();
        let mut surface = MemorySurface::new();
        render_articles(&mut surface, &articles, now);

        assert_eq!(surface.texts[&Slot::FeaturedTitle], "A0");
        assert_eq!(surface.texts[&Slot::FeaturedTag], "TODAY");
        // Sidebar holds articles 1..=4; the sixth article is not placed.
        assert_eq!(surface.texts[&Slot::SidebarTitle(0)], "A1");
        assert_eq!(surface.texts[&Slot::SidebarTitle(3)], "A4");
        assert!(!surface.texts.contains_key(&Slot::SidebarTitle(4)));
        // Headlines repeat the top three.
        assert_eq!(surface.texts[&Slot::HeadlineTitle(0)], "A0");
        assert_eq!(surface.texts[&Slot::HeadlineTitle(2)], "A2");
        assert!(!surface.texts.contains_key(&Slot::HeadlineTitle(3)));
        assert_eq!(surface.links[&Slot::SidebarLink(0)], "https://example.com");
    }

    #[test]
    fn missing_slots_are_skipped_without_panicking() {
        let now = Utc::now();
        let articles = vec![article("A0", None), article("A1", None)];
        let mut surface = MemorySurface::with_slots([Slot::FeaturedTitle]);
        render_articles(&mut surface, &articles, now);

        assert_eq!(surface.texts.len(), 1);
        assert!(surface.links.is_empty());
    }

    #[test]
    fn empty_article_list_renders_nothing() {
        let mut surface = MemorySurface::new();
        render_articles(&mut surface, &[], Utc::now());
        assert!(surface.texts.is_empty());
    }

    #[test]
    fn quote_card_fields() {
        let quote = Quote {
            symbol: "AAPL".to_string(),
            display_name: "Apple Inc".to_string(),
            price: 186.12,
            change: 1.43,
            change_percent: 0.77,
            volume: 2_500_000.0,
            market_cap: 1_500_000_000.0,
            pe_ratio: None,
            ..Quote::default()
        };
        let mut surface = MemorySurface::new();
        render_quotes(&mut surface, &[quote]);

        assert_eq!(surface.texts[&Slot::StockTitle(0)], "Apple Inc (AAPL)");
        assert_eq!(surface.texts[&Slot::StockPrice(0)], "$186.12");
        assert_eq!(surface.texts[&Slot::StockChange(0)], "+1.43 (+0.77%)");
        assert_eq!(surface.texts[&Slot::StockPeRatio(0)], "N/A");
        assert_eq!(surface.texts[&Slot::StockMarketCap(0)], "$1.50B");
        assert_eq!(surface.texts[&Slot::StockVolume(0)], "2.50M");
    }

    #[test]
    fn game_card_lines() {
        let game = Game {
            sport: "NBA".to_string(),
            home_team: "Boston Celtics".to_string(),
            away_team: "Dallas Mavericks".to_string(),
            start_time: None,
            spread: Some(SpreadLine {
                team: "Boston Celtics".to_string(),
                points: -5.5,
                odds: Some(-110),
            }),
            total: None,
            moneyline: Moneyline {
                home: Some(-195),
                away: Some(162),
            },
            ..Game::default()
        };
        let mut surface = MemorySurface::new();
        render_games(&mut surface, &[game]);

        assert_eq!(
            surface.texts[&Slot::GameTitle(0)],
            "Dallas Mavericks @ Boston Celtics"
        );
        assert_eq!(surface.texts[&Slot::GameTime(0)], "TBD");
        assert_eq!(surface.texts[&Slot::GameSpread(0)], "Boston Celtics -5.5");
        assert_eq!(surface.texts[&Slot::GameTotal(0)], "N/A");
        assert_eq!(
            surface.texts[&Slot::GameMoneyline(0)],
            "Celtics -195 / Mavericks +162"
        );
    }

    #[test]
    fn game_time_renders_in_eastern_time() {
        let game = Game {
            start_time: Some(Utc.with_ymd_and_hms(2025, 6, 15, 23, 30, 0).unwrap()),
            ..Game::default()
        };
        let mut surface = MemorySurface::new();
        render_games(&mut surface, &[game]);
        // 23:30 UTC is 7:30 PM EDT.
        assert_eq!(surface.texts[&Slot::GameTime(0)], "Sun, Jun 15, 7:30 PM ET");
    }
}
