//! Render surface abstraction
//!
//! The original scripts patched DOM nodes by class name and card position;
//! here the page is a set of named slots behind the `Surface` trait. A
//! surface that does not expose a slot ignores the write, so rendering can
//! never fail on a missing target.

pub mod dashboard;
pub mod terminal;

pub use terminal::TerminalSurface;

/// Addressable output slots. Indexed variants follow card order on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    StockTitle(usize),
    StockPrice(usize),
    StockChange(usize),
    StockPeRatio(usize),
    StockDividendYield(usize),
    StockMarketCap(usize),
    StockVolume(usize),

    GameTitle(usize),
    GameTime(usize),
    GameSpread(usize),
    GameTotal(usize),
    GameMoneyline(usize),

    FeaturedTitle,
    FeaturedExcerpt,
    FeaturedTag,
    FeaturedLink,

    SidebarTitle(usize),
    SidebarMeta(usize),
    SidebarLink(usize),

    HeadlineTitle(usize),
    HeadlineDescription(usize),
    HeadlineMeta(usize),
    HeadlineLink(usize),
}

/// Something that can display rendered records. Writes to absent slots are
/// silently skipped.
pub trait Surface {
    fn set_text(&mut self, slot: Slot, text: &str);

    /// Attach a target URL to a clickable slot.
    fn set_link(&mut self, slot: Slot, url: &str);
}

/// In-memory surface for tests: records writes, optionally restricted to a
/// fixed set of available slots.
#[derive(Debug, Default)]
pub struct MemorySurface {
    available: Option<std::collections::HashSet<Slot>>,
    pub texts: std::collections::HashMap<Slot, String>,
    pub links: std::collections::HashMap<Slot, String>,
}

impl MemorySurface {
    /// Surface exposing every slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface exposing only the given slots; writes elsewhere are dropped.
    pub fn with_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            available: Some(slots.into_iter().collect()),
            ..Self::default()
        }
    }

    fn has(&self, slot: Slot) -> bool {
        self.available.as_ref().map_or(true, |set| set.contains(&slot))
    }
}

impl Surface for MemorySurface {
    fn set_text(&mut self, slot: Slot, text: &str) {
        if self.has(slot) {
            self.texts.insert(slot, text.to_string());
        }
    }

    fn set_link(&mut self, slot: Slot, url: &str) {
        if self.has(slot) {
            self.links.insert(slot, url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_surface_drops_unavailable_writes() {
        let mut surface = MemorySurface::with_slots([Slot::FeaturedTitle]);
        surface.set_text(Slot::FeaturedTitle, "kept");
        surface.set_text(Slot::FeaturedExcerpt, "dropped");
        surface.set_link(Slot::SidebarLink(0), "https://example.com");

        assert_eq!(surface.texts.len(), 1);
        assert!(surface.links.is_empty());
    }
}
