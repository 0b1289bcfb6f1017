//! Terminal surface
//!
//! Line-per-slot stdout rendering for the headless binary. Every slot is
//! available, so nothing is ever skipped here.

use crate::render::{Slot, Surface};

/// Surface that prints each write as a labelled line.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Surface for TerminalSurface {
    fn set_text(&mut self, slot: Slot, text: &str) {
        println!("{:<28} {}", format!("{:?}", slot), text);
    }

    fn set_link(&mut self, slot: Slot, url: &str) {
        println!("{:<28} -> {}", format!("{:?}", slot), url);
    }
}
