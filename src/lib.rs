//! NovaFeed - Market, Sports & News Dashboard Data Engine
//!
//! Headless data engine behind the NovaWealth dashboard. Three pipelines
//! (stocks, sports, news) each run the same refresh cycle on their own
//! schedule: consult the timed cache, fetch what is stale from the
//! configured provider, normalize into view models and write the result to
//! a render surface.

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod providers;
pub mod render;
pub mod scheduler;
pub mod services;
pub mod state;
