//! NovaFeed binary: spawns one scheduled pipeline per enabled domain and
//! renders to the terminal until interrupted.

use novafeed::config::AppConfig;
use novafeed::render::TerminalSurface;
use novafeed::scheduler::ScheduledTask;
use novafeed::services;
use novafeed::state::AppState;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "novafeed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NovaFeed...");

    let config = AppConfig::from_env();
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }

    let state = Arc::new(AppState::new(config)?);
    let surface = Arc::new(Mutex::new(TerminalSurface::new()));
    let mut tasks = Vec::new();

    if state.config.use_stock_data {
        let interval = state.config.stock_refresh();
        let state = state.clone();
        let surface = surface.clone();
        tasks.push(ScheduledTask::spawn("stocks", interval, move || {
            let state = state.clone();
            let surface = surface.clone();
            async move {
                services::refresh_stocks(&state, &surface).await;
            }
        }));
    }

    if state.config.use_sports_data {
        let interval = state.config.sports_refresh();
        let state = state.clone();
        let surface = surface.clone();
        tasks.push(ScheduledTask::spawn("sports", interval, move || {
            let state = state.clone();
            let surface = surface.clone();
            async move {
                services::refresh_sports(&state, &surface).await;
            }
        }));
    }

    if state.config.use_news_data {
        let interval = state.config.news_refresh();
        let state = state.clone();
        let surface = surface.clone();
        tasks.push(ScheduledTask::spawn("news", interval, move || {
            let state = state.clone();
            let surface = surface.clone();
            async move {
                services::refresh_news(&state, &surface).await;
            }
        }));
    }

    if tasks.is_empty() {
        tracing::warn!("All data domains are disabled, nothing to do");
        return Ok(());
    }

    tracing::info!("{} pipelines running, press Ctrl-C to stop", tasks.len());
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");
    for task in tasks {
        tracing::info!("Stopping '{}' pipeline", task.name());
        task.cancel().await;
    }
    Ok(())
}
