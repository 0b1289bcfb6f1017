//! Scheduled pipeline refresh
//!
//! Each domain runs as one `ScheduledTask`: an immediate first run, then
//! one run per interval. Runs execute sequentially inside the task, and a
//! tick that comes due while a run is still in flight is skipped rather
//! than queued, so a slow request can never stack overlapping fetches for
//! the same domain. Tasks are cancellable and deterministic under paused
//! test time.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to a repeating background task. Dropping the handle aborts the
/// task; `cancel` stops it gracefully.
pub struct ScheduledTask {
    name: String,
    cancel_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Spawn a task that runs `task` now and then every `interval`.
    pub fn spawn<F, Fut>(name: impl Into<String>, interval: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let name = name.into();
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let task_name = name.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Ticks missed while a run is in flight are dropped, not
            // replayed in a burst.
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            info!("Scheduler '{}' started, interval {:?}", task_name, interval);

            let mut run = 0u64;
            let mut last_tick: Option<tokio::time::Instant> = None;
            loop {
                tokio::select! {
                    _ = cancel_rx.changed() => {
                        if *cancel_rx.borrow() {
                            info!("Scheduler '{}' cancelled", task_name);
                            break;
                        }
                    }
                    tick = ticker.tick() => {
                        if let Some(prev) = last_tick {
                            let behind = tick.duration_since(prev);
                            if behind >= interval + interval / 2 {
                                let skipped = (behind.as_millis() / interval.as_millis())
                                    .saturating_sub(1);
                                warn!(
                                    "Scheduler '{}' skipped {} tick(s), previous run overran its interval",
                                    task_name, skipped
                                );
                            }
                        }
                        last_tick = Some(tick);
                        run += 1;
                        debug!("Scheduler '{}' run {}", task_name, run);
                        task().await;
                    }
                }
            }
        });

        Self {
            name,
            cancel_tx,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the task after any in-flight run completes.
    pub async fn cancel(mut self) {
        let _ = self.cancel_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// True once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_and_then_per_interval() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let task = ScheduledTask::spawn("stocks", Duration::from_secs(300), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(601)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        task.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn slow_runs_skip_ticks_instead_of_stacking() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        // Each run takes 2.5 intervals.
        let task = ScheduledTask::spawn("sports", Duration::from_secs(120), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(300)).await;
            }
        });

        // Ten intervals of wall time fit only ~4 back-to-back slow runs;
        // the ticks that fired mid-run are dropped.
        tokio::time::sleep(Duration::from_secs(1201)).await;
        let count = runs.load(Ordering::SeqCst);
        assert!(count <= 5, "expected skipped ticks, got {} runs", count);
        assert!(count >= 3);

        task.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_future_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let task = ScheduledTask::spawn("news", Duration::from_secs(60), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(task.name(), "news");
        assert!(!task.is_finished());
        task.cancel().await;
        let after_cancel = runs.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_cancel);
    }
}
