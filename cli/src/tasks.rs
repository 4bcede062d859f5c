//! Background tasks driving the previews
//!
//! # Lifecycle
//!
//! The REPL spawns the tasks once at startup and again whenever settings are
//! loaded or the preview config changes. Respawning always aborts the previous
//! set first so no stale task keeps mutating replaced state.

use std::time::Duration;

use overlaykit_core::Clock;
use overlaykit_core::types::PreviewConfig;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::context::CliContext;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const ADVANCE_PERIOD: Duration = Duration::from_millis(100);

#[derive(Default)]
pub struct BackgroundTasks {
    /// One-second countdown tick
    pub ticker: Option<JoinHandle<()>>,
    /// Chat hide and goal completion deadlines
    pub scheduler: Option<JoinHandle<()>>,
    /// Synthetic chat messages when auto-feed is on
    pub feeder: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub async fn abort_all(&mut self) {
        for handle in [
            self.ticker.take(),
            self.scheduler.take(),
            self.feeder.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }

    pub fn running(&self) -> usize {
        [&self.ticker, &self.scheduler, &self.feeder]
            .into_iter()
            .filter(|h| h.as_ref().is_some_and(|h| !h.is_finished()))
            .count()
    }
}

pub fn spawn_all(ctx: &CliContext, preview: &PreviewConfig) -> BackgroundTasks {
    let studio = ctx.studio.clone();
    let ticker = tokio::spawn(async move {
        let mut tick = interval(TICK_PERIOD);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        tick.tick().await;
        loop {
            tick.tick().await;
            studio.write().await.countdown.tick();
        }
    });

    let studio = ctx.studio.clone();
    let clock = ctx.clock;
    let scheduler = tokio::spawn(async move {
        let mut tick = interval(ADVANCE_PERIOD);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            studio.write().await.advance(clock.now());
        }
    });

    let feeder = preview.auto_feed.then(|| {
        let studio = ctx.studio.clone();
        let period = Duration::from_secs(preview.mock_message_interval_secs.max(1));
        tokio::spawn(async move {
            let mut tick = interval(period);
            tick.tick().await;
            loop {
                tick.tick().await;
                let mut s = studio.write().await;
                let id = s.feed.generate();
                s.refresh_chat(clock.now());
                tracing::debug!(id, "Generated mock message");
            }
        })
    });

    tracing::debug!(auto_feed = preview.auto_feed, "Spawned background tasks");
    BackgroundTasks {
        ticker: Some(ticker),
        scheduler: Some(scheduler),
        feeder,
    }
}
