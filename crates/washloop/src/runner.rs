//! Runs one loop instance end to end: feed in, positions out, stop, report.

use crate::{
    config::Config,
    feed::{self, SineFeed},
    gain::{GainFilter, Pose},
};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::{sync::Arc, thread, time::Instant};
use washloop_core::{Filter, Motion, WashoutLoop, signal::StopSignal, ticker::Ticker};

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Position after the last completed step
    pub position: Pose,
    /// Motion sample that was current when the loop stopped
    pub last_motion: Motion,
    pub steps: u64,
    pub missed_ticks: u64,
    pub mean_step_us: u128,
    pub max_step_us: u128,
    /// Motion samples published by the feed
    pub samples: u64,
}

/// Stops the loop and the feed when dropped, so an early return cannot leave
/// either thread running.
struct StopGuard<F: Filter> {
    washloop: Arc<WashoutLoop<F>>,
    feed: Arc<StopSignal>,
}

impl<F: Filter> Drop for StopGuard<F> {
    fn drop(&mut self) {
        self.washloop.stop();
        self.feed.fire();
    }
}

pub fn run(config: &Config) -> Result<RunSummary> {
    let filter = GainFilter::new(config.filter.gain, config.filter.limit);
    let washloop = Arc::new(
        WashoutLoop::new(filter, config.interval()).context("failed to create washout loop")?,
    );

    let feed_stop = Arc::new(StopSignal::new());
    let guard = StopGuard {
        washloop: washloop.clone(),
        feed: feed_stop.clone(),
    };
    let feed_handle = feed::spawn(
        washloop.clone(),
        SineFeed::from(&config.feed),
        config.feed_period(),
        feed_stop.clone(),
    )
    .context("failed to spawn motion feed")?;
    let loop_handle = washloop.spawn().context("failed to spawn loop thread")?;

    tracing::info!(
        "Running for {} ms with a {} ms interval",
        config.run_ms,
        config.washloop.interval_ms
    );

    let started = Instant::now();
    let deadline = started.checked_add(config.run_time());
    let mut report = Ticker::new(config.report_period(), started);
    while !loop_handle.is_finished() {
        let wake = match (report.deadline(), deadline) {
            (Some(report), Some(deadline)) => Some(report.min(deadline)),
            (report, deadline) => report.or(deadline),
        };
        match wake {
            Some(wake) => thread::sleep(wake.saturating_duration_since(Instant::now())),
            None => thread::sleep(config.report_period()),
        }

        let now = Instant::now();
        if deadline.is_some_and(|deadline| now >= deadline) {
            break;
        }
        if report.deadline().is_some_and(|due| now >= due) {
            report.advance(now);
            let pose = washloop.get_position();
            tracing::info!(
                x = pose.x,
                y = pose.y,
                z = pose.z,
                roll = pose.roll,
                pitch = pose.pitch,
                yaw = pose.yaw,
                "position"
            );
        }
    }

    drop(guard);

    let samples = feed_handle
        .join()
        .map_err(|_| anyhow!("motion feed thread panicked"))?;
    loop_handle
        .join()
        .map_err(|_| anyhow!("washout loop thread panicked"))?
        .context("washout loop failed")?;

    let stats = washloop.stats();
    let summary = RunSummary {
        position: washloop.get_position(),
        last_motion: washloop.get_motion(),
        steps: stats.steps,
        missed_ticks: stats.missed_ticks,
        mean_step_us: stats.mean_step().as_micros(),
        max_step_us: stats.max_step.as_micros(),
        samples,
    };
    tracing::info!(
        steps = summary.steps,
        missed_ticks = summary.missed_ticks,
        samples = summary.samples,
        elapsed = ?started.elapsed(),
        "Run complete"
    );

    Ok(summary)
}
