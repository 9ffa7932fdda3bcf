//! The fixed-interval loop driving a [`Filter`].
//!
//! `start` blocks the calling thread for the lifetime of the loop: it runs
//! one filter step right away and then one per tick until `stop` is called
//! from another thread or the filter fails. Motion and position are
//! exchanged through [`SharedState`], whose locks are never held while the
//! filter runs.

use crate::{
    filter::Filter,
    motion::Motion,
    signal::StopSignal,
    store::SharedState,
    ticker::Ticker,
};
use parking_lot::Mutex;
use std::{
    fmt,
    sync::Arc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoopError<E> {
    #[error("loop interval must be greater than zero")]
    ZeroInterval,
    #[error("loop is already running")]
    AlreadyRunning,
    #[error("loop has been stopped and cannot be restarted")]
    Stopped,
    #[error("filter failed on step {step}")]
    Filter {
        step: u64,
        #[source]
        source: E,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopState::Idle => "idle",
            LoopState::Running => "running",
            LoopState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Step timing collected while the loop runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Completed filter steps.
    pub steps: u64,
    /// Ticks dropped because a step overran the interval.
    pub missed_ticks: u64,
    pub last_step: Duration,
    pub max_step: Duration,
    pub total_step: Duration,
}

impl LoopStats {
    fn record(&mut self, elapsed: Duration) {
        self.steps += 1;
        self.last_step = elapsed;
        self.max_step = self.max_step.max(elapsed);
        self.total_step += elapsed;
    }

    /// Average step duration (zero before the first step).
    pub fn mean_step(&self) -> Duration {
        match u32::try_from(self.steps) {
            Ok(0) => Duration::ZERO,
            Ok(steps) => self.total_step / steps,
            Err(_) => Duration::from_secs_f64(self.total_step.as_secs_f64() / self.steps as f64),
        }
    }
}

pub struct WashoutLoop<F: Filter> {
    interval: Duration,
    filter: Mutex<F>,
    shared: SharedState<F::Position>,
    state: Mutex<LoopState>,
    stop: StopSignal,
    stats: Mutex<LoopStats>,
}

impl<F: Filter> WashoutLoop<F> {
    /// Creates an idle loop that will call `filter` every `interval`.
    ///
    /// An interval too long to schedule on the monotonic clock is accepted;
    /// such a loop runs its first step and then waits only for `stop`.
    pub fn new(filter: F, interval: Duration) -> Result<Self, LoopError<F::Error>> {
        if interval.is_zero() {
            return Err(LoopError::ZeroInterval);
        }

        Ok(Self {
            interval,
            filter: Mutex::new(filter),
            shared: SharedState::new(),
            state: Mutex::new(LoopState::Idle),
            stop: StopSignal::new(),
            stats: Mutex::new(LoopStats::default()),
        })
    }

    /// Creates an idle loop with an interval in whole milliseconds.
    pub fn from_millis(filter: F, interval_ms: u64) -> Result<Self, LoopError<F::Error>> {
        Self::new(filter, Duration::from_millis(interval_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> LoopState {
        *self.state.lock()
    }

    pub fn stats(&self) -> LoopStats {
        *self.stats.lock()
    }

    /// Replaces the motion used by the next filter step.
    pub fn set_motion(&self, motion: Motion) {
        self.shared.set_motion(motion);
    }

    pub fn get_motion(&self) -> Motion {
        self.shared.get_motion()
    }

    /// The position produced by the most recently completed step, or the
    /// default position if no step has completed yet.
    pub fn get_position(&self) -> F::Position {
        self.shared.get_position()
    }

    /// Runs the loop on the calling thread until [`stop`](Self::stop) is
    /// called or the filter fails.
    ///
    /// A loop runs at most once. After `start` returns the loop is stopped
    /// for good; build a new one to run again.
    pub fn start(&self) -> Result<(), LoopError<F::Error>> {
        {
            let mut state = self.state.lock();
            match *state {
                LoopState::Idle if self.stop.is_fired() => {
                    *state = LoopState::Stopped;
                    return Err(LoopError::Stopped);
                }
                LoopState::Idle => *state = LoopState::Running,
                LoopState::Running => return Err(LoopError::AlreadyRunning),
                LoopState::Stopped => return Err(LoopError::Stopped),
            }
        }

        tracing::info!(interval = ?self.interval, "washout loop started");
        let result = self.run();
        *self.state.lock() = LoopState::Stopped;

        match &result {
            Ok(()) => tracing::info!(stats = ?self.stats(), "washout loop stopped"),
            Err(err) => tracing::error!(error = %err, stats = ?self.stats(), "washout loop failed"),
        }

        result
    }

    /// Asks a running loop to return from [`start`](Self::start).
    ///
    /// A step already in progress completes and its position is stored
    /// first. Stopping an idle loop prevents it from ever starting. Calling
    /// `stop` again has no effect.
    pub fn stop(&self) {
        if !self.stop.fire() {
            tracing::debug!("washout loop already stopped");
            return;
        }
        let mut state = self.state.lock();
        if *state == LoopState::Idle {
            *state = LoopState::Stopped;
        }
    }

    fn run(&self) -> Result<(), LoopError<F::Error>> {
        let mut ticker = Ticker::new(self.interval, Instant::now());
        self.step()?;

        loop {
            if self.stop.wait_until(ticker.deadline()) {
                return Ok(());
            }

            let missed = ticker.advance(Instant::now());
            if missed > 0 {
                let mut stats = self.stats.lock();
                stats.missed_ticks = stats.missed_ticks.saturating_add(missed);
                drop(stats);
                tracing::warn!(missed, interval = ?self.interval, "filter step overran the loop interval");
            }

            self.step()?;
        }
    }

    fn step(&self) -> Result<(), LoopError<F::Error>> {
        let motion = self.shared.get_motion();
        let [ax, ay, az, wx, wy, wz] = motion.components();

        let started = Instant::now();
        let position = {
            let mut filter = self.filter.lock();
            filter.filter(ax, ay, az, wx, wy, wz)
        };
        let elapsed = started.elapsed();

        // Only this thread records steps, so the count cannot move under us.
        let step = self.stats.lock().steps + 1;
        let position = position.map_err(|source| LoopError::Filter { step, source })?;
        self.shared.set_position(position);
        self.stats.lock().record(elapsed);

        tracing::trace!(step, ?elapsed, "filter step");
        Ok(())
    }
}

impl<F: Filter + 'static> WashoutLoop<F> {
    /// Runs [`start`](Self::start) on a dedicated thread.
    pub fn spawn(
        self: &Arc<Self>,
    ) -> std::io::Result<JoinHandle<Result<(), LoopError<F::Error>>>> {
        let this = Arc::clone(self);
        thread::Builder::new()
            .name("washloop".to_string())
            .spawn(move || this.start())
    }
}

impl<F: Filter> fmt::Debug for WashoutLoop<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WashoutLoop")
            .field("interval", &self.interval)
            .field("state", &self.state())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
