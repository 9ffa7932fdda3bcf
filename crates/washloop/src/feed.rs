//! Simulated motion producer.

use crate::config::FeedConfig;
use std::{
    f64::consts::TAU,
    sync::Arc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};
use washloop_core::{Filter, Motion, Vector, WashoutLoop, signal::StopSignal, ticker::Ticker};

/// Sinusoidal motion: surge and sway in quadrature, a slow heave, and yaw
/// following surge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineFeed {
    pub amplitude: f64,
    pub frequency_hz: f64,
}

impl From<&FeedConfig> for SineFeed {
    fn from(config: &FeedConfig) -> Self {
        Self {
            amplitude: config.amplitude,
            frequency_hz: config.frequency_hz,
        }
    }
}

impl SineFeed {
    /// The motion sample at `t` seconds since the feed started.
    pub fn sample(&self, t: f64) -> Motion {
        let phase = TAU * self.frequency_hz * t;
        let a = self.amplitude;
        Motion::new(
            Vector::new(a * phase.sin(), a * phase.cos(), 0.5 * a * (0.5 * phase).sin()),
            Vector::new(0.0, 0.0, a * phase.sin()),
        )
    }
}

/// Publishes a new sample into `washloop` every `period` until `stop` fires.
///
/// The thread returns how many samples it published.
pub fn spawn<F>(
    washloop: Arc<WashoutLoop<F>>,
    feed: SineFeed,
    period: Duration,
    stop: Arc<StopSignal>,
) -> std::io::Result<JoinHandle<u64>>
where
    F: Filter + 'static,
{
    thread::Builder::new()
        .name("washloop-feed".to_string())
        .spawn(move || {
            let origin = Instant::now();
            let mut ticker = Ticker::new(period, origin);
            let mut published = 0u64;
            loop {
                washloop.set_motion(feed.sample(origin.elapsed().as_secs_f64()));
                published += 1;

                if stop.wait_until(ticker.deadline()) {
                    break;
                }
                ticker.advance(Instant::now());
            }
            tracing::debug!(published, "motion feed stopped");
            published
        })
}
