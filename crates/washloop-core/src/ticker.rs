//! Periodic tick schedule.
//!
//! Ticks sit on a fixed grid `origin + k * period`. When the consumer falls
//! behind, the next tick is due immediately and every other missed tick is
//! dropped, so at most one tick is ever pending. A tick that would fall past
//! the end of the clock's range never comes.

use std::time::{Duration, Instant};

const NANOS_PER_SEC: u128 = 1_000_000_000;

#[derive(Clone, Copy, Debug)]
pub struct Ticker {
    period: Duration,
    next: Option<Instant>,
}

impl Ticker {
    /// Creates a ticker whose first tick is one period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        debug_assert!(!period.is_zero());
        Self {
            period,
            next: now.checked_add(period),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the pending tick is due, or `None` if no further tick can be
    /// scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Consumes the pending tick at `now` and schedules the following one.
    ///
    /// Returns how many grid ticks were dropped because they fell due while
    /// the consumer was busy.
    pub fn advance(&mut self, now: Instant) -> u64 {
        let Some(next) = self.next.and_then(|next| next.checked_add(self.period)) else {
            self.next = None;
            return 0;
        };
        if next > now {
            self.next = Some(next);
            return 0;
        }

        let period = self.period.as_nanos();
        let behind = (now - next).as_nanos();
        let missed = behind / period + 1;
        // first grid point strictly after `now`
        let ahead = from_nanos(period - behind % period);
        self.next = now.checked_add(ahead);

        u64::try_from(missed).unwrap_or(u64::MAX)
    }
}

fn from_nanos(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_millis(10);

    #[test]
    fn first_tick_is_one_period_out() {
        let origin = Instant::now();
        let ticker = Ticker::new(T, origin);
        assert_eq!(ticker.deadline(), Some(origin + T));
        assert_eq!(ticker.period(), T);
    }

    #[test]
    fn on_time_consumer_stays_on_grid() {
        let origin = Instant::now();
        let mut ticker = Ticker::new(T, origin);
        for k in 1..=5u32 {
            // woke slightly late, but before the next grid point
            let now = origin + T * k + Duration::from_millis(3);
            assert_eq!(ticker.advance(now), 0);
            assert_eq!(ticker.deadline(), Some(origin + T * (k + 1)));
        }
    }

    #[test]
    fn slow_consumer_drops_missed_ticks() {
        let origin = Instant::now();
        let mut ticker = Ticker::new(T, origin);
        // tick 1 consumed on time
        assert_eq!(ticker.advance(origin + T), 0);
        assert_eq!(ticker.deadline(), Some(origin + T * 2));
        // the step after tick 1 ran until 3.5 periods; tick 2 is pending and
        // fires immediately, tick 3 is dropped
        let now = origin + T * 3 + T / 2;
        assert!(ticker.deadline().unwrap() <= now);
        assert_eq!(ticker.advance(now), 1);
        assert_eq!(ticker.deadline(), Some(origin + T * 4));
    }

    #[test]
    fn exactly_on_grid_counts_as_missed() {
        let origin = Instant::now();
        let mut ticker = Ticker::new(T, origin);
        assert_eq!(ticker.advance(origin + T * 2), 1);
        assert_eq!(ticker.deadline(), Some(origin + T * 3));
    }

    #[test]
    fn huge_backlog_is_dropped_once() {
        let origin = Instant::now();
        let period = Duration::from_nanos(1);
        let mut ticker = Ticker::new(period, origin);
        let now = origin + Duration::from_secs(5);

        // more than u32::MAX ticks fell due while busy
        assert_eq!(ticker.advance(now), 4_999_999_999);
        assert_eq!(ticker.deadline(), Some(now + period));

        // nothing is left pending, so nothing is counted twice
        assert_eq!(ticker.advance(now), 0);
        assert_eq!(ticker.deadline(), Some(now + period * 2));
    }

    #[test]
    fn unschedulable_period_never_ticks() {
        let origin = Instant::now();
        let mut ticker = Ticker::new(Duration::MAX, origin);
        assert_eq!(ticker.deadline(), None);
        assert_eq!(ticker.advance(origin), 0);
        assert_eq!(ticker.deadline(), None);
    }
}
