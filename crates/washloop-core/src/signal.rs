//! One-shot stop signal observed by the loop between ticks.

use parking_lot::{Condvar, Mutex};
use std::time::Instant;

#[derive(Debug, Default)]
pub struct StopSignal {
    fired: Mutex<bool>,
    cond: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal and wakes every waiter.
    ///
    /// Returns `true` only for the call that actually fired it.
    pub fn fire(&self) -> bool {
        let mut fired = self.fired.lock();
        if *fired {
            return false;
        }
        *fired = true;
        self.cond.notify_all();
        true
    }

    pub fn is_fired(&self) -> bool {
        *self.fired.lock()
    }

    /// Blocks until the signal fires.
    pub fn wait(&self) {
        let mut fired = self.fired.lock();
        while !*fired {
            self.cond.wait(&mut fired);
        }
    }

    /// Blocks until the signal fires or `deadline` passes, or until it fires
    /// if there is no deadline.
    ///
    /// Returns `true` if the signal has fired. A deadline already in the past
    /// returns immediately.
    pub fn wait_until(&self, deadline: Option<Instant>) -> bool {
        let Some(deadline) = deadline else {
            self.wait();
            return true;
        };
        let mut fired = self.fired.lock();
        while !*fired {
            if self.cond.wait_until(&mut fired, deadline).timed_out() {
                break;
            }
        }
        *fired
    }
}
