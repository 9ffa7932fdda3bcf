//! Latest-value slots shared between the loop thread and callers.
//!
//! Each slot has its own lock, held only while a value is copied in or
//! out. Writing the motion never waits on a reader of the position and
//! vice versa.

use crate::motion::Motion;
use parking_lot::Mutex;

/// A single value that is replaced as a whole.
#[derive(Debug, Default)]
pub struct Slot<T> {
    value: Mutex<T>,
}

impl<T: Clone> Slot<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    pub fn store(&self, value: T) {
        // Drop the previous value outside the lock.
        let previous = std::mem::replace(&mut *self.value.lock(), value);
        drop(previous);
    }

    pub fn load(&self) -> T {
        self.value.lock().clone()
    }
}

/// The current motion input and the current position output.
#[derive(Debug, Default)]
pub struct SharedState<P> {
    motion: Slot<Motion>,
    position: Slot<P>,
}

impl<P: Clone + Default> SharedState<P> {
    pub fn new() -> Self {
        Self {
            motion: Slot::new(Motion::default()),
            position: Slot::new(P::default()),
        }
    }

    pub fn set_motion(&self, motion: Motion) {
        self.motion.store(motion);
    }

    /// Returns the last stored motion, or the zero motion if none was set.
    pub fn get_motion(&self) -> Motion {
        self.motion.load()
    }

    pub fn set_position(&self, position: P) {
        self.position.store(position);
    }

    /// Returns the last stored position, or `P::default()` before the first one.
    pub fn get_position(&self) -> P {
        self.position.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Vector;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread,
    };

    fn uniform(v: f64) -> Motion {
        Motion::new(Vector::new(v, v, v), Vector::new(v, v, v))
    }

    #[test]
    fn defaults_before_first_write() {
        let state = SharedState::<(f64, f64)>::new();
        assert_eq!(state.get_motion(), Motion::default());
        assert_eq!(state.get_position(), (0.0, 0.0));
    }

    #[test]
    fn last_write_wins() {
        let state = SharedState::<u32>::new();
        state.set_motion(uniform(1.0));
        state.set_motion(uniform(2.0));
        state.set_position(7);
        state.set_position(9);
        assert_eq!(state.get_motion(), uniform(2.0));
        assert_eq!(state.get_position(), 9);
    }

    #[test]
    fn concurrent_reads_never_observe_torn_motion() {
        let state = Arc::new(SharedState::<[f64; 6]>::new());
        let done = Arc::new(AtomicBool::new(false));

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let state = state.clone();
                thread::spawn(move || {
                    for i in 0..5_000 {
                        let v = (w * 10_000 + i) as f64;
                        state.set_motion(uniform(v));
                        state.set_position([v; 6]);
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let state = state.clone();
                let done = done.clone();
                thread::spawn(move || {
                    let mut reads = 0u64;
                    while !done.load(Ordering::Relaxed) || reads == 0 {
                        let components = state.get_motion().components();
                        assert!(components.iter().all(|c| *c == components[0]));
                        let position = state.get_position();
                        assert!(position.iter().all(|c| *c == position[0]));
                        reads += 1;
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Relaxed);
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
