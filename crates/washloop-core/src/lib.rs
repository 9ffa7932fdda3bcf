//! Fixed-interval control loop that feeds the latest motion sample through
//! a caller-supplied washout filter and publishes the resulting position.
//!
//! The crate owns the scheduling and the thread-safe exchange of values
//! only. The filter math lives with whoever implements [`Filter`].

pub mod filter;
pub mod motion;
pub mod signal;
pub mod store;
pub mod ticker;
pub mod washloop;

pub use filter::{Filter, FilterFn, filter_fn};
pub use motion::{Motion, Vector};
pub use store::{SharedState, Slot};
pub use washloop::{LoopError, LoopState, LoopStats, WashoutLoop};
