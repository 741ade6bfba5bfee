//! Race execution engine
//!
//! A race runs every selected algorithm on its own OS thread over one shared
//! input:
//!
//! 1. **Timed units** (`unit.rs`): one algorithm call each, measured with a
//!    monotonic clock and nothing else inside the timed region.
//! 2. **Coordinator** (`coordinator.rs`): prepares the units, starts them
//!    together, joins them on a monitor thread and publishes the report.
//! 3. **Progress estimator** (`progress.rs`): a decorative observer that
//!    extrapolates percentages from elapsed time and never touches results.

pub mod coordinator;
pub mod events;
pub mod metrics;
pub mod progress;
pub mod unit;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use coordinator::{RaceCoordinator, StartOutcome};
pub use events::{
    ChannelSink, RaceCompleteSink, RaceEvent, UnitProgressSink, VisualProgressSink,
};
pub use metrics::ResultMap;
pub use progress::ProgressEstimator;
pub use unit::{TimedUnit, UnitPhase, UnitWatch};

/// Lock a mutex, recovering the guard if another thread panicked while
/// holding it. Every guarded value is replaced by single assignments, so a
/// poisoned lock never exposes half-written state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
