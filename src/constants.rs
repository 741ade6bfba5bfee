//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// LOGGING DEFAULTS
// =============================================================================

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "algorace=info";

// =============================================================================
// INPUT DEFAULTS
// =============================================================================

/// Default length of the generated input array
pub const DEFAULT_ARRAY_SIZE: usize = 10_000;

/// Default smallest generated value
pub const DEFAULT_MIN_VALUE: i64 = 1;

/// Default largest generated value
pub const DEFAULT_MAX_VALUE: i64 = 100_000;

// =============================================================================
// PROGRESS ESTIMATION DEFAULTS
// =============================================================================

/// Default polling interval of the progress estimator
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Estimated progress never exceeds this until the unit really completes
pub const DEFAULT_PROGRESS_CAP_PERCENT: f64 = 95.0;

/// Assumed cost of one abstract operation, in nanoseconds
pub const DEFAULT_NANOS_PER_OP: f64 = 1.0;

/// Percentage reported once a unit has completed
pub const COMPLETE_PERCENT: f64 = 100.0;

// =============================================================================
// ALGORITHMS
// =============================================================================

/// Registered algorithm names
pub mod algorithm_names {
    pub const BUBBLE_SORT: &str = "Bubble Sort";
    pub const QUICK_SORT: &str = "Quick Sort";
    pub const INSERTION_SORT: &str = "Insertion Sort";
    pub const SEQUENTIAL_SEARCH: &str = "Sequential Search";
    pub const BINARY_SEARCH: &str = "Binary Search";

    /// All standard algorithms, in registration order
    pub const ALL: &[&str] = &[
        BUBBLE_SORT,
        QUICK_SORT,
        INSERTION_SORT,
        SEQUENTIAL_SEARCH,
        BINARY_SEARCH,
    ];
}

/// Race mode identifiers accepted in configuration
pub mod race_modes {
    pub const SORT: &str = "sort";
    pub const SEARCH: &str = "search";
    pub const BOTH: &str = "both";

    /// All supported mode identifiers
    pub const ALL: &[&str] = &[SORT, SEARCH, BOTH];
}

// =============================================================================
// THREAD NAMES
// =============================================================================

/// Prefix for timed unit threads (suffixed with the algorithm name)
pub const UNIT_THREAD_PREFIX: &str = "race-unit";

/// Name of the thread that joins all units
pub const MONITOR_THREAD_NAME: &str = "race-monitor";

/// Name of the progress estimator thread
pub const ESTIMATOR_THREAD_NAME: &str = "race-progress";
