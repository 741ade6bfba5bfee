//! AlgoRace - Concurrent Algorithm Race Engine
//!
//! This library runs classic sorting and searching algorithms against each
//! other on one shared input and reports who finished first.
//!
//! # Features
//!
//! - One OS thread per competing algorithm, started together
//! - Clean wall-clock timing (no instrumentation inside the timed region)
//! - Ranking by ascending elapsed time with a stable tie-break
//! - Process memory delta across the whole race
//! - Decorative progress estimation for front ends
//!
//! # Architecture
//!
//! - **Algorithms**: descriptors, registry and textbook implementations
//! - **Race**: timed units, coordinator, progress estimator, callback sinks
//! - **Models**: race modes, outputs and the serializable report
//! - **Utils**: array generation, memory probe, formatting

pub mod algorithms;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod race;
pub mod utils;

// Re-export commonly used types
pub use algorithms::{Algorithm, AlgorithmRegistry};
pub use config::Config;
pub use error::{RaceError, RaceResult};
pub use models::{AlgorithmOutput, RaceMode, RaceReport, RankEntry};
pub use race::{RaceCoordinator, StartOutcome};
