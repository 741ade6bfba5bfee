//! Domain models
//!
//! This module contains the race modes, algorithm outputs and the report
//! handed to front ends when a race finishes.

pub mod race;
pub mod report;

pub use race::*;
pub use report::*;
