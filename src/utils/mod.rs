//! Utility functions

pub mod array;
pub mod format;
pub mod memory;

pub use array::{generate_array, pick_target};
pub use format::{format_elapsed, format_memory_mb, render_bar};
pub use memory::{MemoryProbe, ProcessMemory, current_memory_mb};
