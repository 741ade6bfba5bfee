//! Custom error types and handling
//!
//! This module defines the race engine's error type. A double `start()` is
//! deliberately absent here: it is reported as a [`StartOutcome`] instead.
//!
//! [`StartOutcome`]: crate::race::StartOutcome

use crate::config::ConfigError;

/// Engine-wide error type
#[derive(Debug, thiserror::Error)]
pub enum RaceError {
    // Preparation errors
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No input array loaded")]
    NoInput,

    #[error("A race is already in progress")]
    RaceInProgress,

    // Execution errors
    #[error("Algorithm '{name}' faulted: {message}")]
    AlgorithmFault { name: &'static str, message: String },

    #[error("Failed to spawn {what} thread: {source}")]
    Spawn {
        what: String,
        #[source]
        source: std::io::Error,
    },

    // Environment errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl RaceError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            Self::NoInput => "NO_INPUT",
            Self::RaceInProgress => "RACE_IN_PROGRESS",
            Self::AlgorithmFault { .. } => "ALGORITHM_FAULT",
            Self::Spawn { .. } => "SPAWN_FAILED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether the error belongs to a single unit and leaves the race intact
    pub fn is_unit_local(&self) -> bool {
        matches!(self, Self::AlgorithmFault { .. })
    }
}

/// Result type alias for engine operations
pub type RaceResult<T> = Result<T, RaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RaceError::NoInput.error_code(), "NO_INPUT");
        assert_eq!(
            RaceError::InvalidConfiguration("missing target".to_string()).error_code(),
            "INVALID_CONFIGURATION"
        );
        let fault = RaceError::AlgorithmFault {
            name: "Quick Sort",
            message: "boom".to_string(),
        };
        assert_eq!(fault.error_code(), "ALGORITHM_FAULT");
        assert!(fault.is_unit_local());
        assert!(!RaceError::RaceInProgress.is_unit_local());
    }

    #[test]
    fn test_fault_message() {
        let fault = RaceError::AlgorithmFault {
            name: "Bubble Sort",
            message: "index out of bounds".to_string(),
        };
        assert_eq!(
            fault.to_string(),
            "Algorithm 'Bubble Sort' faulted: index out of bounds"
        );
    }
}
