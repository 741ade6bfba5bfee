//! Race mode and algorithm output models

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::race_modes;

/// Which set of registered algorithms takes part in a race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceMode {
    /// Every registered sorting algorithm
    SortAll,
    /// Every registered search algorithm (requires a target)
    SearchAll,
    /// Sorts and searches together (requires a target)
    SortAndSearch,
}

impl RaceMode {
    /// Get mode as configuration string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SortAll => race_modes::SORT,
            Self::SearchAll => race_modes::SEARCH,
            Self::SortAndSearch => race_modes::BOTH,
        }
    }

    /// Parse mode from configuration string
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            race_modes::SORT | "sort_all" => Some(Self::SortAll),
            race_modes::SEARCH | "search_all" => Some(Self::SearchAll),
            race_modes::BOTH | "sort_and_search" => Some(Self::SortAndSearch),
            _ => None,
        }
    }

    /// Whether a search target must be supplied when preparing
    pub fn requires_target(&self) -> bool {
        !matches!(self, Self::SortAll)
    }

    pub fn includes_sorts(&self) -> bool {
        matches!(self, Self::SortAll | Self::SortAndSearch)
    }

    pub fn includes_searches(&self) -> bool {
        matches!(self, Self::SearchAll | Self::SortAndSearch)
    }
}

impl fmt::Display for RaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an algorithm produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmOutput {
    /// Sorted private copy of the input
    Sorted(Vec<i64>),
    /// Index of the target in the searched view, `None` when absent
    Found(Option<usize>),
}

impl AlgorithmOutput {
    pub fn as_sorted(&self) -> Option<&[i64]> {
        match self {
            Self::Sorted(values) => Some(values),
            Self::Found(_) => None,
        }
    }

    pub fn as_found(&self) -> Option<Option<usize>> {
        match self {
            Self::Found(index) => Some(*index),
            Self::Sorted(_) => None,
        }
    }
}

impl fmt::Display for AlgorithmOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sorted(values) => write!(f, "{} values sorted", values.len()),
            Self::Found(Some(index)) => write!(f, "found at index {}", index),
            Self::Found(None) => f.write_str("not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(RaceMode::from_config_str("sort"), Some(RaceMode::SortAll));
        assert_eq!(RaceMode::from_config_str(" SEARCH "), Some(RaceMode::SearchAll));
        assert_eq!(RaceMode::from_config_str("both"), Some(RaceMode::SortAndSearch));
        assert_eq!(RaceMode::from_config_str("shuffle"), None);

        for id in race_modes::ALL {
            let mode = RaceMode::from_config_str(id).unwrap();
            assert_eq!(mode.as_str(), *id);
        }
    }

    #[test]
    fn test_mode_requirements() {
        assert!(!RaceMode::SortAll.requires_target());
        assert!(RaceMode::SearchAll.requires_target());
        assert!(RaceMode::SortAndSearch.includes_sorts());
        assert!(RaceMode::SortAndSearch.includes_searches());
        assert!(!RaceMode::SearchAll.includes_sorts());
    }

    #[test]
    fn test_output_display() {
        assert_eq!(AlgorithmOutput::Found(Some(2)).to_string(), "found at index 2");
        assert_eq!(AlgorithmOutput::Found(None).to_string(), "not found");
        assert_eq!(
            AlgorithmOutput::Sorted(vec![1, 2, 3]).to_string(),
            "3 values sorted"
        );
    }
}
