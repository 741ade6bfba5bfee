//! Algorithm registry
//!
//! Registration order matters: it is the tie-break when two algorithms
//! finish with identical elapsed times.

use crate::error::{RaceError, RaceResult};

use super::{
    Algorithm, binary_search, bubble_sort, insertion_sort, quick_sort, sequential_search,
};

/// Ordered set of uniquely named algorithms
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: Vec<Algorithm>,
}

impl AlgorithmRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard sorts and searches
    pub fn standard() -> Self {
        Self {
            algorithms: vec![
                bubble_sort::descriptor(),
                quick_sort::descriptor(),
                insertion_sort::descriptor(),
                sequential_search::descriptor(),
                binary_search::descriptor(),
            ],
        }
    }

    /// Register an algorithm; names must be unique
    pub fn register(&mut self, algorithm: Algorithm) -> RaceResult<()> {
        if self.find(algorithm.name()).is_some() {
            return Err(RaceError::InvalidConfiguration(format!(
                "Algorithm '{}' is already registered",
                algorithm.name()
            )));
        }
        self.algorithms.push(algorithm);
        Ok(())
    }

    /// Find algorithm by name
    pub fn find(&self, name: &str) -> Option<&Algorithm> {
        self.algorithms.iter().find(|a| a.name() == name)
    }

    /// All registered algorithms, in registration order
    pub fn all(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn sorting(&self) -> impl Iterator<Item = &Algorithm> {
        self.algorithms.iter().filter(|a| a.is_sort())
    }

    pub fn searching(&self) -> impl Iterator<Item = &Algorithm> {
        self.algorithms.iter().filter(|a| a.is_search())
    }

    /// List algorithm names
    pub fn names(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::Complexity;
    use crate::constants::algorithm_names;

    #[test]
    fn test_standard_registration_order() {
        let registry = AlgorithmRegistry::standard();
        assert_eq!(registry.names(), algorithm_names::ALL);
        assert_eq!(registry.sorting().count(), 3);
        assert_eq!(registry.searching().count(), 2);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = AlgorithmRegistry::standard();
        let duplicate = Algorithm::sort(
            algorithm_names::QUICK_SORT,
            bubble_sort::sort,
            Complexity::Quadratic,
        );
        let err = registry.register(duplicate).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_find() {
        let registry = AlgorithmRegistry::standard();
        assert!(registry.find("Binary Search").is_some());
        assert!(registry.find("Bogo Sort").is_none());
        assert!(AlgorithmRegistry::new().is_empty());
    }
}
