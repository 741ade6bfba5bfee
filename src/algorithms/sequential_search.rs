//! Sequential search

use super::{Algorithm, Complexity};
use crate::constants::algorithm_names::SEQUENTIAL_SEARCH;

/// Get descriptor for sequential search (searches the original order)
pub fn descriptor() -> Algorithm {
    Algorithm::search(SEQUENTIAL_SEARCH, search, Complexity::Linear, false)
}

/// Index of the first occurrence of `target`.
pub fn search(data: &[i64], target: i64) -> Option<usize> {
    data.iter().position(|&value| value == target)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_search_scenario() {
        assert_eq!(search(&[10, 20, 30, 40, 50], 30), Some(2));
        assert_eq!(search(&[10, 20, 30, 40, 50], 999), None);
    }

    #[test]
    fn test_search_unsorted_first_occurrence() {
        assert_eq!(search(&[7, 3, 9, 3, 1], 3), Some(1));
        assert_eq!(search(&[], 3), None);
    }

    #[test]
    fn test_search_random_present_and_absent() {
        let mut rng = StdRng::seed_from_u64(11);
        let data: Vec<i64> = (0..500).map(|_| rng.random_range(-100..100)).collect();

        for _ in 0..200 {
            let target = data[rng.random_range(0..data.len())];
            let index = search(&data, target).unwrap();
            assert_eq!(data[index], target);
            assert!(!data[..index].contains(&target));
        }
        assert_eq!(search(&data, 1_000), None);
        assert_eq!(search(&data, -1_000), None);
    }
}
