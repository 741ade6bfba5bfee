//! Binary search

use std::cmp::Ordering;

use super::{Algorithm, Complexity};
use crate::constants::algorithm_names::BINARY_SEARCH;

/// Get descriptor for binary search (needs the race's sorted view)
pub fn descriptor() -> Algorithm {
    Algorithm::search(BINARY_SEARCH, search, Complexity::Logarithmic, true)
}

/// Halve the candidate range of a sorted slice until `target` is hit.
///
/// With duplicates any matching index may be returned.
pub fn search(data: &[i64], target: i64) -> Option<usize> {
    let mut low = 0;
    let mut high = data.len();
    while low < high {
        let mid = low + (high - low) / 2;
        match data[mid].cmp(&target) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
        }
    }
    None
}
