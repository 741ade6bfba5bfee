//! Insertion sort

use super::{Algorithm, Complexity};
use crate::constants::algorithm_names::INSERTION_SORT;

/// Get descriptor for insertion sort
pub fn descriptor() -> Algorithm {
    Algorithm::sort(INSERTION_SORT, sort, Complexity::Quadratic).with_cost_factor(0.5)
}

/// Shift each element left until it sits after a smaller-or-equal one.
pub fn sort(data: &mut [i64]) {
    for i in 1..data.len() {
        let key = data[i];
        let mut j = i;
        while j > 0 && data[j - 1] > key {
            data[j] = data[j - 1];
            j -= 1;
        }
        data[j] = key;
    }
}
