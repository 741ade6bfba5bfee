//! Bubble sort

use super::{Algorithm, Complexity};
use crate::constants::algorithm_names::BUBBLE_SORT;

/// Get descriptor for bubble sort
pub fn descriptor() -> Algorithm {
    Algorithm::sort(BUBBLE_SORT, sort, Complexity::Quadratic).with_cost_factor(1.5)
}

/// Repeatedly swap adjacent out-of-order pairs; stops early on a clean pass.
pub fn sort(data: &mut [i64]) {
    let n = data.len();
    for i in 0..n {
        let mut swapped = false;
        for j in 0..n - i - 1 {
            if data[j] > data[j + 1] {
                data.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}
