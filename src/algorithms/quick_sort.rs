//! Quick sort
//!
//! Three-way partitioning around the last element, so runs of equal values
//! are settled in one pass. Recursion always descends into the smaller side
//! and loops over the larger one, keeping stack depth logarithmic even on
//! already-sorted input.

use super::{Algorithm, Complexity};
use crate::constants::algorithm_names::QUICK_SORT;

/// Get descriptor for quick sort
pub fn descriptor() -> Algorithm {
    Algorithm::sort(QUICK_SORT, sort, Complexity::Linearithmic).with_cost_factor(2.0)
}

/// Sort in place; the larger partition is handled iteratively.
pub fn sort(data: &mut [i64]) {
    let mut rest = data;
    while rest.len() > 1 {
        let current = std::mem::take(&mut rest);
        let (lt, gt) = partition(current);
        let (left, tail) = current.split_at_mut(lt);
        let right = &mut tail[gt - lt..];
        if left.len() < right.len() {
            sort(left);
            rest = right;
        } else {
            sort(right);
            rest = left;
        }
    }
}

/// Returns `(lt, gt)` such that `data[..lt] < pivot`, `data[lt..gt] == pivot`
/// and `data[gt..] > pivot`.
fn partition(data: &mut [i64]) -> (usize, usize) {
    let pivot = data[data.len() - 1];
    let mut lt = 0;
    let mut i = 0;
    let mut gt = data.len();
    while i < gt {
        if data[i] < pivot {
            data.swap(lt, i);
            lt += 1;
            i += 1;
        } else if data[i] > pivot {
            gt -= 1;
            data.swap(i, gt);
        } else {
            i += 1;
        }
    }
    (lt, gt)
}
