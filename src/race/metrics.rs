//! Result map and ranking

use std::collections::HashMap;
use std::time::Duration;

use crate::models::RankEntry;

/// Completion times keyed by algorithm name
///
/// Shared behind a mutex by the coordinator; every insert happens under that
/// lock, so simultaneous completions never lose an entry.
#[derive(Debug, Default)]
pub struct ResultMap {
    entries: HashMap<&'static str, Recorded>,
}

#[derive(Debug, Clone, Copy)]
struct Recorded {
    /// Registration index, used to break ties
    order: usize,
    elapsed: Duration,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion and return how many algorithms have completed
    pub fn record(&mut self, order: usize, name: &'static str, elapsed: Duration) -> usize {
        self.entries.insert(name, Recorded { order, elapsed });
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<Duration> {
        self.entries.get(name).map(|r| r.elapsed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries by ascending elapsed time, ties by registration order
    pub fn ranking(&self) -> Vec<RankEntry> {
        let mut recorded: Vec<(&'static str, Recorded)> =
            self.entries.iter().map(|(name, r)| (*name, *r)).collect();
        recorded.sort_by_key(|(_, r)| (r.elapsed, r.order));
        recorded
            .into_iter()
            .map(|(name, r)| RankEntry {
                name,
                elapsed: r.elapsed,
            })
            .collect()
    }

    /// Fastest entry so far
    pub fn winner(&self) -> Option<RankEntry> {
        self.entries
            .iter()
            .min_by_key(|(_, r)| (r.elapsed, r.order))
            .map(|(name, r)| RankEntry {
                name: *name,
                elapsed: r.elapsed,
            })
    }
}
