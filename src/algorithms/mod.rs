//! Algorithm descriptors and the textbook implementations that race
//!
//! Each algorithm lives in its own module and exposes a `descriptor()`
//! returning the [`Algorithm`] the coordinator registers.

pub mod binary_search;
pub mod bubble_sort;
pub mod insertion_sort;
pub mod quick_sort;
pub mod registry;
pub mod sequential_search;

pub use registry::AlgorithmRegistry;

/// In-place sort over a private copy of the input
pub type SortFn = fn(&mut [i64]);

/// Search returning the index of `target`, `None` when absent
pub type SearchFn = fn(&[i64], i64) -> Option<usize>;

/// How an algorithm is invoked
#[derive(Debug, Clone, Copy)]
pub enum AlgorithmKind {
    Sort(SortFn),
    Search {
        run: SearchFn,
        /// Needs the race's shared sorted view instead of the original order
        requires_sorted: bool,
    },
}

/// Asymptotic cost class, used only to estimate visual progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
}

impl Complexity {
    /// Abstract operation count for an input of `n` elements
    pub fn operations(&self, n: usize) -> f64 {
        let n = n.max(1) as f64;
        let log_n = n.log2().max(1.0);
        match self {
            Self::Logarithmic => log_n,
            Self::Linear => n,
            Self::Linearithmic => n * log_n,
            Self::Quadratic => n * n,
        }
    }
}

/// Descriptor of one competing algorithm
#[derive(Debug, Clone, Copy)]
pub struct Algorithm {
    name: &'static str,
    kind: AlgorithmKind,
    complexity: Complexity,
    cost_factor: f64,
}

impl Algorithm {
    /// Describe a sorting algorithm
    pub fn sort(name: &'static str, run: SortFn, complexity: Complexity) -> Self {
        Self {
            name,
            kind: AlgorithmKind::Sort(run),
            complexity,
            cost_factor: 1.0,
        }
    }

    /// Describe a search algorithm
    pub fn search(
        name: &'static str,
        run: SearchFn,
        complexity: Complexity,
        requires_sorted: bool,
    ) -> Self {
        Self {
            name,
            kind: AlgorithmKind::Search {
                run,
                requires_sorted,
            },
            complexity,
            cost_factor: 1.0,
        }
    }

    /// Constant-factor multiplier of the cost heuristic (1.0 = nominal, higher = slower)
    pub fn with_cost_factor(mut self, cost_factor: f64) -> Self {
        self.cost_factor = cost_factor;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.kind
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    pub fn cost_factor(&self) -> f64 {
        self.cost_factor
    }

    pub fn is_sort(&self) -> bool {
        matches!(self.kind, AlgorithmKind::Sort(_))
    }

    pub fn is_search(&self) -> bool {
        matches!(self.kind, AlgorithmKind::Search { .. })
    }

    pub fn requires_sorted(&self) -> bool {
        matches!(
            self.kind,
            AlgorithmKind::Search {
                requires_sorted: true,
                ..
            }
        )
    }
}

/// Check if a slice is sorted in ascending order.
pub fn is_sorted(data: &[i64]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}
