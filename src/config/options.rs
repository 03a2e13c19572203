//! Tunable policy for sparse matrices.
//!
//! This module provides the `SparseOptions` struct, which carries the knobs that
//! change *how* a sparse matrix does its work without changing what it computes.
//! Currently this is the element-count threshold that selects between the shallow
//! and the exact (per-line deep copy) clone paths.

use std::fmt;

/// Default element count below which `clone` takes the shallow path.
pub const SPARSE_ELEMENT_THRESHOLD: u64 = 1000;

/// Sparse matrix policy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseOptions {
    /// Matrices with fewer than this many logical elements are cloned shallowly
    pub clone_threshold: u64,
}

impl SparseOptions {
    pub fn new(clone_threshold: u64) -> Self {
        Self { clone_threshold }
    }

    /// True when a matrix of `rows x cols` should take the exact clone path.
    pub fn wants_exact_clone(&self, rows: usize, cols: usize) -> bool {
        (rows as u64) * (cols as u64) >= self.clone_threshold
    }
}

impl Default for SparseOptions {
    fn default() -> Self {
        Self::new(SPARSE_ELEMENT_THRESHOLD)
    }
}

impl fmt::Display for SparseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SparseOptions(clone_threshold={})", self.clone_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary() {
        let opts = SparseOptions::default();
        assert!(!opts.wants_exact_clone(10, 99));
        assert!(opts.wants_exact_clone(10, 100));
        assert!(opts.wants_exact_clone(1000, 1));
    }

    #[test]
    fn display_names_threshold() {
        let s = format!("{}", SparseOptions::new(42));
        assert!(s.contains("clone_threshold=42"));
    }
}
