//! Configuration for sparse matrix policy.

pub mod options;
pub use options::{SparseOptions, SPARSE_ELEMENT_THRESHOLD};
