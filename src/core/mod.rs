//! Core traits and dense wrappers.

pub mod traits;
pub mod wrappers;

pub use traits::{Access, FastColumns, FastRows, MatShape, MatTransVec, MatVec, MatrixAccess, MatrixGet};
