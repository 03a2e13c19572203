//! colsparse: sparse column/row matrices with shared transpose views, and composable ops
//!
//! This crate provides two cooperating pieces of a linear-algebra stack:
//! - [`SparseColumnMatrix`] / [`SparseRowMatrix`]: matrices stored as sequences of
//!   individually sparse lines, where an absent line is the zero line and transposition
//!   is an O(1) view over the same storage.
//! - [`Op`]: scalar functions with derivative, inverse and range metadata, composed
//!   symbolically through [`compose`] and applied elementwise with `apply_op`.
//!
//! Dense interop goes through `faer::Mat<f64>`.

pub mod config;
pub mod core;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod vector;

// Re-exports for convenience
pub use self::config::*;
pub use self::core::*;
pub use self::error::*;
pub use self::matrix::*;
pub use self::ops::{compose, op, product, sum, ComposedOp, Op, OpExt, OpRef};
pub use self::vector::{SparseVector, Vector};
