use thiserror::Error;

// Unified error type for colsparse

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SparseError {
    #[error("incompatible shapes: expected {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("{axis} index {index} out of bounds for dimension {bound}")]
    IndexOutOfBounds {
        axis: &'static str,
        index: usize,
        bound: usize,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("attempt to write into an immutable vector")]
    Immutable,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SparseError {
    /// Shorthand used by the bounds checks on both matrix orientations.
    pub(crate) fn out_of_bounds(axis: &'static str, index: usize, bound: usize) -> Self {
        SparseError::IndexOutOfBounds { axis, index, bound }
    }
}
