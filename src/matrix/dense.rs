//! Dense-matrix helpers on top of Faer.
//!
//! Dense matrices are the external collaborator of the sparse types: they are the
//! usual source for `from_dense` and the target of `to_dense`. This module provides
//! the `DenseMatrix` trait for building `faer::Mat` from row-major storage and for
//! exporting it row-major, the layout `to_double_array` uses.

use faer::Mat;
use num_traits::Float;

use crate::core::traits::MatShape;

pub trait DenseMatrix<T>: MatShape {
    /// Construct from raw row-major storage.
    fn from_row_major(nrows: usize, ncols: usize, data: &[T]) -> Self;
    /// Row-major copy of the elements.
    fn to_row_major(&self) -> Vec<T>;
}

impl<T: Float> DenseMatrix<T> for Mat<T> {
    fn from_row_major(nrows: usize, ncols: usize, data: &[T]) -> Self {
        assert_eq!(data.len(), nrows * ncols, "raw storage has incorrect length");
        Mat::from_fn(nrows, ncols, |i, j| data[i * ncols + j])
    }

    fn to_row_major(&self) -> Vec<T> {
        let (m, n) = (self.nrows(), self.ncols());
        (0..m * n).map(|k| self[(k / n, k % n)]).collect()
    }
}
