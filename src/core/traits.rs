//! Core matrix contracts for colsparse.
//!
//! These are the seams between the sparse matrices and the rest of a linear-algebra
//! stack: shape queries, element access, per-line extraction, matrix–vector products,
//! and the fast-row / fast-column capability tags.

use std::ops::Deref;

use bitflags::bitflags;

use crate::error::SparseError;
use crate::vector::Vector;

bitflags! {
    /// Runtime-queryable access capabilities of a matrix type.
    ///
    /// A set bit is a structural promise: the corresponding line accessor runs in O(1)
    /// and hands out an existing vector rather than gathering a copy.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Access: u8 {
        const FAST_ROWS    = 0b01;
        const FAST_COLUMNS = 0b10;
    }
}

/// Shape of a matrix.
pub trait MatShape {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;

    /// Capability tag; empty unless the type advertises fast line access.
    fn access(&self) -> Access {
        Access::empty()
    }

    fn element_count(&self) -> u64 {
        (self.nrows() as u64) * (self.ncols() as u64)
    }

    fn is_same_shape<M: MatShape + ?Sized>(&self, other: &M) -> bool
    where
        Self: Sized,
    {
        self.nrows() == other.nrows() && self.ncols() == other.ncols()
    }

    /// `Ok(())` when `other` has the same shape, a `ShapeMismatch` naming the first
    /// disagreeing dimension otherwise.
    fn check_same_shape<M: MatShape + ?Sized>(&self, other: &M) -> Result<(), SparseError>
    where
        Self: Sized,
    {
        if self.nrows() != other.nrows() {
            return Err(SparseError::ShapeMismatch {
                expected: self.nrows(),
                found: other.nrows(),
            });
        }
        if self.ncols() != other.ncols() {
            return Err(SparseError::ShapeMismatch {
                expected: self.ncols(),
                found: other.ncols(),
            });
        }
        Ok(())
    }
}

/// Unchecked element access; panics when out of range.
pub trait MatrixGet<T> {
    fn at(&self, i: usize, j: usize) -> T;
}

/// The generic matrix contract the sparse matrices consume: any matrix that can hand
/// out its rows and columns as [`Vector`]s.
pub trait MatrixAccess: MatShape + MatrixGet<f64> {
    /// Column `j` as a vector of length `nrows()`.
    fn column_vector(&self, j: usize) -> Vector;

    /// Row `i` as a vector of length `ncols()`. The default gathers elementwise.
    fn row_vector(&self, i: usize) -> Vector {
        Vector::Dense((0..self.ncols()).map(|j| self.at(i, j)).collect())
    }
}

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}

/// Transposed matrix–vector product: y ← Aᵀ x.
pub trait MatTransVec<V> {
    /// Compute y = Aᵀ · x.
    fn mattransvec(&self, x: &V, y: &mut V);
}

/// Marker for matrices whose `row` is O(1) and non-copying.
pub trait FastRows: MatShape {
    type Row<'a>: Deref<Target = Vector>
    where
        Self: 'a;

    fn row(&self, i: usize) -> Result<Self::Row<'_>, SparseError>;
}

/// Marker for matrices whose `column` is O(1) and non-copying.
pub trait FastColumns: MatShape {
    type Column<'a>: Deref<Target = Vector>
    where
        Self: 'a;

    fn column(&self, j: usize) -> Result<Self::Column<'_>, SparseError>;
}
