//! Matrix stored as a sequence of individually sparse columns.
//!
//! Each column slot is either absent (the zero column) or a [`Vector`] of length
//! `rows`. The layout is efficient for:
//! - `column` access and matrix–vector products accumulated column by column,
//! - `transpose_inner_product` with another matrix,
//! - transposition into a [`SparseRowMatrix`], which is O(1) and shares storage.

use std::cell::RefMut;

use faer::Mat;
use tracing::debug;

use crate::config::SparseOptions;
use crate::core::traits::{Access, FastColumns, MatShape, MatTransVec, MatVec, MatrixAccess, MatrixGet};
use crate::error::SparseError;
use crate::matrix::lines::{LineRef, SparseLines, Slots};
use crate::matrix::sparse_row::SparseRowMatrix;
use crate::ops::Op;
use crate::vector::Vector;

#[derive(Debug)]
pub struct SparseColumnMatrix {
    rows: usize,
    cols: usize,
    lines: SparseLines,
}

impl SparseColumnMatrix {
    /// `rows x cols` matrix with every column absent.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            lines: SparseLines::new(cols, rows),
        }
    }

    /// Take ownership of `data` as the column slots without copying.
    ///
    /// Only the slot count is checked; call [`validate`](Self::validate) to check the
    /// individual column lengths.
    pub fn wrap(data: Vec<Option<Vector>>, rows: usize, cols: usize) -> Result<Self, SparseError> {
        if data.len() != cols {
            return Err(SparseError::ShapeMismatch {
                expected: cols,
                found: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            lines: SparseLines::wrap(data, rows),
        })
    }

    /// Build from a list of columns; the row count is taken from the first column.
    pub fn from_columns(columns: Vec<Vector>) -> Result<Self, SparseError> {
        let rows = columns
            .first()
            .map(Vector::len)
            .ok_or_else(|| SparseError::InvalidArgument("no columns supplied".into()))?;
        let cols = columns.len();
        let m = Self::wrap(columns.into_iter().map(Some).collect(), rows, cols)?;
        m.check_lengths()?;
        Ok(m)
    }

    /// Copy `columns` into a new `rows x cols` matrix.
    pub fn create(columns: &[Vector], rows: usize, cols: usize) -> Result<Self, SparseError> {
        let m = Self::wrap(columns.iter().cloned().map(Some).collect(), rows, cols)?;
        m.check_lengths()?;
        Ok(m)
    }

    /// Copy the non-zero columns of `source` as sparse vectors; zero columns stay absent.
    pub fn from_dense(source: &dyn MatrixAccess) -> Self {
        let rows = source.nrows();
        let data = (0..source.ncols())
            .map(|j| {
                let col = source.column_vector(j);
                (!col.is_zero()).then(|| col.sparse_clone())
            })
            .collect();
        Self {
            rows,
            cols: source.ncols(),
            lines: SparseLines::wrap(data, rows),
        }
    }

    /// Column-oriented view over an existing slot arena.
    pub(crate) fn from_slots(slots: Slots, rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            lines: SparseLines::share(slots, rows),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.cols
    }

    fn check_lengths(&self) -> Result<(), SparseError> {
        for j in 0..self.cols {
            let len = self.lines.line(j).len();
            if len != self.rows {
                return Err(SparseError::ShapeMismatch {
                    expected: self.rows,
                    found: len,
                });
            }
        }
        Ok(())
    }

    fn check_row(&self, i: usize) -> Result<(), SparseError> {
        if i >= self.rows {
            return Err(SparseError::out_of_bounds("row", i, self.rows));
        }
        Ok(())
    }

    fn check_column(&self, j: usize) -> Result<(), SparseError> {
        if j >= self.cols {
            return Err(SparseError::out_of_bounds("column", j, self.cols));
        }
        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64, SparseError> {
        self.check_row(row)?;
        self.check_column(col)?;
        Ok(self.lines.get(col, row))
    }

    /// Element read without bounds checks; the caller guarantees the indices.
    pub fn unchecked_get(&self, row: usize, col: usize) -> f64 {
        self.lines.get(col, row)
    }

    /// Write one element, promoting the column slot as needed. Writing zero into an
    /// absent column is a no-op.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), SparseError> {
        self.check_row(row)?;
        self.check_column(col)?;
        self.lines.set(col, row, value)
    }

    pub fn unchecked_set(&mut self, row: usize, col: usize, value: f64) -> Result<(), SparseError> {
        self.lines.set(col, row, value)
    }

    pub fn add_at(&mut self, row: usize, col: usize, delta: f64) -> Result<(), SparseError> {
        self.check_row(row)?;
        self.check_column(col)?;
        self.lines.add_at(col, row, delta)
    }

    /// Copy every column of a same-shaped matrix; zero columns become absent.
    pub fn set_matrix(&mut self, a: &dyn MatrixAccess) -> Result<(), SparseError> {
        self.check_same_shape(a)?;
        for j in 0..self.cols {
            let col = a.column_vector(j);
            self.lines.replace(j, (!col.is_zero()).then_some(col));
        }
        Ok(())
    }

    /// Install `v` as column `col`, replacing whatever was there.
    pub fn replace_column(&mut self, col: usize, v: Vector) -> Result<(), SparseError> {
        self.check_column(col)?;
        if v.len() != self.rows {
            return Err(SparseError::ShapeMismatch {
                expected: self.rows,
                found: v.len(),
            });
        }
        self.lines.replace(col, Some(v));
        Ok(())
    }

    /// The stored column, or the zero column when the slot is absent. Do not hold the
    /// handle across a mutation of this matrix or its transpose views.
    pub fn column(&self, col: usize) -> Result<LineRef<'_>, SparseError> {
        self.check_column(col)?;
        Ok(self.lines.line(col))
    }

    /// Mutable access to column `col`, materializing a sparse column if absent.
    pub fn column_view_mut(&mut self, col: usize) -> Result<RefMut<'_, Vector>, SparseError> {
        self.check_column(col)?;
        Ok(self.lines.ensure_mutable(col))
    }

    /// O(1) slot swap, no data copied.
    pub fn swap_columns(&mut self, i: usize, j: usize) -> Result<(), SparseError> {
        if i == j {
            return Ok(());
        }
        self.check_column(i)?;
        self.check_column(j)?;
        self.lines.swap(i, j);
        Ok(())
    }

    /// Row-sparse view over the same storage with the dimensions swapped. Writes
    /// through either matrix are visible in the other.
    pub fn transpose_view(&self) -> SparseRowMatrix {
        SparseRowMatrix::from_slots(self.lines.slots(), self.cols, self.rows)
    }

    /// True if `other` is a view over this matrix's storage.
    pub fn shares_storage_with(&self, other: &SparseRowMatrix) -> bool {
        self.lines.same_storage(other.lines())
    }

    pub(crate) fn lines(&self) -> &SparseLines {
        &self.lines
    }

    /// Column-wise `self += a`. Absent columns stay absent where `a` is zero.
    pub fn add(&mut self, a: &dyn MatrixAccess) -> Result<(), SparseError> {
        self.check_same_shape(a)?;
        self.lines.add_lines(|j| a.column_vector(j))
    }

    /// `A x` as a dense vector, accumulated column by column in index order.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, SparseError> {
        if x.len() != self.cols {
            return Err(SparseError::ShapeMismatch {
                expected: self.cols,
                found: x.len(),
            });
        }
        let mut r = vec![0.0; self.rows];
        for (j, &xj) in x.iter().enumerate() {
            self.lines.line(j).add_multiple_to_array(xj, 0, &mut r, 0, self.rows);
        }
        Ok(r)
    }

    pub fn inner_product(&self, v: &Vector) -> Result<Vector, SparseError> {
        Ok(Vector::Dense(self.transform(&v.to_vec())?))
    }

    /// `A B` for a `cols x k` matrix `B`; zero columns of `B` give absent columns.
    pub fn inner_product_matrix(&self, b: &dyn MatrixAccess) -> Result<SparseColumnMatrix, SparseError> {
        if b.nrows() != self.cols {
            return Err(SparseError::ShapeMismatch {
                expected: self.cols,
                found: b.nrows(),
            });
        }
        let mut data = Vec::with_capacity(b.ncols());
        for j in 0..b.ncols() {
            let bj = b.column_vector(j);
            if bj.is_zero() {
                data.push(None);
                continue;
            }
            let r = self.transform(&bj.to_vec())?;
            data.push(r.iter().any(|&x| x != 0.0).then(|| Vector::Dense(r)));
        }
        SparseColumnMatrix::wrap(data, self.rows, b.ncols())
    }

    /// `Aᵀ B`, computed through the O(1) transpose view.
    pub fn transpose_inner_product(&self, b: &dyn MatrixAccess) -> Result<SparseRowMatrix, SparseError> {
        self.transpose_view().inner_product_matrix(b)
    }

    /// New matrix with every present column scaled; absent stays absent.
    pub fn multiply_copy(&self, factor: f64) -> SparseColumnMatrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            lines: SparseLines::wrap(self.lines.multiply_copy(factor), self.rows),
        }
    }

    /// Apply `op` to every element in place, column by column.
    pub fn apply_op(&mut self, op: &dyn Op) -> Result<(), SparseError> {
        self.lines.apply_op(op)
    }

    /// Clone choosing the path from `options`: small matrices copy the slot structure
    /// (sharing immutable payloads), larger ones deep-copy every present column.
    pub fn clone_with(&self, options: &SparseOptions) -> SparseColumnMatrix {
        if options.wants_exact_clone(self.rows, self.cols) {
            debug!(rows = self.rows, cols = self.cols, "exact column clone");
            return self.exact_clone();
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            lines: SparseLines::wrap(self.lines.shallow_copy(), self.rows),
        }
    }

    /// Deep copy of every present column; absent columns stay absent.
    pub fn exact_clone(&self) -> SparseColumnMatrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            lines: SparseLines::wrap(self.lines.exact_copy(), self.rows),
        }
    }

    /// Value equality against any matrix; an absent column equals a zero column.
    pub fn equals(&self, other: &dyn MatrixAccess) -> bool {
        self.is_same_shape(other) && self.lines.equals(|j| other.column_vector(j))
    }

    /// Every column `j` is zero above the diagonal.
    pub fn is_lower_triangular(&self) -> bool {
        (1..self.cols).all(|j| self.lines.is_range_zero(j, 0, j.min(self.rows)))
    }

    /// Every column `j` is zero below the diagonal.
    pub fn is_upper_triangular(&self) -> bool {
        (0..self.cols.min(self.rows)).all(|j| self.lines.is_range_zero(j, j + 1, self.rows - j - 1))
    }

    /// Check that every present column has length `rows`.
    pub fn validate(&self) -> Result<(), SparseError> {
        self.lines.validate("column")
    }

    pub fn non_zero_count(&self) -> usize {
        self.lines.non_zero_count()
    }

    /// Add into a row-major `rows x cols` buffer starting at `offset`.
    pub fn add_to_array(&self, target: &mut [f64], offset: usize) {
        self.lines.add_to_array(target, offset, self.cols);
    }

    pub fn copy_column_to(&self, col: usize, target: &mut [f64], offset: usize) -> Result<(), SparseError> {
        self.check_column(col)?;
        self.lines.copy_line_to(col, target, offset);
        Ok(())
    }

    pub fn copy_row_to(&self, row: usize, target: &mut [f64], offset: usize) -> Result<(), SparseError> {
        self.check_row(row)?;
        self.lines.copy_across_to(row, target, offset);
        Ok(())
    }

    /// Row-major dense copy.
    pub fn to_double_array(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.rows * self.cols];
        self.add_to_array(&mut out, 0);
        out
    }

    pub fn to_dense(&self) -> Mat<f64> {
        Mat::from_fn(self.rows, self.cols, |i, j| self.lines.get(j, i))
    }

    /// Dense `cols x rows` transpose; each column becomes a contiguous row.
    pub fn to_matrix_transpose(&self) -> Mat<f64> {
        Mat::from_fn(self.cols, self.rows, |j, i| self.lines.get(j, i))
    }
}

impl Clone for SparseColumnMatrix {
    fn clone(&self) -> Self {
        self.clone_with(&SparseOptions::default())
    }
}

impl PartialEq for SparseColumnMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl MatShape for SparseColumnMatrix {
    fn nrows(&self) -> usize {
        self.rows
    }
    fn ncols(&self) -> usize {
        self.cols
    }
    fn access(&self) -> Access {
        Access::FAST_COLUMNS
    }
}

impl MatrixGet<f64> for SparseColumnMatrix {
    fn at(&self, i: usize, j: usize) -> f64 {
        self.unchecked_get(i, j)
    }
}

impl MatrixAccess for SparseColumnMatrix {
    fn column_vector(&self, j: usize) -> Vector {
        self.lines.line_vector(j)
    }

    fn row_vector(&self, i: usize) -> Vector {
        self.lines.gather(i)
    }
}

impl FastColumns for SparseColumnMatrix {
    type Column<'a> = LineRef<'a>;

    fn column(&self, j: usize) -> Result<LineRef<'_>, SparseError> {
        SparseColumnMatrix::column(self, j)
    }
}

impl MatVec<Vec<f64>> for SparseColumnMatrix {
    fn matvec(&self, x: &Vec<f64>, y: &mut Vec<f64>) {
        assert_eq!(self.rows, y.len(), "Output vector y has incorrect length");
        assert_eq!(self.cols, x.len(), "Input vector x has incorrect length");
        y.iter_mut().for_each(|v| *v = 0.0);
        for (j, &xj) in x.iter().enumerate() {
            self.lines.line(j).add_multiple_to_array(xj, 0, y, 0, self.rows);
        }
    }
}

impl MatTransVec<Vec<f64>> for SparseColumnMatrix {
    fn mattransvec(&self, x: &Vec<f64>, y: &mut Vec<f64>) {
        assert_eq!(self.cols, y.len(), "Output vector y has incorrect length");
        assert_eq!(self.rows, x.len(), "Input vector x has incorrect length");
        for (j, yj) in y.iter_mut().enumerate() {
            *yj = self.lines.line(j).dot(x);
        }
    }
}
