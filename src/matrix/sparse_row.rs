//! Matrix stored as a sequence of individually sparse rows.
//!
//! The dual of [`SparseColumnMatrix`]: same storage, rows and columns interchanged.
//! A row-sparse matrix obtained from [`SparseColumnMatrix::transpose_view`] shares
//! its slots with that matrix, and its own [`transpose_view`](SparseRowMatrix::transpose_view)
//! restores the column orientation over the same slots.

use std::cell::RefMut;

use faer::Mat;
use tracing::debug;

use crate::config::SparseOptions;
use crate::core::traits::{Access, FastRows, MatShape, MatTransVec, MatVec, MatrixAccess, MatrixGet};
use crate::error::SparseError;
use crate::matrix::lines::{LineRef, SparseLines, Slots};
use crate::matrix::sparse_column::SparseColumnMatrix;
use crate::ops::Op;
use crate::vector::Vector;

#[derive(Debug)]
pub struct SparseRowMatrix {
    rows: usize,
    cols: usize,
    lines: SparseLines,
}

impl SparseRowMatrix {
    /// `rows x cols` matrix with every row absent.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            lines: SparseLines::new(rows, cols),
        }
    }

    /// Take ownership of `data` as the row slots without copying. Only the slot count
    /// is checked.
    pub fn wrap(data: Vec<Option<Vector>>, rows: usize, cols: usize) -> Result<Self, SparseError> {
        if data.len() != rows {
            return Err(SparseError::ShapeMismatch {
                expected: rows,
                found: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            lines: SparseLines::wrap(data, cols),
        })
    }

    /// Build from a list of rows; the column count is taken from the first row.
    pub fn from_rows(rows: Vec<Vector>) -> Result<Self, SparseError> {
        let cols = rows
            .first()
            .map(Vector::len)
            .ok_or_else(|| SparseError::InvalidArgument("no rows supplied".into()))?;
        let n = rows.len();
        let m = Self::wrap(rows.into_iter().map(Some).collect(), n, cols)?;
        m.check_lengths()?;
        Ok(m)
    }

    /// Copy `rows_data` into a new `rows x cols` matrix.
    pub fn create(rows_data: &[Vector], rows: usize, cols: usize) -> Result<Self, SparseError> {
        let m = Self::wrap(rows_data.iter().cloned().map(Some).collect(), rows, cols)?;
        m.check_lengths()?;
        Ok(m)
    }

    /// Copy the non-zero rows of `source` as sparse vectors; zero rows stay absent.
    pub fn from_dense(source: &dyn MatrixAccess) -> Self {
        let cols = source.ncols();
        let data = (0..source.nrows())
            .map(|i| {
                let row = source.row_vector(i);
                (!row.is_zero()).then(|| row.sparse_clone())
            })
            .collect();
        Self {
            rows: source.nrows(),
            cols,
            lines: SparseLines::wrap(data, cols),
        }
    }

    pub(crate) fn from_slots(slots: Slots, rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            lines: SparseLines::share(slots, cols),
        }
    }

    pub(crate) fn lines(&self) -> &SparseLines {
        &self.lines
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.cols
    }

    fn check_lengths(&self) -> Result<(), SparseError> {
        for i in 0..self.rows {
            let len = self.lines.line(i).len();
            if len != self.cols {
                return Err(SparseError::ShapeMismatch {
                    expected: self.cols,
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
        Ok(self.lines.get(row, col))
    }

    pub fn unchecked_get(&self, row: usize, col: usize) -> f64 {
        self.lines.get(row, col)
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), SparseError> {
        self.check_row(row)?;
        self.check_column(col)?;
        self.lines.set(row, col, value)
    }

    pub fn unchecked_set(&mut self, row: usize, col: usize, value: f64) -> Result<(), SparseError> {
        self.lines.set(row, col, value)
    }

    pub fn add_at(&mut self, row: usize, col: usize, delta: f64) -> Result<(), SparseError> {
        self.check_row(row)?;
        self.check_column(col)?;
        self.lines.add_at(row, col, delta)
    }

    /// Copy every row of a same-shaped matrix; zero rows become absent.
    pub fn set_matrix(&mut self, a: &dyn MatrixAccess) -> Result<(), SparseError> {
        self.check_same_shape(a)?;
        for i in 0..self.rows {
            let row = a.row_vector(i);
            self.lines.replace(i, (!row.is_zero()).then_some(row));
        }
        Ok(())
    }

    pub fn replace_row(&mut self, row: usize, v: Vector) -> Result<(), SparseError> {
        self.check_row(row)?;
        if v.len() != self.cols {
            return Err(SparseError::ShapeMismatch {
                expected: self.cols,
                found: v.len(),
            });
        }
        self.lines.replace(row, Some(v));
        Ok(())
    }

    /// The stored row, or the zero row when the slot is absent.
    pub fn row(&self, row: usize) -> Result<LineRef<'_>, SparseError> {
        self.check_row(row)?;
        Ok(self.lines.line(row))
    }

    pub fn row_view_mut(&mut self, row: usize) -> Result<RefMut<'_, Vector>, SparseError> {
        self.check_row(row)?;
        Ok(self.lines.ensure_mutable(row))
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<(), SparseError> {
        if i == j {
            return Ok(());
        }
        self.check_row(i)?;
        self.check_row(j)?;
        self.lines.swap(i, j);
        Ok(())
    }

    /// Column-sparse view over the same storage with the dimensions swapped.
    pub fn transpose_view(&self) -> SparseColumnMatrix {
        SparseColumnMatrix::from_slots(self.lines.slots(), self.cols, self.rows)
    }

    pub fn shares_storage_with(&self, other: &SparseColumnMatrix) -> bool {
        self.lines.same_storage(other.lines())
    }

    /// Row-wise `self += a`. Absent rows stay absent where `a` is zero.
    pub fn add(&mut self, a: &dyn MatrixAccess) -> Result<(), SparseError> {
        self.check_same_shape(a)?;
        self.lines.add_lines(|i| a.row_vector(i))
    }

    /// `A x` as a dense vector, one row dot product per entry.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, SparseError> {
        if x.len() != self.cols {
            return Err(SparseError::ShapeMismatch {
                expected: self.cols,
                found: x.len(),
            });
        }
        Ok((0..self.rows).map(|i| self.lines.line(i).dot(x)).collect())
    }

    pub fn inner_product(&self, v: &Vector) -> Result<Vector, SparseError> {
        Ok(Vector::Dense(self.transform(&v.to_vec())?))
    }

    /// `A B` for a `cols x k` matrix `B`; absent rows of `A` give absent rows.
    pub fn inner_product_matrix(&self, b: &dyn MatrixAccess) -> Result<SparseRowMatrix, SparseError> {
        if b.nrows() != self.cols {
            return Err(SparseError::ShapeMismatch {
                expected: self.cols,
                found: b.nrows(),
            });
        }
        let b_cols: Vec<Vec<f64>> = (0..b.ncols()).map(|j| b.column_vector(j).to_vec()).collect();
        let data = (0..self.rows)
            .map(|i| {
                let row = self.lines.line(i);
                if row.is_absent() {
                    return None;
                }
                let r: Vec<f64> = b_cols.iter().map(|bj| row.dot(bj)).collect();
                r.iter().any(|&x| x != 0.0).then(|| Vector::Dense(r))
            })
            .collect();
        SparseRowMatrix::wrap(data, self.rows, b.ncols())
    }

    /// `Aᵀ B`, computed through the O(1) transpose view.
    pub fn transpose_inner_product(&self, b: &dyn MatrixAccess) -> Result<SparseColumnMatrix, SparseError> {
        self.transpose_view().inner_product_matrix(b)
    }

    pub fn multiply_copy(&self, factor: f64) -> SparseRowMatrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            lines: SparseLines::wrap(self.lines.multiply_copy(factor), self.cols),
        }
    }

    pub fn apply_op(&mut self, op: &dyn Op) -> Result<(), SparseError> {
        self.lines.apply_op(op)
    }

    pub fn clone_with(&self, options: &SparseOptions) -> SparseRowMatrix {
        if options.wants_exact_clone(self.rows, self.cols) {
            debug!(rows = self.rows, cols = self.cols, "exact row clone");
            return self.exact_clone();
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            lines: SparseLines::wrap(self.lines.shallow_copy(), self.cols),
        }
    }

    pub fn exact_clone(&self) -> SparseRowMatrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            lines: SparseLines::wrap(self.lines.exact_copy(), self.cols),
        }
    }

    /// Value equality against any matrix; an absent row equals a zero row.
    pub fn equals(&self, other: &dyn MatrixAccess) -> bool {
        self.is_same_shape(other) && self.lines.equals(|i| other.row_vector(i))
    }

    /// Every row `i` is zero right of the diagonal.
    pub fn is_lower_triangular(&self) -> bool {
        (0..self.rows.min(self.cols)).all(|i| self.lines.is_range_zero(i, i + 1, self.cols - i - 1))
    }

    /// Every row `i` is zero left of the diagonal.
    pub fn is_upper_triangular(&self) -> bool {
        (1..self.rows).all(|i| self.lines.is_range_zero(i, 0, i.min(self.cols)))
    }

    pub fn validate(&self) -> Result<(), SparseError> {
        self.lines.validate("row")
    }

    pub fn non_zero_count(&self) -> usize {
        self.lines.non_zero_count()
    }

    /// Add into a row-major `rows x cols` buffer starting at `offset`.
    pub fn add_to_array(&self, target: &mut [f64], offset: usize) {
        for i in 0..self.rows {
            self.lines.line(i).add_to_array(target, offset + i * self.cols, 1);
        }
    }

    pub fn copy_row_to(&self, row: usize, target: &mut [f64], offset: usize) -> Result<(), SparseError> {
        self.check_row(row)?;
        self.lines.copy_line_to(row, target, offset);
        Ok(())
    }

    pub fn copy_column_to(&self, col: usize, target: &mut [f64], offset: usize) -> Result<(), SparseError> {
        self.check_column(col)?;
        self.lines.copy_across_to(col, target, offset);
        Ok(())
    }

    /// Row-major dense copy.
    pub fn to_double_array(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.rows * self.cols];
        self.add_to_array(&mut out, 0);
        out
    }

    pub fn to_dense(&self) -> Mat<f64> {
        Mat::from_fn(self.rows, self.cols, |i, j| self.lines.get(i, j))
    }

    pub fn to_matrix_transpose(&self) -> Mat<f64> {
        Mat::from_fn(self.cols, self.rows, |j, i| self.lines.get(i, j))
    }
}

impl Clone for SparseRowMatrix {
    fn clone(&self) -> Self {
        self.clone_with(&SparseOptions::default())
    }
}

impl PartialEq for SparseRowMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl MatShape for SparseRowMatrix {
    fn nrows(&self) -> usize {
        self.rows
    }
    fn ncols(&self) -> usize {
        self.cols
    }
    fn access(&self) -> Access {
        Access::FAST_ROWS
    }
}

impl MatrixGet<f64> for SparseRowMatrix {
    fn at(&self, i: usize, j: usize) -> f64 {
        self.unchecked_get(i, j)
    }
}

impl MatrixAccess for SparseRowMatrix {
    fn column_vector(&self, j: usize) -> Vector {
        self.lines.gather(j)
    }

    fn row_vector(&self, i: usize) -> Vector {
        self.lines.line_vector(i)
    }
}

impl FastRows for SparseRowMatrix {
    type Row<'a> = LineRef<'a>;

    fn row(&self, i: usize) -> Result<LineRef<'_>, SparseError> {
        SparseRowMatrix::row(self, i)
    }
}

impl MatVec<Vec<f64>> for SparseRowMatrix {
    fn matvec(&self, x: &Vec<f64>, y: &mut Vec<f64>) {
        assert_eq!(self.rows, y.len(), "Output vector y has incorrect length");
        assert_eq!(self.cols, x.len(), "Input vector x has incorrect length");
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = self.lines.line(i).dot(x);
        }
    }
}

impl MatTransVec<Vec<f64>> for SparseRowMatrix {
    fn mattransvec(&self, x: &Vec<f64>, y: &mut Vec<f64>) {
        assert_eq!(self.cols, y.len(), "Output vector y has incorrect length");
        assert_eq!(self.rows, x.len(), "Input vector x has incorrect length");
        y.iter_mut().for_each(|v| *v = 0.0);
        for (i, &xi) in x.iter().enumerate() {
            self.lines.line(i).add_multiple_to_array(xi, 0, y, 0, self.cols);
        }
    }
}
