//! Shared line storage behind both sparse orientations.
//!
//! A sparse matrix is a sequence of *lines* (columns for [`SparseColumnMatrix`], rows
//! for [`SparseRowMatrix`]), each either absent (the zero line) or a [`Vector`] of
//! length `line_len`. The sequence lives behind `Rc<RefCell<..>>` so a matrix and its
//! transpose view address one physical arena; the wrappers only decide which index is
//! the line and which is the position inside it.
//!
//! Borrows are short and never held across calls, except for the [`LineRef`] /
//! `RefMut` handles returned to callers. Holding one of those while mutating the same
//! arena (directly or through a transpose view) panics.
//!
//! [`SparseColumnMatrix`]: crate::matrix::SparseColumnMatrix
//! [`SparseRowMatrix`]: crate::matrix::SparseRowMatrix

use std::cell::{Ref, RefCell, RefMut};
use std::ops::Deref;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::error::SparseError;
use crate::ops::Op;
use crate::vector::Vector;

pub(crate) type Slots = Rc<RefCell<Vec<Option<Vector>>>>;

/// Read handle to one line: either the stored vector or the matrix's zero line.
pub enum LineRef<'a> {
    Stored(Ref<'a, Vector>),
    Empty(&'a Vector),
}

impl Deref for LineRef<'_> {
    type Target = Vector;

    fn deref(&self) -> &Vector {
        match self {
            LineRef::Stored(v) => v,
            LineRef::Empty(v) => v,
        }
    }
}

impl LineRef<'_> {
    /// True when the slot is absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, LineRef::Empty(_))
    }
}

#[derive(Debug)]
pub(crate) struct SparseLines {
    data: Slots,
    line_len: usize,
    empty: Vector,
}

impl SparseLines {
    /// `count` absent lines.
    pub(crate) fn new(count: usize, line_len: usize) -> Self {
        Self::wrap(vec![None; count], line_len)
    }

    pub(crate) fn wrap(data: Vec<Option<Vector>>, line_len: usize) -> Self {
        Self::share(Rc::new(RefCell::new(data)), line_len)
    }

    pub(crate) fn share(data: Slots, line_len: usize) -> Self {
        Self {
            data,
            line_len,
            empty: Vector::Zero(line_len),
        }
    }

    /// Handle to the same arena, for building a transpose view.
    pub(crate) fn slots(&self) -> Slots {
        Rc::clone(&self.data)
    }

    pub(crate) fn same_storage(&self, other: &SparseLines) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub(crate) fn count(&self) -> usize {
        self.data.borrow().len()
    }

    pub(crate) fn line_len(&self) -> usize {
        self.line_len
    }

    pub(crate) fn is_present(&self, i: usize) -> bool {
        self.data.borrow()[i].is_some()
    }

    pub(crate) fn line(&self, i: usize) -> LineRef<'_> {
        match Ref::filter_map(self.data.borrow(), |d| d[i].as_ref()) {
            Ok(v) => LineRef::Stored(v),
            Err(_) => LineRef::Empty(&self.empty),
        }
    }

    /// Owned copy of line `i`; absent lines come back as `Vector::Zero`.
    pub(crate) fn line_vector(&self, i: usize) -> Vector {
        (*self.line(i)).clone()
    }

    pub(crate) fn get(&self, i: usize, k: usize) -> f64 {
        match &self.data.borrow()[i] {
            Some(v) => v.unchecked_get(k),
            None => 0.0,
        }
    }

    /// Element `k` of line `i` across all lines, i.e. one line of the orthogonal
    /// orientation.
    pub(crate) fn gather(&self, k: usize) -> Vector {
        let data = self.data.borrow();
        Vector::Dense(
            data.iter()
                .map(|slot| slot.as_ref().map_or(0.0, |v| v.unchecked_get(k)))
                .collect(),
        )
    }

    /// Write with promotion: absent + zero is a no-op, absent + non-zero allocates a
    /// sparse line, an immutable line is sparse-cloned before the write.
    pub(crate) fn set(&self, i: usize, k: usize, value: f64) -> Result<(), SparseError> {
        let mut data = self.data.borrow_mut();
        let slot = &mut data[i];
        match slot {
            None if value == 0.0 => return Ok(()),
            None => {
                trace!(line = i, "materializing sparse line for write");
                *slot = Some(Vector::sparse_zeros(self.line_len));
            }
            Some(v) if !v.is_fully_mutable() => {
                trace!(line = i, "promoting immutable line before write");
                *v = v.sparse_clone();
            }
            Some(_) => {}
        }
        match slot {
            Some(v) => v.set(k, value),
            None => Ok(()),
        }
    }

    /// Accumulating counterpart of [`set`](Self::set), same promotion policy.
    pub(crate) fn add_at(&self, i: usize, k: usize, delta: f64) -> Result<(), SparseError> {
        let mut data = self.data.borrow_mut();
        let slot = &mut data[i];
        match slot {
            None if delta == 0.0 => return Ok(()),
            None => {
                trace!(line = i, "materializing sparse line for accumulate");
                *slot = Some(Vector::sparse_zeros(self.line_len));
            }
            Some(v) if !v.is_fully_mutable() => {
                trace!(line = i, "promoting immutable line before accumulate");
                *v = v.sparse_clone();
            }
            Some(_) => {}
        }
        match slot {
            Some(v) => v.add_at(k, delta),
            None => Ok(()),
        }
    }

    /// Install `v` (or clear with `None`), unconditionally.
    pub(crate) fn replace(&self, i: usize, v: Option<Vector>) {
        self.data.borrow_mut()[i] = v;
    }

    pub(crate) fn swap(&self, i: usize, j: usize) {
        if i != j {
            self.data.borrow_mut().swap(i, j);
        }
    }

    /// Mutable handle to line `i`, materializing or upgrading the slot first.
    pub(crate) fn ensure_mutable(&self, i: usize) -> RefMut<'_, Vector> {
        let len = self.line_len;
        let mut data = self.data.borrow_mut();
        let slot = &mut data[i];
        match slot {
            None => trace!(line = i, "materializing line for mutable view"),
            Some(v) if !v.is_fully_mutable() => {
                trace!(line = i, "promoting immutable line for mutable view");
                *v = v.mutable();
            }
            Some(_) => {}
        }
        RefMut::map(data, |d| d[i].get_or_insert_with(|| Vector::sparse_zeros(len)))
    }

    /// Line-wise `self += other`, where `other(i)` yields the matching line.
    /// Absent lines stay absent when the operand line is zero.
    pub(crate) fn add_lines(&self, other: impl Fn(usize) -> Vector) -> Result<(), SparseError> {
        for i in 0..self.count() {
            // fetch before borrowing: `other` may read this arena through a view
            let a = other(i);
            let mut data = self.data.borrow_mut();
            let slot = &mut data[i];
            match slot {
                None => {
                    if !a.is_zero() {
                        *slot = Some(a.mutable());
                    }
                }
                Some(v) if v.is_mutable() => v.add(&a)?,
                Some(v) => *v = v.add_copy(&a)?,
            }
        }
        Ok(())
    }

    /// Every present line scaled by `factor`; absent lines stay absent.
    pub(crate) fn multiply_copy(&self, factor: f64) -> Vec<Option<Vector>> {
        self.data
            .borrow()
            .iter()
            .map(|slot| slot.as_ref().map(|v| v.multiply_copy(factor)))
            .collect()
    }

    /// Apply `op` to every element. Absent lines are materialized only when `op` is
    /// stochastic or does not map zero to zero; each element is then evaluated on its own.
    pub(crate) fn apply_op(&self, op: &dyn Op) -> Result<(), SparseError> {
        let keeps_zero = !op.is_stochastic() && op.apply(0.0) == 0.0;
        let mut data = self.data.borrow_mut();
        for (i, slot) in data.iter_mut().enumerate() {
            match slot {
                None if keeps_zero => {}
                None => {
                    trace!(line = i, "materializing line for op");
                    let mut line = vec![0.0; self.line_len];
                    op.apply_to(&mut line);
                    *slot = Some(Vector::Dense(line));
                }
                Some(v) => {
                    if !v.is_fully_mutable() {
                        *v = v.mutable();
                    }
                    v.apply_op(op)?;
                }
            }
        }
        Ok(())
    }

    /// Slot-structure copy; immutable shared payloads are shared, not duplicated.
    pub(crate) fn shallow_copy(&self) -> Vec<Option<Vector>> {
        self.data.borrow().clone()
    }

    /// Deep copy of every present line; absent lines stay absent.
    pub(crate) fn exact_copy(&self) -> Vec<Option<Vector>> {
        self.data
            .borrow()
            .iter()
            .map(|slot| slot.as_ref().map(Vector::exact_clone))
            .collect()
    }

    pub(crate) fn validate(&self, axis: &'static str) -> Result<(), SparseError> {
        for (i, slot) in self.data.borrow().iter().enumerate() {
            if let Some(v) = slot {
                if v.len() != self.line_len {
                    warn!(axis, index = i, len = v.len(), expected = self.line_len, "invalid line length");
                    return Err(SparseError::Validation(format!(
                        "invalid length {} at {axis} {i}, expected {}",
                        v.len(),
                        self.line_len
                    )));
                }
            }
        }
        Ok(())
    }

    /// Line-wise equality against `other(i)`. An absent line equals any zero line.
    pub(crate) fn equals(&self, other: impl Fn(usize) -> Vector) -> bool {
        (0..self.count()).all(|i| {
            let o = other(i);
            match &self.data.borrow()[i] {
                None => o.is_zero(),
                Some(v) => *v == o,
            }
        })
    }

    pub(crate) fn is_range_zero(&self, i: usize, start: usize, len: usize) -> bool {
        match &self.data.borrow()[i] {
            None => true,
            Some(v) => v.is_range_zero(start, len),
        }
    }

    pub(crate) fn non_zero_count(&self) -> usize {
        self.data
            .borrow()
            .iter()
            .flatten()
            .map(Vector::non_zero_count)
            .sum()
    }

    /// `target[offset + i + k * stride] += line_i[k]` for every present line.
    pub(crate) fn add_to_array(&self, target: &mut [f64], offset: usize, stride: usize) {
        for (i, slot) in self.data.borrow().iter().enumerate() {
            if let Some(v) = slot {
                v.add_to_array(target, offset + i, stride);
            }
        }
    }

    /// Write line `i` contiguously into `target[offset..]`.
    pub(crate) fn copy_line_to(&self, i: usize, target: &mut [f64], offset: usize) {
        self.line(i).copy_to(target, offset);
    }

    /// Write element `k` of every line into `target[offset..offset + count]`.
    pub(crate) fn copy_across_to(&self, k: usize, target: &mut [f64], offset: usize) {
        for (i, slot) in self.data.borrow().iter().enumerate() {
            target[offset + i] = slot.as_ref().map_or(0.0, |v| v.unchecked_get(k));
        }
    }
}
