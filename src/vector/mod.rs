//! Vector type consumed by the sparse matrices.
//!
//! A [`Vector`] is one of four backings. Two of them are immutable:
//! - `Zero(len)`: shape-only, every element is zero. Absent matrix lines read as this.
//! - `Shared(Arc<[f64]>)`: a dense payload that may be shared with other owners.
//!
//! The other two are fully mutable:
//! - `Dense(Vec<f64>)`
//! - `Sparse(SparseVector)`
//!
//! Writers that receive an immutable vector upgrade it first with [`Vector::mutable`]
//! or [`Vector::sparse_clone`]; the upgrade never changes the observed values.

pub mod sparse;

use std::sync::Arc;

use crate::error::SparseError;
use crate::ops::Op;

pub use sparse::SparseVector;

#[derive(Debug, Clone)]
pub enum Vector {
    Zero(usize),
    Dense(Vec<f64>),
    Sparse(SparseVector),
    Shared(Arc<[f64]>),
}

impl Vector {
    pub fn zeros(len: usize) -> Self {
        Vector::Zero(len)
    }

    pub fn dense(data: Vec<f64>) -> Self {
        Vector::Dense(data)
    }

    /// Immutable vector over a copy of `data`.
    pub fn shared(data: &[f64]) -> Self {
        Vector::Shared(Arc::from(data))
    }

    /// Fresh mutable sparse vector of length `len`.
    pub fn sparse_zeros(len: usize) -> Self {
        Vector::Sparse(SparseVector::zeros(len))
    }

    pub fn len(&self) -> usize {
        match self {
            Vector::Zero(n) => *n,
            Vector::Dense(d) => d.len(),
            Vector::Sparse(s) => s.len(),
            Vector::Shared(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_index(&self, i: usize) -> Result<(), SparseError> {
        if i >= self.len() {
            return Err(SparseError::out_of_bounds("vector", i, self.len()));
        }
        Ok(())
    }

    pub fn get(&self, i: usize) -> Result<f64, SparseError> {
        self.check_index(i)?;
        Ok(self.unchecked_get(i))
    }

    /// Element read without the length check. Dense backings still panic out of range.
    pub fn unchecked_get(&self, i: usize) -> f64 {
        match self {
            Vector::Zero(_) => 0.0,
            Vector::Dense(d) => d[i],
            Vector::Sparse(s) => s.get(i),
            Vector::Shared(d) => d[i],
        }
    }

    pub fn set(&mut self, i: usize, value: f64) -> Result<(), SparseError> {
        self.check_index(i)?;
        self.unchecked_set(i, value)
    }

    pub fn unchecked_set(&mut self, i: usize, value: f64) -> Result<(), SparseError> {
        match self {
            Vector::Dense(d) => d[i] = value,
            Vector::Sparse(s) => s.set(i, value),
            Vector::Zero(_) | Vector::Shared(_) => return Err(SparseError::Immutable),
        }
        Ok(())
    }

    pub fn add_at(&mut self, i: usize, delta: f64) -> Result<(), SparseError> {
        self.check_index(i)?;
        match self {
            Vector::Dense(d) => d[i] += delta,
            Vector::Sparse(s) => s.add_at(i, delta),
            Vector::Zero(_) | Vector::Shared(_) => return Err(SparseError::Immutable),
        }
        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Vector::Zero(_) => true,
            Vector::Dense(d) => d.iter().all(|&x| x == 0.0),
            Vector::Sparse(s) => s.nnz() == 0,
            Vector::Shared(d) => d.iter().all(|&x| x == 0.0),
        }
    }

    /// True if every element in `[start, start + len)` is zero.
    pub fn is_range_zero(&self, start: usize, len: usize) -> bool {
        match self {
            Vector::Zero(_) => true,
            Vector::Dense(d) => d[start..start + len].iter().all(|&x| x == 0.0),
            Vector::Sparse(s) => s.is_range_zero(start, len),
            Vector::Shared(d) => d[start..start + len].iter().all(|&x| x == 0.0),
        }
    }

    /// Every element can be written in place.
    pub fn is_fully_mutable(&self) -> bool {
        matches!(self, Vector::Dense(_) | Vector::Sparse(_))
    }

    /// At least some element can be written in place.
    pub fn is_mutable(&self) -> bool {
        self.is_fully_mutable()
    }

    /// A fully mutable vector with the same values.
    pub fn mutable(&self) -> Vector {
        match self {
            Vector::Zero(n) => Vector::sparse_zeros(*n),
            Vector::Shared(d) => Vector::Dense(d.to_vec()),
            other => other.clone(),
        }
    }

    /// A mutable sparse vector with the same values.
    pub fn sparse_clone(&self) -> Vector {
        Vector::Sparse(match self {
            Vector::Zero(n) => SparseVector::zeros(*n),
            Vector::Dense(d) => SparseVector::from_dense(d),
            Vector::Sparse(s) => s.clone(),
            Vector::Shared(d) => SparseVector::from_dense(d),
        })
    }

    /// Deep copy keeping the backing kind; a shared payload gets fresh storage.
    pub fn exact_clone(&self) -> Vector {
        match self {
            Vector::Shared(d) => Vector::Shared(Arc::from(&d[..])),
            other => other.clone(),
        }
    }

    pub fn non_zero_count(&self) -> usize {
        match self {
            Vector::Zero(_) => 0,
            Vector::Sparse(s) => s.nnz(),
            Vector::Dense(d) => d.iter().filter(|&&x| x != 0.0).count(),
            Vector::Shared(d) => d.iter().filter(|&&x| x != 0.0).count(),
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Vector::Zero(n) => vec![0.0; *n],
            Vector::Dense(d) => d.clone(),
            Vector::Sparse(s) => s.to_dense(),
            Vector::Shared(d) => d.to_vec(),
        }
    }

    /// Write every element into `target[offset..offset + len]`.
    pub fn copy_to(&self, target: &mut [f64], offset: usize) {
        let out = &mut target[offset..offset + self.len()];
        match self {
            Vector::Zero(_) => out.fill(0.0),
            Vector::Dense(d) => out.copy_from_slice(d),
            Vector::Shared(d) => out.copy_from_slice(d),
            Vector::Sparse(s) => {
                out.fill(0.0);
                for (i, v) in s.iter() {
                    out[i] = v;
                }
            }
        }
    }

    /// `target[offset + i * stride] += self[i]` for every `i`.
    pub fn add_to_array(&self, target: &mut [f64], offset: usize, stride: usize) {
        match self {
            Vector::Zero(_) => {}
            Vector::Sparse(s) => {
                for (i, v) in s.iter() {
                    target[offset + i * stride] += v;
                }
            }
            Vector::Dense(d) => add_strided(d, target, offset, stride),
            Vector::Shared(d) => add_strided(d, target, offset, stride),
        }
    }

    /// `target[dst_offset + k] += factor * self[src_offset + k]` for `k < len`.
    pub fn add_multiple_to_array(&self, factor: f64, src_offset: usize, target: &mut [f64], dst_offset: usize, len: usize) {
        if factor == 0.0 {
            return;
        }
        match self {
            Vector::Zero(_) => {}
            Vector::Sparse(s) => {
                for (i, v) in s.iter() {
                    if i >= src_offset && i < src_offset + len {
                        target[dst_offset + i - src_offset] += factor * v;
                    }
                }
            }
            Vector::Dense(d) => add_scaled(&d[src_offset..src_offset + len], factor, &mut target[dst_offset..dst_offset + len]),
            Vector::Shared(d) => add_scaled(&d[src_offset..src_offset + len], factor, &mut target[dst_offset..dst_offset + len]),
        }
    }

    pub fn dot(&self, x: &[f64]) -> f64 {
        match self {
            Vector::Zero(_) => 0.0,
            Vector::Sparse(s) => s.dot(x),
            Vector::Dense(d) => d.iter().zip(x).map(|(a, b)| a * b).sum(),
            Vector::Shared(d) => d.iter().zip(x).map(|(a, b)| a * b).sum(),
        }
    }

    /// In-place `self += other`. The receiver must be mutable.
    pub fn add(&mut self, other: &Vector) -> Result<(), SparseError> {
        if other.len() != self.len() {
            return Err(SparseError::ShapeMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        match self {
            Vector::Dense(d) => {
                other.add_to_array(d, 0, 1);
                Ok(())
            }
            Vector::Sparse(s) => {
                match other {
                    Vector::Zero(_) => {}
                    Vector::Sparse(o) => o.iter().for_each(|(i, v)| s.add_at(i, v)),
                    _ => {
                        // dense operand densifies the receiver
                        let mut d = s.to_dense();
                        other.add_to_array(&mut d, 0, 1);
                        *self = Vector::Dense(d);
                    }
                }
                Ok(())
            }
            Vector::Zero(_) | Vector::Shared(_) => Err(SparseError::Immutable),
        }
    }

    /// `self + other` as a new mutable vector.
    pub fn add_copy(&self, other: &Vector) -> Result<Vector, SparseError> {
        let mut out = self.mutable();
        out.add(other)?;
        Ok(out)
    }

    /// `self * factor` as a new vector. Zero stays zero.
    pub fn multiply_copy(&self, factor: f64) -> Vector {
        match self {
            Vector::Zero(n) => Vector::Zero(*n),
            Vector::Sparse(s) => {
                let mut s = s.clone();
                s.scale(factor);
                Vector::Sparse(s)
            }
            Vector::Dense(d) => Vector::Dense(d.iter().map(|x| x * factor).collect()),
            Vector::Shared(d) => Vector::Dense(d.iter().map(|x| x * factor).collect()),
        }
    }

    /// Apply `op` to every element in place. The receiver must be mutable; a sparse
    /// vector becomes dense when `op` is stochastic or does not map zero to zero.
    pub fn apply_op(&mut self, op: &dyn Op) -> Result<(), SparseError> {
        match self {
            Vector::Dense(d) => op.apply_to(d),
            Vector::Sparse(s) => {
                if !op.is_stochastic() && op.apply(0.0) == 0.0 {
                    s.map_stored(|values| op.apply_to(values));
                } else {
                    let mut d = s.to_dense();
                    op.apply_to(&mut d);
                    *self = Vector::Dense(d);
                }
            }
            Vector::Zero(_) | Vector::Shared(_) => return Err(SparseError::Immutable),
        }
        Ok(())
    }
}

fn add_strided(src: &[f64], target: &mut [f64], offset: usize, stride: usize) {
    for (i, &v) in src.iter().enumerate() {
        target[offset + i * stride] += v;
    }
}

fn add_scaled(src: &[f64], factor: f64, dst: &mut [f64]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d += factor * s;
    }
}

/// Value equality: backings are irrelevant, lengths must match.
impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        match (self, other) {
            (Vector::Zero(_), o) | (o, Vector::Zero(_)) => o.is_zero(),
            (Vector::Sparse(a), Vector::Sparse(b)) => a.indices() == b.indices() && a.values() == b.values(),
            (a, b) => (0..a.len()).all(|i| a.unchecked_get(i) == b.unchecked_get(i)),
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::Dense(data)
    }
}

impl From<SparseVector> for Vector {
    fn from(s: SparseVector) -> Self {
        Vector::Sparse(s)
    }
}
