//! Sparse indexed vector: sorted `(index, value)` pairs over a fixed length.

use crate::error::SparseError;

/// A mutable sparse vector storing only its non-zero entries.
///
/// `indices` is strictly increasing and every stored value is non-zero.
#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    len: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// An all-zero sparse vector of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Collect the non-zero entries of a dense slice.
    pub fn from_dense(data: &[f64]) -> Self {
        let mut v = Self::zeros(data.len());
        for (i, &x) in data.iter().enumerate() {
            if x != 0.0 {
                v.indices.push(i);
                v.values.push(x);
            }
        }
        v
    }

    /// Build from parallel index/value arrays. Indices must be strictly increasing and
    /// in range; explicit zeros are dropped.
    pub fn from_parts(len: usize, indices: Vec<usize>, values: Vec<f64>) -> Result<Self, SparseError> {
        if indices.len() != values.len() {
            return Err(SparseError::ShapeMismatch {
                expected: indices.len(),
                found: values.len(),
            });
        }
        for w in indices.windows(2) {
            if w[0] >= w[1] {
                return Err(SparseError::InvalidArgument(format!(
                    "sparse indices not strictly increasing: {} then {}",
                    w[0], w[1]
                )));
            }
        }
        if let Some(&last) = indices.last() {
            if last >= len {
                return Err(SparseError::out_of_bounds("vector", last, len));
            }
        }
        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|&(_, x)| x != 0.0)
            .unzip();
        Ok(Self { len, indices, values })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn get(&self, i: usize) -> f64 {
        match self.indices.binary_search(&i) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Write `value` at `i`. Writing zero removes the entry.
    pub fn set(&mut self, i: usize, value: f64) {
        match self.indices.binary_search(&i) {
            Ok(pos) if value == 0.0 => {
                self.indices.remove(pos);
                self.values.remove(pos);
            }
            Ok(pos) => self.values[pos] = value,
            Err(_) if value == 0.0 => {}
            Err(pos) => {
                self.indices.insert(pos, i);
                self.values.insert(pos, value);
            }
        }
    }

    pub fn add_at(&mut self, i: usize, delta: f64) {
        if delta != 0.0 {
            let v = self.get(i);
            self.set(i, v + delta);
        }
    }

    /// True if every entry in `[start, start + len)` is zero.
    pub fn is_range_zero(&self, start: usize, len: usize) -> bool {
        let from = self.indices.partition_point(|&i| i < start);
        self.indices.get(from).is_none_or(|&i| i >= start + len)
    }

    pub fn scale(&mut self, factor: f64) {
        if factor == 0.0 {
            self.indices.clear();
            self.values.clear();
            return;
        }
        self.values.iter_mut().for_each(|x| *x *= factor);
    }

    /// Map every stored value through `f`, dropping entries that become zero.
    /// Only valid when `f(0) == 0`.
    pub(crate) fn map_stored(&mut self, f: impl Fn(&mut [f64])) {
        f(&mut self.values);
        let mut keep = 0;
        for k in 0..self.values.len() {
            if self.values[k] != 0.0 {
                self.indices[keep] = self.indices[k];
                self.values[keep] = self.values[k];
                keep += 1;
            }
        }
        self.indices.truncate(keep);
        self.values.truncate(keep);
    }

    pub fn dot(&self, x: &[f64]) -> f64 {
        self.iter().map(|(i, v)| v * x[i]).sum()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.len];
        for (i, v) in self.iter() {
            out[i] = v;
        }
        out
    }
}
