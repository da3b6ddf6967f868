//! Sparse vector of doubles with sorted column indices.

use crate::error::{MatrixError, Result};
use serde::{Deserialize, Serialize};

/// A sparse row (or column) of `f64` values.
///
/// Stored as two parallel vectors: strictly increasing indices and their
/// values. Entries that are not stored read as `0.0`. Writing `0.0` to a
/// stored index removes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSparseVector")]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

/// Serialized form, checked before it becomes a [`SparseVector`].
#[derive(Deserialize)]
struct RawSparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl TryFrom<RawSparseVector> for SparseVector {
    type Error = MatrixError;

    fn try_from(raw: RawSparseVector) -> Result<Self> {
        Self::from_parts(raw.indices, raw.values)
    }
}

impl SparseVector {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty vector with room for `capacity` stored entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Build from a dense slice, storing only non-zero values.
    pub fn from_dense(dense: &[f64]) -> Self {
        let mut vector = Self::new();
        for (index, &value) in dense.iter().enumerate() {
            if value != 0.0 {
                vector.indices.push(index);
                vector.values.push(value);
            }
        }
        vector
    }

    /// Build from `(index, value)` pairs in any order.
    ///
    /// Zero values are dropped. Repeated indices are rejected.
    pub fn from_pairs(pairs: &[(usize, f64)]) -> Result<Self> {
        let mut sorted = pairs.to_vec();
        sorted.sort_by_key(|&(index, _)| index);
        if let Some(w) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(MatrixError::InvalidArgument(format!(
                "Index {} appears more than once",
                w[0].0
            )));
        }
        let (indices, values) = sorted.into_iter().filter(|&(_, v)| v != 0.0).unzip();
        Ok(Self { indices, values })
    }

    /// Build from parallel index and value vectors.
    ///
    /// Indices must already be strictly increasing and both vectors the same
    /// length. Stored zeros are dropped.
    pub fn from_parts(indices: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(MatrixError::DimensionMismatch {
                expected: indices.len(),
                actual: values.len(),
            });
        }
        if let Some(w) = indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(MatrixError::InvalidArgument(format!(
                "Indices must be strictly increasing, found {} before {}",
                w[0], w[1]
            )));
        }
        let mut vector = Self { indices, values };
        vector.prune_zeros();
        Ok(vector)
    }

    /// Value at `index`, `0.0` if not stored. O(log k).
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Set the value at `index`, keeping indices sorted.
    ///
    /// Writing `0.0` removes a stored entry; writing `0.0` to an absent index
    /// does nothing. Inserting shifts later entries, so this is O(k).
    pub fn set(&mut self, index: usize, value: f64) {
        match self.indices.binary_search(&index) {
            Ok(pos) if value == 0.0 => {
                self.indices.remove(pos);
                self.values.remove(pos);
            }
            Ok(pos) => self.values[pos] = value,
            Err(_) if value == 0.0 => {}
            Err(pos) => {
                self.indices.insert(pos, index);
                self.values.insert(pos, value);
            }
        }
    }

    /// Whether `index` has a stored entry.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Largest stored index.
    #[inline]
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Stored indices, strictly increasing.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values, parallel to [`indices`](Self::indices).
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over stored `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense vector.
    ///
    /// Only stored entries contribute. Stored indices past the end of `other`
    /// are skipped rather than treated as an error.
    pub fn dot_dense(&self, other: &[f64]) -> f64 {
        self.iter()
            .take_while(|&(index, _)| index < other.len())
            .map(|(index, value)| value * other[index])
            .sum()
    }

    /// Dot product with another sparse vector.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut a, mut b) = (0, 0);
        let mut total = 0.0;
        while a < self.indices.len() && b < other.indices.len() {
            match self.indices[a].cmp(&other.indices[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    total += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        total
    }

    /// Replace every stored value with `f(index, value)`.
    ///
    /// Implicit zeros are never visited: a transform mapping `0.0` to something
    /// else will not create new entries. Entries the transform maps to `0.0`
    /// are dropped.
    pub fn for_each_non_zero<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, f64) -> f64,
    {
        for (index, value) in self.indices.iter().zip(self.values.iter_mut()) {
            *value = f(*index, *value);
        }
        self.prune_zeros();
    }

    /// Replace every stored value with `f(value)`.
    ///
    /// Same contract as [`for_each_non_zero`](Self::for_each_non_zero):
    /// implicit zeros stay implicit.
    pub fn assign<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        self.for_each_non_zero(|_, value| f(value));
    }

    /// Sum of stored values.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Dense copy of length `len`. Stored entries at or past `len` are dropped.
    pub fn to_dense(&self, len: usize) -> Vec<f64> {
        let mut dense = vec![0.0; len];
        self.scatter_into(&mut dense);
        dense
    }

    /// Write stored values into `buffer`, skipping indices past its end.
    pub fn scatter_into(&self, buffer: &mut [f64]) {
        for (index, value) in self.iter() {
            if index >= buffer.len() {
                break;
            }
            buffer[index] = value;
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.values.clear();
    }

    fn prune_zeros(&mut self) {
        if !self.values.contains(&0.0) {
            return;
        }
        let mut write = 0;
        for read in 0..self.values.len() {
            if self.values[read] != 0.0 {
                self.indices[write] = self.indices[read];
                self.values[write] = self.values[read];
                write += 1;
            }
        }
        self.indices.truncate(write);
        self.values.truncate(write);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sorted(v: &SparseVector) {
        assert!(v.indices().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(v.indices().len(), v.values().len());
    }

    #[test]
    fn test_set_keeps_indices_sorted() {
        let mut v = SparseVector::new();
        for &index in &[7, 2, 9, 0, 5, 2, 11, 1] {
            v.set(index, index as f64 + 0.5);
            assert_sorted(&v);
        }
        assert_eq!(v.indices(), &[0, 1, 2, 5, 7, 9, 11]);

        v.set(5, 0.0);
        v.set(0, 0.0);
        assert_sorted(&v);
        assert_eq!(v.indices(), &[1, 2, 7, 9, 11]);
    }

    #[test]
    fn test_get_set() {
        let mut v = SparseVector::new();
        v.set(4, 3.25);
        assert_eq!(v.get(4), 3.25);
        assert_eq!(v.get(3), 0.0);

        v.set(4, -1.0);
        assert_eq!(v.get(4), -1.0);
        assert_eq!(v.nnz(), 1);

        v.set(4, 0.0);
        assert_eq!(v.get(4), 0.0);
        assert!(!v.contains(4));
        assert!(v.is_empty());

        // Zero on an absent index is a no-op
        v.set(10, 0.0);
        assert!(v.is_empty());
    }

    #[test]
    fn test_nan_is_stored() {
        let mut v = SparseVector::new();
        v.set(2, f64::NAN);
        assert!(v.contains(2));
        assert!(v.get(2).is_nan());
    }

    #[test]
    fn test_dot_dense_skips_out_of_range() {
        let v = SparseVector::from_pairs(&[(0, 2.0), (3, 4.0), (10, 100.0)]).unwrap();
        let dense = [1.0, 9.0, 9.0, 0.5];
        assert!((v.dot_dense(&dense) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_dot_sparse() {
        let a = SparseVector::from_pairs(&[(0, 1.0), (2, 2.0), (5, 3.0)]).unwrap();
        let b = SparseVector::from_pairs(&[(2, 10.0), (4, 7.0), (5, -1.0)]).unwrap();
        assert!((a.dot(&b) - 17.0).abs() < 1e-10);
        assert!((a.dot(&b) - a.dot_dense(&b.to_dense(6))).abs() < 1e-10);
    }

    #[test]
    fn test_assign_does_not_touch_implicit_zeros() {
        let mut v = SparseVector::from_dense(&[0.0, 2.0, 0.0, 4.0]);
        v.assign(|x| x + 1.0);
        assert_eq!(v.to_dense(4), vec![0.0, 3.0, 0.0, 5.0]);
        assert_eq!(v.nnz(), 2);
    }

    #[test]
    fn test_for_each_non_zero_drops_new_zeros() {
        let mut v = SparseVector::from_dense(&[1.0, 2.0, 3.0]);
        v.for_each_non_zero(|index, x| if index == 1 { 0.0 } else { x * 2.0 });
        assert_eq!(v.indices(), &[0, 2]);
        assert_eq!(v.values(), &[2.0, 6.0]);
    }

    #[test]
    fn test_sum_and_max_index() {
        let v = SparseVector::from_dense(&[0.0, 1.5, 0.0, 2.5, 0.0]);
        assert!((v.sum() - 4.0).abs() < 1e-10);
        assert_eq!(v.max_index(), Some(3));
        assert_eq!(SparseVector::new().max_index(), None);
    }

    #[test]
    fn test_from_pairs_rejects_repeats() {
        assert!(SparseVector::from_pairs(&[(1, 1.0), (1, 2.0)]).is_err());
        // A repeat is rejected even when one of the values is zero
        assert!(SparseVector::from_pairs(&[(1, 0.0), (1, 2.0)]).is_err());
        let v = SparseVector::from_pairs(&[(3, 1.0), (1, 0.0), (0, 2.0)]).unwrap();
        assert_eq!(v.indices(), &[0, 3]);
    }

    #[test]
    fn test_from_parts_checks_layout() {
        let v = SparseVector::from_parts(vec![1, 4, 6], vec![1.0, 0.0, 3.0]).unwrap();
        assert_eq!(v.indices(), &[1, 6]);
        assert!(matches!(
            SparseVector::from_parts(vec![5, 1], vec![1.0, 2.0]),
            Err(MatrixError::InvalidArgument(_))
        ));
        assert!(SparseVector::from_parts(vec![2, 2], vec![1.0, 2.0]).is_err());
        assert!(matches!(
            SparseVector::from_parts(vec![1], vec![]),
            Err(MatrixError::DimensionMismatch { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let v: SparseVector =
            serde_json::from_str(r#"{"indices":[0,3],"values":[1.5,2.5]}"#).unwrap();
        assert_eq!(v.get(3), 2.5);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"indices":[0,3],"values":[1.5,2.5]}"#);

        let unsorted = r#"{"indices":[5,1],"values":[1.0,2.0]}"#;
        assert!(serde_json::from_str::<SparseVector>(unsorted).is_err());
        let short = r#"{"indices":[1],"values":[]}"#;
        assert!(serde_json::from_str::<SparseVector>(short).is_err());
    }
}
