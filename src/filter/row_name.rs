//! Keep or drop rows by exact name.

use crate::data::{MatrixFactory, NamedMatrix};
use crate::error::Result;
use crate::filter::{retain_rows, unchanged, MatrixFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Row filter on membership in a set of names.
///
/// In include mode only rows named in the set survive, and the scan stops
/// once every name has been found. In exclude mode the named rows are
/// removed. Unnamed rows never match. An empty set means nothing to do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowNameFilter {
    names: HashSet<String>,
    exclude: bool,
}

impl RowNameFilter {
    /// Keep only rows named in `names`.
    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            exclude: false,
        }
    }

    /// Remove rows named in `names`.
    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: true,
            ..Self::include(names)
        }
    }

    pub fn set_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
    }

    pub fn set_exclude(&mut self, exclude: bool) {
        self.exclude = exclude;
    }

    pub fn names(&self) -> &HashSet<String> {
        &self.names
    }

    pub fn is_exclude(&self) -> bool {
        self.exclude
    }
}

impl<M> MatrixFilter<M> for RowNameFilter
where
    M: NamedMatrix + Clone,
{
    fn name(&self) -> &'static str {
        "row_name"
    }

    fn filter_with<F: MatrixFactory<M>>(&self, input: &M, factory: &F) -> Result<M> {
        let name = MatrixFilter::<M>::name(self);
        if self.names.is_empty() {
            return Ok(unchanged(name, input));
        }

        let mut keep = Vec::new();
        if self.exclude {
            keep.extend((0..input.rows()).filter(|&row| {
                input
                    .row_name(row)
                    .map_or(true, |row_name| !self.names.contains(row_name))
            }));
        } else {
            for row in 0..input.rows() {
                if input.row_name(row).is_some_and(|row_name| self.names.contains(row_name)) {
                    keep.push(row);
                    if keep.len() == self.names.len() {
                        debug!(scanned = row + 1, "all requested names found");
                        break;
                    }
                }
            }
        }

        Ok(retain_rows(name, input, &keep, factory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CompressedSparseMatrix, DenseMatrix};

    fn create_test_matrix() -> DenseMatrix {
        let rows: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64, (i * 10) as f64]).collect();
        let mut mat = DenseMatrix::from_rows(&rows).unwrap();
        mat.set_row_names(&["a", "b", "c", "d", "e"]).unwrap();
        mat.set_column_names(&["x", "y"]).unwrap();
        mat
    }

    #[test]
    fn test_include() {
        let mat = create_test_matrix();
        let filter = RowNameFilter::include(["d", "b", "missing"]);
        let out = filter.filter(&mat).unwrap();
        // Input order is preserved
        assert_eq!(out.row_names(), vec!["b", "d"]);
        assert_eq!(out.row_by_name("d").unwrap(), vec![3.0, 30.0]);
    }

    #[test]
    fn test_exclude() {
        let mat = create_test_matrix();
        let filter = RowNameFilter::exclude(["a", "e"]);
        let out = filter.filter(&mat).unwrap();
        assert_eq!(out.row_names(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_never_grows() {
        let mat = create_test_matrix();
        let sets: [&[&str]; 4] = [
            &["a"],
            &["a", "a", "b"],
            &["zz"],
            &["a", "b", "c", "d", "e", "f"],
        ];
        for names in sets {
            let included = RowNameFilter::include(names.iter().copied());
            assert!(included.filter(&mat).unwrap().rows() <= mat.rows());
            let excluded = RowNameFilter::exclude(names.iter().copied());
            assert!(excluded.filter(&mat).unwrap().rows() <= mat.rows());
        }
    }

    #[test]
    fn test_empty_set_returns_input() {
        let mat = create_test_matrix();
        let filter = RowNameFilter::default();
        assert_eq!(filter.filter(&mat).unwrap(), mat);
    }

    #[test]
    fn test_compressed_storage() {
        let mut mat =
            CompressedSparseMatrix::from_triplets(3, 2, &[(0, 0, 1.0), (2, 1, 5.0)]).unwrap();
        mat.set_row_names(&["r0", "r1", "r2"]).unwrap();
        let out = RowNameFilter::include(["r2"]).filter(&mat).unwrap();
        assert_eq!(out.rows(), 1);
        assert_eq!(out.get_quick(0, 1), 5.0);
        assert_eq!(out.nnz(), 1);
    }
}
