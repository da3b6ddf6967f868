//! Bidirectional name <-> index mapping shared by every matrix type.

use crate::error::{MatrixError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Matrix axis, used to label name lookups and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// What to do when a name that is already registered is added again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnDuplicate {
    /// Leave the existing mapping untouched and report nothing.
    Ignore,
    /// Fail with [`MatrixError::DuplicateName`].
    Reject,
}

impl OnDuplicate {
    /// Policy applied by `add_row_name`.
    pub const ROWS: OnDuplicate = OnDuplicate::Ignore;
    /// Policy applied by `add_column_name`.
    pub const COLUMNS: OnDuplicate = OnDuplicate::Reject;

    /// Default policy for an axis.
    pub fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::Row => Self::ROWS,
            Axis::Column => Self::COLUMNS,
        }
    }
}

/// Names along one axis.
///
/// Positions are stored in a slot vector so a name can be looked up by index,
/// and indices need not be contiguous while a matrix is being filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMap {
    slots: Vec<Option<String>>,
    index: HashMap<String, usize>,
}

impl NameMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered names.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Register `name` at `at`, or after the highest used position when `at` is `None`.
    ///
    /// Returns `false` without changing anything if the name is already present.
    /// A name previously stored at the target position is unmapped.
    pub fn insert(&mut self, name: &str, at: Option<usize>) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        let position = at.unwrap_or(self.slots.len());
        if self.slots.len() <= position {
            self.slots.resize(position + 1, None);
        }
        if let Some(previous) = self.slots[position].replace(name.to_string()) {
            self.index.remove(&previous);
        }
        self.index.insert(name.to_string(), position);
        true
    }

    /// Position of `name`, if registered.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name stored at `position`, if any.
    #[inline]
    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.slots.get(position).and_then(|slot| slot.as_deref())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names in position order, skipping unassigned positions.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.iter().filter_map(|slot| slot.as_deref())
    }

    /// Names in position order as owned strings.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(String::from).collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}

/// Row and column name maps for one matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameIndex {
    rows: NameMap,
    columns: NameMap,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name map for an axis.
    pub fn axis(&self, axis: Axis) -> &NameMap {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut NameMap {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    #[inline]
    pub fn rows(&self) -> &NameMap {
        &self.rows
    }

    #[inline]
    pub fn columns(&self) -> &NameMap {
        &self.columns
    }

    /// Register a name under an explicit duplicate policy.
    ///
    /// Returns `Ok(true)` if the name was added and `Ok(false)` if it was
    /// already present and ignored.
    pub fn register(
        &mut self,
        axis: Axis,
        name: &str,
        at: Option<usize>,
        policy: OnDuplicate,
    ) -> Result<bool> {
        let map = self.axis_mut(axis);
        if map.contains(name) {
            return match policy {
                OnDuplicate::Ignore => Ok(false),
                OnDuplicate::Reject => Err(MatrixError::DuplicateName {
                    axis,
                    name: name.to_string(),
                }),
            };
        }
        Ok(map.insert(name, at))
    }

    /// Append a row name. Duplicates are silently ignored.
    pub fn add_row_name(&mut self, name: &str) -> bool {
        self.rows.insert(name, None)
    }

    /// Assign a row name to a specific index. Duplicates are silently ignored.
    pub fn add_row_name_at(&mut self, name: &str, index: usize) -> bool {
        self.rows.insert(name, Some(index))
    }

    /// Append a column name. Duplicates are rejected.
    pub fn add_column_name(&mut self, name: &str) -> Result<()> {
        self.register(Axis::Column, name, None, OnDuplicate::COLUMNS)?;
        Ok(())
    }

    /// Assign a column name to a specific index. Duplicates are rejected.
    pub fn add_column_name_at(&mut self, name: &str, index: usize) -> Result<()> {
        self.register(Axis::Column, name, Some(index), OnDuplicate::COLUMNS)?;
        Ok(())
    }

    /// Replace all names along an axis, applying that axis' default duplicate policy.
    pub fn set_names<S: AsRef<str>>(&mut self, axis: Axis, names: &[S]) -> Result<()> {
        self.axis_mut(axis).clear();
        for (i, name) in names.iter().enumerate() {
            self.register(axis, name.as_ref(), Some(i), OnDuplicate::for_axis(axis))?;
        }
        Ok(())
    }

    /// Row names become column names and vice versa.
    pub fn transposed(&self) -> Self {
        Self {
            rows: self.columns.clone(),
            columns: self.rows.clone(),
        }
    }

    /// Copy one axis' names from another index.
    pub fn copy_axis_from(&mut self, axis: Axis, other: &NameIndex) {
        *self.axis_mut(axis) = other.axis(axis).clone();
    }

    /// Index of `name` along `axis`, failing with `NotFound`.
    pub fn index_of(&self, axis: Axis, name: &str) -> Result<usize> {
        self.axis(axis)
            .index_of(name)
            .ok_or_else(|| MatrixError::NotFound {
                axis,
                name: name.to_string(),
            })
    }
}
