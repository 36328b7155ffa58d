// Column schema for tables
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

/// Ordered sequence of column names.
///
/// Names are not required to be unique; lookups by name resolve to the
/// first column carrying that name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Create a new schema with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get the column names in order
    pub fn names(&self) -> &[String] {
        &self.columns
    }

    /// Get the position of a column by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check if a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Get a column name by position
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    pub(crate) fn push(&mut self, name: String) {
        self.columns.push(name);
    }

    pub(crate) fn remove(&mut self, index: usize) -> String {
        self.columns.remove(index)
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.columns.swap(a, b);
    }

    /// Reorder columns so that position `i` holds the column previously at `order[i]`
    pub(crate) fn permute(&mut self, order: &[usize]) {
        self.columns = permuted(&self.columns, order);
    }
}

/// Build a new vector holding `values[order[i]]` at position `i`
pub(crate) fn permuted<T: Clone>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i].clone()).collect()
}
