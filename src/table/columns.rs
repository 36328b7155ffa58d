// Column operations on tables
// Author: Gabriel Demetrios Lafis

use log::debug;

use super::{Table, TableError, TableResult};
use crate::data::permuted;
use crate::utils::validate_len;

impl Table {
    /// Resolve a column name to its position
    pub(crate) fn column_index(&self, name: &str) -> TableResult<usize> {
        self.schema
            .index_of(name)
            .ok_or_else(|| TableError::not_found(name))
    }

    /// Project a column's cells in row order
    pub fn column(&self, name: &str) -> TableResult<Vec<&str>> {
        self.require_prepared()?;
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Append a column; `values` must hold one value per row
    pub fn add_column<I, V>(&mut self, name: &str, values: I) -> TableResult<()>
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.require_prepared()?;

        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        validate_len(values.len(), self.rows.len(), name).map_err(TableError::Validation)?;

        self.schema.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }

        self.invalidate_index();
        debug!("Added column '{}'", name);
        Ok(())
    }

    /// Remove a column from the schema and every row
    pub fn delete_column(&mut self, name: &str) -> TableResult<()> {
        self.require_prepared()?;
        let index = self.column_index(name)?;

        self.schema.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }

        if self.get_primary() == Some(name) && !self.schema.contains(name) {
            debug!("Primary key column '{}' deleted", name);
            self.primary = None;
        }

        self.invalidate_index();
        debug!("Deleted column '{}'", name);
        Ok(())
    }

    /// Reorder all columns to follow `names`, which must name every column exactly once
    pub fn rearrange_columns<S: AsRef<str>>(&mut self, names: &[S]) -> TableResult<()> {
        self.require_prepared()?;
        validate_len(names.len(), self.schema.len(), "columns").map_err(TableError::Validation)?;

        // Repeated header names map to successive unused positions
        let mut used = vec![false; self.schema.len()];
        let mut order = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let index = self.column_index(name)?;
            let index = (index..self.schema.len())
                .find(|&i| !used[i] && self.schema.name_at(i) == Some(name))
                .ok_or_else(|| {
                    TableError::Validation(format!("Column '{}' is listed more than once", name))
                })?;
            used[index] = true;
            order.push(index);
        }

        self.schema.permute(&order);
        for row in &mut self.rows {
            *row = permuted(row, &order);
        }

        self.invalidate_index();
        Ok(())
    }

    /// Swap the positions of two columns
    pub fn switch_columns(&mut self, a: &str, b: &str) -> TableResult<()> {
        self.require_prepared()?;
        let first = self.column_index(a)?;
        let second = self.column_index(b)?;

        self.schema.swap(first, second);
        for row in &mut self.rows {
            row.swap(first, second);
        }

        self.invalidate_index();
        Ok(())
    }
}
