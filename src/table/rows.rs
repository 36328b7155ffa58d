// Row operations on tables
// Author: Gabriel Demetrios Lafis

use log::debug;

use super::{Table, TableError, TableResult};
use crate::data::{to_record, Record};
use crate::utils::{validate_index, validate_len};

impl Table {
    /// Append a row; it must hold one value per column
    pub fn add_row<I, V>(&mut self, row: I) -> TableResult<()>
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.require_prepared()?;

        let row: Vec<String> = row.into_iter().map(|v| v.to_string()).collect();
        validate_len(row.len(), self.schema.len(), "row").map_err(TableError::Validation)?;

        self.rows.push(row);
        self.invalidate_index();
        Ok(())
    }

    fn require_primary(&self) -> TableResult<()> {
        if self.primary.is_none() {
            return Err(TableError::State(
                "Rows can only be deleted once a primary key is assigned".to_string(),
            ));
        }
        Ok(())
    }

    /// Remove the row at `index`. Requires an assigned primary key.
    pub fn delete_row(&mut self, index: usize) -> TableResult<()> {
        self.require_prepared()?;
        self.require_primary()?;
        validate_index(index, self.rows.len(), "row").map_err(TableError::Validation)?;

        self.rows.remove(index);
        self.invalidate_index();
        debug!("Deleted row {}", index);
        Ok(())
    }

    /// Remove several rows by position. Requires an assigned primary key.
    ///
    /// All indices are checked before anything is removed.
    pub fn delete_rows(&mut self, indices: &[usize]) -> TableResult<()> {
        self.require_prepared()?;
        self.require_primary()?;
        for &index in indices {
            validate_index(index, self.rows.len(), "row").map_err(TableError::Validation)?;
        }

        let mut indices = indices.to_vec();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();

        for &index in &indices {
            self.rows.remove(index);
        }

        self.invalidate_index();
        debug!("Deleted {} rows", indices.len());
        Ok(())
    }

    /// Get one row as a name→value record.
    ///
    /// An empty `column_names` selects every column.
    pub fn get<S: AsRef<str>>(&self, index: usize, column_names: &[S]) -> TableResult<Record> {
        self.require_prepared()?;
        validate_index(index, self.rows.len(), "row").map_err(TableError::Validation)?;
        let row = &self.rows[index];

        if column_names.is_empty() {
            return Ok(to_record(self.schema.names().iter().zip(row.iter())));
        }

        let mut positions = Vec::with_capacity(column_names.len());
        for name in column_names {
            positions.push(self.column_index(name.as_ref())?);
        }

        Ok(to_record(
            positions.into_iter().map(|i| (&self.schema.names()[i], &row[i])),
        ))
    }
}
