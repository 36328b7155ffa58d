// Primary key index for tables
// Author: Gabriel Demetrios Lafis

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::{Table, TableError, TableResult};

/// Result of a batch key lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMatches {
    /// Matching row positions in table order, without repeats
    pub positions: Vec<usize>,
    /// Requested values that matched no row, in request order
    pub missing: Vec<String>,
}

/// Cached value→row positions of the primary-key column
#[derive(Debug)]
struct Positions {
    row_count: usize,
    by_value: HashMap<String, usize>,
}

impl Positions {
    fn build(rows: &[Vec<String>], column: usize) -> Self {
        let mut by_value = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            // First occurrence wins for duplicated keys
            by_value.entry(row[column].clone()).or_insert(position);
        }

        Positions {
            row_count: rows.len(),
            by_value,
        }
    }
}

/// Designates a column as the table's primary key.
///
/// Positions are derived lazily and rebuilt after any structural change.
#[derive(Debug)]
pub struct PrimaryKeyIndex {
    column: String,
    cache: RefCell<Option<Positions>>,
}

impl PrimaryKeyIndex {
    /// Create an index over the named column
    pub fn new(column: &str) -> Self {
        PrimaryKeyIndex {
            column: column.to_string(),
            cache: RefCell::new(None),
        }
    }

    /// Get the primary-key column name
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Discard cached positions
    pub fn invalidate(&self) {
        self.cache.replace(None);
    }

    /// Check whether positions are currently cached
    pub fn is_built(&self) -> bool {
        self.cache.borrow().is_some()
    }

    /// Find the first row whose key cell equals `key`.
    ///
    /// Cached positions are trusted until [`PrimaryKeyIndex::invalidate`]
    /// is called or the row count changes.
    pub(crate) fn lookup(&self, rows: &[Vec<String>], column: usize, key: &str) -> Option<usize> {
        let mut cache = self.cache.borrow_mut();

        if cache.as_ref().map_or(true, |c| c.row_count != rows.len()) {
            *cache = Some(Positions::build(rows, column));
        }

        cache.as_ref()?.by_value.get(key).copied()
    }
}

impl Table {
    /// Designate `column` as the primary key.
    ///
    /// Fails on duplicate values unless `ignore_duplicate` is set, in which
    /// case lookups resolve to the first matching row in table order.
    pub fn assign_primary(&mut self, column: &str, ignore_duplicate: bool) -> TableResult<()> {
        self.require_prepared()?;
        let index = self.column_index(column)?;

        let distinct: HashSet<&str> = self.rows.iter().map(|row| row[index].as_str()).collect();
        if distinct.len() < self.rows.len() && !ignore_duplicate {
            return Err(TableError::Validation(format!(
                "Column '{}' has {} duplicate values and cannot be a primary key",
                column,
                self.rows.len() - distinct.len()
            )));
        }

        self.primary = Some(PrimaryKeyIndex::new(column));
        debug!("Assigned primary key '{}'", column);
        Ok(())
    }

    /// Get the primary-key column name
    pub fn get_primary(&self) -> Option<&str> {
        self.primary.as_ref().map(PrimaryKeyIndex::column)
    }

    fn primary_index(&self) -> TableResult<(&PrimaryKeyIndex, usize)> {
        self.require_prepared()?;
        let primary = self
            .primary
            .as_ref()
            .ok_or_else(|| TableError::State("No primary key assigned".to_string()))?;
        let column = self.column_index(primary.column())?;
        Ok((primary, column))
    }

    /// Find the first row whose primary-key cell equals `value`.
    ///
    /// Returns `Ok(None)` when no row matches.
    pub fn find_row<V: ToString>(&self, value: V) -> TableResult<Option<usize>> {
        let (primary, column) = self.primary_index()?;
        Ok(primary.lookup(&self.rows, column, &value.to_string()))
    }

    /// Find rows for several keys.
    ///
    /// Unmatched keys are reported in [`RowMatches::missing`] and logged;
    /// they do not fail the lookup.
    pub fn find_rows<I, V>(&self, values: I) -> TableResult<RowMatches>
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let (primary, column) = self.primary_index()?;
        let mut matches = RowMatches::default();

        for value in values {
            let key = value.to_string();
            match primary.lookup(&self.rows, column, &key) {
                Some(position) => matches.positions.push(position),
                None => {
                    warn!("No row found with {} = '{}'", primary.column(), key);
                    matches.missing.push(key);
                }
            }
        }

        matches.positions.sort_unstable();
        matches.positions.dedup();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableSource;
    use std::io::Cursor;

    fn table() -> Table {
        let source = TableSource::reader(Cursor::new(
            "id,age,work_type\n1,30,private\n2,40,public\n3,30,private\n",
        ));
        let mut table = Table::new(source);
        table.prepare().unwrap();
        table
    }

    #[test]
    fn test_assign_primary_unique_column() {
        let mut table = table();
        assert_eq!(table.get_primary(), None);
        table.assign_primary("id", false).unwrap();
        assert_eq!(table.get_primary(), Some("id"));
    }

    #[test]
    fn test_assign_primary_duplicates() {
        let mut table = table();
        assert!(matches!(
            table.assign_primary("age", false),
            Err(TableError::Validation(_))
        ));
        assert_eq!(table.get_primary(), None);

        table.assign_primary("work_type", true).unwrap();
        assert_eq!(table.get_primary(), Some("work_type"));
    }

    #[test]
    fn test_assign_primary_unknown_column() {
        let mut table = table();
        assert!(matches!(
            table.assign_primary("height", false),
            Err(TableError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_row() {
        let mut table = table();
        assert!(matches!(table.find_row("2"), Err(TableError::State(_))));

        table.assign_primary("id", false).unwrap();
        assert_eq!(table.find_row("2").unwrap(), Some(1));
        assert_eq!(table.find_row(3).unwrap(), Some(2));
        assert_eq!(table.find_row("9").unwrap(), None);
    }

    #[test]
    fn test_duplicate_key_resolves_to_first_row() {
        let mut table = table();
        table.assign_primary("work_type", true).unwrap();
        assert_eq!(table.find_row("private").unwrap(), Some(0));
    }

    #[test]
    fn test_find_rows_reports_missing_and_orders_by_table() {
        let mut table = table();
        table.assign_primary("id", false).unwrap();

        let matches = table.find_rows(vec!["3", "7", "1", "3"]).unwrap();
        assert_eq!(matches.positions, vec![0, 2]);
        assert_eq!(matches.missing, vec!["7"]);
    }

    #[test]
    fn test_positions_follow_structural_changes() {
        let mut table = table();
        table.assign_primary("id", false).unwrap();
        assert_eq!(table.find_row("3").unwrap(), Some(2));

        table.delete_row(0).unwrap();
        assert_eq!(table.find_row("3").unwrap(), Some(1));
        assert_eq!(table.find_row("1").unwrap(), None);

        table.add_row(vec!["1", "55", "public"]).unwrap();
        assert_eq!(table.find_row("1").unwrap(), Some(2));

        table.switch_columns("id", "age").unwrap();
        assert_eq!(table.find_row("2").unwrap(), Some(0));
    }

    #[test]
    fn test_index_is_built_lazily() {
        let mut table = table();
        table.assign_primary("id", false).unwrap();
        let built = |t: &Table| t.primary.as_ref().map_or(false, PrimaryKeyIndex::is_built);

        assert!(!built(&table));
        table.find_row("1").unwrap();
        assert!(built(&table));
        table.add_column("flag", vec!["y", "n", "y"]).unwrap();
        assert!(!built(&table));
    }

    #[test]
    fn test_lookup_uses_cache_until_invalidated() {
        let rows = vec![vec!["a".to_string()], vec!["b".to_string()]];
        let index = PrimaryKeyIndex::new("key");
        assert_eq!(index.lookup(&rows, 0, "b"), Some(1));
        assert_eq!(index.lookup(&rows, 0, "z"), None);
        assert!(index.is_built());

        let swapped = vec![vec!["b".to_string()], vec!["a".to_string()]];
        index.invalidate();
        assert_eq!(index.lookup(&swapped, 0, "b"), Some(0));
        assert_eq!(index.lookup(&swapped, 0, "a"), Some(1));
    }

    #[test]
    fn test_lookup_rebuilds_when_row_count_changes() {
        let index = PrimaryKeyIndex::new("key");
        let rows = vec![vec!["a".to_string()]];
        assert_eq!(index.lookup(&rows, 0, "b"), None);

        let grown = vec![vec!["a".to_string()], vec!["b".to_string()]];
        assert_eq!(index.lookup(&grown, 0, "b"), Some(1));
    }
}
