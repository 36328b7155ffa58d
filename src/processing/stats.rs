// Statistical operations over table columns
// Author: Gabriel Demetrios Lafis

use indexmap::IndexMap;
use serde::Serialize;

use super::to_number;
use crate::table::{Table, TableError, TableResult};

/// Type of statistical operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Sum,
    Mean,
    Median,
    StdDev,
    Min,
    Max,
}

impl Statistic {
    /// Get the statistic name
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Sum => "sum",
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::StdDev => "stdev",
            Statistic::Min => "minimum",
            Statistic::Max => "maximum",
        }
    }

    /// Parse a statistic from its name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sum" => Some(Statistic::Sum),
            "mean" => Some(Statistic::Mean),
            "median" => Some(Statistic::Median),
            "stdev" | "std_dev" => Some(Statistic::StdDev),
            "min" | "minimum" => Some(Statistic::Min),
            "max" | "maximum" => Some(Statistic::Max),
            _ => None,
        }
    }

    /// Compute this statistic over a column.
    ///
    /// `Min` and `Max` skip non-numeric cells whatever `ignore_na` says.
    pub fn compute(&self, column: &ColumnView, ignore_na: bool) -> TableResult<f64> {
        match self {
            Statistic::Sum => column.sum(ignore_na),
            Statistic::Mean => column.mean(ignore_na),
            Statistic::Median => column.median(ignore_na),
            Statistic::StdDev => column.stdev(ignore_na),
            Statistic::Min => column.minimum(),
            Statistic::Max => column.maximum(),
        }
    }
}

/// Summary statistics of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column_name: String,
    pub mean: f64,
    pub median: f64,
    pub stdev: f64,
    pub sum: f64,
    pub minimum: f64,
    pub maximum: f64,
}

/// Read-only projection of one column
#[derive(Debug, Clone)]
pub struct ColumnView<'a> {
    name: &'a str,
    cells: Vec<&'a str>,
}

impl<'a> ColumnView<'a> {
    /// Create a view over a column's cells in row order
    pub fn new(name: &'a str, cells: Vec<&'a str>) -> Self {
        ColumnView { name, cells }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn cells(&self) -> &[&'a str] {
        &self.cells
    }

    /// Convert cells to numbers, failing on the first non-numeric cell unless `ignore_na`
    pub fn numbers(&self, ignore_na: bool) -> TableResult<Vec<f64>> {
        let mut values = Vec::with_capacity(self.cells.len());

        for (row, cell) in self.cells.iter().enumerate() {
            match to_number(cell) {
                Some(value) => values.push(value),
                None if ignore_na => {}
                None => {
                    return Err(TableError::Conversion {
                        column: self.name.to_string(),
                        row,
                        value: cell.to_string(),
                    })
                }
            }
        }

        Ok(values)
    }

    fn require_values(&self, values: &[f64], needed: usize, statistic: &str) -> TableResult<()> {
        if values.len() < needed {
            return Err(TableError::Validation(format!(
                "{} of column '{}' needs at least {} numeric values, found {}",
                statistic,
                self.name,
                needed,
                values.len()
            )));
        }
        Ok(())
    }

    pub fn sum(&self, ignore_na: bool) -> TableResult<f64> {
        Ok(compute_sum(&self.numbers(ignore_na)?))
    }

    pub fn mean(&self, ignore_na: bool) -> TableResult<f64> {
        let values = self.numbers(ignore_na)?;
        self.require_values(&values, 1, "Mean")?;
        Ok(compute_mean(&values))
    }

    pub fn median(&self, ignore_na: bool) -> TableResult<f64> {
        let values = self.numbers(ignore_na)?;
        self.require_values(&values, 1, "Median")?;
        Ok(compute_median(&values))
    }

    /// Sample standard deviation
    pub fn stdev(&self, ignore_na: bool) -> TableResult<f64> {
        let values = self.numbers(ignore_na)?;
        self.require_values(&values, 2, "Standard deviation")?;
        Ok(compute_std_dev(&values))
    }

    /// Smallest numeric cell; non-numeric cells are always skipped
    pub fn minimum(&self) -> TableResult<f64> {
        let values = self.numbers(true)?;
        self.require_values(&values, 1, "Minimum")?;
        Ok(values.iter().fold(f64::INFINITY, |a, &b| a.min(b)))
    }

    /// Largest numeric cell; non-numeric cells are always skipped
    pub fn maximum(&self) -> TableResult<f64> {
        let values = self.numbers(true)?;
        self.require_values(&values, 1, "Maximum")?;
        Ok(values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)))
    }

    /// Count each raw cell value, keyed in first-seen order
    pub fn value_counts(&self) -> IndexMap<String, usize> {
        let mut counts = IndexMap::new();
        for cell in &self.cells {
            *counts.entry(cell.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct raw cell values in first-seen order
    pub fn unique_values(&self) -> Vec<String> {
        self.value_counts().into_keys().collect()
    }

    /// Compute every summary statistic, stopping at the first failure
    pub fn stats(&self, ignore_na: bool) -> TableResult<ColumnStats> {
        Ok(ColumnStats {
            column_name: self.name.to_string(),
            mean: self.mean(ignore_na)?,
            median: self.median(ignore_na)?,
            stdev: self.stdev(ignore_na)?,
            sum: self.sum(ignore_na)?,
            minimum: self.minimum()?,
            maximum: self.maximum()?,
        })
    }
}

fn compute_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn compute_mean(values: &[f64]) -> f64 {
    compute_sum(values) / values.len() as f64
}

fn compute_median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn compute_std_dev(values: &[f64]) -> f64 {
    let mean = compute_mean(values);
    let variance =
        values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

impl Table {
    /// Project a column for statistics
    pub fn column_view(&self, column: &str) -> TableResult<ColumnView<'_>> {
        self.require_prepared()?;
        let index = self.column_index(column)?;
        let name = self.get_header()[index].as_str();
        let cells = self.get_data().iter().map(|row| row[index].as_str()).collect();
        Ok(ColumnView::new(name, cells))
    }

    pub fn sum(&self, column: &str, ignore_na: bool) -> TableResult<f64> {
        self.column_view(column)?.sum(ignore_na)
    }

    pub fn mean(&self, column: &str, ignore_na: bool) -> TableResult<f64> {
        self.column_view(column)?.mean(ignore_na)
    }

    pub fn median(&self, column: &str, ignore_na: bool) -> TableResult<f64> {
        self.column_view(column)?.median(ignore_na)
    }

    /// Sample standard deviation; needs at least two numeric cells
    pub fn stdev(&self, column: &str, ignore_na: bool) -> TableResult<f64> {
        self.column_view(column)?.stdev(ignore_na)
    }

    pub fn minimum(&self, column: &str) -> TableResult<f64> {
        self.column_view(column)?.minimum()
    }

    pub fn maximum(&self, column: &str) -> TableResult<f64> {
        self.column_view(column)?.maximum()
    }

    /// Compute a statistic selected at runtime
    pub fn statistic(
        &self,
        statistic: Statistic,
        column: &str,
        ignore_na: bool,
    ) -> TableResult<f64> {
        statistic.compute(&self.column_view(column)?, ignore_na)
    }

    pub fn value_counts(&self, column: &str) -> TableResult<IndexMap<String, usize>> {
        Ok(self.column_view(column)?.value_counts())
    }

    pub fn unique_values(&self, column: &str) -> TableResult<Vec<String>> {
        Ok(self.column_view(column)?.unique_values())
    }

    /// Bundle mean, median, stdev, sum, minimum and maximum of one column
    pub fn column_stats(&self, column: &str, ignore_na: bool) -> TableResult<ColumnStats> {
        self.column_view(column)?.stats(ignore_na)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableSource;
    use std::io::Cursor;

    fn table(text: &'static str) -> Table {
        let mut table = Table::new(TableSource::reader(Cursor::new(text)));
        table.prepare().unwrap();
        table
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_basic_statistics() {
        let table = table("id,age\n1,30\n2,40\n3,50\n");

        assert_close(table.mean("age", false).unwrap(), 40.0);
        assert_close(table.median("age", false).unwrap(), 40.0);
        assert_close(table.stdev("age", false).unwrap(), 10.0);
        assert_close(table.sum("age", false).unwrap(), 120.0);
        assert_close(table.minimum("age").unwrap(), 30.0);
        assert_close(table.maximum("age").unwrap(), 50.0);
    }

    #[test]
    fn test_median_even_count_sorts_first() {
        let table = table("v\n7\n1\n4\n2\n");
        assert_close(table.median("v", false).unwrap(), 3.0);
    }

    #[test]
    fn test_non_numeric_cells() {
        let table = table("id,age\n1,30\n2,N/A\n3,50\n");

        let err = table.sum("age", false).unwrap_err();
        assert!(matches!(err, TableError::Conversion { row: 1, ref value, .. } if value == "N/A"));
        assert_close(table.sum("age", true).unwrap(), 80.0);
        assert_close(table.mean("age", true).unwrap(), 40.0);

        // min and max skip regardless
        assert_close(table.minimum("age").unwrap(), 30.0);
        assert_close(table.maximum("age").unwrap(), 50.0);
    }

    #[test]
    fn test_stdev_needs_two_values() {
        let table = table("age\n30\nN/A\n");
        assert!(matches!(table.stdev("age", true), Err(TableError::Validation(_))));
        assert!(matches!(table.stdev("age", false), Err(TableError::Conversion { .. })));
    }

    #[test]
    fn test_empty_numeric_column() {
        let table = table("age\nN/A\n");
        assert_close(table.sum("age", true).unwrap(), 0.0);
        assert!(matches!(table.mean("age", true), Err(TableError::Validation(_))));
        assert!(matches!(table.minimum("age"), Err(TableError::Validation(_))));
    }

    #[test]
    fn test_value_counts_in_first_seen_order() {
        let table = table("kind\nb\na\nb\nc\na\nb\n");
        let counts = table.value_counts("kind").unwrap();

        let keys: Vec<&str> = counts.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(counts["b"], 3);
        assert_eq!(counts.values().sum::<usize>(), table.dimension().rows);
        assert_eq!(table.unique_values("kind").unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_value_counts_use_raw_strings() {
        let table = table("n\n1\n1.0\n1\n");
        let counts = table.value_counts("n").unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["1.0"], 1);
    }

    #[test]
    fn test_column_stats_bundle() {
        let table = table("id,age\n1,30\n2,40\n3,50\n");
        let stats = table.column_stats("age", false).unwrap();

        assert_eq!(stats.column_name, "age");
        assert_close(stats.mean, 40.0);
        assert_close(stats.stdev, 10.0);
        assert_close(stats.maximum, 50.0);

        let table = self::table("age\n30\nx\n");
        assert!(matches!(
            table.column_stats("age", false),
            Err(TableError::Conversion { .. })
        ));
    }

    #[test]
    fn test_statistic_by_name() {
        let table = table("age\n30\n40\n");
        let statistic = Statistic::from_name("MAX").unwrap();
        assert_eq!(statistic, Statistic::Max);
        assert_close(table.statistic(statistic, "age", false).unwrap(), 40.0);
        assert!(Statistic::from_name("mode").is_none());
        assert!(matches!(table.mean("height", false), Err(TableError::NotFound(_))));
    }
}
