// Comma - in-memory tabular data engine
// Author: Gabriel Demetrios Lafis

//! # Comma
//!
//! An in-memory table engine for delimited text files.
//!
//! ## Features
//!
//! - Parsing delimited text into a row/column table of string cells
//! - Header management, read from the file or set manually
//! - Column statistics (sum, mean, median, stdev, min/max, value counts)
//! - Structural edits on columns and rows
//! - Primary-key lookup
//! - Export as records, JSON or delimited text
//!
//! ## Example
//!
//! ```rust
//! use std::io::Cursor;
//! use comma::{Table, TableSource};
//!
//! let source = TableSource::reader(Cursor::new("id,age\n1,30\n2,40\n3,50\n"));
//! let mut table = Table::new(source);
//! table.prepare().unwrap();
//!
//! assert_eq!(table.mean("age", false).unwrap(), 40.0);
//!
//! table.assign_primary("id", false).unwrap();
//! assert_eq!(table.find_row("2").unwrap(), Some(1));
//!
//! table.delete_column("age").unwrap();
//! assert_eq!(table.dimension().columns, 1);
//! ```
//!
//! A table has a single owner: it is not `Sync`, and no operation takes
//! internal locks.

pub mod data;
pub mod processing;
pub mod table;
pub mod utils;

// Re-export main types
pub use data::{ExportFormat, LineParser, Record, Schema, TableSource};
pub use processing::{ColumnStats, ColumnView, Statistic};
pub use table::{Dimension, RowMatches, Table, TableBuilder, TableError, TableOptions, TableResult};
pub use utils::{Config, DisplayConfig};
