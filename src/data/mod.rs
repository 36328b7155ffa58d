// Data module for table sources, sinks and the column schema
// Author: Gabriel Demetrios Lafis

mod csv;
mod json;
mod schema;

pub use self::csv::*;
pub use self::json::*;
pub use self::schema::*;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::table::Table;

/// Where a table reads its delimited text from.
///
/// A source is consumed exactly once, by [`Table::prepare`]. Paths are
/// opened lazily at that point; readers are dropped as soon as they have
/// been drained.
pub enum TableSource {
    Path(PathBuf),
    Reader(Box<dyn BufRead + Send>),
}

impl TableSource {
    /// Create a source backed by a file path
    pub fn path<P: AsRef<Path>>(path: P) -> Self {
        TableSource::Path(path.as_ref().to_path_buf())
    }

    /// Create a source backed by an already opened reader
    pub fn reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        TableSource::Reader(Box::new(reader))
    }

    /// Open the source for reading
    pub fn open(self) -> Result<Box<dyn BufRead + Send>, DataError> {
        match self {
            TableSource::Path(path) => {
                let file = File::open(&path)?;
                Ok(Box::new(BufReader::new(file)))
            }
            TableSource::Reader(reader) => Ok(reader),
        }
    }

    /// Get the source name
    pub fn name(&self) -> String {
        match self {
            TableSource::Path(path) => path.to_string_lossy().to_string(),
            TableSource::Reader(_) => "<reader>".to_string(),
        }
    }
}

impl fmt::Debug for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            TableSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<&str> for TableSource {
    fn from(path: &str) -> Self {
        TableSource::path(path)
    }
}

impl From<String> for TableSource {
    fn from(path: String) -> Self {
        TableSource::Path(PathBuf::from(path))
    }
}

impl From<PathBuf> for TableSource {
    fn from(path: PathBuf) -> Self {
        TableSource::Path(path)
    }
}

impl From<&Path> for TableSource {
    fn from(path: &Path) -> Self {
        TableSource::path(path)
    }
}

/// Represents an export destination for a table
pub trait DataSink {
    /// Write the table to the sink
    fn write(&self, table: &Table) -> Result<(), DataError>;

    /// Get the sink name
    fn name(&self) -> &str;

    /// Get the export format
    fn format(&self) -> ExportFormat;
}

/// Represents an export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Destination used when the caller does not name one
    pub fn default_destination(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "data.csv",
            ExportFormat::Json => "data.json",
        }
    }

    /// Parse an export format from a string
    pub fn from_name(name: &str) -> Result<Self, DataError> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(DataError::Parse(format!("Unknown export format: {}", name))),
        }
    }
}

/// Represents an error while reading or writing table data
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}
