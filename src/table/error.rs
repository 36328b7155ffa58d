// Error types for table operations
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::data::DataError;

/// Represents an error raised by a table operation
#[derive(Debug, Error)]
pub enum TableError {
    /// Invalid constructor or header configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation invoked in the wrong lifecycle phase
    #[error("State error: {0}")]
    State(String),

    /// Argument shape, type or length mismatch
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced column does not exist
    #[error("Column '{0}' not found")]
    NotFound(String),

    /// A cell could not be read as a number
    #[error("Cannot convert '{value}' in column '{column}' at row {row} to a number")]
    Conversion {
        column: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Data(#[from] DataError),
}

impl TableError {
    pub(crate) fn not_found(column: &str) -> Self {
        TableError::NotFound(column.to_string())
    }
}

/// Result type alias for TableError
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_message_names_row_and_column() {
        let err = TableError::Conversion {
            column: "age".to_string(),
            row: 2,
            value: "N/A".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot convert 'N/A' in column 'age' at row 2 to a number"
        );
    }

    #[test]
    fn test_data_errors_pass_through() {
        let err: TableError = DataError::Parse("bad delimiter".to_string()).into();
        assert_eq!(err.to_string(), "Parse error: bad delimiter");
    }
}
