// JSON sink implementation
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use super::{DataError, DataSink, ExportFormat};
use crate::table::Table;

/// One row rendered as an insertion-ordered name→value mapping
pub type Record = Map<String, JsonValue>;

/// Build a record from paired column names and cells
pub fn to_record<'a, I>(pairs: I) -> Record
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut record = Map::new();
    for (name, cell) in pairs {
        record.insert(name.clone(), JsonValue::String(cell.clone()));
    }
    record
}

/// Render the export document `{"headers": [...], "data": [...]}`
pub fn to_document(header: &[String], records: Vec<Record>) -> JsonValue {
    let mut document = Map::new();
    document.insert(
        "headers".to_string(),
        JsonValue::Array(header.iter().cloned().map(JsonValue::String).collect()),
    );
    document.insert(
        "data".to_string(),
        JsonValue::Array(records.into_iter().map(JsonValue::Object).collect()),
    );
    JsonValue::Object(document)
}

/// JSON data sink
pub struct JsonSink {
    path: String,
    pretty: bool,
}

impl JsonSink {
    /// Create a new JSON data sink
    pub fn new<P: AsRef<Path>>(path: P, pretty: bool) -> Self {
        JsonSink {
            path: path.as_ref().to_string_lossy().to_string(),
            pretty,
        }
    }
}

impl DataSink for JsonSink {
    fn write(&self, table: &Table) -> Result<(), DataError> {
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        let json = to_document(table.get_header(), table.records());

        if self.pretty {
            serde_json::to_writer_pretty(writer, &json)?;
        } else {
            serde_json::to_writer(writer, &json)?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.path
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_column_order() {
        let names = vec!["zeta".to_string(), "alpha".to_string()];
        let cells = vec!["1".to_string(), "2".to_string()];
        let record = to_record(names.iter().zip(cells.iter()));

        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(record["alpha"], JsonValue::String("2".to_string()));
    }

    #[test]
    fn test_document_shape() {
        let header = vec!["id".to_string()];
        let record = to_record(header.iter().zip(vec!["7".to_string()].iter()));
        let document = to_document(&header, vec![record]);

        assert_eq!(document["headers"][0], "id");
        assert_eq!(document["data"][0]["id"], "7");
    }
}
