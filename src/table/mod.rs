// Table module for the in-memory row/column store
// Author: Gabriel Demetrios Lafis

mod columns;
mod error;
mod primary;
mod rows;

pub use error::*;
pub use primary::*;

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::{
    to_document, to_record, write_delimited, CsvSink, DataSink, ExportFormat, JsonSink,
    LineParser, Record, Schema, TableSource,
};
use crate::utils::{ConfigEntry, DisplayConfig};

/// Construction options fixed for the lifetime of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableOptions {
    /// Read the header from the first line of the source
    pub includes_header: bool,
    pub delimiter: char,
    /// Legacy toggle kept for callers; mutations never return data
    pub console_mode: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            includes_header: true,
            delimiter: ',',
            console_mode: false,
        }
    }
}

/// Lifecycle phase of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Unprepared,
    Prepared,
}

/// Where the schema comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource {
    FromFile,
    Manual,
}

/// Column and row counts of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub columns: usize,
    pub rows: usize,
}

/// In-memory table of string cells.
///
/// Every row holds exactly as many cells as the schema has columns. All
/// cells are strings; numeric interpretation happens on demand in the
/// statistics functions.
///
/// A table has one logical owner. The primary-key cache uses interior
/// mutability, so `Table` is `Send` but not `Sync`: callers that share a
/// table across threads must provide their own locking.
#[derive(Debug)]
pub struct Table {
    source: Option<TableSource>,
    parser: LineParser,
    header_source: HeaderSource,
    console_mode: bool,
    state: TableState,
    schema: Schema,
    rows: Vec<Vec<String>>,
    primary: Option<PrimaryKeyIndex>,
    display: DisplayConfig,
}

impl Table {
    /// Create a table over a source with default options
    pub fn new<S: Into<TableSource>>(source: S) -> Self {
        Table {
            source: Some(source.into()),
            parser: LineParser::default(),
            header_source: HeaderSource::FromFile,
            console_mode: false,
            state: TableState::Unprepared,
            schema: Schema::default(),
            rows: Vec::new(),
            primary: None,
            display: DisplayConfig::default(),
        }
    }

    /// Create a table over a source with the given options
    pub fn with_options<S: Into<TableSource>>(
        source: S,
        options: TableOptions,
    ) -> TableResult<Self> {
        Table::builder(source).options(options).build()
    }

    /// Start building a table over a source
    pub fn builder<S: Into<TableSource>>(source: S) -> TableBuilder {
        TableBuilder {
            source: source.into(),
            options: TableOptions::default(),
            display: DisplayConfig::default(),
            configs: Vec::new(),
        }
    }

    /// Read the source into the table.
    ///
    /// With a file header the first line becomes the schema, otherwise a
    /// non-empty header must have been set with [`Table::set_header`]. The
    /// source is fully drained and released before this returns, whether
    /// or not it succeeds. A table can only be prepared once.
    pub fn prepare(&mut self) -> TableResult<()> {
        if self.state == TableState::Prepared {
            return Err(TableError::State("Table has already been prepared".to_string()));
        }

        if self.header_source == HeaderSource::Manual && self.schema.is_empty() {
            return Err(TableError::Configuration(
                "No header detected. Please manually set a header before prepare call".to_string(),
            ));
        }

        let source = self.source.take().ok_or_else(|| {
            TableError::State("Table source has already been consumed".to_string())
        })?;
        let name = source.name();

        let lines = {
            let reader = source.open()?;
            self.parser.parse_all(reader)?
        };

        let mut lines = lines.into_iter();
        let schema = match self.header_source {
            HeaderSource::FromFile => {
                let header = lines.next().ok_or_else(|| {
                    TableError::Configuration(format!("No header line found in {}", name))
                })?;
                Schema::new(header.fields)
            }
            HeaderSource::Manual => self.schema.clone(),
        };

        // A blank line is only a row when it can be a single empty cell
        let keep_blank = schema.len() == 1;
        let mut rows = Vec::with_capacity(lines.len());
        for parsed in lines {
            if parsed.is_blank() && !keep_blank {
                continue;
            }
            if parsed.fields.len() != schema.len() {
                return Err(TableError::Validation(format!(
                    "Line {} has {} fields, header has {}",
                    parsed.line,
                    parsed.fields.len(),
                    schema.len()
                )));
            }
            rows.push(parsed.fields);
        }

        self.schema = schema;
        self.rows = rows;
        self.state = TableState::Prepared;

        if self.display.success_messages {
            info!(
                "Preparation complete: {} columns, {} rows from {}",
                self.schema.len(),
                self.rows.len(),
                name
            );
        }

        Ok(())
    }

    /// Check that the table has been prepared
    pub(crate) fn require_prepared(&self) -> TableResult<()> {
        match self.state {
            TableState::Prepared => Ok(()),
            TableState::Unprepared => Err(TableError::State(
                "Table has not been prepared. Call prepare() first".to_string(),
            )),
        }
    }

    /// Drop any cached primary-key positions after a structural change
    pub(crate) fn invalidate_index(&self) {
        if let Some(primary) = &self.primary {
            primary.invalidate();
        }
    }

    /// Check if the table has been prepared
    pub fn is_prepared(&self) -> bool {
        self.state == TableState::Prepared
    }

    /// Get the lifecycle phase
    pub fn state(&self) -> TableState {
        self.state
    }

    /// Get where the schema comes from
    pub fn header_source(&self) -> HeaderSource {
        self.header_source
    }

    pub fn includes_header(&self) -> bool {
        self.header_source == HeaderSource::FromFile
    }

    pub fn delimiter(&self) -> char {
        self.parser.delimiter()
    }

    pub fn console_mode(&self) -> bool {
        self.console_mode
    }

    /// Get the column names
    pub fn get_header(&self) -> &[String] {
        self.schema.names()
    }

    /// Get the schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Set the header manually before `prepare`.
    ///
    /// Only tables built with `includes_header = false` accept a manual
    /// header.
    pub fn set_header<I, S>(&mut self, names: I) -> TableResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.header_source == HeaderSource::FromFile {
            return Err(TableError::Configuration(
                "Manual header configuration is disabled. To enable, build the table with includes_header = false"
                    .to_string(),
            ));
        }

        if self.state == TableState::Prepared {
            return Err(TableError::State(
                "Header cannot be replaced after prepare".to_string(),
            ));
        }

        self.schema = Schema::new(names);
        debug!("Manual header set with {} columns", self.schema.len());
        Ok(())
    }

    /// Get the rows
    pub fn get_data(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Get the column and row counts
    pub fn dimension(&self) -> Dimension {
        Dimension {
            columns: self.schema.len(),
            rows: self.rows.len(),
        }
    }

    /// Set a display option
    pub fn set_config(&mut self, key: &str, value: JsonValue) -> TableResult<()> {
        self.display.set(key, &value).map_err(TableError::Validation)
    }

    /// Get a display option
    pub fn get_config(&self, key: &str) -> TableResult<ConfigEntry> {
        self.display.get(key).map_err(TableError::Validation)
    }

    /// Get all display options
    pub fn display_config(&self) -> &DisplayConfig {
        &self.display
    }

    pub(crate) fn records(&self) -> Vec<Record> {
        if self.schema.is_empty() {
            return Vec::new();
        }

        self.rows
            .iter()
            .map(|row| to_record(self.schema.names().iter().zip(row.iter())))
            .collect()
    }

    /// Render every row as a name→value record
    pub fn to_records(&self) -> TableResult<Vec<Record>> {
        self.require_prepared()?;
        Ok(self.records())
    }

    /// Render the export document `{"headers": [...], "data": [...]}`
    pub fn to_json(&self) -> TableResult<JsonValue> {
        self.require_prepared()?;
        Ok(to_document(self.schema.names(), self.records()))
    }

    /// Render the table as delimited text: a header line, then one line per row.
    ///
    /// Fields are not quoted, so a field containing the delimiter does not
    /// survive a round trip.
    pub fn to_delimited_text(&self, delimiter: char) -> TableResult<String> {
        self.require_prepared()?;

        let mut out = Vec::new();
        write_delimited(&mut out, self.schema.names(), &self.rows, delimiter)?;
        String::from_utf8(out)
            .map_err(|e| TableError::Validation(format!("Exported text is not UTF-8: {}", e)))
    }

    /// Export as JSON, to `data.json` unless a destination is given
    pub fn save_as_json(&self, path: Option<&Path>) -> TableResult<PathBuf> {
        self.save(ExportFormat::Json, path)
    }

    /// Export as delimited text, to `data.csv` unless a destination is given
    pub fn save_as_csv(&self, path: Option<&Path>) -> TableResult<PathBuf> {
        self.save(ExportFormat::Csv, path)
    }

    /// Export in the given format
    pub fn save(&self, format: ExportFormat, path: Option<&Path>) -> TableResult<PathBuf> {
        self.require_prepared()?;

        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(format.default_destination()));

        let sink: Box<dyn DataSink> = match format {
            ExportFormat::Csv => Box::new(CsvSink::new(&path, self.delimiter())),
            ExportFormat::Json => Box::new(JsonSink::new(&path, true)),
        };
        sink.write(self)?;

        if self.display.success_messages {
            info!("Successfully exported {:?} as {}", sink.format(), sink.name());
        }

        Ok(path)
    }

    /// Render the header and up to `max_row_display` rows as a text grid
    pub fn preview(&self) -> String {
        let limit = self.display.max_row_display;
        let mut lines = Vec::with_capacity(limit.min(self.rows.len()) + 3);

        lines.push(self.schema.names().join(" | "));
        lines.push(vec!["----"; self.schema.len()].join("-+-"));

        for row in self.rows.iter().take(limit) {
            lines.push(row.join(" | "));
        }

        if self.rows.len() > limit {
            lines.push(format!("... ({} more rows)", self.rows.len() - limit));
        }

        lines.join("\n")
    }
}

/// Builder for tables with non-default options
pub struct TableBuilder {
    source: TableSource,
    options: TableOptions,
    display: DisplayConfig,
    configs: Vec<(String, JsonValue)>,
}

impl TableBuilder {
    pub fn includes_header(mut self, includes_header: bool) -> Self {
        self.options.includes_header = includes_header;
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    pub fn console_mode(mut self, console_mode: bool) -> Self {
        self.options.console_mode = console_mode;
        self
    }

    /// Replace all construction options
    pub fn options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace all display options
    pub fn display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Set one display option by name; checked on `build`
    pub fn config<K: Into<String>>(mut self, key: K, value: JsonValue) -> Self {
        self.configs.push((key.into(), value));
        self
    }

    /// Set several display options by name; checked on `build`
    pub fn configs<I, K>(mut self, configs: I) -> Self
    where
        I: IntoIterator<Item = (K, JsonValue)>,
        K: Into<String>,
    {
        self.configs
            .extend(configs.into_iter().map(|(key, value)| (key.into(), value)));
        self
    }

    /// Build the table
    pub fn build(self) -> TableResult<Table> {
        let parser = LineParser::new(self.options.delimiter)
            .map_err(|e| TableError::Configuration(e.to_string()))?;

        let mut display = self.display;
        for (key, value) in &self.configs {
            display.set(key, value).map_err(TableError::Validation)?;
        }

        Ok(Table {
            source: Some(self.source),
            parser,
            header_source: if self.options.includes_header {
                HeaderSource::FromFile
            } else {
                HeaderSource::Manual
            },
            console_mode: self.options.console_mode,
            state: TableState::Unprepared,
            schema: Schema::default(),
            rows: Vec::new(),
            primary: None,
            display,
        })
    }
}
