// Delimited text parsing and CSV sink implementation
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use super::{DataError, DataSink, ExportFormat};
use crate::table::Table;

/// One parsed physical line of the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// 1-based line number in the source
    pub line: u64,
    pub fields: Vec<String>,
}

impl ParsedLine {
    /// Check whether the line had no content at all
    pub fn is_blank(&self) -> bool {
        matches!(self.fields.as_slice(), [field] if field.is_empty())
    }
}

/// Splits delimited text into ordered field strings.
///
/// Quoting is disabled: a delimiter inside a field cannot be told apart
/// from a field boundary. Line terminators (`\n`, `\r\n`) are stripped. A
/// blank line parses as a single empty field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParser {
    delimiter: u8,
}

impl LineParser {
    /// Create a parser for the given delimiter
    pub fn new(delimiter: char) -> Result<Self, DataError> {
        Ok(LineParser {
            delimiter: delimiter_byte(delimiter)?,
        })
    }

    /// Get the delimiter
    pub fn delimiter(&self) -> char {
        self.delimiter as char
    }

    fn builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .quoting(false)
            .flexible(true);
        builder
    }

    /// Parse a single line into its fields
    pub fn parse_line(&self, line: &str) -> Result<Vec<String>, DataError> {
        let mut reader = self.builder().from_reader(line.as_bytes());
        match reader.records().next() {
            Some(record) => Ok(record?.iter().map(str::to_string).collect()),
            None => Ok(vec![String::new()]),
        }
    }

    /// Parse every physical line of a reader, draining it completely.
    ///
    /// Line numbers count every line of the source, blank ones included.
    pub fn parse_all<R: Read>(&self, reader: R) -> Result<Vec<ParsedLine>, DataError> {
        let mut lines = Vec::new();

        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let content = line.strip_suffix('\r').unwrap_or(&line);
            lines.push(ParsedLine {
                line: index as u64 + 1,
                fields: self.parse_line(content)?,
            });
        }

        debug!("Parsed {} lines", lines.len());
        Ok(lines)
    }
}

impl Default for LineParser {
    fn default() -> Self {
        LineParser { delimiter: b',' }
    }
}

/// Convert a delimiter character to the single byte the parser works on
pub fn delimiter_byte(delimiter: char) -> Result<u8, DataError> {
    if !delimiter.is_ascii() || delimiter == '\n' || delimiter == '\r' {
        return Err(DataError::Parse(format!(
            "Delimiter {:?} must be a single ASCII character other than a line terminator",
            delimiter
        )));
    }

    Ok(delimiter as u8)
}

/// Write a header line followed by one line per row, without quoting.
///
/// Fields are joined verbatim, so an empty single-field row becomes an
/// empty line.
pub fn write_delimited<W: Write>(
    mut writer: W,
    header: &[String],
    rows: &[Vec<String>],
    delimiter: char,
) -> Result<(), DataError> {
    if header.is_empty() {
        return Ok(());
    }

    let separator = (delimiter_byte(delimiter)? as char).to_string();
    writeln!(writer, "{}", header.join(separator.as_str()))?;
    for row in rows {
        writeln!(writer, "{}", row.join(separator.as_str()))?;
    }

    writer.flush()?;
    Ok(())
}

/// CSV data sink
pub struct CsvSink {
    path: String,
    delimiter: char,
}

impl CsvSink {
    /// Create a new CSV data sink
    pub fn new<P: AsRef<Path>>(path: P, delimiter: char) -> Self {
        CsvSink {
            path: path.as_ref().to_string_lossy().to_string(),
            delimiter,
        }
    }
}

impl DataSink for CsvSink {
    fn write(&self, table: &Table) -> Result<(), DataError> {
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);

        write_delimited(writer, table.get_header(), table.get_data(), self.delimiter)
    }

    fn name(&self) -> &str {
        &self.path
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }
}
