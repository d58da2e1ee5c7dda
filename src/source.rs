//! Record sources for the decoder.
//!
//! The decoder does not tokenize CSV itself. It pulls records from a
//! [`RecordReader`] and asks it where a field started when a cell error needs
//! a line number. [`CsvRecordReader`] implements the trait on top of the
//! `csv` crate.

use crate::error::Result;
use std::io;

/// Position of a field in the source text. Both numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPosition {
    /// Line on which the field starts.
    pub line: u64,
    /// Byte column at which the field starts.
    pub column: u64,
}

/// A source of tokenized CSV records.
pub trait RecordReader {
    /// Read the next record.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    fn read_record(&mut self) -> Result<Option<Vec<String>>>;

    /// Position of field `index` of the most recently read record,
    /// or `None` if the record has no such field.
    fn field_position(&self, index: usize) -> Option<FieldPosition>;
}

impl<R: RecordReader + ?Sized> RecordReader for &mut R {
    fn read_record(&mut self) -> Result<Option<Vec<String>>> {
        (**self).read_record()
    }

    fn field_position(&self, index: usize) -> Option<FieldPosition> {
        (**self).field_position(index)
    }
}

impl<R: RecordReader + ?Sized> RecordReader for Box<R> {
    fn read_record(&mut self) -> Result<Option<Vec<String>>> {
        (**self).read_record()
    }

    fn field_position(&self, index: usize) -> Option<FieldPosition> {
        (**self).field_position(index)
    }
}

/// [`RecordReader`] backed by a [`csv::Reader`].
///
/// Field lines are derived from the start line of the record plus the line
/// breaks embedded in the preceding fields. Columns are exact for unquoted
/// fields; quotes and escapes are not visible after tokenizing, so the column
/// of a field following a quoted field is a lower bound.
///
/// Positions are always computed from the untrimmed fields. Use
/// [`trim`](CsvRecordReader::trim) instead of `csv::Trim` so that line breaks
/// at the edge of a quoted field are still counted.
#[derive(Debug)]
pub struct CsvRecordReader<R> {
    reader: csv::Reader<R>,
    /// Raw record, as tokenized.
    record: csv::StringRecord,
    start_line: u64,
    headers_pending: bool,
    trim: bool,
}

impl<R: io::Read> CsvRecordReader<R> {
    /// Wrap a `csv::Reader`.
    ///
    /// If the reader was built with `has_headers(true)`, its header row is
    /// returned as the first record like any other.
    pub fn new(reader: csv::Reader<R>) -> Self {
        let headers_pending = reader.has_headers();
        Self {
            reader,
            record: csv::StringRecord::new(),
            start_line: 1,
            headers_pending,
            trim: false,
        }
    }

    /// Trim leading and trailing whitespace from every field handed out.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Returns a reference to the wrapped `csv::Reader`.
    pub fn get_ref(&self) -> &csv::Reader<R> {
        &self.reader
    }

    /// Unwrap into the underlying `csv::Reader`.
    pub fn into_inner(self) -> csv::Reader<R> {
        self.reader
    }

    fn take_record(&mut self) -> Vec<String> {
        self.start_line = self.record.position().map_or(1, csv::Position::line);
        let trim = self.trim;
        self.record
            .iter()
            .map(|field| if trim { field.trim() } else { field })
            .map(str::to_string)
            .collect()
    }
}

impl<R: io::Read> From<csv::Reader<R>> for CsvRecordReader<R> {
    fn from(reader: csv::Reader<R>) -> Self {
        Self::new(reader)
    }
}

impl<R: io::Read> RecordReader for CsvRecordReader<R> {
    fn read_record(&mut self) -> Result<Option<Vec<String>>> {
        if self.headers_pending {
            self.headers_pending = false;
            self.record = self.reader.headers()?.clone();
            // csv reports an empty header row for empty input
            if self.record.is_empty() && self.reader.is_done() {
                return Ok(None);
            }
            return Ok(Some(self.take_record()));
        }

        if self.reader.read_record(&mut self.record)? {
            Ok(Some(self.take_record()))
        } else {
            Ok(None)
        }
    }

    fn field_position(&self, index: usize) -> Option<FieldPosition> {
        if index >= self.record.len() {
            return None;
        }

        let mut line = self.start_line;
        let mut column = 1;
        for field in self.record.iter().take(index) {
            let bytes = field.as_bytes();
            let newlines = bytecount::count(bytes, b'\n') as u64;
            if newlines > 0 {
                line += newlines;
                let tail = bytes.iter().rev().take_while(|&&b| b != b'\n').count();
                column = tail as u64 + 1;
            } else {
                column += bytes.len() as u64;
            }
            // delimiter
            column += 1;
        }

        Some(FieldPosition { line, column })
    }
}
