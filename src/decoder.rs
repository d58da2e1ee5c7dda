//! Decoder driving record-by-record iteration, and its builder.

use std::borrow::Cow;
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use tracing::{debug, trace};

use crate::cell_error::RowError;
use crate::encoding::{detect_and_transcode, strip_bom, transcode_vec};
use crate::error::{DecodeError, Result};
use crate::header::Header;
use crate::options::{Quote, ReaderOptions};
use crate::row::Row;
use crate::source::{CsvRecordReader, RecordReader};

/// Decoder over in-memory input, as built by [`DecoderBuilder::from_bytes`]
/// and [`DecoderBuilder::from_path`].
pub type BytesDecoder<'a> = Decoder<CsvRecordReader<Cursor<Cow<'a, [u8]>>>>;

/// Reads rows from a CSV source, giving access to cells by header key.
///
/// Call [`parse_header`](Decoder::parse_header) once, then
/// [`next_row`](Decoder::next_row) until it returns `Ok(None)`.
///
/// # Example
///
/// ```
/// use csvd::DecoderBuilder;
///
/// let data = b"User  \tName , Age\nalice,30\nbob,x\n";
/// let mut decoder = DecoderBuilder::new().from_bytes(data).unwrap();
/// decoder.parse_header().unwrap();
///
/// while let Some(mut row) = decoder.next_row().unwrap() {
///     let name = row.get("user name").to_string();
///     let age: Option<u8> = row.parse_value("age");
///     if let Some(err) = row.error().and_then(|e| e.err()) {
///         eprintln!("{name}: {err}");
///     } else {
///         println!("{name} is {}", age.unwrap());
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,

    header: Option<Header>,
    header_record: Option<Vec<String>>,

    row_number: u64,
}

impl<R: RecordReader> Decoder<R> {
    /// Create a decoder that pulls records from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            header: None,
            header_record: None,
            row_number: 0,
        }
    }

    /// Read one record and build the header from it.
    ///
    /// Must be called once, before [`next_row`](Decoder::next_row).
    pub fn parse_header(&mut self) -> Result<&Header> {
        if self.header.is_some() {
            return Err(DecodeError::HeaderAlreadyParsed);
        }

        let record = self
            .reader
            .read_record()?
            .ok_or(DecodeError::MissingHeader)?;
        self.row_number += 1;

        let header = Header::from_record(&record);
        debug!(
            columns = record.len(),
            keys = header.len(),
            "parsed header"
        );
        self.header_record = Some(record);

        Ok(self.header.insert(header))
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` when there are no records left.
    pub fn next_row(&mut self) -> Result<Option<Row<'_>>> {
        let Some(record) = self.reader.read_record()? else {
            return Ok(None);
        };
        self.row_number += 1;
        trace!(row = self.row_number, fields = record.len(), "read record");

        Ok(Some(Row::new(
            self.header.as_ref(),
            &self.reader,
            self.row_number,
            record,
        )))
    }

    /// Call `f` for every remaining row and collect the rows' errors.
    ///
    /// Stops at the first read failure, which is returned as is.
    pub fn for_each_row<F>(&mut self, mut f: F) -> Result<DecodeSummary>
    where
        F: FnMut(&mut Row<'_>),
    {
        let mut summary = DecodeSummary::default();
        while let Some(mut row) = self.next_row()? {
            f(&mut row);
            summary.rows += 1;
            if let Some(row_error) = row.into_error().filter(|e| !e.is_empty()) {
                summary.row_errors.push(row_error);
            }
        }
        debug!(
            rows = summary.rows,
            failed_rows = summary.row_errors.len(),
            "finished decoding"
        );
        Ok(summary)
    }
}

impl<R> Decoder<R> {
    /// The parsed header, or `None` before [`parse_header`](Decoder::parse_header).
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Mutable access to the parsed header, for remapping keys.
    ///
    /// Rows borrow the header, so it cannot change while a row is alive.
    pub fn header_mut(&mut self) -> Option<&mut Header> {
        self.header.as_mut()
    }

    /// The raw header record as read from the source.
    pub fn header_record(&self) -> Option<&[String]> {
        self.header_record.as_deref()
    }

    /// Number of records read so far, including the header record.
    pub fn row_number(&self) -> u64 {
        self.row_number
    }

    /// Returns a reference to the underlying record reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Unwrap into the underlying record reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Outcome of [`Decoder::for_each_row`].
#[derive(Debug, Default)]
pub struct DecodeSummary {
    /// Number of data rows visited, not counting the header.
    pub rows: u64,
    /// Errors of the rows that had at least one failed cell, in row order.
    pub row_errors: Vec<RowError>,
}

impl DecodeSummary {
    /// Total number of failed cells across all rows.
    pub fn cell_error_count(&self) -> usize {
        self.row_errors.iter().map(RowError::len).sum()
    }

    /// Returns true if no cell failed.
    pub fn is_clean(&self) -> bool {
        self.row_errors.is_empty()
    }
}

/// Builder for CSV backed decoders.
///
/// # Example
///
/// ```no_run
/// use csvd::{DecoderBuilder, Quote};
///
/// let mut builder = DecoderBuilder::new();
/// builder
///     .delimiter(b';')
///     .quote(Quote::Some(b'\''))
///     .trim(true);
///
/// let mut decoder = builder.from_path("users.csv").unwrap();
/// decoder.parse_header().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DecoderBuilder {
    options: ReaderOptions,
    /// Transcode non-UTF-8 input held in memory.
    transcode: bool,
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderBuilder {
    /// Create a builder for comma separated, double quoted input.
    pub fn new() -> Self {
        Self {
            options: ReaderOptions::default(),
            transcode: true,
        }
    }

    /// Set the field delimiter.
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.options.delimiter = delimiter;
        self
    }

    /// Set the quote character, or disable quoting with [`Quote::None`].
    pub fn quote(&mut self, quote: Quote) -> &mut Self {
        self.options.quote = quote;
        self
    }

    /// Allow records with a varying number of fields.
    pub fn flexible(&mut self, flexible: bool) -> &mut Self {
        self.options.flexible = flexible;
        self
    }

    /// Trim leading and trailing whitespace from every field.
    pub fn trim(&mut self, trim: bool) -> &mut Self {
        self.options.trim = trim;
        self
    }

    /// Skip lines starting with the given byte.
    pub fn comment(&mut self, comment: Option<u8>) -> &mut Self {
        self.options.comment = comment;
        self
    }

    /// Detect and transcode non-UTF-8 input in
    /// [`from_bytes`](DecoderBuilder::from_bytes) and
    /// [`from_path`](DecoderBuilder::from_path). Enabled by default.
    pub fn transcode(&mut self, transcode: bool) -> &mut Self {
        self.transcode = transcode;
        self
    }

    /// Build a decoder that streams from `reader`.
    ///
    /// The input must be UTF-8; it is not transcoded.
    pub fn from_reader<R: io::Read>(&self, reader: R) -> Result<Decoder<CsvRecordReader<R>>> {
        self.options.validate().map_err(DecodeError::InvalidConfig)?;
        let reader = self.options.csv_builder().from_reader(reader);
        Ok(Decoder::new(CsvRecordReader::new(reader).trim(self.options.trim)))
    }

    /// Build a decoder over in-memory data.
    pub fn from_bytes<'a>(&self, data: &'a [u8]) -> Result<BytesDecoder<'a>> {
        let data = if self.transcode {
            detect_and_transcode(data)
        } else {
            Cow::Borrowed(data)
        };
        self.from_reader(Cursor::new(strip_bom(data)))
    }

    /// Read the file at `path` into memory and build a decoder over it.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<BytesDecoder<'static>> {
        let data = fs::read(path.as_ref())?;
        let data = if self.transcode {
            transcode_vec(data)
        } else {
            data
        };
        self.from_reader(Cursor::new(strip_bom(Cow::Owned(data))))
    }
}
