use crate::cell_error::{CellError, RowError};
use crate::error::BoxError;
use crate::header::Header;
use crate::source::RecordReader;
use std::fmt;
use std::str::FromStr;

/// A record read by a [`Decoder`](crate::Decoder), with access to its cells
/// by header key.
///
/// Every [`parse`](Row::parse) call runs regardless of earlier failures in the
/// same row. Failures are collected and can be inspected afterwards through
/// [`last_parse_error`](Row::last_parse_error) and [`error`](Row::error).
///
/// # Panics
///
/// Key based accessors panic if the decoder's header has not been parsed.
/// This is a misuse of the API rather than a data error.
pub struct Row<'d> {
    header: Option<&'d Header>,
    reader: &'d dyn RecordReader,
    row_number: u64,
    record: Vec<String>,

    row_error: Option<RowError>,
    last_parse_failed: bool,
}

impl<'d> Row<'d> {
    pub(crate) fn new(
        header: Option<&'d Header>,
        reader: &'d dyn RecordReader,
        row_number: u64,
        record: Vec<String>,
    ) -> Self {
        Self {
            header,
            reader,
            row_number,
            record,
            row_error: None,
            last_parse_failed: false,
        }
    }

    fn header(&self) -> &'d Header {
        match self.header {
            Some(header) => header,
            None => panic!("row without header, forgot to call Decoder::parse_header()?"),
        }
    }

    /// The raw fields of the record.
    pub fn record(&self) -> &[String] {
        &self.record
    }

    /// Row number of this record, starting at 1. The header record is row 1.
    pub fn row_number(&self) -> u64 {
        self.row_number
    }

    fn lookup(&self, key: &str) -> (Option<usize>, &str) {
        match self.header().get(key) {
            Some(index) => (
                Some(index),
                self.record.get(index).map_or("", String::as_str),
            ),
            None => (None, ""),
        }
    }

    /// Returns the value of the cell associated with `key`.
    ///
    /// Returns an empty string if there is no such cell; use
    /// [`has`](Row::has) to tell a missing cell from an empty one.
    pub fn get(&self, key: &str) -> &str {
        self.lookup(key).1
    }

    /// Returns true if the header has a column for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.header().has(key)
    }

    /// Look up the cell for `key` and pass its value to `parse`.
    ///
    /// If `parse` fails, its error is wrapped in a [`CellError`] carrying the
    /// position of the cell, stored as the last parse error and appended to
    /// the row error. If it succeeds, the last parse error is cleared.
    ///
    /// ```
    /// use csvd::DecoderBuilder;
    ///
    /// let mut decoder = DecoderBuilder::new().from_bytes(b"name,age\nbob,x\n").unwrap();
    /// decoder.parse_header().unwrap();
    /// let mut row = decoder.next_row().unwrap().unwrap();
    ///
    /// let mut age = 0u8;
    /// row.parse("Age", |val| {
    ///     age = val.parse()?;
    ///     Ok::<_, std::num::ParseIntError>(())
    /// });
    /// assert_eq!(row.last_parse_error().unwrap().column, Some(2));
    /// ```
    pub fn parse<F, E>(&mut self, key: &str, parse: F)
    where
        F: FnOnce(&str) -> Result<(), E>,
        E: Into<BoxError>,
    {
        let (index, value) = self.lookup(key);

        let source = match parse(value) {
            Ok(()) => {
                self.last_parse_failed = false;
                return;
            }
            Err(err) => err.into(),
        };

        let line = index
            .and_then(|index| self.reader.field_position(index))
            .map(|pos| pos.line);
        let cell_error = CellError {
            key: key.to_string(),
            value: value.to_string(),
            row: self.row_number,
            column: index.map(|index| index as u64 + 1),
            line,
            source,
        };

        tracing::trace!(
            row = cell_error.row,
            key,
            error = %cell_error.source,
            "cell parse failed"
        );

        self.row_error
            .get_or_insert_with(RowError::new)
            .add(Some(cell_error));
        self.last_parse_failed = true;
    }

    /// Parse the cell for `key` with [`FromStr`], recording a failure like
    /// [`parse`](Row::parse) does. Returns the value on success.
    pub fn parse_value<T>(&mut self, key: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Into<BoxError>,
    {
        let mut parsed = None;
        self.parse(key, |val| {
            parsed = Some(val.parse::<T>()?);
            Ok::<_, T::Err>(())
        });
        parsed
    }

    /// The error from the most recent [`parse`](Row::parse) call, if it failed.
    pub fn last_parse_error(&self) -> Option<&CellError> {
        if !self.last_parse_failed {
            return None;
        }
        self.row_error.as_ref().and_then(RowError::last)
    }

    /// All errors collected by [`parse`](Row::parse) calls on this row.
    pub fn error(&self) -> Option<&RowError> {
        self.row_error.as_ref()
    }

    /// Consume the row, returning its collected errors.
    pub fn into_error(self) -> Option<RowError> {
        self.row_error
    }
}

impl fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("row_number", &self.row_number)
            .field("record", &self.record)
            .field("row_error", &self.row_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::source::FieldPosition;
    use std::cell::RefCell;

    /// Reports each field on line 10 and remembers which indices were asked for.
    #[derive(Default)]
    struct StubReader {
        queried: RefCell<Vec<usize>>,
    }

    impl RecordReader for StubReader {
        fn read_record(&mut self) -> Result<Option<Vec<String>>> {
            Ok(None)
        }

        fn field_position(&self, index: usize) -> Option<FieldPosition> {
            self.queried.borrow_mut().push(index);
            Some(FieldPosition {
                line: 10,
                column: 1,
            })
        }
    }

    fn record(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_get_and_has() {
        let header = Header::from_record(&["User Name", "Age"]);
        let reader = StubReader::default();
        let row = Row::new(Some(&header), &reader, 2, record(&["bob", ""]));

        assert_eq!(row.get("user name"), "bob");
        assert_eq!(row.get("age"), "");
        assert!(row.has("age"));
        assert_eq!(row.get("email"), "");
        assert!(!row.has("email"));
        assert_eq!(row.record(), ["bob", ""]);
    }

    #[test]
    fn test_short_record_yields_empty_value() {
        let header = Header::from_record(&["a", "b", "c"]);
        let reader = StubReader::default();
        let row = Row::new(Some(&header), &reader, 2, record(&["1"]));
        assert_eq!(row.get("c"), "");
    }

    #[test]
    fn test_parse_collects_independent_failures() {
        let header = Header::from_record(&["name", "age", "score"]);
        let reader = StubReader::default();
        let mut row = Row::new(Some(&header), &reader, 3, record(&["", "x", "7"]));

        row.parse("name", |val| {
            if val.is_empty() {
                return Err("required");
            }
            Ok(())
        });
        row.parse("score", |val| val.parse::<u8>().map(drop));
        row.parse("age", |val| val.parse::<u8>().map(drop));

        let row_error = row.error().and_then(RowError::err).unwrap();
        assert_eq!(row_error.len(), 2);

        let first = &row_error.cell_errors()[0];
        assert_eq!(first.key, "name");
        assert_eq!(first.value, "");
        assert_eq!(first.row, 3);
        assert_eq!(first.column, Some(1));
        assert_eq!(first.line, Some(10));
        assert_eq!(first.source.to_string(), "required");

        let second = &row_error.cell_errors()[1];
        assert_eq!(second.key, "age");
        assert_eq!(second.value, "x");
        assert_eq!(second.column, Some(2));
    }

    #[test]
    fn test_last_parse_error_tracks_latest_call() {
        let header = Header::from_record(&["a", "b"]);
        let reader = StubReader::default();
        let mut row = Row::new(Some(&header), &reader, 2, record(&["x", "1"]));

        assert!(row.last_parse_error().is_none());

        row.parse("a", |val| val.parse::<i32>().map(drop));
        assert_eq!(row.last_parse_error().map(|e| e.key.as_str()), Some("a"));

        row.parse("b", |val| val.parse::<i32>().map(drop));
        assert!(row.last_parse_error().is_none());

        // the row error still holds the earlier failure
        assert_eq!(row.error().map(RowError::len), Some(1));
    }

    #[test]
    fn test_unresolved_key() {
        let header = Header::from_record(&["a"]);
        let reader = StubReader::default();
        let mut row = Row::new(Some(&header), &reader, 4, record(&["1"]));

        let mut seen = None;
        row.parse("missing", |val| {
            seen = Some(val.to_string());
            Err("required")
        });

        assert_eq!(seen.as_deref(), Some(""));
        let err = row.last_parse_error().unwrap();
        assert_eq!(err.column, None);
        assert_eq!(err.line, None);
        assert_eq!(err.value, "");
        assert_eq!(err.row, 4);
        assert!(reader.queried.borrow().is_empty());
    }

    #[test]
    fn test_successful_parse_records_nothing() {
        let header = Header::from_record(&["a"]);
        let reader = StubReader::default();
        let mut row = Row::new(Some(&header), &reader, 2, record(&["1"]));

        row.parse("a", |_| Ok::<_, BoxError>(()));
        assert!(row.error().is_none());
        assert!(row.into_error().is_none());
    }

    #[test]
    fn test_parse_value() {
        let header = Header::from_record(&["n", "m"]);
        let reader = StubReader::default();
        let mut row = Row::new(Some(&header), &reader, 2, record(&["42", "4.5x"]));

        assert_eq!(row.parse_value::<u32>("n"), Some(42));
        assert_eq!(row.parse_value::<f64>("m"), None);
        assert_eq!(row.last_parse_error().map(|e| e.value.as_str()), Some("4.5x"));
    }

    #[test]
    #[should_panic(expected = "forgot to call Decoder::parse_header()")]
    fn test_get_without_header_panics() {
        let reader = StubReader::default();
        let row = Row::new(None, &reader, 1, record(&["a"]));
        row.get("a");
    }

    #[test]
    #[should_panic(expected = "row without header")]
    fn test_parse_without_header_panics() {
        let reader = StubReader::default();
        let mut row = Row::new(None, &reader, 1, record(&["a"]));
        row.parse("a", |_| Ok::<_, BoxError>(()));
    }
}
