//! Cell and row level parse errors.

use crate::error::BoxError;
use std::error::Error;
use std::fmt;

/// A cell value parse error together with the position of the cell.
#[derive(Debug)]
pub struct CellError {
    /// The key used to look up the cell in the row.
    pub key: String,
    /// The value of the cell. Empty if the key did not resolve to a column.
    pub value: String,
    /// Row number of the cell, starting at 1. The header record is row 1.
    pub row: u64,
    /// Column number of the cell, starting at 1.
    /// `None` if the key did not resolve to a column.
    pub column: Option<u64>,
    /// Line number of the cell in the source, starting at 1.
    ///
    /// A row can span multiple lines when quoted fields contain line breaks.
    /// `None` if the key did not resolve to a column.
    pub line: Option<u64>,
    /// The error returned by the parse function.
    pub source: BoxError,
}

impl CellError {
    /// Writes `row: .., column: .., key: .., val: .., err: ..`.
    /// Unresolved columns print as -1.
    fn write_fields(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row: {}, column: {}, key: {:?}, val: {:?}, err: {}",
            self.row,
            OrMinusOne(self.column),
            self.key,
            self.value,
            self.source
        )
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cell err, ")?;
        self.write_fields(f)
    }
}

impl Error for CellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let source: &(dyn Error + 'static) = &*self.source;
        Some(source)
    }
}

/// Renders an optional position, using -1 for an absent one.
struct OrMinusOne(Option<u64>);

impl fmt::Display for OrMinusOne {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{n}"),
            None => f.write_str("-1"),
        }
    }
}

/// The cell errors collected while parsing one row, in call order.
#[derive(Debug, Default)]
pub struct RowError {
    cell_errors: Vec<CellError>,
}

impl RowError {
    /// Create an empty row error.
    pub const fn new() -> Self {
        Self {
            cell_errors: Vec::new(),
        }
    }

    /// Append `cell_error` if it is `Some`.
    pub fn add(&mut self, cell_error: Option<CellError>) {
        if let Some(cell_error) = cell_error {
            self.cell_errors.push(cell_error);
        }
    }

    /// Returns `Some(self)` if at least one cell error was collected.
    ///
    /// ```
    /// use csvd::RowError;
    ///
    /// let row_error = RowError::new();
    /// assert!(row_error.err().is_none());
    /// ```
    pub fn err(&self) -> Option<&Self> {
        if self.cell_errors.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// The collected cell errors, in the order they occurred.
    pub fn cell_errors(&self) -> &[CellError] {
        &self.cell_errors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cell_errors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellError> {
        self.cell_errors.iter()
    }

    pub fn into_cell_errors(self) -> Vec<CellError> {
        self.cell_errors
    }

    pub(crate) fn last(&self) -> Option<&CellError> {
        self.cell_errors.last()
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} cell error(s) found.", self.cell_errors.len())?;
        for cell_error in &self.cell_errors {
            f.write_str("- ")?;
            cell_error.write_fields(f)?;
            f.write_str(".\n")?;
        }
        Ok(())
    }
}

impl Error for RowError {}

impl<'a> IntoIterator for &'a RowError {
    type Item = &'a CellError;
    type IntoIter = std::slice::Iter<'a, CellError>;

    fn into_iter(self) -> Self::IntoIter {
        self.cell_errors.iter()
    }
}

impl IntoIterator for RowError {
    type Item = CellError;
    type IntoIter = std::vec::IntoIter<CellError>;

    fn into_iter(self) -> Self::IntoIter {
        self.cell_errors.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_error(key: &str, value: &str, column: Option<u64>, msg: &str) -> CellError {
        CellError {
            key: key.to_string(),
            value: value.to_string(),
            row: 3,
            column,
            line: column.map(|_| 3),
            source: msg.into(),
        }
    }

    #[test]
    fn test_cell_error_display() {
        let err = cell_error("age", "a", Some(2), "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            r#"cell err, row: 3, column: 2, key: "age", val: "a", err: invalid digit found in string"#
        );
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("invalid digit found in string")
        );
    }

    #[test]
    fn test_unresolved_column_renders_minus_one() {
        let err = cell_error("nope", "", None, "required");
        assert_eq!(
            err.to_string(),
            r#"cell err, row: 3, column: -1, key: "nope", val: "", err: required"#
        );
    }

    #[test]
    fn test_add_skips_none() {
        let mut row_error = RowError::new();
        row_error.add(None);
        assert!(row_error.is_empty());
        assert!(row_error.err().is_none());

        row_error.add(Some(cell_error("a", "x", Some(1), "bad")));
        assert_eq!(row_error.len(), 1);
        assert!(row_error.err().is_some());
    }

    #[test]
    fn test_row_error_display() {
        let mut row_error = RowError::new();
        row_error.add(Some(cell_error("age", "17", Some(2), "too young")));
        row_error.add(Some(cell_error("name \"x\"", "", None, "required")));

        let expected = concat!(
            "2 cell error(s) found.\n",
            "- row: 3, column: 2, key: \"age\", val: \"17\", err: too young.\n",
            "- row: 3, column: -1, key: \"name \\\"x\\\"\", val: \"\", err: required.\n",
        );
        assert_eq!(row_error.to_string(), expected);
    }

    #[test]
    fn test_iteration_preserves_order() {
        let mut row_error = RowError::new();
        row_error.add(Some(cell_error("a", "1", Some(1), "first")));
        row_error.add(Some(cell_error("b", "2", Some(2), "second")));

        let keys: Vec<&str> = row_error.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);

        let owned: Vec<CellError> = row_error.into_iter().collect();
        assert_eq!(owned[1].source.to_string(), "second");
    }
}
