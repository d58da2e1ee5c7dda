//! csvd: CSV row decoder with named column access
//!
//! Reads CSV rows and resolves cells by header name instead of position.
//! Header names are canonicalized (trimmed, whitespace collapsed, lower-cased),
//! so `"User  \tName "` is found as `"user name"`, `"USER NAME"` or
//! `" User Name "`.
//!
//! Cell values are handed to caller supplied parse functions. A failing parse
//! does not stop the row: every failure is collected with its row, column and
//! line, and the whole set is reported at once.
//!
//! # Quick Start
//!
//! ```
//! use csvd::DecoderBuilder;
//!
//! let data = "User  \tName , Age\ninvalid int,a\ngood age , 18\ntoo young,17\ntoo old,121\n";
//! let mut decoder = DecoderBuilder::new().from_bytes(data.as_bytes()).unwrap();
//! decoder.parse_header().unwrap();
//!
//! while let Some(mut row) = decoder.next_row().unwrap() {
//!     let _name = row.get("user name").trim().to_string();
//!     row.parse("age", |val| -> Result<(), csvd::BoxError> {
//!         let age: i8 = val.trim().parse()?;
//!         if age < 18 {
//!             return Err("too young".into());
//!         }
//!         if age > 120 {
//!             return Err("too old".into());
//!         }
//!         Ok(())
//!     });
//!
//!     if let Some(err) = row.error().and_then(|e| e.err()) {
//!         println!("{err}");
//!     }
//! }
//! ```
//!
//! prints
//!
//! ```text
//! 1 cell error(s) found.
//! - row: 2, column: 2, key: "age", val: "a", err: invalid digit found in string.
//!
//! 1 cell error(s) found.
//! - row: 4, column: 2, key: "age", val: "17", err: too young.
//!
//! 1 cell error(s) found.
//! - row: 5, column: 2, key: "age", val: "121", err: too old.
//! ```
//!
//! # Custom sources
//!
//! [`Decoder`] works with any [`RecordReader`]; [`DecoderBuilder`] wires it to
//! the `csv` crate.

mod canonical;
mod cell_error;
mod decoder;
mod encoding;
mod error;
mod header;
mod options;
mod row;
pub mod rule;
mod source;

pub use canonical::canonical_header_key;
pub use cell_error::{CellError, RowError};
pub use decoder::{BytesDecoder, DecodeSummary, Decoder, DecoderBuilder};
pub use error::{BoxError, DecodeError, Result};
pub use header::Header;
pub use options::Quote;
pub use row::Row;
pub use rule::{Rule, RuleKind, RuleViolation};
pub use source::{CsvRecordReader, FieldPosition, RecordReader};

// Re-export for advanced usage
pub use encoding::{detect_and_transcode, is_utf8};
