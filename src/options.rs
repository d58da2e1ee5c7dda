use std::fmt;

/// Quote character configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    /// No quoting.
    None,
    /// Quote with the specified character.
    Some(u8),
}

impl Default for Quote {
    fn default() -> Self {
        Quote::Some(b'"')
    }
}

impl Quote {
    /// Returns the quote character if set.
    pub fn char(&self) -> Option<u8> {
        match self {
            Quote::None => None,
            Quote::Some(c) => Some(*c),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quote::None => write!(f, "none"),
            Quote::Some(c) => write!(f, "{}", *c as char),
        }
    }
}

/// Tokenizer settings shared by every reader a [`DecoderBuilder`] creates.
///
/// [`DecoderBuilder`]: crate::DecoderBuilder
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReaderOptions {
    pub delimiter: u8,
    pub quote: Quote,
    pub flexible: bool,
    pub trim: bool,
    pub comment: Option<u8>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: Quote::default(),
            flexible: false,
            trim: false,
            comment: None,
        }
    }
}

impl ReaderOptions {
    /// Reject byte combinations the tokenizer cannot tell apart.
    pub fn validate(&self) -> Result<(), String> {
        if self.quote.char() == Some(self.delimiter) {
            return Err(format!(
                "delimiter and quote are both {:?}",
                self.delimiter as char
            ));
        }
        if let Some(comment) = self.comment {
            if comment == self.delimiter {
                return Err(format!(
                    "comment and delimiter are both {:?}",
                    comment as char
                ));
            }
            if self.quote.char() == Some(comment) {
                return Err(format!("comment and quote are both {:?}", comment as char));
            }
        }
        Ok(())
    }

    /// Configure a `csv::ReaderBuilder` from these options.
    ///
    /// Header handling is left to the decoder, so the reader never treats the
    /// first record specially. Trimming is left to [`CsvRecordReader`], which
    /// needs the raw fields to locate them.
    ///
    /// [`CsvRecordReader`]: crate::CsvRecordReader
    pub fn csv_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(self.flexible)
            .comment(self.comment);

        match self.quote {
            Quote::None => {
                builder.quoting(false);
            }
            Quote::Some(q) => {
                builder.quoting(true);
                builder.quote(q);
            }
        }

        builder
    }
}
