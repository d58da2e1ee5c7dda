//! Declarative cell rules.
//!
//! A rule names a header key and a check to run on its cells, written as
//! `KEY=KIND`:
//!
//! | KIND              | accepts                                     |
//! |-------------------|---------------------------------------------|
//! | `nonempty`        | any non-empty value                         |
//! | `int`             | a signed 64-bit integer                     |
//! | `uint`            | an unsigned 64-bit integer                  |
//! | `float`           | a floating point number                     |
//! | `bool`            | 1/0, y/n, t/f, yes/no, on/off, true/false   |
//! | `regex:<pattern>` | values matching the pattern                 |
//!
//! Keys are matched by canonical form, so `User Name=nonempty` and
//! `user name=nonempty` are the same rule. A key cannot contain `=`.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use regex::Regex;
use thiserror::Error;

use crate::error::DecodeError;
use crate::row::Row;

/// The check a [`Rule`] performs.
#[derive(Debug, Clone)]
pub enum RuleKind {
    NonEmpty,
    Int,
    Uint,
    Float,
    Bool,
    Pattern(Regex),
}

/// Why a value failed its rule.
#[derive(Error, Debug)]
pub enum RuleViolation {
    #[error("value is empty")]
    Empty,

    #[error("invalid integer: {0}")]
    Int(#[from] ParseIntError),

    #[error("invalid float: {0}")]
    Float(#[from] ParseFloatError),

    #[error("invalid boolean")]
    Bool,

    #[error("does not match /{0}/")]
    Pattern(String),
}

/// A check bound to a header key.
#[derive(Debug, Clone)]
pub struct Rule {
    pub key: String,
    pub kind: RuleKind,
}

impl Rule {
    pub fn new(key: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }

    /// Check a single value.
    pub fn check(&self, value: &str) -> Result<(), RuleViolation> {
        match &self.kind {
            RuleKind::NonEmpty => {
                if value.is_empty() {
                    return Err(RuleViolation::Empty);
                }
            }
            RuleKind::Int => {
                value.parse::<i64>()?;
            }
            RuleKind::Uint => {
                value.parse::<u64>()?;
            }
            RuleKind::Float => {
                value.parse::<f64>()?;
            }
            RuleKind::Bool => {
                if !is_boolean(value) {
                    return Err(RuleViolation::Bool);
                }
            }
            RuleKind::Pattern(re) => {
                if !re.is_match(value) {
                    return Err(RuleViolation::Pattern(re.as_str().to_string()));
                }
            }
        }
        Ok(())
    }

    /// Check the cell for this rule's key, recording a failure on the row.
    pub fn apply(&self, row: &mut Row<'_>) {
        row.parse(&self.key, |value| self.check(value));
    }
}

/// Boolean words, matched case-insensitively.
#[inline]
fn is_boolean(s: &str) -> bool {
    match s.len() {
        1 => {
            let b = s.as_bytes()[0].to_ascii_lowercase();
            matches!(b, b'1' | b'0' | b'y' | b'n' | b't' | b'f')
        }
        2 => s.eq_ignore_ascii_case("on") || s.eq_ignore_ascii_case("no"),
        3 => s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("off"),
        4 => s.eq_ignore_ascii_case("true"),
        5 => s.eq_ignore_ascii_case("false"),
        _ => false,
    }
}

impl FromStr for RuleKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(pattern) = s.strip_prefix("regex:") {
            let re = Regex::new(pattern)
                .map_err(|e| DecodeError::InvalidRule(format!("bad pattern {pattern:?}: {e}")))?;
            return Ok(RuleKind::Pattern(re));
        }

        match s.to_ascii_lowercase().as_str() {
            "nonempty" => Ok(RuleKind::NonEmpty),
            "int" => Ok(RuleKind::Int),
            "uint" => Ok(RuleKind::Uint),
            "float" => Ok(RuleKind::Float),
            "bool" => Ok(RuleKind::Bool),
            _ => Err(DecodeError::InvalidRule(format!("unknown rule kind {s:?}"))),
        }
    }
}

impl FromStr for Rule {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, kind)) = s.split_once('=') else {
            return Err(DecodeError::InvalidRule(format!(
                "expected KEY=KIND, got {s:?}"
            )));
        };
        if key.trim().is_empty() {
            return Err(DecodeError::InvalidRule(format!("empty key in {s:?}")));
        }
        Ok(Rule::new(key, kind.parse()?))
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::NonEmpty => write!(f, "nonempty"),
            RuleKind::Int => write!(f, "int"),
            RuleKind::Uint => write!(f, "uint"),
            RuleKind::Float => write!(f, "float"),
            RuleKind::Bool => write!(f, "bool"),
            RuleKind::Pattern(re) => write!(f, "regex:{}", re.as_str()),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.kind)
    }
}
