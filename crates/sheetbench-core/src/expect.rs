//! Control-row expectations and per-field verdicts

use std::fmt;

use chrono::NaiveDate;

use crate::row::Row;
use crate::value::Value;
use crate::{FAIL_GLYPH, PASS_GLYPH};

/// One expected (column, typed value) pair
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    pub column: String,
    pub expected: Value,
}

/// Outcome of checking one field of the control row
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Present, same type, equal value
    Pass,
    /// Column absent from the row
    Missing,
    /// Present but decoded as a different type
    TypeMismatch {
        expected: &'static str,
        received: &'static str,
    },
    /// Same type, different value
    ValueMismatch { expected: Value, received: Value },
}

impl Verdict {
    /// Check if the field passed
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// A verdict bound to the column it was computed for
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCheck {
    pub column: String,
    pub verdict: Verdict,
}

impl fmt::Display for FieldCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = &self.column;
        match &self.verdict {
            Verdict::Pass => write!(f, "{PASS_GLYPH} \"{key}\""),
            Verdict::Missing => write!(f, "{FAIL_GLYPH} \"{key}\" missing"),
            Verdict::TypeMismatch { expected, received } => write!(
                f,
                "{FAIL_GLYPH} \"{key}\" expected type \"{expected}\" received type \"{received}\""
            ),
            Verdict::ValueMismatch { expected, received } => write!(
                f,
                "{FAIL_GLYPH} \"{key}\" expected value \"{expected}\" received \"{received}\""
            ),
        }
    }
}

impl Expectation {
    /// Create a new expectation
    pub fn new<K: Into<String>, V: Into<Value>>(column: K, expected: V) -> Self {
        Self {
            column: column.into(),
            expected: expected.into(),
        }
    }

    /// Compare the row's cell against the expected value.
    ///
    /// Types are compared before values and never coerced: `Int(1)` against
    /// `Float(1.0)` is a type mismatch.
    pub fn check(&self, row: &Row) -> Verdict {
        let Some(value) = row.get(&self.column) else {
            return Verdict::Missing;
        };
        if !self.expected.same_type(value) {
            Verdict::TypeMismatch {
                expected: self.expected.type_name(),
                received: value.type_name(),
            }
        } else if self.expected != *value {
            Verdict::ValueMismatch {
                expected: self.expected.clone(),
                received: value.clone(),
            }
        } else {
            Verdict::Pass
        }
    }

    /// Check and label with the column name
    pub fn field_check(&self, row: &Row) -> FieldCheck {
        FieldCheck {
            column: self.column.clone(),
            verdict: self.check(row),
        }
    }
}

/// The five fixed checks for the control row, in reporting order
pub fn control_expectations() -> Vec<Expectation> {
    vec![
        Expectation::new("number", 1i64),
        Expectation::new("decimal", 1.1f64),
        Expectation::new("date", NaiveDate::from_ymd_opt(2000, 1, 1)),
        Expectation::new("boolean", true),
        Expectation::new("text", "CONTROL ROW"),
    ]
}
