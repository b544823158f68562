//! Decoded cell values

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// A single decoded cell.
///
/// The variants are distinct types: `Int(1)` and `Float(1.0)`
/// are different values, and so are `Date` and a midnight `DateTime`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Empty cell or SQL NULL
    Null,
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Calendar date without a time component
    Date(NaiveDate),
    /// Timestamp (date and time of day)
    DateTime(NaiveDateTime),
    /// Boolean
    Bool(bool),
    /// Text
    String(String),
}

impl Value {
    /// Short name of the value's type, used in type-mismatch diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Bool(_) => "bool",
            Value::String(_) => "str",
        }
    }

    /// True when the two values carry the same variant
    pub fn same_type(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Render the value the way it appears inside a printed row:
    /// strings are quoted, null is spelled out.
    pub(crate) fn write_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Date(d) => write!(f, "date({d})"),
            Value::DateTime(dt) => write!(f, "datetime({dt})"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(n) => write!(f, "{n}"),
            // Debug keeps the trailing ".0" on integral floats
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Day zero of the 1900 date system as used by spreadsheet serials.
///
/// 1899-12-30 rather than 12-31 absorbs the fictitious 1900-02-29.
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Convert a spreadsheet date serial (1900 system) to a timestamp.
///
/// Returns `None` for negative, non-finite or out-of-range serials.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    // rounded to the millisecond
    let millis = (serial * 86_400_000.0).round() as i64;
    serial_epoch().checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a date to its spreadsheet serial (1900 system)
pub fn date_to_serial(date: NaiveDate) -> f64 {
    let days = date.and_time(NaiveTime::MIN) - serial_epoch();
    days.num_days() as f64
}

/// Narrow a timestamp to a [`Value::Date`] when it falls exactly on midnight
pub fn narrow_datetime(dt: NaiveDateTime) -> Value {
    if dt.time() == NaiveTime::MIN {
        Value::Date(dt.date())
    } else {
        Value::DateTime(dt)
    }
}
