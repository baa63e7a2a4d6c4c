//! Filter value encoding.
//!
//! Converts native values into the quoted/escaped literal form the Insightly
//! filter grammar expects. Dates and datetimes get their own wrapped formats
//! (`Date'...'` / `DateTime'...'`); everything else is stringified, has its
//! single quotes doubled, and is wrapped in single quotes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Wire format for datetime filter literals (second precision, no fractional
/// seconds, no timezone suffix).
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wire format for date filter literals.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A native value usable in a filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A string value. Quoted and escaped on encoding.
    Text(String),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A calendar date with no time component.
    Date(NaiveDate),
    /// A datetime. Any sub-second precision is dropped on encoding.
    DateTime(NaiveDateTime),
}

impl FilterValue {
    /// Encode this value as a wire literal for the filter grammar.
    ///
    /// The output is always syntactically valid: string content has every
    /// single quote doubled, so `O'Brien` encodes to `'O''Brien'`.
    pub fn to_wire_literal(&self) -> String {
        match self {
            FilterValue::DateTime(dt) => {
                format!("DateTime'{}'", dt.format(DATETIME_FORMAT))
            }
            FilterValue::Date(d) => format!("Date'{}'", d.format(DATE_FORMAT)),
            FilterValue::Text(s) => quote(s),
            FilterValue::Int(i) => quote(&i.to_string()),
            FilterValue::Float(f) => quote(&f.to_string()),
            FilterValue::Bool(b) => quote(&b.to_string()),
        }
    }
}

fn quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i32> for FilterValue {
    fn from(i: i32) -> Self {
        FilterValue::Int(i64::from(i))
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Int(i)
    }
}

impl From<u32> for FilterValue {
    fn from(i: u32) -> Self {
        FilterValue::Int(i64::from(i))
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        FilterValue::Date(d)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(dt: NaiveDateTime) -> Self {
        FilterValue::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(dt: DateTime<Utc>) -> Self {
        // Offset is stripped; the API expects naive UTC timestamps.
        FilterValue::DateTime(dt.naive_utc())
    }
}
