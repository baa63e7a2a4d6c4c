//! Request/response payload tree and date normalization.
//!
//! The Insightly API takes and returns arbitrary JSON, but write bodies must
//! carry dates as bare `YYYY-MM-DD HH:MM:SS` strings. [`Payload`] is a
//! tagged tree over mappings, sequences, and scalars that keeps date values
//! typed until serialization; [`Payload::normalized`] rewrites every date
//! leaf into the wire string while leaving the original tree untouched.
//!
//! Note the intentional asymmetry with filter literals: write payloads use
//! the same unwrapped `YYYY-MM-DD HH:MM:SS` form for both dates and
//! datetimes, with no `Date'...'`/`DateTime'...'` quoting.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::value::DATETIME_FORMAT;

/// An arbitrary request/response payload tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// String scalar.
    String(String),
    /// A calendar date. Serialized as `YYYY-MM-DD 00:00:00`.
    Date(NaiveDate),
    /// A datetime. Serialized as `YYYY-MM-DD HH:MM:SS`.
    DateTime(NaiveDateTime),
    /// An ordered sequence of payloads.
    Array(Vec<Payload>),
    /// A mapping from field name to payload.
    Object(BTreeMap<String, Payload>),
}

impl Payload {
    /// Create an empty object payload.
    pub fn object() -> Self {
        Payload::Object(BTreeMap::new())
    }

    /// Insert a field into an object payload, converting other variants into
    /// a single-field object.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Payload>) -> Self {
        if let Payload::Object(ref mut map) = self {
            map.insert(key.into(), value.into());
            return self;
        }
        let mut map = BTreeMap::new();
        map.insert(key.into(), value.into());
        Payload::Object(map)
    }

    /// Return a structurally identical copy with every date/datetime leaf
    /// replaced by its wire string form.
    ///
    /// Traverses mappings key-by-key and sequences index-by-index at
    /// arbitrary depth; non-date scalars are copied unchanged. The receiver
    /// is never mutated.
    pub fn normalized(&self) -> Payload {
        match self {
            Payload::Date(d) => Payload::String(format_wire_date(*d)),
            Payload::DateTime(dt) => Payload::String(format_wire_datetime(*dt)),
            Payload::Array(items) => {
                Payload::Array(items.iter().map(Payload::normalized).collect())
            }
            Payload::Object(map) => Payload::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.normalized()))
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }

    /// Convert to a JSON value for the request body. Date leaves are
    /// rendered in the wire format.
    pub fn to_json(&self) -> Value {
        match self {
            Payload::Null => Value::Null,
            Payload::Bool(b) => Value::Bool(*b),
            Payload::Int(i) => Value::Number((*i).into()),
            Payload::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Payload::String(s) => Value::String(s.clone()),
            Payload::Date(d) => Value::String(format_wire_date(*d)),
            Payload::DateTime(dt) => Value::String(format_wire_datetime(*dt)),
            Payload::Array(items) => Value::Array(items.iter().map(Payload::to_json).collect()),
            Payload::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Write-payload wire form of a datetime.
fn format_wire_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Write-payload wire form of a date-only value. Midnight is filled in so
/// both date and datetime leaves share one format.
fn format_wire_date(d: NaiveDate) -> String {
    format_wire_datetime(d.and_hms_opt(0, 0, 0).unwrap_or_default())
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Bool(b)
    }
}

impl From<i32> for Payload {
    fn from(i: i32) -> Self {
        Payload::Int(i64::from(i))
    }
}

impl From<i64> for Payload {
    fn from(i: i64) -> Self {
        Payload::Int(i)
    }
}

impl From<f64> for Payload {
    fn from(f: f64) -> Self {
        Payload::Float(f)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::String(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::String(s)
    }
}

impl From<NaiveDate> for Payload {
    fn from(d: NaiveDate) -> Self {
        Payload::Date(d)
    }
}

impl From<NaiveDateTime> for Payload {
    fn from(dt: NaiveDateTime) -> Self {
        Payload::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Payload {
    fn from(dt: DateTime<Utc>) -> Self {
        Payload::DateTime(dt.naive_utc())
    }
}

impl<T: Into<Payload>> From<Vec<T>> for Payload {
    fn from(items: Vec<T>) -> Self {
        Payload::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for Payload {
    /// Lift a JSON value into the payload tree. JSON carries no date type,
    /// so date-looking strings stay strings.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Payload::Null,
            Value::Bool(b) => Payload::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Payload::Int(i)
                } else {
                    Payload::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Payload::String(s),
            Value::Array(items) => Payload::Array(items.into_iter().map(Payload::from).collect()),
            Value::Object(map) => Payload::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Payload::from(v)))
                    .collect(),
            ),
        }
    }
}

impl<K: Into<String>, V: Into<Payload>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Payload::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
