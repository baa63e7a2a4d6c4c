//! Response record wrapper with custom-field lookup.
//!
//! Insightly stores caller-defined attributes in a `CUSTOMFIELDS`
//! list-of-objects on each record, keyed by `CUSTOM_FIELD_ID` with the value
//! under `FIELD_VALUE`. [`Record`] composes over the parsed JSON body and
//! adds that lookup alongside plain field access.

use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};

/// Key of the custom-field list on a record.
const CUSTOM_FIELDS_KEY: &str = "CUSTOMFIELDS";

/// Key of the field id within a custom-field entry.
const CUSTOM_FIELD_ID_KEY: &str = "CUSTOM_FIELD_ID";

/// Key of the value within a custom-field entry.
const FIELD_VALUE_KEY: &str = "FIELD_VALUE";

/// A single record returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    body: Value,
}

impl Record {
    /// Wrap a parsed response body.
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Look up a top-level field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Look up a custom field by its field id.
    ///
    /// Searches the `CUSTOMFIELDS` list for an entry whose
    /// `CUSTOM_FIELD_ID` matches and returns its `FIELD_VALUE`. Fails with
    /// [`ErrorKind::FieldNotFound`] when no entry matches.
    pub fn custom_field(&self, field_id: &str) -> Result<&Value> {
        self.find_custom_field(field_id)
            .ok_or_else(|| Error::new(ErrorKind::FieldNotFound(field_id.to_string())))
    }

    /// Look up a custom field by its field id, falling back to `default`
    /// when no entry matches.
    pub fn custom_field_or<'a>(&'a self, field_id: &str, default: &'a Value) -> &'a Value {
        self.find_custom_field(field_id).unwrap_or(default)
    }

    fn find_custom_field(&self, field_id: &str) -> Option<&Value> {
        self.body
            .get(CUSTOM_FIELDS_KEY)?
            .as_array()?
            .iter()
            .find(|entry| {
                entry
                    .get(CUSTOM_FIELD_ID_KEY)
                    .and_then(Value::as_str)
                    .is_some_and(|id| id == field_id)
            })?
            .get(FIELD_VALUE_KEY)
    }

    /// Borrow the underlying JSON body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consume the wrapper and return the JSON body.
    pub fn into_body(self) -> Value {
        self.body
    }
}

impl From<Value> for Record {
    fn from(body: Value) -> Self {
        Record::new(body)
    }
}

/// Wrap a response body: a list wraps each element, anything else wraps the
/// whole body as a single record.
pub(crate) fn wrap_list(body: Value) -> Vec<Record> {
    match body {
        Value::Array(items) => items.into_iter().map(Record::new).collect(),
        other => vec![Record::new(other)],
    }
}
