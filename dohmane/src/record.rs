//! The record type (§3): an immutable field-name to value mapping, opaque
//! to the store except at the paths a typedef declares.

use std::ops::Deref;

use crate::error::Result;
use crate::value::{self, Fields, Path, Value};

/// An immutable record. Cheap to clone (structural sharing via `im`).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Record(Fields);

impl Record {
    pub fn empty() -> Self {
        Record(Fields::new())
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns a new record with `field` set to `value`.
    pub fn with(&self, field: impl Into<String>, value: Value) -> Record {
        Record(self.0.update(field.into(), value))
    }

    pub fn get_path(&self, path: &Path) -> Option<&Value> {
        value::get_path(&self.0, path)
    }

    /// Returns a new record with `value` written at `path`, building any
    /// missing intermediate nested records along the way.
    pub fn set_path(&self, path: &Path, value: Value) -> Result<Record> {
        Ok(Record(value::set_path(&self.0, path, value)?))
    }
}

impl Deref for Record {
    type Target = Fields;

    fn deref(&self) -> &Fields {
        &self.0
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Record(fields)
    }
}

impl From<Record> for Fields {
    fn from(record: Record) -> Self {
        record.0
    }
}

impl From<serde_json::Value> for Record {
    fn from(raw: serde_json::Value) -> Self {
        match Value::from(raw) {
            Value::Record(fields) => Record(fields),
            _ => Record::empty(),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Record::from(serde_json::Value::Object(map))
    }
}
