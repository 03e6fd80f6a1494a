//! Scalar and structured values that can live in a record field, plus
//! key-path addressing into them (§3 "Record", §9 "Key-path addressing").

use std::hash::{Hash, Hasher};

use im::{HashMap as ImHashMap, Vector as ImVector};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A field-name to value mapping. Shared by top-level records and nested
/// record values; `im`'s structural sharing means cloning one is cheap.
pub type Fields = ImHashMap<String, Value>;

/// A path (sequence of field names) locating a value inside a record, per
/// §3's typedef `key`/`foreignKeys`/`inverseForeignKeys` paths.
pub type Path = Vec<String>;

/// Builds a [`Path`] from string-like segments, e.g. `path(["account", "id"])`.
pub fn path<I, S>(segments: I) -> Path
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    segments.into_iter().map(Into::into).collect()
}

/// A value held by a record field: a scalar, a nested record, or a list of
/// either. The store treats this tree as opaque except at the paths a
/// typedef declares (§3).
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    String(String),
    List(ImVector<Value>),
    Record(Fields),
}

impl Value {
    pub fn string(v: impl Into<String>) -> Self {
        Value::String(v.into())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// `im::HashMap` has no blanket `Hash` impl (unordered iteration order would
// make it unstable), so `Value` can't derive `Hash`. Written by hand, XORing
// per-field hashes so the combination is order-independent and agrees with
// the structural `Eq` below regardless of a record's field insertion order
// (§9 "treat semantically equivalent mappings as equal regardless of
// insertion order").
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => {
                3u8.hash(state);
                f.hash(state);
            }
            Value::String(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Value::List(items) => {
                5u8.hash(state);
                items.len().hash(state);
                for item in items.iter() {
                    item.hash(state);
                }
            }
            Value::Record(fields) => {
                6u8.hash(state);
                let mut acc: u64 = 0;
                for (k, v) in fields.iter() {
                    let mut h = std::collections::hash_map::DefaultHasher::new();
                    k.hash(&mut h);
                    v.hash(&mut h);
                    acc ^= h.finish();
                }
                acc.hash(state);
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // `im::HashMap::eq` already compares by content, not insertion
            // order, which is exactly the deep structural equality §9 asks
            // `getAllChanged`/`getChangedProperties` to use.
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde_json::Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from(raw))
    }
}

impl From<serde_json::Value> for Value {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(OrderedFloat(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut fields = Fields::new();
                for (k, v) in map {
                    fields = fields.update(k, Value::from(v));
                }
                Value::Record(fields)
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f.0)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Record(fields) => {
                let mut map = serde_json::Map::with_capacity(fields.len());
                for (k, v) in fields.iter() {
                    map.insert(k.clone(), v.clone().into());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

/// Reads the value at `path` inside `fields`, descending through nested
/// records only. A path segment that would need to look inside a list is a
/// dead end (`None`), matching §9's "key-path addressing" note: paths name
/// fields, not list indices.
pub fn get_path<'a>(fields: &'a Fields, path: &[String]) -> Option<&'a Value> {
    let (head, rest) = path.split_first()?;
    let value = fields.get(head)?;
    if rest.is_empty() {
        Some(value)
    } else {
        match value {
            Value::Record(nested) => get_path(nested, rest),
            _ => None,
        }
    }
}

/// Writes `value` at `path` inside `fields`, returning a new `Fields` and
/// leaving `fields` untouched (the store is value-oriented throughout).
/// Missing intermediate records along the path are created empty; an
/// intermediate segment that already holds a non-`Record` value (e.g. a
/// list or a scalar) is a dead end, not something to silently clobber — the
/// same `MissingKey` error `get_path` would produce trying to descend into
/// it (§9 "key-path addressing": paths name fields, not list indices).
pub fn set_path(fields: &Fields, path: &[String], value: Value) -> Result<Fields> {
    let (head, rest) = path.split_first().ok_or_else(|| Error::MissingKey {
        path: path.to_vec(),
    })?;
    if rest.is_empty() {
        return Ok(fields.update(head.clone(), value));
    }
    let nested = match fields.get(head) {
        Some(Value::Record(nested)) => nested.clone(),
        Some(_) => {
            return Err(Error::MissingKey {
                path: path.to_vec(),
            })
        }
        None => Fields::new(),
    };
    let updated_nested = set_path(&nested, rest, value)?;
    Ok(fields.update(head.clone(), Value::Record(updated_nested)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_equality_ignores_field_insertion_order() {
        let a = Value::Record(Fields::new().update("x".into(), Value::Int(1)).update("y".into(), Value::Int(2)));
        let b = Value::Record(Fields::new().update("y".into(), Value::Int(2)).update("x".into(), Value::Int(1)));
        assert_eq!(a, b);

        let mut ha = std::collections::hash_map::DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = std::collections::hash_map::DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn get_path_descends_through_nested_records_only() {
        let inner = Fields::new().update("zip".into(), Value::string("94110"));
        let fields = Fields::new()
            .update("address".into(), Value::Record(inner))
            .update("tags".into(), Value::List(ImVector::from(vec![Value::string("a")])));

        assert_eq!(get_path(&fields, &path(["address", "zip"])), Some(&Value::string("94110")));
        assert_eq!(get_path(&fields, &path(["tags", "0"])), None);
        assert_eq!(get_path(&fields, &path(["missing"])), None);
    }

    #[test]
    fn set_path_auto_vivifies_missing_intermediate_records() {
        let fields = Fields::new();
        let updated = set_path(&fields, &path(["address", "zip"]), Value::string("10001")).unwrap();
        assert_eq!(get_path(&updated, &path(["address", "zip"])), Some(&Value::string("10001")));
        assert!(fields.is_empty());
    }

    #[test]
    fn set_path_leaves_sibling_fields_untouched() {
        let inner = Fields::new().update("zip".into(), Value::string("94110")).update("city".into(), Value::string("SF"));
        let fields = Fields::new().update("address".into(), Value::Record(inner));
        let updated = set_path(&fields, &path(["address", "zip"]), Value::string("10001")).unwrap();
        assert_eq!(get_path(&updated, &path(["address", "city"])), Some(&Value::string("SF")));
    }

    #[test]
    fn set_path_through_a_non_record_intermediate_value_is_a_missing_key_error() {
        let fields = Fields::new().update("address".into(), Value::List(ImVector::new()));
        let result = set_path(&fields, &path(["address", "zip"]), Value::string("10001"));
        assert!(matches!(result, Err(Error::MissingKey { .. })));
    }
}
