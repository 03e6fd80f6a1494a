//! The store value itself (§3 "Store", §4.1).

use im::HashMap as ImHashMap;
use serde_derive::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::Value;

/// Primary-key to record mapping for one entity type within one bucket.
pub type Bucket = ImHashMap<Value, Record>;

/// Entity-type-name to bucket mapping; one per top-level store field.
pub type Buckets = ImHashMap<String, Bucket>;

/// A record's derived classification (§3 "Entity state"). Never stored;
/// always computed from a `Store` by [`crate::entity_type::EntityType::state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Unchanged,
    Modified,
    New,
    Deleted,
}

/// The immutable store aggregate. Every mutating operation in this crate
/// takes a `Store` by value (or reference) and returns a new `Store`;
/// nothing is ever mutated in place. `im`'s structural sharing keeps this
/// cheap: a single-field edit touches one path through each nested map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub initial: Buckets,
    pub current: Buckets,
    pub deleted: Buckets,

    /// Consumed and decremented by each auto-assigned primary key (§4.1).
    /// Only ever decreases; never reset, never incremented.
    pub next_key: i64,
}

impl Store {
    /// An empty store: no records in any bucket, `next_key` at -1.
    pub fn new() -> Self {
        Store {
            initial: Buckets::new(),
            current: Buckets::new(),
            deleted: Buckets::new(),
            next_key: -1,
        }
    }
}

pub(crate) fn get<'a>(buckets: &'a Buckets, type_name: &str, key: &Value) -> Option<&'a Record> {
    buckets.get(type_name)?.get(key)
}

pub(crate) fn get_all(buckets: &Buckets, type_name: &str) -> Bucket {
    buckets.get(type_name).cloned().unwrap_or_default()
}

pub(crate) fn contains(buckets: &Buckets, type_name: &str, key: &Value) -> bool {
    buckets
        .get(type_name)
        .map(|bucket| bucket.contains_key(key))
        .unwrap_or(false)
}

pub(crate) fn set(buckets: &Buckets, type_name: &str, key: Value, record: Record) -> Buckets {
    let bucket = buckets
        .get(type_name)
        .cloned()
        .unwrap_or_default()
        .update(key, record);
    buckets.update(type_name.to_string(), bucket)
}

pub(crate) fn remove(buckets: &Buckets, type_name: &str, key: &Value) -> Buckets {
    match buckets.get(type_name) {
        Some(bucket) => {
            let updated = bucket.without(key);
            buckets.update(type_name.to_string(), updated)
        }
        None => buckets.clone(),
    }
}
