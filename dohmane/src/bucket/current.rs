//! The current-bucket accessor (§4.5): what the user is editing.

use crate::entity_type::EntityType;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::store::{self, Bucket, Store};
use crate::value::{Fields, Value};

pub struct CurrentAccessor {
    entity_type: EntityType,
}

impl CurrentAccessor {
    pub(crate) fn new(entity_type: EntityType) -> Self {
        CurrentAccessor { entity_type }
    }

    pub fn get<'a>(&self, store: &'a Store, pk: &Value) -> Option<&'a Record> {
        store::get(&store.current, self.entity_type.name(), pk)
    }

    pub fn set(&self, store: &Store, pk: Value, record: Record) -> Store {
        let new_current = store::set(&store.current, self.entity_type.name(), pk, record);
        Store {
            current: new_current,
            ..store.clone()
        }
    }

    pub fn get_all(&self, store: &Store) -> Bucket {
        store::get_all(&store.current, self.entity_type.name())
    }

    /// Raises `record` (or an empty record if omitted). If it lacks a
    /// primary key at the typedef's key path, allocates one from
    /// `next_key` and embeds it. Writes only to `current`, never `initial`.
    pub fn create(&self, store: &Store, record: Option<Record>) -> Result<(Store, Record, Value)> {
        let record = self.entity_type.raise(record.unwrap_or_else(Record::empty));
        let (record, pk, next_key) = match self.entity_type.key_for_opt(&record)? {
            Some(pk) => (record, pk, store.next_key),
            None => {
                let typedef = self.entity_type.registry().typedef(self.entity_type.name())?;
                let pk = Value::Int(store.next_key);
                let record = record.set_path(&typedef.key, pk.clone())?;
                (record, pk, store.next_key - 1)
            }
        };
        let new_current = store::set(&store.current, self.entity_type.name(), pk.clone(), record.clone());
        let new_store = Store {
            current: new_current,
            next_key,
            ..store.clone()
        };
        Ok((new_store, record, pk))
    }

    /// Current records whose primary key has no `initial` entry.
    pub fn get_all_new(&self, store: &Store) -> Bucket {
        let current = store::get_all(&store.current, self.entity_type.name());
        let initial = store::get_all(&store.initial, self.entity_type.name());
        current
            .into_iter()
            .filter(|(pk, _)| !initial.contains_key(pk))
            .collect()
    }

    /// Current records that have an `initial` entry, differ from it, and
    /// are not in `deleted`.
    pub fn get_all_changed(&self, store: &Store) -> Bucket {
        let current = store::get_all(&store.current, self.entity_type.name());
        let initial = store::get_all(&store.initial, self.entity_type.name());
        let deleted = store::get_all(&store.deleted, self.entity_type.name());
        current
            .into_iter()
            .filter(|(pk, record)| match initial.get(pk) {
                Some(init) => record != init && !deleted.contains_key(pk),
                None => false,
            })
            .collect()
    }

    /// The subset of the current record's fields whose values differ from
    /// the initial record's fields. With no baseline, the whole current
    /// record counts as changed.
    pub fn get_changed_properties(&self, store: &Store, pk: &Value) -> Result<Fields> {
        let current = self.get(store, pk).ok_or_else(|| Error::UnknownState {
            type_name: self.entity_type.name().to_string(),
            key: pk.clone(),
        })?;
        match store::get(&store.initial, self.entity_type.name(), pk) {
            None => Ok(current.fields().clone()),
            Some(initial) => {
                let mut changed = Fields::new();
                for (field, value) in current.fields().iter() {
                    let unchanged = initial.get(field).map(|iv| iv == value).unwrap_or(false);
                    if !unchanged {
                        changed = changed.update(field.clone(), value.clone());
                    }
                }
                Ok(changed)
            }
        }
    }

    /// `record_key` is the old primary key (possibly a local, negative,
    /// auto-allocated one); `new_record` carries the authoritative value,
    /// possibly under a new primary key. If the key changes, every child
    /// along every inverse-FK relation has its foreign key rewritten before
    /// the old key is dropped (§4.5, I6).
    pub fn accept(&self, store: &Store, record_key: &Value, new_record: Record) -> Result<Store> {
        let new_record = self.entity_type.raise(new_record);
        let new_pk = self.entity_type.key_for(&new_record)?;

        let mut working = store.clone();

        if &new_pk != record_key {
            log::debug!(
                "{}: accept remaps {:?} -> {:?}, cascading to children",
                self.entity_type.name(),
                record_key,
                new_pk
            );
            let typedef = self.entity_type.registry().typedef(self.entity_type.name())?;
            for (rel_name, _fk_path) in typedef.inverse_foreign_keys.clone() {
                let children = self.entity_type.children_of(&working, &rel_name, record_key)?;
                log::trace!("{}: rewriting {} child(ren) of relation {rel_name}", self.entity_type.name(), children.len());
                let related = self.entity_type.registry().entity_type(&rel_name)?;
                let fk = related.foreign_keys();
                for (_, child) in children.iter() {
                    let (next_store, _) =
                        fk.set(&working, self.entity_type.name(), child, new_pk.clone())?;
                    working = next_store;
                }
            }
            let new_current = store::remove(&working.current, self.entity_type.name(), record_key);
            working = Store {
                current: new_current,
                ..working
            };
        }

        self.entity_type.initial().set(&working, new_pk, new_record)
    }

    /// Discards a pending change and returns to the last accepted state (or
    /// removes the record if it was never accepted). Does not cascade —
    /// rejection is a local rollback.
    pub fn reject(&self, store: &Store, pk: &Value) -> Result<Store> {
        match store::get(&store.initial, self.entity_type.name(), pk).cloned() {
            Some(initial_record) => {
                let working = self.entity_type.deleted().reject(store, pk)?;
                let new_current =
                    store::set(&working.current, self.entity_type.name(), pk.clone(), initial_record);
                Ok(Store {
                    current: new_current,
                    ..working
                })
            }
            None => {
                let new_current = store::remove(&store.current, self.entity_type.name(), pk);
                Ok(Store {
                    current: new_current,
                    ..store.clone()
                })
            }
        }
    }

    /// Cascades first into every child along every inverse-FK relation,
    /// then either tombstones this record (if it has a baseline, leaving it
    /// visible in `current` too) or removes it outright.
    pub fn delete(&self, store: &Store, pk: &Value) -> Result<Store> {
        log::debug!("{}: deleting {:?}, cascading to children first", self.entity_type.name(), pk);
        let typedef = self.entity_type.registry().typedef(self.entity_type.name())?;
        let mut working = store.clone();
        for (rel_name, _fk_path) in typedef.inverse_foreign_keys.clone() {
            let children = self.entity_type.children_of(&working, &rel_name, pk)?;
            let related_current = self.entity_type.registry().entity_type(&rel_name)?.current();
            for (child_pk, _child) in children.iter() {
                working = related_current.delete(&working, child_pk)?;
            }
        }

        if store::contains(&working.initial, self.entity_type.name(), pk) {
            if let Some(current_value) = store::get(&working.current, self.entity_type.name(), pk).cloned() {
                let new_deleted =
                    store::set(&working.deleted, self.entity_type.name(), pk.clone(), current_value);
                working = Store {
                    deleted: new_deleted,
                    ..working
                };
            }
        } else {
            let new_current = store::remove(&working.current, self.entity_type.name(), pk);
            working = Store {
                current: new_current,
                ..working
            };
        }
        Ok(working)
    }
}
