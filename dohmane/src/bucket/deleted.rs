//! The deleted-bucket accessor (§4.6): records pending a confirmed delete.

use crate::entity_type::EntityType;
use crate::error::Result;
use crate::record::Record;
use crate::store::{self, Bucket, Store};
use crate::value::Value;

pub struct DeletedAccessor {
    entity_type: EntityType,
}

impl DeletedAccessor {
    pub(crate) fn new(entity_type: EntityType) -> Self {
        DeletedAccessor { entity_type }
    }

    pub fn get<'a>(&self, store: &'a Store, pk: &Value) -> Option<&'a Record> {
        store::get(&store.deleted, self.entity_type.name(), pk)
    }

    pub fn set(&self, store: &Store, pk: Value, record: Record) -> Store {
        let new_deleted = store::set(&store.deleted, self.entity_type.name(), pk, record);
        Store {
            deleted: new_deleted,
            ..store.clone()
        }
    }

    pub fn get_all(&self, store: &Store) -> Bucket {
        store::get_all(&store.deleted, self.entity_type.name())
    }

    /// The deletion has been confirmed. Cascades first: every child along
    /// every inverse-FK relation is recursively accepted for deletion.
    /// Then the record is scrubbed from all three buckets for this type —
    /// after this call, no trace of it remains (I6).
    pub fn accept(&self, store: &Store, pk: &Value) -> Result<Store> {
        let typedef = self.entity_type.registry().typedef(self.entity_type.name())?;
        let mut working = store.clone();
        for (rel_name, _fk_path) in typedef.inverse_foreign_keys.clone() {
            let children = self.entity_type.children_of(&working, &rel_name, pk)?;
            let related_deleted = self.entity_type.registry().entity_type(&rel_name)?.deleted();
            for (child_pk, _child) in children.iter() {
                working = related_deleted.accept(&working, child_pk)?;
            }
        }

        let new_initial = store::remove(&working.initial, self.entity_type.name(), pk);
        let new_current = store::remove(&working.current, self.entity_type.name(), pk);
        let new_deleted = store::remove(&working.deleted, self.entity_type.name(), pk);
        Ok(Store {
            initial: new_initial,
            current: new_current,
            deleted: new_deleted,
            ..working
        })
    }

    /// Removes the record from `deleted` only. The current value, left in
    /// place by `current.delete`, is untouched. Invoked by `current.reject`
    /// as part of its recovery path.
    pub fn reject(&self, store: &Store, pk: &Value) -> Result<Store> {
        let new_deleted = store::remove(&store.deleted, self.entity_type.name(), pk);
        Ok(Store {
            deleted: new_deleted,
            ..store.clone()
        })
    }
}
