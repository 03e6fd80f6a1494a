//! The entity-type facade (§4.3): bundles the three bucket accessors for one
//! type plus the relational helpers and the state classifier. Holds a
//! back-reference to the registry so cascades can reach sibling types
//! (§9 "Registry back-references form a graph").

use std::sync::Arc;

use crate::bucket::current::CurrentAccessor;
use crate::bucket::deleted::DeletedAccessor;
use crate::bucket::initial::InitialAccessor;
use crate::error::{Error, Result};
use crate::foreign_key::ForeignKeyAccessor;
use crate::record::Record;
use crate::registry::Registry;
use crate::store::{self, Bucket, EntityState, Store};
use crate::value::Value;

#[derive(Clone)]
pub struct EntityType {
    registry: Arc<Registry>,
    name: String,
}

impl EntityType {
    pub(crate) fn new(registry: Arc<Registry>, name: String) -> Self {
        EntityType { registry, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Reads the primary key out of `record` at this type's declared key
    /// path. Fails with `MissingKey` if the path is absent or null.
    pub fn key_for(&self, record: &Record) -> Result<Value> {
        match self.key_for_opt(record)? {
            Some(value) => Ok(value),
            None => {
                let typedef = self.registry.typedef(&self.name)?;
                Err(Error::MissingKey {
                    path: typedef.key.clone(),
                })
            }
        }
    }

    /// As `key_for`, but missing or null is `None` rather than an error —
    /// used by `create` to decide whether to auto-allocate a key.
    pub(crate) fn key_for_opt(&self, record: &Record) -> Result<Option<Value>> {
        let typedef = self.registry.typedef(&self.name)?;
        Ok(match record.get_path(&typedef.key) {
            Some(value) if !value.is_null() => Some(value.clone()),
            _ => None,
        })
    }

    /// Normalizes a plain or already-immutable record to the canonical
    /// `Record` form. Idempotent: `Record -> Record` is the identity
    /// conversion.
    pub fn raise(&self, value: impl Into<Record>) -> Record {
        value.into()
    }

    /// Classifies `record` as UNCHANGED, MODIFIED, NEW, or DELETED per §3.
    /// Fails with `UnknownState` if the record's key is absent from both
    /// `initial` and `current` for this type.
    pub fn state(&self, store: &Store, record: &Record) -> Result<EntityState> {
        let pk = self.key_for(record)?;
        self.state_at(store, &pk)
    }

    pub(crate) fn state_at(&self, store: &Store, pk: &Value) -> Result<EntityState> {
        self.registry.typedef(&self.name)?;
        let in_deleted = store::contains(&store.deleted, &self.name, pk);
        let current = store::get(&store.current, &self.name, pk);
        let initial = store::get(&store.initial, &self.name, pk);
        match (current, initial) {
            (None, None) => Err(Error::UnknownState {
                type_name: self.name.clone(),
                key: pk.clone(),
            }),
            (Some(_), None) => Ok(EntityState::New),
            (Some(cur), Some(init)) => {
                if in_deleted {
                    Ok(EntityState::Deleted)
                } else if cur == init {
                    Ok(EntityState::Unchanged)
                } else {
                    Ok(EntityState::Modified)
                }
            }
            (None, Some(_)) => Ok(EntityState::Deleted),
        }
    }

    /// The records of type `rel_name` whose primary key equals `record`'s
    /// foreign key for that relation. Reads from `current`. Zero or more
    /// matches; a dangling or undeclared foreign key yields zero (I5).
    pub fn parents(&self, store: &Store, rel_name: &str, record: &Record) -> Result<Bucket> {
        self.registry.typedef(rel_name)?;
        let typedef = self.registry.typedef(&self.name)?;
        let mut result = Bucket::new();
        let Some(fk_path) = typedef.foreign_key_path(rel_name) else {
            return Ok(result);
        };
        if let Some(fk_value) = record.get_path(fk_path) {
            if !fk_value.is_null() {
                if let Some(parent) = store::get(&store.current, rel_name, fk_value) {
                    result = result.update(fk_value.clone(), parent.clone());
                }
            }
        }
        Ok(result)
    }

    /// The records of type `rel_name` whose foreign key for this type
    /// equals `record`'s primary key. Reads from `current`.
    pub fn children(&self, store: &Store, rel_name: &str, record: &Record) -> Result<Bucket> {
        let pk = self.key_for(record)?;
        self.children_of(store, rel_name, &pk)
    }

    pub(crate) fn children_of(&self, store: &Store, rel_name: &str, pk: &Value) -> Result<Bucket> {
        self.registry.typedef(rel_name)?;
        let typedef = self.registry.typedef(&self.name)?;
        let mut result = Bucket::new();
        let Some(fk_path) = typedef.inverse_foreign_key_path(rel_name) else {
            return Ok(result);
        };
        for (child_pk, child) in store::get_all(&store.current, rel_name).iter() {
            if let Some(fk_value) = child.get_path(fk_path) {
                if fk_value == pk {
                    result = result.update(child_pk.clone(), child.clone());
                }
            }
        }
        Ok(result)
    }

    pub fn initial(&self) -> InitialAccessor {
        InitialAccessor::new(self.clone())
    }

    pub fn current(&self) -> CurrentAccessor {
        CurrentAccessor::new(self.clone())
    }

    pub fn deleted(&self) -> DeletedAccessor {
        DeletedAccessor::new(self.clone())
    }

    pub fn foreign_keys(&self) -> ForeignKeyAccessor {
        ForeignKeyAccessor::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::make_registry;
    use crate::typedef::Typedef;
    use crate::value::path;
    use pretty_assertions::assert_eq;

    use super::*;

    fn account_campaign_registry() -> std::sync::Arc<crate::registry::Registry> {
        make_registry([
            Typedef::new("Account", path(["id"]))
                .with_inverse_foreign_key("Campaign", path(["account_id"])),
            Typedef::new("Campaign", path(["id"]))
                .with_foreign_key("Account", path(["account_id"])),
        ])
    }

    #[test]
    fn state_is_unknown_state_before_any_write() {
        let registry = account_campaign_registry();
        let account = registry.entity_type("Account").unwrap();
        let store = Store::new();
        let record = Record::from(serde_json::json!({ "id": 1 }));
        assert!(matches!(account.state(&store, &record), Err(Error::UnknownState { .. })));
    }

    #[test]
    fn state_is_new_for_a_record_with_no_initial_entry() {
        let registry = account_campaign_registry();
        let account = registry.entity_type("Account").unwrap();
        let store = Store::new();
        let (store, record, _pk) = account.current().create(&store, None).unwrap();
        assert_eq!(account.state(&store, &record).unwrap(), EntityState::New);
    }

    #[test]
    fn state_is_unchanged_then_modified_then_unchanged_again() {
        let registry = account_campaign_registry();
        let account = registry.entity_type("Account").unwrap();
        let store = Store::new();
        let record = Record::from(serde_json::json!({ "id": 1, "name": "A" }));
        let store = account.initial().load(&store, [record]).unwrap();
        assert_eq!(account.state_at(&store, &Value::Int(1)).unwrap(), EntityState::Unchanged);

        let store = account.current().set(&store, Value::Int(1), Record::from(serde_json::json!({ "id": 1, "name": "B" })));
        assert_eq!(account.state_at(&store, &Value::Int(1)).unwrap(), EntityState::Modified);

        let store = account.current().set(&store, Value::Int(1), Record::from(serde_json::json!({ "id": 1, "name": "A" })));
        assert_eq!(account.state_at(&store, &Value::Int(1)).unwrap(), EntityState::Unchanged);
    }

    #[test]
    fn children_of_finds_records_whose_inverse_fk_matches() {
        let registry = account_campaign_registry();
        let account = registry.entity_type("Account").unwrap();
        let campaign = registry.entity_type("Campaign").unwrap();
        let store = Store::new();
        let account_record = Record::from(serde_json::json!({ "id": 1 }));
        let store = account.initial().load(&store, [account_record]).unwrap();
        let campaign_record = Record::from(serde_json::json!({ "id": 2, "account_id": 1 }));
        let store = campaign.initial().load(&store, [campaign_record]).unwrap();
        let unrelated = Record::from(serde_json::json!({ "id": 3, "account_id": 99 }));
        let store = campaign.initial().load(&store, [unrelated]).unwrap();

        let children = account.children_of(&store, "Campaign", &Value::Int(1)).unwrap();
        assert_eq!(children.len(), 1);
        assert!(children.contains_key(&Value::Int(2)));
    }

    #[test]
    fn children_of_an_undeclared_relation_is_empty() {
        let registry = account_campaign_registry();
        let account = registry.entity_type("Account").unwrap();
        let store = Store::new();
        let children = account.children_of(&store, "Campaign", &Value::Int(404)).unwrap();
        assert!(children.is_empty());
    }

    #[test]
    fn parents_with_a_dangling_foreign_key_is_empty() {
        let registry = account_campaign_registry();
        let campaign = registry.entity_type("Campaign").unwrap();
        let store = Store::new();
        let record = Record::from(serde_json::json!({ "id": 2, "account_id": 404 }));
        let parents = campaign.parents(&store, "Account", &record).unwrap();
        assert!(parents.is_empty());
    }
}
