//! The foreign-key accessor (§4.7): reads and writes the foreign-key field
//! on a record given a relation name.

use crate::entity_type::EntityType;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::store::{self, Store};
use crate::value::Value;

pub struct ForeignKeyAccessor {
    entity_type: EntityType,
}

impl ForeignKeyAccessor {
    pub(crate) fn new(entity_type: EntityType) -> Self {
        ForeignKeyAccessor { entity_type }
    }

    /// The value at `foreignKeys[rel_name]` inside `record`. `rel_name` must
    /// name a registered type; if it is registered but this type declares no
    /// foreign key towards it, that's treated the same as the field being
    /// absent (`Ok(None)`), consistent with `parents`/`children_of` treating
    /// an undeclared relation as zero matches rather than an error.
    pub fn get(&self, record: &Record, rel_name: &str) -> Result<Option<Value>> {
        match self.fk_path(rel_name)? {
            Some(path) => Ok(record.get_path(&path).cloned()),
            None => Ok(None),
        }
    }

    /// Builds a new record with the foreign-key path for `rel_name`
    /// overwritten to `value`, writes it into `current` under the record's
    /// own primary key, and returns both the new store and the new record
    /// for callers chaining this into a cascade.
    pub fn set(
        &self,
        store: &Store,
        rel_name: &str,
        record: &Record,
        value: Value,
    ) -> Result<(Store, Record)> {
        let path = self.fk_path(rel_name)?.ok_or_else(|| Error::NoForeignKey {
            type_name: self.entity_type.name().to_string(),
            related: rel_name.to_string(),
        })?;
        let updated = record.set_path(&path, value)?;
        let pk = self.entity_type.key_for(&updated)?;
        let new_current = store::set(&store.current, self.entity_type.name(), pk, updated.clone());
        let new_store = Store {
            current: new_current,
            ..store.clone()
        };
        Ok((new_store, updated))
    }

    /// Validates that `rel_name` is a genuinely registered type (the only
    /// case that's a real `UnregisteredType`), then returns this type's
    /// declared foreign-key path towards it, or `None` if no such relation
    /// was declared on this typedef.
    fn fk_path(&self, rel_name: &str) -> Result<Option<Vec<String>>> {
        self.entity_type.registry().typedef(rel_name)?;
        let typedef = self.entity_type.registry().typedef(self.entity_type.name())?;
        Ok(typedef.foreign_key_path(rel_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::make_registry;
    use crate::store::Store;
    use crate::typedef::Typedef;
    use crate::value::path;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn get_reads_the_declared_foreign_key_field() {
        let registry = make_registry([
            Typedef::new("Account", path(["id"])),
            Typedef::new("Campaign", path(["id"])).with_foreign_key("Account", path(["account_id"])),
        ]);
        let campaign = registry.entity_type("Campaign").unwrap();
        let record = Record::from(serde_json::json!({ "id": 2, "account_id": 1 }));
        assert_eq!(campaign.foreign_keys().get(&record, "Account").unwrap(), Some(Value::Int(1)));
    }

    #[test]
    fn get_for_an_unregistered_type_is_an_error() {
        let registry = make_registry([Typedef::new("Campaign", path(["id"]))]);
        let campaign = registry.entity_type("Campaign").unwrap();
        let record = Record::from(serde_json::json!({ "id": 2 }));
        assert!(matches!(campaign.foreign_keys().get(&record, "Account"), Err(Error::UnregisteredType { .. })));
    }

    #[test]
    fn get_for_a_registered_but_undeclared_relation_is_none_not_an_error() {
        let registry = make_registry([
            Typedef::new("Account", path(["id"])),
            Typedef::new("Campaign", path(["id"])),
        ]);
        let campaign = registry.entity_type("Campaign").unwrap();
        let record = Record::from(serde_json::json!({ "id": 2 }));
        assert_eq!(campaign.foreign_keys().get(&record, "Account").unwrap(), None);
    }

    #[test]
    fn set_for_a_registered_but_undeclared_relation_is_a_no_foreign_key_error() {
        let registry = make_registry([
            Typedef::new("Account", path(["id"])),
            Typedef::new("Campaign", path(["id"])),
        ]);
        let campaign = registry.entity_type("Campaign").unwrap();
        let record = Record::from(serde_json::json!({ "id": 2 }));
        assert!(matches!(
            campaign.foreign_keys().set(&Store::new(), "Account", &record, Value::Int(1)),
            Err(Error::NoForeignKey { .. })
        ));
    }

    #[test]
    fn set_rewrites_the_field_and_writes_current_under_the_record_key() {
        let registry = make_registry([
            Typedef::new("Account", path(["id"])),
            Typedef::new("Campaign", path(["id"])).with_foreign_key("Account", path(["account_id"])),
        ]);
        let campaign = registry.entity_type("Campaign").unwrap();
        let record = Record::from(serde_json::json!({ "id": 2, "account_id": 1 }));
        let (store, updated) = campaign.foreign_keys().set(&Store::new(), "Account", &record, Value::Int(5)).unwrap();
        assert_eq!(updated.get("account_id"), Some(&Value::Int(5)));
        assert_eq!(campaign.current().get(&store, &Value::Int(2)), Some(&updated));
    }
}
