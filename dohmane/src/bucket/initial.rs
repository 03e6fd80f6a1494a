//! The initial-bucket accessor (§4.4): the persisted baseline.

use crate::entity_type::EntityType;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::store::{self, Bucket, Store};
use crate::value::Value;

pub struct InitialAccessor {
    entity_type: EntityType,
}

impl InitialAccessor {
    pub(crate) fn new(entity_type: EntityType) -> Self {
        InitialAccessor { entity_type }
    }

    pub fn get<'a>(&self, store: &'a Store, pk: &Value) -> Option<&'a Record> {
        store::get(&store.initial, self.entity_type.name(), pk)
    }

    pub fn get_all(&self, store: &Store) -> Bucket {
        store::get_all(&store.initial, self.entity_type.name())
    }

    /// Writes `record` as the baseline for `pk`. This is how externally
    /// obtained data tells the store "this is now the last accepted
    /// value" — so any pending edit on the current side for the same key is
    /// discarded by delegating to `current.reject`.
    pub fn set(&self, store: &Store, pk: Value, record: Record) -> Result<Store> {
        let new_initial = store::set(&store.initial, self.entity_type.name(), pk.clone(), record);
        let written = Store {
            initial: new_initial,
            ..store.clone()
        };
        self.entity_type.current().reject(&written, &pk)
    }

    /// Raises each record, reads its primary key (failing with
    /// `MissingKey` if absent or null), and applies `set`. After `load`,
    /// every loaded record has matching `initial`/`current` values and no
    /// deleted mark — this is how externally-obtained data enters the
    /// store.
    pub fn load(&self, store: &Store, records: impl IntoIterator<Item = Record>) -> Result<Store> {
        let mut working = store.clone();
        for record in records {
            let record = self.entity_type.raise(record);
            let pk = match self.entity_type.key_for_opt(&record)? {
                Some(pk) => pk,
                None => {
                    let typedef = self.entity_type.registry().typedef(self.entity_type.name())?;
                    return Err(Error::MissingKey {
                        path: typedef.key.clone(),
                    });
                }
            };
            working = self.set(&working, pk, record)?;
        }
        Ok(working)
    }
}
