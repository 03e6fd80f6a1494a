//! `dohmane` is an in-memory, relational, change-tracking record store.
//!
//! Every record has an *initial* value (the last value accepted from
//! outside the store) and a *current* value (what a caller is actively
//! editing), plus an optional *deleted* tombstone pending confirmation.
//! Typedefs declare a primary-key path and foreign-key relations between
//! types; accepting a primary-key change or a deletion cascades through
//! those relations automatically.
//!
//! The store is a plain value: every operation takes a [`store::Store`] by
//! reference and returns a new one, built with structural sharing (`im`'s
//! persistent maps) so cloning and branching a store is cheap.
//!
//! ## Getting started
//!
//! ```rust
//! use dohmane::prelude::*;
//!
//! let registry = make_registry([
//!     Typedef::new("Account", path(["id"]))
//!         .with_inverse_foreign_key("Campaign", path(["account_id"])),
//!     Typedef::new("Campaign", path(["id"]))
//!         .with_foreign_key("Account", path(["account_id"])),
//! ]);
//!
//! let account = registry.entity_type("Account").unwrap();
//! let campaign = registry.entity_type("Campaign").unwrap();
//!
//! let store = Store::new();
//! let (store, _record, account_pk) = account.current().create(&store, None).unwrap();
//! let (store, _record, _campaign_pk) = campaign
//!     .current()
//!     .create(&store, Some(Record::from(serde_json::json!({ "account_id": account_pk.as_int() }))))
//!     .unwrap();
//!
//! let server_record = Record::from(serde_json::json!({ "id": 5 }));
//! let store = account.current().accept(&store, &account_pk, server_record).unwrap();
//!
//! assert_eq!(account.current().get_all(&store).len(), 1);
//! ```

pub mod bucket;
pub mod entity_type;
pub mod error;
pub mod foreign_key;
pub mod record;
pub mod registry;
pub mod store;
pub mod typedef;
pub mod value;

/// The surface most consumers need: the store, the registry factory,
/// typedefs, records, values, and the path-building helper.
pub mod prelude {
    pub use crate::entity_type::EntityType;
    pub use crate::error::{Error, Result};
    pub use crate::record::Record;
    pub use crate::registry::{make_registry, Registry};
    pub use crate::store::{EntityState, Store};
    pub use crate::typedef::Typedef;
    pub use crate::value::{path, Value};
}
