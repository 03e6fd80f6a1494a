//! The type registry (§4.2, §4.6 in the design notes). Built once from a
//! mapping of typedef name to typedef; entity-type facades are handed out
//! lazily but always resolve against the same immutable typedef set.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entity_type::EntityType;
use crate::error::{Error, Result};
use crate::typedef::Typedef;

/// The static, shared set of typedefs. Cascades dispatch to sibling types by
/// name through this registry rather than by direct reference, which is how
/// a value-oriented language sidesteps the reference cycle a facade graph
/// would otherwise need (§9).
#[derive(Debug)]
pub struct Registry {
    typedefs: HashMap<String, Typedef>,
}

impl Registry {
    pub(crate) fn typedef(&self, type_name: &str) -> Result<&Typedef> {
        self.typedefs.get(type_name).ok_or_else(|| Error::UnregisteredType {
            type_name: type_name.to_string(),
        })
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.typedefs.keys().map(String::as_str)
    }

    /// The entity-type facade for `type_name`. Fails with `UnregisteredType`
    /// if no typedef was given that name at construction.
    pub fn entity_type(self: &Arc<Self>, type_name: &str) -> Result<EntityType> {
        self.typedef(type_name)?;
        Ok(EntityType::new(Arc::clone(self), type_name.to_string()))
    }
}

/// Instantiates a registry from a set of typedefs (§4.2). No runtime
/// registration of new types after this: the returned `Registry` is final.
pub fn make_registry(typedefs: impl IntoIterator<Item = Typedef>) -> Arc<Registry> {
    let typedefs = typedefs.into_iter().map(|t| (t.name.clone(), t)).collect();
    Arc::new(Registry { typedefs })
}
