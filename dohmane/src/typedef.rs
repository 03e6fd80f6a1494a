//! Static, per entity-type descriptors (§3 "Typedef"). Built once and
//! handed to [`crate::registry::make_registry`]; the registry is immutable
//! after that (§4.2).

use crate::value::Path;

/// One declared relation: the related type's name, and the path locating
/// the relevant foreign key.
pub type Relation = (String, Path);

/// The declarative description of one entity type.
#[derive(Clone, Debug)]
pub struct Typedef {
    pub name: String,

    /// Path locating the primary key inside a record of this type.
    pub key: Path,

    /// For each related type, the path on *this* type's records holding the
    /// foreign key pointing at that type.
    ///
    /// Kept as an ordered list rather than a map: §5 requires cascades to
    /// traverse relations in a deterministic order, and a typedef's
    /// declaration order is the most natural deterministic order to use.
    pub foreign_keys: Vec<Relation>,

    /// For each related type, the path on *that* type's records holding the
    /// foreign key pointing back at this type (so children can be found
    /// from a parent).
    pub inverse_foreign_keys: Vec<Relation>,
}

impl Typedef {
    pub fn new(name: impl Into<String>, key: Path) -> Self {
        Typedef {
            name: name.into(),
            key,
            foreign_keys: Vec::new(),
            inverse_foreign_keys: Vec::new(),
        }
    }

    /// Declares that records of this type point at `related` via `path`.
    pub fn with_foreign_key(mut self, related: impl Into<String>, path: Path) -> Self {
        self.foreign_keys.push((related.into(), path));
        self
    }

    /// Declares that records of `related` point back at this type via
    /// `path` on *their* own records.
    pub fn with_inverse_foreign_key(mut self, related: impl Into<String>, path: Path) -> Self {
        self.inverse_foreign_keys.push((related.into(), path));
        self
    }

    pub fn foreign_key_path(&self, related: &str) -> Option<&Path> {
        self.foreign_keys
            .iter()
            .find(|(name, _)| name == related)
            .map(|(_, path)| path)
    }

    pub fn inverse_foreign_key_path(&self, related: &str) -> Option<&Path> {
        self.inverse_foreign_keys
            .iter()
            .find(|(name, _)| name == related)
            .map(|(_, path)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::path;

    #[test]
    fn undeclared_relation_is_absent() {
        let typedef = Typedef::new("Campaign", path(["id"]));
        assert_eq!(typedef.foreign_key_path("Account"), None);
        assert_eq!(typedef.inverse_foreign_key_path("Ad"), None);
    }

    #[test]
    fn declared_relations_keep_declaration_order() {
        let typedef = Typedef::new("Campaign", path(["id"]))
            .with_foreign_key("Account", path(["account_id"]))
            .with_inverse_foreign_key("Ad", path(["campaign_id"]))
            .with_inverse_foreign_key("Creative", path(["campaign_id"]));

        assert_eq!(typedef.foreign_key_path("Account"), Some(&path(["account_id"])));
        let names: Vec<_> = typedef.inverse_foreign_keys.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Ad", "Creative"]);
    }
}
