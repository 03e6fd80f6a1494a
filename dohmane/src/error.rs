//! Error kinds surfaced to callers (§7). The store never retries and never
//! leaves a partially-mutated store behind: every accessor either returns a
//! new `Store` or fails and the caller keeps the one it already had.

use std::fmt;

use crate::value::{Path, Value};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// `state()` was called on a record absent from both `current` and
    /// `initial` for its type (§4.3, §7).
    UnknownState { type_name: String, key: Value },

    /// An operation referenced a type name the registry has no typedef for.
    UnregisteredType { type_name: String },

    /// `load` received a record whose value at the key path was absent or
    /// null, or a path traversal otherwise failed to resolve (§7).
    MissingKey { path: Path },

    /// The foreign-key accessor was asked to read or write a relation that
    /// is registered (unlike `UnregisteredType`) but that this type's
    /// typedef simply never declared a foreign key towards (§4.7).
    NoForeignKey { type_name: String, related: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownState { type_name, key } => {
                write!(f, "unknown state for {type_name}[{key:?}]: not present in initial or current")
            }
            Error::UnregisteredType { type_name } => {
                write!(f, "unregistered type: {type_name}")
            }
            Error::MissingKey { path } => {
                write!(f, "missing key at path {}", path.join("."))
            }
            Error::NoForeignKey { type_name, related } => {
                write!(f, "{type_name} declares no foreign key towards {related}")
            }
        }
    }
}

impl std::error::Error for Error {}
