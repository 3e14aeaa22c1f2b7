//! Storage collaborators for native records.
//!
//! Upserts are buffered and only become visible after [`Store::commit`], so a
//! failed import never leaves partial data behind.

mod memory;
mod yaml;

use std::collections::BTreeMap;

pub use memory::MemoryStore;
pub use yaml::YamlStore;

use crate::entity::EntityKind;
use crate::error::Result;
use crate::value::Record;

/// Native record boundary: entity-type name → primary key → record.
pub type Dataset = BTreeMap<String, BTreeMap<String, Record>>;

/// A backing store for translated entities.
pub trait Store {
    /// Stage a record for insertion or replacement.
    fn upsert(&mut self, kind: EntityKind, id: &str, record: Record) -> Result<()>;

    /// Make all staged records visible (and durable, for persistent stores).
    fn commit(&mut self) -> Result<()>;

    /// Committed records of one kind, ordered by primary key.
    fn records(&self, kind: EntityKind) -> Vec<(&str, &Record)>;

    /// `(id, handle)` pairs of every committed record that has a handle.
    fn id_handle_pairs(&self) -> Vec<(String, String)>;
}
