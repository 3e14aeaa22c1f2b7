//! In-memory store.

use super::{Dataset, Store};
use crate::entity::EntityKind;
use crate::error::Result;
use crate::value::{Record, Value};

/// Store holding everything in memory. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    committed: Dataset,
    pending: Vec<(EntityKind, String, Record)>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with already committed data.
    #[must_use]
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            committed: dataset,
            pending: Vec::new(),
        }
    }

    /// Committed data.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.committed
    }

    /// Number of staged, uncommitted records.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Committed record by kind and primary key.
    #[must_use]
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<&Record> {
        self.committed.get(kind.plural())?.get(id)
    }
}

impl Store for MemoryStore {
    fn upsert(&mut self, kind: EntityKind, id: &str, record: Record) -> Result<()> {
        self.pending.push((kind, id.to_string(), record));
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        for (kind, id, record) in self.pending.drain(..) {
            self.committed
                .entry(kind.plural().to_string())
                .or_default()
                .insert(id, record);
        }
        Ok(())
    }

    fn records(&self, kind: EntityKind) -> Vec<(&str, &Record)> {
        self.committed
            .get(kind.plural())
            .map(|records| {
                records
                    .iter()
                    .map(|(id, record)| (id.as_str(), record))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn id_handle_pairs(&self) -> Vec<(String, String)> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| kind.has_handle())
            .flat_map(|kind| self.records(kind))
            .filter_map(|(id, record)| match record.get("handle") {
                Some(Value::String(handle)) => Some((id.to_string(), handle.clone())),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_upsert_is_invisible_until_commit() {
        let mut store = MemoryStore::new();
        store
            .upsert(EntityKind::Person, "I0001", record! { "id" => "I0001" })
            .unwrap();

        assert!(store.records(EntityKind::Person).is_empty());
        assert_eq!(store.pending_count(), 1);

        store.commit().unwrap();

        assert_eq!(store.records(EntityKind::Person).len(), 1);
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_upsert_replaces() {
        let mut store = MemoryStore::new();
        store
            .upsert(EntityKind::Note, "N1", record! { "id" => "N1", "text" => "old" })
            .unwrap();
        store
            .upsert(EntityKind::Note, "N1", record! { "id" => "N1", "text" => "new" })
            .unwrap();
        store.commit().unwrap();

        let note = store.get(EntityKind::Note, "N1").unwrap();
        assert_eq!(note.get("text"), Some(&Value::from("new")));
    }

    #[test]
    fn test_id_handle_pairs() {
        let mut store = MemoryStore::new();
        store
            .upsert(EntityKind::Person, "I1", record! { "id" => "I1", "handle" => "_a" })
            .unwrap();
        store
            .upsert(EntityKind::Place, "P1", record! { "id" => "P1", "handle" => "_b" })
            .unwrap();
        store
            .upsert(EntityKind::Event, "E1", record! { "id" => "E1" })
            .unwrap();
        store.commit().unwrap();

        assert_eq!(
            store.id_handle_pairs(),
            vec![
                ("I1".to_string(), "_a".to_string()),
                ("P1".to_string(), "_b".to_string()),
            ]
        );
    }
}
