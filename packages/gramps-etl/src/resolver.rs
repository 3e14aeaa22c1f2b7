//! Handle ⇄ id resolver maps.
//!
//! Gramps cross-references entities by `handle`, a file-local identifier.
//! Native records reference each other by the stable public `id`. A
//! [`ReferenceMap`] is built once per conversion run, before any
//! translation, and is read-only afterwards.

use std::collections::HashMap;

use roxmltree::Document;

use crate::error::{EtlError, Result};
use crate::xml::describe_element;

/// Which way a map translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Import: `hlink` → `id`.
    HandleToId,
    /// Export: `id` → `hlink`.
    IdToHandle,
}

impl Direction {
    fn key_name(self) -> &'static str {
        match self {
            Self::HandleToId => "handle",
            Self::IdToHandle => "id",
        }
    }

    fn value_name(self) -> &'static str {
        match self {
            Self::HandleToId => "id",
            Self::IdToHandle => "handle",
        }
    }

    fn inverse(self) -> Self {
        match self {
            Self::HandleToId => Self::IdToHandle,
            Self::IdToHandle => Self::HandleToId,
        }
    }
}

/// A one-directional handle/id lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMap {
    direction: Direction,
    entries: HashMap<String, String>,
}

impl ReferenceMap {
    /// Create an empty map.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            entries: HashMap::new(),
        }
    }

    /// Build `handle → id` from every element in the document that carries
    /// a `handle` attribute.
    ///
    /// Elements with a handle but no id are skipped with a warning; a later
    /// reference to them fails as unresolvable. On duplicate handles the
    /// first mapping wins.
    #[must_use]
    pub fn from_document(doc: &Document<'_>) -> Self {
        let mut map = Self::new(Direction::HandleToId);

        for node in doc.descendants().filter(|n| n.is_element()) {
            let Some(handle) = node.attribute("handle") else {
                continue;
            };
            let Some(id) = node.attribute("id") else {
                tracing::warn!(element = %describe_element(node), "element has a handle but no id");
                continue;
            };
            map.insert(handle, id);
        }

        tracing::debug!(count = map.len(), "built handle to id map");
        map
    }

    /// Build `id → handle` from `(id, handle)` pairs, as enumerated by a store.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new(Direction::IdToHandle);
        for (id, handle) in pairs {
            map.insert(id, handle);
        }
        map
    }

    /// Convenience constructor for an import-direction map.
    #[must_use]
    pub fn handles_to_ids<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new(Direction::HandleToId);
        for (handle, id) in pairs {
            map.insert(handle, id);
        }
        map
    }

    /// Convenience constructor for an export-direction map.
    #[must_use]
    pub fn ids_to_handles<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_pairs(pairs)
    }

    fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.entries.get(&key) {
            if *existing != value {
                tracing::warn!(
                    key = %key,
                    kept = %existing,
                    ignored = %value,
                    "duplicate {} in reference map",
                    self.direction.key_name()
                );
            }
            return;
        }
        self.entries.insert(key, value);
    }

    /// The map translating the other way.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut map = Self::new(self.direction.inverse());
        for (key, value) in &self.entries {
            map.insert(value.clone(), key.clone());
        }
        map
    }

    /// Look up a key; a missing mapping is an error.
    pub fn resolve(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| EtlError::UnresolvedReference {
                from: self.direction.key_name(),
                to: self.direction.value_name(),
                key: key.to_string(),
            })
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_document_collects_all_handles() {
        let xml = r#"<database xmlns="http://gramps-project.org/xml/1.7.1/">
            <people><person handle="_p1" id="I0001"/></people>
            <places><placeobj handle="_pl1" id="P0001"/></places>
        </database>"#;
        let doc = Document::parse(xml).unwrap();

        let map = ReferenceMap::from_document(&doc);

        assert_eq!(map.direction(), Direction::HandleToId);
        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("_p1").unwrap(), "I0001");
        assert_eq!(map.resolve("_pl1").unwrap(), "P0001");
    }

    #[test]
    fn test_from_document_skips_handle_without_id() {
        let xml = r#"<people><person handle="_p1"/><person handle="_p2" id="I2"/></people>"#;
        let doc = Document::parse(xml).unwrap();

        let map = ReferenceMap::from_document(&doc);

        assert_eq!(map.len(), 1);
        assert!(map.resolve("_p1").is_err());
    }

    #[test]
    fn test_duplicate_handle_keeps_first() {
        let map = ReferenceMap::handles_to_ids([("h1", "A"), ("h1", "B")]);
        assert_eq!(map.resolve("h1").unwrap(), "A");
    }

    #[test]
    fn test_inverse() {
        let map = ReferenceMap::handles_to_ids([("h1", "P001")]);
        let inverse = map.inverse();

        assert_eq!(inverse.direction(), Direction::IdToHandle);
        assert_eq!(inverse.resolve("P001").unwrap(), "h1");
    }

    #[test]
    fn test_missing_mapping_is_an_error() {
        let map = ReferenceMap::from_pairs([("P001", "h1")]);
        let err = map.resolve("P999").unwrap_err();
        assert_eq!(err.to_string(), "No handle known for id 'P999'");
    }
}
