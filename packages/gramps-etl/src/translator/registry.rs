//! Registry mapping entity kinds to their top-level translators.

use std::collections::HashMap;
use std::sync::Arc;

use super::entities;
use super::spec::TagSpec;
use crate::entity::EntityKind;

/// Registry of entity translators.
#[derive(Debug, Clone, Default)]
pub struct TranslatorRegistry {
    specs: HashMap<EntityKind, Arc<TagSpec>>,
}

impl TranslatorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the translator for an entity kind, replacing any previous one.
    pub fn register(&mut self, kind: EntityKind, spec: TagSpec) {
        self.specs.insert(kind, spec.into_shared());
    }

    /// Get the translator for an entity kind.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<&Arc<TagSpec>> {
        self.specs.get(&kind)
    }

    /// Registered kinds in canonical group order.
    #[must_use]
    pub fn kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| self.specs.contains_key(kind))
            .collect()
    }
}

/// Create a registry with translators for every Gramps XML 1.7.1 entity.
#[must_use]
pub fn create_gramps_registry() -> TranslatorRegistry {
    let mut registry = TranslatorRegistry::new();

    registry.register(EntityKind::Person, entities::person());
    registry.register(EntityKind::Family, entities::family());
    registry.register(EntityKind::Event, entities::event());
    registry.register(EntityKind::Source, entities::source());
    registry.register(EntityKind::Place, entities::place());
    registry.register(EntityKind::MediaObject, entities::media_object());
    registry.register(EntityKind::Repository, entities::repository());
    registry.register(EntityKind::Note, entities::note());
    registry.register(EntityKind::Citation, entities::citation());

    // Keyed records without handles
    registry.register(EntityKind::Bookmark, entities::bookmark());
    registry.register(EntityKind::NameMap, entities::name_map());
    registry.register(EntityKind::NameFormat, entities::name_format());

    registry
}
