//! Gramps entity kinds and their XML/native names.

use std::fmt;

/// A top-level Gramps entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Person,
    Family,
    Event,
    Source,
    Place,
    MediaObject,
    Repository,
    Note,
    Citation,
    Bookmark,
    NameMap,
    NameFormat,
}

impl EntityKind {
    /// All kinds in the order groups appear in a Gramps XML file.
    pub const ALL: [EntityKind; 12] = [
        Self::Person,
        Self::Family,
        Self::Event,
        Self::Source,
        Self::Place,
        Self::MediaObject,
        Self::Repository,
        Self::Note,
        Self::Citation,
        Self::Bookmark,
        Self::NameMap,
        Self::NameFormat,
    ];

    /// Tag of the group element, e.g. `people`.
    #[must_use]
    pub fn group_tag(self) -> &'static str {
        match self {
            Self::Person => "people",
            Self::Family => "families",
            Self::Event => "events",
            Self::Source => "sources",
            Self::Place => "places",
            Self::MediaObject => "objects",
            Self::Repository => "repositories",
            Self::Note => "notes",
            Self::Citation => "citations",
            Self::Bookmark => "bookmarks",
            Self::NameMap => "namemaps",
            Self::NameFormat => "name-formats",
        }
    }

    /// Tag of a single item, e.g. `person`.
    #[must_use]
    pub fn item_tag(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Family => "family",
            Self::Event => "event",
            Self::Source => "source",
            Self::Place => "placeobj",
            Self::MediaObject => "object",
            Self::Repository => "repository",
            Self::Note => "note",
            Self::Citation => "citation",
            Self::Bookmark => "bookmark",
            Self::NameMap => "map",
            Self::NameFormat => "format",
        }
    }

    /// Native entity-type name. Matches the XML group tag.
    #[must_use]
    pub fn plural(self) -> &'static str {
        self.group_tag()
    }

    /// Record key identifying an entity of this kind.
    #[must_use]
    pub fn primary_key(self) -> &'static str {
        match self {
            Self::NameMap => "key",
            Self::NameFormat => "number",
            _ => "id",
        }
    }

    /// Whether entities of this kind carry a Gramps handle.
    #[must_use]
    pub fn has_handle(self) -> bool {
        !matches!(self, Self::Bookmark | Self::NameMap | Self::NameFormat)
    }

    /// Look up a kind by its native name.
    #[must_use]
    pub fn from_plural(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.plural() == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}
