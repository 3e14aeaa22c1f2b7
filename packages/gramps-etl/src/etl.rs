//! Import and export pipeline.
//!
//! Import runs in three stages. `extract` reads a plain or gzipped file.
//! `transform` builds the handle map and translates every entity. `load`
//! upserts the results into a store. Nothing is committed unless every
//! entity translated and validated.
//!
//! Export seeds the id map from the store and renders a complete Gramps XML
//! document.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use roxmltree::{Document, Node};

use crate::config::{
    gramps_doctype, validate_namespace, APP_NAME, GRAMPS_NAMESPACE, GRAMPS_XML_VERSION,
    GZIP_MAGIC,
};
use crate::entity::EntityKind;
use crate::error::{EtlError, Result};
use crate::files::write_atomic;
use crate::resolver::ReferenceMap;
use crate::schema::validate_entity;
use crate::store::Store;
use crate::translator::TranslatorRegistry;
use crate::value::{Record, Value};
use crate::xml::{
    describe_element, element_children, find_children, get_tag_name, parse_document,
    render_document, Element,
};

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

/// One translated and validated entity, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedEntity {
    pub kind: EntityKind,
    pub id: String,
    pub record: Record,
}

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Entities translated, per kind.
    pub counts: BTreeMap<EntityKind, usize>,

    /// Whether the store was committed.
    pub committed: bool,
}

impl ImportSummary {
    /// Total number of entities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of entities of one kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Read a Gramps XML file, decompressing it if gzipped.
pub fn extract(path: &Path) -> Result<String> {
    tracing::info!(path = %path.display(), "extracting");

    let bytes = fs::read(path)?;

    let text = if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = String::new();
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut decoded)?;
        decoded
    } else if is_plain_xml(&bytes) {
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
    } else {
        return Err(EtlError::NotGrampsXml(path.display().to_string()));
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

fn is_plain_xml(bytes: &[u8]) -> bool {
    bytes
        .strip_prefix(UTF8_BOM)
        .unwrap_or(bytes)
        .starts_with(b"<?xml")
}

/// Check that the root element is a Gramps `<database>`.
///
/// Returns the Gramps XML version.
pub fn check_namespace<'a>(root: Node<'a, '_>) -> Result<&'a str> {
    let namespace = root.tag_name().namespace().unwrap_or_default();
    validate_namespace(namespace)
}

/// Translate every entity in the document.
///
/// The handle map is built from the whole document first. Entities are
/// translated group by group in canonical order and validated. The first
/// failure aborts the batch.
pub fn transform(doc: &Document<'_>, registry: &TranslatorRegistry) -> Result<Vec<TranslatedEntity>> {
    let handle_to_id = ReferenceMap::from_document(doc);
    let root = doc.root_element();

    let known_groups: HashSet<&str> = EntityKind::ALL.iter().map(|k| k.group_tag()).collect();
    for group in element_children(root) {
        let tag = get_tag_name(group);
        if !known_groups.contains(tag) {
            tracing::debug!(group = %tag, "skipping group");
        }
    }

    let mut entities = Vec::new();

    for kind in registry.kinds() {
        let Some(spec) = registry.get(kind) else {
            continue;
        };
        let mut seen = HashSet::new();

        for group in find_children(root, kind.group_tag()) {
            for node in element_children(group) {
                if get_tag_name(node) != kind.item_tag() {
                    tracing::warn!(group = %kind.group_tag(), tag = %get_tag_name(node), "unexpected tag in group");
                    continue;
                }

                let entity = translate_entity(kind, spec.from_xml(node, &handle_to_id))
                    .inspect_err(|e| {
                        tracing::error!(element = %describe_element(node), error = %e, "failed to transform {}", kind.item_tag());
                    })?;

                if !seen.insert(entity.id.clone()) {
                    tracing::warn!(entity = %kind, id = %entity.id, "duplicate primary key, last one wins");
                }

                tracing::debug!(entity = %kind, id = %entity.id, "transformed");
                entities.push(entity);
            }
        }
    }

    Ok(entities)
}

fn translate_entity(kind: EntityKind, translated: Result<Value>) -> Result<TranslatedEntity> {
    let record = match translated? {
        Value::Record(record) => record,
        other => {
            return Err(EtlError::ExpectedRecord {
                tag: kind.item_tag().to_string(),
                found: other.type_name(),
                value: other.to_string(),
            })
        }
    };

    validate_entity(kind, &record)?;

    let id = record
        .get(kind.primary_key())
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(TranslatedEntity { kind, id, record })
}

/// Upsert translated entities and commit unless `dry_run`.
pub fn load(
    entities: Vec<TranslatedEntity>,
    store: &mut dyn Store,
    dry_run: bool,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for entity in entities {
        *summary.counts.entry(entity.kind).or_insert(0) += 1;
        store.upsert(entity.kind, &entity.id, entity.record)?;
    }

    if dry_run {
        tracing::info!(total = summary.total(), "dry run, nothing committed");
    } else {
        store.commit()?;
        summary.committed = true;
        tracing::info!(total = summary.total(), "import committed");
    }

    Ok(summary)
}

/// Import a Gramps XML file into a store.
pub fn import_gramps_xml(
    path: &Path,
    store: &mut dyn Store,
    registry: &TranslatorRegistry,
    dry_run: bool,
) -> Result<ImportSummary> {
    let text = extract(path)?;
    let doc = parse_document(&text)?;
    check_namespace(doc.root_element())?;

    let entities = transform(&doc, registry)?;
    load(entities, store, dry_run)
}

/// Render the whole store as a Gramps XML document.
pub fn export_gramps_xml(store: &dyn Store, registry: &TranslatorRegistry) -> Result<String> {
    let id_to_handle = ReferenceMap::from_pairs(store.id_handle_pairs());

    let mut database = Element::new("database")
        .with_attribute("xmlns", GRAMPS_NAMESPACE)
        .with_child(header());

    for kind in registry.kinds() {
        let Some(spec) = registry.get(kind) else {
            continue;
        };
        let records = store.records(kind);
        if records.is_empty() {
            continue;
        }

        let mut group = Element::new(kind.group_tag());
        for (id, record) in records {
            let value = Value::Record(record.clone());
            let element = spec
                .to_xml(kind.item_tag(), &value, &id_to_handle)
                .inspect_err(|e| {
                    tracing::error!(entity = %kind, id = %id, error = %e, "failed to export");
                })?;
            group.children.push(element);
        }

        tracing::debug!(entity = %kind, count = group.children.len(), "exported");
        database.children.push(group);
    }

    render_document(&database, &gramps_doctype())
}

fn header() -> Element {
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();

    Element::new("header")
        .with_child(
            Element::new("created")
                .with_attribute("date", today)
                .with_attribute("version", GRAMPS_XML_VERSION),
        )
        .with_child(Element::new("generator").with_attribute("name", APP_NAME))
}

/// Write an exported document, gzipped unless `compress` is false.
pub fn write_gramps_xml(path: &Path, xml: &str, compress: bool) -> Result<()> {
    if compress {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(xml.as_bytes())?;
        write_atomic(path, &encoder.finish()?)?;
    } else {
        write_atomic(path, xml.as_bytes())?;
    }

    tracing::info!(path = %path.display(), compress, "written");
    Ok(())
}
