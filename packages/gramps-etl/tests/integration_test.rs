//! End-to-end import/export tests against a sample Gramps XML file.

use std::fs;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use wtfamily_gramps_etl::value::Value;
use wtfamily_gramps_etl::{
    create_gramps_registry, export_gramps_xml, import_gramps_xml, record, write_gramps_xml,
    EntityKind, EtlError, MemoryStore, Store, YamlStore,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.gramps.xml")
}

fn imported() -> MemoryStore {
    let mut store = MemoryStore::new();
    import_gramps_xml(&fixture(), &mut store, &create_gramps_registry(), false).unwrap();
    store
}

#[test]
fn test_import_counts() {
    let mut store = MemoryStore::new();
    let summary =
        import_gramps_xml(&fixture(), &mut store, &create_gramps_registry(), false).unwrap();

    assert!(summary.committed);
    assert_eq!(summary.count(EntityKind::Person), 2);
    assert_eq!(summary.count(EntityKind::Event), 2);
    assert_eq!(summary.count(EntityKind::Place), 1);
    assert_eq!(summary.count(EntityKind::NameFormat), 1);
    assert_eq!(summary.total(), 14);
}

#[test]
fn test_import_event() {
    let store = imported();

    let expected = record! {
        "id" => "E0001",
        "handle" => "_e1",
        "change" => Utc.timestamp_opt(1_414_625_582, 0).single().unwrap(),
        "type" => "Military Service",
        "date" => record! {
            "modifier" => "span",
            "value" => record! { "start" => "1882-08-19", "stop" => "1886-06-15" },
        },
        "place" => vec![record! { "id" => "P0001" }],
        "citationref" => vec![record! { "id" => "C0001" }],
    };
    assert_eq!(store.get(EntityKind::Event, "E0001"), Some(&expected));
}

#[test]
fn test_import_resolves_references_to_ids() {
    let store = imported();

    let person = store.get(EntityKind::Person, "I0001").unwrap();
    assert_eq!(person["gender"], Value::from("M"));
    assert_eq!(person["parentin"], Value::from(vec![record! { "id" => "F0001" }]));
    assert_eq!(
        person["eventref"],
        Value::from(vec![
            record! { "id" => "E0001", "role" => "Primary" },
            record! { "id" => "E0002", "role" => "Primary" },
        ])
    );

    let citation = store.get(EntityKind::Citation, "C0001").unwrap();
    assert_eq!(citation["sourceref"], Value::from(record! { "id" => "S0001" }));
    assert_eq!(
        citation["date"],
        Value::from(record! { "value" => "1886-06-15" })
    );

    let bookmark = store.get(EntityKind::Bookmark, "I0001").unwrap();
    assert_eq!(bookmark["target"], Value::from("person"));

    let format = store.get(EntityKind::NameFormat, "-1").unwrap();
    assert_eq!(format["active"], Value::Boolean(true));
}

#[test]
fn test_export_then_reimport_is_stable() {
    let registry = create_gramps_registry();
    let first = imported();

    let xml = export_gramps_xml(&first, &registry).unwrap();
    assert!(xml.contains(r#"<generator name="WTFamily"/>"#));
    assert!(xml.contains(r#"<place hlink="_pl1"/>"#));
    assert!(!xml.contains("<tags>"));

    let dir = tempdir().unwrap();
    let path = dir.path().join("export.gramps");
    write_gramps_xml(&path, &xml, true).unwrap();

    let mut second = MemoryStore::new();
    import_gramps_xml(&path, &mut second, &registry, false).unwrap();

    assert_eq!(second.dataset(), first.dataset());
}

#[test]
fn test_dry_run_leaves_store_untouched() {
    let mut store = MemoryStore::new();
    let summary =
        import_gramps_xml(&fixture(), &mut store, &create_gramps_registry(), true).unwrap();

    assert!(!summary.committed);
    assert_eq!(summary.total(), 14);
    assert!(store.records(EntityKind::Person).is_empty());
}

#[test]
fn test_unresolved_reference_aborts_import() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.gramps");
    let xml = fs::read_to_string(fixture())
        .unwrap()
        .replace(r#"<father hlink="_p1"/>"#, r#"<father hlink="_missing"/>"#);
    fs::write(&path, xml).unwrap();

    let mut store = MemoryStore::new();
    let err = import_gramps_xml(&path, &mut store, &create_gramps_registry(), false).unwrap_err();

    assert!(matches!(err, EtlError::UnresolvedReference { .. }));
    assert!(store.dataset().is_empty());
}

#[test]
fn test_yaml_store_round_trip() {
    let dir = tempdir().unwrap();
    let store_path = dir.path().join("family.yaml");
    let registry = create_gramps_registry();

    let mut store = YamlStore::open(&store_path).unwrap();
    import_gramps_xml(&fixture(), &mut store, &registry, false).unwrap();
    assert!(store_path.exists());

    let reopened = YamlStore::open(&store_path).unwrap();
    assert_eq!(reopened.dataset(), imported().dataset());

    let xml = export_gramps_xml(&reopened, &registry).unwrap();
    assert!(xml.contains(r#"<bookmark hlink="_p1" target="person"/>"#));
}
