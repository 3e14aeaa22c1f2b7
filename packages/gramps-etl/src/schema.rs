//! Native record validation.
//!
//! Runs on every translated record before anything is committed. A
//! violation aborts the whole import.

use crate::entity::EntityKind;
use crate::error::{EtlError, Result};
use crate::value::{Record, Value};

/// Keys that must be present and non-null, per entity kind.
fn required_keys(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Person => &["gender"],
        EntityKind::Place => &["pname"],
        EntityKind::MediaObject => &["file"],
        EntityKind::Repository => &["rname", "type"],
        EntityKind::Note => &["text"],
        EntityKind::Citation => &["confidence", "sourceref"],
        EntityKind::Bookmark => &["target"],
        EntityKind::NameMap => &["type", "value"],
        EntityKind::NameFormat => &["name", "fmt_str"],
        EntityKind::Family | EntityKind::Event | EntityKind::Source => &[],
    }
}

/// Validate a native record of the given kind.
pub fn validate_entity(kind: EntityKind, record: &Record) -> Result<()> {
    let pk = kind.primary_key();
    let id = match record.get(pk) {
        Some(Value::String(id)) if !id.is_empty() => id.as_str(),
        Some(Value::String(_)) => return Err(violation(kind, "", format!("'{pk}' is empty"), record)),
        Some(other) => {
            return Err(violation(
                kind,
                "",
                format!("'{pk}' must be a string, got {}", other.type_name()),
                record,
            ))
        }
        None => return Err(violation(kind, "", format!("missing '{pk}'"), record)),
    };

    check_type(kind, id, record, "handle", "string", |v| {
        matches!(v, Value::String(_))
    })?;
    check_type(kind, id, record, "change", "timestamp", |v| {
        matches!(v, Value::Timestamp(_))
    })?;
    check_type(kind, id, record, "priv", "boolean", |v| {
        matches!(v, Value::Boolean(_))
    })?;

    for key in required_keys(kind) {
        match record.get(*key) {
            None | Some(Value::Null) => {
                return Err(violation(kind, id, format!("missing '{key}'"), record));
            }
            Some(Value::List(items)) if items.is_empty() => {
                return Err(violation(kind, id, format!("'{key}' is empty"), record));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

fn check_type(
    kind: EntityKind,
    id: &str,
    record: &Record,
    key: &str,
    expected: &str,
    accepts: impl Fn(&Value) -> bool,
) -> Result<()> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(()),
        Some(value) if accepts(value) => Ok(()),
        Some(value) => Err(violation(
            kind,
            id,
            format!("'{key}' must be a {expected}, got {}", value.type_name()),
            record,
        )),
    }
}

fn violation(kind: EntityKind, id: &str, reason: String, record: &Record) -> EtlError {
    let dump = serde_yaml_ng::to_string(record)
        .unwrap_or_else(|e| format!("<record not serializable: {e}>"));
    EtlError::SchemaViolation {
        entity: kind.plural().to_string(),
        id: id.to_string(),
        reason,
        record: dump,
    }
}
