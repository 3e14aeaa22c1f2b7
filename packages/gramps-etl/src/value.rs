//! Native record model.
//!
//! A record maps field names to values; a value is a scalar, a nested record
//! or an ordered list. Records use a `BTreeMap` so serialized output is
//! deterministic regardless of XML attribute or tag order.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, EnumAccess, MapAccess, SeqAccess, Unexpected, VariantAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A native record: field name to value.
pub type Record = BTreeMap<String, Value>;

/// Tag marking a timestamp in serialized output, e.g. `!Timestamp 2014-05-13T16:53:20Z`.
const TIMESTAMP_TAG: &str = "Timestamp";

/// A single native value.
///
/// Serializes as plain data except for timestamps, which carry an explicit
/// tag. A plain string is never read back as a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Timestamp(DateTime<Utc>),
    String(String),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Name of the runtime type, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Timestamp(_) => "timestamp",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Normalize to a list of values.
    ///
    /// `Null` becomes an empty list, a list is returned item by item and any
    /// other value is wrapped as a single item.
    #[must_use]
    pub fn to_values(&self) -> Vec<&Value> {
        match self {
            Self::Null => Vec::new(),
            Self::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Record(record) => {
                write!(f, "{{")?;
                for (i, (key, value)) in record.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<Record>> for Value {
    fn from(records: Vec<Record>) -> Self {
        Self::List(records.into_iter().map(Self::Record).collect())
    }
}

/// Build a [`Record`] from `key => value` pairs.
///
/// # Examples
/// ```
/// use wtfamily_gramps_etl::record;
/// use wtfamily_gramps_etl::value::Value;
///
/// let place = record! { "id" => "P0001" };
/// assert_eq!(place.get("id"), Some(&Value::from("P0001")));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::value::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::value::Record::new();
        $(
            record.insert(::std::string::String::from($key), $crate::value::Value::from($value));
        )+
        record
    }};
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Timestamp(ts) => {
                serializer.serialize_newtype_variant("Value", 3, TIMESTAMP_TAG, ts)
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Record(record) => record.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, list, record or tagged timestamp")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Boolean(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
        Ok(Value::Integer(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
        i64::try_from(n)
            .map(Value::Integer)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(n), &self))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut record = Record::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            record.insert(key, value);
        }
        Ok(Value::Record(record))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant): (String, _) = data.variant()?;
        if tag != TIMESTAMP_TAG {
            return Err(de::Error::unknown_variant(&tag, &[TIMESTAMP_TAG]));
        }
        variant.newtype_variant().map(Value::Timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_values_normalizes_scalars() {
        assert!(Value::Null.to_values().is_empty());
        assert_eq!(Value::from("x").to_values(), vec![&Value::from("x")]);

        let list = Value::from(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(list.to_values().len(), 2);
    }

    #[test]
    fn test_display_record() {
        let value = Value::from(record! { "hello" => 123_i64 });
        assert_eq!(value.to_string(), "{hello: 123}");
    }

    #[test]
    fn test_yaml_keeps_types() {
        let change = Utc.timestamp_opt(1_400_000_000, 0).single().unwrap();
        let original = record! {
            "id" => "I0001",
            "priv" => true,
            "change" => change,
            "count" => 3_i64,
            "name" => vec![record! { "first" => "Ada" }],
        };

        let yaml = serde_yaml_ng::to_string(&original).unwrap();
        assert!(yaml.contains("change: !Timestamp 2014-05-13T16:53:20Z"));

        let parsed: Record = serde_yaml_ng::from_str(&yaml).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn test_timestamp_shaped_string_stays_string() {
        let original = record! { "description" => "2020-01-01T00:00:00Z" };
        let yaml = serde_yaml_ng::to_string(&original).unwrap();
        let parsed: Record = serde_yaml_ng::from_str(&yaml).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let parsed: Result<Record, _> = serde_yaml_ng::from_str("value: !Color red\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_numeric_string_stays_string() {
        let original = record! { "value" => "1855" };
        let yaml = serde_yaml_ng::to_string(&original).unwrap();
        let parsed: Record = serde_yaml_ng::from_str(&yaml).unwrap();

        assert_eq!(parsed.get("value"), Some(&Value::from("1855")));
    }
}
