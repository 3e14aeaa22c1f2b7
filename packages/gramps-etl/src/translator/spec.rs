//! Declarative tag translator specifications.

use std::fmt;
use std::sync::Arc;

use chrono::DateTime;

use super::cardinality::Quantifier;
use super::contributor::Contributor;
use crate::error::{EtlError, Result};
use crate::value::Value;

/// Attribute name carrying a handle in reference elements.
pub const HLINK_ATTR: &str = "hlink";

/// Scalar type of a declared attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    String,
    Integer,
    /// `0`/`1` in XML.
    Boolean,
    /// Unix epoch seconds in XML.
    Timestamp,
}

impl AttrType {
    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        }
    }

    /// Convert a raw attribute value to its native type.
    pub fn normalize(self, tag: &str, attr: &str, raw: &str) -> Result<Value> {
        let invalid = || EtlError::InvalidAttrValue {
            tag: tag.to_string(),
            attr: attr.to_string(),
            expected: self.name(),
            value: raw.to_string(),
        };

        match self {
            Self::String => Ok(Value::String(raw.to_string())),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| invalid()),
            Self::Boolean => raw
                .trim()
                .parse::<i64>()
                .map(|n| Value::Boolean(n != 0))
                .map_err(|_| invalid()),
            Self::Timestamp => raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(Value::Timestamp)
                .ok_or_else(invalid),
        }
    }
}

/// Convert a native scalar to its XML attribute form.
///
/// Returns `None` for `Null` (attribute omitted). Records and lists are
/// rejected: depth must be expressed through child tags.
pub fn serialize_attr_value(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Integer(i) => Ok(Some(i.to_string())),
        Value::Boolean(b) => Ok(Some(if *b { "1" } else { "0" }.to_string())),
        Value::Timestamp(ts) => Ok(Some(ts.timestamp().to_string())),
        Value::List(_) | Value::Record(_) => Err(EtlError::DeepStructure {
            value: value.to_string(),
        }),
    }
}

/// Where the element's text content goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Text is not part of the record.
    #[default]
    Ignored,
    /// The whole value is the element text.
    AsText,
    /// Text is stored under the given key next to the attributes.
    UnderKey(String),
}

/// Declarative description of one XML element ⇄ native record mapping.
///
/// Interpreted by the generic engine in `engine.rs`; see
/// [`TagSpec::from_xml`] and [`TagSpec::to_xml`].
#[derive(Clone)]
pub struct TagSpec {
    /// Translator name, used in cardinality error messages.
    pub name: String,

    /// Declared attributes and their types, in declaration order.
    pub attrs: Vec<(String, AttrType)>,

    /// Declared child tags, in output order.
    pub tags: Vec<(String, Quantifier)>,

    /// Text handling.
    pub text: TextMode,

    /// Whether `hlink` is rewritten to `id` and back.
    pub reference: bool,

    /// Allowed text values for enumerated text tags.
    pub allowed_values: Option<Vec<&'static str>>,

    /// Extensions claiming tags outside `tags`.
    pub contributors: Vec<Arc<dyn Contributor>>,
}

impl fmt::Debug for TagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSpec")
            .field("name", &self.name)
            .field("attrs", &self.attrs)
            .field(
                "tags",
                &self.tags.iter().map(|(tag, _)| tag).collect::<Vec<_>>(),
            )
            .field("text", &self.text)
            .field("reference", &self.reference)
            .field("allowed_values", &self.allowed_values)
            .field("contributors", &self.contributors.len())
            .finish()
    }
}

impl TagSpec {
    /// Create an empty spec.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            tags: Vec::new(),
            text: TextMode::Ignored,
            reference: false,
            allowed_values: None,
            contributors: Vec::new(),
        }
    }

    /// Spec for `<foo>some text</foo>`.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            text: TextMode::AsText,
            ..Self::new(name)
        }
    }

    /// Spec for `<foo hlink="..."/>` with the handle rewritten to `id`.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            reference: true,
            ..Self::new(name)
        }
        .with_attr(HLINK_ATTR, AttrType::String)
    }

    /// Declare a typed attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, attr_type: AttrType) -> Self {
        self.attrs.push((name.into(), attr_type));
        self
    }

    /// Declare string attributes.
    #[must_use]
    pub fn with_attrs(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attrs
            .extend(names.into_iter().map(|n| (n.into(), AttrType::String)));
        self
    }

    /// Declare a child tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>, quantifier: Quantifier) -> Self {
        debug_assert!(
            self.text != TextMode::AsText,
            "{}: child tags and text-only content are mutually exclusive",
            self.name
        );
        self.tags.push((tag.into(), quantifier));
        self
    }

    /// Store the element text under `key`.
    #[must_use]
    pub fn with_text_under_key(mut self, key: impl Into<String>) -> Self {
        self.text = TextMode::UnderKey(key.into());
        self
    }

    /// Restrict text values to a fixed set.
    #[must_use]
    pub fn with_allowed_values(mut self, values: &[&'static str]) -> Self {
        self.allowed_values = Some(values.to_vec());
        self
    }

    /// Attach a contributor.
    #[must_use]
    pub fn with_contributor(mut self, contributor: Arc<dyn Contributor>) -> Self {
        self.contributors.push(contributor);
        self
    }

    /// Wrap for sharing between parent specs.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Look up a declared attribute type.
    #[must_use]
    pub fn attr_type(&self, name: &str) -> Option<AttrType> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    /// Look up a declared child tag.
    #[must_use]
    pub fn quantifier(&self, tag: &str) -> Option<&Quantifier> {
        self.tags.iter().find(|(t, _)| t == tag).map(|(_, q)| q)
    }

    /// Whether some contributor claims `tag`.
    #[must_use]
    pub fn is_contributed(&self, tag: &str) -> bool {
        self.contributors
            .iter()
            .any(|c| c.tag_names().contains(&tag))
    }

    pub(crate) fn check_allowed(&self, value: &str) -> bool {
        match &self.allowed_values {
            Some(allowed) => allowed.contains(&value),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_types() {
        assert_eq!(
            AttrType::Boolean.normalize("name", "alt", "1").unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            AttrType::Boolean.normalize("name", "alt", "0").unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(
            AttrType::Integer.normalize("range", "start", "42").unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            AttrType::Timestamp
                .normalize("person", "change", "1400000000")
                .unwrap(),
            Value::Timestamp(Utc.timestamp_opt(1_400_000_000, 0).single().unwrap())
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let err = AttrType::Integer
            .normalize("region", "corner1_x", "left")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "<region>: invalid integer value 'left' for attribute 'corner1_x'"
        );
    }

    #[test]
    fn test_serialize_attr_value() {
        assert_eq!(serialize_attr_value(&Value::Null).unwrap(), None);
        assert_eq!(
            serialize_attr_value(&Value::Boolean(true)).unwrap(),
            Some("1".to_string())
        );
        assert_eq!(
            serialize_attr_value(&Value::Integer(7)).unwrap(),
            Some("7".to_string())
        );
        let ts = Utc.timestamp_opt(1_400_000_000, 0).single().unwrap();
        assert_eq!(
            serialize_attr_value(&Value::Timestamp(ts)).unwrap(),
            Some("1400000000".to_string())
        );
    }

    #[test]
    fn test_serialize_rejects_deep_structures() {
        let list = Value::from(vec![Value::from("a")]);
        let err = serialize_attr_value(&list).unwrap_err();
        assert!(matches!(err, EtlError::DeepStructure { .. }));
    }

    #[test]
    fn test_reference_declares_hlink() {
        let spec = TagSpec::reference("Ref").with_attr("role", AttrType::String);
        assert!(spec.reference);
        assert_eq!(spec.attr_type(HLINK_ATTR), Some(AttrType::String));
        assert_eq!(spec.attr_type("role"), Some(AttrType::String));
    }

    #[test]
    fn test_allowed_values() {
        let gender = TagSpec::text("Gender").with_allowed_values(&["M", "F", "U"]);
        assert!(gender.check_allowed("F"));
        assert!(!gender.check_allowed("X"));
        assert!(TagSpec::text("Text").check_allowed("anything"));
    }
}
