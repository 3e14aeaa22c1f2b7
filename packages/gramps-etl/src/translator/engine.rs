//! Generic recursive engine interpreting a [`TagSpec`].
//!
//! Import is lenient: undeclared attributes and child tags are logged and
//! dropped. Export is strict: cardinality, value types and references are
//! all checked and any violation aborts the conversion.

use std::collections::BTreeMap;

use roxmltree::Node;

use super::spec::{serialize_attr_value, TagSpec, TextMode, HLINK_ATTR};
use crate::error::{EtlError, Result};
use crate::resolver::ReferenceMap;
use crate::value::{Record, Value};
use crate::xml::{element_children, get_tag_name, get_text, Element};

/// Native key holding the resolved target of a reference.
pub const ID_KEY: &str = "id";

impl TagSpec {
    /// Translate an XML element into a native value.
    ///
    /// Text-only specs yield a string; all others yield a record.
    pub fn from_xml(&self, node: Node<'_, '_>, handle_to_id: &ReferenceMap) -> Result<Value> {
        let tag = get_tag_name(node);
        let mut data = Record::new();

        for attr in node.attributes() {
            let name = attr.name();
            match self.attr_type(name) {
                Some(attr_type) => {
                    data.insert(name.to_string(), attr_type.normalize(tag, name, attr.value())?);
                }
                None => tracing::warn!(tag = %tag, attr = %name, "unexpected attribute"),
            }
        }

        if self.reference {
            self.post_normalize_attrs(tag, &mut data, handle_to_id)?;
        }

        match &self.text {
            TextMode::AsText => {
                let text = get_text(node).unwrap_or_default();
                if !self.check_allowed(text) {
                    tracing::warn!(tag = %tag, value = %text, "value outside the allowed set");
                }
                return Ok(Value::from(text));
            }
            TextMode::UnderKey(key) => {
                if let Some(text) = get_text(node) {
                    data.insert(key.clone(), Value::from(text));
                }
            }
            TextMode::Ignored => {}
        }

        for child in element_children(node) {
            let child_tag = get_tag_name(child);

            let Some(quantifier) = self.quantifier(child_tag) else {
                if !self.is_contributed(child_tag) {
                    tracing::warn!(tag = %tag, child = %child_tag, "unexpected nested tag");
                }
                continue;
            };

            let value = quantifier.translator.from_xml(child, handle_to_id)?;

            if quantifier.cardinality.is_single_value() {
                data.insert(child_tag.to_string(), value);
            } else {
                let slot = data
                    .entry(child_tag.to_string())
                    .or_insert_with(|| Value::List(Vec::new()));
                match slot {
                    Value::List(items) => items.push(value),
                    other => *other = Value::List(vec![value]),
                }
            }
        }

        for contributor in &self.contributors {
            data.extend(contributor.from_xml(node)?);
        }

        Ok(Value::Record(data))
    }

    /// Translate a native value into an XML element named `tag`.
    pub fn to_xml(&self, tag: &str, value: &Value, id_to_handle: &ReferenceMap) -> Result<Element> {
        if self.text == TextMode::AsText {
            let text = value.as_str().ok_or_else(|| EtlError::NonStringText {
                tag: tag.to_string(),
                found: value.type_name(),
                value: value.to_string(),
            })?;
            if !self.check_allowed(text) {
                return Err(EtlError::DisallowedValue {
                    tag: tag.to_string(),
                    allowed: self.allowed_values.clone().unwrap_or_default(),
                    value: text.to_string(),
                });
            }
            return Ok(Element::new(tag).with_text(text));
        }

        let data = value.as_record().ok_or_else(|| EtlError::ExpectedRecord {
            tag: tag.to_string(),
            found: value.type_name(),
            value: value.to_string(),
        })?;

        let attrs = self.pre_serialize_attrs(tag, data, id_to_handle)?;

        let mut element = Element::new(tag);
        element.attributes = attrs.into_iter().collect();

        for (child_tag, quantifier) in &self.tags {
            let values = data.get(child_tag).map(Value::to_values).unwrap_or_default();
            quantifier.validate(&values)?;

            for child_value in values {
                element.children.push(quantifier.translator.to_xml(
                    child_tag,
                    child_value,
                    id_to_handle,
                )?);
            }
        }

        if let TextMode::UnderKey(key) = &self.text {
            match data.get(key) {
                None | Some(Value::Null) => {}
                Some(Value::String(text)) => element.text = Some(text.clone()),
                Some(other) => {
                    return Err(EtlError::NonStringText {
                        tag: tag.to_string(),
                        found: other.type_name(),
                        value: other.to_string(),
                    })
                }
            }
        }

        for contributor in &self.contributors {
            element.children.extend(contributor.to_xml(data)?);
        }

        Ok(element)
    }

    /// Replace `hlink` with the resolved `id`.
    fn post_normalize_attrs(
        &self,
        tag: &str,
        data: &mut Record,
        handle_to_id: &ReferenceMap,
    ) -> Result<()> {
        let handle = match data.remove(HLINK_ATTR) {
            Some(Value::String(handle)) => handle,
            Some(other) => {
                return Err(EtlError::NonStringReference {
                    tag: tag.to_string(),
                    field: HLINK_ATTR,
                    found: other.type_name(),
                    value: other.to_string(),
                })
            }
            None => {
                return Err(EtlError::MissingReference {
                    tag: tag.to_string(),
                    field: HLINK_ATTR,
                })
            }
        };

        let id = handle_to_id.resolve(&handle)?;
        data.insert(ID_KEY.to_string(), Value::from(id));
        Ok(())
    }

    /// Collect declared non-null attributes, sorted by name.
    ///
    /// For references, the record's `id` is resolved into `hlink`.
    fn pre_serialize_attrs(
        &self,
        tag: &str,
        data: &Record,
        id_to_handle: &ReferenceMap,
    ) -> Result<BTreeMap<String, String>> {
        let mut attrs = BTreeMap::new();

        for (name, _) in &self.attrs {
            if self.reference && name == HLINK_ATTR {
                continue;
            }
            if let Some(value) = data.get(name) {
                if let Some(serialized) = serialize_attr_value(value)? {
                    attrs.insert(name.clone(), serialized);
                }
            }
        }

        if self.reference {
            let id = match data.get(ID_KEY) {
                Some(Value::String(id)) => id,
                None | Some(Value::Null) => {
                    return Err(EtlError::MissingReference {
                        tag: tag.to_string(),
                        field: ID_KEY,
                    })
                }
                Some(other) => {
                    return Err(EtlError::NonStringReference {
                        tag: tag.to_string(),
                        field: ID_KEY,
                        found: other.type_name(),
                        value: other.to_string(),
                    })
                }
            };
            let handle = id_to_handle.resolve(id)?;
            attrs.insert(HLINK_ATTR.to_string(), handle.to_string());
        }

        Ok(attrs)
    }
}
