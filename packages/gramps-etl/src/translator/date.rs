//! Date contributor.
//!
//! Gramps stores a date as exactly one of four child tags:
//!
//! - `<dateval val=".." type="before|after|about" quality=".."/>`
//! - `<daterange start=".." stop=".." quality=".."/>`
//! - `<datespan start=".." stop=".." quality=".."/>`
//! - `<datestr val=".."/>`
//!
//! Natively they collapse into a single `date` record:
//! `{value, modifier, quality}` where `value` is a string, or a
//! `{start, stop}` record for spans and ranges.

use roxmltree::Node;

use super::contributor::Contributor;
use crate::error::{EtlError, Result};
use crate::value::{Record, Value};
use crate::xml::{find_child, get_tag_name, Element};

pub const DATE_KEY: &str = "date";
pub const VALUE_KEY: &str = "value";
pub const MODIFIER_KEY: &str = "modifier";
pub const QUALITY_KEY: &str = "quality";

const START: &str = "start";
const STOP: &str = "stop";

/// Tags in lookup priority order.
const DATE_TAGS: &[&str] = &["datestr", "dateval", "daterange", "datespan"];

/// Date modifier. `none` is represented by absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateModifier {
    Span,
    Range,
    Before,
    After,
    About,
    TextOnly,
}

impl DateModifier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Span => "span",
            Self::Range => "range",
            Self::Before => "before",
            Self::After => "after",
            Self::About => "about",
            Self::TextOnly => "textonly",
        }
    }

    /// Parse a modifier; `none` and unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "span" => Some(Self::Span),
            "range" => Some(Self::Range),
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "about" => Some(Self::About),
            "textonly" => Some(Self::TextOnly),
            _ => None,
        }
    }

    /// Gramps tag carrying a date with this modifier.
    fn tag(self) -> &'static str {
        match self {
            Self::Span => "datespan",
            Self::Range => "daterange",
            Self::TextOnly => "datestr",
            Self::Before | Self::After | Self::About => "dateval",
        }
    }
}

/// Date quality. `none` is represented by absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateQuality {
    Estimated,
    Calculated,
}

impl DateQuality {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Estimated => "estimated",
            Self::Calculated => "calculated",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "estimated" => Some(Self::Estimated),
            "calculated" => Some(Self::Calculated),
            _ => None,
        }
    }
}

/// Contributor unifying the four Gramps date tags into one `date` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateContributor;

impl Contributor for DateContributor {
    fn tag_names(&self) -> &'static [&'static str] {
        DATE_TAGS
    }

    fn from_xml(&self, node: Node<'_, '_>) -> Result<Record> {
        let present: Vec<_> = DATE_TAGS
            .iter()
            .filter_map(|tag| find_child(node, tag))
            .collect();

        let Some(&date_node) = present.first() else {
            return Ok(Record::new());
        };

        if present.len() > 1 {
            tracing::warn!(
                tag = %get_tag_name(node),
                kept = %get_tag_name(date_node),
                count = present.len(),
                "several date tags present"
            );
        }

        let date_tag = get_tag_name(date_node);
        let handled: &[&str] = match date_tag {
            "datestr" => &["val"],
            "dateval" => &["val", "type", QUALITY_KEY],
            _ => &[START, STOP, QUALITY_KEY],
        };
        for attr in date_node.attributes() {
            if !handled.contains(&attr.name()) {
                tracing::warn!(tag = %date_tag, attr = %attr.name(), "unexpected attribute");
            }
        }

        let non_empty = |name: &str| date_node.attribute(name).filter(|v| !v.is_empty());

        let mut date = Record::new();

        let modifier = match date_tag {
            "datestr" => Some(DateModifier::TextOnly.as_str()),
            "daterange" => Some(DateModifier::Range.as_str()),
            "datespan" => Some(DateModifier::Span.as_str()),
            _ => non_empty("type"),
        };

        if matches!(date_tag, "daterange" | "datespan") {
            let mut bounds = Record::new();
            for key in [START, STOP] {
                if let Some(v) = non_empty(key) {
                    bounds.insert(key.to_string(), Value::from(v));
                }
            }
            if !bounds.is_empty() {
                date.insert(VALUE_KEY.to_string(), Value::Record(bounds));
            }
        } else if let Some(val) = non_empty("val") {
            date.insert(VALUE_KEY.to_string(), Value::from(val));
        }

        if let Some(modifier) = modifier.filter(|m| *m != "none") {
            if DateModifier::parse(modifier).is_none() {
                tracing::warn!(modifier = %modifier, "unknown date modifier");
            }
            date.insert(MODIFIER_KEY.to_string(), Value::from(modifier));
        }

        if let Some(quality) = non_empty(QUALITY_KEY).filter(|q| *q != "none") {
            if DateQuality::parse(quality).is_none() {
                tracing::warn!(quality = %quality, "unknown date quality");
            }
            date.insert(QUALITY_KEY.to_string(), Value::from(quality));
        }

        let mut record = Record::new();
        record.insert(DATE_KEY.to_string(), Value::Record(date));
        Ok(record)
    }

    fn to_xml(&self, data: &Record) -> Result<Vec<Element>> {
        let date = match data.get(DATE_KEY) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Record(date)) if date.is_empty() => return Ok(Vec::new()),
            Some(Value::Record(date)) => date,
            Some(other) => {
                return Err(EtlError::InvalidDate(format!(
                    "expected record, got {}: {other}",
                    other.type_name()
                )))
            }
        };

        let modifier = optional_str(date, MODIFIER_KEY)?.filter(|m| *m != "none");
        let quality = optional_str(date, QUALITY_KEY)?.filter(|q| *q != "none");

        let tag = modifier
            .and_then(DateModifier::parse)
            .map_or("dateval", DateModifier::tag);

        let mut element = Element::new(tag);

        match tag {
            "datestr" => {
                element.set_attribute("val", required_value(date, tag)?);
            }
            "datespan" | "daterange" => {
                let (start, stop) = span_bounds(date)?;
                if let Some(quality) = quality {
                    element.set_attribute(QUALITY_KEY, quality);
                }
                element.set_attribute(START, start);
                element.set_attribute(STOP, stop);
            }
            _ => {
                if let Some(quality) = quality {
                    element.set_attribute(QUALITY_KEY, quality);
                }
                if let Some(modifier) = modifier {
                    element.set_attribute("type", modifier);
                }
                element.set_attribute("val", required_value(date, tag)?);
            }
        }

        Ok(vec![element])
    }
}

fn optional_str<'a>(date: &'a Record, key: &str) -> Result<Option<&'a str>> {
    match date.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(EtlError::InvalidDate(format!(
            "{key} must be a string, got {}: {other}",
            other.type_name()
        ))),
    }
}

fn required_value<'a>(date: &'a Record, tag: &str) -> Result<&'a str> {
    match date.get(VALUE_KEY) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(EtlError::InvalidDate(format!(
            "<{tag}> needs a string value, got {}: {other}",
            other.type_name()
        ))),
        None => Err(EtlError::InvalidDate(format!("<{tag}> needs a value"))),
    }
}

/// Start and stop of a span or range: `value: {start, stop}` or flat keys.
fn span_bounds(date: &Record) -> Result<(&str, &str)> {
    let source = match date.get(VALUE_KEY) {
        Some(Value::Record(bounds)) => bounds,
        _ => date,
    };
    let bound = |key: &str| {
        source
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| EtlError::InvalidDate(format!("span or range needs a string '{key}'")))
    };
    Ok((bound(START)?, bound(STOP)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn import(xml: &str) -> Record {
        let doc = Document::parse(xml).unwrap();
        DateContributor.from_xml(doc.root_element()).unwrap()
    }

    fn export(data: &Record) -> String {
        DateContributor
            .to_xml(data)
            .unwrap()
            .iter()
            .map(|el| el.to_pretty_string().unwrap())
            .collect()
    }

    #[test]
    fn test_dateval_round_trip() {
        let xml = r#"<event><dateval quality="calculated" type="about" val="1855"/></event>"#;

        let data = import(xml);
        assert_eq!(
            data,
            record! {
                "date" => record! {
                    "value" => "1855",
                    "modifier" => "about",
                    "quality" => "calculated",
                },
            }
        );

        assert_eq!(
            export(&data),
            "<dateval quality=\"calculated\" type=\"about\" val=\"1855\"/>\n"
        );
    }

    #[test]
    fn test_datestr() {
        let data = import(r#"<event><datestr val="в детстве"/></event>"#);
        assert_eq!(
            data,
            record! { "date" => record! { "value" => "в детстве", "modifier" => "textonly" } }
        );
        assert_eq!(export(&data), "<datestr val=\"в детстве\"/>\n");
    }

    #[test]
    fn test_datespan_nests_bounds() {
        let data = import(r#"<event><datespan start="1882-08-19" stop="1886-06-15"/></event>"#);
        assert_eq!(
            data,
            record! {
                "date" => record! {
                    "modifier" => "span",
                    "value" => record! { "start" => "1882-08-19", "stop" => "1886-06-15" },
                },
            }
        );
        assert_eq!(
            export(&data),
            "<datespan start=\"1882-08-19\" stop=\"1886-06-15\"/>\n"
        );
    }

    #[test]
    fn test_daterange_with_flat_bounds() {
        let data = record! {
            "date" => record! {
                "modifier" => "range",
                "quality" => "estimated",
                "start" => "1700",
                "stop" => "1710",
            },
        };
        assert_eq!(
            export(&data),
            "<daterange quality=\"estimated\" start=\"1700\" stop=\"1710\"/>\n"
        );
    }

    #[test]
    fn test_no_date() {
        assert!(import("<event><type>Birth</type></event>").is_empty());
        assert!(DateContributor.to_xml(&Record::new()).unwrap().is_empty());
    }

    #[test]
    fn test_plain_dateval_has_no_type() {
        let data = import(r#"<event><dateval val="1900-01-01"/></event>"#);
        assert_eq!(data, record! { "date" => record! { "value" => "1900-01-01" } });

        let explicit_none = record! {
            "date" => record! { "value" => "1900-01-01", "modifier" => "none", "quality" => "none" },
        };
        assert_eq!(export(&explicit_none), "<dateval val=\"1900-01-01\"/>\n");
    }

    #[test]
    fn test_first_present_tag_wins() {
        let data = import(r#"<event><datespan start="1" stop="2"/><dateval val="3"/></event>"#);
        assert_eq!(data, record! { "date" => record! { "value" => "3" } });
    }

    #[test]
    fn test_span_without_bounds_is_invalid() {
        let data = record! { "date" => record! { "modifier" => "span" } };
        let err = DateContributor.to_xml(&data).unwrap_err();
        assert!(matches!(err, EtlError::InvalidDate(_)));
    }

    #[test]
    fn test_unhandled_date_attributes_are_logged() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let data = tracing::subscriber::with_default(subscriber, || {
            import(r#"<event><dateval val="1700-03-01" cformat="Julian" newyear="3-25"/></event>"#)
        });

        assert_eq!(data, record! { "date" => record! { "value" => "1700-03-01" } });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("unexpected attribute"));
        assert!(output.contains("attr=cformat"));
        assert!(output.contains("attr=newyear"));
        assert!(!output.contains("attr=val"));
    }
}
