//! Owned XML element tree produced by translators on export.
//!
//! `roxmltree` is read-only, so serialization builds this small tree and
//! renders it with `quick-xml`. Output uses two-space indentation,
//! self-closing empty elements and keeps text content on the same line as
//! its tags.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;

/// An XML element with ordered attributes, optional text and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Local tag name.
    pub name: String,

    /// Attributes in output order.
    pub attributes: Vec<(String, String)>,

    /// Text content; empty text is not emitted.
    pub text: Option<String>,

    /// Child elements in output order.
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing an existing value of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Find the first child with the given tag name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Write this element and its descendants.
    pub fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        let text = self.text.as_deref().filter(|t| !t.is_empty());

        if text.is_none() && self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;

        Ok(())
    }

    /// Render as an indented XML fragment with a trailing newline.
    ///
    /// # Examples
    /// ```
    /// use wtfamily_gramps_etl::xml::Element;
    ///
    /// let place = Element::new("place").with_attribute("hlink", "_h1");
    /// assert_eq!(place.to_pretty_string().unwrap(), "<place hlink=\"_h1\"/>\n");
    /// ```
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write(&mut writer)?;
        Ok(finish(writer))
    }
}

/// Render a complete XML document: declaration, DOCTYPE and root element.
pub fn render_document(root: &Element, doctype: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped(doctype)))?;
    root.write(&mut writer)?;
    Ok(finish(writer))
}

fn finish(writer: Writer<Vec<u8>>) -> String {
    let mut output = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_rendering() {
        let cafe = Element::new("green-midget-cafe")
            .with_attribute("place", "Bromley")
            .with_child(Element::new("visitor").with_text("Viking"))
            .with_child(Element::new("dish").with_attribute("base", "bacon").with_text("spam"));

        let expected = "<green-midget-cafe place=\"Bromley\">\n  <visitor>Viking</visitor>\n  <dish base=\"bacon\">spam</dish>\n</green-midget-cafe>\n";
        assert_eq!(cafe.to_pretty_string().unwrap(), expected);
    }

    #[test]
    fn test_empty_text_is_self_closing() {
        let el = Element::new("first").with_text("");
        assert_eq!(el.to_pretty_string().unwrap(), "<first/>\n");
    }

    #[test]
    fn test_set_attribute_replaces() {
        let mut el = Element::new("childref").with_attribute("hlink", "old");
        el.set_attribute("hlink", "new");
        assert_eq!(el.attributes.len(), 1);
        assert_eq!(el.attribute("hlink"), Some("new"));
    }

    #[test]
    fn test_render_document_prolog() {
        let root = Element::new("database");
        let doc = render_document(&root, "database PUBLIC \"-//Test//EN\" \"test.dtd\"").unwrap();

        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(doc.contains("<!DOCTYPE database PUBLIC \"-//Test//EN\" \"test.dtd\">\n"));
        assert!(doc.ends_with("<database/>\n"));
    }
}
