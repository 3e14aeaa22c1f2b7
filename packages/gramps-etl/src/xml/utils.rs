//! XML utility functions for navigating Gramps DOM trees.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::Result;

/// Parse an XML document, allowing the DOCTYPE every Gramps file carries.
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(text, options)?)
}

/// Get the tag name without namespace.
///
/// Gramps XML puts every element in the default namespace
/// (`http://gramps-project.org/xml/1.7.1/`); translators only care about
/// the local name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use wtfamily_gramps_etl::xml::get_tag_name;
///
/// let xml = r#"<database xmlns="http://gramps-project.org/xml/1.7.1/"><people/></database>"#;
/// let doc = Document::parse(xml).unwrap();
/// let people = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(people), "people");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use wtfamily_gramps_etl::xml::find_child;
///
/// let xml = r#"<event><type>Birth</type><dateval val="1855"/></event>"#;
/// let doc = Document::parse(xml).unwrap();
/// let event = doc.root_element();
///
/// assert!(find_child(event, "dateval").is_some());
/// assert!(find_child(event, "datespan").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Get all element children of a node.
///
/// Excludes text nodes (including indentation), comments and processing
/// instructions.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get the direct text content of an element, if any.
pub fn get_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text()
}

/// Short description of an element for diagnostics, e.g. `<person id="I0001">`.
pub fn describe_element(node: Node<'_, '_>) -> String {
    let tag = get_tag_name(node);
    match (node.attribute("id"), node.attribute("handle")) {
        (Some(id), _) => format!("<{tag} id=\"{id}\">"),
        (None, Some(handle)) => format!("<{tag} handle=\"{handle}\">"),
        (None, None) => format!("<{tag}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_with_doctype() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE database PUBLIC "-//Gramps//DTD Gramps XML 1.7.1//EN"
"http://gramps-project.org/xml/1.7.1/grampsxml.dtd">
<database xmlns="http://gramps-project.org/xml/1.7.1/"/>"#;

        let doc = parse_document(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "database");
        assert!(parse_document("<unclosed>").is_err());
    }

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<g:database xmlns:g="http://gramps-project.org/xml/1.7.1/"><g:people/></g:database>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "database");
    }

    #[test]
    fn test_find_children() {
        let xml = r#"<family><childref hlink="a"/><father hlink="b"/><childref hlink="c"/></family>"#;
        let doc = Document::parse(xml).unwrap();

        let children: Vec<_> = find_children(doc.root_element(), "childref").collect();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_element_children_skips_text() {
        let xml = "<person>\n  <gender>F</gender>\n  <name/>\n</person>";
        let doc = Document::parse(xml).unwrap();

        let children: Vec<_> = element_children(doc.root_element()).collect();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_describe_element() {
        let xml = r#"<people><person handle="_h1" id="I0001"/><person handle="_h2"/><map/></people>"#;
        let doc = Document::parse(xml).unwrap();
        let described: Vec<_> = element_children(doc.root_element())
            .map(describe_element)
            .collect();

        assert_eq!(
            described,
            vec![
                r#"<person id="I0001">"#.to_string(),
                r#"<person handle="_h2">"#.to_string(),
                "<map>".to_string(),
            ]
        );
    }
}
