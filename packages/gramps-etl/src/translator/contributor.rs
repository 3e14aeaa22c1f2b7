//! Contributor extension point.

use roxmltree::Node;

use crate::error::Result;
use crate::value::Record;
use crate::xml::Element;

/// Handles tag shapes that do not fit the one-tag-to-one-key model.
///
/// A contributor claims a fixed set of raw child tag names. On import it
/// reads them from the parent element and returns a partial record that is
/// merged into the parent's record. On export it reads the parent record and
/// returns the elements to append.
pub trait Contributor: Send + Sync {
    /// Child tag names this contributor owns.
    fn tag_names(&self) -> &'static [&'static str];

    /// Extract a partial record from the parent element.
    fn from_xml(&self, node: Node<'_, '_>) -> Result<Record>;

    /// Build elements from the parent record.
    fn to_xml(&self, data: &Record) -> Result<Vec<Element>>;
}
