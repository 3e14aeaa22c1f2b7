//! Declarative GrampsXML ⇄ native record translators.
//!
//! A [`TagSpec`] describes one element: typed attributes, cardinality-wrapped
//! child tags, text handling and optional [`Contributor`]s for shapes that
//! do not map one tag to one key. A single generic engine interprets every
//! spec in both directions. Entity specs are collected in a
//! [`TranslatorRegistry`].

mod cardinality;
mod contributor;
mod date;
mod engine;
pub mod entities;
mod registry;
mod spec;

pub use cardinality::{Cardinality, Quantifier};
pub use contributor::Contributor;
pub use date::{DateContributor, DateModifier, DateQuality, DATE_KEY};
pub use engine::ID_KEY;
pub use registry::{create_gramps_registry, TranslatorRegistry};
pub use spec::{serialize_attr_value, AttrType, TagSpec, TextMode, HLINK_ATTR};
