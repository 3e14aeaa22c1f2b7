//! WTFamily Gramps ETL - Translate Gramps XML to native records and back.
//!
//! This crate converts Gramps XML 1.7.1 documents (plain or gzipped) into
//! native records keyed by stable public ids, and renders those records back
//! into Gramps XML. Cross-references are rewritten between Gramps handles
//! and public ids in both directions.
//!
//! # Example
//!
//! ```
//! use roxmltree::Document;
//! use wtfamily_gramps_etl::resolver::ReferenceMap;
//! use wtfamily_gramps_etl::translator::entities;
//!
//! let doc = Document::parse(r#"<place hlink="h1"/>"#).unwrap();
//! let handle_to_id = ReferenceMap::handles_to_ids([("h1", "P001")]);
//!
//! let spec = entities::place_ref();
//! let value = spec.from_xml(doc.root_element(), &handle_to_id).unwrap();
//! let element = spec.to_xml("place", &value, &handle_to_id.inverse()).unwrap();
//!
//! assert_eq!(element.attribute("hlink"), Some("h1"));
//! ```
//!
//! # Architecture
//!
//! - [`value`]: Native record model
//! - [`translator`]: Declarative tag specs and the generic translation engine
//! - [`resolver`]: Handle ⇄ id maps
//! - [`entity`]: Entity kinds and their XML group/item tags
//! - [`schema`]: Validation of translated records
//! - [`store`]: Storage for native records (memory, YAML)
//! - [`etl`]: Extract/transform/load pipeline and export
//! - [`xml`]: XML reading and writing utilities
//! - [`config`]: Constants and namespace validation
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod etl;
mod files;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod translator;
pub mod value;
pub mod xml;

// Re-export main functions
pub use etl::{export_gramps_xml, import_gramps_xml, write_gramps_xml, ImportSummary};

// Re-export commonly used items
pub use entity::EntityKind;
pub use error::{EtlError, Result};
pub use resolver::{Direction, ReferenceMap};
pub use store::{Dataset, MemoryStore, Store, YamlStore};
pub use translator::{create_gramps_registry, TagSpec, TranslatorRegistry};
pub use value::{Record, Value};
