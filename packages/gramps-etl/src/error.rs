//! Error types for the Gramps XML translator.
//!
//! A single `EtlError` enum covers the translation engine, the reference
//! resolver and the import/export pipeline around it. Messages carry the
//! offending tag, value or count so a failed batch can be diagnosed from
//! the log alone.

use thiserror::Error;

/// Main error type for the ETL library.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Outgoing child tag count does not satisfy the declared cardinality.
    #[error("Expected {expected} for {translator}, got {actual}")]
    Cardinality {
        expected: &'static str,
        translator: String,
        actual: usize,
    },

    /// A record or list was supplied where a scalar attribute is expected.
    #[error("Deep structures must be serialized as tags, not attributes: {value}")]
    DeepStructure { value: String },

    /// Handle or id has no counterpart in the resolver map.
    #[error("No {to} known for {from} '{key}'")]
    UnresolvedReference {
        from: &'static str,
        to: &'static str,
        key: String,
    },

    /// Reference element or record lacks its pointer field.
    #[error("<{tag}>: reference has no '{field}' field")]
    MissingReference { tag: String, field: &'static str },

    /// Reference pointer is not a string.
    #[error("<{tag}>: {field} must be a string, got {found}: {value}")]
    NonStringReference {
        tag: String,
        field: &'static str,
        found: &'static str,
        value: String,
    },

    /// Element text value is not a string.
    #[error("<{tag}>: expected string, got {found}: {value}")]
    NonStringText {
        tag: String,
        found: &'static str,
        value: String,
    },

    /// Translator needs a record but got something else.
    #[error("<{tag}>: expected record, got {found}: {value}")]
    ExpectedRecord {
        tag: String,
        found: &'static str,
        value: String,
    },

    /// Attribute text cannot be converted to its declared type.
    #[error("<{tag}>: invalid {expected} value '{value}' for attribute '{attr}'")]
    InvalidAttrValue {
        tag: String,
        attr: String,
        expected: &'static str,
        value: String,
    },

    /// Enumerated text tag holds a value outside its allowed set.
    #[error("<{tag}>: expected one of {allowed:?}, got '{value}'")]
    DisallowedValue {
        tag: String,
        allowed: Vec<&'static str>,
        value: String,
    },

    /// Native date record cannot be expressed as a Gramps date tag.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Translated record failed schema validation.
    #[error("Schema violation in {entity} '{id}': {reason}\n{record}")]
    SchemaViolation {
        entity: String,
        id: String,
        reason: String,
        record: String,
    },

    /// Input file is neither gzip nor plain XML.
    #[error("File {0} is neither a plain nor a gzipped XML file")]
    NotGrampsXml(String),

    /// Document root is not in a Gramps XML namespace.
    #[error("Unsupported XML namespace: '{0}'. Expected http://gramps-project.org/xml/X.Y.Z/")]
    UnsupportedNamespace(String),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// XML writing failed.
    #[error("XML writing failed: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type alias for ETL operations.
pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_display() {
        let err = EtlError::Cardinality {
            expected: "one value",
            translator: "Text".to_string(),
            actual: 0,
        };
        assert_eq!(err.to_string(), "Expected one value for Text, got 0");
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = EtlError::UnresolvedReference {
            from: "handle",
            to: "id",
            key: "_a1b2".to_string(),
        };
        assert_eq!(err.to_string(), "No id known for handle '_a1b2'");
    }

    #[test]
    fn test_deep_structure_display() {
        let err = EtlError::DeepStructure {
            value: "{hello: 123}".to_string(),
        };
        assert!(err
            .to_string()
            .contains("Deep structures must be serialized as tags, not attributes"));
        assert!(err.to_string().contains("{hello: 123}"));
    }
}
