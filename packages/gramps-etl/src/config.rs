//! Configuration constants and namespace validation.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{EtlError, Result};

/// Gramps XML version produced on export.
pub const GRAMPS_XML_VERSION: &str = "1.7.1";

/// Default namespace of Gramps XML 1.7.1 documents.
pub const GRAMPS_NAMESPACE: &str = "http://gramps-project.org/xml/1.7.1/";

/// Public identifier of the Gramps XML DTD.
pub const GRAMPS_DTD_PUBLIC_ID: &str = "-//Gramps//DTD Gramps XML 1.7.1//EN";

/// System identifier of the Gramps XML DTD.
pub const GRAMPS_DTD_URL: &str = "http://gramps-project.org/xml/1.7.1/grampsxml.dtd";

/// Generator name written to the export header.
pub const APP_NAME: &str = "WTFamily";

/// First two bytes of a gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Store file used when `--store` is not given.
pub const DEFAULT_STORE_PATH: &str = "wtfamily.yaml";

/// Gramps namespace pattern: http://gramps-project.org/xml/X.Y.Z/
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NAMESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^http://gramps-project\.org/xml/(\d+\.\d+\.\d+)/$").expect("valid regex")
});

/// Extract the version from a Gramps namespace URI.
///
/// # Examples
/// ```
/// use wtfamily_gramps_etl::config::parse_namespace_version;
///
/// assert_eq!(
///     parse_namespace_version("http://gramps-project.org/xml/1.7.1/"),
///     Some("1.7.1")
/// );
/// assert_eq!(parse_namespace_version("http://example.com/"), None);
/// ```
pub fn parse_namespace_version(namespace: &str) -> Option<&str> {
    NAMESPACE_PATTERN
        .captures(namespace)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Validate that a namespace URI belongs to Gramps XML.
///
/// Returns the version. Versions other than [`GRAMPS_XML_VERSION`] are
/// accepted with a warning.
pub fn validate_namespace(namespace: &str) -> Result<&str> {
    let version = parse_namespace_version(namespace)
        .ok_or_else(|| EtlError::UnsupportedNamespace(namespace.to_string()))?;

    if version != GRAMPS_XML_VERSION {
        tracing::warn!(
            found = %version,
            expected = %GRAMPS_XML_VERSION,
            "Gramps XML version differs, translating anyway"
        );
    }

    Ok(version)
}

/// DOCTYPE declaration body for exported files.
#[must_use]
pub fn gramps_doctype() -> String {
    format!("database PUBLIC \"{GRAMPS_DTD_PUBLIC_ID}\" \"{GRAMPS_DTD_URL}\"")
}
