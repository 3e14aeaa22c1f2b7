//! Cardinality quantifiers for nested tags.

use std::sync::Arc;

use super::spec::TagSpec;
use crate::error::{EtlError, Result};
use crate::value::Value;

/// How many occurrences of a child tag are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one.
    One,
    /// Zero or one.
    MaybeOne,
    /// At least one.
    OneOrMore,
    /// Any number.
    MaybeMany,
}

impl Cardinality {
    /// Single-valued tags are stored as a scalar, the rest as a list.
    #[must_use]
    pub fn is_single_value(self) -> bool {
        matches!(self, Self::One | Self::MaybeOne)
    }

    /// Human-readable constraint used in error messages.
    #[must_use]
    pub fn expectation(self) -> &'static str {
        match self {
            Self::One => "one value",
            Self::MaybeOne => "0..1 values",
            Self::OneOrMore => "1..n values",
            Self::MaybeMany => "0..n values",
        }
    }

    /// Check whether `count` occurrences satisfy this cardinality.
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::One => count == 1,
            Self::MaybeOne => count <= 1,
            Self::OneOrMore => count >= 1,
            Self::MaybeMany => true,
        }
    }
}

/// A nested translator wrapped with its cardinality.
///
/// Quantifiers take no part in translation itself; the parent spec calls
/// [`Quantifier::validate`] right before emitting each group of child tags.
#[derive(Debug, Clone)]
pub struct Quantifier {
    pub cardinality: Cardinality,
    pub translator: Arc<TagSpec>,
}

impl Quantifier {
    #[must_use]
    pub fn new(cardinality: Cardinality, translator: Arc<TagSpec>) -> Self {
        Self {
            cardinality,
            translator,
        }
    }

    #[must_use]
    pub fn one(translator: Arc<TagSpec>) -> Self {
        Self::new(Cardinality::One, translator)
    }

    #[must_use]
    pub fn maybe_one(translator: Arc<TagSpec>) -> Self {
        Self::new(Cardinality::MaybeOne, translator)
    }

    #[must_use]
    pub fn one_or_more(translator: Arc<TagSpec>) -> Self {
        Self::new(Cardinality::OneOrMore, translator)
    }

    #[must_use]
    pub fn maybe_many(translator: Arc<TagSpec>) -> Self {
        Self::new(Cardinality::MaybeMany, translator)
    }

    /// Check the number of values against the cardinality.
    pub fn validate(&self, values: &[&Value]) -> Result<()> {
        if self.cardinality.accepts(values.len()) {
            return Ok(());
        }
        Err(EtlError::Cardinality {
            expected: self.cardinality.expectation(),
            translator: self.translator.name.clone(),
            actual: values.len(),
        })
    }
}
