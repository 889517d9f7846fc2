//! Filter key parsing.
//!
//! A filter key is a field name joined to a predicate token with an
//! underscore: `price_gte`, `name_not_sw`. Field names may contain
//! underscores themselves, so a key can admit several splits. Candidates are
//! tried longest token first and the first one naming a filterable field
//! wins.

use crate::error::{FinderError, Result};
use crate::predicate::{self, Predicate};

/// A filter key split into its field and predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedKey<'k> {
    pub field: &'k str,
    pub predicate: Predicate,
}

/// Every grammatical split of `key`, longest predicate token first.
///
/// This only looks at the token table; it does not know which fields exist.
pub fn candidates(key: &str) -> impl Iterator<Item = ParsedKey<'_>> {
    predicate::tokens().filter_map(move |(token, predicate)| {
        let field = key.strip_suffix(token)?.strip_suffix('_')?;
        (!field.is_empty()).then_some(ParsedKey { field, predicate })
    })
}

/// Parses filter keys against a set of filterable fields.
#[derive(Debug, Clone, Copy)]
pub struct FilterKeyParser<'f> {
    fields: &'f [String],
}

impl<'f> FilterKeyParser<'f> {
    pub fn new(fields: &'f [String]) -> Self {
        FilterKeyParser { fields }
    }

    /// Splits `key` into a declared field and a registered predicate.
    ///
    /// Fails with [`FinderError::InvalidFilterKey`] when no token suffix
    /// matches, and with [`FinderError::UnknownField`] when no candidate
    /// names a declared field.
    ///
    /// ```
    /// use strainer::{FilterKeyParser, PredicateKind};
    ///
    /// let fields = vec!["name".to_string(), "price".to_string()];
    /// let parser = FilterKeyParser::new(&fields);
    ///
    /// let parsed = parser.parse("name_not_eq").unwrap();
    /// assert_eq!(parsed.field, "name");
    /// assert_eq!(parsed.predicate.kind, PredicateKind::Equals);
    /// assert!(parsed.predicate.negated);
    /// ```
    pub fn parse<'k>(&self, key: &'k str) -> Result<ParsedKey<'k>> {
        let mut longest = None;

        for candidate in candidates(key) {
            if self.is_filterable(candidate.field) {
                tracing::debug!(
                    key,
                    field = candidate.field,
                    predicate = %candidate.predicate,
                    "parsed filter key"
                );
                return Ok(candidate);
            }
            longest.get_or_insert(candidate);
        }

        match longest {
            Some(candidate) => Err(FinderError::UnknownField {
                field: candidate.field.to_string(),
                key: key.to_string(),
            }),
            None => Err(FinderError::InvalidFilterKey {
                key: key.to_string(),
            }),
        }
    }

    /// Returns `true` if `field` was declared filterable.
    pub fn is_filterable(&self, field: &str) -> bool {
        self.fields.iter().any(|declared| declared == field)
    }
}
