//! Query composition.
//!
//! Parameters are first turned into a [`FilterSet`], which parses and checks
//! every key up front. Only a fully valid set is folded into a query, so a
//! malformed key never reaches the adapter.

use crate::adapter::Adapter;
use crate::error::Result;
use crate::key::FilterKeyParser;
use crate::params::FilterParams;
use crate::predicate::{Predicate, PredicateKind};
use crate::value::Operand;

/// One predicate-derived filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub field: String,
    pub predicate: PredicateKind,
    pub negated: bool,
    pub value: Operand,
}

impl FilterSpec {
    /// Builds a filter, rejecting operands the predicate cannot use.
    pub fn new(field: impl Into<String>, predicate: Predicate, value: Operand) -> Result<Self> {
        let field = field.into();
        predicate.kind.check_operand(&field, &value)?;
        Ok(FilterSpec {
            field,
            predicate: predicate.kind,
            negated: predicate.negated,
            value,
        })
    }

    /// The kind and negation flag as a registered predicate.
    pub fn as_predicate(&self) -> Predicate {
        Predicate::new(self.predicate, self.negated)
    }
}

/// A caller-supplied query transform bound to a field name.
pub type FilterFn<Q> = Box<dyn Fn(Q, &Operand) -> Q + Send + Sync>;

/// Ad-hoc filters keyed by field name, in registration order.
pub struct AdHocFilters<Q> {
    entries: Vec<(String, FilterFn<Q>)>,
}

impl<Q> AdHocFilters<Q> {
    pub fn new() -> Self {
        AdHocFilters {
            entries: Vec::new(),
        }
    }

    /// Registers `filter` for `field`. A later registration for the same
    /// field replaces the earlier one and keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, filter: FilterFn<Q>) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = filter,
            None => self.entries.push((field, filter)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FilterFn<Q>> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, filter)| filter)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Registered field names, in registration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Q> Default for AdHocFilters<Q> {
    fn default() -> Self {
        AdHocFilters::new()
    }
}

impl<Q> std::fmt::Debug for AdHocFilters<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.fields()).finish()
    }
}

/// The parsed filters of one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    specs: Vec<FilterSpec>,
    ad_hoc: Vec<(String, Operand)>,
}

impl FilterSet {
    /// Parses `params` into a filter set.
    ///
    /// Keys naming a registered ad-hoc filter are taken verbatim. Every
    /// other key must parse as `field_predicate` over `fields`. Ad-hoc
    /// entries are kept in registration order; predicate filters are grouped
    /// by the first appearance of their field in `params`.
    pub fn build<Q>(
        params: &FilterParams,
        fields: &[String],
        ad_hoc: &AdHocFilters<Q>,
    ) -> Result<Self> {
        let parser = FilterKeyParser::new(fields);
        let mut specs = Vec::new();

        for (key, value) in params.iter() {
            if ad_hoc.contains(key) {
                continue;
            }
            let parsed = parser.parse(key)?;
            specs.push(FilterSpec::new(parsed.field, parsed.predicate, value.clone())?);
        }

        let mut first_seen: Vec<String> = Vec::new();
        for spec in &specs {
            if !first_seen.contains(&spec.field) {
                first_seen.push(spec.field.clone());
            }
        }
        // Stable, so filters on one field keep their parameter order.
        specs.sort_by_key(|spec| first_seen.iter().position(|field| *field == spec.field));

        let ad_hoc = ad_hoc
            .fields()
            .filter_map(|field| params.get(field).map(|value| (field.to_string(), value.clone())))
            .collect();

        Ok(FilterSet { specs, ad_hoc })
    }

    /// Predicate-derived filters, in application order.
    pub fn specs(&self) -> &[FilterSpec] {
        &self.specs
    }

    /// Ad-hoc filters that apply, with their raw operands.
    pub fn ad_hoc(&self) -> &[(String, Operand)] {
        &self.ad_hoc
    }

    /// Returns `true` if an ad-hoc filter handles `field` in this set.
    pub fn handles(&self, field: &str) -> bool {
        self.ad_hoc.iter().any(|(name, _)| name == field)
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty() && self.ad_hoc.is_empty()
    }
}

/// Folds `set` into `base`, one refinement per filter.
///
/// Ad-hoc filters run first. Predicate filters follow, skipping any field an
/// ad-hoc filter already handled.
pub fn compose<A: Adapter>(
    adapter: &A,
    base: A::Query,
    set: &FilterSet,
    ad_hoc: &AdHocFilters<A::Query>,
) -> Result<A::Query> {
    let mut query = base;

    for (field, value) in set.ad_hoc() {
        if let Some(filter) = ad_hoc.get(field) {
            tracing::debug!(field = %field, value = ?value, "applying ad-hoc filter");
            query = filter(query, value);
        }
    }

    for spec in set.specs() {
        if set.handles(&spec.field) {
            tracing::debug!(
                field = %spec.field,
                predicate = %spec.as_predicate(),
                "skipping predicate filter, field handled by ad-hoc filter"
            );
            continue;
        }
        tracing::debug!(
            field = %spec.field,
            predicate = %spec.as_predicate(),
            value = ?spec.value,
            "applying predicate filter"
        );
        query = adapter.apply_constraint(query, &spec.field, spec.predicate, &spec.value, spec.negated)?;
    }

    Ok(query)
}
