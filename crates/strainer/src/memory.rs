//! In-memory adapter over a vector of entities.

use std::sync::Arc;

use crate::adapter::Adapter;
use crate::error::Result;
use crate::ordering::{compare_entities, OrderBy};
use crate::predicate::{Predicate, PredicateKind};
use crate::traits::Filterable;
use crate::value::Operand;

/// Adapter filtering a `Vec<T>` held in memory.
///
/// Results come back in insertion order unless an ordering is declared with
/// [`order_by`](Self::order_by); sorting is stable either way.
///
/// ```
/// use strainer::{Adapter, MemoryAdapter, Number, PredicateKind, Filterable, Value};
///
/// #[derive(Clone)]
/// struct Product { price: u32 }
///
/// impl Filterable for Product {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "price" => Value::Number(Number::from(self.price)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let adapter = MemoryAdapter::new(vec![Product { price: 10 }, Product { price: 20 }]);
/// let query = adapter
///     .apply_constraint(adapter.base_query(), "price", PredicateKind::GreaterThan, &15.into(), false)
///     .unwrap();
/// assert_eq!(adapter.execute(query).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryAdapter<T> {
    items: Vec<T>,
    ordering: Vec<OrderBy>,
}

impl<T> MemoryAdapter<T> {
    pub fn new(items: Vec<T>) -> Self {
        MemoryAdapter {
            items,
            ordering: Vec::new(),
        }
    }

    /// Declares an ordering clause. Clauses apply in declaration order.
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.ordering.push(order_by);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.ordering
    }
}

type EntityFilter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// One constraint recorded by [`MemoryAdapter::apply_constraint`].
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub field: String,
    pub predicate: Predicate,
    pub value: Operand,
}

/// Query handle of [`MemoryAdapter`].
///
/// Holds predicate constraints, arbitrary entity filters added by ad-hoc
/// filters, and an optional result window.
pub struct MemoryQuery<T> {
    constraints: Vec<Constraint>,
    filters: Vec<EntityFilter<T>>,
    window: Option<(u64, u64)>,
}

impl<T> MemoryQuery<T> {
    fn new() -> Self {
        MemoryQuery {
            constraints: Vec::new(),
            filters: Vec::new(),
            window: None,
        }
    }

    /// ANDs an arbitrary entity test into the query.
    ///
    /// This is the hook ad-hoc filters use:
    ///
    /// ```ignore
    /// config.filter_by("in_stock", |query: MemoryQuery<Product>, _| {
    ///     query.retain(|product| product.stock > 0)
    /// })
    /// ```
    pub fn retain<F>(mut self, filter: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Offset and limit, if the query was paginated.
    pub fn window(&self) -> Option<(u64, u64)> {
        self.window
    }
}

impl<T: Filterable> MemoryQuery<T> {
    /// Tests one entity against every constraint and filter.
    pub fn matches(&self, item: &T) -> Result<bool> {
        for constraint in &self.constraints {
            let value = item.field_value(&constraint.field);
            if !constraint
                .predicate
                .evaluate(&constraint.field, &value, &constraint.value)?
            {
                return Ok(false);
            }
        }
        Ok(self.filters.iter().all(|filter| filter(item)))
    }
}

impl<T> Clone for MemoryQuery<T> {
    fn clone(&self) -> Self {
        MemoryQuery {
            constraints: self.constraints.clone(),
            filters: self.filters.clone(),
            window: self.window,
        }
    }
}

impl<T> std::fmt::Debug for MemoryQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryQuery")
            .field("constraints", &self.constraints)
            .field("filters", &self.filters.len())
            .field("window", &self.window)
            .finish()
    }
}

impl<T: Filterable + Clone> Adapter for MemoryAdapter<T> {
    type Entity = T;
    type Query = MemoryQuery<T>;

    fn base_query(&self) -> MemoryQuery<T> {
        MemoryQuery::new()
    }

    fn apply_constraint(
        &self,
        mut query: MemoryQuery<T>,
        field: &str,
        kind: PredicateKind,
        value: &Operand,
        negated: bool,
    ) -> Result<MemoryQuery<T>> {
        query.constraints.push(Constraint {
            field: field.to_string(),
            predicate: Predicate::new(kind, negated),
            value: value.clone(),
        });
        Ok(query)
    }

    fn paginate(&self, mut query: MemoryQuery<T>, offset: u64, limit: u64) -> Result<MemoryQuery<T>> {
        query.window = Some((offset, limit));
        Ok(query)
    }

    fn execute(&self, query: MemoryQuery<T>) -> Result<Vec<T>> {
        let mut matched = Vec::new();
        for item in &self.items {
            if query.matches(item)? {
                matched.push(item);
            }
        }

        if !self.ordering.is_empty() {
            matched.sort_by(|a, b| compare_entities(*a, *b, &self.ordering));
        }

        let (offset, limit) = query.window.unwrap_or((0, u64::MAX));
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        tracing::debug!(
            scanned = self.items.len(),
            matched = matched.len(),
            offset,
            limit,
            "executed in-memory query"
        );

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinderError;
    use crate::value::{Number, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Task {
        name: String,
        priority: i64,
    }

    impl Filterable for Task {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(&self.name),
                "priority" => Value::Number(Number::I64(self.priority)),
                _ => Value::None,
            }
        }
    }

    fn tasks() -> Vec<Task> {
        [("write", 3), ("fix", 5), ("ship", 1), ("test", 5)]
            .into_iter()
            .map(|(name, priority)| Task {
                name: name.to_string(),
                priority,
            })
            .collect()
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.name.as_str()).collect()
    }

    #[test]
    fn base_query_returns_everything_in_insertion_order() {
        let adapter = MemoryAdapter::new(tasks());
        let results = adapter.execute(adapter.base_query()).unwrap();
        assert_eq!(names(&results), vec!["write", "fix", "ship", "test"]);
    }

    #[test]
    fn constraints_are_anded() {
        let adapter = MemoryAdapter::new(tasks());
        let query = adapter
            .apply_constraint(
                adapter.base_query(),
                "priority",
                PredicateKind::GreaterOrEqual,
                &3.into(),
                false,
            )
            .and_then(|q| {
                adapter.apply_constraint(q, "name", PredicateKind::Equals, &"fix".into(), true)
            })
            .unwrap();

        assert_eq!(query.constraints().len(), 2);
        let results = adapter.execute(query).unwrap();
        assert_eq!(names(&results), vec!["write", "test"]);
    }

    #[test]
    fn declared_ordering_is_stable() {
        let adapter = MemoryAdapter::new(tasks()).order_by(OrderBy::desc("priority"));
        let results = adapter.execute(adapter.base_query()).unwrap();
        assert_eq!(names(&results), vec!["fix", "test", "write", "ship"]);
    }

    #[derive(Debug, Clone)]
    struct Reading {
        value: f64,
    }

    impl Filterable for Reading {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "value" => Value::Number(Number::F64(self.value)),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn ordering_with_nan_values_is_total() {
        let readings: Vec<Reading> = (0..200)
            .map(|i| Reading {
                value: if i % 3 == 0 { f64::NAN } else { f64::from((i * 37) % 101) },
            })
            .collect();
        let adapter = MemoryAdapter::new(readings).order_by(OrderBy::asc("value"));
        let results = adapter.execute(adapter.base_query()).unwrap();
        assert_eq!(results.len(), 200);

        let values: Vec<f64> = results.iter().map(|r| r.value).collect();
        let split = values.iter().position(|v| v.is_nan()).unwrap();
        assert!(values[..split].windows(2).all(|w| w[0] <= w[1]));
        assert!(values[split..].iter().all(|v| v.is_nan()));
        assert_eq!(values.len() - split, 67);
    }

    #[test]
    fn retain_adds_entity_filters() {
        let adapter = MemoryAdapter::new(tasks());
        let query = adapter.base_query().retain(|task: &Task| task.name.len() == 4);
        let results = adapter.execute(query).unwrap();
        assert_eq!(names(&results), vec!["ship", "test"]);
    }

    #[test]
    fn pagination_window() {
        let adapter = MemoryAdapter::new(tasks());
        let query = adapter.paginate(adapter.base_query(), 1, 2).unwrap();
        assert_eq!(query.window(), Some((1, 2)));
        let results = adapter.execute(query).unwrap();
        assert_eq!(names(&results), vec!["fix", "ship"]);

        let query = adapter.paginate(adapter.base_query(), 10, 2).unwrap();
        assert!(adapter.execute(query).unwrap().is_empty());
    }

    #[test]
    fn type_mismatch_surfaces_from_execution() {
        let adapter = MemoryAdapter::new(tasks());
        let query = adapter
            .apply_constraint(
                adapter.base_query(),
                "name",
                PredicateKind::LessThan,
                &10.into(),
                false,
            )
            .unwrap();

        let err = adapter.execute(query).unwrap_err();
        assert!(matches!(err, FinderError::TypeMismatch { field, .. } if field == "name"));
    }
}
