//! The adapter seam between the engine and a data source.

use crate::error::Result;
use crate::predicate::PredicateKind;
use crate::value::Operand;

/// A queryable data source.
///
/// The engine never inspects a [`Query`](Adapter::Query): it asks the
/// adapter for a base query, refines it one constraint at a time, and hands
/// the result back for execution. Each refinement consumes the previous
/// query and returns a new one.
///
/// An adapter stands for one entity type. [`MemoryAdapter`] is the in-memory
/// implementation; a relational backend would translate `sw`/`ew`/`cont` to
/// pattern matches, ordering kinds to range tests, and `blank` to a
/// null-or-empty test.
///
/// [`MemoryAdapter`]: crate::MemoryAdapter
pub trait Adapter {
    /// The records this adapter returns.
    type Entity;

    /// Accumulating query handle.
    type Query;

    /// A query selecting every entity.
    fn base_query(&self) -> Self::Query;

    /// ANDs `field <kind> value` (or its negation) into `query`.
    fn apply_constraint(
        &self,
        query: Self::Query,
        field: &str,
        kind: PredicateKind,
        value: &Operand,
        negated: bool,
    ) -> Result<Self::Query>;

    /// Restricts `query` to a window of its results.
    fn paginate(&self, query: Self::Query, offset: u64, limit: u64) -> Result<Self::Query>;

    /// Runs `query`, returning entities in the adapter's declared order.
    fn execute(&self, query: Self::Query) -> Result<Vec<Self::Entity>>;
}
