//! Declared result ordering.
//!
//! The engine never reorders results itself. Adapters own ordering; the
//! in-memory adapter takes a list of [`OrderBy`] clauses at construction and
//! sorts with them, stably.

use std::cmp::Ordering;

use crate::traits::Filterable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering clause: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Dir,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Compares two values according to this clause.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.dir.apply(compare_values(a, b))
    }
}

/// Total order over field values.
///
/// Values of one type compare naturally, with NaN after every other number.
/// Values of different types are ranked by type: bool, number, string,
/// timestamp. Null values sort last.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Timestamp(_) => 3,
        Value::None => 4,
    }
}

/// Compares two entities clause by clause.
pub fn compare_entities<T: Filterable>(a: &T, b: &T, orderings: &[OrderBy]) -> Ordering {
    orderings
        .iter()
        .map(|order_by| {
            order_by.compare(&a.field_value(&order_by.field), &b.field_value(&order_by.field))
        })
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};

    struct Row {
        name: &'static str,
        price: i64,
    }

    impl Filterable for Row {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(self.name),
                "price" => Value::Number(Number::I64(self.price)),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn nulls_sort_last() {
        let some = Value::String("a");
        assert_eq!(compare_values(&Value::None, &some), Ordering::Greater);
        assert_eq!(compare_values(&some, &Value::None), Ordering::Less);
        assert_eq!(compare_values(&Value::None, &Value::None), Ordering::Equal);
    }

    #[test]
    fn mismatched_types_rank_by_type() {
        let s = Value::String("test");
        let n = Value::Number(Number::I64(42));
        let t = Value::Timestamp(Timestamp(0));
        assert_eq!(compare_values(&s, &n), Ordering::Greater);
        assert_eq!(compare_values(&n, &s), Ordering::Less);
        assert_eq!(compare_values(&t, &s), Ordering::Greater);
        assert_eq!(compare_values(&Value::Bool(true), &n), Ordering::Less);
    }

    #[test]
    fn nan_sorts_after_numbers_before_null() {
        let nan = Value::Number(Number::F64(f64::NAN));
        let one = Value::Number(Number::I64(1));
        assert_eq!(compare_values(&nan, &one), Ordering::Greater);
        assert_eq!(compare_values(&one, &nan), Ordering::Less);
        assert_eq!(compare_values(&nan, &nan), Ordering::Equal);
        assert_eq!(compare_values(&nan, &Value::None), Ordering::Less);
    }

    #[test]
    fn desc_reverses() {
        let a = Value::Number(Number::I64(1));
        let b = Value::Number(Number::I64(2));
        assert_eq!(OrderBy::asc("x").compare(&a, &b), Ordering::Less);
        assert_eq!(OrderBy::desc("x").compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn later_clauses_break_ties() {
        let a = Row { name: "b", price: 1 };
        let b = Row { name: "a", price: 1 };
        let c = Row { name: "a", price: 2 };
        let orderings = vec![OrderBy::asc("price"), OrderBy::asc("name")];

        assert_eq!(compare_entities(&a, &b, &orderings), Ordering::Greater);
        assert_eq!(compare_entities(&b, &c, &orderings), Ordering::Less);
        assert_eq!(compare_entities(&a, &a, &orderings), Ordering::Equal);
    }
}
