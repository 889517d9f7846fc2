//! Predicate registry.
//!
//! A filter key ends with a predicate token (`eq`, `not_sw`, `gte`, ...).
//! The registry maps each token to a [`Predicate`]: a [`PredicateKind`]
//! plus a negation flag. Every `not_X` token shares the comparison of `X`
//! and inverts its outcome, so opposite tokens always select complementary
//! records.
//!
//! Evaluation is three-valued. A null field makes every comparison except
//! [`PredicateKind::Blank`] and equality with a null operand unknown, and an
//! unknown outcome stays unknown under negation. Records are kept only when the outcome is definitely
//! true, the same way a relational backend treats `NULL`.

use std::cmp::Ordering;

use crate::error::{FinderError, Result};
use crate::value::{Number, Operand, Value};

/// Comparison semantics of a predicate token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// `f == v`
    Equals,
    /// `f` starts with string `v`.
    StartsWith,
    /// `f` ends with string `v`.
    EndsWith,
    /// `f` contains substring `v`.
    Contains,
    /// `f < v`
    LessThan,
    /// `f <= v`
    LessOrEqual,
    /// `f > v`
    GreaterThan,
    /// `f >= v`
    GreaterOrEqual,
    /// `f` is null or a zero-length string.
    Blank,
}

impl PredicateKind {
    /// All kinds, in registry order.
    pub const ALL: [PredicateKind; 9] = [
        PredicateKind::Equals,
        PredicateKind::StartsWith,
        PredicateKind::EndsWith,
        PredicateKind::Contains,
        PredicateKind::LessThan,
        PredicateKind::LessOrEqual,
        PredicateKind::GreaterThan,
        PredicateKind::GreaterOrEqual,
        PredicateKind::Blank,
    ];

    /// Every kind can be negated with a `not_` token.
    pub fn negatable(self) -> bool {
        true
    }

    /// The positive token for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            PredicateKind::Equals => "eq",
            PredicateKind::StartsWith => "sw",
            PredicateKind::EndsWith => "ew",
            PredicateKind::Contains => "cont",
            PredicateKind::LessThan => "lt",
            PredicateKind::LessOrEqual => "lte",
            PredicateKind::GreaterThan => "gt",
            PredicateKind::GreaterOrEqual => "gte",
            PredicateKind::Blank => "blank",
        }
    }

    /// Returns `true` for `lt`, `lte`, `gt` and `gte`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            PredicateKind::LessThan
                | PredicateKind::LessOrEqual
                | PredicateKind::GreaterThan
                | PredicateKind::GreaterOrEqual
        )
    }

    /// Returns `true` for the string pattern kinds (`sw`, `ew`, `cont`).
    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            PredicateKind::StartsWith | PredicateKind::EndsWith | PredicateKind::Contains
        )
    }

    /// Checks that `operand` is usable with this kind before any query runs.
    pub fn check_operand(self, field: &str, operand: &Operand) -> Result<()> {
        let expected = if self.is_pattern() {
            "string"
        } else if self.is_ordering() {
            "string, number or timestamp"
        } else {
            return Ok(());
        };

        let ok = match operand {
            Operand::String(_) => true,
            Operand::Number(_) | Operand::Timestamp(_) => self.is_ordering(),
            Operand::Null | Operand::Bool(_) => false,
        };

        if ok {
            Ok(())
        } else {
            Err(self.mismatch(field, expected, operand.type_name()))
        }
    }

    /// Evaluates this kind against a field value.
    ///
    /// Returns `Ok(None)` when the outcome is unknown (null field, NaN).
    pub fn evaluate(self, field: &str, value: &Value<'_>, operand: &Operand) -> Result<Option<bool>> {
        if self == PredicateKind::Blank {
            return Ok(Some(match value {
                Value::None => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            }));
        }

        // `eq null` is a null test; its negation selects present values.
        if self == PredicateKind::Equals && matches!(operand, Operand::Null) {
            return Ok(Some(value.is_none()));
        }

        if value.is_none() {
            return Ok(None);
        }

        match self {
            PredicateKind::Equals => Ok(Some(equals(value, operand))),
            PredicateKind::StartsWith | PredicateKind::EndsWith | PredicateKind::Contains => {
                let (Some(text), Some(pattern)) = (value.as_str(), operand.as_str()) else {
                    return Err(self.mismatch(field, "string", value.type_name()));
                };
                Ok(Some(match self {
                    PredicateKind::StartsWith => text.starts_with(pattern),
                    PredicateKind::EndsWith => text.ends_with(pattern),
                    _ => text.contains(pattern),
                }))
            }
            _ => {
                let ordering = order(value, operand)
                    .ok_or_else(|| self.mismatch(field, value.type_name(), operand.type_name()))?;
                Ok(ordering.map(|ordering| self.eval_ordering(ordering)))
            }
        }
    }

    fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            PredicateKind::LessThan => ordering == Ordering::Less,
            PredicateKind::LessOrEqual => ordering != Ordering::Greater,
            PredicateKind::GreaterThan => ordering == Ordering::Greater,
            PredicateKind::GreaterOrEqual => ordering != Ordering::Less,
            _ => false,
        }
    }

    fn mismatch(self, field: &str, expected: &'static str, actual: &'static str) -> FinderError {
        FinderError::TypeMismatch {
            field: field.to_string(),
            predicate: self.as_str(),
            expected,
            actual,
        }
    }
}

impl std::fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn equals(value: &Value<'_>, operand: &Operand) -> bool {
    match (value, operand) {
        (Value::String(a), Operand::String(b)) => *a == b.as_str(),
        (Value::Bool(a), Operand::Bool(b)) => a == b,
        (Value::Timestamp(a), Operand::Timestamp(b)) => a == b,
        (Value::Number(_), _) => order(value, operand) == Some(Some(Ordering::Equal)),
        _ => false,
    }
}

/// Orders a field value against an operand.
///
/// The outer `None` means the pair is not mutually ordered; the inner `None`
/// is an unordered numeric pair (NaN).
fn order(value: &Value<'_>, operand: &Operand) -> Option<Option<Ordering>> {
    match (value, operand) {
        (Value::Number(a), Operand::Number(b)) => Some(a.compare(*b)),
        (Value::Number(a), Operand::String(b)) => Number::parse(b).map(|b| a.compare(b)),
        (Value::String(a), Operand::String(b)) => Some(Some((*a).cmp(b.as_str()))),
        (Value::Timestamp(a), Operand::Timestamp(b)) => Some(Some(a.cmp(b))),
        _ => None,
    }
}

/// A registered predicate token: a kind plus structural negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub kind: PredicateKind,
    pub negated: bool,
}

impl Predicate {
    pub const fn new(kind: PredicateKind, negated: bool) -> Self {
        Predicate { kind, negated }
    }

    /// The token this predicate is registered under.
    pub fn token(self) -> &'static str {
        TOKENS
            .iter()
            .find(|(_, predicate)| *predicate == self)
            .map(|(token, _)| *token)
            .unwrap_or_else(|| self.kind.as_str())
    }

    /// Evaluates the predicate, negating the underlying kind when needed.
    ///
    /// Returns `Ok(true)` only when the outcome is definitely true.
    pub fn evaluate(self, field: &str, value: &Value<'_>, operand: &Operand) -> Result<bool> {
        let outcome = self.kind.evaluate(field, value, operand)?;
        Ok(outcome.map(|hit| hit != self.negated).unwrap_or(false))
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Every registered token, longest first.
///
/// The filter key parser walks this table in order, so a key like
/// `name_not_eq` splits on `not_eq` before `eq` is considered.
const TOKENS: &[(&str, Predicate)] = &[
    ("not_blank", Predicate::new(PredicateKind::Blank, true)),
    ("not_cont", Predicate::new(PredicateKind::Contains, true)),
    ("not_lte", Predicate::new(PredicateKind::LessOrEqual, true)),
    ("not_gte", Predicate::new(PredicateKind::GreaterOrEqual, true)),
    ("not_eq", Predicate::new(PredicateKind::Equals, true)),
    ("not_sw", Predicate::new(PredicateKind::StartsWith, true)),
    ("not_ew", Predicate::new(PredicateKind::EndsWith, true)),
    ("not_lt", Predicate::new(PredicateKind::LessThan, true)),
    ("not_gt", Predicate::new(PredicateKind::GreaterThan, true)),
    ("blank", Predicate::new(PredicateKind::Blank, false)),
    ("cont", Predicate::new(PredicateKind::Contains, false)),
    ("lte", Predicate::new(PredicateKind::LessOrEqual, false)),
    ("gte", Predicate::new(PredicateKind::GreaterOrEqual, false)),
    ("eq", Predicate::new(PredicateKind::Equals, false)),
    ("sw", Predicate::new(PredicateKind::StartsWith, false)),
    ("ew", Predicate::new(PredicateKind::EndsWith, false)),
    ("lt", Predicate::new(PredicateKind::LessThan, false)),
    ("gt", Predicate::new(PredicateKind::GreaterThan, false)),
];

/// Registered tokens with their predicates, longest token first.
pub fn tokens() -> impl Iterator<Item = (&'static str, Predicate)> {
    TOKENS.iter().copied()
}

/// Resolves a predicate token.
///
/// ```
/// use strainer::{resolve, PredicateKind};
///
/// let predicate = resolve("not_sw").unwrap();
/// assert_eq!(predicate.kind, PredicateKind::StartsWith);
/// assert!(predicate.negated);
/// assert!(resolve("like").is_err());
/// ```
pub fn resolve(token: &str) -> Result<Predicate> {
    TOKENS
        .iter()
        .find(|(registered, _)| *registered == token)
        .map(|(_, predicate)| *predicate)
        .ok_or_else(|| FinderError::UnknownPredicate {
            token: token.to_string(),
        })
}
