//! Field values and filter operands.
//!
//! [`Value`] is what an entity exposes for one of its fields at execution
//! time, borrowed from the entity. [`Operand`] is the owned value a caller
//! supplies alongside a filter key (`price_gt => 15`).

use std::cmp::Ordering;

use crate::error::{FinderError, Result};

/// Runtime value of an entity field, borrowed from the entity.
///
/// # Example
///
/// ```
/// use strainer::{Number, Value};
///
/// struct Product {
///     name: Option<String>,
///     price: u32,
/// }
///
/// fn accessor<'a>(product: &'a Product, field: &str) -> Value<'a> {
///     match field {
///         "name" => product.name.as_deref().map_or(Value::None, Value::String),
///         "price" => Value::Number(Number::from(product.price)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
    /// Field absent or null.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Bool(_) => "bool",
            Value::None => "null",
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Comparisons between different variants are exact: integers are never
/// rounded through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers exactly, handling mixed types. `None` only for
    /// NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::F64(a), _) => other.compare_float(a).map(Ordering::reverse),
            (_, Number::F64(b)) => self.compare_float(b),
            _ => Some(self.as_i128().cmp(&other.as_i128())),
        }
    }

    /// Total order for sorting: NaN sorts after every other number.
    pub fn total_cmp(self, other: Number) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.is_nan().cmp(&other.is_nan()))
    }

    fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Integer payload; only called on `I64` and `U64`.
    fn as_i128(self) -> i128 {
        match self {
            Number::I64(n) => i128::from(n),
            Number::U64(n) => i128::from(n),
            Number::F64(n) => n as i128,
        }
    }

    /// Compares an integer against a float without rounding the integer.
    fn compare_float(self, float: f64) -> Option<Ordering> {
        if float.is_nan() {
            return None;
        }
        let int = self.as_i128();
        let whole = float.trunc();
        // Saturates outside the i128 range, which every u64/i64 fits inside.
        let ordering = int.cmp(&(whole as i128));
        if ordering != Ordering::Equal {
            return Some(ordering);
        }
        Some(whole.partial_cmp(&float).unwrap_or(Ordering::Equal))
    }

    /// Parses a decimal string, preferring integer representations.
    ///
    /// Filter parameters frequently arrive as strings (query strings, form
    /// posts), so numeric fields accept `"15"` as well as `15`.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::U64(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .map(Number::F64)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// ```
/// use strainer::Timestamp;
///
/// assert!(Timestamp::from_secs(1) < Timestamp::from_millis(1500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }
}

/// Owned operand supplied with a filter key.
///
/// Operands convert from Rust primitives and from scalar JSON/YAML values.
/// Sequences and mappings are rejected: every registered predicate compares
/// against a single value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operand {
    /// Explicit null (`name_blank => null`).
    #[default]
    Null,
    /// Boolean operand.
    Bool(bool),
    /// Numeric operand.
    Number(Number),
    /// String operand.
    String(String),
    /// Timestamp operand.
    Timestamp(Timestamp),
}

impl Operand {
    /// Borrows this operand as a field [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Operand::Null => Value::None,
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Number(n) => Value::Number(*n),
            Operand::String(s) => Value::String(s),
            Operand::Timestamp(t) => Value::Timestamp(*t),
        }
    }

    /// Extracts the string operand, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Operand::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        self.as_value().type_name()
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::String(s)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::String(s.to_string())
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

impl From<Number> for Operand {
    fn from(n: Number) -> Self {
        Operand::Number(n)
    }
}

impl From<Timestamp> for Operand {
    fn from(t: Timestamp) -> Self {
        Operand::Timestamp(t)
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Operand::Null, Into::into)
    }
}

macro_rules! operand_from_number {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Operand {
                fn from(n: $source) -> Self {
                    Operand::Number(Number::from(n))
                }
            }
        )*
    };
}

operand_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl TryFrom<&serde_json::Value> for Operand {
    type Error = FinderError;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        match value {
            Json::Null => Ok(Operand::Null),
            Json::Bool(b) => Ok(Operand::Bool(*b)),
            Json::String(s) => Ok(Operand::String(s.clone())),
            Json::Number(n) => json_number(n).map(Operand::Number),
            Json::Array(_) | Json::Object(_) => Err(FinderError::InvalidParams(format!(
                "filter values must be scalars, got {value}"
            ))),
        }
    }
}

impl TryFrom<&serde_yaml::Value> for Operand {
    type Error = FinderError;

    fn try_from(value: &serde_yaml::Value) -> Result<Self> {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Ok(Operand::Null),
            Yaml::Bool(b) => Ok(Operand::Bool(*b)),
            Yaml::String(s) => Ok(Operand::String(s.clone())),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Operand::Number(Number::I64(i)))
                } else if let Some(u) = n.as_u64() {
                    Ok(Operand::Number(Number::U64(u)))
                } else if let Some(f) = n.as_f64() {
                    Ok(Operand::Number(Number::F64(f)))
                } else {
                    Err(FinderError::InvalidParams(format!("unsupported number {n}")))
                }
            }
            Yaml::Tagged(tagged) => Operand::try_from(&tagged.value),
            Yaml::Sequence(_) | Yaml::Mapping(_) => Err(FinderError::InvalidParams(
                "filter values must be scalars".to_string(),
            )),
        }
    }
}

fn json_number(n: &serde_json::Number) -> Result<Number> {
    if let Some(i) = n.as_i64() {
        Ok(Number::I64(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Number::U64(u))
    } else if let Some(f) = n.as_f64() {
        Ok(Number::F64(f))
    } else {
        Err(FinderError::InvalidParams(format!("unsupported number {n}")))
    }
}
