//! Field access for filterable entities.
//!
//! [`Filterable`] is what the in-memory adapter reads fields through. It is
//! usually derived with `#[derive(Filterable)]` from `strainer-macros`, but
//! is simple to implement by hand.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::{Number, Timestamp, Value};

/// Types whose fields can be read by name.
///
/// # Derive Usage
///
/// ```ignore
/// use strainer::Filterable;
///
/// #[derive(Clone, strainer_macros::Filterable)]
/// struct Product {
///     #[filter(String)]
///     name: Option<String>,
///     #[filter(Number)]
///     price: u32,
///     #[filter(skip)]
///     sku: String,
/// }
///
/// assert_eq!(Product::fields(), &["name", "price"]);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use strainer::{Filterable, Number, Value};
///
/// struct Product {
///     name: Option<String>,
///     price: u32,
/// }
///
/// impl Filterable for Product {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => self.name.as_deref().map_or(Value::None, Value::String),
///             "price" => Value::Number(Number::from(self.price)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Filterable {
    /// Returns the value of `field`, or [`Value::None`] when it is absent or
    /// null.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Names of the fields exposed by [`field_value`](Self::field_value).
    ///
    /// Derived implementations list every annotated field; hand-written ones
    /// may leave this empty and declare fields on the finder directly.
    fn fields() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    /// Function-pointer form of [`field_value`](Self::field_value).
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

/// Conversion from a struct field to a [`Value`].
///
/// Implemented for strings, numbers, booleans, timestamps, and `Option` of
/// any of them (`None` maps to [`Value::None`]).
pub trait IntoValue {
    fn to_value(&self) -> Value<'_>;
}

impl IntoValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl IntoValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl IntoValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl IntoValue for Timestamp {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::None, IntoValue::to_value)
    }
}

macro_rules! number_into_value {
    ($($source:ty),*) => {
        $(
            impl IntoValue for $source {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_into_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Conversion from a datetime type to a [`Timestamp`].
///
/// Used by `#[filter(Timestamp)]` fields. Integers are read as milliseconds
/// since the Unix epoch.
///
/// ```
/// use strainer::{FilterTimestamp, Timestamp};
///
/// struct Created(i64);
///
/// impl FilterTimestamp for Created {
///     fn filter_timestamp(&self) -> Option<Timestamp> {
///         Some(Timestamp::from_secs(self.0))
///     }
/// }
/// ```
pub trait FilterTimestamp {
    fn filter_timestamp(&self) -> Option<Timestamp>;
}

impl FilterTimestamp for i64 {
    fn filter_timestamp(&self) -> Option<Timestamp> {
        Some(Timestamp::from_millis(*self))
    }
}

impl FilterTimestamp for u64 {
    fn filter_timestamp(&self) -> Option<Timestamp> {
        i64::try_from(*self).ok().map(Timestamp::from_millis)
    }
}

impl FilterTimestamp for Timestamp {
    fn filter_timestamp(&self) -> Option<Timestamp> {
        Some(*self)
    }
}

impl FilterTimestamp for SystemTime {
    fn filter_timestamp(&self) -> Option<Timestamp> {
        let millis = match self.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).ok()?,
            Err(before) => -i64::try_from(before.duration().as_millis()).ok()?,
        };
        Some(Timestamp::from_millis(millis))
    }
}

impl<T: FilterTimestamp> FilterTimestamp for Option<T> {
    fn filter_timestamp(&self) -> Option<Timestamp> {
        self.as_ref().and_then(FilterTimestamp::filter_timestamp)
    }
}
