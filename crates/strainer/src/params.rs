//! Filter parameters.
//!
//! [`FilterParams`] is the ordered `filter key => operand` mapping a finder
//! is constructed with. [`FinderParams`] wraps it with the paging inputs and
//! mirrors the document shape callers usually receive:
//!
//! ```json
//! { "filter": { "name_sw": "product", "price_gte": 15 }, "page": 2 }
//! ```

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::{FinderError, Result};
use crate::locate::locate;
use crate::value::Operand;

/// Ordered filter key to operand mapping.
///
/// Keys keep their first insertion position; inserting an existing key
/// replaces its operand in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    entries: Vec<(String, Operand)>,
}

impl FilterParams {
    pub fn new() -> Self {
        FilterParams::default()
    }

    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Operand>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Operand>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Operand> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads parameters from a JSON object.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            FinderError::InvalidParams(format!("expected an object of filters, got {value}"))
        })?;

        let mut params = FilterParams::new();
        for (key, value) in map {
            params.insert(key.as_str(), Operand::try_from(value)?);
        }
        Ok(params)
    }

    /// Reads parameters from a YAML mapping with string keys.
    pub fn from_yaml(value: &serde_yaml::Value) -> Result<Self> {
        let map = value.as_mapping().ok_or_else(|| {
            FinderError::InvalidParams("expected a mapping of filters".to_string())
        })?;

        let mut params = FilterParams::new();
        for (key, value) in map {
            let key = key
                .as_str()
                .ok_or_else(|| FinderError::InvalidParams("filter keys must be strings".to_string()))?;
            params.insert(key, Operand::try_from(value)?);
        }
        Ok(params)
    }
}

impl<K, V> FromIterator<(K, V)> for FilterParams
where
    K: Into<String>,
    V: Into<Operand>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = FilterParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<'de> Deserialize<'de> for FilterParams {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FilterParamsVisitor)
    }
}

struct FilterParamsVisitor;

impl<'de> Visitor<'de> for FilterParamsVisitor {
    type Value = FilterParams;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of filter keys to scalar values")
    }

    fn visit_map<M>(self, mut access: M) -> std::result::Result<FilterParams, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut params = FilterParams::new();
        // Visiting entries directly keeps document order.
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            let operand = Operand::try_from(&value).map_err(serde::de::Error::custom)?;
            params.insert(key, operand);
        }
        Ok(params)
    }
}

/// Everything a finder is constructed with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinderParams {
    #[serde(default)]
    pub filter: FilterParams,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
}

impl FinderParams {
    pub fn new(filter: FilterParams) -> Self {
        FinderParams {
            filter,
            ..FinderParams::default()
        }
    }

    /// Requests a page of results.
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Overrides the configured page size.
    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

impl From<FilterParams> for FinderParams {
    fn from(filter: FilterParams) -> Self {
        FinderParams::new(filter)
    }
}

/// Finds every `filter` fragment in a JSON configuration tree.
///
/// Each mapping holding a `filter` object is read as [`FinderParams`], so
/// sibling `page` and `per_page` keys are picked up too. Fragments come back
/// in document pre-order.
///
/// ```
/// use serde_json::json;
/// use strainer::locate_filters;
///
/// let config = json!({
///     "dashboards": {
///         "cheap": { "filter": { "price_lt": 15 }, "per_page": 5 },
///         "named": { "filter": { "name_sw": "product" } }
///     }
/// });
///
/// let found = locate_filters(&config).unwrap();
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].per_page, Some(5));
/// ```
pub fn locate_filters(root: &serde_json::Value) -> Result<Vec<FinderParams>> {
    locate(
        |key, value: &serde_json::Value, _| key == Some("filter") && value.is_object(),
        root,
    )
    .into_iter()
    .map(|fragment| {
        FinderParams::deserialize(fragment).map_err(|err| FinderError::InvalidParams(err.to_string()))
    })
    .collect()
}

/// Finds every `filter` fragment in a YAML configuration tree.
pub fn locate_filters_yaml(root: &serde_yaml::Value) -> Result<Vec<FinderParams>> {
    let filter_key = serde_yaml::Value::from("filter");
    locate(
        |key, value: &serde_yaml::Value, _| key == Some(&filter_key) && value.is_mapping(),
        root,
    )
    .into_iter()
    .map(|fragment| {
        FinderParams::deserialize(fragment).map_err(|err| FinderError::InvalidParams(err.to_string()))
    })
    .collect()
}
