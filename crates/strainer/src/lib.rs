//! Strainer - predicate-key filtering over pluggable query adapters.
//!
//! Callers describe what they want with flat `field_predicate` keys such as
//! `name_not_eq` or `price_gte`. Strainer parses each key, checks it against
//! the fields declared filterable, and folds the filters into a single query
//! through an [`Adapter`]. The adapter owns translation and execution.
//!
//! - Predicate registry: `eq`, `sw`, `ew`, `cont`, `lt`, `lte`, `gt`,
//!   `gte`, `blank`, each with a `not_` form
//! - Ad-hoc filters: caller-supplied query transforms keyed by field name
//! - Memoized results per [`Finder`], optional paging
//! - [`locate`]: deep search of nested JSON/YAML documents, used to pull
//!   filter fragments out of configuration
//!
//! # Quick Start
//!
//! ```rust
//! use strainer::{FilterParams, FinderConfig, MemoryAdapter, OrderBy, Filterable, Number, Value};
//!
//! #[derive(Clone)]
//! struct Product {
//!     name: Option<String>,
//!     price: u32,
//! }
//!
//! impl Filterable for Product {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => self.name.as_deref().map_or(Value::None, Value::String),
//!             "price" => Value::Number(Number::from(self.price)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let products = vec![
//!     Product { name: Some("product_1".into()), price: 11 },
//!     Product { name: None, price: 18 },
//!     Product { name: Some("product_5".into()), price: 15 },
//! ];
//!
//! let config = FinderConfig::new(MemoryAdapter::new(products).order_by(OrderBy::asc("price")))
//!     .predicates_for(["name", "price"]);
//!
//! let finder = config.finder(
//!     FilterParams::new()
//!         .with("name_sw", "product")
//!         .with("price_gte", 12),
//! );
//!
//! let prices: Vec<u32> = finder.results().unwrap().iter().map(|p| p.price).collect();
//! assert_eq!(prices, vec![15]);
//! ```
//!
//! # Predicate Semantics
//!
//! | Token | Matches when |
//! |-------|--------------|
//! | `eq` | field equals operand |
//! | `sw` / `ew` / `cont` | string field starts with / ends with / contains operand |
//! | `lt` / `lte` / `gt` / `gte` | field orders before / after operand |
//! | `blank` | field is null or an empty string |
//!
//! `not_X` inverts `X`. A null field is unknown for every predicate except
//! `blank`, and unknown never matches, so `name_not_eq` skips records with
//! no name, just as a relational backend would. `eq` with a null operand is
//! the exception: it matches null fields, and `not_eq` with a null operand
//! matches every present value.

mod adapter;
mod compose;
mod error;
mod finder;
mod key;
mod locate;
mod memory;
mod ordering;
mod params;
mod predicate;
mod traits;
mod value;

pub use adapter::Adapter;
pub use compose::{compose, AdHocFilters, FilterFn, FilterSet, FilterSpec};
pub use error::{FinderError, Result};
pub use finder::{Finder, FinderConfig, Paging};
pub use key::{candidates, FilterKeyParser, ParsedKey};
pub use locate::{locate, Enumerable};
pub use memory::{Constraint, MemoryAdapter, MemoryQuery};
pub use ordering::{compare_entities, compare_values, Dir, OrderBy};
pub use params::{locate_filters, locate_filters_yaml, FilterParams, FinderParams};
pub use predicate::{resolve, tokens, Predicate, PredicateKind};
pub use traits::{FilterTimestamp, Filterable, IntoValue};
pub use value::{Number, Operand, Timestamp, Value};
