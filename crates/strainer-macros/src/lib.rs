//! Proc macros for Strainer.
//!
//! - [`Filterable`] - derive field access for the in-memory adapter

mod attrs;
mod derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `strainer::Filterable`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | String field, `String` or `Option<String>` |
/// | `Number` | Any primitive number, or `Option` of one |
/// | `Bool` | Boolean field |
/// | `Timestamp` | Field implementing `FilterTimestamp` |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Name used in filter keys |
///
/// Fields without `#[filter(...)]` are not exposed.
///
/// # Generated Code
///
/// 1. A name constant per field (`Product::PRICE`)
/// 2. `Filterable::field_value()` matching on those names
/// 3. `Filterable::fields()` listing them, ready for `predicates_for`
///
/// # Example
///
/// ```ignore
/// use strainer::{FilterParams, Filterable, FinderConfig, MemoryAdapter};
/// use strainer_macros::Filterable;
///
/// #[derive(Clone, Filterable)]
/// struct Product {
///     #[filter(String)]
///     name: Option<String>,
///     #[filter(Number)]
///     price: u32,
///     #[filter(skip)]
///     sku: String,
/// }
///
/// let config = FinderConfig::new(MemoryAdapter::new(products))
///     .predicates_for(Product::fields().iter().copied());
/// let finder = config.finder(FilterParams::new().with("price_gte", 15));
/// ```
#[proc_macro_derive(Filterable, attributes(filter))]
pub fn filterable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::filterable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
