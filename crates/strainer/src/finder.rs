//! Finder facade.
//!
//! A [`FinderConfig`] is set up once per entity type: which fields accept
//! predicate keys, which ad-hoc filters exist, and how results are paged.
//! Each request then builds a short-lived [`Finder`] from its parameters and
//! reads [`results`](Finder::results).

use once_cell::unsync::OnceCell;

use crate::adapter::Adapter;
use crate::compose::{compose, AdHocFilters, FilterSet};
use crate::error::Result;
use crate::params::FinderParams;
use crate::value::Operand;

/// Page size limits applied when paging is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// Page size when the request does not ask for one.
    pub per_page: u64,
    pub min_per_page: u64,
    pub max_per_page: u64,
}

impl Paging {
    pub fn new(per_page: u64) -> Self {
        Paging {
            per_page,
            ..Paging::default()
        }
    }

    pub fn min_per_page(mut self, min: u64) -> Self {
        self.min_per_page = min;
        self
    }

    pub fn max_per_page(mut self, max: u64) -> Self {
        self.max_per_page = max;
        self
    }

    /// Offset and limit for a requested page. Pages count from 1; page 0 is
    /// read as page 1.
    pub fn window(&self, page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
        let min = self.min_per_page.max(1);
        let max = self.max_per_page.max(min);
        let limit = per_page.unwrap_or(self.per_page).clamp(min, max);
        let page = page.unwrap_or(1).max(1);
        ((page - 1).saturating_mul(limit), limit)
    }
}

impl Default for Paging {
    fn default() -> Self {
        Paging {
            per_page: 20,
            min_per_page: 1,
            max_per_page: 100,
        }
    }
}

/// Configuration for finding one entity type through an adapter.
///
/// ```
/// use strainer::{FilterParams, FinderConfig, MemoryAdapter, MemoryQuery, Filterable, Number, Value};
///
/// #[derive(Clone)]
/// struct Product { name: String, price: u32, category: &'static str }
///
/// impl Filterable for Product {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "price" => Value::Number(Number::from(self.price)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let products = vec![
///     Product { name: "lamp".into(), price: 12, category: "home" },
///     Product { name: "kite".into(), price: 18, category: "toys" },
///     Product { name: "desk".into(), price: 90, category: "home" },
/// ];
///
/// let config = FinderConfig::new(MemoryAdapter::new(products))
///     .predicates_for(["name", "price"])
///     .filter_by("category", |query: MemoryQuery<Product>, value| {
///         let wanted = value.as_str().unwrap_or_default().to_string();
///         query.retain(move |product| product.category == wanted)
///     });
///
/// let finder = config.finder(FilterParams::new().with("category", "home").with("price_lt", 50));
/// let names: Vec<&str> = finder.results().unwrap().iter().map(|p| p.name.as_str()).collect();
/// assert_eq!(names, vec!["lamp"]);
/// ```
pub struct FinderConfig<A: Adapter> {
    adapter: A,
    fields: Vec<String>,
    filters: AdHocFilters<A::Query>,
    paging: Option<Paging>,
}

impl<A: Adapter> FinderConfig<A> {
    /// Starts a configuration for the entity type `adapter` serves.
    pub fn new(adapter: A) -> Self {
        FinderConfig {
            adapter,
            fields: Vec::new(),
            filters: AdHocFilters::new(),
            paging: None,
        }
    }

    /// Declares fields that accept `field_predicate` keys.
    pub fn predicates_for<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.fields.contains(&field) {
                self.fields.push(field);
            }
        }
        self
    }

    /// Registers an ad-hoc filter for the parameter key `field`.
    ///
    /// When a request carries `field`, `filter` receives the running query
    /// and the raw operand. It runs before predicate filters, and predicate
    /// keys on the same field are ignored for that request.
    pub fn filter_by<F>(mut self, field: impl Into<String>, filter: F) -> Self
    where
        F: Fn(A::Query, &Operand) -> A::Query + Send + Sync + 'static,
    {
        self.filters.insert(field, Box::new(filter));
        self
    }

    /// Enables paging.
    pub fn paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }

    /// Creates a finder for one request.
    pub fn finder(&self, params: impl Into<FinderParams>) -> Finder<'_, A> {
        Finder::new(self, params)
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Fields declared with [`predicates_for`](Self::predicates_for).
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn filters(&self) -> &AdHocFilters<A::Query> {
        &self.filters
    }

    pub fn paging_config(&self) -> Option<Paging> {
        self.paging
    }
}

impl<A: Adapter + std::fmt::Debug> std::fmt::Debug for FinderConfig<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("adapter", &self.adapter)
            .field("fields", &self.fields)
            .field("filters", &self.filters)
            .field("paging", &self.paging)
            .finish()
    }
}

/// A single filtering request.
///
/// Results are composed and executed on first access and kept for the life
/// of the finder. A failed execution is not cached: the error is returned
/// and nothing is stored.
pub struct Finder<'c, A: Adapter> {
    config: &'c FinderConfig<A>,
    params: FinderParams,
    results: OnceCell<Vec<A::Entity>>,
}

impl<'c, A: Adapter> Finder<'c, A> {
    pub fn new(config: &'c FinderConfig<A>, params: impl Into<FinderParams>) -> Self {
        Finder {
            config,
            params: params.into(),
            results: OnceCell::new(),
        }
    }

    pub fn params(&self) -> &FinderParams {
        &self.params
    }

    /// Parses the request's filters without touching the adapter.
    pub fn filter_set(&self) -> Result<FilterSet> {
        FilterSet::build(&self.params.filter, &self.config.fields, &self.config.filters)
    }

    /// Matching entities, in the adapter's order.
    pub fn results(&self) -> Result<&[A::Entity]> {
        self.results
            .get_or_try_init(|| self.execute())
            .map(Vec::as_slice)
    }

    /// Consumes the finder, returning owned results.
    pub fn into_results(self) -> Result<Vec<A::Entity>> {
        match self.results.into_inner() {
            Some(results) => Ok(results),
            None => {
                let finder = Finder {
                    config: self.config,
                    params: self.params,
                    results: OnceCell::new(),
                };
                finder.execute()
            }
        }
    }

    pub fn count(&self) -> Result<usize> {
        self.results().map(<[A::Entity]>::len)
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.results().map(<[A::Entity]>::is_empty)
    }

    fn execute(&self) -> Result<Vec<A::Entity>> {
        let set = self.filter_set()?;
        let adapter = &self.config.adapter;

        let mut query = compose(adapter, adapter.base_query(), &set, &self.config.filters)?;

        if let Some(paging) = self.config.paging {
            let (offset, limit) = paging.window(self.params.page, self.params.per_page);
            tracing::debug!(offset, limit, "paginating");
            query = adapter.paginate(query, offset, limit)?;
        }

        let results = adapter.execute(query)?;
        tracing::debug!(
            filters = set.specs().len(),
            ad_hoc = set.ad_hoc().len(),
            results = results.len(),
            "finder executed"
        );
        Ok(results)
    }
}
