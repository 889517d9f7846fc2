//! End-to-end predicate behavior over a small product catalog.

use strainer::{
    FilterParams, Filterable, FinderConfig, FinderError, FinderParams, MemoryAdapter, MemoryQuery,
    OrderBy, Timestamp,
};
use strainer_macros::Filterable;

#[derive(Debug, Clone, PartialEq, Filterable)]
struct Product {
    #[filter(String)]
    name: Option<String>,
    #[filter(Number)]
    price: u32,
    #[filter(Timestamp)]
    created_at: Timestamp,
    category: &'static str,
}

/// Ten products priced 10..=19. Row 7 has an empty name, row 8 no name, and
/// row 9 reuses `product_4`.
fn catalog() -> Vec<Product> {
    (0..10u32)
        .map(|i| {
            let name = match i {
                7 => Some(String::new()),
                8 => None,
                9 => Some("product_4".to_string()),
                _ => Some(format!("product_{i}")),
            };
            Product {
                name,
                price: 10 + i,
                created_at: Timestamp::from_secs(1_700_000_000 + i64::from(i) * 60),
                category: if i % 2 == 0 { "even" } else { "odd" },
            }
        })
        .collect()
}

fn config() -> FinderConfig<MemoryAdapter<Product>> {
    FinderConfig::new(MemoryAdapter::new(catalog()).order_by(OrderBy::asc("price")))
        .predicates_for(["name", "price", "created_at"])
        .filter_by("category", |query: MemoryQuery<Product>, value| {
            let wanted = value.as_str().unwrap_or_default().to_string();
            query.retain(move |product| product.category == wanted)
        })
}

fn prices(params: FilterParams) -> Vec<u32> {
    let config = config();
    let finder = config.finder(params);
    finder
        .results()
        .unwrap()
        .iter()
        .map(|product| product.price)
        .collect()
}

fn names(params: FilterParams) -> Vec<Option<String>> {
    let config = config();
    let finder = config.finder(params);
    finder
        .results()
        .unwrap()
        .iter()
        .map(|product| product.name.clone())
        .collect()
}

fn filter(key: &str, value: impl Into<strainer::Operand>) -> FilterParams {
    FilterParams::new().with(key, value)
}

fn some(names: &[&str]) -> Vec<Option<String>> {
    names.iter().map(|name| Some(name.to_string())).collect()
}

#[test]
fn equals_single_row() {
    assert_eq!(prices(filter("name_eq", "product_5")), vec![15]);
}

#[test]
fn equals_duplicate_rows() {
    assert_eq!(prices(filter("name_eq", "product_4")), vec![14, 19]);
}

#[test]
fn not_equals_skips_matches_and_null() {
    let params = filter("name_not_eq", "product_4");
    assert_eq!(
        names(params.clone()),
        some(&["product_0", "product_1", "product_2", "product_3", "product_5", "product_6", ""])
    );
    assert_eq!(prices(params), vec![10, 11, 12, 13, 15, 16, 17]);
}

#[test]
fn blank_matches_empty_and_null() {
    assert_eq!(prices(filter("name_blank", "")), vec![17, 18]);
}

#[test]
fn not_blank_matches_everything_else() {
    assert_eq!(
        names(filter("name_not_blank", "")),
        some(&[
            "product_0", "product_1", "product_2", "product_3", "product_4", "product_5",
            "product_6", "product_4",
        ])
    );
}

#[test]
fn equals_null_matches_only_the_unnamed_row() {
    assert_eq!(prices(filter("name_eq", strainer::Operand::Null)), vec![18]);
    assert_eq!(
        prices(filter("name_not_eq", strainer::Operand::Null)),
        vec![10, 11, 12, 13, 14, 15, 16, 17, 19]
    );
}

#[test]
fn equals_null_from_json() {
    let params: FinderParams = serde_json::from_str(r#"{"filter": {"name_eq": null}}"#).unwrap();
    let config = config();
    let finder = config.finder(params);
    assert_eq!(finder.results().unwrap()[0].price, 18);
    assert_eq!(finder.count().unwrap(), 1);
}

#[test]
fn ordering_predicates() {
    assert_eq!(prices(filter("price_lt", 15)), vec![10, 11, 12, 13, 14]);
    assert_eq!(prices(filter("price_lte", 15)), vec![10, 11, 12, 13, 14, 15]);
    assert_eq!(prices(filter("price_gt", 15)), vec![16, 17, 18, 19]);
    assert_eq!(prices(filter("price_gte", 15)), vec![15, 16, 17, 18, 19]);
}

#[test]
fn greater_than_keeps_rows_without_names() {
    assert_eq!(
        names(filter("price_gt", 15)),
        vec![
            Some("product_6".to_string()),
            Some(String::new()),
            None,
            Some("product_4".to_string()),
        ]
    );
}

#[test]
fn string_operands_compare_numerically() {
    assert_eq!(prices(filter("price_gte", "15")), vec![15, 16, 17, 18, 19]);
}

#[test]
fn combined_filters() {
    let params = FilterParams::new()
        .with("name_not_eq", "product_4")
        .with("name_not_blank", true)
        .with("price_gt", 14);
    assert_eq!(names(params.clone()), some(&["product_5", "product_6"]));
    assert_eq!(prices(params), vec![15, 16]);
}

#[test]
fn starts_with() {
    assert_eq!(
        prices(filter("name_sw", "product")),
        vec![10, 11, 12, 13, 14, 15, 16, 19]
    );
    assert_eq!(
        prices(filter("name_sw", "product").with("name_not_eq", "product_4")),
        vec![10, 11, 12, 13, 15, 16]
    );
}

#[test]
fn not_starts_with() {
    assert_eq!(prices(filter("name_not_sw", "product")), vec![17]);
    assert_eq!(
        prices(filter("name_not_sw", "product").with("name_not_eq", "product_4")),
        vec![17]
    );
}

#[test]
fn ends_with() {
    assert_eq!(prices(filter("name_ew", "4")), vec![14, 19]);
    assert_eq!(
        prices(filter("name_ew", "4").with("name_not_eq", "product_5")),
        vec![14, 19]
    );
}

#[test]
fn not_ends_with() {
    assert_eq!(
        prices(filter("name_not_ew", "4")),
        vec![10, 11, 12, 13, 15, 16, 17]
    );
    assert_eq!(
        prices(filter("name_not_ew", "4").with("name_not_eq", "product_5")),
        vec![10, 11, 12, 13, 16, 17]
    );
}

#[test]
fn contains() {
    assert_eq!(
        prices(filter("name_cont", "_")),
        vec![10, 11, 12, 13, 14, 15, 16, 19]
    );
    assert_eq!(
        prices(filter("name_cont", "t_4").with("name_not_eq", "product_5")),
        vec![14, 19]
    );
}

#[test]
fn not_contains() {
    assert_eq!(
        prices(filter("name_not_cont", "t_4")),
        vec![10, 11, 12, 13, 15, 16, 17]
    );
    assert_eq!(
        prices(filter("name_not_cont", "t_4").with("name_not_eq", "product_5")),
        vec![10, 11, 12, 13, 16, 17]
    );
}

#[test]
fn timestamps() {
    let cutoff = Timestamp::from_secs(1_700_000_000 + 3 * 60);
    assert_eq!(prices(filter("created_at_lt", cutoff)), vec![10, 11, 12]);
    assert_eq!(prices(filter("created_at_not_lt", cutoff)), vec![13, 14, 15, 16, 17, 18, 19]);
}

#[test]
fn ad_hoc_category_filter() {
    assert_eq!(prices(filter("category", "odd")), vec![11, 13, 15, 17, 19]);
    assert_eq!(
        prices(filter("category", "odd").with("price_gt", 14)),
        vec![15, 17, 19]
    );
}

#[test]
fn derived_field_list_feeds_configuration() {
    assert_eq!(Product::fields(), &["name", "price", "created_at"]);

    let config = FinderConfig::new(MemoryAdapter::new(catalog()))
        .predicates_for(Product::fields().iter().copied());
    assert_eq!(config.fields(), &["name", "price", "created_at"]);
}

#[test]
fn unknown_field_is_an_error() {
    let config = config();
    let finder = config.finder(filter("color_eq", "red"));
    assert!(matches!(
        finder.results(),
        Err(FinderError::UnknownField { field, .. }) if field == "color"
    ));
}

#[test]
fn ordering_type_mismatch_is_an_error() {
    let config = config();
    let finder = config.finder(filter("name_gt", 3));
    assert!(matches!(
        finder.results(),
        Err(FinderError::TypeMismatch { .. })
    ));
}

#[test]
fn json_request_document() {
    let params: FinderParams = serde_json::from_str(
        r#"{"filter": {"name_not_eq": "product_4", "price_gte": "15"}}"#,
    )
    .unwrap();

    let config = config();
    let finder = config.finder(params);
    let prices: Vec<u32> = finder.results().unwrap().iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![15, 16, 17]);
}
