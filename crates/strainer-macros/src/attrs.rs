//! Attribute parsing for the Filterable derive macro.
//!
//! Fields opt in with `#[filter(...)]`; fields without the attribute are
//! not exposed.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// How a field is turned into a `strainer::Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `#[filter(String)]`
    String,
    /// `#[filter(Number)]`
    Number,
    /// `#[filter(Bool)]`
    Bool,
    /// `#[filter(Timestamp)]`, requires `FilterTimestamp`
    Timestamp,
}

impl FieldType {
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "String" | "string" => Ok(FieldType::String),
            "Number" | "number" => Ok(FieldType::Number),
            "Bool" | "boolean" => Ok(FieldType::Bool),
            "Timestamp" | "timestamp" => Ok(FieldType::Timestamp),
            other => Err(Error::new(
                ident.span(),
                format!(
                    "unknown filter type: '{}'. Expected one of: String, Number, Bool, Timestamp",
                    other
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[filter(...)]`.
#[derive(Debug, Clone)]
pub struct FilterAttr {
    pub field_type: Option<FieldType>,
    pub skip: bool,
    /// Name used in filter keys (default: the field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for FilterAttr {
    fn default() -> Self {
        FilterAttr {
            field_type: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for FilterAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FilterAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.field_type = Some(FieldType::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected filter type: String, Number, Bool, Timestamp, or skip",
                        ));
                    }
                }

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        attr.rename = Some(s.value());
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown filter attribute. Expected: String, Number, Bool, Timestamp, skip, or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[filter(...)]` attributes from a field's attributes.
pub fn parse_filter_attrs(attrs: &[Attribute]) -> Result<FilterAttr> {
    for attr in attrs {
        if attr.path().is_ident("filter") {
            return attr.parse_args::<FilterAttr>();
        }
    }
    Ok(FilterAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_filter(tokens: &str) -> Result<FilterAttr> {
        syn::parse_str::<FilterAttr>(tokens)
    }

    #[test]
    fn test_filter_types() {
        assert_eq!(parse_filter("String").unwrap().field_type, Some(FieldType::String));
        assert_eq!(parse_filter("number").unwrap().field_type, Some(FieldType::Number));
        assert_eq!(parse_filter("Bool").unwrap().field_type, Some(FieldType::Bool));
        assert_eq!(
            parse_filter("Timestamp").unwrap().field_type,
            Some(FieldType::Timestamp)
        );
    }

    #[test]
    fn test_filter_skip() {
        let attr = parse_filter("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.field_type, None);
    }

    #[test]
    fn test_filter_rename() {
        let attr = parse_filter(r#"Number, rename = "cost""#).unwrap();
        assert_eq!(attr.field_type, Some(FieldType::Number));
        assert_eq!(attr.rename, Some("cost".to_string()));
    }

    #[test]
    fn test_filter_invalid_type() {
        let err = parse_filter("Enum").unwrap_err();
        assert!(err.to_string().contains("unknown filter type"));
    }

    #[test]
    fn test_filter_unknown_name_value() {
        let err = parse_filter(r#"ty = "string""#).unwrap_err();
        assert!(err.to_string().contains("unknown filter attribute"));
    }
}
