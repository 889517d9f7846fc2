//! Implementation of the `#[derive(Filterable)]` macro.
//!
//! Generates a `strainer::Filterable` impl reading each annotated field by
//! name, the list of filterable field names, and one name constant per
//! field.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use crate::attrs::{parse_filter_attrs, FieldType};

pub fn filterable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Filterable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Filterable can only be derived for structs",
            ))
        }
    };

    let mut match_arms: Vec<TokenStream> = Vec::new();
    let mut constants: Vec<TokenStream> = Vec::new();
    let mut names: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_filter_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(field_type) = attrs.field_type else {
            continue;
        };

        let key_name = attrs.rename.unwrap_or_else(|| field_ident.to_string());
        if names.contains(&key_name) {
            return Err(Error::new(
                attrs.span,
                format!("duplicate filter field name '{}'", key_name),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&key_name));
        constants.push(quote! {
            /// Filter field name.
            pub const #const_name: &'static str = #key_name;
        });

        let value_expr = match field_type {
            FieldType::String | FieldType::Number | FieldType::Bool => quote! {
                ::strainer::IntoValue::to_value(&self.#field_ident)
            },
            FieldType::Timestamp => quote! {
                match ::strainer::FilterTimestamp::filter_timestamp(&self.#field_ident) {
                    ::std::option::Option::Some(ts) => ::strainer::Value::Timestamp(ts),
                    ::std::option::Option::None => ::strainer::Value::None,
                }
            },
        };

        match_arms.push(quote! {
            #key_name => #value_expr,
        });
        names.push(key_name);
    }

    Ok(quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#constants)*
        }

        impl #impl_generics ::strainer::Filterable for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::strainer::Value<'_> {
                match field {
                    #(#match_arms)*
                    _ => ::strainer::Value::None,
                }
            }

            fn fields() -> &'static [&'static str] {
                &[#(#names),*]
            }
        }
    })
}

/// `createdAt` and `created_at` both become `CREATED_AT`.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.extend(c.to_uppercase());
            prev_was_lower = c.is_lowercase();
        }
    }

    result
}
