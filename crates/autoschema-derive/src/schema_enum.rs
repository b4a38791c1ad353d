// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SchemaEnum derive macro implementation.
//!
//! Unit enums become enumeration annotations, encoded on the wire by member
//! name:
//!
//! ```rust,ignore
//! #[derive(SchemaEnum)]
//! pub enum Color {
//!     Red,
//!     #[schema_enum(rename = "GREEN")]
//!     Green
//! }
//! ```

use darling::{FromDeriveInput, FromVariant, ast::Data};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Ident, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(schema_enum), supports(enum_unit))]
struct EnumAttrs {
    ident:    Ident,
    generics: syn::Generics,
    data:     Data<VariantAttrs, ()>,
    #[darling(default)]
    name:     Option<String>
}

#[derive(Debug, FromVariant)]
#[darling(attributes(schema_enum))]
struct VariantAttrs {
    ident:  Ident,
    #[darling(default)]
    rename: Option<String>
}

/// Main entry point for the SchemaEnum derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EnumAttrs::from_derive_input(&input).and_then(generate) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into()
    }
}

fn generate(attrs: EnumAttrs) -> darling::Result<TokenStream2> {
    if !attrs.generics.params.is_empty() {
        return Err(darling::Error::custom("SchemaEnum cannot be derived for generic enums")
            .with_span(&attrs.generics));
    }
    let ident = &attrs.ident;
    let name = attrs.name.clone().unwrap_or_else(|| ident.to_string());
    let variants = attrs
        .data
        .take_enum()
        .ok_or_else(|| darling::Error::unsupported_shape("struct").with_span(ident))?;
    if variants.is_empty() {
        return Err(darling::Error::custom("SchemaEnum requires at least one variant")
            .with_span(ident));
    }

    let idents: Vec<&Ident> = variants.iter().map(|v| &v.ident).collect();
    let members: Vec<String> = variants
        .iter()
        .map(|v| v.rename.clone().unwrap_or_else(|| v.ident.to_string()))
        .collect();

    Ok(quote! {
        impl ::autoschema::SchemaEnum for #ident {
            fn enum_type() -> ::autoschema::EnumType {
                ::autoschema::EnumType::new(#name, &[#(#members),*])
            }

            fn member_name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #members,)*
                }
            }

            fn from_member_name(name: &str) -> ::core::option::Option<Self> {
                match name {
                    #(#members => ::core::option::Option::Some(Self::#idents),)*
                    _ => ::core::option::Option::None
                }
            }
        }

        impl ::autoschema::Annotated for #ident {
            fn annotation() -> ::autoschema::Annotation {
                ::autoschema::Annotation::Enum(
                    <Self as ::autoschema::SchemaEnum>::enum_type()
                )
            }
        }

        impl ::core::convert::From<#ident> for ::autoschema::Value {
            fn from(member: #ident) -> Self {
                ::autoschema::Value::from(::autoschema::SchemaEnum::member(&member))
            }
        }
    })
}
