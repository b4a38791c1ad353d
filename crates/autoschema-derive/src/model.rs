// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Model derive macro implementation.
//!
//! ```text
//! model.rs (orchestrator)
//! │
//! └── parse.rs  → ModelDef, ParamDef, DefaultDef
//! ```
//!
//! For a model like:
//!
//! ```rust,ignore
//! #[derive(Model)]
//! #[model(extends(Shape))]
//! pub struct Point {
//!     x: i64,
//!     #[model(default = 0)]
//!     y: i64
//! }
//! ```
//!
//! The macro generates:
//!
//! | Item | Purpose |
//! |------|---------|
//! | `impl ModelStub for Point` | The declaration registered by `SchemaFactory::register_model` |
//! | `impl Annotated for Point` | Lets other models reference `One<Point>` / `Many<Point>` |

pub mod parse;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::{DefaultDef, ModelDef, ParamDef};

/// Main entry point for the Model derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ModelDef::from_derive_input(&input) {
        Ok(model) => generate(&model).into(),
        Err(err) => err.write_errors().into()
    }
}

fn generate(model: &ModelDef) -> TokenStream2 {
    let ident = &model.ident;
    let name = &model.name;

    let extends = model.extends.iter().map(|base| {
        quote! { .extends::<#base>() }
    });
    let params = model.params.iter().map(|param| {
        let parameter = parameter(param);
        quote! { .param(#parameter) }
    });
    let var_keyword = model.var_keyword.iter().map(|kwargs| {
        quote! { .var_keyword(#kwargs) }
    });
    let init = model.init.iter().map(|hook| {
        quote! { .init(#hook) }
    });
    let irregular = model.params.iter().filter_map(|param| {
        let attr = &param.name;
        param
            .rename
            .as_ref()
            .map(|wire| quote! { .irregular_name(#attr, #wire) })
    });

    quote! {
        impl ::autoschema::ModelStub for #ident {
            fn stub() -> ::autoschema::Stub {
                ::autoschema::Stub::builder::<Self>(#name)
                    #(#extends)*
                    #(#params)*
                    #(#var_keyword)*
                    #(#init)*
                    #(#irregular)*
                    .build()
            }
        }

        impl ::autoschema::Annotated for #ident {
            fn annotation() -> ::autoschema::Annotation {
                ::autoschema::Annotation::model::<Self>()
            }
        }
    }
}

fn parameter(param: &ParamDef) -> TokenStream2 {
    let name = &param.name;
    let ty = &param.ty;

    let base = if param.positional {
        quote! { ::autoschema::Parameter::positional(#name) }
    } else {
        quote! {
            ::autoschema::Parameter::keyword_only(
                #name,
                <#ty as ::autoschema::Annotated>::annotation()
            )
        }
    };
    let default = match &param.default {
        DefaultDef::Required => quote! {},
        DefaultDef::None => quote! { .default_none() },
        DefaultDef::Literal(lit) => quote! { .with_default(#lit) },
        DefaultDef::Expr(expr) => quote! { .with_default(#expr) },
        DefaultDef::Factory(path) => quote! {
            .default_factory(|| ::autoschema::Value::from(#path()))
        }
    };
    let doc = param.doc.iter().map(|doc| quote! { .with_doc(#doc) });

    quote! { #base #default #(#doc)* }
}
