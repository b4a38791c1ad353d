// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Derive macros for autoschema.
//!
//! Use the `autoschema` crate, which re-exports these macros together with
//! the runtime they expand against.
//!
//! # Attribute Quick Reference
//!
//! ## Model-Level `#[model(...)]`
//!
//! ```rust,ignore
//! #[derive(Model)]
//! #[model(
//!     name = "Page",            // Optional: model name (default: struct name)
//!     extends(Document, Meta),  // Optional: registered model bases, in order
//!     init = "page_init",       // Optional: init hook fn
//!     var_keyword = "extra"     // Optional: accept any keyword argument
//! )]
//! pub struct PageStub { /* ... */ }
//! ```
//!
//! ## Field-Level `#[model(...)]`
//!
//! ```rust,ignore
//! pub struct PageStub {
//!     title: String,                          // Required keyword-only parameter
//!
//!     note: Option<String>,                   // Defaults to none, nullable field
//!
//!     #[model(default = 1)]                   // Literal default
//!     views: i64,
//!
//!     #[model(default_with = "default_tags")] // Fresh value per construction
//!     tags: Vec<String>,
//!
//!     #[model(rename = "_specialCASE")]       // Wire name override
//!     special_case: String,
//!
//!     #[model(positional)]                    // Constructor-only, no field
//!     flag: bool,
//!
//!     author: One<UserStub>,                  // Nested model
//!     comments: Many<CommentStub>             // Nested model list
//! }
//! ```
//!
//! # Generated Code Overview
//!
//! | Derive | Generated |
//! |--------|-----------|
//! | `Model` | `impl ModelStub`, `impl Annotated` |
//! | `SchemaEnum` | `impl SchemaEnum`, `impl Annotated`, `From<Enum> for Value` |

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod model;
mod schema_enum;
mod utils;

use proc_macro::TokenStream;

/// Derive a model declaration from a struct.
///
/// Every named field becomes a keyword-only constructor parameter, annotated
/// by the field's Rust type. Register the model with
/// `autoschema().register_model::<T>()`.
///
/// # Model Attributes
///
/// | Attribute | Default | Description |
/// |-----------|---------|-------------|
/// | `name` | struct name | Model name; the schema is `{name}Schema` |
/// | `extends(A, B)` | none | Registered model bases |
/// | `init` | none | `fn(&mut Instance, &Kwargs) -> Result<(), BoxError>` |
/// | `var_keyword` | none | Catch-all keyword parameter name |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `default = lit` | Literal default, making the field optional |
/// | `default_expr = "expr"` | Expression default |
/// | `default_with = "path"` | Factory called on every construction |
/// | `rename = "wire"` | Wire name, overriding the factory's field namer |
/// | `positional` | Positional-or-keyword parameter without a field |
///
/// `Option<T>` fields default to none and allow null.
///
/// # Example
///
/// ```rust,ignore
/// use autoschema::{Model, Many, autoschema};
///
/// #[derive(Model)]
/// pub struct Point {
///     x: i64,
///     y: i64
/// }
///
/// #[derive(Model)]
/// pub struct Polygon {
///     points: Many<Point>
/// }
///
/// autoschema().register_model::<Point>()?;
/// autoschema().register_model::<Polygon>()?;
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive(input)
}

/// Derive an enumeration annotation from a unit enum.
///
/// Members are encoded by name. `#[schema_enum(name = "...")]` renames the
/// enumeration, `#[schema_enum(rename = "...")]` a member.
///
/// # Example
///
/// ```rust,ignore
/// use autoschema::SchemaEnum;
///
/// #[derive(SchemaEnum)]
/// pub enum Color {
///     Red,
///     Green
/// }
/// ```
#[proc_macro_derive(SchemaEnum, attributes(schema_enum))]
pub fn derive_schema_enum(input: TokenStream) -> TokenStream {
    schema_enum::derive(input)
}
