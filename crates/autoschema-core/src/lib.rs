// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema generation from constructor signatures.
//!
//! A model declares its keyword-only constructor parameters once. From that
//! declaration this crate derives a serialization schema, a constructor that
//! assigns every parameter to the instance, and `dump`/`load` between
//! instances and JSON.
//!
//! # Pipeline
//!
//! ```text
//! Stub ──► analyze ──► synthesize ──► assemble ──► ModelClass
//!  │        │            │              │              │
//!  │        │            │              │              ├─ construct(kwargs)
//!  │        │            │              │              ├─ load(json)
//!  │        │            │              │              └─ instance.dump()
//!  │        │            │              └─ schema class, inherited fields
//!  │        │            └─ one Field per parameter (classify)
//!  │        └─ Fieldspec per keyword-only parameter
//!  └─ name, bases, signature, init hook
//! ```
//!
//! # Overview
//!
//! - [`SchemaFactory`] — Registers models; [`autoschema`] and
//!   [`autoschema_camelcase`] are the shared instances
//! - [`Stub`] — A model declaration, usually produced by `#[derive(Model)]`
//! - [`ModelClass`] — A registered model: schema, construction, load
//! - [`Instance`] — A constructed model value with `dump`
//! - [`validate_field`] — Attach a [`Validator`] to a generated field
//! - [`prelude`] — Convenient re-exports
//!
//! # Usage
//!
//! ```rust
//! use autoschema_core::{Annotation, SchemaFactory, Stub, Value, kwargs};
//!
//! struct Point;
//!
//! let factory = SchemaFactory::default();
//! let point = factory
//!     .register(
//!         Stub::builder::<Point>("Point")
//!             .keyword("x", Annotation::Int)
//!             .keyword("y", Annotation::Int)
//!             .build()
//!     )
//!     .unwrap();
//!
//! let p = point.construct(kwargs! { "x" => 1, "y" => 2 }).unwrap();
//! assert_eq!(p.get("x"), Some(&Value::Int(1)));
//! assert_eq!(p.dump().unwrap(), serde_json::json!({"x": 1, "y": 2}));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod annotation;
pub mod assemble;
pub mod classify;
pub mod construct;
pub mod error;
pub mod factory;
pub mod model;
pub mod mro;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod signature;
pub mod synthesize;
pub mod validate;
pub mod value;

pub use self::{
    annotation::{Annotated, Annotation, EnumMember, EnumType, Many, ModelKey, One, SchemaEnum},
    classify::{ExtendedFieldMap, FieldConstructor, PrimitiveKind, TypeDescriptor, classify},
    error::{
        BoxError, ClassificationError, ConstructError, DefinitionError, Error, UnsupportedReason,
        ValidationError
    },
    factory::{FieldNamer, SchemaFactory, SchemaFactoryBuilder, autoschema, autoschema_camelcase},
    model::{Ancestor, Base, InitHook, ModelClass, ModelStub, PlainClass, Stub, StubBuilder},
    schema::{
        Dumped, Field, FieldKind, FieldOptions, FieldType, Loaded, Messages, SCHEMA_KEY, Schema,
        SchemaBase, SchemaClass, SchemaOptions, Unknown, UrlField
    },
    signature::{DefaultValue, Fieldspec, ParamKind, Parameter, Signature, analyze, kwsift},
    validate::{Length, OneOf, Range, Url, ValidateField, Validator, validate_field},
    value::{Instance, Kwargs, Raw, Value}
};

/// Re-export of the JSON wire value.
pub use serde_json::{Value as Json, json};
