// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use autoschema_core::prelude::*;
//! ```

pub use crate::{
    Annotated, Annotation, Error, Instance, Kwargs, Many, ModelClass, ModelStub, One, Schema,
    SchemaEnum, SchemaFactory, SchemaOptions, Stub, Value, autoschema, autoschema_camelcase,
    kwargs, validate_field
};
