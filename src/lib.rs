// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! # autoschema
//!
//! Serialization schemas and constructors derived from one model declaration.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use autoschema::{Model, Many, autoschema, json, kwargs};
//!
//! #[derive(Model)]
//! pub struct Point {
//!     x: i64,
//!     #[model(default = 0)]
//!     y: i64
//! }
//!
//! let point = autoschema().register_model::<Point>()?;
//!
//! let p = point.construct(kwargs! { "x" => 1 })?;
//! assert_eq!(p.dump()?, json!({"x": 1, "y": 0}));
//!
//! let q = point.load(&json!({"x": 3, "y": 4}))?;
//! assert_eq!(q.get("y"), Some(&4.into()));
//! ```
//!
//! Registration generates `PointSchema`, a constructor assigning every
//! keyword-only parameter, and `dump`/`load` between instances and JSON.
//! See [`autoschema_core`] for the runtime and [`Model`] for the derive.

pub use autoschema_core::*;
pub use autoschema_derive::{Model, SchemaEnum};
