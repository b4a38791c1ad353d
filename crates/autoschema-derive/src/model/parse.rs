// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for the Model derive macro.
//!
//! Model-level and field-level `#[model(...)]` attributes are parsed with
//! [`darling`], then combined into a [`ModelDef`].
//!
//! ```text
//! ModelDef
//! ├── ident: Ident             (struct name, the registry key)
//! ├── name: String             (model name, defaults to the ident)
//! ├── extends: Vec<Path>       (model bases, in declaration order)
//! ├── init: Option<Path>       (init hook fn)
//! ├── var_keyword: Option<String>
//! └── params: Vec<ParamDef>
//!     └── ParamDef
//!         ├── name: String     (attribute name)
//!         ├── ty: Type         (annotation source)
//!         ├── default: DefaultDef
//!         ├── rename: Option<String>  (irregular wire name)
//!         ├── positional: bool
//!         └── doc: Option<String>
//! ```

use darling::{FromDeriveInput, FromField, ast::Data, util::PathList};
use syn::{Attribute, DeriveInput, Expr, Ident, Lit, Path, Type, ext::IdentExt};

use crate::utils::docs::extract_doc_comments;

/// Model-level attributes parsed from `#[model(...)]`.
///
/// ```rust,ignore
/// #[model(name = "Page", extends(Document), init = "page_init", var_keyword = "extra")]
/// ```
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(model), supports(struct_named))]
pub struct ModelAttrs {
    /// Struct identifier.
    pub ident: Ident,

    /// Generic parameters, rejected.
    pub generics: syn::Generics,

    /// Named fields.
    pub data: Data<(), FieldAttrs>,

    /// Model name override.
    #[darling(default)]
    pub name: Option<String>,

    /// Registered model bases.
    #[darling(default)]
    pub extends: PathList,

    /// Init hook, a `fn(&mut Instance, &Kwargs) -> Result<(), BoxError>`.
    #[darling(default)]
    pub init: Option<Path>,

    /// Name of a catch-all keyword parameter.
    #[darling(default)]
    pub var_keyword: Option<String>
}

/// Field-level attributes parsed from `#[model(...)]`.
///
/// ```rust,ignore
/// #[model(default = 0)]
/// #[model(default_expr = "i64::MAX")]
/// #[model(default_with = "Vec::<String>::new")]
/// #[model(rename = "_specialCASE")]
/// #[model(positional)]
/// ```
#[derive(Debug, FromField)]
#[darling(attributes(model), forward_attrs(doc))]
pub struct FieldAttrs {
    /// Field identifier.
    pub ident: Option<Ident>,

    /// Field type.
    pub ty: Type,

    /// Forwarded doc attributes.
    pub attrs: Vec<Attribute>,

    /// Literal default.
    #[darling(default)]
    pub default: Option<Lit>,

    /// Expression default, evaluated when the stub is built.
    #[darling(default)]
    pub default_expr: Option<Expr>,

    /// Default factory, called on every construction without the argument.
    #[darling(default)]
    pub default_with: Option<Path>,

    /// Wire name overriding the factory's field namer.
    #[darling(default)]
    pub rename: Option<String>,

    /// Positional-or-keyword instead of keyword-only.
    #[darling(default)]
    pub positional: bool
}

/// Default of one parameter.
#[derive(Debug)]
pub enum DefaultDef {
    /// No default; the argument is required.
    Required,

    /// Defaults to the none-value (`Option<T>` fields).
    None,

    /// Literal value.
    Literal(Lit),

    /// Expression value.
    Expr(Expr),

    /// Factory function.
    Factory(Path)
}

/// One constructor parameter.
#[derive(Debug)]
pub struct ParamDef {
    /// Attribute name.
    pub name: String,

    /// Declared type.
    pub ty: Type,

    /// Default.
    pub default: DefaultDef,

    /// Wire name override.
    pub rename: Option<String>,

    /// Positional-or-keyword parameter.
    pub positional: bool,

    /// Field documentation.
    pub doc: Option<String>
}

/// Complete model definition.
#[derive(Debug)]
pub struct ModelDef {
    /// Struct identifier.
    pub ident: Ident,

    /// Model name.
    pub name: String,

    /// Model bases.
    pub extends: Vec<Path>,

    /// Init hook.
    pub init: Option<Path>,

    /// Catch-all keyword parameter name.
    pub var_keyword: Option<String>,

    /// Parameters in field order.
    pub params: Vec<ParamDef>
}

impl ModelDef {
    /// Parse a model definition from the derive input.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union or tuple struct
    /// - Generic struct
    /// - More than one default on a field
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        if !matches!(input.data, syn::Data::Struct(_)) {
            return Err(darling::Error::custom(
                "Model can only be derived for structs with named fields"
            )
            .with_span(&input.ident));
        }

        let attrs = ModelAttrs::from_derive_input(input)?;

        if !attrs.generics.params.is_empty() {
            return Err(darling::Error::custom("Model cannot be derived for generic structs")
                .with_span(&attrs.ident));
        }

        let fields = attrs
            .data
            .take_struct()
            .ok_or_else(|| darling::Error::unsupported_shape("enum").with_span(&attrs.ident))?;
        let params = fields
            .fields
            .into_iter()
            .map(ParamDef::from_field_attrs)
            .collect::<darling::Result<Vec<_>>>()?;

        Ok(Self {
            name: attrs.name.unwrap_or_else(|| attrs.ident.to_string()),
            ident: attrs.ident,
            extends: attrs.extends.to_vec(),
            init: attrs.init,
            var_keyword: attrs.var_keyword,
            params
        })
    }
}

impl ParamDef {
    fn from_field_attrs(field: FieldAttrs) -> darling::Result<Self> {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| darling::Error::unsupported_shape("tuple struct"))?;

        let explicit = [
            field.default.is_some(),
            field.default_expr.is_some(),
            field.default_with.is_some()
        ];
        if explicit.iter().filter(|set| **set).count() > 1 {
            return Err(darling::Error::custom(
                "use only one of `default`, `default_expr` or `default_with`"
            )
            .with_span(ident));
        }

        let default = if let Some(lit) = field.default {
            DefaultDef::Literal(lit)
        } else if let Some(expr) = field.default_expr {
            DefaultDef::Expr(expr)
        } else if let Some(path) = field.default_with {
            DefaultDef::Factory(path)
        } else if is_option(&field.ty) {
            DefaultDef::None
        } else {
            DefaultDef::Required
        };

        Ok(Self {
            name: ident.unraw().to_string(),
            doc: extract_doc_comments(&field.attrs),
            ty: field.ty,
            default,
            rename: field.rename,
            positional: field.positional
        })
    }
}

/// Whether `ty` is spelled `Option<...>`.
fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false
    }
}
