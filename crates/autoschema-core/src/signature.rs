// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Constructor signatures and their analysis.
//!
//! A [`Signature`] is the single source of truth for a model: it describes
//! what the constructor accepts, and its keyword-only parameters become the
//! serialized fields.
//!
//! # Parameter Kinds
//!
//! ```text
//! fn __init__(self, name, *, x: int, y: int = 0, **extra)
//!                   ────     ──────  ──────────  ───────
//!                    │         │         │          │
//!                    │         └─ keyword-only ─────┤──► fields
//!                    │                              │
//!                    └─ positional-or-keyword       └─ var-keyword (catch-all)
//! ```
//!
//! Only keyword-only parameters are analyzed into [`Fieldspec`]s; the other
//! kinds still matter for argument filtering with [`kwsift`].

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    annotation::Annotation,
    value::{Kwargs, Value}
};

/// How a parameter can be passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Accepted by name; not turned into a field.
    PositionalOrKeyword,
    /// Accepted by name only; becomes a field.
    KeywordOnly,
    /// Catch-all for any keyword.
    VarKeyword
}

/// Factory producing a fresh default on every construction.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Declared default of a parameter.
#[derive(Clone)]
pub enum DefaultValue {
    /// A plain value, cloned into each instance.
    Value(Value),
    /// A callable invoked when the argument is absent.
    Factory(DefaultFactory)
}

impl DefaultValue {
    /// Produce the default for one construction.
    pub fn materialize(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Factory(factory) => factory()
        }
    }

    /// Whether the default is exactly the none-value.
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::Value(Value::None))
    }

    /// The plain value, if this is not a factory.
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Factory(_) => None
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(..)")
        }
    }
}

/// One declared constructor parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    name:       String,
    kind:       ParamKind,
    annotation: Option<Annotation>,
    default:    Option<DefaultValue>,
    doc:        Option<String>
}

impl Parameter {
    /// Keyword-only parameter without default.
    pub fn keyword_only(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name:       name.into(),
            kind:       ParamKind::KeywordOnly,
            annotation: Some(annotation),
            default:    None,
            doc:        None
        }
    }

    /// Positional-or-keyword parameter.
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name:       name.into(),
            kind:       ParamKind::PositionalOrKeyword,
            annotation: None,
            default:    None,
            doc:        None
        }
    }

    /// Catch-all keyword parameter.
    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self {
            name:       name.into(),
            kind:       ParamKind::VarKeyword,
            annotation: None,
            default:    None,
            doc:        None
        }
    }

    /// Set a plain default.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    /// Default to the none-value, making the field nullable.
    #[must_use]
    pub fn default_none(mut self) -> Self {
        self.default = Some(DefaultValue::Value(Value::None));
        self
    }

    /// Default to the result of `factory`, called per construction.
    #[must_use]
    pub fn default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static
    {
        self.default = Some(DefaultValue::Factory(Arc::new(factory)));
        self
    }

    /// Drop the annotation.
    #[must_use]
    pub fn without_annotation(mut self) -> Self {
        self.annotation = None;
        self
    }

    /// Attach documentation, carried into the field description.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter kind.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Declared annotation.
    #[must_use]
    pub const fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    /// Declared default.
    #[must_use]
    pub const fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Documentation.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Whether the parameter can be passed by name.
    #[must_use]
    pub const fn accepts_keyword(&self) -> bool {
        matches!(
            self.kind,
            ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly
        )
    }
}

/// Ordered parameter list of a constructor.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    parameters: Vec<Parameter>
}

impl Signature {
    /// Empty signature.
    pub const fn new() -> Self {
        Self {
            parameters: Vec::new()
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.push(parameter);
        self
    }

    /// Append a parameter in place.
    pub fn push(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether a catch-all keyword parameter is declared.
    #[must_use]
    pub fn has_var_keyword(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| p.kind == ParamKind::VarKeyword)
    }

    /// Whether keyword `name` is accepted.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.has_var_keyword() || self.get(name).is_some_and(Parameter::accepts_keyword)
    }

    /// Bind already-sifted keyword arguments to this signature.
    ///
    /// Fills declared defaults for absent parameters. Returns the name of the
    /// first required parameter that was not supplied.
    pub fn bind(&self, kwargs: &Kwargs) -> Result<Kwargs, String> {
        let mut bound = kwargs.clone();
        for parameter in self.parameters.iter().filter(|p| p.accepts_keyword()) {
            if bound.contains_key(&parameter.name) {
                continue;
            }
            match &parameter.default {
                Some(default) => {
                    bound.insert(parameter.name.clone(), default.materialize());
                }
                None => return Err(parameter.name.clone())
            }
        }
        Ok(bound)
    }
}

impl FromIterator<Parameter> for Signature {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            parameters: iter.into_iter().collect()
        }
    }
}

/// Field-relevant facts about one keyword-only parameter.
#[derive(Debug, Clone)]
pub struct Fieldspec {
    /// Declared default, if any.
    pub default:    Option<DefaultValue>,
    /// Declared annotation, if any.
    pub annotation: Option<Annotation>,
    /// No default was declared.
    pub required:   bool,
    /// The default is exactly the none-value.
    pub allow_none: bool,
    /// Parameter documentation.
    pub doc:        Option<String>
}

impl Fieldspec {
    /// Value assigned when the argument is absent.
    ///
    /// Repeated fields fall back to an empty list and raw fields to an empty
    /// mapping whenever the effective value is none.
    pub fn effective(&self, supplied: Option<&Value>) -> Value {
        let value = match (supplied, &self.default) {
            (Some(value), _) => value.clone(),
            (None, Some(default)) => default.materialize(),
            (None, None) => Value::None
        };
        if !value.is_none() {
            return value;
        }
        match &self.annotation {
            Some(annotation) if annotation.is_many() => Value::List(Vec::new()),
            Some(annotation) if annotation.is_raw() => Value::empty_mapping(),
            _ => value
        }
    }
}

/// Extract the fieldspecs of every keyword-only parameter, in order.
pub fn analyze(signature: &Signature) -> IndexMap<String, Fieldspec> {
    signature
        .parameters()
        .iter()
        .filter(|p| p.kind == ParamKind::KeywordOnly)
        .map(|p| {
            let spec = Fieldspec {
                default:    p.default.clone(),
                annotation: p.annotation.clone(),
                required:   p.default.is_none(),
                allow_none: p.default.as_ref().is_some_and(DefaultValue::is_none),
                doc:        p.doc.clone()
            };
            (p.name.clone(), spec)
        })
        .collect()
}

/// Keep only the keyword arguments `signature` accepts by name.
///
/// A signature with a catch-all keyword parameter receives everything.
pub fn kwsift(kwargs: &Kwargs, signature: &Signature) -> Kwargs {
    if signature.has_var_keyword() {
        return kwargs.clone();
    }
    kwargs
        .iter()
        .filter(|(name, _)| signature.accepts(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
