// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Model declarations and registered model classes.
//!
//! A model starts as a [`Stub`]: a name, its bases, a constructor
//! [`Signature`] and an optional init hook. Registering the stub with a
//! [`SchemaFactory`](crate::SchemaFactory) produces a [`ModelClass`] that
//! owns the generated schema and a constructor.
//!
//! # Declaring a Stub
//!
//! ```rust
//! use autoschema_core::{Annotation, Stub};
//!
//! struct Point;
//!
//! let stub = Stub::builder::<Point>("Point")
//!     .keyword("x", Annotation::Int)
//!     .keyword("y", Annotation::Int)
//!     .build();
//! assert_eq!(stub.name(), "Point");
//! ```
//!
//! Most code declares stubs with `#[derive(Model)]` instead, which implements
//! [`ModelStub`].

use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::{
    annotation::{Annotation, ModelKey},
    error::{BoxError, ConstructError, Error, ValidationError},
    factory::FieldNamer,
    schema::{Dumped, Loaded, Schema, SchemaClass, SchemaOptions},
    signature::{Fieldspec, Parameter, Signature},
    value::{Instance, Kwargs, Value}
};

/// User logic run after a level's attributes are assigned.
///
/// Receives the arguments bound to that level's signature, defaults filled.
pub type InitHook = Arc<dyn Fn(&mut Instance, &Kwargs) -> Result<(), BoxError> + Send + Sync>;

/// A class in a model hierarchy that is not itself a model.
///
/// Its constructor is called with the arguments its signature accepts and
/// ends the cooperative walk up the hierarchy.
pub struct PlainClass {
    name:      String,
    signature: Signature,
    init:      Option<InitHook>
}

impl PlainClass {
    /// Plain class with constructor `signature`.
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            init: None
        }
    }

    /// Set the constructor body.
    #[must_use]
    pub fn with_init<F>(mut self, init: F) -> Self
    where
        F: Fn(&mut Instance, &Kwargs) -> Result<(), BoxError> + Send + Sync + 'static
    {
        self.init = Some(Arc::new(init));
        self
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) const fn init(&self) -> Option<&InitHook> {
        self.init.as_ref()
    }
}

impl fmt::Debug for PlainClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainClass")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// A declared base of a stub.
#[derive(Debug, Clone)]
pub enum Base {
    /// A registered model.
    Model(ModelKey),
    /// A plain class.
    Plain(Arc<PlainClass>)
}

/// An entry of a model's resolution order.
#[derive(Clone)]
pub enum Ancestor {
    /// A registered model, whose constructor takes part in the chain.
    Model(Arc<ModelClass>),
    /// A plain class, called once and ending the chain.
    Plain(Arc<PlainClass>),
    /// The universal root.
    Object
}

impl Ancestor {
    /// Whether the constructor is a generated model constructor.
    #[must_use]
    pub const fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    /// The model, if this is one.
    #[must_use]
    pub const fn as_model(&self) -> Option<&Arc<ModelClass>> {
        match self {
            Self::Model(model) => Some(model),
            _ => None
        }
    }

    /// Name of the class.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Model(model) => model.name(),
            Self::Plain(plain) => plain.name(),
            Self::Object => "object"
        }
    }

    /// This entry followed by its own resolution order.
    pub(crate) fn linearization(&self) -> Vec<Self> {
        match self {
            Self::Model(model) => std::iter::once(self.clone())
                .chain(model.mro.iter().cloned())
                .collect(),
            Self::Plain(_) => vec![self.clone(), Self::Object],
            Self::Object => vec![Self::Object]
        }
    }
}

impl PartialEq for Ancestor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Model(a), Self::Model(b)) => a.key == b.key,
            (Self::Plain(a), Self::Plain(b)) => Arc::ptr_eq(a, b),
            (Self::Object, Self::Object) => true,
            _ => false
        }
    }
}

impl fmt::Debug for Ancestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(model) => write!(f, "Model({})", model.name()),
            Self::Plain(plain) => write!(f, "Plain({})", plain.name()),
            Self::Object => f.write_str("Object")
        }
    }
}

/// Declaration a model is registered from.
pub struct Stub {
    pub(crate) key:             ModelKey,
    pub(crate) name:            String,
    pub(crate) bases:           Vec<Base>,
    pub(crate) signature:       Signature,
    pub(crate) init:            Option<InitHook>,
    pub(crate) irregular_names: HashMap<String, String>
}

impl Stub {
    /// Start declaring model `name`, identified by stub type `T`.
    pub fn builder<T: 'static>(name: impl Into<String>) -> StubBuilder {
        Self::with_key(ModelKey::of::<T>(), name)
    }

    /// Start declaring model `name` under an explicit key.
    pub fn with_key(key: ModelKey, name: impl Into<String>) -> StubBuilder {
        StubBuilder {
            stub: Self {
                key,
                name: name.into(),
                bases: Vec::new(),
                signature: Signature::new(),
                init: None,
                irregular_names: HashMap::new()
            }
        }
    }

    /// Model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry key.
    #[must_use]
    pub const fn key(&self) -> ModelKey {
        self.key
    }

    /// Constructor signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Declared bases.
    #[must_use]
    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    /// Attribute to wire name overrides.
    #[must_use]
    pub const fn irregular_names(&self) -> &HashMap<String, String> {
        &self.irregular_names
    }
}

impl fmt::Debug for Stub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stub")
            .field("name", &self.name)
            .field("bases", &self.bases)
            .field("signature", &self.signature)
            .field("irregular_names", &self.irregular_names)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Stub`].
pub struct StubBuilder {
    stub: Stub
}

impl StubBuilder {
    /// Inherit from registered model `T`.
    #[must_use]
    pub fn extends<T: 'static>(self) -> Self {
        self.extends_key(ModelKey::of::<T>())
    }

    /// Inherit from the registered model under `key`.
    #[must_use]
    pub fn extends_key(mut self, key: ModelKey) -> Self {
        self.stub.bases.push(Base::Model(key));
        self
    }

    /// Inherit from a plain class.
    #[must_use]
    pub fn extends_plain(mut self, plain: Arc<PlainClass>) -> Self {
        self.stub.bases.push(Base::Plain(plain));
        self
    }

    /// Append a constructor parameter.
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.stub.signature.push(parameter);
        self
    }

    /// Required keyword-only parameter.
    #[must_use]
    pub fn keyword(self, name: &str, annotation: Annotation) -> Self {
        self.param(Parameter::keyword_only(name, annotation))
    }

    /// Keyword-only parameter with a plain default.
    #[must_use]
    pub fn keyword_default(
        self,
        name: &str,
        annotation: Annotation,
        default: impl Into<Value>
    ) -> Self {
        self.param(Parameter::keyword_only(name, annotation).with_default(default))
    }

    /// Keyword-only parameter defaulting to none.
    #[must_use]
    pub fn keyword_none(self, name: &str, annotation: Annotation) -> Self {
        self.param(Parameter::keyword_only(name, annotation).default_none())
    }

    /// Keyword-only parameter whose default is produced per construction.
    #[must_use]
    pub fn keyword_factory<F>(self, name: &str, annotation: Annotation, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static
    {
        self.param(Parameter::keyword_only(name, annotation).default_factory(factory))
    }

    /// Positional-or-keyword parameter; accepted but not serialized.
    #[must_use]
    pub fn positional(self, name: &str) -> Self {
        self.param(Parameter::positional(name))
    }

    /// Catch-all keyword parameter.
    #[must_use]
    pub fn var_keyword(self, name: &str) -> Self {
        self.param(Parameter::var_keyword(name))
    }

    /// Constructor body run after attribute assignment.
    #[must_use]
    pub fn init<F>(mut self, init: F) -> Self
    where
        F: Fn(&mut Instance, &Kwargs) -> Result<(), BoxError> + Send + Sync + 'static
    {
        self.stub.init = Some(Arc::new(init));
        self
    }

    /// Use `wire` instead of the namer's choice for attribute `attr`.
    #[must_use]
    pub fn irregular_name(mut self, attr: &str, wire: &str) -> Self {
        self.stub
            .irregular_names
            .insert(attr.to_string(), wire.to_string());
        self
    }

    /// Finish the declaration.
    #[must_use]
    pub fn build(self) -> Stub {
        self.stub
    }
}

/// Types that declare a model, usually through `#[derive(Model)]`.
pub trait ModelStub: 'static {
    /// The declaration.
    fn stub() -> Stub;
}

/// A registered model.
pub struct ModelClass {
    pub(crate) key:             ModelKey,
    pub(crate) name:            String,
    pub(crate) bases:           Vec<Ancestor>,
    pub(crate) mro:             Vec<Ancestor>,
    pub(crate) signature:       Signature,
    pub(crate) fieldspecs:      IndexMap<String, Fieldspec>,
    pub(crate) init:            Option<InitHook>,
    pub(crate) irregular_names: HashMap<String, String>,
    pub(crate) field_namer:     FieldNamer,
    pub(crate) schema:          Arc<SchemaClass>,
    pub(crate) chain:           Vec<Ancestor>
}

impl ModelClass {
    /// Registry key.
    #[must_use]
    pub const fn key(&self) -> ModelKey {
        self.key
    }

    /// Model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared bases, resolved.
    #[must_use]
    pub fn bases(&self) -> &[Ancestor] {
        &self.bases
    }

    /// Resolution order, excluding the model itself.
    #[must_use]
    pub fn mro(&self) -> &[Ancestor] {
        &self.mro
    }

    /// Constructor signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Fieldspecs of this model's own keyword-only parameters.
    #[must_use]
    pub const fn fieldspecs(&self) -> &IndexMap<String, Fieldspec> {
        &self.fieldspecs
    }

    /// Attribute to wire name overrides.
    #[must_use]
    pub const fn irregular_names(&self) -> &HashMap<String, String> {
        &self.irregular_names
    }

    /// Naming policy the model was registered with.
    #[must_use]
    pub const fn field_namer(&self) -> &FieldNamer {
        &self.field_namer
    }

    /// Generated schema.
    #[must_use]
    pub const fn schema(&self) -> &Arc<SchemaClass> {
        &self.schema
    }

    /// Levels constructed before this model's own, deepest first.
    #[must_use]
    pub fn chain(&self) -> &[Ancestor] {
        &self.chain
    }

    /// Whether `other` appears in this model's resolution order.
    #[must_use]
    pub fn is_subclass_of(&self, other: &Self) -> bool {
        self.mro
            .iter()
            .any(|ancestor| ancestor.as_model().is_some_and(|m| m.key == other.key))
    }

    pub(crate) const fn init(&self) -> Option<&InitHook> {
        self.init.as_ref()
    }

    /// Schema instantiated with `options`.
    #[must_use]
    pub fn schema_with(self: &Arc<Self>, options: SchemaOptions) -> Schema {
        Schema::new(Arc::clone(self), options)
    }

    /// Construct an instance from keyword arguments.
    ///
    /// # Errors
    ///
    /// Missing required arguments or a failing init hook. Keyword arguments
    /// no level accepts are ignored.
    pub fn construct(self: &Arc<Self>, kwargs: Kwargs) -> Result<Instance, ConstructError> {
        crate::construct::construct(self, &kwargs)
    }

    /// Load wire data with strict default options.
    ///
    /// # Errors
    ///
    /// Validation failures or constructor errors.
    pub fn load(self: &Arc<Self>, data: &Json) -> Result<Instance, Error> {
        let loaded = self.load_with(data, SchemaOptions::default())?;
        loaded.instance.ok_or_else(|| ValidationError::new(loaded.errors).into())
    }

    /// Load wire data with `options`.
    ///
    /// Non-strict loads return partial data and messages instead of failing.
    ///
    /// # Errors
    ///
    /// Strict validation failures, or constructor errors in either mode.
    pub fn load_with(
        self: &Arc<Self>,
        data: &Json,
        options: SchemaOptions
    ) -> Result<Loaded, Error> {
        self.schema_with(options).load(data)
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.name)
            .field("mro", &self.mro)
            .field("schema", &self.schema.name())
            .finish_non_exhaustive()
    }
}

impl Instance {
    /// Dump through the model's schema with strict default options.
    ///
    /// # Errors
    ///
    /// Any field that fails to serialize.
    pub fn dump(&self) -> Result<Json, ValidationError> {
        self.dump_with(SchemaOptions::default()).map(|dumped| dumped.data)
    }

    /// Dump with `options`.
    ///
    /// # Errors
    ///
    /// In strict mode, any field that fails to serialize.
    pub fn dump_with(&self, options: SchemaOptions) -> Result<Dumped, ValidationError> {
        self.class().schema_with(options).dump(self)
    }
}
