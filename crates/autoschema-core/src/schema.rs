// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generated schemas and the dump/load engine.
//!
//! Every registered model owns one [`SchemaClass`]. Its bases mirror the
//! model hierarchy:
//!
//! ```text
//! model  Manager ──► Employee ──► Person
//!
//! schema ManagerSchema
//!           bases: [EmployeeSchema, PersonSchema, FactorySchema]
//!           fields: Person's, then Employee's, then Manager's
//! ```
//!
//! A [`Schema`] is a schema class instantiated with [`SchemaOptions`] for one
//! dump or load.

mod field;
mod messages;
mod options;

use std::{borrow::Cow, collections::HashSet, fmt, sync::Arc};

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

pub use self::{
    field::{Field, FieldKind, FieldOptions, FieldType, UrlField},
    messages::{Messages, SCHEMA_KEY},
    options::SchemaOptions
};
use crate::{
    annotation::ModelKey,
    error::{Error, ValidationError},
    model::ModelClass,
    value::{Instance, Kwargs}
};

/// What loading does with wire keys no field reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Unknown {
    /// Drop them.
    #[default]
    Exclude,
    /// Report `"Unknown field."` for each.
    Raise
}

/// Root of every generated schema hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBase {
    name:    Cow<'static, str>,
    unknown: Unknown
}

impl Default for SchemaBase {
    fn default() -> Self {
        Self::new("FactorySchema")
    }
}

impl SchemaBase {
    /// Root named `name`, dropping unknown keys.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name:    name.into(),
            unknown: Unknown::Exclude
        }
    }

    /// Set the unknown-key policy.
    #[must_use]
    pub const fn unknown(mut self, unknown: Unknown) -> Self {
        self.unknown = unknown;
        self
    }

    /// Root name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unknown-key policy.
    #[must_use]
    pub const fn unknown_policy(&self) -> Unknown {
        self.unknown
    }
}

/// A base of a generated schema.
#[derive(Debug, Clone)]
pub enum SchemaParent {
    /// Schema generated for an ancestor model.
    Generated(Arc<SchemaClass>),
    /// The configured root.
    Root(SchemaBase)
}

impl SchemaParent {
    /// Base name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Generated(schema) => schema.name(),
            Self::Root(base) => base.name()
        }
    }
}

/// Schema generated for one model.
pub struct SchemaClass {
    name:     String,
    model:    ModelKey,
    bases:    Vec<SchemaParent>,
    declared: IndexMap<String, Arc<Field>>,
    fields:   IndexMap<String, Arc<Field>>,
    root:     SchemaBase
}

impl SchemaClass {
    pub(crate) fn from_parts(
        name: String,
        model: ModelKey,
        bases: Vec<SchemaParent>,
        declared: IndexMap<String, Arc<Field>>,
        fields: IndexMap<String, Arc<Field>>,
        root: SchemaBase
    ) -> Self {
        Self {
            name,
            model,
            bases,
            declared,
            fields,
            root
        }
    }

    /// Schema name, the model name plus `Schema`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the model this schema was generated for.
    #[must_use]
    pub const fn model_key(&self) -> ModelKey {
        self.model
    }

    /// Bases: ancestor schemas in resolution order, then the root.
    #[must_use]
    pub fn bases(&self) -> &[SchemaParent] {
        &self.bases
    }

    /// Base names in order.
    #[must_use]
    pub fn base_names(&self) -> Vec<&str> {
        self.bases.iter().map(SchemaParent::name).collect()
    }

    /// Fields declared by this model's own constructor.
    #[must_use]
    pub const fn declared_fields(&self) -> &IndexMap<String, Arc<Field>> {
        &self.declared
    }

    /// All fields, inherited first.
    #[must_use]
    pub const fn fields(&self) -> &IndexMap<String, Arc<Field>> {
        &self.fields
    }

    /// Field generated for attribute `attr`.
    #[must_use]
    pub fn field(&self, attr: &str) -> Option<&Arc<Field>> {
        self.fields.get(attr)
    }

    /// The configured root base.
    #[must_use]
    pub const fn root(&self) -> &SchemaBase {
        &self.root
    }

    /// Whether `other` is this schema or one of its bases.
    #[must_use]
    pub fn is_subschema_of(&self, other: &SchemaClass) -> bool {
        self.model == other.model
            || self.bases.iter().any(|base| {
                matches!(base, SchemaParent::Generated(schema) if schema.model == other.model)
            })
    }

    fn selected<'a>(
        &'a self,
        options: &'a SchemaOptions
    ) -> impl Iterator<Item = (&'a str, &'a Arc<Field>)> {
        self.fields
            .iter()
            .filter(|(attr, _)| options.includes(attr))
            .map(|(attr, field)| (attr.as_str(), field))
    }
}

impl fmt::Debug for SchemaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaClass")
            .field("name", &self.name)
            .field("bases", &self.base_names())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Serialize the selected attributes of `instance`.
pub(crate) fn dump_attrs(
    schema: &SchemaClass,
    options: &SchemaOptions,
    instance: &Instance
) -> (Map<String, Json>, Messages) {
    let mut data = Map::new();
    let mut errors = Messages::new();
    for (attr, field) in schema.selected(options) {
        let value = match (instance.get(attr), &field.options().default) {
            (Some(value), _) | (None, Some(value)) => value,
            (None, None) => continue
        };
        let key = field.dump_key(attr);
        match field.serialize(value) {
            Ok(json) => {
                data.insert(key.to_string(), json);
            }
            Err(messages) => errors.nest(key, messages)
        }
    }
    (data, errors)
}

/// Deserialize wire data into constructor arguments.
pub(crate) fn load_attrs(
    schema: &SchemaClass,
    options: &SchemaOptions,
    data: &Json
) -> (Kwargs, Messages) {
    let mut kwargs = Kwargs::new();
    let mut errors = Messages::new();
    let Some(object) = data.as_object() else {
        errors.push(SCHEMA_KEY, "Invalid input type.");
        return (kwargs, errors);
    };

    for (attr, field) in schema.selected(options) {
        let key = field.load_key(attr);
        match object.get(key) {
            Some(raw) => match field.deserialize(raw) {
                Ok(value) => {
                    kwargs.insert(attr.to_string(), value);
                }
                Err(messages) => errors.nest(key, messages)
            },
            None if field.options().required => {
                errors.push(key, "Missing data for required field.");
            }
            None => {}
        }
    }

    let known: HashSet<&str> = schema
        .fields()
        .iter()
        .map(|(attr, field)| field.load_key(attr))
        .collect();
    for key in object.keys().filter(|key| !known.contains(key.as_str())) {
        match schema.root().unknown_policy() {
            Unknown::Exclude => {
                tracing::debug!(schema = %schema.name(), key = %key, "dropping unknown field");
            }
            Unknown::Raise => errors.push(key.clone(), "Unknown field.")
        }
    }

    (kwargs, errors)
}

/// Result of a dump.
#[derive(Debug, Clone, PartialEq)]
pub struct Dumped {
    /// Wire data; fields that failed are missing.
    pub data:   Json,
    /// Collected messages, empty on success.
    pub errors: Messages
}

/// Result of a load.
#[derive(Debug)]
pub struct Loaded {
    /// The constructed instance, when loading and construction succeeded.
    pub instance: Option<Instance>,
    /// Constructor arguments deserialized from the wire.
    pub data:     Kwargs,
    /// Collected messages, empty on success.
    pub errors:   Messages
}

/// A model's schema instantiated with options.
#[derive(Debug, Clone)]
pub struct Schema {
    model:   Arc<ModelClass>,
    options: SchemaOptions
}

impl Schema {
    /// Instantiate the schema of `model`.
    pub const fn new(model: Arc<ModelClass>, options: SchemaOptions) -> Self {
        Self {
            model,
            options
        }
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// The generated schema class.
    #[must_use]
    pub fn class(&self) -> &SchemaClass {
        self.model.schema()
    }

    /// Serialize `instance`.
    ///
    /// # Errors
    ///
    /// In strict mode, any field that fails to serialize.
    pub fn dump(&self, instance: &Instance) -> Result<Dumped, ValidationError> {
        let (data, errors) = dump_attrs(self.class(), &self.options, instance);
        if self.options.strict && !errors.is_empty() {
            return Err(ValidationError::new(errors));
        }
        Ok(Dumped {
            data: Json::Object(data),
            errors
        })
    }

    /// Deserialize `data` and construct an instance.
    ///
    /// # Errors
    ///
    /// In strict mode, [`Error::Validation`] when any field fails. Constructor
    /// failures are passed through as [`Error::Construct`] in either mode.
    pub fn load(&self, data: &Json) -> Result<Loaded, Error> {
        let (kwargs, errors) = load_attrs(self.class(), &self.options, data);
        if !errors.is_empty() {
            if self.options.strict {
                return Err(ValidationError::new(errors).into());
            }
            return Ok(Loaded {
                instance: None,
                data: kwargs,
                errors
            });
        }
        let instance = self.model.construct(kwargs.clone())?;
        Ok(Loaded {
            instance: Some(instance),
            data: kwargs,
            errors
        })
    }
}
