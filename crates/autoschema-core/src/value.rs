// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dynamic attribute values and model instances.
//!
//! Model attributes are not Rust struct fields: a model is declared once as
//! data and its instances carry their attributes in an [`Instance`] keyed by
//! attribute name. [`Value`] is the closed set of things an attribute can hold.
//!
//! # Example
//!
//! ```rust
//! use autoschema_core::{Value, kwargs};
//!
//! let args = kwargs! { "x" => 1, "label" => "origin", "tags" => vec!["a", "b"] };
//! assert_eq!(args["x"], Value::Int(1));
//! assert_eq!(args["tags"].as_list().map(<[Value]>::len), Some(2));
//! ```

use std::{collections::BTreeMap, fmt, sync::Arc};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::{annotation::EnumMember, model::ModelClass};

/// Keyword arguments passed to a model constructor.
pub type Kwargs = BTreeMap<String, Value>;

/// Marker type for raw (untyped) passthrough attributes.
///
/// Annotating a parameter with `Raw` stores whatever JSON arrives on the wire
/// without conversion. An absent raw attribute defaults to an empty mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Raw;

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The none-value.
    None,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// String.
    Str(String),
    /// Naive timestamp, encoded as ISO-8601 text on the wire.
    Timestamp(NaiveDateTime),
    /// Enumeration member, encoded by symbolic name.
    Enum(EnumMember),
    /// Sequence of values.
    List(Vec<Value>),
    /// Untyped passthrough data.
    Raw(Json),
    /// Nested model instance.
    Object(Instance)
}

impl Value {
    /// An empty raw mapping, the default of absent raw attributes.
    pub fn empty_mapping() -> Self {
        Self::Raw(Json::Object(Map::new()))
    }

    /// Whether this is the none-value.
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Integer payload.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None
        }
    }

    /// Boolean payload.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None
        }
    }

    /// String payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None
        }
    }

    /// Timestamp payload.
    pub const fn as_timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Timestamp(v) => Some(v),
            _ => None
        }
    }

    /// Enumeration member payload.
    pub const fn as_enum(&self) -> Option<&EnumMember> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None
        }
    }

    /// Sequence payload.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None
        }
    }

    /// Raw payload.
    pub const fn as_raw(&self) -> Option<&Json> {
        match self {
            Self::Raw(v) => Some(v),
            _ => None
        }
    }

    /// Nested instance payload.
    pub const fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Object(v) => Some(v),
            _ => None
        }
    }

    /// Best-effort JSON rendering, used for raw passthrough of typed values.
    pub fn to_json(&self) -> Json {
        match self {
            Self::None => Json::Null,
            Self::Bool(v) => Json::Bool(*v),
            Self::Int(v) => Json::from(*v),
            Self::Str(v) => Json::String(v.clone()),
            Self::Timestamp(v) => Json::String(format_timestamp(v)),
            Self::Enum(v) => Json::String(v.name().to_string()),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Raw(v) => v.clone(),
            Self::Object(instance) => Json::Object(
                instance
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_json()))
                    .collect()
            )
        }
    }
}

/// Render a timestamp the way the wire expects it.
///
/// Fractional seconds are only written when non-zero.
pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Str(v) => f.write_str(v),
            Self::Enum(v) => write!(f, "{}.{}", v.enum_name(), v.name()),
            Self::Object(v) => write!(f, "<{} instance>", v.model_name()),
            other => write!(f, "{}", other.to_json())
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<EnumMember> for Value {
    fn from(v: EnumMember) -> Self {
        Self::Enum(v)
    }
}

impl From<Json> for Value {
    fn from(v: Json) -> Self {
        Self::Raw(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

/// Build a [`Kwargs`] map.
///
/// Values go through `Value::from`, so plain Rust literals work.
///
/// ```rust
/// use autoschema_core::{Value, kwargs};
///
/// let args = kwargs! { "x" => 1, "y" => Value::None };
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! kwargs {
    () => {
        $crate::Kwargs::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut kwargs = $crate::Kwargs::new();
        $(
            kwargs.insert(::std::string::String::from($name), $crate::Value::from($value));
        )+
        kwargs
    }};
}

/// An instance of a registered model.
///
/// Created by [`ModelClass::construct`] (or by loading wire data); the
/// constructor assigns every declared attribute of every level of the
/// hierarchy before any user initializer runs.
#[derive(Clone)]
pub struct Instance {
    class: Arc<ModelClass>,
    attrs: IndexMap<String, Value>
}

impl Instance {
    pub(crate) fn new(class: Arc<ModelClass>) -> Self {
        Self {
            class,
            attrs: IndexMap::new()
        }
    }

    /// The model this is an instance of.
    pub const fn class(&self) -> &Arc<ModelClass> {
        &self.class
    }

    /// Name of the model.
    pub fn model_name(&self) -> &str {
        self.class.name()
    }

    /// Read an attribute.
    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.attrs.get(attr)
    }

    /// Write an attribute.
    pub fn set(&mut self, attr: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(attr.into(), value.into());
    }

    /// Whether an attribute is present.
    pub fn has(&self, attr: &str) -> bool {
        self.attrs.contains_key(attr)
    }

    /// Attributes in assignment order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether this instance's model is `class` or derives from it.
    pub fn is_instance_of(&self, class: &ModelClass) -> bool {
        self.class.key() == class.key() || self.class.is_subclass_of(class)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.class.key() == other.class.key() && self.attrs == other.attrs
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class.name())?;
        f.debug_map().entries(self.attrs.iter()).finish()
    }
}
