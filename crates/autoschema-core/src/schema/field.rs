// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field descriptors.
//!
//! A [`Field`] knows how to turn one attribute value into wire data and back.
//! Its behavior is selected by [`FieldKind`]:
//!
//! | Kind | Attribute | Wire |
//! |------|-----------|------|
//! | `Primitive(Integer)` | `Value::Int` | number |
//! | `Primitive(String)` | `Value::Str` | string |
//! | `Primitive(Boolean)` | `Value::Bool` | bool |
//! | `Primitive(Timestamp)` | `Value::Timestamp` | ISO-8601 string |
//! | `Primitive(Raw)` | anything | unchanged JSON |
//! | `Enum` | `Value::Enum` | member name |
//! | `Nested` | `Value::Object` (or a list when `many`) | object (or array) |
//! | `List` | `Value::List` | array, each element through the container |
//! | `Custom` | per [`FieldType`] | per [`FieldType`] |

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock}
};

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value as Json;
use validator::ValidateUrl;

use super::{
    messages::{Messages, SCHEMA_KEY},
    options::SchemaOptions
};
use crate::{
    annotation::EnumType,
    classify::PrimitiveKind,
    model::ModelClass,
    validate::Validator,
    value::{Value, format_timestamp}
};

/// User-defined field behavior, plugged in through an extended field map.
pub trait FieldType: Send + Sync + fmt::Debug {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Attribute value to wire data.
    fn serialize(&self, value: &Value) -> Result<Json, String>;

    /// Wire data to attribute value.
    fn deserialize(&self, data: &Json) -> Result<Value, String>;
}

/// Absolute URL stored as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlField;

const INVALID_URL: &str = "Not a valid URL.";

fn is_url(text: &str) -> bool {
    text.validate_url()
}

impl FieldType for UrlField {
    fn name(&self) -> &'static str {
        "Url"
    }

    fn serialize(&self, value: &Value) -> Result<Json, String> {
        match value.as_str() {
            Some(text) if is_url(text) => Ok(Json::String(text.to_string())),
            _ => Err(INVALID_URL.to_string())
        }
    }

    fn deserialize(&self, data: &Json) -> Result<Value, String> {
        match data.as_str() {
            Some(text) if is_url(text) => Ok(Value::Str(text.to_string())),
            _ => Err(INVALID_URL.to_string())
        }
    }
}

/// What a field converts.
#[derive(Clone)]
pub enum FieldKind {
    /// Built-in scalar.
    Primitive(PrimitiveKind),
    /// Enumeration member by name.
    Enum(EnumType),
    /// Another model, through its generated schema.
    Nested(Arc<ModelClass>),
    /// Homogeneous list; the inner field is the container.
    List(Arc<Field>),
    /// User-defined behavior.
    Custom(Arc<dyn FieldType>)
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "Primitive({kind:?})"),
            Self::Enum(e) => write!(f, "Enum({})", e.name()),
            Self::Nested(model) => write!(f, "Nested({})", model.name()),
            Self::List(container) => write!(f, "List({:?})", container.kind),
            Self::Custom(custom) => write!(f, "Custom({})", custom.name())
        }
    }
}

/// Construction parameters shared by all field kinds.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    /// Dumped when the attribute is absent.
    pub default:     Option<Value>,
    /// Nested field carries a list of instances.
    pub many:        bool,
    /// Loading fails when the key is absent.
    pub required:    bool,
    /// Null is accepted on load.
    pub allow_none:  bool,
    /// Wire key read on load.
    pub load_from:   Option<String>,
    /// Wire key written on dump.
    pub dump_to:     Option<String>,
    /// Human readable description.
    pub description: Option<String>
}

/// A field descriptor.
pub struct Field {
    kind:       FieldKind,
    options:    FieldOptions,
    validators: RwLock<Vec<Arc<dyn Validator>>>
}

impl Field {
    /// New field.
    pub fn new(kind: FieldKind, options: FieldOptions) -> Self {
        Self {
            kind,
            options,
            validators: RwLock::new(Vec::new())
        }
    }

    /// Field converting a built-in scalar.
    pub fn primitive(kind: PrimitiveKind, options: FieldOptions) -> Self {
        Self::new(FieldKind::Primitive(kind), options)
    }

    /// Field backed by a [`FieldType`].
    pub fn custom(field_type: impl FieldType + 'static, options: FieldOptions) -> Self {
        Self::new(FieldKind::Custom(Arc::new(field_type)), options)
    }

    /// Field kind.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Construction options.
    #[must_use]
    pub const fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Element field of a list field.
    #[must_use]
    pub fn container(&self) -> Option<&Arc<Field>> {
        match &self.kind {
            FieldKind::List(container) => Some(container),
            _ => None
        }
    }

    /// Wire key read for attribute `attr`.
    pub fn load_key<'a>(&'a self, attr: &'a str) -> &'a str {
        self.options.load_from.as_deref().unwrap_or(attr)
    }

    /// Wire key written for attribute `attr`.
    pub fn dump_key<'a>(&'a self, attr: &'a str) -> &'a str {
        self.options.dump_to.as_deref().unwrap_or(attr)
    }

    /// Append a validator, run after every successful deserialization.
    pub fn add_validator(&self, validator: Arc<dyn Validator>) {
        self.validators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(validator);
    }

    /// Number of attached validators.
    pub fn validator_count(&self) -> usize {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Attribute value to wire data.
    pub fn serialize(&self, value: &Value) -> Result<Json, Messages> {
        if value.is_none() {
            return Ok(Json::Null);
        }
        match &self.kind {
            FieldKind::Primitive(kind) => {
                serialize_primitive(*kind, value).map_err(Messages::single)
            }
            FieldKind::Enum(enum_type) => match value.as_enum() {
                Some(member) if enum_type.contains(member) => {
                    Ok(Json::String(member.name().to_string()))
                }
                _ => Err(Messages::single(format!("Invalid enum member {value}")))
            },
            FieldKind::Nested(model) if self.options.many => {
                let items = value.as_list().ok_or_else(invalid_input)?;
                let mut out = Vec::with_capacity(items.len());
                let mut errors = Messages::new();
                for (index, item) in items.iter().enumerate() {
                    match serialize_nested(model, item) {
                        Ok(json) => out.push(json),
                        Err(messages) => errors.nest(index.to_string(), messages)
                    }
                }
                if errors.is_empty() {
                    Ok(Json::Array(out))
                } else {
                    Err(errors)
                }
            }
            FieldKind::Nested(model) => serialize_nested(model, value),
            FieldKind::List(container) => {
                let items = value
                    .as_list()
                    .ok_or_else(|| Messages::single("Not a valid list."))?;
                let mut out = Vec::with_capacity(items.len());
                let mut errors = Messages::new();
                for (index, item) in items.iter().enumerate() {
                    match container.serialize(item) {
                        Ok(json) => out.push(json),
                        Err(messages) => errors.nest(index.to_string(), messages)
                    }
                }
                if errors.is_empty() {
                    Ok(Json::Array(out))
                } else {
                    Err(errors)
                }
            }
            FieldKind::Custom(custom) => custom.serialize(value).map_err(Messages::single)
        }
    }

    /// Wire data to attribute value, then run validators.
    pub fn deserialize(&self, data: &Json) -> Result<Value, Messages> {
        if data.is_null() {
            return if self.options.allow_none {
                Ok(Value::None)
            } else {
                Err(Messages::single("Field may not be null."))
            };
        }
        let value = self.convert(data)?;
        self.run_validators(&value)?;
        Ok(value)
    }

    fn convert(&self, data: &Json) -> Result<Value, Messages> {
        match &self.kind {
            FieldKind::Primitive(kind) => {
                deserialize_primitive(*kind, data).map_err(Messages::single)
            }
            FieldKind::Enum(enum_type) => data
                .as_str()
                .and_then(|name| enum_type.member(name))
                .map(Value::Enum)
                .ok_or_else(|| Messages::single(format!("Invalid enum member {data}"))),
            FieldKind::Nested(model) if self.options.many => {
                let items = data.as_array().ok_or_else(invalid_input)?;
                let mut out = Vec::with_capacity(items.len());
                let mut errors = Messages::new();
                for (index, item) in items.iter().enumerate() {
                    match deserialize_nested(model, item) {
                        Ok(value) => out.push(value),
                        Err(messages) => errors.nest(index.to_string(), messages)
                    }
                }
                if errors.is_empty() {
                    Ok(Value::List(out))
                } else {
                    Err(errors)
                }
            }
            FieldKind::Nested(model) => deserialize_nested(model, data),
            FieldKind::List(container) => {
                let items = data
                    .as_array()
                    .ok_or_else(|| Messages::single("Not a valid list."))?;
                let mut out = Vec::with_capacity(items.len());
                let mut errors = Messages::new();
                for (index, item) in items.iter().enumerate() {
                    match container.deserialize(item) {
                        Ok(value) => out.push(value),
                        Err(messages) => errors.nest(index.to_string(), messages)
                    }
                }
                if errors.is_empty() {
                    Ok(Value::List(out))
                } else {
                    Err(errors)
                }
            }
            FieldKind::Custom(custom) => custom.deserialize(data).map_err(Messages::single)
        }
    }

    fn run_validators(&self, value: &Value) -> Result<(), Messages> {
        let validators = self
            .validators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let failures: Vec<String> = validators
            .iter()
            .filter_map(|validator| validator.validate(value).err())
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Messages::List(failures))
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("validators", &self.validator_count())
            .finish()
    }
}

fn invalid_input() -> Messages {
    let mut messages = Messages::new();
    messages.push(SCHEMA_KEY, "Invalid input type.");
    messages
}

fn serialize_nested(model: &Arc<ModelClass>, value: &Value) -> Result<Json, Messages> {
    let instance = value.as_instance().ok_or_else(invalid_input)?;
    let (data, errors) = super::dump_attrs(model.schema(), &SchemaOptions::default(), instance);
    if errors.is_empty() {
        Ok(Json::Object(data))
    } else {
        Err(errors)
    }
}

fn deserialize_nested(model: &Arc<ModelClass>, data: &Json) -> Result<Value, Messages> {
    let (kwargs, errors) = super::load_attrs(model.schema(), &SchemaOptions::default(), data);
    if !errors.is_empty() {
        return Err(errors);
    }
    model.construct(kwargs).map(Value::Object).map_err(|err| {
        let mut messages = Messages::new();
        messages.push(SCHEMA_KEY, err.to_string());
        messages
    })
}

fn serialize_primitive(kind: PrimitiveKind, value: &Value) -> Result<Json, String> {
    match (kind, value) {
        (PrimitiveKind::Integer, Value::Int(v)) => Ok(Json::from(*v)),
        (PrimitiveKind::Integer, _) => Err("Not a valid integer.".to_string()),
        (PrimitiveKind::String, Value::Str(v)) => Ok(Json::String(v.clone())),
        (PrimitiveKind::String, _) => Err("Not a valid string.".to_string()),
        (PrimitiveKind::Boolean, Value::Bool(v)) => Ok(Json::Bool(*v)),
        (PrimitiveKind::Boolean, _) => Err("Not a valid boolean.".to_string()),
        (PrimitiveKind::Timestamp, Value::Timestamp(v)) => Ok(Json::String(format_timestamp(v))),
        (PrimitiveKind::Timestamp, _) => Err("Not a valid datetime.".to_string()),
        (PrimitiveKind::Raw, other) => Ok(other.to_json())
    }
}

fn deserialize_primitive(kind: PrimitiveKind, data: &Json) -> Result<Value, String> {
    match kind {
        PrimitiveKind::Integer => parse_integer(data)
            .map(Value::Int)
            .ok_or_else(|| "Not a valid integer.".to_string()),
        PrimitiveKind::String => data
            .as_str()
            .map(Value::from)
            .ok_or_else(|| "Not a valid string.".to_string()),
        PrimitiveKind::Boolean => parse_boolean(data)
            .map(Value::Bool)
            .ok_or_else(|| "Not a valid boolean.".to_string()),
        PrimitiveKind::Timestamp => data
            .as_str()
            .and_then(parse_timestamp)
            .map(Value::Timestamp)
            .ok_or_else(|| "Not a valid datetime.".to_string()),
        PrimitiveKind::Raw => Ok(Value::Raw(data.clone()))
    }
}

fn parse_integer(data: &Json) -> Option<i64> {
    match data {
        Json::Number(number) => number.as_i64(),
        Json::String(text) => text.trim().parse().ok(),
        _ => None
    }
}

fn parse_boolean(data: &Json) -> Option<bool> {
    match data {
        Json::Bool(flag) => Some(*flag),
        Json::Number(number) => match number.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None
        },
        Json::String(text) => match text.as_str() {
            "true" | "True" | "TRUE" | "1" => Some(true),
            "false" | "False" | "FALSE" | "0" => Some(false),
            _ => None
        },
        _ => None
    }
}

/// Accepts RFC 3339 (offsets are normalized to UTC) or a naive ISO-8601
/// timestamp.
pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::from_str(text).ok())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::{annotation::EnumMember, validate::Range};

    const COLOR: EnumType = EnumType::new("Color", &["Red", "Green"]);

    fn int_field() -> Field {
        Field::primitive(PrimitiveKind::Integer, FieldOptions::default())
    }

    #[test]
    fn integers_convert_both_ways() {
        let field = int_field();
        assert_eq!(field.serialize(&Value::Int(4)), Ok(json!(4)));
        assert_eq!(field.deserialize(&json!(4)), Ok(Value::Int(4)));
        assert_eq!(field.deserialize(&json!("12")), Ok(Value::Int(12)));
        assert_eq!(
            field.deserialize(&json!("four")),
            Err(Messages::single("Not a valid integer."))
        );
    }

    #[test]
    fn null_requires_allow_none() {
        let strict = int_field();
        assert_eq!(
            strict.deserialize(&Json::Null),
            Err(Messages::single("Field may not be null."))
        );
        let nullable = Field::primitive(
            PrimitiveKind::Integer,
            FieldOptions {
                allow_none: true,
                ..FieldOptions::default()
            }
        );
        assert_eq!(nullable.deserialize(&Json::Null), Ok(Value::None));
        assert_eq!(nullable.serialize(&Value::None), Ok(Json::Null));
    }

    #[test]
    fn enums_use_member_names() {
        let field = Field::new(FieldKind::Enum(COLOR), FieldOptions::default());
        let green = Value::Enum(EnumMember::new("Color", "Green"));
        assert_eq!(field.serialize(&green), Ok(json!("Green")));
        assert_eq!(field.deserialize(&json!("Green")), Ok(green));
        assert!(field.deserialize(&json!(1)).is_err());
    }

    #[test]
    fn timestamps_accept_offsets_and_naive_text() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .expect("valid date");
        assert_eq!(parse_timestamp("2020-01-02T03:04:05"), Some(expected));
        assert_eq!(parse_timestamp("2020-01-02T05:04:05+02:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn list_errors_are_keyed_by_index() {
        let field = Field::new(FieldKind::List(Arc::new(int_field())), FieldOptions::default());
        let err = field.deserialize(&json!([1, "x", 3])).expect_err("invalid element");
        assert_eq!(err.to_json(), json!({"1": ["Not a valid integer."]}));
    }

    #[test]
    fn validators_run_after_conversion() {
        let field = int_field();
        field.add_validator(Arc::new(Range::new(Some(1), Some(10))));
        assert_eq!(field.validator_count(), 1);
        assert_eq!(field.deserialize(&json!(5)), Ok(Value::Int(5)));
        assert!(field.deserialize(&json!(50)).is_err());
    }

    #[test]
    fn url_field_rejects_relative_urls() {
        let field = Field::custom(UrlField, FieldOptions::default());
        assert_eq!(
            field.serialize(&Value::from("http://example.com/")),
            Ok(json!("http://example.com/"))
        );
        assert_eq!(
            field.serialize(&Value::from("example.com/")),
            Err(Messages::single("Not a valid URL."))
        );
    }
}
