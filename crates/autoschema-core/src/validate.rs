// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validators and their attachment to generated fields.
//!
//! Validators run on load, after a field has converted its wire data. They
//! are attached to a registered model's generated field:
//!
//! ```rust,ignore
//! validate_field("popularity", Range::new(Some(1), Some(10))).apply::<PageRank>()?;
//! validate_field("links", Url).apply::<PageRank>()?; // each element of the list
//! ```
//!
//! # Built-in Validators
//!
//! | Validator | Accepts | Message |
//! |-----------|---------|---------|
//! | [`Range`] | integers within bounds | `Must be between 1 and 10.` |
//! | [`Length`] | strings and lists within bounds | `Longer than maximum length 5.` |
//! | [`OneOf`] | listed values | `Not a valid choice.` |
//! | [`Url`] | absolute URLs | `Not a valid URL.` |
//!
//! Any `Fn(&Value) -> Result<(), String>` closure is a validator too.

use std::sync::Arc;

use validator::ValidateUrl;

use crate::{
    annotation::ModelKey,
    error::DefinitionError,
    model::ModelClass,
    registry,
    value::Value
};

/// Checks one loaded value.
pub trait Validator: Send + Sync {
    /// `Err` carries the message reported for the field.
    fn validate(&self, value: &Value) -> Result<(), String>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<(), String> + Send + Sync
{
    fn validate(&self, value: &Value) -> Result<(), String> {
        self(value)
    }
}

/// Integer bounds, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    min: Option<i64>,
    max: Option<i64>
}

impl Range {
    /// Bounds; `None` leaves that side open.
    pub const fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            min,
            max
        }
    }

    fn message(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Must be between {min} and {max}."),
            (Some(min), None) => format!("Must be at least {min}."),
            (None, Some(max)) => format!("Must be at most {max}."),
            (None, None) => "Not a valid number.".to_string()
        }
    }
}

impl Validator for Range {
    fn validate(&self, value: &Value) -> Result<(), String> {
        let Some(number) = value.as_int() else {
            return Err(self.message());
        };
        let above_min = self.min.is_none_or(|min| number >= min);
        let below_max = self.max.is_none_or(|max| number <= max);
        if above_min && below_max {
            Ok(())
        } else {
            Err(self.message())
        }
    }
}

/// Length bounds for strings (in characters) and lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>
}

impl Length {
    /// Bounds; `None` leaves that side open.
    pub const fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            min,
            max
        }
    }
}

impl Validator for Length {
    fn validate(&self, value: &Value) -> Result<(), String> {
        let length = match value {
            Value::Str(text) => text.chars().count(),
            Value::List(items) => items.len(),
            _ => return Err("Not a valid length.".to_string())
        };
        match (self.min, self.max) {
            (Some(min), Some(max)) if length < min || length > max => {
                Err(format!("Length must be between {min} and {max}."))
            }
            (Some(min), None) if length < min => Err(format!("Shorter than minimum length {min}.")),
            (None, Some(max)) if length > max => Err(format!("Longer than maximum length {max}.")),
            _ => Ok(())
        }
    }
}

/// Value must equal one of the choices.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    choices: Vec<Value>
}

impl OneOf {
    /// Allowed values.
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect()
        }
    }
}

impl Validator for OneOf {
    fn validate(&self, value: &Value) -> Result<(), String> {
        if self.choices.contains(value) {
            Ok(())
        } else {
            Err("Not a valid choice.".to_string())
        }
    }
}

/// String must be an absolute URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Url;

impl Validator for Url {
    fn validate(&self, value: &Value) -> Result<(), String> {
        match value.as_str() {
            Some(text) if text.validate_url() => Ok(()),
            _ => Err("Not a valid URL.".to_string())
        }
    }
}

/// Attach `validator` to the generated field of attribute `attr`.
///
/// Element validation is on by default: for a list field the validator
/// checks each element. Finish with [`ValidateField::apply`] or
/// [`ValidateField::apply_to`].
pub fn validate_field(attr: impl Into<String>, validator: impl Validator + 'static) -> ValidateField {
    ValidateField {
        attr:           attr.into(),
        validator:      Arc::new(validator),
        validate_child: true
    }
}

/// Pending validator attachment.
#[must_use = "a validator is only attached by apply or apply_to"]
pub struct ValidateField {
    attr:           String,
    validator:      Arc<dyn Validator>,
    validate_child: bool
}

impl ValidateField {
    /// Validate list elements (`true`) or the list itself (`false`).
    pub fn validate_child(mut self, validate_child: bool) -> Self {
        self.validate_child = validate_child;
        self
    }

    /// Attach to the registered model declared by `M`.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::MissingSchema`] when `M` is not registered, or
    /// [`DefinitionError::UnknownField`] when `attr` has no generated field.
    pub fn apply<M: 'static>(self) -> Result<Arc<ModelClass>, DefinitionError> {
        let key = ModelKey::of::<M>();
        let model = registry::lookup(&key).ok_or_else(|| DefinitionError::MissingSchema {
            model: key.short_name().to_string()
        })?;
        self.apply_to(&model)?;
        Ok(model)
    }

    /// Attach to `model`.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::UnknownField`] when `attr` has no generated field.
    pub fn apply_to(self, model: &ModelClass) -> Result<(), DefinitionError> {
        let field = model
            .schema()
            .field(&self.attr)
            .ok_or_else(|| DefinitionError::UnknownField {
                model: model.name().to_string(),
                field: self.attr.clone()
            })?;
        let target = match field.container() {
            Some(container) if self.validate_child => container,
            _ => field
        };
        target.add_validator(self.validator);
        tracing::debug!(model = %model.name(), field = %self.attr, "attached validator");
        Ok(())
    }
}
