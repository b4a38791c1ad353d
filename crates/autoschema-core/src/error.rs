// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error taxonomy.
//!
//! Errors are split by the phase that raises them:
//!
//! | Error | Raised | Meaning |
//! |-------|--------|---------|
//! | [`DefinitionError`] | registration | the model declaration itself is wrong |
//! | [`ClassificationError`] | registration | an annotation cannot become a field |
//! | [`ConstructError`] | instantiation | arguments do not fit the constructor |
//! | [`ValidationError`] | dump / load | wire data failed schema validation |
//!
//! Definition errors are never caught internally. They abort registration so
//! a misconfigured model fails at startup instead of at first use.

use std::error::Error as StdError;

use thiserror::Error as ThisError;

use crate::schema::Messages;

/// Boxed error returned by user supplied initializer hooks.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Why an annotation could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum UnsupportedReason {
    /// The parameter carries no annotation at all.
    #[error("the parameter has no annotation")]
    MissingAnnotation,

    /// Neither a primitive type nor a model with a generated schema.
    #[error("it is neither a primitive type nor a schema")]
    NotPrimitiveOrSchema,

    /// A model referenced without a `One`/`Many` wrapper.
    #[error("nested models must be wrapped in One<T> or Many<T>")]
    BareModel,

    /// A nested reference to a model that has not been registered.
    #[error("the referenced model has no generated schema")]
    UnregisteredModel,

    /// The argument of `One`/`Many` is itself unsupported.
    #[error("the nested argument is neither a registered model nor a primitive")]
    InvalidNestedArgument
}

/// Annotation resolution failure.
///
/// Always names the model and the parameter the annotation was found on.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unsupported annotation `{annotation}` on `{model}.{parameter}`: {reason}")]
pub struct ClassificationError {
    /// Model being registered.
    pub model:      String,
    /// Keyword-only parameter carrying the annotation.
    pub parameter:  String,
    /// Rendered annotation.
    pub annotation: String,
    /// Why classification failed.
    pub reason:     UnsupportedReason
}

/// Error raised while registering a model.
#[derive(Debug, ThisError)]
pub enum DefinitionError {
    /// The target has no generated schema.
    #[error(
        "{model} does not appear to be a valid model, as it does not have a generated schema"
    )]
    MissingSchema {
        /// Name of the offending type.
        model: String
    },

    /// An annotation could not be turned into a field.
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    /// A declared base model has not been registered yet.
    #[error("base `{base}` of `{model}` has no generated schema; register it first")]
    UnregisteredBase {
        /// Model being registered.
        model: String,
        /// Missing base.
        base:  String
    },

    /// The declared bases admit no consistent resolution order.
    #[error("cannot create a consistent method resolution order for `{model}`")]
    InconsistentHierarchy {
        /// Model being registered.
        model: String
    },

    /// The model has already been registered.
    #[error("model `{model}` is already registered")]
    AlreadyRegistered {
        /// Model being registered.
        model: String
    },

    /// A validator targets an attribute the schema does not declare.
    #[error("`{model}` has no generated field named `{field}`")]
    UnknownField {
        /// Model owning the schema.
        model: String,
        /// Requested attribute.
        field: String
    }
}

/// Error raised by a model constructor.
#[derive(Debug, ThisError)]
pub enum ConstructError {
    /// A parameter without default was not supplied.
    #[error("{model}: missing required keyword argument `{argument}`")]
    MissingArgument {
        /// Model whose constructor rejected the call.
        model:    String,
        /// Missing parameter.
        argument: String
    },

    /// A user initializer hook failed.
    #[error("{model}: initializer failed: {source}")]
    Init {
        /// Class whose hook failed.
        model:  String,
        /// Error returned by the hook.
        #[source]
        source: BoxError
    }
}

/// Wire data failed schema validation.
///
/// `messages` mirrors the shape of the input: a map from wire field name to
/// a list of messages, or to a nested map for nested and repeated fields.
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("validation failed: {messages}")]
pub struct ValidationError {
    /// Collected messages.
    pub messages: Messages
}

impl ValidationError {
    /// Wrap collected messages.
    pub const fn new(messages: Messages) -> Self {
        Self {
            messages
        }
    }
}

/// Umbrella error for the dump/load entry points.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Registration failure.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Constructor failure, passed through unmodified.
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// Validation failure, passed through unmodified.
    #[error(transparent)]
    Validation(#[from] ValidationError)
}

impl Error {
    /// Validation messages, if this is a validation failure.
    pub fn messages(&self) -> Option<&Messages> {
        match self {
            Self::Validation(err) => Some(&err.messages),
            _ => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_error_names_model_and_annotation() {
        let err = ClassificationError {
            model:      "Page".to_string(),
            parameter:  "target".to_string(),
            annotation: "Url".to_string(),
            reason:     UnsupportedReason::NotPrimitiveOrSchema
        };
        let text = err.to_string();
        assert!(text.contains("`Url`"));
        assert!(text.contains("Page.target"));
        assert!(text.contains("neither a primitive type nor a schema"));
    }

    #[test]
    fn classification_converts_into_definition_error() {
        let err: DefinitionError = ClassificationError {
            model:      "A".to_string(),
            parameter:  "x".to_string(),
            annotation: "Foo".to_string(),
            reason:     UnsupportedReason::NotPrimitiveOrSchema
        }
        .into();
        assert!(matches!(err, DefinitionError::Classification(_)));
    }

    #[test]
    fn init_error_keeps_source() {
        let err = ConstructError::Init {
            model:  "A".to_string(),
            source: "boom".into()
        };
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "A: initializer failed: boom");
    }

    #[test]
    fn umbrella_exposes_messages() {
        let mut messages = Messages::new();
        messages.push("x", "Not a valid integer.");
        let err: Error = ValidationError::new(messages.clone()).into();
        assert_eq!(err.messages(), Some(&messages));

        let err: Error = ConstructError::MissingArgument {
            model:    "A".to_string(),
            argument: "x".to_string()
        }
        .into();
        assert!(err.messages().is_none());
    }
}
