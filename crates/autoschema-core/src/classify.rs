// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Annotation classification.
//!
//! Decides which kind of field an [`Annotation`] becomes. Rules are tried in
//! order, the first match wins:
//!
//! ```text
//! annotation
//!     │
//!     ├─ in extended field map? ──────────────► Extended
//!     │
//!     ├─ One[arg] / Many[arg]
//!     │      ├─ arg is a registered model ───► NestedOne / NestedMany
//!     │      ├─ arg is a model, unregistered ► error
//!     │      └─ arg is primitive or extended ► Repeated(inner)
//!     │
//!     ├─ bare model ──────────────────────────► error
//!     │
//!     ├─ int / str / bool / datetime / Raw ──► Primitive
//!     ├─ enumeration ─────────────────────────► Enum
//!     │
//!     └─ anything else ───────────────────────► error
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    annotation::{Annotation, EnumType},
    error::UnsupportedReason,
    model::ModelClass,
    registry,
    schema::{Field, FieldKind, FieldOptions}
};

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Integer.
    Integer,
    /// String.
    String,
    /// Boolean.
    Boolean,
    /// Timestamp as ISO-8601 text.
    Timestamp,
    /// Untyped passthrough.
    Raw
}

/// Builds a field from its options; the value type of an extended field map.
pub type FieldConstructor = Arc<dyn Fn(FieldOptions) -> Field + Send + Sync>;

/// User overrides consulted before the built-in rules.
pub type ExtendedFieldMap = HashMap<Annotation, FieldConstructor>;

/// Classified annotation.
#[derive(Clone)]
pub enum TypeDescriptor {
    /// Built-in scalar.
    Primitive(PrimitiveKind),
    /// Enumeration.
    Enum(EnumType),
    /// Single nested model.
    NestedOne(Arc<ModelClass>),
    /// Collection of nested models.
    NestedMany(Arc<ModelClass>),
    /// List whose elements are the inner descriptor.
    Repeated(Box<TypeDescriptor>),
    /// Field produced by a user constructor.
    Extended(FieldConstructor)
}

impl TypeDescriptor {
    /// Whether the attribute holds a list.
    pub const fn is_repeated(&self) -> bool {
        matches!(self, Self::NestedMany(_) | Self::Repeated(_))
    }

    /// Build the field descriptor.
    pub fn field(&self, options: FieldOptions) -> Field {
        match self {
            Self::Primitive(kind) => Field::primitive(*kind, options),
            Self::Enum(enum_type) => Field::new(FieldKind::Enum(*enum_type), options),
            Self::NestedOne(model) => Field::new(FieldKind::Nested(Arc::clone(model)), options),
            Self::NestedMany(model) => Field::new(
                FieldKind::Nested(Arc::clone(model)),
                FieldOptions {
                    many: true,
                    ..options
                }
            ),
            Self::Repeated(inner) => {
                let container = inner.field(FieldOptions::default());
                Field::new(FieldKind::List(Arc::new(container)), options)
            }
            Self::Extended(constructor) => constructor(options)
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "Primitive({kind:?})"),
            Self::Enum(e) => write!(f, "Enum({})", e.name()),
            Self::NestedOne(model) => write!(f, "NestedOne({})", model.name()),
            Self::NestedMany(model) => write!(f, "NestedMany({})", model.name()),
            Self::Repeated(inner) => write!(f, "Repeated({inner:?})"),
            Self::Extended(_) => f.write_str("Extended(..)")
        }
    }
}

/// Classify `annotation`, consulting `extended` first.
pub fn classify(
    annotation: &Annotation,
    extended: &ExtendedFieldMap
) -> Result<TypeDescriptor, UnsupportedReason> {
    if let Some(constructor) = extended.get(annotation) {
        return Ok(TypeDescriptor::Extended(Arc::clone(constructor)));
    }
    match annotation {
        Annotation::One(arg) => classify_nested(arg, false, extended),
        Annotation::Many(arg) => classify_nested(arg, true, extended),
        Annotation::Model(_) => Err(UnsupportedReason::BareModel),
        other => primitive(other).ok_or(UnsupportedReason::NotPrimitiveOrSchema)
    }
}

fn classify_nested(
    arg: &Annotation,
    many: bool,
    extended: &ExtendedFieldMap
) -> Result<TypeDescriptor, UnsupportedReason> {
    if let Annotation::Model(key) = arg {
        let model = registry::lookup(key).ok_or(UnsupportedReason::UnregisteredModel)?;
        return Ok(if many {
            TypeDescriptor::NestedMany(model)
        } else {
            TypeDescriptor::NestedOne(model)
        });
    }
    // Non-model arguments become a list for One as well as Many.
    let inner = match extended.get(arg) {
        Some(constructor) => TypeDescriptor::Extended(Arc::clone(constructor)),
        None => primitive(arg).ok_or(UnsupportedReason::InvalidNestedArgument)?
    };
    Ok(TypeDescriptor::Repeated(Box::new(inner)))
}

fn primitive(annotation: &Annotation) -> Option<TypeDescriptor> {
    let kind = match annotation {
        Annotation::Int => PrimitiveKind::Integer,
        Annotation::Str => PrimitiveKind::String,
        Annotation::Bool => PrimitiveKind::Boolean,
        Annotation::Timestamp => PrimitiveKind::Timestamp,
        Annotation::Raw => PrimitiveKind::Raw,
        Annotation::Enum(enum_type) => return Some(TypeDescriptor::Enum(*enum_type)),
        _ => return None
    };
    Some(TypeDescriptor::Primitive(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotation::ModelKey, schema::UrlField};

    struct Unregistered;

    fn no_extensions() -> ExtendedFieldMap {
        ExtendedFieldMap::new()
    }

    #[test]
    fn primitives_and_enums() {
        let ext = no_extensions();
        assert!(matches!(
            classify(&Annotation::Int, &ext),
            Ok(TypeDescriptor::Primitive(PrimitiveKind::Integer))
        ));
        assert!(matches!(
            classify(&Annotation::Timestamp, &ext),
            Ok(TypeDescriptor::Primitive(PrimitiveKind::Timestamp))
        ));
        let color = EnumType::new("Color", &["Red"]);
        assert!(matches!(
            classify(&Annotation::Enum(color), &ext),
            Ok(TypeDescriptor::Enum(e)) if e == color
        ));
    }

    #[test]
    fn many_primitive_is_repeated() {
        let descriptor = classify(&Annotation::many(Annotation::Str), &no_extensions())
            .expect("classified");
        assert!(descriptor.is_repeated());
        let field = descriptor.field(FieldOptions::default());
        assert!(field.container().is_some());
    }

    #[test]
    fn one_primitive_is_repeated_too() {
        let descriptor = classify(&Annotation::one(Annotation::Int), &no_extensions())
            .expect("classified");
        assert!(matches!(
            descriptor,
            TypeDescriptor::Repeated(ref inner)
                if matches!(**inner, TypeDescriptor::Primitive(PrimitiveKind::Integer))
        ));
        let field = descriptor.field(FieldOptions::default());
        assert!(field.container().is_some());
        assert!(!field.options().many);
    }

    #[test]
    fn models_need_wrappers_and_registration() {
        let ext = no_extensions();
        let key = ModelKey::of::<Unregistered>();
        assert_eq!(
            classify(&Annotation::Model(key), &ext).err(),
            Some(UnsupportedReason::BareModel)
        );
        assert_eq!(
            classify(&Annotation::many(Annotation::Model(key)), &ext).err(),
            Some(UnsupportedReason::UnregisteredModel)
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        let ext = no_extensions();
        assert_eq!(
            classify(&Annotation::named("Url"), &ext).err(),
            Some(UnsupportedReason::NotPrimitiveOrSchema)
        );
        assert_eq!(
            classify(&Annotation::many(Annotation::named("Url")), &ext).err(),
            Some(UnsupportedReason::InvalidNestedArgument)
        );
    }

    #[test]
    fn extended_map_wins() {
        let mut ext = no_extensions();
        let url: FieldConstructor = Arc::new(|options| Field::custom(UrlField, options));
        ext.insert(Annotation::named("Url"), url);

        let direct = classify(&Annotation::named("Url"), &ext).expect("extended");
        assert!(matches!(direct, TypeDescriptor::Extended(_)));

        let many = classify(&Annotation::many(Annotation::named("Url")), &ext).expect("extended");
        assert!(matches!(many, TypeDescriptor::Repeated(ref inner)
            if matches!(**inner, TypeDescriptor::Extended(_))));
    }
}
