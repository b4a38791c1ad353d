// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declared parameter types.
//!
//! An [`Annotation`] is what a constructor parameter says its type is. It is a
//! closed tagged union: classification matches on the variant, never on type
//! names.
//!
//! # Vocabulary
//!
//! | Rust type | Annotation |
//! |-----------|------------|
//! | `i8`..`i64`, `u8`..`u32` | [`Annotation::Int`] |
//! | `String`, `&str` | [`Annotation::Str`] |
//! | `bool` | [`Annotation::Bool`] |
//! | `NaiveDateTime` | [`Annotation::Timestamp`] |
//! | [`Raw`], `serde_json::Value` | [`Annotation::Raw`] |
//! | `#[derive(SchemaEnum)]` enum | [`Annotation::Enum`] |
//! | `#[derive(Model)]` stub | [`Annotation::Model`] |
//! | [`One<T>`] | [`Annotation::One`] |
//! | [`Many<T>`], `Vec<T>` | [`Annotation::Many`] |
//! | `Option<T>` | same as `T` |
//!
//! Anything else can be expressed as [`Annotation::Named`] and given a field
//! through the factory's extended field map.

use std::{
    any::{TypeId, type_name},
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData
};

use chrono::NaiveDateTime;
use serde_json::Value as Json;

use crate::value::{Raw, Value};

/// Identity of a model in the process-wide registry.
///
/// Keys compare by [`TypeId`] of the stub type; the type name is kept only
/// for messages.
#[derive(Clone, Copy)]
pub struct ModelKey {
    type_id: TypeId,
    name:    &'static str
}

impl ModelKey {
    /// Key of stub type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name:    type_name::<T>()
        }
    }

    /// Full type name of the stub.
    pub const fn type_name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the stub type name.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for ModelKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelKey {}

impl Hash for ModelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelKey({})", self.name)
    }
}

/// An enumeration type: its name and the symbolic names of its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumType {
    name:    &'static str,
    members: &'static [&'static str]
}

impl EnumType {
    /// Describe an enumeration.
    pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
        Self {
            name,
            members
        }
    }

    /// Enumeration name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Member names in declaration order.
    pub const fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Look a member up by symbolic name.
    pub fn member(&self, name: &str) -> Option<EnumMember> {
        self.members
            .iter()
            .find(|m| **m == name)
            .map(|m| EnumMember::new(self.name, m))
    }

    /// Whether `member` belongs to this enumeration.
    pub fn contains(&self, member: &EnumMember) -> bool {
        member.enum_name == self.name && self.members.contains(&member.name)
    }
}

/// A member of an [`EnumType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumMember {
    enum_name: &'static str,
    name:      &'static str
}

impl EnumMember {
    /// Member `name` of enumeration `enum_name`.
    pub const fn new(enum_name: &'static str, name: &'static str) -> Self {
        Self {
            enum_name,
            name
        }
    }

    /// Owning enumeration name.
    pub const fn enum_name(&self) -> &'static str {
        self.enum_name
    }

    /// Symbolic member name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Rust enums usable as enumeration annotations.
///
/// Usually derived with `#[derive(SchemaEnum)]`.
pub trait SchemaEnum: Sized + 'static {
    /// Describe the enumeration.
    fn enum_type() -> EnumType;

    /// Symbolic name of this member.
    fn member_name(&self) -> &'static str;

    /// Member by symbolic name.
    fn from_member_name(name: &str) -> Option<Self>;

    /// This member as an [`EnumMember`].
    fn member(&self) -> EnumMember {
        EnumMember::new(Self::enum_type().name(), self.member_name())
    }

    /// Recover the Rust member from an attribute value.
    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_enum()
            .filter(|m| m.enum_name() == Self::enum_type().name())
            .and_then(|m| Self::from_member_name(m.name()))
    }
}

/// Declared type of a constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// Integer.
    Int,
    /// String.
    Str,
    /// Boolean.
    Bool,
    /// Timestamp.
    Timestamp,
    /// Untyped passthrough.
    Raw,
    /// Enumeration, encoded by member name.
    Enum(EnumType),
    /// A model type, only meaningful inside [`One`] or [`Many`].
    Model(ModelKey),
    /// Single nested reference.
    One(Box<Annotation>),
    /// Repeated collection.
    Many(Box<Annotation>),
    /// Opaque user type, resolvable only through an extended field map.
    Named(Cow<'static, str>)
}

impl Annotation {
    /// Annotation of Rust type `T`.
    pub fn of<T: Annotated + ?Sized>() -> Self {
        T::annotation()
    }

    /// Model annotation for stub type `T`.
    pub fn model<T: 'static>() -> Self {
        Self::Model(ModelKey::of::<T>())
    }

    /// `One[inner]`.
    pub fn one(inner: Self) -> Self {
        Self::One(Box::new(inner))
    }

    /// `Many[inner]`.
    pub fn many(inner: Self) -> Self {
        Self::Many(Box::new(inner))
    }

    /// Opaque named type.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }

    /// Whether this is a repeated collection.
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Whether this is the raw passthrough type.
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Str => f.write_str("str"),
            Self::Bool => f.write_str("bool"),
            Self::Timestamp => f.write_str("datetime"),
            Self::Raw => f.write_str("Raw"),
            Self::Enum(e) => f.write_str(e.name()),
            Self::Model(key) => f.write_str(key.short_name()),
            Self::One(inner) => write!(f, "One[{inner}]"),
            Self::Many(inner) => write!(f, "Many[{inner}]"),
            Self::Named(name) => f.write_str(name)
        }
    }
}

/// Marker for a single nested reference in a stub declaration.
pub struct One<T: ?Sized>(PhantomData<fn() -> Box<T>>);

/// Marker for a repeated collection in a stub declaration.
pub struct Many<T: ?Sized>(PhantomData<fn() -> Box<T>>);

/// Types that name an [`Annotation`].
pub trait Annotated {
    /// The annotation this type stands for.
    fn annotation() -> Annotation;
}

macro_rules! annotated {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl Annotated for $ty {
                fn annotation() -> Annotation {
                    Annotation::$variant
                }
            }
        )*
    };
}

annotated!(Int: i8, i16, i32, i64, u8, u16, u32);
annotated!(Str: String, str, &str);
annotated!(Bool: bool);
annotated!(Timestamp: NaiveDateTime);
annotated!(Raw: Raw, Json);

impl<T: Annotated> Annotated for Option<T> {
    fn annotation() -> Annotation {
        T::annotation()
    }
}

impl<T: Annotated> Annotated for Vec<T> {
    fn annotation() -> Annotation {
        Annotation::many(T::annotation())
    }
}

impl<T: Annotated + ?Sized> Annotated for One<T> {
    fn annotation() -> Annotation {
        Annotation::one(T::annotation())
    }
}

impl<T: Annotated + ?Sized> Annotated for Many<T> {
    fn annotation() -> Annotation {
        Annotation::many(T::annotation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub;

    const COLOR: EnumType = EnumType::new("Color", &["Red", "Green"]);

    #[test]
    fn rust_types_map_to_annotations() {
        assert_eq!(Annotation::of::<i64>(), Annotation::Int);
        assert_eq!(Annotation::of::<Option<String>>(), Annotation::Str);
        assert_eq!(Annotation::of::<Vec<bool>>(), Annotation::many(Annotation::Bool));
        assert_eq!(Annotation::of::<Many<Raw>>(), Annotation::many(Annotation::Raw));
        assert_eq!(Annotation::of::<One<u8>>(), Annotation::one(Annotation::Int));
    }

    #[test]
    fn model_keys_compare_by_type() {
        assert_eq!(ModelKey::of::<Stub>(), ModelKey::of::<Stub>());
        assert_ne!(ModelKey::of::<Stub>(), ModelKey::of::<String>());
        assert_eq!(ModelKey::of::<Stub>().short_name(), "Stub");
    }

    #[test]
    fn enum_members_resolve_by_name() {
        let member = COLOR.member("Green").expect("member");
        assert_eq!(member.name(), "Green");
        assert!(COLOR.contains(&member));
        assert!(COLOR.member("Blue").is_none());
        assert!(!COLOR.contains(&EnumMember::new("Other", "Green")));
    }

    #[test]
    fn display_renders_wrappers() {
        let ann = Annotation::many(Annotation::model::<Stub>());
        assert_eq!(ann.to_string(), "Many[Stub]");
        assert_eq!(Annotation::named("Url").to_string(), "Url");
    }
}
