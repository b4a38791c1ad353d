// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema factories.
//!
//! A [`SchemaFactory`] turns stubs into registered models. It carries the
//! configuration shared by every model it registers:
//!
//! | Setting | Default | Purpose |
//! |---------|---------|---------|
//! | `field_namer` | identity | attribute name to wire name |
//! | `schema_base` | `FactorySchema` | root of generated schemas |
//! | `extended_field_map` | empty | annotation overrides |
//!
//! # Registration Pipeline
//!
//! ```text
//! Stub ─► resolve bases ─► linearize ─► analyze signature
//!                                              │
//!   registry ◄─ pipeline ◄─ assemble schema ◄─ synthesize fields
//! ```
//!
//! # Example
//!
//! ```rust
//! use autoschema_core::{Annotation, SchemaFactory, Stub, kwargs};
//!
//! struct Point;
//!
//! let factory = SchemaFactory::default();
//! let point = factory
//!     .register(
//!         Stub::builder::<Point>("Point")
//!             .keyword("x", Annotation::Int)
//!             .keyword("y", Annotation::Int)
//!             .build()
//!     )
//!     .unwrap();
//!
//! let p = point.construct(kwargs! { "x" => 1, "y" => 2 }).unwrap();
//! assert_eq!(p.dump().unwrap(), serde_json::json!({"x": 1, "y": 2}));
//! ```

use std::{
    fmt,
    sync::{Arc, LazyLock}
};

use convert_case::{Case, Casing};

use crate::{
    annotation::Annotation,
    assemble::assemble,
    classify::{ExtendedFieldMap, FieldConstructor},
    construct::pipeline,
    error::DefinitionError,
    model::{Ancestor, Base, ModelClass, ModelStub, Stub},
    mro::linearize,
    registry,
    schema::{Field, FieldOptions, FieldType, SchemaBase},
    signature::analyze,
    synthesize::{Naming, synthesize_all}
};

/// Attribute name to wire name policy.
#[derive(Clone)]
pub struct FieldNamer(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl FieldNamer {
    /// Custom policy.
    pub fn new<F>(namer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static
    {
        Self(Arc::new(namer))
    }

    /// Wire name equals attribute name.
    pub fn identity() -> Self {
        Self::new(str::to_string)
    }

    /// `snake_case` attributes become `camelCase` wire names.
    pub fn camel_case() -> Self {
        Self::new(|attr| attr.to_case(Case::Camel))
    }

    /// Apply the policy.
    pub fn apply(&self, attr: &str) -> String {
        (self.0)(attr)
    }
}

impl Default for FieldNamer {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for FieldNamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldNamer(..)")
    }
}

/// Registers stubs as models.
#[derive(Default)]
pub struct SchemaFactory {
    field_namer:        FieldNamer,
    schema_base:        SchemaBase,
    extended_field_map: ExtendedFieldMap
}

impl SchemaFactory {
    /// Start configuring a factory.
    pub fn builder() -> SchemaFactoryBuilder {
        SchemaFactoryBuilder::default()
    }

    /// Naming policy.
    #[must_use]
    pub const fn field_namer(&self) -> &FieldNamer {
        &self.field_namer
    }

    /// Root of generated schemas.
    #[must_use]
    pub const fn schema_base(&self) -> &SchemaBase {
        &self.schema_base
    }

    /// Annotation overrides.
    #[must_use]
    pub const fn extended_field_map(&self) -> &ExtendedFieldMap {
        &self.extended_field_map
    }

    /// Register the model declared by `M`.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn register_model<M: ModelStub>(&self) -> Result<Arc<ModelClass>, DefinitionError> {
        self.register(M::stub())
    }

    /// Generate the schema and constructor of `stub` and register it.
    ///
    /// # Errors
    ///
    /// - [`DefinitionError::UnregisteredBase`] when a base model is unknown
    /// - [`DefinitionError::InconsistentHierarchy`] when bases cannot be ordered
    /// - [`DefinitionError::Classification`] for an unsupported annotation
    /// - [`DefinitionError::AlreadyRegistered`] when the key is taken
    pub fn register(&self, stub: Stub) -> Result<Arc<ModelClass>, DefinitionError> {
        let Stub {
            key,
            name,
            bases,
            signature,
            init,
            irregular_names
        } = stub;

        let bases = bases
            .into_iter()
            .map(|base| match base {
                Base::Model(base_key) => registry::lookup(&base_key)
                    .map(Ancestor::Model)
                    .ok_or_else(|| DefinitionError::UnregisteredBase {
                        model: name.clone(),
                        base:  base_key.short_name().to_string()
                    }),
                Base::Plain(plain) => Ok(Ancestor::Plain(plain))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mro = linearize(&name, &bases)?;

        let fieldspecs = analyze(&signature);
        let naming = Naming {
            irregular_names: &irregular_names,
            field_namer:     &self.field_namer
        };
        let declared = synthesize_all(&name, &fieldspecs, &naming, &self.extended_field_map)?;
        let schema = Arc::new(assemble(&name, key, &mro, declared, &self.schema_base));
        let chain = pipeline(&mro);

        let model = Arc::new(ModelClass {
            key,
            name,
            bases,
            mro,
            signature,
            fieldspecs,
            init,
            irregular_names,
            field_namer: self.field_namer.clone(),
            schema,
            chain
        });
        registry::insert(Arc::clone(&model))?;

        tracing::debug!(
            model = %model.name(),
            schema = %model.schema().name(),
            fields = model.schema().fields().len(),
            levels = model.chain().len() + 1,
            "registered model"
        );
        Ok(model)
    }
}

impl fmt::Debug for SchemaFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaFactory")
            .field("schema_base", &self.schema_base)
            .field("extended_fields", &self.extended_field_map.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SchemaFactory`].
#[derive(Default)]
pub struct SchemaFactoryBuilder {
    factory: SchemaFactory
}

impl SchemaFactoryBuilder {
    /// Set the naming policy.
    #[must_use]
    pub fn field_namer<F>(mut self, namer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static
    {
        self.factory.field_namer = FieldNamer::new(namer);
        self
    }

    /// Set a prepared naming policy.
    #[must_use]
    pub fn namer(mut self, namer: FieldNamer) -> Self {
        self.factory.field_namer = namer;
        self
    }

    /// Set the root of generated schemas.
    #[must_use]
    pub fn schema_base(mut self, base: SchemaBase) -> Self {
        self.factory.schema_base = base;
        self
    }

    /// Build fields for `annotation` with `constructor`.
    #[must_use]
    pub fn extend_field<F>(mut self, annotation: Annotation, constructor: F) -> Self
    where
        F: Fn(FieldOptions) -> Field + Send + Sync + 'static
    {
        let constructor: FieldConstructor = Arc::new(constructor);
        self.factory
            .extended_field_map
            .insert(annotation, constructor);
        self
    }

    /// Back fields for `annotation` with `field_type`.
    #[must_use]
    pub fn extend_field_type<T>(self, annotation: Annotation, field_type: T) -> Self
    where
        T: FieldType + Clone + 'static
    {
        self.extend_field(annotation, move |options| {
            Field::custom(field_type.clone(), options)
        })
    }

    /// Finish configuration.
    #[must_use]
    pub fn build(self) -> SchemaFactory {
        self.factory
    }
}

static AUTOSCHEMA: LazyLock<SchemaFactory> = LazyLock::new(SchemaFactory::default);

static AUTOSCHEMA_CAMELCASE: LazyLock<SchemaFactory> =
    LazyLock::new(|| SchemaFactory::builder().namer(FieldNamer::camel_case()).build());

/// Factory with default settings.
pub fn autoschema() -> &'static SchemaFactory {
    &AUTOSCHEMA
}

/// Factory producing `camelCase` wire names.
pub fn autoschema_camelcase() -> &'static SchemaFactory {
    &AUTOSCHEMA_CAMELCASE
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering}
    };

    use serde_json::json;

    use super::*;
    use crate::{
        annotation::EnumType,
        error::{ConstructError, Error, UnsupportedReason},
        kwargs,
        model::PlainClass,
        schema::{SchemaOptions, Unknown, UrlField},
        signature::{Parameter, Signature},
        value::Value
    };

    const COLOR: EnumType = EnumType::new("Color", &["Red", "Green", "Blue"]);

    #[test]
    fn point_round_trip() {
        struct Point;
        let point = autoschema()
            .register(
                Stub::builder::<Point>("Point")
                    .keyword("x", Annotation::Int)
                    .keyword("y", Annotation::Int)
                    .build()
            )
            .expect("registered");

        let p = point.construct(kwargs! { "x" => 1, "y" => 2 }).expect("constructed");
        let data = p.dump().expect("dumped");
        assert_eq!(data, json!({"x": 1, "y": 2}));

        let back = point.load(&data).expect("loaded");
        assert_eq!(back.get("x"), Some(&Value::Int(1)));
        assert_eq!(back.get("y"), Some(&Value::Int(2)));
        assert_eq!(back, p);
    }

    #[test]
    fn required_and_nullable_fields() {
        struct Note;
        let note = autoschema()
            .register(
                Stub::builder::<Note>("Note")
                    .keyword("text", Annotation::Str)
                    .keyword_none("author", Annotation::Str)
                    .build()
            )
            .expect("registered");

        let err = note.construct(kwargs! {}).expect_err("text is required");
        assert!(matches!(
            err,
            ConstructError::MissingArgument { ref argument, .. } if argument == "text"
        ));

        let n = note
            .construct(kwargs! { "text" => "hi", "author" => Value::None })
            .expect("none accepted");
        assert_eq!(n.get("author"), Some(&Value::None));

        let loaded = note.load(&json!({"text": "hi", "author": null})).expect("null loads");
        assert_eq!(loaded.get("author"), Some(&Value::None));
    }

    #[test]
    fn empty_collections_for_absent_many_and_raw() {
        struct Bag;
        let bag = autoschema()
            .register(
                Stub::builder::<Bag>("Bag")
                    .keyword_none("items", Annotation::many(Annotation::Int))
                    .keyword_none("extra", Annotation::Raw)
                    .build()
            )
            .expect("registered");
        let b = bag.construct(kwargs! {}).expect("constructed");
        assert_eq!(b.get("items"), Some(&Value::List(Vec::new())));
        assert_eq!(b.get("extra"), Some(&Value::empty_mapping()));
        assert_eq!(b.dump().expect("dumped"), json!({"items": [], "extra": {}}));
    }

    #[test]
    fn factory_default_is_fresh_per_instance() {
        struct Counter;
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let counter = autoschema()
            .register(
                Stub::builder::<Counter>("Counter")
                    .keyword_factory("n", Annotation::Int, || {
                        Value::from(CALLS.fetch_add(1, Ordering::SeqCst) as i64)
                    })
                    .build()
            )
            .expect("registered");
        let first = counter.construct(kwargs! {}).expect("first");
        let second = counter.construct(kwargs! {}).expect("second");
        assert_ne!(first.get("n"), second.get("n"));

        let before = CALLS.load(Ordering::SeqCst);
        counter.construct(kwargs! { "n" => 7 }).expect("explicit");
        assert_eq!(CALLS.load(Ordering::SeqCst), before);
    }

    #[test]
    fn enums_serialize_by_name() {
        struct Paint;
        let paint = autoschema()
            .register(
                Stub::builder::<Paint>("Paint")
                    .keyword("color", Annotation::Enum(COLOR))
                    .build()
            )
            .expect("registered");
        let green = COLOR.member("Green").expect("member");
        let p = paint.construct(kwargs! { "color" => green }).expect("constructed");
        assert_eq!(p.dump().expect("dumped"), json!({"color": "Green"}));
        let back = paint.load(&json!({"color": "Green"})).expect("loaded");
        assert_eq!(back.get("color"), Some(&Value::Enum(green)));

        let err = paint.load(&json!({"color": 1})).expect_err("ordinal rejected");
        assert!(err.messages().and_then(|m| m.get("color")).is_some());
    }

    #[test]
    fn unsupported_annotation_fails_registration() {
        struct Page;
        let err = autoschema()
            .register(
                Stub::builder::<Page>("Page")
                    .keyword("target", Annotation::named("Url"))
                    .build()
            )
            .expect_err("unsupported");
        match err {
            DefinitionError::Classification(err) => {
                assert_eq!(err.model, "Page");
                assert_eq!(err.annotation, "Url");
                assert_eq!(err.reason, UnsupportedReason::NotPrimitiveOrSchema);
            }
            other => panic!("unexpected error: {other}")
        }
        assert!(registry::model_of::<Page>().is_none());
    }

    #[test]
    fn three_level_chain_assigns_each_level_once() {
        struct A;
        struct B;
        struct C;
        static RUNS: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
        let record = |name: &'static str| {
            move |_: &mut crate::Instance, _: &crate::Kwargs| {
                RUNS.lock().expect("lock").push(name);
                Ok::<(), crate::error::BoxError>(())
            }
        };

        let factory = SchemaFactory::default();
        factory
            .register(
                Stub::builder::<A>("A")
                    .keyword("a", Annotation::Int)
                    .init(record("A"))
                    .build()
            )
            .expect("A");
        factory
            .register(
                Stub::builder::<B>("B")
                    .extends::<A>()
                    .keyword("b", Annotation::Str)
                    .init(record("B"))
                    .build()
            )
            .expect("B");
        let c = factory
            .register(
                Stub::builder::<C>("C")
                    .extends::<B>()
                    .keyword("c", Annotation::Bool)
                    .init(record("C"))
                    .build()
            )
            .expect("C");

        let instance = c
            .construct(kwargs! { "a" => 1, "b" => "two", "c" => true })
            .expect("constructed");
        assert_eq!(*RUNS.lock().expect("lock"), ["A", "B", "C"]);
        let attrs: Vec<&str> = instance.attrs().map(|(name, _)| name).collect();
        assert_eq!(attrs, ["a", "b", "c"]);

        assert_eq!(c.schema().base_names(), ["BSchema", "ASchema", "FactorySchema"]);
        assert_eq!(
            instance.dump().expect("dumped"),
            json!({"a": 1, "b": "two", "c": true})
        );
    }

    #[test]
    fn diamond_runs_shared_base_once() {
        struct Top;
        struct Left;
        struct Right;
        struct Bottom;
        static TOP_RUNS: AtomicUsize = AtomicUsize::new(0);

        let factory = SchemaFactory::default();
        factory
            .register(
                Stub::builder::<Top>("Top")
                    .keyword_default("t", Annotation::Int, 0)
                    .init(|_, _| {
                        TOP_RUNS.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                    .build()
            )
            .expect("Top");
        factory
            .register(
                Stub::builder::<Left>("Left")
                    .extends::<Top>()
                    .keyword_default("l", Annotation::Int, 1)
                    .build()
            )
            .expect("Left");
        factory
            .register(
                Stub::builder::<Right>("Right")
                    .extends::<Top>()
                    .keyword_default("r", Annotation::Int, 2)
                    .build()
            )
            .expect("Right");
        let bottom = factory
            .register(
                Stub::builder::<Bottom>("Bottom")
                    .extends::<Left>()
                    .extends::<Right>()
                    .build()
            )
            .expect("Bottom");

        let names: Vec<&str> = bottom.mro().iter().map(Ancestor::name).collect();
        assert_eq!(names, ["Left", "Right", "Top", "object"]);

        let instance = bottom.construct(kwargs! { "r" => 5 }).expect("constructed");
        assert_eq!(TOP_RUNS.load(Ordering::SeqCst), 1);
        assert_eq!(instance.get("r"), Some(&Value::Int(5)));
        assert_eq!(instance.get("l"), Some(&Value::Int(1)));
        assert_eq!(instance.get("t"), Some(&Value::Int(0)));
    }

    #[test]
    fn subclass_relations_follow_the_hierarchy() {
        struct Animal;
        struct Dog;
        struct Rock;
        let animal = autoschema()
            .register(
                Stub::builder::<Animal>("Animal")
                    .keyword("legs", Annotation::Int)
                    .build()
            )
            .expect("Animal");
        let dog = autoschema()
            .register(Stub::builder::<Dog>("Dog").extends::<Animal>().build())
            .expect("Dog");
        let rock = autoschema()
            .register(Stub::builder::<Rock>("Rock").build())
            .expect("Rock");

        assert!(dog.is_subclass_of(&animal));
        assert!(!animal.is_subclass_of(&dog));
        assert!(dog.schema().is_subschema_of(animal.schema()));
        assert!(dog.schema().is_subschema_of(dog.schema()));
        assert!(!rock.schema().is_subschema_of(animal.schema()));

        let fido = dog.construct(kwargs! { "legs" => 4 }).expect("constructed");
        assert!(fido.is_instance_of(&dog));
        assert!(fido.is_instance_of(&animal));
        assert!(!fido.is_instance_of(&rock));

        let names = registry::registered_names();
        assert!(["Animal", "Dog", "Rock"]
            .iter()
            .all(|name| names.iter().any(|n| n == name)));
        assert!(registry::is_registered(&dog.key()));
    }

    #[test]
    fn plain_ancestor_receives_sifted_arguments() {
        struct Tagged;
        static SEEN: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let plain = Arc::new(
            PlainClass::new("Base", Signature::new().param(Parameter::positional("tag")))
                .with_init(|instance, args| {
                    let keys = args.keys().cloned();
                    SEEN.lock().expect("lock").extend(keys);
                    instance.set("tag_seen", true);
                    Ok(())
                })
        );
        let tagged = autoschema()
            .register(
                Stub::builder::<Tagged>("Tagged")
                    .extends_plain(plain)
                    .keyword("value", Annotation::Int)
                    .build()
            )
            .expect("registered");

        let instance = tagged
            .construct(kwargs! { "tag" => "x", "value" => 3 })
            .expect("constructed");
        assert_eq!(*SEEN.lock().expect("lock"), ["tag"]);
        assert_eq!(instance.get("tag_seen"), Some(&Value::Bool(true)));
    }

    #[test]
    fn unaccepted_arguments_are_sifted_out() {
        struct Strict;
        struct Open;
        static STRICT_SEEN: Mutex<Vec<String>> = Mutex::new(Vec::new());
        static OPEN_SEEN: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let strict = autoschema()
            .register(
                Stub::builder::<Strict>("Strict")
                    .keyword("x", Annotation::Int)
                    .init(|_, args| {
                        STRICT_SEEN.lock().expect("lock").extend(args.keys().cloned());
                        Ok(())
                    })
                    .build()
            )
            .expect("registered");
        let instance = strict
            .construct(kwargs! { "x" => 1, "y" => 2 })
            .expect("extra keyword ignored");
        assert_eq!(*STRICT_SEEN.lock().expect("lock"), ["x"]);
        assert_eq!(instance.get("x"), Some(&Value::Int(1)));
        assert!(!instance.has("y"));

        let open = autoschema()
            .register(
                Stub::builder::<Open>("Open")
                    .keyword("x", Annotation::Int)
                    .var_keyword("rest")
                    .init(|_, args| {
                        OPEN_SEEN.lock().expect("lock").extend(args.keys().cloned());
                        Ok(())
                    })
                    .build()
            )
            .expect("registered");
        let instance = open
            .construct(kwargs! { "x" => 1, "y" => 2 })
            .expect("constructed");
        assert_eq!(*OPEN_SEEN.lock().expect("lock"), ["x", "y"]);
        assert!(!instance.has("y"));
    }

    #[test]
    fn nested_one_and_many() {
        struct Author;
        struct Book;
        let author = autoschema()
            .register(
                Stub::builder::<Author>("Author")
                    .keyword("name", Annotation::Str)
                    .build()
            )
            .expect("Author");
        let book = autoschema()
            .register(
                Stub::builder::<Book>("Book")
                    .keyword("lead", Annotation::one(Annotation::model::<Author>()))
                    .keyword_none("others", Annotation::many(Annotation::model::<Author>()))
                    .build()
            )
            .expect("Book");

        let ann = author.construct(kwargs! { "name" => "Ann" }).expect("Ann");
        let bob = author.construct(kwargs! { "name" => "Bob" }).expect("Bob");
        let b = book
            .construct(kwargs! { "lead" => ann, "others" => vec![bob] })
            .expect("book");
        let data = b.dump().expect("dumped");
        assert_eq!(
            data,
            json!({"lead": {"name": "Ann"}, "others": [{"name": "Bob"}]})
        );

        let back = book.load(&data).expect("loaded");
        assert_eq!(back, b);

        let err = book
            .load(&json!({"lead": {}, "others": [{"name": 3}]}))
            .expect_err("invalid nested");
        assert_eq!(
            err.messages().map(|m| m.to_json()),
            Some(json!({
                "lead": {"name": ["Missing data for required field."]},
                "others": {"0": {"name": ["Not a valid string."]}}
            }))
        );
    }

    #[test]
    fn camel_case_and_irregular_names() {
        struct MyObject;
        let model = autoschema_camelcase()
            .register(
                Stub::builder::<MyObject>("MyObject")
                    .keyword_default("my_integer", Annotation::Int, 0)
                    .keyword_default("my_simple_string", Annotation::Str, "")
                    .keyword_default("special_case", Annotation::Str, "")
                    .irregular_name("special_case", "_specialCASE")
                    .build()
            )
            .expect("registered");
        let obj = model
            .construct(kwargs! {
                "my_integer" => 1,
                "my_simple_string" => "test",
                "special_case" => "special"
            })
            .expect("constructed");
        let data = obj.dump().expect("dumped");
        assert_eq!(
            data,
            json!({"myInteger": 1, "mySimpleString": "test", "_specialCASE": "special"})
        );
        assert_eq!(model.load(&data).expect("loaded"), obj);
    }

    #[test]
    fn custom_namer() {
        struct Custom;
        let factory = SchemaFactory::builder()
            .field_namer(|attr| attr.to_uppercase())
            .build();
        let custom = factory
            .register(
                Stub::builder::<Custom>("Custom")
                    .keyword("hello", Annotation::Int)
                    .keyword("world", Annotation::Int)
                    .build()
            )
            .expect("registered");
        let c = custom
            .construct(kwargs! { "hello" => 1, "world" => 2 })
            .expect("constructed");
        assert_eq!(c.dump().expect("dumped"), json!({"HELLO": 1, "WORLD": 2}));
    }

    #[test]
    fn extended_url_field() {
        struct Link;
        let factory = SchemaFactory::builder()
            .extend_field_type(Annotation::named("Url"), UrlField)
            .build();
        let link = factory
            .register(
                Stub::builder::<Link>("Link")
                    .keyword("target", Annotation::named("Url"))
                    .build()
            )
            .expect("registered");

        let good = link
            .construct(kwargs! { "target" => "http://example.com/" })
            .expect("constructed");
        assert_eq!(good.dump().expect("dumped"), json!({"target": "http://example.com/"}));

        let bad = link
            .construct(kwargs! { "target" => "example.com/" })
            .expect("constructed");
        let err = bad.dump().expect_err("invalid url");
        assert_eq!(err.messages.to_json(), json!({"target": ["Not a valid URL."]}));
    }

    #[test]
    fn non_strict_load_reports_messages() {
        struct Reading;
        let reading = autoschema()
            .register(
                Stub::builder::<Reading>("Reading")
                    .keyword("value", Annotation::Int)
                    .keyword("unit", Annotation::Str)
                    .build()
            )
            .expect("registered");
        let loaded = reading
            .load_with(
                &json!({"value": "high", "unit": "C"}),
                SchemaOptions::new().strict(false)
            )
            .expect("non-strict");
        assert!(loaded.instance.is_none());
        assert_eq!(loaded.data.get("unit"), Some(&Value::from("C")));
        assert_eq!(loaded.errors.to_json(), json!({"value": ["Not a valid integer."]}));

        let strict = reading.load(&json!({"value": "high", "unit": "C"}));
        assert!(matches!(strict, Err(Error::Validation(_))));
    }

    #[test]
    fn only_and_exclude_select_fields() {
        struct Profile;
        let profile = autoschema()
            .register(
                Stub::builder::<Profile>("Profile")
                    .keyword("id", Annotation::Int)
                    .keyword("email", Annotation::Str)
                    .keyword_default("bio", Annotation::Str, "")
                    .build()
            )
            .expect("registered");
        let p = profile
            .construct(kwargs! { "id" => 1, "email" => "a@b.c" })
            .expect("constructed");
        let only = p.dump_with(SchemaOptions::new().only(["id"])).expect("only");
        assert_eq!(only.data, json!({"id": 1}));
        let without = p.dump_with(SchemaOptions::new().exclude(["email"])).expect("exclude");
        assert_eq!(without.data, json!({"id": 1, "bio": ""}));
    }

    #[test]
    fn unknown_keys_follow_schema_base_policy() {
        struct Loose;
        struct Tight;
        let loose = autoschema()
            .register(
                Stub::builder::<Loose>("Loose")
                    .keyword("x", Annotation::Int)
                    .build()
            )
            .expect("registered");
        assert!(loose.load(&json!({"x": 1, "extra": true})).is_ok());

        let factory = SchemaFactory::builder()
            .schema_base(SchemaBase::new("StrictSchema").unknown(Unknown::Raise))
            .build();
        let tight = factory
            .register(
                Stub::builder::<Tight>("Tight")
                    .keyword("x", Annotation::Int)
                    .build()
            )
            .expect("registered");
        assert_eq!(tight.schema().base_names(), ["StrictSchema"]);
        let err = tight.load(&json!({"x": 1, "extra": true})).expect_err("unknown key");
        assert_eq!(
            err.messages().map(|m| m.to_json()),
            Some(json!({"extra": ["Unknown field."]}))
        );
    }

    #[test]
    fn duplicate_and_unregistered_bases_fail() {
        struct Once;
        struct Orphan;
        struct Missing;
        let stub = || {
            Stub::builder::<Once>("Once")
                .keyword("x", Annotation::Int)
                .build()
        };
        autoschema().register(stub()).expect("first");
        assert!(matches!(
            autoschema().register(stub()),
            Err(DefinitionError::AlreadyRegistered { .. })
        ));

        let err = autoschema()
            .register(Stub::builder::<Orphan>("Orphan").extends::<Missing>().build())
            .expect_err("base missing");
        assert!(matches!(
            err,
            DefinitionError::UnregisteredBase { ref base, .. } if base == "Missing"
        ));
    }

    #[test]
    fn init_hook_errors_pass_through() {
        struct Guarded;
        let guarded = autoschema()
            .register(
                Stub::builder::<Guarded>("Guarded")
                    .keyword("age", Annotation::Int)
                    .init(|instance, _| {
                        match instance.get("age").and_then(Value::as_int) {
                            Some(age) if age < 0 => Err("age must not be negative".into()),
                            _ => Ok(())
                        }
                    })
                    .build()
            )
            .expect("registered");
        let err = guarded
            .load(&json!({"age": -1}))
            .expect_err("hook rejects");
        assert!(matches!(err, Error::Construct(ConstructError::Init { .. })));
    }
}
