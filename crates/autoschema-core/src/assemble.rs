// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema assembly.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    annotation::ModelKey,
    model::Ancestor,
    schema::{Field, SchemaBase, SchemaClass, SchemaParent}
};

/// Suffix appended to the model name.
pub const SCHEMA_SUFFIX: &str = "Schema";

/// Build the schema class of a model.
///
/// Bases are the schemas of every model in `mro`, in order, then `root`.
/// Inherited fields come first, most basic model first; a more derived
/// declaration of the same attribute replaces the inherited one.
pub fn assemble(
    model: &str,
    key: ModelKey,
    mro: &[Ancestor],
    declared: IndexMap<String, Arc<Field>>,
    root: &SchemaBase
) -> SchemaClass {
    let inherited: Vec<Arc<SchemaClass>> = mro
        .iter()
        .filter_map(Ancestor::as_model)
        .map(|ancestor| Arc::clone(ancestor.schema()))
        .collect();

    let mut fields = IndexMap::new();
    for schema in inherited.iter().rev() {
        for (attr, field) in schema.declared_fields() {
            fields.insert(attr.clone(), Arc::clone(field));
        }
    }
    for (attr, field) in &declared {
        fields.insert(attr.clone(), Arc::clone(field));
    }

    let mut bases: Vec<SchemaParent> =
        inherited.into_iter().map(SchemaParent::Generated).collect();
    bases.push(SchemaParent::Root(root.clone()));

    SchemaClass::from_parts(
        format!("{model}{SCHEMA_SUFFIX}"),
        key,
        bases,
        declared,
        fields,
        root.clone()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify::PrimitiveKind, schema::FieldOptions};

    struct Point;

    #[test]
    fn root_model_schema() {
        let mut declared = IndexMap::new();
        declared.insert(
            "x".to_string(),
            Arc::new(Field::primitive(PrimitiveKind::Integer, FieldOptions::default()))
        );
        let schema = assemble(
            "Point",
            ModelKey::of::<Point>(),
            &[Ancestor::Object],
            declared,
            &SchemaBase::default()
        );
        assert_eq!(schema.name(), "PointSchema");
        assert_eq!(schema.base_names(), ["FactorySchema"]);
        assert_eq!(schema.fields().len(), 1);
        assert!(schema.field("x").is_some());
    }
}
