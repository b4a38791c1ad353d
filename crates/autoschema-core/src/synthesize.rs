// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field synthesis.
//!
//! Turns each [`Fieldspec`] into a [`Field`]: classify the annotation, pick
//! the wire name, then build the field with the fieldspec's flags.

use std::{collections::HashMap, sync::Arc};

use indexmap::IndexMap;

use crate::{
    classify::{ExtendedFieldMap, classify},
    error::{ClassificationError, UnsupportedReason},
    factory::FieldNamer,
    schema::{Field, FieldOptions},
    signature::Fieldspec
};

/// Naming context for one model.
pub struct Naming<'a> {
    /// Per-model attribute to wire name overrides.
    pub irregular_names: &'a HashMap<String, String>,
    /// Factory-wide naming policy.
    pub field_namer:     &'a FieldNamer
}

impl Naming<'_> {
    /// Wire name of attribute `attr`.
    pub fn wire_name(&self, attr: &str) -> String {
        self.irregular_names
            .get(attr)
            .cloned()
            .unwrap_or_else(|| self.field_namer.apply(attr))
    }
}

/// Build the field for one fieldspec.
///
/// The field reads and writes `wire_name`.
pub fn synthesize(
    model: &str,
    attr: &str,
    spec: &Fieldspec,
    wire_name: String,
    extended: &ExtendedFieldMap
) -> Result<Field, ClassificationError> {
    let fail = |annotation: String, reason| ClassificationError {
        model:     model.to_string(),
        parameter: attr.to_string(),
        annotation,
        reason
    };
    let annotation = spec
        .annotation
        .as_ref()
        .ok_or_else(|| fail("<none>".to_string(), UnsupportedReason::MissingAnnotation))?;
    let descriptor =
        classify(annotation, extended).map_err(|reason| fail(annotation.to_string(), reason))?;

    let options = FieldOptions {
        default:     spec
            .default
            .as_ref()
            .and_then(|d| d.as_value())
            .filter(|v| !v.is_none())
            .cloned(),
        many:        annotation.is_many(),
        required:    spec.required,
        allow_none:  spec.allow_none,
        load_from:   Some(wire_name.clone()),
        dump_to:     Some(wire_name),
        description: spec.doc.clone()
    };
    Ok(descriptor.field(options))
}

/// Synthesize every fieldspec of a model, keyed by attribute name.
pub fn synthesize_all(
    model: &str,
    specs: &IndexMap<String, Fieldspec>,
    naming: &Naming<'_>,
    extended: &ExtendedFieldMap
) -> Result<IndexMap<String, Arc<Field>>, ClassificationError> {
    specs
        .iter()
        .map(|(attr, spec)| {
            let field = synthesize(model, attr, spec, naming.wire_name(attr), extended)?;
            Ok((attr.clone(), Arc::new(field)))
        })
        .collect()
}
