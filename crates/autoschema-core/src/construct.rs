// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Cooperative construction across a model hierarchy.
//!
//! Every model level assigns its own attributes exactly once. The order is
//! fixed at registration by walking the resolution order:
//!
//! ```text
//! mro(C) = [B, A, Plain, X, object]
//!           │  │    │
//!           │  │    └─ plain class: called once, walk stops
//!           │  └────── model: step, walk continues
//!           └───────── model: step, walk continues
//!
//! pipeline(C) = Plain → A → B → C
//! ```
//!
//! Each model level receives every keyword argument. Its own keyword-only
//! parameters are assigned from them, then its init hook runs with the
//! arguments its signature accepts. Plain levels only run their hook.

use std::sync::Arc;

use crate::{
    error::ConstructError,
    model::{Ancestor, InitHook, ModelClass},
    signature::{Signature, kwsift},
    value::{Instance, Kwargs}
};

/// Levels constructed before the model's own, deepest first.
pub fn pipeline(mro: &[Ancestor]) -> Vec<Ancestor> {
    let mut steps = Vec::new();
    for ancestor in mro {
        match ancestor {
            Ancestor::Model(_) => steps.push(ancestor.clone()),
            Ancestor::Plain(_) => {
                steps.push(ancestor.clone());
                break;
            }
            Ancestor::Object => break
        }
    }
    steps.reverse();
    steps
}

pub(crate) fn construct(
    model: &Arc<ModelClass>,
    kwargs: &Kwargs
) -> Result<Instance, ConstructError> {
    let mut instance = Instance::new(Arc::clone(model));
    for step in model.chain() {
        match step {
            Ancestor::Model(level) => assign_level(level, &mut instance, kwargs)?,
            Ancestor::Plain(plain) => {
                run_hook(plain.name(), plain.signature(), plain.init(), &mut instance, kwargs)?;
            }
            Ancestor::Object => {}
        }
    }
    assign_level(model, &mut instance, kwargs)?;

    tracing::trace!(
        model = %model.name(),
        levels = model.chain().len() + 1,
        "constructed instance"
    );
    Ok(instance)
}

fn assign_level(
    level: &ModelClass,
    instance: &mut Instance,
    kwargs: &Kwargs
) -> Result<(), ConstructError> {
    let bound = bind(level.name(), level.signature(), kwargs)?;
    for (attr, spec) in level.fieldspecs() {
        instance.set(attr.as_str(), spec.effective(bound.get(attr)));
    }
    call_hook(level.name(), level.init(), instance, &bound)
}

fn run_hook(
    name: &str,
    signature: &Signature,
    hook: Option<&InitHook>,
    instance: &mut Instance,
    kwargs: &Kwargs
) -> Result<(), ConstructError> {
    let bound = bind(name, signature, kwargs)?;
    call_hook(name, hook, instance, &bound)
}

fn bind(name: &str, signature: &Signature, kwargs: &Kwargs) -> Result<Kwargs, ConstructError> {
    signature
        .bind(&kwsift(kwargs, signature))
        .map_err(|argument| ConstructError::MissingArgument {
            model: name.to_string(),
            argument
        })
}

fn call_hook(
    name: &str,
    hook: Option<&InitHook>,
    instance: &mut Instance,
    bound: &Kwargs
) -> Result<(), ConstructError> {
    match hook {
        Some(hook) => hook(instance, bound).map_err(|source| ConstructError::Init {
            model: name.to_string(),
            source
        }),
        None => Ok(())
    }
}
