// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Process-wide model registry.
//!
//! Registration writes each model exactly once; every later lookup (nested
//! field classification, base resolution, validator attachment) reads it.

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard}
};

use crate::{annotation::ModelKey, error::DefinitionError, model::ModelClass};

static MODELS: LazyLock<RwLock<HashMap<ModelKey, Arc<ModelClass>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn models_read() -> RwLockReadGuard<'static, HashMap<ModelKey, Arc<ModelClass>>> {
    MODELS.read().unwrap_or_else(PoisonError::into_inner)
}

fn models_write() -> RwLockWriteGuard<'static, HashMap<ModelKey, Arc<ModelClass>>> {
    MODELS.write().unwrap_or_else(PoisonError::into_inner)
}

/// Registered model for `key`.
pub fn lookup(key: &ModelKey) -> Option<Arc<ModelClass>> {
    models_read().get(key).cloned()
}

/// Registered model for stub type `T`.
pub fn model_of<T: 'static>() -> Option<Arc<ModelClass>> {
    lookup(&ModelKey::of::<T>())
}

/// Whether `key` has been registered.
pub fn is_registered(key: &ModelKey) -> bool {
    models_read().contains_key(key)
}

/// Names of every registered model, sorted.
pub fn registered_names() -> Vec<String> {
    let mut names: Vec<String> = models_read()
        .values()
        .map(|model| model.name().to_string())
        .collect();
    names.sort();
    names
}

// Write-once: a second registration of the same key is a definition error.
pub(crate) fn insert(model: Arc<ModelClass>) -> Result<(), DefinitionError> {
    let mut models = models_write();
    if models.contains_key(&model.key()) {
        return Err(DefinitionError::AlreadyRegistered {
            model: model.name().to_string()
        });
    }
    models.insert(model.key(), model);
    Ok(())
}
