// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validation message trees.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Key under which errors about the whole input are reported.
pub const SCHEMA_KEY: &str = "_schema";

/// Messages collected while dumping or loading.
///
/// Serializes to the familiar shape:
///
/// ```json
/// { "popularity": ["Must be between 1 and 10."],
///   "links": { "0": ["Not a valid URL."] } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Messages {
    /// Messages about a single value.
    List(Vec<String>),
    /// Messages keyed by wire name or element index.
    Map(BTreeMap<String, Messages>)
}

impl Default for Messages {
    fn default() -> Self {
        Self::new()
    }
}

impl Messages {
    /// Empty keyed tree.
    pub const fn new() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// A single message about one value.
    pub fn single(message: impl Into<String>) -> Self {
        Self::List(vec![message.into()])
    }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(list) => list.is_empty(),
            Self::Map(map) => map.values().all(Self::is_empty)
        }
    }

    /// Report `message` under `key`.
    pub fn push(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.nest(key, Self::single(message));
    }

    /// Merge `messages` under `key`.
    pub fn nest(&mut self, key: impl Into<String>, messages: Self) {
        if messages.is_empty() {
            return;
        }
        if let Self::List(leaf) = self {
            let leaf = std::mem::take(leaf);
            *self = Self::from_leaf(leaf);
        }
        if let Self::Map(map) = self {
            let key = key.into();
            let merged = match map.remove(&key) {
                Some(existing) => existing.merge(messages),
                None => messages
            };
            map.insert(key, merged);
        }
    }

    /// Messages under `key`.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(map) => map.get(key),
            Self::List(_) => None
        }
    }

    /// Flat message list, if this is a leaf.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(list) => Some(list),
            Self::Map(_) => None
        }
    }

    /// JSON rendering.
    pub fn to_json(&self) -> Json {
        match self {
            Self::List(list) => Json::from(list.clone()),
            Self::Map(map) => Json::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect()
            )
        }
    }

    fn from_leaf(leaf: Vec<String>) -> Self {
        let mut map = BTreeMap::new();
        if !leaf.is_empty() {
            map.insert(SCHEMA_KEY.to_string(), Self::List(leaf));
        }
        Self::Map(map)
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::List(mut a), Self::List(b)) => {
                a.extend(b);
                Self::List(a)
            }
            (mut a, Self::Map(b)) => {
                for (key, value) in b {
                    a.nest(key, value);
                }
                a
            }
            (Self::Map(a), Self::List(b)) => {
                let mut merged = Self::Map(a);
                merged.nest(SCHEMA_KEY, Self::List(b));
                merged
            }
        }
    }
}

impl fmt::Display for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
