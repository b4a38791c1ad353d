// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-call schema options.

/// Options a schema is instantiated with for one dump or load.
///
/// | Option | Default | Effect |
/// |--------|---------|--------|
/// | `strict` | `true` | errors are returned as `Err` instead of alongside data |
/// | `only` | all fields | restrict to these attributes |
/// | `exclude` | none | skip these attributes |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Fail on the first collected error set.
    pub strict:  bool,
    /// Attribute names to keep; `None` keeps all.
    pub only:    Option<Vec<String>>,
    /// Attribute names to skip.
    pub exclude: Vec<String>
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            strict:  true,
            only:    None,
            exclude: Vec::new()
        }
    }
}

impl SchemaOptions {
    /// Strict options selecting every field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strictness.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Keep only `attrs`.
    #[must_use]
    pub fn only<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.only = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    /// Skip `attrs`.
    #[must_use]
    pub fn exclude<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.exclude.extend(attrs.into_iter().map(Into::into));
        self
    }

    /// Whether attribute `attr` takes part.
    #[must_use]
    pub fn includes(&self, attr: &str) -> bool {
        let kept = self
            .only
            .as_ref()
            .is_none_or(|only| only.iter().any(|name| name == attr));
        kept && !self.exclude.iter().any(|name| name == attr)
    }
}
