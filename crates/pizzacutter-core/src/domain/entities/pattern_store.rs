//! Ordered token → value tables.
//!
//! [`RawPatterns`] is what the configuration holds; [`ResolvedPatterns`] is
//! what the rewriters see. The only way from one to the other is
//! [`crate::domain::resolver::resolve`].

use std::path::Path;

use serde::Serialize;

use crate::domain::value_objects::{PatternValue, TRUE_TOKEN, Token};

/// Insertion-ordered pattern table. Inserting an existing token replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawPatterns {
    entries: Vec<(Token, PatternValue)>,
}

impl RawPatterns {
    /// An empty table, without the default patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table preloaded with `{{PizzaCutter.True}} = "True"`.
    pub fn with_defaults() -> Self {
        Self::new().with_text(TRUE_TOKEN, "True")
    }

    /// Insert or replace. Returns the previous value of `token`, if any.
    pub fn insert(&mut self, token: impl Into<Token>, value: PatternValue) -> Option<PatternValue> {
        let token = token.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((token, value));
                None
            }
        }
    }

    pub fn with_text(mut self, token: impl Into<Token>, text: impl Into<String>) -> Self {
        self.insert(token, PatternValue::text(text));
        self
    }

    pub fn with_path(mut self, token: impl Into<Token>, path: impl AsRef<Path>) -> Self {
        self.insert(token, PatternValue::path(path.as_ref()));
        self
    }

    pub fn get(&self, token: &str) -> Option<&PatternValue> {
        self.entries
            .iter()
            .find(|(t, _)| t.as_str() == token)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &PatternValue)> {
        self.entries.iter().map(|(t, v)| (t, v))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.entries.iter().map(|(t, _)| t)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Into<Token>> FromIterator<(T, PatternValue)> for RawPatterns {
    fn from_iter<I: IntoIterator<Item = (T, PatternValue)>>(iter: I) -> Self {
        let mut patterns = Self::new();
        for (token, value) in iter {
            patterns.insert(token, value);
        }
        patterns
    }
}

/// Patterns after fixed-point resolution: no text value contains a text token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedPatterns(RawPatterns);

impl ResolvedPatterns {
    pub(crate) fn from_resolved(patterns: RawPatterns) -> Self {
        Self(patterns)
    }

    pub fn get(&self, token: &str) -> Option<&PatternValue> {
        self.0.get(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &PatternValue)> {
        self.0.iter()
    }

    /// Text patterns in insertion order.
    pub fn text_patterns(&self) -> impl Iterator<Item = (&Token, &str)> {
        self.0.iter().filter_map(|(t, v)| v.as_text().map(|s| (t, s)))
    }

    /// Path patterns in insertion order.
    pub fn path_patterns(&self) -> impl Iterator<Item = (&Token, &Path)> {
        self.0.iter().filter_map(|(t, v)| v.as_path().map(|p| (t, p)))
    }

    /// `true` if any defined token occurs in `name`.
    pub fn any_token_in(&self, name: &str) -> bool {
        self.0.tokens().any(|t| name.contains(t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
