//! Value objects for the pattern engine.
//!
//! Tokens, pattern values and option markers are plain data: cheap to clone,
//! compared by value and free of I/O.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::common::display_fragment;

/// Opening delimiter every placeholder starts with.
pub const OPEN_DELIMITER: &str = "{{";

/// Closing delimiter every placeholder ends with.
pub const CLOSE_DELIMITER: &str = "}}";

/// Marker for the default `{{PizzaCutter.True}}` pattern, which lets
/// templated scripts detect that cutting already happened.
pub const TRUE_TOKEN: &str = "{{PizzaCutter.True}}";

// ============================================================================
// Token
// ============================================================================

/// A placeholder key such as `{{PizzaCutter.project.name}}`.
///
/// Tokens are opaque: the engine never parses them, it only looks for their
/// literal text in path segments and content lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// PatternValue
// ============================================================================

/// What a token is replaced with.
///
/// `Text` values may embed other tokens and are expanded by the resolver.
/// `Path` values are inserted as whole path components and never expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PatternValue {
    Text(String),
    Path(PathBuf),
}

impl PatternValue {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Path(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Text(_) => None,
        }
    }

    /// Textual form used when the value lands inside file content.
    pub fn to_content_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Path(path) => display_fragment(path),
        }
    }
}

impl fmt::Display for PatternValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "\"{text}\""),
            Self::Path(path) => write!(f, "path({})", path.display()),
        }
    }
}

// ============================================================================
// Option markers
// ============================================================================

/// The three fixed policy roles a marker can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionRole {
    /// Drop a content line that is blank once the marker is removed.
    DeleteLineIfEmpty,
    /// Never copy an object whose source path carries the marker.
    ObjectNoCopy,
    /// Never overwrite an existing target whose source path carries the marker.
    ObjectNoOverwrite,
}

impl OptionRole {
    /// Roles in the order markers are stripped.
    pub const ALL: [Self; 3] = [
        Self::DeleteLineIfEmpty,
        Self::ObjectNoCopy,
        Self::ObjectNoOverwrite,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeleteLineIfEmpty => "delete_line_if_empty",
            Self::ObjectNoCopy => "object_no_copy",
            Self::ObjectNoOverwrite => "object_no_overwrite",
        }
    }
}

impl fmt::Display for OptionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal marker strings for each [`OptionRole`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionMarkers {
    delete_line_if_empty: String,
    object_no_copy: String,
    object_no_overwrite: String,
}

impl OptionMarkers {
    pub fn new(
        delete_line_if_empty: impl Into<String>,
        object_no_copy: impl Into<String>,
        object_no_overwrite: impl Into<String>,
    ) -> Self {
        Self {
            delete_line_if_empty: delete_line_if_empty.into(),
            object_no_copy: object_no_copy.into(),
            object_no_overwrite: object_no_overwrite.into(),
        }
    }

    /// Replace the marker for one role.
    pub fn with_marker(mut self, role: OptionRole, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        match role {
            OptionRole::DeleteLineIfEmpty => self.delete_line_if_empty = marker,
            OptionRole::ObjectNoCopy => self.object_no_copy = marker,
            OptionRole::ObjectNoOverwrite => self.object_no_overwrite = marker,
        }
        self
    }

    pub fn marker(&self, role: OptionRole) -> &str {
        match role {
            OptionRole::DeleteLineIfEmpty => &self.delete_line_if_empty,
            OptionRole::ObjectNoCopy => &self.object_no_copy,
            OptionRole::ObjectNoOverwrite => &self.object_no_overwrite,
        }
    }

    /// `(role, marker)` pairs in stripping order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionRole, &str)> {
        OptionRole::ALL
            .into_iter()
            .map(move |role| (role, self.marker(role)))
    }

    /// `true` if the marker for `role` occurs anywhere in `haystack`.
    ///
    /// An empty marker never matches.
    pub fn is_marked(&self, role: OptionRole, haystack: &str) -> bool {
        let marker = self.marker(role);
        !marker.is_empty() && haystack.contains(marker)
    }
}

impl Default for OptionMarkers {
    fn default() -> Self {
        Self::new(
            "{{PizzaCutter.option.delete_line_if_empty}}",
            "{{PizzaCutter.option.no_copy}}",
            "{{PizzaCutter.option.no_overwrite}}",
        )
    }
}

/// Prefixes that flag a leftover placeholder after a build.
pub fn default_audit_prefixes() -> Vec<String> {
    ["{{PizzaCutter", "{{cookiecutter", "{{pizzacutter", "{{Pizzacutter"]
        .into_iter()
        .map(String::from)
        .collect()
}
