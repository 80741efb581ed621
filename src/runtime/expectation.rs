//! Parse expectations
//!
//! A generated parser carries a static table of [`ExpectationInfo`] entries,
//! one per literal, character class or description that can fail. Rule code
//! records failures by table index; only when a [`SyntaxError`] is built are
//! the surviving indices expanded into owned [`Expectation`] values.
//!
//! [`SyntaxError`]: super::error::SyntaxError

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// What kind of thing was expected
///
/// The variant order is the sort order used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectationKind {
    /// Any single character (`.`)
    Any,
    /// A character class such as `[0-9]`
    Class,
    /// End of input
    End,
    /// A literal string
    Literal,
    /// A free-text description (named rules, `expected()` calls)
    Other,
}

impl ExpectationKind {
    /// Name used in serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            ExpectationKind::Any => "any",
            ExpectationKind::Class => "class",
            ExpectationKind::End => "end",
            ExpectationKind::Literal => "literal",
            ExpectationKind::Other => "other",
        }
    }
}

impl fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a generated parser's expectation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectationInfo {
    /// Expectation kind
    pub kind: ExpectationKind,
    /// Raw matcher text (literal or class source), if any
    pub value: Option<&'static str>,
    /// Rendered description used in messages
    pub description: &'static str,
}

impl ExpectationInfo {
    /// Table entry with every field given
    pub const fn new(
        kind: ExpectationKind,
        value: Option<&'static str>,
        description: &'static str,
    ) -> Self {
        Self {
            kind,
            value,
            description,
        }
    }

    /// A literal; `description` is normally the quoted literal
    pub const fn literal(value: &'static str, description: &'static str) -> Self {
        Self::new(ExpectationKind::Literal, Some(value), description)
    }

    /// A character class; `description` is normally the class source
    pub const fn class(value: &'static str, description: &'static str) -> Self {
        Self::new(ExpectationKind::Class, Some(value), description)
    }

    /// Any character
    pub const fn any() -> Self {
        Self::new(ExpectationKind::Any, None, "any character")
    }

    /// End of input
    pub const fn end() -> Self {
        Self::new(ExpectationKind::End, None, "end of input")
    }

    /// Free-text description
    pub const fn other(description: &'static str) -> Self {
        Self::new(ExpectationKind::Other, None, description)
    }
}

/// An expanded expectation, as reported in a [`SyntaxError`]
///
/// Ordering is by kind, then raw value, then description.
///
/// [`SyntaxError`]: super::error::SyntaxError
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Expectation {
    /// Expectation kind
    #[serde(rename = "type")]
    pub kind: ExpectationKind,
    /// Raw matcher text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Rendered description
    pub description: String,
}

impl Expectation {
    /// Free-text expectation
    pub fn other(description: impl Into<String>) -> Self {
        Self {
            kind: ExpectationKind::Other,
            value: None,
            description: description.into(),
        }
    }

    /// Total order used to sort failure reports
    #[inline]
    pub fn compare(a: &Expectation, b: &Expectation) -> Ordering {
        a.cmp(b)
    }
}

impl From<&ExpectationInfo> for Expectation {
    fn from(info: &ExpectationInfo) -> Self {
        Self {
            kind: info.kind,
            value: info.value.map(str::to_owned),
            description: info.description.to_owned(),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
