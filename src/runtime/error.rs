//! Parse errors
//!
//! Two kinds of failure leave a parse:
//!
//! - [`SyntaxError`]: the input does not match the grammar. Carries the
//!   message, the expectations recorded at the furthest failure position,
//!   what was found there and where.
//! - [`ParseError::Internal`]: the runtime was driven incorrectly (for
//!   example a start rule the grammar does not allow). Indicates a bug in
//!   the caller or the generated code, never in the input.
//!
//! # Example Output
//!
//! ```text
//! Error at line 1, column 3: Expected [0-9] or end of input but "a" found.
//! 12a
//!   ^
//! ```

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

use super::expectation::Expectation;
use super::source_location::LocationRange;

/// A grammar-level parse failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    message: String,
    expected: Vec<Expectation>,
    found: Option<String>,
    location: LocationRange,
}

impl SyntaxError {
    /// Create a syntax error
    ///
    /// `expected` should already be sorted and deduplicated; `found` is
    /// `None` at end of input.
    pub fn new(
        message: impl Into<String>,
        expected: Vec<Expectation>,
        found: Option<String>,
        location: LocationRange,
    ) -> Self {
        Self {
            message: message.into(),
            expected,
            found,
            location,
        }
    }

    /// The rendered message
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Expectations active at the failure position, sorted
    #[inline]
    pub fn expected(&self) -> &[Expectation] {
        &self.expected
    }

    /// Text found at the failure position, `None` for end of input
    #[inline]
    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }

    /// Where the failure occurred
    #[inline]
    pub fn location(&self) -> &LocationRange {
        &self.location
    }

    /// Format with the offending source line and a caret under the failure
    pub fn format_with_source(&self, source: &str) -> String {
        let bytes = source.as_bytes();
        let offset = self.location.start.offset.min(bytes.len());

        let line_start = memchr::memrchr(b'\n', &bytes[..offset])
            .map(|n| n + 1)
            .unwrap_or(0);
        let line_end = memchr::memchr(b'\n', &bytes[offset..])
            .map(|n| offset + n)
            .unwrap_or(bytes.len());
        let line = source
            .get(line_start..line_end)
            .unwrap_or("")
            .trim_end_matches('\r');

        let mut output = format!("{}\n{}\n", self, line);
        for _ in 0..self.location.start.column.saturating_sub(1) {
            output.push(' ');
        }
        output.push('^');
        output
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error at line {}, column {}: {}",
            self.location.start.line, self.location.start.column, self.message
        )
    }
}

impl std::error::Error for SyntaxError {}

impl Serialize for SyntaxError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SyntaxError", 5)?;
        state.serialize_field("name", "SyntaxError")?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("expected", &self.expected)?;
        state.serialize_field("found", &self.found)?;
        state.serialize_field("location", &self.location)?;
        state.end()
    }
}

/// Error type for parse operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input does not match the grammar
    Syntax(SyntaxError),

    /// Internal error (protocol violation by the caller or generated code)
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl ParseError {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        ParseError::Internal {
            message: message.into(),
        }
    }

    /// The syntax error, if this is one
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(err) => Some(err),
            ParseError::Internal { .. } => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax(err) => fmt::Display::fmt(err, f),
            ParseError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Syntax(err) => Some(err),
            ParseError::Internal { .. } => None,
        }
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

/// Render `found` the way messages quote it: JSON string syntax, with
/// slashes and non-ASCII characters left as they are
pub fn quote_found(found: &str) -> String {
    serde_json::to_string(found).unwrap_or_else(|_| format!("\"{}\"", found))
}

/// Synthesize `Expected <a>, <b> or <c> but <found> found.`
///
/// `expected` is used in the order given; callers pass a sorted list. A
/// description is only rendered the first time it appears.
pub fn build_message(expected: &[Expectation], found: Option<&str>) -> String {
    let mut descriptions: Vec<&str> = Vec::with_capacity(expected.len());
    for e in expected {
        if !descriptions.contains(&e.description.as_str()) {
            descriptions.push(&e.description);
        }
    }
    let expected_desc = match descriptions.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    };
    let found_desc = match found {
        Some(found) if !found.is_empty() => quote_found(found),
        _ => "end of input".to_string(),
    };
    format!("Expected {} but {} found.", expected_desc, found_desc)
}
