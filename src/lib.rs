//! WikiPEG - Runtime for generated PEG parsers
//!
//! Parser generators emit one recursive-descent method per grammar rule.
//! This crate is everything those methods share:
//! - Backtracking cursor state with furthest-failure tracking
//! - Packrat memoization keyed by rule, position and arguments
//! - UTF-8 character stepping over byte offsets
//! - Cached line/column computation
//! - Expectation tables, sorted/deduplicated error reports and messages
//! - A tracing protocol for rule enter/match/fail events
//!
//! The runtime knows no grammar. A generated parser embeds a
//! [`ParserBase`], implements [`PegParser`] and supplies the rule methods.
//!
//! ## Quick Start
//!
//! ```rust
//! use wikipeg::prelude::*;
//!
//! static EXPECTATIONS: [ExpectationInfo; 2] = [
//!     ExpectationInfo::end(),
//!     ExpectationInfo::class("[0-9]", "[0-9]"),
//! ];
//!
//! /// digits = [0-9]+
//! struct Digits {
//!     base: ParserBase,
//! }
//!
//! impl Digits {
//!     fn parse_digits(&mut self) -> RuleOutcome<u64> {
//!         let start = self.base.curr_pos;
//!         while self.base.match_regex("[0-9]").is_some() {}
//!         self.base.fail(1);
//!         if self.base.curr_pos == start {
//!             return Ok(RuleResult::Failed);
//!         }
//!         self.base.saved_pos = start;
//!         match self.base.text().parse() {
//!             Ok(n) => Ok(RuleResult::Matched(n)),
//!             Err(_) => Err(self.base.expected("a 64-bit number")),
//!         }
//!     }
//! }
//!
//! impl PegParser for Digits {
//!     type Output = u64;
//!     fn base(&self) -> &ParserBase { &self.base }
//!     fn base_mut(&mut self) -> &mut ParserBase { &mut self.base }
//!     fn parse(&mut self, input: &str, options: ParseOptions) -> Result<u64, ParseError> {
//!         self.run_parse(input, options, 0, |p, _| p.parse_digits())
//!     }
//! }
//!
//! let mut parser = Digits { base: ParserBase::new(&EXPECTATIONS) };
//! assert_eq!(parser.parse("42", ParseOptions::new()).unwrap(), 42);
//!
//! let err = parser.parse("12a", ParseOptions::new()).unwrap_err();
//! let err = err.as_syntax().unwrap();
//! assert_eq!(err.found(), Some("a"));
//! assert_eq!(err.location().start.offset, 2);
//! assert_eq!(err.message(), "Expected [0-9] or end of input but \"a\" found.");
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate
//! - `parallel` - Parse batches of inputs on rayon's thread pool

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

#[macro_use]
mod macros;

// Prelude module for convenient imports
pub mod prelude;

pub mod runtime;

/// Re-export commonly used types for convenience
pub use runtime::{
    // Tracing
    trace::{DefaultTracer, NullTracer, RecordingTracer, TraceEvent, Tracer},
    // Errors
    Expectation,
    ExpectationInfo,
    ExpectationKind,
    Location,
    LocationRange,
    ParseError,
    ParseOptions,
    ParserBase,
    PegParser,
    Ref,
    RuleOutcome,
    RuleResult,
    SyntaxError,
};
