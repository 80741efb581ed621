//! Prelude module for convenient imports
//!
//! Generated parsers start with a wildcard import of this module:
//!
//! ```
//! use wikipeg::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Engine
//! - [`ParserBase`] - Mutable parsing state
//! - [`PegParser`] - Trait implemented by generated parsers
//! - [`RuleResult`] / [`RuleOutcome`] - What rule methods return
//! - [`Ref`] - By-reference rule argument
//!
//! ## Reporting
//! - [`ExpectationInfo`] - Expectation table entry
//! - [`ParseError`] / [`SyntaxError`] - Parse failures
//! - [`LocationRange`] - Source span
//!
//! ## Driving
//! - [`ParseOptions`] - Per-parse options
//! - [`Tracer`], [`DefaultTracer`] - Tracing

pub use crate::runtime::{
    DefaultTracer, ExpectationInfo, LocationRange, ParseError, ParseOptions, ParserBase,
    PegParser, Ref, RuleOutcome, RuleResult, SyntaxError, Tracer,
};

pub use serde_json::{json, Value};
