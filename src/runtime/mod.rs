//! Runtime for generated PEG parsers
//!
//! # Module Organization
//!
//! ## Engine
//! - [`parser`] - [`ParserBase`] state, [`PegParser`] trait, [`RuleResult`]
//! - [`cache`] - Packrat memoization
//! - [`chars`] - UTF-8 character stepping over byte offsets
//! - [`reference`] - By-reference rule arguments
//! - [`regex_cache`] - Compiled character-class patterns
//!
//! ## Reporting
//! - [`source_location`] - Line/column tracking
//! - [`expectation`] - Expectation tables and ordering
//! - [`error`] - Syntax and internal errors
//! - [`trace`] - Rule tracing
//!
//! ## Driving
//! - [`options`] - Per-parse options
//! - [`batch`] - Parsing many inputs

// ============================================================================
// Module Declarations
// ============================================================================

pub mod batch;
pub mod cache;
pub mod chars;
pub mod error;
pub mod expectation;
pub mod options;
pub mod parser;
pub mod reference;
pub mod regex_cache;
pub mod source_location;
pub mod trace;

// ============================================================================
// Core Types
// ============================================================================

pub use parser::{ParserBase, PegParser, RuleOutcome, RuleResult};

// ============================================================================
// Error Handling
// ============================================================================

pub use error::{build_message, ParseError, SyntaxError};
pub use expectation::{Expectation, ExpectationInfo, ExpectationKind};

// ============================================================================
// Source Location
// ============================================================================

pub use source_location::{Location, LocationRange, PosDetails, PosDetailsCache};

// ============================================================================
// Caching
// ============================================================================

pub use cache::{fingerprint, MemoCache, MemoKey};

// ============================================================================
// Tracing
// ============================================================================

pub use trace::{ArgMap, DefaultTracer, NullTracer, RecordingTracer, TraceEvent, Tracer};

// ============================================================================
// Options, References, Batches
// ============================================================================

pub use batch::parse_batch;
pub use options::ParseOptions;
pub use reference::Ref;
