//! Per-parse options
//!
//! # Example
//!
//! ```rust
//! use wikipeg::runtime::{DefaultTracer, ParseOptions};
//!
//! let options = ParseOptions::new()
//!     .with_start_rule("document")
//!     .with_param("inTemplate", true)
//!     .with_tracer(DefaultTracer::new());
//! assert_eq!(options.start_rule(), Some("document"));
//! ```

use serde_json::{Map, Value};
use std::fmt;

use super::trace::Tracer;

/// Options for one call to `parse`
#[derive(Default)]
pub struct ParseOptions {
    /// Tracer receiving rule events (no tracing when `None`)
    pub tracer: Option<Box<dyn Tracer>>,

    /// Rule to start from instead of the grammar's default
    pub start_rule: Option<String>,

    /// Grammar-specific options, passed through untouched
    pub params: Map<String, Value>,
}

impl ParseOptions {
    /// Options with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a tracer
    pub fn with_tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.tracer = Some(Box::new(tracer));
        self
    }

    /// Install an already boxed tracer
    pub fn with_boxed_tracer(mut self, tracer: Box<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Choose the start rule
    pub fn with_start_rule(mut self, rule: impl Into<String>) -> Self {
        self.start_rule = Some(rule.into());
        self
    }

    /// Set a grammar-specific option
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The requested start rule
    #[inline]
    pub fn start_rule(&self) -> Option<&str> {
        self.start_rule.as_deref()
    }

    /// A grammar-specific option
    #[inline]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Whether a tracer was supplied
    #[inline]
    pub fn is_traced(&self) -> bool {
        self.tracer.is_some()
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("tracer", &self.tracer.as_ref().map(|_| ".."))
            .field("start_rule", &self.start_rule)
            .field("params", &self.params)
            .finish()
    }
}
