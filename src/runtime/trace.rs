//! Rule tracing
//!
//! Generated parsers built with tracing wrap every rule call in
//! [`PegParser::trace_call`], which reports three kinds of event to the
//! [`Tracer`] installed for the parse:
//!
//! - [`TraceEvent::Enter`] before the rule runs, with its arguments
//! - [`TraceEvent::Match`] when it matched, spanning the consumed input
//! - [`TraceEvent::Fail`] when it did not, at the call position
//!
//! [`DefaultTracer`] pretty-prints an indented call tree:
//!
//! ```text
//! 1:1-1:1              rule.enter start
//! 1:1-1:1              rule.enter   digits<min=1>
//! 1:1-1:3              rule.match   digits
//! 1:1-1:3              rule.match start
//! ```
//!
//! [`PegParser::trace_call`]: super::parser::PegParser::trace_call

use serde_json::Value;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use super::source_location::LocationRange;

/// Rule arguments by name, in declaration order
pub type ArgMap = Vec<(&'static str, Value)>;

/// Argument key whose value is never printed
pub const SILENCE_ARG: &str = "$silence";

/// Argument key holding packed boolean parameters
pub const BOOL_PARAMS_ARG: &str = "$boolParams";

/// Prefix generated code puts on parameter names
pub const PARAM_PREFIX: &str = "$param_";

/// A single trace event
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// A rule is about to run
    Enter {
        /// Rule name
        rule: &'static str,
        /// Zero-width span at the call position
        location: LocationRange,
        /// Arguments passed to the rule
        args: ArgMap,
    },
    /// The rule matched
    Match {
        /// Rule name
        rule: &'static str,
        /// Span of the consumed input
        location: LocationRange,
    },
    /// The rule failed
    Fail {
        /// Rule name
        rule: &'static str,
        /// Zero-width span at the call position
        location: LocationRange,
    },
}

impl TraceEvent {
    /// Event type name (`rule.enter`, `rule.match`, `rule.fail`)
    pub fn type_name(&self) -> &'static str {
        match self {
            TraceEvent::Enter { .. } => "rule.enter",
            TraceEvent::Match { .. } => "rule.match",
            TraceEvent::Fail { .. } => "rule.fail",
        }
    }

    /// Name of the rule the event is about
    pub fn rule(&self) -> &'static str {
        match self {
            TraceEvent::Enter { rule, .. }
            | TraceEvent::Match { rule, .. }
            | TraceEvent::Fail { rule, .. } => rule,
        }
    }

    /// Span attached to the event
    pub fn location(&self) -> &LocationRange {
        match self {
            TraceEvent::Enter { location, .. }
            | TraceEvent::Match { location, .. }
            | TraceEvent::Fail { location, .. } => location,
        }
    }
}

/// Receiver of trace events
pub trait Tracer {
    /// Handle one event
    fn trace(&mut self, event: &TraceEvent);
}

/// Tracer that discards everything; the default for untraced parses
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTracer;

impl Tracer for NullTracer {
    #[inline]
    fn trace(&mut self, _event: &TraceEvent) {}
}

/// Tracer that prints an indented call tree to a writer
pub struct DefaultTracer<W: Write = io::Stdout> {
    out: W,
    indent_level: usize,
}

impl DefaultTracer<io::Stdout> {
    /// Trace to standard output
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for DefaultTracer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DefaultTracer<W> {
    /// Trace to `out`
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            indent_level: 0,
        }
    }

    /// Current nesting depth
    #[inline]
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn log(&mut self, event: &TraceEvent) {
        let args = match event {
            TraceEvent::Enter { args, .. } => format_args(args),
            _ => String::new(),
        };
        let result = writeln!(
            self.out,
            "{:<20} {:<10} {}{}{}",
            event.location().to_string(),
            event.type_name(),
            "  ".repeat(self.indent_level),
            event.rule(),
            args
        );
        if let Err(_e) = result {
            log_warn!("trace output failed: {}", _e);
        }
    }
}

impl<W: Write> Tracer for DefaultTracer<W> {
    fn trace(&mut self, event: &TraceEvent) {
        match event {
            TraceEvent::Enter { .. } => {
                self.log(event);
                self.indent_level += 1;
            }
            TraceEvent::Match { .. } | TraceEvent::Fail { .. } => {
                self.indent_level = self.indent_level.saturating_sub(1);
                self.log(event);
            }
        }
    }
}

/// Render rule arguments as `<a=1, &b="x">`, or nothing when there are none
pub fn format_args(args: &ArgMap) -> String {
    let mut parts = Vec::with_capacity(args.len());
    for (name, value) in args {
        if *name == SILENCE_ARG {
            continue;
        }
        if *name == BOOL_PARAMS_ARG {
            match value.as_u64() {
                Some(bits) => parts.push(format!("0x{:x}", bits)),
                None => parts.push(value.to_string()),
            }
            continue;
        }
        let display_name = name.replace(PARAM_PREFIX, "");
        let (display_name, sigil) = match display_name.strip_prefix('&') {
            Some(stripped) => (stripped.to_string(), "&"),
            None => (display_name, ""),
        };
        parts.push(format!("{}={}{}", display_name, sigil, value));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("<{}>", parts.join(", "))
    }
}

/// Tracer that records every event; clones share the same record
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl RecordingTracer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    /// Recorded events as `type rule` strings, handy for assertions
    pub fn summary(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|e| format!("{} {}", e.type_name(), e.rule()))
            .collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Tracer for RecordingTracer {
    fn trace(&mut self, event: &TraceEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
