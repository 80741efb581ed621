//! Parser runtime
//!
//! [`ParserBase`] holds everything a generated parser mutates while it runs:
//! the input, the cursor, the memo and position caches, the furthest-failure
//! record and the tracer. Generated parsers embed one and implement
//! [`PegParser`] to expose it.
//!
//! # Rule contract
//!
//! Every generated rule method returns a [`RuleOutcome`]:
//!
//! - `Ok(RuleResult::Matched(v))`: the rule matched and `curr_pos` has moved
//!   past the consumed input.
//! - `Ok(RuleResult::Failed)`: no alternative matched, `curr_pos` is back
//!   where the rule started and [`ParserBase::fail`] recorded why.
//! - `Err(ParseError)`: a semantic action rejected the input through
//!   [`ParserBase::expected`] or [`ParserBase::error`]; the parse is over.
//!
//! Ordinary backtracking never produces `Err`. Only the top-level
//! [`ParserBase::finish`] turns an exhausted parse into a [`SyntaxError`].
//!
//! # Example
//!
//! ```rust
//! use wikipeg::runtime::{
//!     ExpectationInfo, ParseError, ParseOptions, ParserBase, PegParser, RuleOutcome, RuleResult,
//! };
//!
//! static EXPECTATIONS: [ExpectationInfo; 2] = [
//!     ExpectationInfo::end(),
//!     ExpectationInfo::literal("hi", "\"hi\""),
//! ];
//!
//! struct Hello {
//!     base: ParserBase,
//! }
//!
//! impl Hello {
//!     fn parse_start(&mut self) -> RuleOutcome<String> {
//!         if self.base.match_literal("hi") {
//!             Ok(RuleResult::Matched("hi".to_string()))
//!         } else {
//!             self.base.fail(1);
//!             Ok(RuleResult::Failed)
//!         }
//!     }
//! }
//!
//! impl PegParser for Hello {
//!     type Output = String;
//!
//!     fn base(&self) -> &ParserBase {
//!         &self.base
//!     }
//!
//!     fn base_mut(&mut self) -> &mut ParserBase {
//!         &mut self.base
//!     }
//!
//!     fn parse(&mut self, input: &str, options: ParseOptions) -> Result<String, ParseError> {
//!         self.run_parse(input, options, 0, |p, _start_rule| p.parse_start())
//!     }
//! }
//!
//! let mut parser = Hello { base: ParserBase::new(&EXPECTATIONS) };
//! assert_eq!(parser.parse("hi", ParseOptions::new()).unwrap(), "hi");
//! let err = parser.parse("ho", ParseOptions::new()).unwrap_err();
//! assert_eq!(err.as_syntax().unwrap().message(), "Expected \"hi\" but \"h\" found.");
//! ```
//!
//! [`SyntaxError`]: super::error::SyntaxError

use ahash::RandomState;
use hashbrown::{HashMap, HashSet};
use serde_json::Value;

use super::{
    cache::{MemoCache, MemoKey},
    chars,
    error::{build_message, ParseError, SyntaxError},
    expectation::{Expectation, ExpectationInfo},
    options::ParseOptions,
    reference::Ref,
    regex_cache,
    source_location::{LocationRange, PosDetails, PosDetailsCache},
    trace::{ArgMap, NullTracer, TraceEvent, Tracer},
};

/// Outcome of one rule attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleResult<T> {
    /// The rule matched and produced a value
    Matched(T),
    /// The rule did not match
    Failed,
}

impl<T> RuleResult<T> {
    /// Whether the rule matched
    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self, RuleResult::Matched(_))
    }

    /// Whether the rule failed
    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, RuleResult::Failed)
    }

    /// Transform the matched value
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RuleResult<U> {
        match self {
            RuleResult::Matched(v) => RuleResult::Matched(f(v)),
            RuleResult::Failed => RuleResult::Failed,
        }
    }

    /// The matched value, if any
    #[inline]
    pub fn matched(self) -> Option<T> {
        match self {
            RuleResult::Matched(v) => Some(v),
            RuleResult::Failed => None,
        }
    }
}

impl<T> From<Option<T>> for RuleResult<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => RuleResult::Matched(v),
            None => RuleResult::Failed,
        }
    }
}

/// What a generated rule method returns
pub type RuleOutcome<T> = Result<RuleResult<T>, ParseError>;

/// Mutable parsing state shared by every rule of a generated parser
///
/// One instance serves one parse at a time; [`ParserBase::init_internal`]
/// resets it completely, so an instance can be reused for any number of
/// sequential parses.
pub struct ParserBase {
    /// Current scan position (byte offset)
    pub curr_pos: usize,

    /// Start of the span the current action sees through `text()`/`location()`
    pub saved_pos: usize,

    /// Input buffer, reused across parses
    input: String,

    /// Options of the current parse (tracer taken out)
    options: ParseOptions,

    /// Receives rule events
    tracer: Box<dyn Tracer>,

    /// Whether a tracer was supplied for this parse
    traced: bool,

    /// Packrat memoization cache
    memo: MemoCache,

    /// Offset → line/column table
    pos_details: PosDetailsCache,

    /// Furthest offset at which anything failed
    max_fail_pos: usize,

    /// Expectation indices recorded at `max_fail_pos`
    max_fail_expected: Vec<usize>,

    /// The grammar's expectation table
    expectations: &'static [ExpectationInfo],

    /// Expanded expectations by table index
    expectation_cache: HashMap<usize, Expectation, RandomState>,
}

impl std::fmt::Debug for ParserBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserBase")
            .field("curr_pos", &self.curr_pos)
            .field("saved_pos", &self.saved_pos)
            .field("input_len", &self.input.len())
            .field("traced", &self.traced)
            .field("memo", &self.memo)
            .field("max_fail_pos", &self.max_fail_pos)
            .field("max_fail_expected", &self.max_fail_expected)
            .finish()
    }
}

impl ParserBase {
    /// Create a parser base for a grammar with the given expectation table
    pub fn new(expectations: &'static [ExpectationInfo]) -> Self {
        Self {
            curr_pos: 0,
            saved_pos: 0,
            input: String::new(),
            options: ParseOptions::default(),
            tracer: Box::new(NullTracer),
            traced: false,
            memo: MemoCache::new(),
            pos_details: PosDetailsCache::new(),
            max_fail_pos: 0,
            max_fail_expected: Vec::new(),
            expectations,
            expectation_cache: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Reset all per-parse state for a new input
    ///
    /// Must run before any rule method. Takes the tracer out of `options`
    /// (falling back to [`NullTracer`]) and keeps the rest for the rules to
    /// consult.
    pub fn init_internal(&mut self, input: &str, mut options: ParseOptions) {
        self.curr_pos = 0;
        self.saved_pos = 0;

        self.input.clear();
        self.input.push_str(input);

        match options.tracer.take() {
            Some(tracer) => {
                self.tracer = tracer;
                self.traced = true;
            }
            None => {
                self.tracer = Box::new(NullTracer);
                self.traced = false;
            }
        }
        self.options = options;

        self.memo.clear();
        self.pos_details.reset();
        self.max_fail_pos = 0;
        self.max_fail_expected.clear();
        self.expectation_cache.clear();

        log_debug!(
            "Starting parse: input_len={}, start_rule={:?}, traced={}",
            self.input.len(),
            self.options.start_rule(),
            self.traced
        );
    }

    // ------------------------------------------------------------------
    // Input and options
    // ------------------------------------------------------------------

    /// The whole input
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Input length in bytes
    #[inline]
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    /// Options of the current parse
    #[inline]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Whether a tracer is installed for the current parse
    #[inline]
    pub fn is_traced(&self) -> bool {
        self.traced
    }

    /// The memo cache (for statistics)
    #[inline]
    pub fn memo(&self) -> &MemoCache {
        &self.memo
    }

    /// The position-details cache (for statistics)
    #[inline]
    pub fn pos_details(&self) -> &PosDetailsCache {
        &self.pos_details
    }

    /// Furthest failure offset so far
    #[inline]
    pub fn max_fail_pos(&self) -> usize {
        self.max_fail_pos
    }

    /// Expectation indices recorded at [`max_fail_pos`](Self::max_fail_pos)
    #[inline]
    pub fn max_fail_expected(&self) -> &[usize] {
        &self.max_fail_expected
    }

    // ------------------------------------------------------------------
    // Action helpers
    // ------------------------------------------------------------------

    /// Input between `saved_pos` and `curr_pos`
    #[inline]
    pub fn text(&self) -> &str {
        self.input.get(self.saved_pos..self.curr_pos).unwrap_or("")
    }

    /// Location of `saved_pos..curr_pos`
    #[inline]
    pub fn location(&mut self) -> LocationRange {
        self.compute_location(self.saved_pos, self.curr_pos)
    }

    /// Reject the current span with a free-text expectation
    ///
    /// Actions return the error with `?`; nothing backtracks past it.
    pub fn expected(&mut self, description: &str) -> ParseError {
        let found = self.found_text();
        let location = self.location();
        let expected = vec![Expectation::other(description)];
        let message = build_message(&expected, found.as_deref());
        SyntaxError::new(message, expected, found, location).into()
    }

    /// Reject the current span with a fixed message
    pub fn error(&mut self, message: &str) -> ParseError {
        let found = self.found_text();
        let location = self.location();
        SyntaxError::new(message, Vec::new(), found, location).into()
    }

    fn found_text(&self) -> Option<String> {
        let text = self.text();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Create a by-reference argument
    #[inline]
    pub fn new_ref<T>(&self, value: T) -> Ref<T> {
        Ref::new(value)
    }

    // ------------------------------------------------------------------
    // Failure bookkeeping
    // ------------------------------------------------------------------

    /// Record that expectation `expected` failed at `curr_pos`
    ///
    /// Only failures at the furthest position reached survive.
    #[inline]
    pub fn fail(&mut self, expected: usize) {
        if self.curr_pos < self.max_fail_pos {
            return;
        }
        if self.curr_pos > self.max_fail_pos {
            self.max_fail_pos = self.curr_pos;
            self.max_fail_expected.clear();
        }
        self.max_fail_expected.push(expected);
    }

    // ------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------

    /// The character at `offset` of `s`
    #[inline]
    pub fn char_at(s: &str, offset: usize) -> &str {
        chars::char_at(s, offset)
    }

    /// Up to `count` characters of `s` starting at `offset`
    #[inline]
    pub fn chars_at(s: &str, offset: usize, count: usize) -> &str {
        chars::chars_at(s, offset, count)
    }

    /// The character at `*offset`, moving `*offset` past it
    #[inline]
    pub fn consume_char<'s>(s: &'s str, offset: &mut usize) -> &'s str {
        chars::consume_char(s, offset)
    }

    /// Move `*offset` past one character
    #[inline]
    pub fn advance_char(s: &str, offset: &mut usize) {
        chars::advance_char(s, offset)
    }

    /// The character at the cursor (empty at end of input)
    #[inline]
    pub fn current_char(&self) -> &str {
        chars::char_at(&self.input, self.curr_pos)
    }

    /// Whether the cursor is at the end of input
    #[inline]
    pub fn at_end(&self) -> bool {
        self.curr_pos >= self.input.len()
    }

    /// Consume `literal` at the cursor
    #[inline]
    pub fn match_literal(&mut self, literal: &str) -> bool {
        let matched = self
            .input
            .get(self.curr_pos..)
            .is_some_and(|rest| rest.starts_with(literal));
        if matched {
            self.curr_pos += literal.len();
        }
        matched
    }

    /// Consume one character matching the anchored regex `pattern`
    /// (typically a character class) at the cursor
    ///
    /// Returns the width consumed. Invalid patterns never match.
    pub fn match_regex(&mut self, pattern: &str) -> Option<usize> {
        let ch = chars::char_at(&self.input, self.curr_pos);
        if ch.is_empty() {
            return None;
        }
        let len = match regex_cache::match_len(pattern, ch) {
            Some(len) if len > 0 => len,
            _ => return None,
        };
        self.curr_pos += len;
        Some(len)
    }

    /// Consume any one character
    #[inline]
    pub fn any_char(&mut self) -> bool {
        let width = chars::char_len_at(self.input.as_bytes(), self.curr_pos);
        self.curr_pos += width;
        width > 0
    }

    // ------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------

    /// Line/column details of `pos`, memoized
    #[inline]
    pub fn compute_pos_details(&mut self, pos: usize) -> PosDetails {
        self.pos_details.compute(&self.input, pos)
    }

    /// Location range for `start_pos..end_pos`
    ///
    /// An `end_pos` past the input end resolves its line/column one byte
    /// earlier; the range still records the `end_pos` that was passed in.
    pub fn compute_location(&mut self, start_pos: usize, end_pos: usize) -> LocationRange {
        let end_details_pos = if end_pos > self.input.len() {
            end_pos - 1
        } else {
            end_pos
        };
        let start = self.compute_pos_details(start_pos);
        let end = self.compute_pos_details(end_details_pos);
        LocationRange::new(
            start_pos,
            start.line,
            start.column,
            end_pos,
            end.line,
            end.column,
        )
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    /// Expanded expectation for table entry `index`
    fn expectation(&mut self, index: usize) -> Option<Expectation> {
        let expectations = self.expectations;
        let info = expectations.get(index)?;
        Some(
            self.expectation_cache
                .entry(index)
                .or_insert_with(|| Expectation::from(info))
                .clone(),
        )
    }

    /// Assemble a [`SyntaxError`]
    ///
    /// With `expected` given, the raw indices are sorted and deduplicated
    /// before expansion, then the expectations are sorted and only the first
    /// expectation with each description is kept.
    /// `message` is used verbatim if given, otherwise synthesized.
    pub fn build_exception(
        &mut self,
        message: Option<&str>,
        expected: Option<&[usize]>,
        found: Option<&str>,
        location: LocationRange,
    ) -> SyntaxError {
        let expectations = match expected {
            Some(indices) => {
                let mut keys = indices.to_vec();
                keys.sort_unstable();
                keys.dedup();

                let mut list = Vec::with_capacity(keys.len());
                for index in keys {
                    match self.expectation(index) {
                        Some(e) => list.push(e),
                        None => {
                            log_warn!("unknown expectation index {}", index);
                        }
                    }
                }
                list.sort_by(Expectation::compare);
                let mut seen = HashSet::with_capacity_and_hasher(list.len(), RandomState::new());
                list.retain(|e| seen.insert(e.description.clone()));
                list
            }
            None => Vec::new(),
        };

        let message = match message {
            Some(message) => message.to_string(),
            None => build_message(&expectations, found),
        };

        SyntaxError::new(message, expectations, found.map(str::to_string), location)
    }

    /// `Expected ... but ... found.` for a list of expectations
    #[inline]
    pub fn build_message(expected: &[Expectation], found: Option<&str>) -> String {
        build_message(expected, found)
    }

    /// The error for a parse that could not continue
    ///
    /// Reports the expectations recorded at the furthest failure position
    /// and the one character found there.
    pub fn build_parse_exception(&mut self) -> SyntaxError {
        let pos = self.max_fail_pos;
        let found = chars::char_at(&self.input, pos).to_string();
        let expected = std::mem::take(&mut self.max_fail_expected);

        let error = if found.is_empty() {
            let location = self.compute_location(pos, pos);
            self.build_exception(None, Some(expected.as_slice()), None, location)
        } else {
            let location = self.compute_location(pos, pos + found.len());
            self.build_exception(None, Some(expected.as_slice()), Some(found.as_str()), location)
        };

        self.max_fail_expected = expected;
        error
    }

    /// Epilogue of a generated `parse`
    ///
    /// Succeeds when the start rule matched the whole input. A match that
    /// stopped short records `end_expectation` (the grammar's end-of-input
    /// entry) at the stopping point before the error is built.
    pub fn finish<T>(&mut self, result: RuleResult<T>, end_expectation: usize) -> Result<T, ParseError> {
        match result {
            RuleResult::Matched(value) if self.curr_pos == self.input.len() => {
                log_debug!(
                    "Parse successful: memo hits={}, misses={}",
                    self.memo.hits(),
                    self.memo.misses()
                );
                Ok(value)
            }
            result => {
                if result.is_matched() && self.curr_pos < self.input.len() {
                    self.fail(end_expectation);
                }
                let error = self.build_parse_exception();
                log_debug!(
                    "Parse failed at {}: {}",
                    self.max_fail_pos,
                    error.message()
                );
                Err(ParseError::Syntax(error))
            }
        }
    }

    /// The error for a start rule the grammar does not allow
    pub fn unknown_start_rule(&self, rule: &str) -> ParseError {
        ParseError::internal(format!("Can't start parsing from rule \"{}\".", rule))
    }

    // ------------------------------------------------------------------
    // Memoization
    // ------------------------------------------------------------------

    /// Look up rule `rule` at the cursor
    ///
    /// On a hit the cursor moves to where the cached run left it.
    pub fn memo_get<T: Clone + 'static>(&mut self, rule: u32, args: u64) -> Option<RuleResult<T>> {
        let key = MemoKey::with_args(rule, self.curr_pos, args);
        let (next_pos, result) = self.memo.get::<T>(&key)?;
        self.curr_pos = next_pos;
        Some(result)
    }

    /// Store the result of rule `rule` that started at `start_pos`
    pub fn memo_put<T: Clone + 'static>(
        &mut self,
        rule: u32,
        start_pos: usize,
        args: u64,
        result: &RuleResult<T>,
    ) {
        let key = MemoKey::with_args(rule, start_pos, args);
        self.memo.insert(key, self.curr_pos, result.clone());
    }

    // ------------------------------------------------------------------
    // Tracing
    // ------------------------------------------------------------------

    /// Send an event to the tracer
    #[inline]
    pub fn trace(&mut self, event: &TraceEvent) {
        self.tracer.trace(event);
    }
}

/// Implemented by every generated parser
pub trait PegParser {
    /// Value produced by the start rule
    type Output;

    /// The embedded runtime state
    fn base(&self) -> &ParserBase;

    /// The embedded runtime state, mutably
    fn base_mut(&mut self) -> &mut ParserBase;

    /// Grammar-specific setup, run after `init_internal` on every parse
    fn initialize(&mut self) {}

    /// Parse `input` from the start rule
    fn parse(&mut self, input: &str, options: ParseOptions) -> Result<Self::Output, ParseError>;

    /// Standard body of [`parse`](Self::parse)
    ///
    /// Resets the state, runs [`initialize`](Self::initialize), hands the
    /// requested start rule to `start` and finishes with
    /// [`ParserBase::finish`].
    fn run_parse<F>(
        &mut self,
        input: &str,
        options: ParseOptions,
        end_expectation: usize,
        start: F,
    ) -> Result<Self::Output, ParseError>
    where
        Self: Sized,
        F: FnOnce(&mut Self, Option<&str>) -> RuleOutcome<Self::Output>,
    {
        let start_rule = options.start_rule.clone();
        self.base_mut().init_internal(input, options);
        self.initialize();
        let result = start(self, start_rule.as_deref())?;
        self.base_mut().finish(result, end_expectation)
    }

    /// Run `match_fn` as rule `rule`, reporting enter/match/fail events
    ///
    /// `arg_names` and `args` pair up into the argument map of the enter
    /// event. The outcome is returned untouched. Without a tracer the rule
    /// simply runs.
    fn trace_call<T, F>(
        &mut self,
        rule: &'static str,
        arg_names: &[&'static str],
        args: Vec<Value>,
        match_fn: F,
    ) -> RuleOutcome<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> RuleOutcome<T>,
    {
        if !self.base().is_traced() {
            return match_fn(self);
        }

        let arg_map: ArgMap = arg_names.iter().copied().zip(args).collect();
        let start_pos = self.base().curr_pos;
        let base = self.base_mut();
        let location = base.compute_location(start_pos, start_pos);
        base.trace(&TraceEvent::Enter {
            rule,
            location,
            args: arg_map,
        });

        let result = match_fn(self)?;

        let base = self.base_mut();
        if result.is_matched() {
            let location = base.compute_location(start_pos, base.curr_pos);
            base.trace(&TraceEvent::Match { rule, location });
        } else {
            let location = base.compute_location(start_pos, start_pos);
            base.trace(&TraceEvent::Fail { rule, location });
        }
        Ok(result)
    }
}
