//! Small parsers written the way a generator emits them
//!
//! Shared by the integration tests. Each grammar is given in PEG notation
//! above its parser.

#![allow(dead_code)]

use serde_json::json;
use wikipeg::runtime::{
    ExpectationInfo, ParseError, ParseOptions, ParserBase, PegParser, Ref, RuleOutcome,
    RuleResult,
};

// ============================================================================
// Digits
// ============================================================================

static DIGITS_EXPECTATIONS: [ExpectationInfo; 2] = [
    ExpectationInfo::end(),
    ExpectationInfo::class("[0-9]", "[0-9]"),
];

/// ```text
/// start  = digit+
/// single = digit
/// digit  = [0-9]
/// ```
pub struct DigitsParser {
    base: ParserBase,
}

impl DigitsParser {
    pub fn new() -> Self {
        Self {
            base: ParserBase::new(&DIGITS_EXPECTATIONS),
        }
    }

    fn parse_start(&mut self) -> RuleOutcome<String> {
        self.trace_call("start", &[], vec![], |p| {
            let p0 = p.base.curr_pos;
            let mut count = 0;
            while p.parse_digit()?.is_matched() {
                count += 1;
            }
            if count == 0 {
                p.base.curr_pos = p0;
                return Ok(RuleResult::Failed);
            }
            p.base.saved_pos = p0;
            Ok(RuleResult::Matched(p.base.text().to_string()))
        })
    }

    fn parse_single(&mut self) -> RuleOutcome<String> {
        self.trace_call("single", &[], vec![], |p| {
            Ok(p.parse_digit()?.map(|c| c.to_string()))
        })
    }

    fn parse_digit(&mut self) -> RuleOutcome<char> {
        self.trace_call("digit", &[], vec![], |p| {
            let p0 = p.base.curr_pos;
            if p.base.match_regex("[0-9]").is_some() {
                let c = p.base.input()[p0..].chars().next().unwrap_or('0');
                Ok(RuleResult::Matched(c))
            } else {
                p.base.fail(1);
                Ok(RuleResult::Failed)
            }
        })
    }
}

impl PegParser for DigitsParser {
    type Output = String;

    fn base(&self) -> &ParserBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParserBase {
        &mut self.base
    }

    fn parse(&mut self, input: &str, options: ParseOptions) -> Result<String, ParseError> {
        self.run_parse(input, options, 0, |p, start_rule| match start_rule {
            None | Some("start") => p.parse_start(),
            Some("single") => p.parse_single(),
            Some("digit") => Ok(p.parse_digit()?.map(|c| c.to_string())),
            Some(other) => Err(p.base.unknown_start_rule(other)),
        })
    }
}

// ============================================================================
// Balanced parentheses
// ============================================================================

static PARENS_EXPECTATIONS: [ExpectationInfo; 3] = [
    ExpectationInfo::end(),
    ExpectationInfo::literal("(", "\"(\""),
    ExpectationInfo::literal(")", "\")\""),
];

const RULE_PARENS: u32 = 0;

/// ```text
/// parens = ("(" parens ")")*     // value: maximum nesting depth
/// ```
pub struct ParensParser {
    base: ParserBase,
}

impl ParensParser {
    pub fn new() -> Self {
        Self {
            base: ParserBase::new(&PARENS_EXPECTATIONS),
        }
    }

    fn parse_parens(&mut self) -> RuleOutcome<usize> {
        if let Some(cached) = self.base.memo_get::<usize>(RULE_PARENS, 0) {
            return Ok(cached);
        }
        let start = self.base.curr_pos;

        let mut depth = 0;
        loop {
            let p1 = self.base.curr_pos;
            if !self.base.match_literal("(") {
                self.base.fail(1);
                break;
            }
            let inner = match self.parse_parens()? {
                RuleResult::Matched(inner) => inner,
                RuleResult::Failed => {
                    self.base.curr_pos = p1;
                    break;
                }
            };
            if !self.base.match_literal(")") {
                self.base.fail(2);
                self.base.curr_pos = p1;
                break;
            }
            depth = depth.max(inner + 1);
        }

        let result = RuleResult::Matched(depth);
        self.base.memo_put(RULE_PARENS, start, 0, &result);
        Ok(result)
    }
}

impl PegParser for ParensParser {
    type Output = usize;

    fn base(&self) -> &ParserBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParserBase {
        &mut self.base
    }

    fn parse(&mut self, input: &str, options: ParseOptions) -> Result<usize, ParseError> {
        self.run_parse(input, options, 0, |p, start_rule| match start_rule {
            None | Some("parens") => p.parse_parens(),
            Some(other) => Err(p.base.unknown_start_rule(other)),
        })
    }
}

// ============================================================================
// Byte lists
// ============================================================================

static BYTES_EXPECTATIONS: [ExpectationInfo; 4] = [
    ExpectationInfo::end(),
    ExpectationInfo::literal(",", "\",\""),
    ExpectationInfo::class("[0-9]", "[0-9]"),
    ExpectationInfo::other("byte"),
];

/// ```text
/// start      = first:byte<&count> rest:("," byte<&count>)*
/// byte<&count> "byte" = [0-9]+ { count += 1; value must fit in a byte }
/// ```
///
/// The `maxItems` option limits how many bytes may appear.
pub struct ByteListParser {
    base: ParserBase,
    /// Number of bytes seen by the last parse
    pub seen: usize,
}

impl ByteListParser {
    pub fn new() -> Self {
        Self {
            base: ParserBase::new(&BYTES_EXPECTATIONS),
            seen: 0,
        }
    }

    fn parse_start(&mut self) -> RuleOutcome<Vec<u8>> {
        let count = self.base.new_ref(0usize);
        let p0 = self.base.curr_pos;

        let first = match self.parse_byte(&count)? {
            RuleResult::Matched(b) => b,
            RuleResult::Failed => {
                self.base.curr_pos = p0;
                return Ok(RuleResult::Failed);
            }
        };
        let mut bytes = vec![first];

        loop {
            let p1 = self.base.curr_pos;
            let saved = count.snapshot();
            if !self.base.match_literal(",") {
                self.base.fail(1);
                break;
            }
            match self.parse_byte(&count)? {
                RuleResult::Matched(b) => bytes.push(b),
                RuleResult::Failed => {
                    self.base.curr_pos = p1;
                    count.restore(saved);
                    break;
                }
            }
        }

        self.seen = count.get();
        Ok(RuleResult::Matched(bytes))
    }

    fn parse_byte(&mut self, count: &Ref<usize>) -> RuleOutcome<u8> {
        let args = vec![json!(count.get()), json!(true)];
        self.trace_call("byte", &["$param_&count", "$silence"], args, |p| {
            let p0 = p.base.curr_pos;
            while p.base.match_regex("[0-9]").is_some() {}
            if p.base.curr_pos == p0 {
                p.base.fail(2);
                p.base.fail(3);
                return Ok(RuleResult::Failed);
            }

            p.base.saved_pos = p0;
            count.update(|c| *c += 1);
            if let Some(max) = p.base.options().param("maxItems").and_then(|v| v.as_u64()) {
                if count.get() as u64 > max {
                    return Err(p.base.error("Too many items."));
                }
            }
            match p.base.text().parse::<u8>() {
                Ok(b) => Ok(RuleResult::Matched(b)),
                Err(_) => Err(p.base.expected("a number between 0 and 255")),
            }
        })
    }
}

impl PegParser for ByteListParser {
    type Output = Vec<u8>;

    fn base(&self) -> &ParserBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParserBase {
        &mut self.base
    }

    fn initialize(&mut self) {
        self.seen = 0;
    }

    fn parse(&mut self, input: &str, options: ParseOptions) -> Result<Vec<u8>, ParseError> {
        self.run_parse(input, options, 0, |p, start_rule| match start_rule {
            None | Some("start") => p.parse_start(),
            Some(other) => Err(p.base.unknown_start_rule(other)),
        })
    }
}

// ============================================================================
// Ordered choice over a shared prefix
// ============================================================================

static CHOICE_EXPECTATIONS: [ExpectationInfo; 4] = [
    ExpectationInfo::end(),
    ExpectationInfo::class("[a-z]", "[a-z]"),
    ExpectationInfo::literal("x", "\"x\""),
    ExpectationInfo::literal("y", "\"y\""),
];

const RULE_WORD: u32 = 0;

/// ```text
/// start = w:word "x" / w:word "y"
/// word  = [a-z]+
/// ```
///
/// With `memoize` set, the second alternative reuses the first one's `word`.
pub struct ChoiceParser {
    base: ParserBase,
    memoize: bool,
}

impl ChoiceParser {
    pub fn new(memoize: bool) -> Self {
        Self {
            base: ParserBase::new(&CHOICE_EXPECTATIONS),
            memoize,
        }
    }

    fn parse_start(&mut self) -> RuleOutcome<String> {
        let p0 = self.base.curr_pos;
        for (literal, expectation) in [("x", 2), ("y", 3)] {
            if let RuleResult::Matched(word) = self.parse_word()? {
                if self.base.match_literal(literal) {
                    return Ok(RuleResult::Matched(format!("{}{}", word, literal)));
                }
                self.base.fail(expectation);
            }
            self.base.curr_pos = p0;
        }
        Ok(RuleResult::Failed)
    }

    fn parse_word(&mut self) -> RuleOutcome<String> {
        if self.memoize {
            if let Some(cached) = self.base.memo_get::<String>(RULE_WORD, 0) {
                return Ok(cached);
            }
        }
        let start = self.base.curr_pos;

        while self.base.match_regex("[a-z]").is_some() {}
        self.base.fail(1);
        let result = if self.base.curr_pos == start {
            RuleResult::Failed
        } else {
            self.base.saved_pos = start;
            RuleResult::Matched(self.base.text().to_string())
        };

        if self.memoize {
            self.base.memo_put(RULE_WORD, start, 0, &result);
        }
        Ok(result)
    }
}

impl PegParser for ChoiceParser {
    type Output = String;

    fn base(&self) -> &ParserBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParserBase {
        &mut self.base
    }

    fn parse(&mut self, input: &str, options: ParseOptions) -> Result<String, ParseError> {
        self.run_parse(input, options, 0, |p, start_rule| match start_rule {
            None | Some("start") => p.parse_start(),
            Some(other) => Err(p.base.unknown_start_rule(other)),
        })
    }
}
