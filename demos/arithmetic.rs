//! Arithmetic Expression Parser Demo
//!
//! A hand-written parser in the shape a generator emits, evaluating integer
//! expressions with `+ - * /` and parentheses. Shows tracing, semantic
//! errors and a by-reference rule argument.
//!
//! Run with: cargo run --example arithmetic -- "1 + 2 * (3 - 1)" [--trace]

use std::env;
use std::process::ExitCode;

use wikipeg::prelude::*;

/// ```text
/// start  = _ value:expr _
/// expr   = head:term tail:(_ [+-] _ term)*
/// term   = head:factor tail:(_ [*/] _ factor)*
/// factor<&depth> = "(" _ expr _ ")" / number
/// number "number" = [0-9]+
/// _      = [ \t]*
/// ```
static EXPECTATIONS: [ExpectationInfo; 8] = [
    ExpectationInfo::end(),
    ExpectationInfo::literal("(", "\"(\""),
    ExpectationInfo::literal(")", "\")\""),
    ExpectationInfo::class("[+-]", "[+-]"),
    ExpectationInfo::class("[*/]", "[*/]"),
    ExpectationInfo::class("[0-9]", "[0-9]"),
    ExpectationInfo::other("number"),
    ExpectationInfo::class("[ \\t]", "[ \\t]"),
];

struct Arithmetic {
    base: ParserBase,
    /// Deepest parenthesis nesting of the last parse
    max_depth: usize,
}

impl Arithmetic {
    fn new() -> Self {
        Self {
            base: ParserBase::new(&EXPECTATIONS),
            max_depth: 0,
        }
    }

    fn parse_start(&mut self) -> RuleOutcome<i64> {
        let depth = self.base.new_ref(0usize);
        self.skip_ws();
        let value = match self.parse_expr(&depth)? {
            RuleResult::Matched(v) => v,
            RuleResult::Failed => return Ok(RuleResult::Failed),
        };
        self.skip_ws();
        Ok(RuleResult::Matched(value))
    }

    fn parse_expr(&mut self, depth: &Ref<usize>) -> RuleOutcome<i64> {
        let args = vec![json!(depth.get())];
        self.trace_call("expr", &["$param_&depth"], args, |p| {
            p.parse_chain(depth, "[+-]", 3, Self::parse_term)
        })
    }

    fn parse_term(&mut self, depth: &Ref<usize>) -> RuleOutcome<i64> {
        let args = vec![json!(depth.get())];
        self.trace_call("term", &["$param_&depth"], args, |p| {
            p.parse_chain(depth, "[*/]", 4, Self::parse_factor)
        })
    }

    /// `head:operand tail:(_ op _ operand)*`, folded left
    fn parse_chain(
        &mut self,
        depth: &Ref<usize>,
        op_class: &str,
        op_expectation: usize,
        operand: fn(&mut Self, &Ref<usize>) -> RuleOutcome<i64>,
    ) -> RuleOutcome<i64> {
        let mut acc = match operand(self, depth)? {
            RuleResult::Matched(v) => v,
            RuleResult::Failed => return Ok(RuleResult::Failed),
        };

        loop {
            let p1 = self.base.curr_pos;
            self.skip_ws();
            let op_pos = self.base.curr_pos;
            if self.base.match_regex(op_class).is_none() {
                self.base.fail(op_expectation);
                self.base.curr_pos = p1;
                break;
            }
            let op = self.base.input()[op_pos..self.base.curr_pos].to_string();
            self.skip_ws();
            let rhs = match operand(self, depth)? {
                RuleResult::Matched(v) => v,
                RuleResult::Failed => {
                    self.base.curr_pos = p1;
                    break;
                }
            };

            self.base.saved_pos = op_pos;
            acc = match op.as_str() {
                "+" => acc.checked_add(rhs),
                "-" => acc.checked_sub(rhs),
                "*" => acc.checked_mul(rhs),
                _ if rhs == 0 => return Err(self.base.error("Division by zero.")),
                _ => acc.checked_div(rhs),
            }
            .ok_or_else(|| self.base.error("Arithmetic overflow."))?;
        }

        Ok(RuleResult::Matched(acc))
    }

    fn parse_factor(&mut self, depth: &Ref<usize>) -> RuleOutcome<i64> {
        let args = vec![json!(depth.get())];
        self.trace_call("factor", &["$param_&depth"], args, |p| {
            let p0 = p.base.curr_pos;
            if p.base.match_literal("(") {
                let saved = depth.snapshot();
                depth.update(|d| *d += 1);
                p.max_depth = p.max_depth.max(depth.get());

                p.skip_ws();
                if let RuleResult::Matched(v) = p.parse_expr(depth)? {
                    p.skip_ws();
                    if p.base.match_literal(")") {
                        depth.restore(saved);
                        return Ok(RuleResult::Matched(v));
                    }
                    p.base.fail(2);
                }
                depth.restore(saved);
                p.base.curr_pos = p0;
            } else {
                p.base.fail(1);
            }
            p.parse_number()
        })
    }

    fn parse_number(&mut self) -> RuleOutcome<i64> {
        self.trace_call("number", &[], vec![], |p| {
            let p0 = p.base.curr_pos;
            while p.base.match_regex("[0-9]").is_some() {}
            if p.base.curr_pos == p0 {
                p.base.fail(5);
                p.base.fail(6);
                return Ok(RuleResult::Failed);
            }
            p.base.saved_pos = p0;
            match p.base.text().parse() {
                Ok(n) => Ok(RuleResult::Matched(n)),
                Err(_) => Err(p.base.expected("a number that fits in 64 bits")),
            }
        })
    }

    fn skip_ws(&mut self) {
        while self.base.match_regex("[ \\t]").is_some() {}
        self.base.fail(7);
    }
}

impl PegParser for Arithmetic {
    type Output = i64;

    fn base(&self) -> &ParserBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParserBase {
        &mut self.base
    }

    fn initialize(&mut self) {
        self.max_depth = 0;
    }

    fn parse(&mut self, input: &str, options: ParseOptions) -> Result<i64, ParseError> {
        self.run_parse(input, options, 0, |p, start_rule| match start_rule {
            None | Some("start") => p.parse_start(),
            Some("number") => p.parse_number(),
            Some(other) => Err(p.base.unknown_start_rule(other)),
        })
    }
}

fn main() -> ExitCode {
    let mut trace = false;
    let mut inputs = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--trace" {
            trace = true;
        } else {
            inputs.push(arg);
        }
    }
    if inputs.is_empty() {
        inputs = vec![
            "1 + 2 * (3 - 1)".to_string(),
            "((4))/2".to_string(),
            "7 / (2 - 2)".to_string(),
            "2 * (3 +".to_string(),
        ];
    }

    let mut parser = Arithmetic::new();
    let mut status = ExitCode::SUCCESS;

    for input in &inputs {
        println!("Input: {:?}", input);
        let mut options = ParseOptions::new();
        if trace {
            options = options.with_tracer(DefaultTracer::new());
        }

        match parser.parse(input, options) {
            Ok(value) => println!("  = {} (nesting depth {})", value, parser.max_depth),
            Err(ParseError::Syntax(err)) => {
                status = ExitCode::FAILURE;
                for line in err.format_with_source(input).lines() {
                    println!("  {}", line);
                }
            }
            Err(err) => {
                status = ExitCode::FAILURE;
                println!("  {}", err);
            }
        }
        println!();
    }

    status
}
