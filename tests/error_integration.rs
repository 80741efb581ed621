//! Integration tests for error reporting
//!
//! These tests cover expectation ordering, message wording, the serialized
//! error shape and source excerpts.

mod grammars;

use grammars::{ByteListParser, DigitsParser, ParensParser};
use serde_json::json;
use wikipeg::prelude::*;
use wikipeg::runtime::{Expectation, ExpectationKind};

fn syntax_error<P: PegParser>(parser: &mut P, input: &str) -> SyntaxError {
    match parser.parse(input, ParseOptions::new()) {
        Err(ParseError::Syntax(err)) => err,
        Err(other) => panic!("expected a syntax error, got {other}"),
        Ok(_) => panic!("expected {input:?} to fail"),
    }
}

// ============================================================================
// Serialized Shape
// ============================================================================

#[test]
fn test_syntax_error_json() {
    let err = syntax_error(&mut DigitsParser::new(), "12a");
    let value = serde_json::to_value(&err).unwrap();

    assert_eq!(
        value,
        json!({
            "name": "SyntaxError",
            "message": "Expected [0-9] or end of input but \"a\" found.",
            "expected": [
                {"type": "class", "value": "[0-9]", "description": "[0-9]"},
                {"type": "end", "description": "end of input"}
            ],
            "found": "a",
            "location": {
                "start": {"offset": 2, "line": 1, "column": 3},
                "end": {"offset": 3, "line": 1, "column": 4}
            }
        })
    );
}

#[test]
fn test_syntax_error_json_at_end_of_input() {
    let err = syntax_error(&mut ParensParser::new(), "(()");
    let value = serde_json::to_value(&err).unwrap();

    assert_eq!(value["found"], Value::Null);
    assert_eq!(value["expected"][0], json!({"type": "literal", "value": "(", "description": "\"(\""}));
    assert_eq!(value["expected"][1]["value"], ")");
    assert_eq!(value["location"]["start"], value["location"]["end"]);
}

// ============================================================================
// Expectation Ordering
// ============================================================================

#[test]
fn test_expectations_sorted_by_kind_then_value() {
    let err = syntax_error(&mut ByteListParser::new(), "1,2,x");
    let kinds: Vec<ExpectationKind> = err.expected().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ExpectationKind::Class, ExpectationKind::Other]);
    assert_eq!(err.message(), r#"Expected [0-9] or byte but "x" found."#);

    let mut sorted = err.expected().to_vec();
    sorted.sort_by(Expectation::compare);
    assert_eq!(sorted, err.expected());
}

// ============================================================================
// Messages
// ============================================================================

#[test]
fn test_found_is_json_quoted() {
    let err = syntax_error(&mut DigitsParser::new(), "1\"");
    assert_eq!(err.found(), Some("\""));
    assert_eq!(
        err.message(),
        r#"Expected [0-9] or end of input but "\"" found."#
    );

    let err = syntax_error(&mut DigitsParser::new(), "1/");
    assert_eq!(
        err.message(),
        r#"Expected [0-9] or end of input but "/" found."#
    );

    let err = syntax_error(&mut DigitsParser::new(), "1é");
    assert_eq!(err.found(), Some("é"));
    assert_eq!(err.location().end.offset, 3);
    assert_eq!(
        err.message(),
        r#"Expected [0-9] or end of input but "é" found."#
    );
}

#[test]
fn test_display_includes_position() {
    let err = syntax_error(&mut DigitsParser::new(), "12a");
    assert_eq!(
        err.to_string(),
        r#"Error at line 1, column 3: Expected [0-9] or end of input but "a" found."#
    );
    let wrapped = ParseError::from(err.clone());
    assert_eq!(wrapped.to_string(), err.to_string());
}

#[test]
fn test_format_with_source() {
    let input = "1,2,\n3,x";
    let err = syntax_error(&mut ByteListParser::new(), input);
    let excerpt = err.format_with_source(input);
    let lines: Vec<&str> = excerpt.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "1,2,");
    assert_eq!(lines[2], "    ^");
}

#[test]
fn test_error_source_chain() {
    use std::error::Error as _;

    let err = DigitsParser::new()
        .parse("x", ParseOptions::new())
        .unwrap_err();
    assert!(err.source().is_some());

    let internal = ParseError::internal("boom");
    assert!(internal.source().is_none());
}
