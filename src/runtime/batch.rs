//! Batch parsing
//!
//! A parser instance serves one parse at a time. To parse many independent
//! inputs at once, each input gets its own instance from a factory.
//!
//! # Feature Flag
//!
//! With the `parallel` feature the inputs are spread over rayon's thread
//! pool; without it they are parsed one after another.
//!
//! # Example
//!
//! ```rust,ignore
//! let results = parse_batch(|| MyGrammar::new(), &["first", "second"]);
//! assert_eq!(results.len(), 2);
//! ```

use super::error::ParseError;
use super::options::ParseOptions;
use super::parser::PegParser;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Parse every input with a fresh parser from `make_parser`
///
/// Results are in the same order as `inputs`.
#[cfg(feature = "rayon")]
pub fn parse_batch<P, F>(make_parser: F, inputs: &[&str]) -> Vec<Result<P::Output, ParseError>>
where
    P: PegParser,
    P::Output: Send,
    F: Fn() -> P + Sync,
{
    inputs
        .par_iter()
        .map(|input| make_parser().parse(input, ParseOptions::new()))
        .collect()
}

/// Parse every input with a fresh parser from `make_parser`
///
/// Results are in the same order as `inputs`.
#[cfg(not(feature = "rayon"))]
pub fn parse_batch<P, F>(make_parser: F, inputs: &[&str]) -> Vec<Result<P::Output, ParseError>>
where
    P: PegParser,
    F: Fn() -> P,
{
    inputs
        .iter()
        .map(|input| make_parser().parse(input, ParseOptions::new()))
        .collect()
}
