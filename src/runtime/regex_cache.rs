//! Character-class patterns for [`ParserBase::match_regex`]
//!
//! Each pattern is anchored at the cursor and compiled the first time a
//! thread uses it. Patterns that fail to compile are remembered too, so a
//! bad class costs one compile attempt, not one per call.
//!
//! [`ParserBase::match_regex`]: super::parser::ParserBase::match_regex

use hashbrown::HashMap;
use regex::Regex;
use std::cell::RefCell;

thread_local! {
    /// Anchored patterns by source text; `None` marks an invalid pattern
    static ANCHORED: RefCell<HashMap<Box<str>, Option<Regex>>> = RefCell::new(HashMap::new());
}

fn compile_anchored(pattern: &str) -> Option<Regex> {
    let compiled = Regex::new(&format!("^(?:{})", pattern)).ok();
    if compiled.is_none() {
        log_warn!("invalid character class pattern {:?}", pattern);
    }
    compiled
}

/// Length in bytes of the match of `pattern` at the start of `haystack`
///
/// An invalid pattern never matches.
pub fn match_len(pattern: &str, haystack: &str) -> Option<usize> {
    ANCHORED.with(|cell| {
        let mut patterns = cell.borrow_mut();
        let regex = patterns
            .entry_ref(pattern)
            .or_insert_with(|| compile_anchored(pattern));
        regex.as_ref()?.find(haystack).map(|m| m.end())
    })
}

/// Number of distinct patterns this thread has seen, valid or not
pub fn known_patterns() -> usize {
    ANCHORED.with(|cell| cell.borrow().len())
}
