//! Source Location Utilities
//!
//! Line/column tracking for generated parsers. Offsets are byte offsets into
//! the UTF-8 input; lines and columns are 1-based and counted in characters.
//!
//! Position lookups are requested over and over for overlapping ranges (every
//! traced rule call asks for one), so [`PosDetailsCache`] remembers every
//! offset it has resolved and walks forward from the nearest resolved offset
//! below the one requested.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::chars;

/// A position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of input
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, counted in characters)
    pub column: usize,
}

impl Location {
    /// Create a new location
    #[inline]
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source code with both endpoints resolved to line/column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationRange {
    /// Start position
    pub start: Location,
    /// End position
    pub end: Location,
}

impl LocationRange {
    /// Create a new range from its six components
    #[inline]
    pub fn new(
        start_offset: usize,
        start_line: usize,
        start_column: usize,
        end_offset: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        Self {
            start: Location::new(start_offset, start_line, start_column),
            end: Location::new(end_offset, end_line, end_column),
        }
    }

    /// Length of the range in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Check if this is a zero-width range
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

impl fmt::Display for LocationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Resolved line/column state at one byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosDetails {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Whether the character before this offset was a CR-class line break,
    /// so that a following `\n` does not start another line
    pub seen_cr: bool,
}

impl PosDetails {
    /// Details at offset 0
    pub const START: PosDetails = PosDetails {
        line: 1,
        column: 1,
        seen_cr: false,
    };

    /// Step over one character
    #[inline]
    fn step(&mut self, ch: &str) {
        match ch {
            "\n" => {
                if !self.seen_cr {
                    self.line += 1;
                }
                self.column = 1;
                self.seen_cr = false;
            }
            "\r" | "\u{2028}" | "\u{2029}" => {
                self.line += 1;
                self.column = 1;
                self.seen_cr = true;
            }
            _ => {
                self.column += 1;
                self.seen_cr = false;
            }
        }
    }
}

impl Default for PosDetails {
    fn default() -> Self {
        Self::START
    }
}

/// Memoized offset → line/column table for one input
#[derive(Debug, Clone)]
pub struct PosDetailsCache {
    entries: BTreeMap<usize, PosDetails>,

    /// Statistics
    hits: u64,
    misses: u64,
    scanned: u64,
}

impl Default for PosDetailsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PosDetailsCache {
    /// Create a cache seeded with the start of input
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(0, PosDetails::START);
        Self {
            entries,
            hits: 0,
            misses: 0,
            scanned: 0,
        }
    }

    /// Drop every entry except the seed and zero the statistics
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.insert(0, PosDetails::START);
        self.hits = 0;
        self.misses = 0;
        self.scanned = 0;
    }

    /// Resolve `pos` against `input`
    ///
    /// Walks one character at a time from the nearest lower cached offset.
    /// The walk stops at the end of input, so offsets past the end resolve
    /// to the end-of-input details. An offset inside a multi-byte character
    /// resolves to the start of that character.
    pub fn compute(&mut self, input: &str, pos: usize) -> PosDetails {
        let pos = char_floor(input, pos);
        if let Some(details) = self.entries.get(&pos) {
            self.hits += 1;
            return *details;
        }
        self.misses += 1;

        let (mut p, mut details) = match self.entries.range(..pos).next_back() {
            Some((&p, &details)) => (p, details),
            None => (0, PosDetails::START),
        };

        let bytes = input.as_bytes();
        while p < pos && p < bytes.len() {
            let width = chars::char_len_at(bytes, p);
            details.step(chars::char_at(input, p));
            p += width;
            self.scanned += 1;
        }

        self.entries.insert(pos, details);
        details
    }

    /// Number of cached offsets (including the seed)
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the seed entry is never removed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered directly from the table
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that needed a walk
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Total characters stepped over by all walks
    #[inline]
    pub fn scanned_chars(&self) -> u64 {
        self.scanned
    }
}

/// Nearest character boundary at or below `pos`; offsets past the end are
/// left alone
fn char_floor(input: &str, mut pos: usize) -> usize {
    if pos >= input.len() {
        return pos;
    }
    while !input.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let range = LocationRange::new(0, 1, 1, 10, 2, 5);
        assert_eq!(range.to_string(), "1:1-2:5");
        assert_eq!(range.start.to_string(), "1:1");
    }

    #[test]
    fn test_seeded_start() {
        let mut cache = PosDetailsCache::new();
        assert_eq!(cache.compute("abc", 0), PosDetails::START);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_columns_count_characters() {
        let mut cache = PosDetailsCache::new();
        let input = "hello 世界!";
        // "世" is three bytes wide
        let details = cache.compute(input, 9);
        assert_eq!((details.line, details.column), (1, 8));
        let details = cache.compute(input, 12);
        assert_eq!((details.line, details.column), (1, 9));
    }

    #[test]
    fn test_newline_conventions() {
        let mut cache = PosDetailsCache::new();
        let input = "a\nb\r\nc\rd\u{2028}e\u{2029}f";
        let offsets: Vec<usize> = input.char_indices().map(|(i, _)| i).collect();
        let lines: Vec<usize> = offsets
            .iter()
            .map(|&o| cache.compute(input, o).line)
            .collect();
        // a \n b \r \n c \r d LS e PS f
        assert_eq!(lines, vec![1, 1, 2, 2, 3, 3, 3, 4, 4, 5, 5, 6]);
    }

    #[test]
    fn test_crlf_counts_once() {
        let mut cache = PosDetailsCache::new();
        let details = cache.compute("x\r\ny", 3);
        assert_eq!((details.line, details.column, details.seen_cr), (2, 1, false));
        let details = cache.compute("x\r\ny", 2);
        assert_eq!((details.line, details.column, details.seen_cr), (2, 1, true));
    }

    #[test]
    fn test_repeat_lookup_does_not_rescan() {
        let mut cache = PosDetailsCache::new();
        let input = "one\ntwo\nthree";
        let first = cache.compute(input, 10);
        let scanned = cache.scanned_chars();
        let second = cache.compute(input, 10);
        assert_eq!(first, second);
        assert_eq!(cache.scanned_chars(), scanned);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_walks_from_nearest_lower_entry() {
        let mut cache = PosDetailsCache::new();
        let input = "abcdefghij";
        cache.compute(input, 6);
        assert_eq!(cache.scanned_chars(), 6);
        cache.compute(input, 8);
        assert_eq!(cache.scanned_chars(), 8);
        // 3 lies below 6, so the walk starts from the seed again
        cache.compute(input, 3);
        assert_eq!(cache.scanned_chars(), 11);
    }

    #[test]
    fn test_mid_char_lookup_keeps_cache_consistent() {
        let input = "中a";
        let mut warm = PosDetailsCache::new();
        let inside = warm.compute(input, 1);
        assert_eq!((inside.line, inside.column), (1, 1));
        let after = warm.compute(input, 3);

        let mut cold = PosDetailsCache::new();
        assert_eq!(after, cold.compute(input, 3));
        assert_eq!((after.line, after.column), (1, 2));
    }

    #[test]
    fn test_past_end_clamps() {
        let mut cache = PosDetailsCache::new();
        let details = cache.compute("ab", 10);
        assert_eq!((details.line, details.column), (1, 3));
    }

    #[test]
    fn test_reset_keeps_seed() {
        let mut cache = PosDetailsCache::new();
        cache.compute("abc", 2);
        cache.reset();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 0);
    }
}
