//! Packrat memoization cache
//!
//! Generated rules marked for caching look up `(rule, position, args)` before
//! running and store their outcome afterwards. Each entry remembers where the
//! rule left the cursor so a hit can restore it without re-running the rule.
//!
//! The cache lives for exactly one parse: [`ParserBase::init_internal`]
//! clears it, and nothing is ever evicted while a parse runs.
//!
//! # Keys
//!
//! Rules without semantically distinguishing arguments use `args = 0`.
//! Rules whose arguments change what they match fold them into a 64-bit
//! fingerprint with [`fingerprint`].
//!
//! [`ParserBase::init_internal`]: super::parser::ParserBase::init_internal

use ahash::RandomState;
use hashbrown::HashMap;
use std::any::Any;
use std::hash::Hash;

use super::parser::RuleResult;

/// Fixed seeds so fingerprints are stable across parses and processes
const FINGERPRINT_SEEDS: (u64, u64, u64, u64) = (
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
);

/// Hash rule arguments into a memo key component
pub fn fingerprint<T: Hash + ?Sized>(args: &T) -> u64 {
    let (k0, k1, k2, k3) = FINGERPRINT_SEEDS;
    RandomState::with_seeds(k0, k1, k2, k3).hash_one(args)
}

/// Memo table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoKey {
    /// Rule id assigned by the generator
    pub rule: u32,
    /// Byte offset the rule started at
    pub pos: usize,
    /// Argument fingerprint, 0 when the rule has none
    pub args: u64,
}

impl MemoKey {
    /// Key for a rule without distinguishing arguments
    #[inline]
    pub fn new(rule: u32, pos: usize) -> Self {
        Self { rule, pos, args: 0 }
    }

    /// Key including an argument fingerprint
    #[inline]
    pub fn with_args(rule: u32, pos: usize, args: u64) -> Self {
        Self { rule, pos, args }
    }
}

struct CacheEntry {
    /// Cursor position after the rule ran
    next_pos: usize,
    /// The `RuleResult<T>` the rule returned
    result: Box<dyn Any>,
}

/// Per-parse memo table
pub struct MemoCache {
    entries: HashMap<MemoKey, CacheEntry, RandomState>,

    /// Statistics
    hits: u64,
    misses: u64,
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("len", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

impl MemoCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(RandomState::new()),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a stored result
    ///
    /// Returns the stored cursor position and a copy of the result. A stored
    /// value of a different type than `T` counts as a miss.
    pub fn get<T: Clone + 'static>(&mut self, key: &MemoKey) -> Option<(usize, RuleResult<T>)> {
        let found = self.entries.get(key).and_then(|entry| {
            entry
                .result
                .downcast_ref::<RuleResult<T>>()
                .map(|result| (entry.next_pos, result.clone()))
        });
        match found {
            Some(hit) => {
                self.hits += 1;
                Some(hit)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a result; a later insert for the same key replaces it
    pub fn insert<T: Clone + 'static>(&mut self, key: MemoKey, next_pos: usize, result: RuleResult<T>) {
        self.entries.insert(
            key,
            CacheEntry {
                next_pos,
                result: Box::new(result),
            },
        );
    }

    /// Drop every entry and zero the statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of stored entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups that found an entry
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that did not
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Hit rate in `0.0..=1.0`
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
