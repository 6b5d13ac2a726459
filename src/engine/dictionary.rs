//! Word pair dictionary
//!
//! The original→replacement mapping that drives a scan. Keys are unique
//! case-insensitively and iterate in insertion order, so pattern construction
//! never depends on host key-enumeration quirks. Words are trimmed on entry;
//! empty and oversized words are rejected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==================== TYPE DEFINITIONS ====================

/// Longest word accepted on either side of a pair.
pub const MAX_WORD_LEN: usize = 100;

/// One original→replacement pair, as hydrated from JS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPair {
    pub original: String,
    pub replacement: String,
}

/// Ordered association of target words to their replacements.
#[derive(Debug, Clone, Default)]
pub struct WordDictionary {
    /// (original, replacement) in insertion order
    entries: Vec<(String, String)>,
    /// lowercased original → index into `entries`
    index: HashMap<String, usize>,
}

// ==================== VALIDATION ====================

pub fn validate_word(word: &str) -> Result<(), String> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return Err("word cannot be empty or only whitespace".to_string());
    }
    if trimmed.chars().count() > MAX_WORD_LEN {
        return Err(format!("word cannot exceed {} characters", MAX_WORD_LEN));
    }
    Ok(())
}

// ==================== MAIN IMPLEMENTATION ====================

impl WordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, trim, and insert a pair. A key equal (case-insensitively) to
    /// an existing one replaces its value without changing its position.
    pub fn insert(&mut self, original: &str, replacement: &str) -> Result<(), String> {
        validate_word(original).map_err(|e| format!("original word: {}", e))?;
        validate_word(replacement).map_err(|e| format!("replacement word: {}", e))?;

        let original = original.trim().to_string();
        let replacement = replacement.trim().to_string();
        let key = original.to_lowercase();

        match self.index.get(&key) {
            Some(&existing) => self.entries[existing] = (original, replacement),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((original, replacement));
            }
        }
        Ok(())
    }

    pub fn from_pairs(pairs: &[WordPair]) -> Result<Self, String> {
        let mut dict = Self::new();
        for pair in pairs {
            dict.insert(&pair.original, &pair.replacement).map_err(|e| {
                format!("invalid pair \"{}\" -> \"{}\": {}", pair.original, pair.replacement, e)
            })?;
        }
        Ok(dict)
    }

    /// Replacement for `original`, matched case-insensitively.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.index
            .get(&original.to_lowercase())
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (original, replacement) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ==================== TESTS ====================
