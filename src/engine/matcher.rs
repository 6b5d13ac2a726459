//! Word matcher: boundary-safe multi-pattern search over one text node
//!
//! One case-insensitive `\b…\b` regex per dictionary key, compiled once per
//! dictionary build, plus an Aho-Corasick prefilter that rules out whole
//! nodes in O(n) before any regex runs. Overlapping candidates are resolved
//! deterministically: earliest start wins, longest match wins at ties.
//!
//! The matcher is pure with respect to the document - it reads text, never
//! mutates the tree.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};

use super::dictionary::WordDictionary;

// ==================== TYPE DEFINITIONS ====================

/// One located, resolved occurrence of a dictionary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordMatch {
    /// Dictionary key the occurrence matched
    pub key: String,
    /// Text as found in the source, original casing preserved
    pub matched_text: String,
    pub replacement: String,
    /// Byte offsets into the node text
    pub start: usize,
    pub end: usize,
}

/// A run of untouched text or a resolved match.
#[derive(Debug, Clone)]
pub enum Segment {
    Text(String),
    Match(WordMatch),
}

impl Segment {
    /// The literal source text this segment stands for.
    pub fn source_text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Match(word_match) => &word_match.matched_text,
        }
    }
}

/// All matches found in one text node: an ordered segment sequence whose
/// concatenated source text reconstructs the node text exactly.
#[derive(Debug, Clone)]
pub struct NodeMatch {
    pub node: NodeId,
    pub segments: Vec<Segment>,
}

struct CompiledPattern {
    key: String,
    replacement: String,
    pattern: Regex,
}

// ==================== MAIN IMPLEMENTATION ====================

/// Compiled form of a dictionary, ready to scan text nodes.
pub struct WordMatcher {
    patterns: Vec<CompiledPattern>,
    prefilter: Option<AhoCorasick>,
}

impl WordMatcher {
    /// Compile every dictionary key. Fails on a key the regex engine rejects.
    pub fn new(dictionary: &WordDictionary) -> Result<Self, String> {
        let mut patterns = Vec::with_capacity(dictionary.len());
        for (key, replacement) in dictionary.iter() {
            let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(key)))
                .case_insensitive(true)
                .build()
                .map_err(|e| format!("invalid pattern for key \"{}\": {}", key, e))?;
            patterns.push(CompiledPattern {
                key: key.to_string(),
                replacement: replacement.to_string(),
                pattern,
            });
        }

        // ascii_case_insensitive cannot see non-ASCII case folds, so the
        // prefilter only exists when every key is plain ASCII
        let prefilter = if !patterns.is_empty() && dictionary.iter().all(|(k, _)| k.is_ascii()) {
            let automaton = AhoCorasickBuilder::new()
                .match_kind(MatchKind::LeftmostLongest)
                .ascii_case_insensitive(true)
                .build(dictionary.iter().map(|(k, _)| k))
                .map_err(|e| format!("prefilter build error: {}", e))?;
            Some(automaton)
        } else {
            None
        };

        Ok(Self { patterns, prefilter })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Quick check whether `text` can contain any key at all.
    pub fn may_contain(&self, text: &str) -> bool {
        match &self.prefilter {
            Some(automaton) => automaton.find(text).is_some(),
            None => true,
        }
    }

    /// Find all non-overlapping matches in a text node.
    ///
    /// Returns `None` for element nodes, empty/whitespace-only text, and
    /// text with no matches - a skip signal, not an error.
    pub fn find_matches(&self, doc: &Document, node: NodeId) -> Option<NodeMatch> {
        let text = doc.text(node)?;
        if text.trim().is_empty() || self.patterns.is_empty() || !self.may_contain(text) {
            return None;
        }

        let mut raw: Vec<WordMatch> = Vec::new();
        for compiled in &self.patterns {
            for found in compiled.pattern.find_iter(text) {
                raw.push(WordMatch {
                    key: compiled.key.clone(),
                    matched_text: found.as_str().to_string(),
                    replacement: compiled.replacement.clone(),
                    start: found.start(),
                    end: found.end(),
                });
            }
        }
        if raw.is_empty() {
            return None;
        }

        // Start ascending; longer match first when two start together
        raw.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
        });

        let mut segments: Vec<Segment> = Vec::new();
        let mut cursor = 0usize;
        for word_match in raw {
            if word_match.start < cursor {
                // Overlaps a previously accepted, higher-priority match
                continue;
            }
            if word_match.start > cursor {
                segments.push(Segment::Text(text[cursor..word_match.start].to_string()));
            }
            cursor = word_match.end;
            segments.push(Segment::Match(word_match));
        }
        if cursor < text.len() {
            segments.push(Segment::Text(text[cursor..].to_string()));
        }

        Some(NodeMatch { node, segments })
    }
}

// ==================== TESTS ====================
