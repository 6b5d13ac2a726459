//! Splicer and reversal log
//!
//! The splicer turns one node's match result into tree mutations: the
//! original text node comes out, its segment sequence goes in at the same
//! position among its siblings. Every inserted replacement element is
//! recorded in a `ReversalLog`, the owned, injected collection that makes a
//! whole scan epoch undoable.

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};

use super::anchor::{create_replacement_element, LanguageInfo};
use super::matcher::{NodeMatch, Segment};

// ==================== TYPE DEFINITIONS ====================

/// One live substitution: enough to put the original text back later.
#[derive(Debug, Clone)]
pub struct ReplacementRecord {
    /// The inserted anchor element
    pub element: NodeId,
    /// Matched source text, original casing
    pub original_text: String,
    /// Parent the segments were inserted under
    pub parent: NodeId,
    /// Next sibling of the original node at splice time, if any
    pub anchor: Option<NodeId>,
}

/// Record of all live replacements, in insertion order. Lives one dictionary
/// epoch: it must be drained before a scan under a changed dictionary.
#[derive(Debug, Default)]
pub struct ReversalLog {
    records: Vec<ReplacementRecord>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RevertOutcome {
    pub reverted_count: usize,
}

// ==================== SPLICER ====================

/// Replace a matched text node with its segment sequence.
///
/// No-op when the node is already detached - a prior splice in the same
/// batch may have removed an enclosing structure.
pub fn splice_into_document(
    doc: &mut Document,
    node_match: &NodeMatch,
    language: &LanguageInfo,
    log: &mut ReversalLog,
) {
    let node = node_match.node;
    let Some(parent) = doc.parent(node) else { return };

    // Capture the anchor before the node comes out
    let anchor = doc.next_sibling(node);
    doc.detach(node);

    for segment in &node_match.segments {
        let new_node = match segment {
            Segment::Text(text) => doc.create_text(text),
            Segment::Match(word_match) => {
                let element = create_replacement_element(doc, word_match, language);
                log.append(ReplacementRecord {
                    element,
                    original_text: word_match.matched_text.clone(),
                    parent,
                    anchor,
                });
                element
            }
        };
        match anchor {
            Some(anchor) => doc.insert_before(anchor, new_node),
            None => doc.append_child(parent, new_node),
        }
    }
}

// ==================== REVERSAL ====================

impl ReversalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ReplacementRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Undo every live replacement, last-spliced-first, so nested structure
    /// restores without positional drift. Elements no longer attached are
    /// skipped. The log is cleared unconditionally, so no record survives
    /// into the next epoch.
    pub fn revert_all(&mut self, doc: &mut Document) -> RevertOutcome {
        let mut reverted_count = 0;
        for record in self.records.iter().rev() {
            if doc.parent(record.element).is_none() {
                continue;
            }
            let restored = doc.create_text(&record.original_text);
            doc.insert_before(record.element, restored);
            doc.detach(record.element);
            reverted_count += 1;
        }
        self.records.clear();
        RevertOutcome { reverted_count }
    }
}

// ==================== TESTS ====================
