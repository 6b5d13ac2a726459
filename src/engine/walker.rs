//! Page walker: bounded two-phase scan
//!
//! One depth-first, document-order pass over the text nodes of a subtree.
//! Every match is collected before any splice runs, so tree mutation can
//! never perturb the traversal that planned it. An iteration cap bounds the
//! walk on pathological pages; hitting it is a recorded outcome, not an
//! error.

use instant::Instant;
use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};

use super::anchor::LanguageInfo;
use super::matcher::{NodeMatch, WordMatcher};
use super::splicer::{splice_into_document, ReversalLog};

// ==================== TYPE DEFINITIONS ====================

/// Default bound on text nodes visited per scan.
pub const DEFAULT_MAX_ITERATIONS: usize = 30_000;

/// Counts and timing for one scan pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Text nodes visited, matching or not
    pub scanned_count: usize,
    /// Nodes that produced at least one match (node-level, not occurrences)
    pub match_count: usize,
    /// True when the iteration cap stopped the walk early
    pub truncated: bool,
    pub scan_time_us: u64,
}

// ==================== MAIN IMPLEMENTATION ====================

/// Text inside these containers never renders; matching there would corrupt
/// code or styles.
fn has_non_rendering_parent(doc: &Document, node: NodeId) -> bool {
    match doc.parent(node).and_then(|parent| doc.tag(parent)) {
        Some(tag) => tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style"),
        None => false,
    }
}

/// Scan the subtree under `root` and splice every match.
///
/// The cap bounds the loop counter inclusively, so up to `max_iterations + 1`
/// nodes may be visited before truncation.
pub fn scan(
    doc: &mut Document,
    root: NodeId,
    matcher: &WordMatcher,
    language: &LanguageInfo,
    max_iterations: usize,
    log: &mut ReversalLog,
) -> ScanOutcome {
    let start = Instant::now();
    let mut outcome = ScanOutcome::default();

    // Phase 1: collect every match before touching the tree
    let mut planned: Vec<NodeMatch> = Vec::new();
    for node in doc.text_nodes(root) {
        if outcome.scanned_count > max_iterations {
            outcome.truncated = true;
            break;
        }
        outcome.scanned_count += 1;

        if has_non_rendering_parent(doc, node) {
            continue;
        }
        if let Some(node_match) = matcher.find_matches(doc, node) {
            planned.push(node_match);
        }
    }
    outcome.match_count = planned.len();

    // Phase 2: splice in discovery order
    for node_match in &planned {
        splice_into_document(doc, node_match, language, log);
    }

    outcome.scan_time_us = start.elapsed().as_micros() as u64;
    outcome
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeDefinition;
    use crate::engine::dictionary::WordDictionary;
    use serde_json::json;

    fn zh() -> LanguageInfo {
        LanguageInfo { code: "zh".to_string(), name: "Chinese".to_string() }
    }

    fn matcher(pairs: &[(&str, &str)]) -> WordMatcher {
        let mut dict = WordDictionary::new();
        for (original, replacement) in pairs {
            dict.insert(original, replacement).unwrap();
        }
        WordMatcher::new(&dict).unwrap()
    }

    fn doc_from(value: serde_json::Value) -> Document {
        let def: NodeDefinition = serde_json::from_value(value).unwrap();
        Document::from_definition(&def).unwrap()
    }

    fn anchors(doc: &Document) -> Vec<NodeId> {
        doc.descendants(doc.root())
            .filter(|&id| doc.tag(id) == Some("a"))
            .collect()
    }

    #[test]
    fn test_single_paragraph_scenario() {
        let mut doc = doc_from(json!({
            "tag": "body",
            "children": [{ "tag": "p", "children": ["The robot is working"] }]
        }));
        let mut log = ReversalLog::new();
        let root = doc.root();
        let outcome = scan(&mut doc, root, &matcher(&[("robot", "机器人")]), &zh(), DEFAULT_MAX_ITERATIONS, &mut log);

        assert_eq!(outcome.scanned_count, 1);
        assert_eq!(outcome.match_count, 1);
        assert!(!outcome.truncated);

        let found = anchors(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.text_content(found[0]), "机器人");
        assert_eq!(doc.text_content(doc.root()), "The 机器人 is working");
    }

    #[test]
    fn test_two_text_nodes_scenario() {
        let mut doc = doc_from(json!({
            "tag": "body",
            "children": [{
                "tag": "div",
                "children": [
                    { "tag": "p", "children": ["The robot is here"] },
                    { "tag": "span", "children": ["A worker is needed"] }
                ]
            }]
        }));
        let mut log = ReversalLog::new();
        let root = doc.root();
        let outcome = scan(
            &mut doc,
            root,
            &matcher(&[("robot", "机器人"), ("worker", "工人")]),
            &zh(),
            DEFAULT_MAX_ITERATIONS,
            &mut log,
        );

        assert_eq!(outcome.scanned_count, 2);
        assert_eq!(outcome.match_count, 2);

        let found = anchors(&doc);
        assert_eq!(found.len(), 2);
        assert_eq!(doc.text_content(found[0]), "机器人");
        assert_eq!(doc.text_content(found[1]), "工人");
    }

    #[test]
    fn test_iteration_cap_truncates() {
        let paragraphs: Vec<serde_json::Value> = (0..100)
            .map(|i| json!({ "tag": "p", "children": [format!("paragraph {} robot", i)] }))
            .collect();
        let mut doc = doc_from(json!({ "tag": "body", "children": paragraphs }));

        let mut log = ReversalLog::new();
        let root = doc.root();
        let outcome = scan(&mut doc, root, &matcher(&[("robot", "机器人")]), &zh(), 50, &mut log);

        assert!(outcome.truncated);
        assert!(outcome.scanned_count <= 51);
        assert_eq!(outcome.match_count, outcome.scanned_count);
    }

    #[test]
    fn test_empty_body() {
        let mut doc = doc_from(json!({ "tag": "body", "children": [] }));
        let mut log = ReversalLog::new();
        let root = doc.root();
        let outcome = scan(&mut doc, root, &matcher(&[("robot", "机器人")]), &zh(), DEFAULT_MAX_ITERATIONS, &mut log);

        assert_eq!(outcome.scanned_count, 0);
        assert_eq!(outcome.match_count, 0);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_script_and_style_skipped() {
        let mut doc = doc_from(json!({
            "tag": "body",
            "children": [
                { "tag": "script", "children": ["var robot = 1;"] },
                { "tag": "STYLE", "children": [".robot { color: red }"] },
                { "tag": "p", "children": ["a robot"] }
            ]
        }));
        let mut log = ReversalLog::new();
        let root = doc.root();
        let outcome = scan(&mut doc, root, &matcher(&[("robot", "机器人")]), &zh(), DEFAULT_MAX_ITERATIONS, &mut log);

        // Skipped nodes still count as visited
        assert_eq!(outcome.scanned_count, 3);
        assert_eq!(outcome.match_count, 1);
        assert_eq!(anchors(&doc).len(), 1);
        assert!(doc.text_content(doc.root()).contains("var robot = 1;"));
    }

    #[test]
    fn test_round_trip_reversibility() {
        let mut doc = doc_from(json!({
            "tag": "body",
            "children": [
                { "tag": "p", "children": ["The robot is working"] },
                { "tag": "div", "children": [
                    "A worker arrives. ",
                    { "tag": "em", "children": ["The ROBOT waits."] }
                ]}
            ]
        }));
        let before = doc.text_content(doc.root());

        let mut log = ReversalLog::new();
        let root = doc.root();
        scan(
            &mut doc,
            root,
            &matcher(&[("robot", "机器人"), ("worker", "工人")]),
            &zh(),
            DEFAULT_MAX_ITERATIONS,
            &mut log,
        );
        assert_ne!(doc.text_content(doc.root()), before);

        log.revert_all(&mut doc);
        assert_eq!(doc.text_content(doc.root()), before);
    }

    #[test]
    fn test_matches_planned_before_any_splice() {
        // Adjacent text nodes both match; the second must still splice even
        // though the first splice rewrote the sibling chain around it.
        let mut doc = doc_from(json!({
            "tag": "body",
            "children": [{ "tag": "p", "children": ["one robot ", "two robots? one robot"] }]
        }));
        let mut log = ReversalLog::new();
        let root = doc.root();
        let outcome = scan(&mut doc, root, &matcher(&[("robot", "机器人")]), &zh(), DEFAULT_MAX_ITERATIONS, &mut log);

        assert_eq!(outcome.match_count, 2);
        assert_eq!(anchors(&doc).len(), 2);
        assert_eq!(doc.text_content(doc.root()), "one 机器人 two robots? one 机器人");
    }
}
