//! PageRewriter: stateful engine facade
//!
//! The single entry point JS instantiates per page. Owns the document, the
//! compiled matcher, the active language, and the reversal log. Hydration of
//! word pairs or language while replacements are live drains the log first,
//! so one consistent set of replacements exists per dictionary epoch and no
//! stale record ever crosses into the next scan.
//!
//! # Usage (JavaScript)
//! ```javascript,ignore
//! import init, { PageRewriter } from 'wordweft';
//!
//! await init();
//! const rewriter = new PageRewriter();
//! rewriter.hydrateWordPairs([{ original: 'robot', replacement: '机器人' }]);
//! rewriter.setLanguage({ code: 'zh', name: 'Chinese' });
//! rewriter.loadDocument(bodyTree);
//! const outcome = rewriter.scan();
//! // ... later, on language switch:
//! rewriter.revertAll();
//! ```

use wasm_bindgen::prelude::*;

use crate::dom::{Document, NodeDefinition};

use super::anchor::LanguageInfo;
use super::dictionary::{WordDictionary, WordPair};
use super::matcher::WordMatcher;
use super::splicer::{ReversalLog, RevertOutcome};
use super::walker::{scan, ScanOutcome, DEFAULT_MAX_ITERATIONS};

// ==================== MAIN IMPLEMENTATION ====================

/// Match-and-splice engine for one loaded document.
#[wasm_bindgen]
pub struct PageRewriter {
    document: Option<Document>,
    dictionary: WordDictionary,
    matcher: Option<WordMatcher>,
    language: LanguageInfo,
    log: ReversalLog,
    last_scan: Option<ScanOutcome>,
}

impl Default for PageRewriter {
    fn default() -> Self {
        Self {
            document: None,
            dictionary: WordDictionary::new(),
            matcher: None,
            language: LanguageInfo::default(),
            log: ReversalLog::new(),
            last_scan: None,
        }
    }
}

impl PageRewriter {
    /// Swap in a new dictionary. Live replacements from the previous epoch
    /// are reverted first.
    pub fn set_word_pairs(&mut self, pairs: &[WordPair]) -> Result<(), String> {
        self.drain_replacements();
        self.dictionary = WordDictionary::from_pairs(pairs)?;
        self.matcher = Some(WordMatcher::new(&self.dictionary)?);
        Ok(())
    }

    /// Change the active language, reverting the previous epoch first.
    pub fn set_language(&mut self, language: LanguageInfo) {
        self.drain_replacements();
        self.language = language;
    }

    /// Load a document tree, discarding any previous one along with its log.
    pub fn load_document(&mut self, definition: &NodeDefinition) -> Result<(), String> {
        // Record ids would point into the old arena
        self.log = ReversalLog::new();
        self.last_scan = None;
        self.document = Some(Document::from_definition(definition)?);
        Ok(())
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn language(&self) -> &LanguageInfo {
        &self.language
    }

    /// Count of live replacement elements.
    pub fn replacement_count(&self) -> usize {
        self.log.len()
    }

    /// Scan the loaded document and splice every match.
    pub fn scan_document(&mut self, max_iterations: usize) -> Result<ScanOutcome, String> {
        let Self { document, matcher, language, log, .. } = self;
        let doc = document.as_mut().ok_or_else(|| "no document loaded".to_string())?;
        let matcher = matcher.as_ref().ok_or_else(|| "no word pairs hydrated".to_string())?;

        let root = doc.root();
        let outcome = scan(doc, root, matcher, language, max_iterations, log);
        self.last_scan = Some(outcome.clone());
        Ok(outcome)
    }

    /// Undo every live replacement.
    pub fn revert_all(&mut self) -> Result<RevertOutcome, String> {
        let doc = self.document.as_mut().ok_or_else(|| "no document loaded".to_string())?;
        Ok(self.log.revert_all(doc))
    }

    fn drain_replacements(&mut self) -> RevertOutcome {
        match self.document.as_mut() {
            Some(doc) => self.log.revert_all(doc),
            None => RevertOutcome::default(),
        }
    }

    /// Snapshot of engine state.
    pub fn status(&self) -> serde_json::Value {
        serde_json::json!({
            "document_loaded": self.document.is_some(),
            "word_pair_count": self.dictionary.len(),
            "matcher_ready": self.matcher.is_some(),
            "language": self.language.code,
            "active_replacements": self.log.len(),
            "last_scan": self.last_scan,
        })
    }
}

// ==================== WASM BINDINGS ====================

#[wasm_bindgen]
impl PageRewriter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate word pairs: an array of `{ original, replacement }`.
    #[wasm_bindgen(js_name = hydrateWordPairs)]
    pub fn js_hydrate_word_pairs(&mut self, pairs: JsValue) -> Result<(), JsValue> {
        let pairs: Vec<WordPair> = serde_wasm_bindgen::from_value(pairs)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse word pairs: {}", e)))?;
        self.set_word_pairs(&pairs).map_err(|e| JsValue::from_str(&e))
    }

    /// Set the active language: `{ code, name }`.
    #[wasm_bindgen(js_name = setLanguage)]
    pub fn js_set_language(&mut self, language: JsValue) -> Result<(), JsValue> {
        let language: LanguageInfo = serde_wasm_bindgen::from_value(language)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse language: {}", e)))?;
        self.set_language(language);
        Ok(())
    }

    /// Load a document tree: a string is a text node, an object is
    /// `{ tag, attrs?, children? }`.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn js_load_document(&mut self, definition: JsValue) -> Result<(), JsValue> {
        let definition: NodeDefinition = serde_wasm_bindgen::from_value(definition)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse document: {}", e)))?;
        self.load_document(&definition).map_err(|e| JsValue::from_str(&e))
    }

    /// Scan and splice. Returns `{ scanned_count, match_count, truncated,
    /// scan_time_us }`.
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&mut self, max_iterations: Option<usize>) -> Result<JsValue, JsValue> {
        let outcome = self
            .scan_document(max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS))
            .map_err(|e| JsValue::from_str(&e))?;
        if outcome.truncated {
            web_sys::console::info_1(
                &"[PageRewriter] Page too large to scan fully, stopping early.".into(),
            );
        }
        serde_wasm_bindgen::to_value(&outcome)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Revert every live replacement. Returns `{ reverted_count }`.
    #[wasm_bindgen(js_name = revertAll)]
    pub fn js_revert_all(&mut self) -> Result<JsValue, JsValue> {
        let outcome = self.revert_all().map_err(|e| JsValue::from_str(&e))?;
        serde_wasm_bindgen::to_value(&outcome)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = activeReplacementCount)]
    pub fn js_active_replacement_count(&self) -> usize {
        self.log.len()
    }

    /// Current document as an HTML-style string.
    #[wasm_bindgen(js_name = renderHtml)]
    pub fn js_render_html(&self) -> Result<String, JsValue> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| JsValue::from_str("no document loaded"))?;
        Ok(doc.render_html(doc.root()))
    }

    /// Concatenated text of the current document.
    #[wasm_bindgen(js_name = textContent)]
    pub fn js_text_content(&self) -> Result<String, JsValue> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| JsValue::from_str("no document loaded"))?;
        Ok(doc.text_content(doc.root()))
    }

    /// Current document as a definition tree.
    #[wasm_bindgen(js_name = documentTree)]
    pub fn js_document_tree(&self) -> Result<JsValue, JsValue> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| JsValue::from_str("no document loaded"))?;
        serde_wasm_bindgen::to_value(&doc.to_definition(doc.root()))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Engine status snapshot, as a plain JS object.
    #[wasm_bindgen(js_name = getStatus)]
    pub fn js_get_status(&self) -> Result<JsValue, JsValue> {
        js_sys::JSON::parse(&self.status().to_string())
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(list: &[(&str, &str)]) -> Vec<WordPair> {
        list.iter()
            .map(|(original, replacement)| WordPair {
                original: original.to_string(),
                replacement: replacement.to_string(),
            })
            .collect()
    }

    fn load(rewriter: &mut PageRewriter, value: serde_json::Value) {
        let definition: NodeDefinition = serde_json::from_value(value).unwrap();
        rewriter.load_document(&definition).unwrap();
    }

    fn text(rewriter: &PageRewriter) -> String {
        let doc = rewriter.document().unwrap();
        doc.text_content(doc.root())
    }

    #[test]
    fn test_scan_requires_document_and_pairs() {
        let mut rewriter = PageRewriter::default();
        assert!(rewriter.scan_document(DEFAULT_MAX_ITERATIONS).is_err());

        load(&mut rewriter, json!({ "tag": "body", "children": [] }));
        assert!(rewriter.scan_document(DEFAULT_MAX_ITERATIONS).is_err());

        rewriter.set_word_pairs(&pairs(&[("robot", "机器人")])).unwrap();
        assert!(rewriter.scan_document(DEFAULT_MAX_ITERATIONS).is_ok());
    }

    #[test]
    fn test_full_round_trip() {
        let mut rewriter = PageRewriter::default();
        rewriter.set_word_pairs(&pairs(&[("robot", "机器人")])).unwrap();
        rewriter.set_language(LanguageInfo { code: "zh".into(), name: "Chinese".into() });
        load(&mut rewriter, json!({
            "tag": "body",
            "children": [{ "tag": "p", "children": ["The robot is working"] }]
        }));
        let before = text(&rewriter);

        let outcome = rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(outcome.match_count, 1);
        assert_eq!(rewriter.replacement_count(), 1);
        assert_eq!(text(&rewriter), "The 机器人 is working");

        let revert = rewriter.revert_all().unwrap();
        assert_eq!(revert.reverted_count, 1);
        assert_eq!(rewriter.replacement_count(), 0);
        assert_eq!(text(&rewriter), before);
    }

    #[test]
    fn test_hydrating_pairs_drains_previous_epoch() {
        let mut rewriter = PageRewriter::default();
        rewriter.set_word_pairs(&pairs(&[("robot", "机器人")])).unwrap();
        load(&mut rewriter, json!({
            "tag": "body",
            "children": [{ "tag": "p", "children": ["robot at work"] }]
        }));
        rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(rewriter.replacement_count(), 1);

        // New dictionary: old replacements must not survive into the new epoch
        rewriter.set_word_pairs(&pairs(&[("work", "工作")])).unwrap();
        assert_eq!(rewriter.replacement_count(), 0);
        assert_eq!(text(&rewriter), "robot at work");

        rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(text(&rewriter), "robot at 工作");
    }

    #[test]
    fn test_language_switch_drains_and_changes_urls() {
        let mut rewriter = PageRewriter::default();
        rewriter.set_word_pairs(&pairs(&[("robot", "机器人")])).unwrap();
        rewriter.set_language(LanguageInfo { code: "zh".into(), name: "Chinese".into() });
        load(&mut rewriter, json!({
            "tag": "body",
            "children": [{ "tag": "p", "children": ["a robot"] }]
        }));
        rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();

        rewriter.set_language(LanguageInfo { code: "fr".into(), name: "French".into() });
        assert_eq!(rewriter.replacement_count(), 0);

        rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();
        let doc = rewriter.document().unwrap();
        let anchor = doc
            .descendants(doc.root())
            .find(|&id| doc.tag(id) == Some("a"))
            .unwrap();
        assert!(doc.attribute(anchor, "href").unwrap().contains("translate.google.com"));
    }

    #[test]
    fn test_load_document_resets_log() {
        let mut rewriter = PageRewriter::default();
        rewriter.set_word_pairs(&pairs(&[("robot", "机器人")])).unwrap();
        load(&mut rewriter, json!({
            "tag": "body",
            "children": [{ "tag": "p", "children": ["a robot"] }]
        }));
        rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(rewriter.replacement_count(), 1);

        load(&mut rewriter, json!({ "tag": "body", "children": [] }));
        assert_eq!(rewriter.replacement_count(), 0);
    }

    #[test]
    fn test_status_tracks_engine_state() {
        let mut rewriter = PageRewriter::default();
        let status = rewriter.status();
        assert_eq!(status["document_loaded"], json!(false));
        assert_eq!(status["word_pair_count"], json!(0));
        assert_eq!(status["matcher_ready"], json!(false));
        assert_eq!(status["last_scan"], json!(null));

        rewriter.set_word_pairs(&pairs(&[("robot", "机器人")])).unwrap();
        load(&mut rewriter, json!({
            "tag": "body",
            "children": [{ "tag": "p", "children": ["a robot"] }]
        }));
        rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();

        let status = rewriter.status();
        assert_eq!(status["document_loaded"], json!(true));
        assert_eq!(status["word_pair_count"], json!(1));
        assert_eq!(status["matcher_ready"], json!(true));
        assert_eq!(status["active_replacements"], json!(1));
        assert_eq!(status["last_scan"]["match_count"], json!(1));
    }

    #[test]
    fn test_rescan_after_revert_finds_same_matches() {
        let mut rewriter = PageRewriter::default();
        rewriter.set_word_pairs(&pairs(&[("robot", "机器人")])).unwrap();
        load(&mut rewriter, json!({
            "tag": "body",
            "children": [{ "tag": "p", "children": ["robot one, robot two"] }]
        }));

        let first = rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();
        rewriter.revert_all().unwrap();
        let second = rewriter.scan_document(DEFAULT_MAX_ITERATIONS).unwrap();

        assert_eq!(first.match_count, second.match_count);
        assert_eq!(text(&rewriter), "机器人 one, 机器人 two");
    }
}
