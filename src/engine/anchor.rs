//! Replacement element factory
//!
//! Builds the clickable anchor that stands in for a matched word: visible
//! text is the replacement value, the href points at a dictionary site for
//! the active language (generic translation URL when none is registered),
//! and audit attributes record provenance for inspection.

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};

use super::matcher::WordMatch;

// ==================== TYPE DEFINITIONS ====================

/// The active target language, hydrated from JS config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// ISO 639-1 code, e.g. "zh", "es"
    pub code: String,
    pub name: String,
}

impl Default for LanguageInfo {
    fn default() -> Self {
        Self { code: "en".to_string(), name: "English".to_string() }
    }
}

/// Marker attribute identifying generated replacement elements.
pub const REPLACEMENT_MARKER_ATTR: &str = "data-word-replacement";
/// Audit attribute holding the matched source text.
pub const ORIGINAL_TEXT_ATTR: &str = "data-original-text";

/// Dictionary lookup sites keyed by language code. Languages without an
/// entry fall back to the generic translation URL.
const LANGUAGE_LOOKUP_SITES: &[(&str, &str)] = &[
    ("zh", "https://www.dong-chinese.com/dictionary/search/"),
    ("es", "https://dictionary.reverso.net/spanish-english/"),
];

// ==================== MAIN IMPLEMENTATION ====================

/// Destination URL for a replacement word in the given language.
pub fn lookup_url(language: &LanguageInfo, replacement: &str) -> String {
    for (code, base) in LANGUAGE_LOOKUP_SITES {
        if *code == language.code {
            return format!("{}{}", base, replacement);
        }
    }
    format!(
        "https://translate.google.com/?sl={}&tl=en&text={}&op=translate",
        language.code, replacement
    )
}

/// Build the detached anchor element for one match. Construction only - the
/// caller decides where (and whether) it enters the tree.
pub fn create_replacement_element(
    doc: &mut Document,
    word_match: &WordMatch,
    language: &LanguageInfo,
) -> NodeId {
    let element = doc.create_element("a");
    doc.set_attribute(element, "href", &lookup_url(language, &word_match.replacement));
    doc.set_attribute(element, REPLACEMENT_MARKER_ATTR, "true");
    doc.set_attribute(element, ORIGINAL_TEXT_ATTR, &word_match.matched_text);

    let label = doc.create_text(&word_match.replacement);
    doc.append_child(element, label);
    element
}

// ==================== TESTS ====================
