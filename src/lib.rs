//! Wordweft: Match-and-Splice Word Replacement Engine
//!
//! A Rust/WASM engine that scans document text for dictionary words and
//! splices each occurrence into a translation link, reversibly.
//!
//! # Architecture
//!
//! ## Document Components
//! - `dom/arena.rs` - Arena-allocated node tree with sibling splicing
//! - `dom/serial.rs` - Tree (de)serialization and HTML rendering
//!
//! ## Engine Components
//! - `engine/dictionary.rs` - Word pair validation and case-insensitive lookup
//! - `engine/matcher.rs` - WordMatcher: whole-word matching via regex with an
//!   Aho-Corasick prefilter, overlap resolution, text segmentation
//! - `engine/anchor.rs` - Replacement anchor construction and lookup URLs
//! - `engine/splicer.rs` - Segment splicing and the reversal log
//! - `engine/walker.rs` - Two-phase document scan with iteration cap
//! - `engine/rewriter.rs` - PageRewriter: stateful facade exposed to JS
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { PageRewriter } from 'wordweft';
//!
//! await init();
//!
//! const rewriter = new PageRewriter();
//!
//! // Hydrate the dictionary and target language
//! rewriter.hydrateWordPairs([
//!   { original: 'robot', replacement: '机器人' },
//!   { original: 'work', replacement: '工作' }
//! ]);
//! rewriter.setLanguage({ code: 'zh', name: 'Chinese' });
//!
//! // Load the page body as a tree, then scan
//! rewriter.loadDocument({ tag: 'body', children: ['The robot is at work'] });
//! const outcome = rewriter.scan();
//!
//! // Result contains: scanned_count, match_count, truncated, scan_time_us
//! console.log(outcome.match_count);
//!
//! // Undo everything, e.g. on language switch
//! rewriter.revertAll();
//! ```

pub mod dom;
pub mod engine;

// Public exports - Document
pub use dom::*;

// Public exports - Engine
pub use engine::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("wordweft v{}", env!("CARGO_PKG_VERSION"))
}
