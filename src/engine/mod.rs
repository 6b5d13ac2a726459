pub mod dictionary;
pub mod matcher;
pub mod anchor;
pub mod splicer;
pub mod walker;
pub mod rewriter;

pub use dictionary::*;
pub use matcher::*;
pub use anchor::*;
pub use splicer::*;
pub use walker::*;
pub use rewriter::*;
