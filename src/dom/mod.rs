//! Document tree model
//!
//! - `arena.rs` - `Document`: arena-backed element/text tree with O(1) splicing
//! - `serial.rs` - `NodeDefinition`: serde hydration + HTML-style rendering

pub mod arena;
pub mod serial;

pub use arena::*;
pub use serial::*;
