//! Layered character token generator
//!
//! Draws unique combinations of weighted trait options, composites each
//! combination's layer images into one flattened token, and reports how often
//! every option occurs across the collection.

#![forbid(unsafe_code)]

/// Weighted, duplicate-free character generation
pub mod generation;
/// Input/output operations and error handling
pub mod io;
/// Layer compositing and token export
pub mod render;
/// Rarity reporting for finished collections
pub mod report;

pub use io::error::{Result, TokenatorError};
