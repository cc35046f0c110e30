//! Collection reports

/// Per-category option occurrence counts
pub mod rarity;
