//! Generator constants and runtime configuration defaults

/// Trait category every table must define; always the base layer
pub const BACKGROUND_CATEGORY: &str = "background";

/// Weight total each category is documented to add up to
pub const EXPECTED_WEIGHT_TOTAL: u64 = 100;

/// Rejected random draws per character before sampling from the unused combinations
pub const MAX_DRAW_ATTEMPTS: usize = 1_000;

// Default locations, relative to the working directory
/// Default trait table file
pub const DEFAULT_TRAITS_FILE: &str = "traits.toml";
/// Default directory holding one sub-folder of layer images per category
pub const DEFAULT_ASSETS_DIR: &str = "assets";
/// Default directory receiving one sub-folder per project
pub const DEFAULT_OUTPUT_DIR: &str = "tokens";

// File naming
/// Extension of layer assets and rendered tokens
pub const IMAGE_EXTENSION: &str = "png";
/// Name of the rarity report written next to the tokens
pub const REPORT_FILE_NAME: &str = "rarity.json";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
