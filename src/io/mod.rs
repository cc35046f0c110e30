//! Input/output, configuration and error handling

/// Layer asset naming and discovery
pub mod assets;
/// Command-line interface and run orchestration
pub mod cli;
/// Constants and runtime configuration defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Progress display for generation and rendering
pub mod progress;
