//! Error types and context management for generation and rendering

use std::fmt;
use std::path::PathBuf;

/// Main error type for all tokenator operations
#[derive(Debug)]
pub enum TokenatorError {
    /// Trait configuration file could not be parsed
    TraitConfig {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// Trait table doesn't meet generator requirements
    InvalidTraitTable {
        /// Description of what's wrong with the table
        reason: String,
    },

    /// Runtime parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Layer image for a character could not be loaded
    AssetLoad {
        /// Label of the character being rendered
        character: String,
        /// Trait category of the failing layer
        category: String,
        /// Path of the asset that failed
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Layer image dimensions differ from the background
    LayerSizeMismatch {
        /// Label of the character being rendered
        character: String,
        /// Trait category of the mismatched layer
        category: String,
        /// Path of the mismatched asset
        path: PathBuf,
        /// Background dimensions (width, height)
        expected: (u32, u32),
        /// Layer dimensions (width, height)
        found: (u32, u32),
    },

    /// Failed to save a rendered token to disk
    TokenExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Rarity report could not be serialized
    ReportWrite {
        /// Path of the report
        path: PathBuf,
        /// Underlying serialization error
        source: serde_json::Error,
    },

    /// Every valid trait combination is already in use
    CollectionExhausted {
        /// Number of characters generated before exhaustion
        generated: usize,
        /// Number of characters requested
        requested: usize,
    },

    /// Collection-level uniqueness verification found repeated characters
    DuplicateCharacters {
        /// Number of characters that repeat an earlier one
        duplicates: usize,
    },

    /// Interactive input ended before an answer was given
    InputClosed {
        /// The question being asked
        prompt: &'static str,
    },

    /// One or more tokens could not be rendered
    RenderFailures {
        /// Number of failed tokens
        failed: usize,
        /// Number of tokens attempted
        total: usize,
    },
}

impl fmt::Display for TokenatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TraitConfig { path, source } => {
                write!(f, "Failed to parse trait file '{}': {source}", path.display())
            }
            Self::InvalidTraitTable { reason } => {
                write!(f, "Invalid trait table: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::AssetLoad {
                character,
                category,
                path,
                source,
            } => {
                write!(
                    f,
                    "Token {character}: failed to load '{category}' layer '{}': {source}",
                    path.display()
                )
            }
            Self::LayerSizeMismatch {
                character,
                category,
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Token {character}: '{category}' layer '{}' is {}x{}, expected {}x{}",
                    path.display(),
                    found.0,
                    found.1,
                    expected.0,
                    expected.1
                )
            }
            Self::TokenExport { path, source } => {
                write!(f, "Failed to save token to '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::ReportWrite { path, source } => {
                write!(
                    f,
                    "Failed to write rarity report '{}': {source}",
                    path.display()
                )
            }
            Self::CollectionExhausted {
                generated,
                requested,
            } => {
                write!(
                    f,
                    "Ran out of unique trait combinations after {generated} of {requested} characters"
                )
            }
            Self::DuplicateCharacters { duplicates } => {
                write!(
                    f,
                    "Collection is not unique: {duplicates} duplicate character(s) found"
                )
            }
            Self::InputClosed { prompt } => {
                write!(f, "Input closed while waiting for {prompt}")
            }
            Self::RenderFailures { failed, total } => {
                write!(f, "{failed} of {total} tokens failed to render")
            }
        }
    }
}

impl std::error::Error for TokenatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TraitConfig { source, .. } => Some(source),
            Self::AssetLoad { source, .. } | Self::TokenExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::ReportWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for tokenator results
pub type Result<T> = std::result::Result<T, TokenatorError>;

impl From<std::io::Error> for TokenatorError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TokenatorError {
    TokenatorError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid trait table error
pub fn invalid_table(reason: &impl ToString) -> TokenatorError {
    TokenatorError::InvalidTraitTable {
        reason: reason.to_string(),
    }
}

/// Attach a path and operation to a raw I/O error
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> TokenatorError {
    let path = path.into();
    move |source| TokenatorError::FileSystem {
        path,
        operation,
        source,
    }
}

/// Whether the error concerns a single token and the run may continue
pub const fn is_per_token(error: &TokenatorError) -> bool {
    matches!(
        error,
        TokenatorError::AssetLoad { .. }
            | TokenatorError::LayerSizeMismatch { .. }
            | TokenatorError::TokenExport { .. }
    )
}
