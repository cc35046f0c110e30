//! Trait table loading and validation

use crate::io::assets::asset_file_name;
use crate::io::configuration::{BACKGROUND_CATEGORY, EXPECTED_WEIGHT_TOTAL};
use crate::io::error::{Result, TokenatorError, file_system, invalid_table};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One axis of visual variation with its options and relative weights
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TraitCategory {
    /// Category name, also the asset sub-folder name
    pub name: String,
    /// Option names, each backed by one layer image
    pub options: Vec<String>,
    /// Relative weights parallel to `options`
    pub weights: Vec<u32>,
}

impl TraitCategory {
    /// Create a category from its parts
    pub fn new(name: &str, options: &[&str], weights: &[u32]) -> Self {
        Self {
            name: name.to_string(),
            options: options.iter().map(ToString::to_string).collect(),
            weights: weights.to_vec(),
        }
    }

    /// Sum of all option weights
    pub fn weight_total(&self) -> u64 {
        self.weights.iter().map(|&w| u64::from(w)).sum()
    }

    /// Whether an option can ever be drawn and pass validation
    pub fn is_drawable(&self, index: usize) -> bool {
        let named = self.options.get(index).is_some_and(|o| !o.trim().is_empty());
        let weighted = self.weights.get(index).is_some_and(|&w| w > 0);
        named && weighted
    }

    /// Number of options that can ever be drawn
    pub fn drawable_count(&self) -> usize {
        (0..self.options.len())
            .filter(|&i| self.is_drawable(i))
            .count()
    }
}

// Options resolve to assets with whitespace stripped, so "Red Hat" and "RedHat"
// would share one layer image. Blank options are never drawn and may repeat.
fn check_distinct_options(category: &TraitCategory) -> Result<()> {
    let mut files: HashMap<String, &str> = HashMap::new();
    for option in category.options.iter().filter(|o| !o.trim().is_empty()) {
        if let Some(previous) = files.insert(asset_file_name(option), option) {
            let reason = if previous == option.as_str() {
                format!("category '{}' lists option '{option}' more than once", category.name)
            } else {
                format!(
                    "options '{previous}' and '{option}' of category '{}' share the asset file '{}'",
                    category.name,
                    asset_file_name(option)
                )
            };
            return Err(invalid_table(&reason));
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct TraitFile {
    traits: Vec<TraitCategory>,
}

/// Ordered trait categories, built once at load time
///
/// Configured order is preserved. The background category is always
/// composited first regardless of where it appears in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitTable {
    categories: Vec<TraitCategory>,
}

impl TraitTable {
    /// Build a table from categories, validating structure
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are no categories or no background category
    /// - A category name is empty or repeated
    /// - A category has no options, or options and weights differ in length
    /// - Every weight of a category is zero
    /// - Two options of a category share a name or an asset file
    pub fn new(categories: Vec<TraitCategory>) -> Result<Self> {
        if categories.is_empty() {
            return Err(invalid_table(&"no trait categories defined"));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if category.name.trim().is_empty() {
                return Err(invalid_table(&"category name must not be empty"));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(invalid_table(&format!(
                    "category '{}' is defined more than once",
                    category.name
                )));
            }
            if category.options.is_empty() {
                return Err(invalid_table(&format!(
                    "category '{}' has no options",
                    category.name
                )));
            }
            if category.options.len() != category.weights.len() {
                return Err(invalid_table(&format!(
                    "category '{}' has {} options but {} weights",
                    category.name,
                    category.options.len(),
                    category.weights.len()
                )));
            }
            if category.weight_total() == 0 {
                return Err(invalid_table(&format!(
                    "category '{}' has only zero weights",
                    category.name
                )));
            }
            check_distinct_options(category)?;
        }

        if !seen.contains(BACKGROUND_CATEGORY) {
            return Err(invalid_table(&format!(
                "a '{BACKGROUND_CATEGORY}' category is required"
            )));
        }

        Ok(Self { categories })
    }

    /// Parse a table from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or the table is invalid
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let file: TraitFile =
            toml::from_str(content).map_err(|source| TokenatorError::TraitConfig {
                path: origin.to_path_buf(),
                source,
            })?;
        Self::new(file.traits)
    }

    /// Load a table from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the table is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(file_system(path, "read traits"))?;
        Self::from_toml_str(&content, path)
    }

    /// Categories in configured order
    pub fn categories(&self) -> &[TraitCategory] {
        &self.categories
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&TraitCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Category names in compositing order, background first
    pub fn layer_order(&self) -> Vec<&str> {
        let mut order = vec![BACKGROUND_CATEGORY];
        order.extend(
            self.categories
                .iter()
                .map(|c| c.name.as_str())
                .filter(|&name| name != BACKGROUND_CATEGORY),
        );
        order
    }

    /// Number of distinct characters the table can produce
    ///
    /// Options with an empty name or zero weight are never drawn and do not count.
    /// Saturates at `usize::MAX`.
    pub fn combination_count(&self) -> usize {
        self.categories
            .iter()
            .fold(1_usize, |acc, c| acc.saturating_mul(c.drawable_count()))
    }

    /// Categories whose weights don't add up to the documented total
    ///
    /// Weights are relative, so this is informational only.
    pub fn unbalanced_categories(&self) -> Vec<(&str, u64)> {
        self.categories
            .iter()
            .filter(|c| c.weight_total() != EXPECTED_WEIGHT_TOTAL)
            .map(|c| (c.name.as_str(), c.weight_total()))
            .collect()
    }
}
