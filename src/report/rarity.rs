use crate::generation::character::Collection;
use crate::generation::traits::TraitTable;
use crate::io::error::{Result, TokenatorError, file_system};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Occurrence count of every option, per category
///
/// Options that were never chosen are listed with a count of zero, so
/// each category's counts add up to the collection size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RarityReport {
    counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl RarityReport {
    /// Count of one option, if the category and option exist
    pub fn count(&self, category: &str, option: &str) -> Option<usize> {
        self.counts.get(category)?.get(option).copied()
    }

    /// Options and counts of one category
    pub fn category(&self, category: &str) -> Option<&BTreeMap<String, usize>> {
        self.counts.get(category)
    }

    /// Sum of counts for one category
    pub fn category_total(&self, category: &str) -> usize {
        self.counts
            .get(category)
            .map_or(0, |options| options.values().sum())
    }

    /// Pretty JSON representation
    ///
    /// # Errors
    ///
    /// Returns `ReportWrite` if serialization fails
    pub fn to_json(&self, path: &Path) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| TokenatorError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the report as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json(path)?;
        std::fs::write(path, json).map_err(file_system(path, "write report"))
    }
}

/// Count occurrences of each chosen option per category
pub fn compute_rarity(collection: &Collection, table: &TraitTable) -> RarityReport {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = table
        .categories()
        .iter()
        .map(|category| {
            let options = category
                .options
                .iter()
                .map(|option| (option.clone(), 0))
                .collect();
            (category.name.clone(), options)
        })
        .collect();

    for character in collection.characters() {
        for choice in character.choices() {
            *counts
                .entry(choice.category.clone())
                .or_default()
                .entry(choice.option.clone())
                .or_insert(0) += 1;
        }
    }

    RarityReport { counts }
}
