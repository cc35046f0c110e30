//! Characters, collections and validation

use crate::generation::traits::TraitTable;
use std::hash::{Hash, Hasher};

/// One chosen option for one trait category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraitChoice {
    /// Trait category name
    pub category: String,
    /// Chosen option name
    pub option: String,
}

/// A combination of options across all trait categories
///
/// Equality and hashing only consider the trait choices. The identifier
/// is assigned once the whole collection is known to be unique.
#[derive(Debug, Clone)]
pub struct Character {
    choices: Vec<TraitChoice>,
    id: Option<u32>,
}

impl Character {
    /// Create an unnumbered character from its choices
    pub const fn new(choices: Vec<TraitChoice>) -> Self {
        Self { choices, id: None }
    }

    /// Build a character from `(category, option)` pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(category, option)| TraitChoice {
                    category: category.to_string(),
                    option: option.to_string(),
                })
                .collect(),
        )
    }

    /// Chosen option for a category
    pub fn get(&self, category: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.option.as_str())
    }

    /// All choices in table order
    pub fn choices(&self) -> &[TraitChoice] {
        &self.choices
    }

    /// Assigned identifier, if any
    pub const fn id(&self) -> Option<u32> {
        self.id
    }

    pub(crate) const fn assign_id(&mut self, id: u32) {
        self.id = Some(id);
    }

    /// Canonical text form of the trait choices
    pub fn canonical_key(&self) -> String {
        self.choices
            .iter()
            .map(|c| format!("{}={}", c.category, c.option))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl PartialEq for Character {
    fn eq(&self, other: &Self) -> bool {
        self.choices == other.choices
    }
}

impl Eq for Character {}

impl Hash for Character {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.choices.hash(state);
    }
}

/// Decides whether a drawn character may join the collection
pub trait CharacterValidator {
    /// Return true if the character is acceptable
    fn validate(&self, character: &Character, table: &TraitTable) -> bool;
}

/// Accepts characters with a non-empty option for every category
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyTraits;

impl CharacterValidator for NonEmptyTraits {
    fn validate(&self, character: &Character, table: &TraitTable) -> bool {
        table.categories().iter().all(|category| {
            character
                .get(&category.name)
                .is_some_and(|option| !option.trim().is_empty())
        })
    }
}

impl<F> CharacterValidator for F
where
    F: Fn(&Character, &TraitTable) -> bool,
{
    fn validate(&self, character: &Character, table: &TraitTable) -> bool {
        self(character, table)
    }
}

/// Ordered, finalized set of characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    characters: Vec<Character>,
}

impl Collection {
    /// Wrap characters without checking them
    pub const fn from_characters(characters: Vec<Character>) -> Self {
        Self { characters }
    }

    /// Characters in generation order
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Number of characters
    pub const fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the collection holds no characters
    pub const fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Count characters that repeat an earlier one
    pub fn duplicate_count(&self) -> usize {
        let mut seen = std::collections::HashSet::with_capacity(self.characters.len());
        self.characters
            .iter()
            .filter(|character| !seen.insert(*character))
            .count()
    }

    /// Number characters `0..N-1` in order
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCharacters` without assigning anything if the
    /// collection is not pairwise unique
    pub fn assign_ids(&mut self) -> crate::io::error::Result<()> {
        let duplicates = self.duplicate_count();
        if duplicates > 0 {
            return Err(crate::io::error::TokenatorError::DuplicateCharacters { duplicates });
        }

        for (id, character) in (0_u32..).zip(self.characters.iter_mut()) {
            character.assign_id(id);
        }
        Ok(())
    }
}
