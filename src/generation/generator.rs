//! Weighted character generation with guaranteed uniqueness
//!
//! Characters are drawn option by option. Each draw is checked against a set of
//! already-used option-index combinations, so rejection is O(1). After
//! `MAX_DRAW_ATTEMPTS` rejected draws the generator samples directly from the
//! unused combinations, walking the categories and discounting the mass of the
//! used keys under each prefix. This always terminates, even when the full
//! combination space is requested, and never enumerates that space.

use crate::generation::character::{Character, CharacterValidator, Collection, TraitChoice};
use crate::generation::sampler::WeightedSampler;
use crate::generation::traits::TraitTable;
use crate::io::configuration::MAX_DRAW_ATTEMPTS;
use crate::io::error::{Result, TokenatorError};
use std::collections::HashSet;

/// Option indices per category, in table order
type CombinationKey = Vec<usize>;

/// Produces unique, valid characters from a trait table
pub struct CharacterGenerator<'a, V> {
    table: &'a TraitTable,
    validator: V,
    used: HashSet<CombinationKey>,
    invalid: HashSet<CombinationKey>,
    /// Rejected draws across the whole run
    pub rejected_draws: usize,
    /// Characters produced through exhaustive fallback
    pub fallback_draws: usize,
}

impl<'a, V: CharacterValidator> CharacterGenerator<'a, V> {
    /// Create a generator with an empty membership index
    pub fn new(table: &'a TraitTable, validator: V) -> Self {
        Self {
            table,
            validator,
            used: HashSet::new(),
            invalid: HashSet::new(),
            rejected_draws: 0,
            fallback_draws: 0,
        }
    }

    /// Number of characters produced so far
    pub fn generated(&self) -> usize {
        self.used.len()
    }

    /// Draw a character that is valid and not yet in the collection
    ///
    /// # Errors
    ///
    /// Returns `CollectionExhausted` if every valid combination is already used
    pub fn generate_character(&mut self, sampler: &mut WeightedSampler) -> Result<Character> {
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let Some(key) = self.draw_key(sampler) else {
                break;
            };
            if let Some(character) = self.accept(key) {
                return Ok(character);
            }
            self.rejected_draws += 1;
        }

        self.fallback_character(sampler)
    }

    /// Generate `size` unique characters and number them
    ///
    /// `size` is clamped to the table's combination count. Identifiers are only
    /// assigned after the collection-level uniqueness check passes.
    ///
    /// # Errors
    ///
    /// Returns an error if combinations run out or the uniqueness check fails
    pub fn generate_collection(
        &mut self,
        size: usize,
        sampler: &mut WeightedSampler,
        mut on_character: impl FnMut(&Character),
    ) -> Result<Collection> {
        let size = size.min(self.table.combination_count());
        let mut characters = Vec::with_capacity(size);

        for _ in 0..size {
            let character = self.generate_character(sampler).map_err(|e| match e {
                TokenatorError::CollectionExhausted { generated, .. } => {
                    TokenatorError::CollectionExhausted {
                        generated,
                        requested: size,
                    }
                }
                other => other,
            })?;
            on_character(&character);
            characters.push(character);
        }

        let mut collection = Collection::from_characters(characters);
        collection.assign_ids()?;
        Ok(collection)
    }

    fn draw_key(&self, sampler: &mut WeightedSampler) -> Option<CombinationKey> {
        self.table
            .categories()
            .iter()
            .map(|category| sampler.weighted_index(&category.weights))
            .collect()
    }

    fn build(&self, key: &[usize]) -> Character {
        let choices = self
            .table
            .categories()
            .iter()
            .zip(key)
            .map(|(category, &index)| TraitChoice {
                category: category.name.clone(),
                option: category.options.get(index).cloned().unwrap_or_default(),
            })
            .collect();
        Character::new(choices)
    }

    // Records the key as used when the character is accepted
    fn accept(&mut self, key: CombinationKey) -> Option<Character> {
        if self.used.contains(&key) {
            return None;
        }
        let character = self.build(&key);
        if !self.validator.validate(&character, self.table) {
            self.invalid.insert(key);
            return None;
        }
        self.used.insert(key);
        Some(character)
    }

    fn fallback_character(&mut self, sampler: &mut WeightedSampler) -> Result<Character> {
        let generated = self.generated();
        let probabilities = self.drawable_probabilities();

        while let Some(key) = self.next_unused(&probabilities, sampler) {
            let character = self.build(&key);
            if self.validator.validate(&character, self.table) {
                self.used.insert(key);
                self.fallback_draws += 1;
                return Ok(character);
            }
            self.invalid.insert(key);
        }

        Err(TokenatorError::CollectionExhausted {
            generated,
            requested: generated + 1,
        })
    }

    fn next_unused(
        &self,
        probabilities: &[Vec<(usize, f64)>],
        sampler: &mut WeightedSampler,
    ) -> Option<CombinationKey> {
        let excluded: Vec<&[usize]> = self
            .used
            .iter()
            .chain(&self.invalid)
            .map(Vec::as_slice)
            .collect();
        sample_unused(probabilities, &excluded, sampler)
    }

    /// Normalized weight of every drawable option, per category
    fn drawable_probabilities(&self) -> Vec<Vec<(usize, f64)>> {
        self.table
            .categories()
            .iter()
            .map(|category| {
                let drawable: Vec<(usize, f64)> = category
                    .weights
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| category.is_drawable(i))
                    .map(|(i, &w)| (i, f64::from(w)))
                    .collect();
                let total: f64 = drawable.iter().map(|&(_, w)| w).sum();
                drawable.into_iter().map(|(i, w)| (i, w / total)).collect()
            })
            .collect()
    }
}

/// Probability mass of the combinations below a prefix that are not excluded
///
/// `excluded` holds the excluded keys sharing the prefix. A subtree with no
/// excluded key has full mass 1. The flag reports whether any combination is
/// left, which stays exact when the mass underflows.
fn unused_mass(
    probabilities: &[Vec<(usize, f64)>],
    excluded: &[&[usize]],
    depth: usize,
) -> (f64, bool) {
    if excluded.is_empty() {
        return (1.0, true);
    }
    let Some(options) = probabilities.get(depth) else {
        return (0.0, false);
    };

    options.iter().fold((0.0, false), |(mass, open), &(index, p)| {
        let below = matching(excluded, depth, index);
        let (child_mass, child_open) = unused_mass(probabilities, &below, depth + 1);
        (p.mul_add(child_mass, mass), open || child_open)
    })
}

/// Excluded keys whose option at `depth` is `index`
fn matching<'k>(excluded: &[&'k [usize]], depth: usize, index: usize) -> Vec<&'k [usize]> {
    excluded
        .iter()
        .filter(|key| key.get(depth) == Some(&index))
        .copied()
        .collect()
}

/// Sample a combination outside `excluded`, weighted by the product of its
/// option weights, one category at a time
///
/// Only the excluded keys are ever materialized, so the cost grows with the
/// collection rather than with the combination space.
fn sample_unused(
    probabilities: &[Vec<(usize, f64)>],
    excluded: &[&[usize]],
    sampler: &mut WeightedSampler,
) -> Option<CombinationKey> {
    let mut key = Vec::with_capacity(probabilities.len());
    let mut remaining: Vec<&[usize]> = excluded.to_vec();

    for (depth, options) in probabilities.iter().enumerate() {
        let children: Vec<(Vec<&[usize]>, f64, bool)> = options
            .iter()
            .map(|&(index, p)| {
                let below = matching(&remaining, depth, index);
                let (mass, open) = unused_mass(probabilities, &below, depth + 1);
                (below, p * mass, open)
            })
            .collect();

        let masses: Vec<f64> = children.iter().map(|&(_, mass, _)| mass).collect();
        let choice = sampler.weighted_choice(&masses).or_else(|| {
            // Masses underflowed; any open branch will do
            let open: Vec<f64> = children
                .iter()
                .map(|&(_, _, open)| if open { 1.0 } else { 0.0 })
                .collect();
            sampler.weighted_choice(&open)
        })?;

        let &(index, _) = options.get(choice)?;
        let (below, _, _) = children.into_iter().nth(choice)?;
        key.push(index);
        remaining = below;
    }

    remaining.is_empty().then_some(key)
}

/// Generate a collection with the default non-empty validator
///
/// # Errors
///
/// Returns an error if combinations run out or the uniqueness check fails
pub fn generate_collection(
    table: &TraitTable,
    size: usize,
    sampler: &mut WeightedSampler,
) -> Result<Collection> {
    CharacterGenerator::new(table, crate::generation::character::NonEmptyTraits)
        .generate_collection(size, sampler, |_| {})
}
