//! Weighted character generation from trait tables

/// Characters, collections and validation rules
pub mod character;
/// Iterative unique character generation
pub mod generator;
/// Seeded weighted random selection
pub mod sampler;
/// Trait table loading and validation
pub mod traits;
