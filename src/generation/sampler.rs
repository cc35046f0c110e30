use rand::{Rng, SeedableRng, rngs::StdRng};

/// Random selector for weighted option draws
///
/// Seeded construction gives reproducible collections.
pub struct WeightedSampler {
    rng: StdRng,
}

impl WeightedSampler {
    /// Create a deterministic sampler
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a sampler seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a sampler seeded when `seed` is given, from entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// Pick an index with probability proportional to its integer weight
    ///
    /// Returns `None` when every weight is zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut remaining = self.rng.random_range(0..total);
        for (i, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if remaining < weight {
                return Some(i);
            }
            remaining -= weight;
        }
        None
    }

    /// Generic weighted random selection over real weights
    ///
    /// Returns index into weights array using cumulative distribution,
    /// or `None` when the weights don't sum to a positive value.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            rand_val -= weight;
            if rand_val <= 0.0 {
                return Some(i);
            }
        }
        weights.iter().rposition(|&w| w > 0.0)
    }
}
