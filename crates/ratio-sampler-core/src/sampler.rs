use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;

/// Draws bounded random subsets from extension groups.
///
/// Selection is uniform without replacement (a partial Fisher–Yates pass),
/// so every path in a group of `g` has a `min(n, g) / g` chance of being picked.
pub struct Sampler {
    sample_size: usize,
    rng: StdRng,
}

impl Sampler {
    /// Sampler seeded from OS entropy.
    pub fn new(sample_size: usize) -> Self {
        Self::with_rng(sample_size, StdRng::from_entropy())
    }

    pub fn seeded(sample_size: usize, seed: u64) -> Self {
        Self::with_rng(sample_size, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(sample_size: usize, rng: StdRng) -> Self {
        Self { sample_size, rng }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Number of paths `sample` returns for a group of `group_size`.
    pub fn effective_size(&self, group_size: usize) -> usize {
        self.sample_size.min(group_size)
    }

    pub fn sample(&mut self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let count = self.effective_size(paths.len());
        paths
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect()
    }
}
