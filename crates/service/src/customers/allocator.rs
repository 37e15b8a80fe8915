//! Random customer id allocation.
//!
//! Ids are 9-digit zero-padded decimal strings drawn uniformly from
//! `[0, 10^9)`. Allocation gives up after a bounded number of draws.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, warn};

/// Number of digits in a customer id.
pub const ID_WIDTH: usize = 9;
/// Size of the id space (`10^ID_WIDTH`).
pub const ID_SPACE: u32 = 1_000_000_000;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Where an allocation sequence gets its RNG seed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SeedSource {
    /// Fresh OS entropy for every allocation sequence.
    Entropy,
    /// Same seed every time; only useful for tests.
    Fixed(u64),
}

#[derive(Clone, Debug)]
pub struct IdAllocator {
    max_attempts: usize,
    seed: SeedSource,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl IdAllocator {
    /// Entropy-seeded allocator. `max_attempts == 0` means the default bound.
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts: normalize_attempts(max_attempts), seed: SeedSource::Entropy }
    }

    /// Allocator replaying the candidate sequence of `seed` on every call.
    pub fn with_fixed_seed(max_attempts: usize, seed: u64) -> Self {
        Self { max_attempts: normalize_attempts(max_attempts), seed: SeedSource::Fixed(seed) }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            SeedSource::Entropy => StdRng::from_entropy(),
            SeedSource::Fixed(seed) => StdRng::seed_from_u64(seed),
        }
    }

    /// Draw candidates until one is not `is_taken`, or the attempt bound runs out.
    ///
    /// The RNG is seeded once per call, not per draw.
    pub fn allocate<F>(&self, is_taken: F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut rng = self.rng();
        for attempt in 1..=self.max_attempts {
            let candidate = format_id(rng.gen_range(0..ID_SPACE));
            if !is_taken(&candidate) {
                debug!(attempt, id = %candidate, "allocated customer id");
                return Some(candidate);
            }
        }
        warn!(attempts = self.max_attempts, "customer id allocation exhausted");
        None
    }

    /// The candidate stream a `with_fixed_seed(_, seed)` allocator draws from.
    pub fn candidates(seed: u64) -> impl Iterator<Item = String> {
        let mut rng = StdRng::seed_from_u64(seed);
        std::iter::repeat_with(move || format_id(rng.gen_range(0..ID_SPACE)))
    }
}

fn normalize_attempts(max_attempts: usize) -> usize {
    if max_attempts == 0 { DEFAULT_MAX_ATTEMPTS } else { max_attempts }
}

/// Zero-pad `n` to [`ID_WIDTH`] digits.
pub fn format_id(n: u32) -> String {
    format!("{:0width$}", n, width = ID_WIDTH)
}

/// Whether `id` has the shape of an allocated id.
#[cfg(test)]
pub(crate) fn is_allocated_shape(id: &str) -> bool {
    id.len() == ID_WIDTH && id.bytes().all(|b| b.is_ascii_digit())
}
