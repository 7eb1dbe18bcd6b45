//! Randomness used when a description matches no rule.
//!
//! Generators take a `&dyn RandomSource` instead of reaching for a global
//! generator, so tests can pin the outcome.

use rand::distr::{Distribution, Uniform};

/// Picks an index into a list of candidates.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. Returns 0 when `len` is 0.
    fn pick_index(&self, len: usize) -> usize;
}

/// Draws from the calling thread's generator, so concurrent requests never
/// share generator state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> usize {
        match Uniform::new(0, len) {
            Ok(dist) => dist.sample(&mut rand::rng()),
            Err(_) => 0,
        }
    }
}

/// Always picks the same position, wrapped to the candidate count.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick_index(&self, len: usize) -> usize {
        self.0.checked_rem(len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_random_stays_in_range() {
        let random = ThreadRandom;
        for _ in 0..1000 {
            assert!(random.pick_index(3) < 3);
        }
        assert_eq!(random.pick_index(1), 0);
        assert_eq!(random.pick_index(0), 0);
    }

    #[test]
    fn fixed_random_wraps() {
        assert_eq!(FixedRandom(1).pick_index(3), 1);
        assert_eq!(FixedRandom(4).pick_index(3), 1);
        assert_eq!(FixedRandom(7).pick_index(0), 0);
    }
}
