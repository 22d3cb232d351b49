//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! The vocoder's noise excitation is the only randomness in this crate. It is
//! seeded from the analysed frame count so equal inputs resynthesize equally.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use songsmith_spec::hash::derive_component_seed;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Creates an RNG for a named component.
pub fn create_component_rng(base_seed: u32, key: &str) -> Pcg32 {
    create_rng(derive_component_seed(base_seed, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);

        let values1: Vec<f64> = (0..100).map(|_| rng1.gen()).collect();
        let values2: Vec<f64> = (0..100).map(|_| rng2.gen()).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_component_rng_independence() {
        let mut rng_a = create_component_rng(42, "aperiodic");
        let mut rng_b = create_component_rng(42, "periodic");

        let values_a: Vec<f64> = (0..10).map(|_| rng_a.gen()).collect();
        let values_b: Vec<f64> = (0..10).map(|_| rng_b.gen()).collect();

        assert_ne!(values_a, values_b);
    }
}
