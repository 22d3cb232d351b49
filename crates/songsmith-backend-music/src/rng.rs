//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! All randomness in composition flows through generators built here. A
//! generator is always constructed per request; there is no shared instance.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use songsmith_spec::hash::prompt_seed;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Creates the composition RNG for a prompt.
///
/// Prompts that differ only in case or surrounding whitespace share a generator.
pub fn create_prompt_rng(prompt: &str) -> Pcg32 {
    create_rng(prompt_seed(prompt))
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
    fn test_prompt_rng_ignores_case_and_padding() {
        let mut rng1 = create_prompt_rng("Ocean Breeze");
        let mut rng2 = create_prompt_rng("  ocean breeze ");

        let values1: Vec<u32> = (0..16).map(|_| rng1.gen()).collect();
        let values2: Vec<u32> = (0..16).map(|_| rng2.gen()).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_different_prompts_diverge() {
        let mut rng1 = create_prompt_rng("ocean breeze");
        let mut rng2 = create_prompt_rng("desert wind");

        let values1: Vec<u32> = (0..16).map(|_| rng1.gen()).collect();
        let values2: Vec<u32> = (0..16).map(|_| rng2.gen()).collect();

        assert_ne!(values1, values2);
    }
}
