//! Byte-level determinism checks.

use std::fmt;

/// Outcome of running a generator several times.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    pub runs: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// First differing byte, as (run index, offset).
    pub first_difference: Option<(usize, usize)>,
}

impl fmt::Display for DeterminismResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_difference {
            None => write!(f, "{} identical runs ({})", self.runs, self.hash),
            Some((run, offset)) => write!(f, "run {} differs at byte {}", run, offset),
        }
    }
}

impl DeterminismResult {
    /// Panics with the first difference if the runs disagreed.
    pub fn assert_deterministic(&self) {
        assert!(self.is_deterministic, "non-deterministic output: {}", self);
    }
}

/// Runs `generate` `runs` times (at least 2) and compares the outputs.
pub fn verify_determinism<F>(mut generate: F, runs: usize) -> DeterminismResult
where
    F: FnMut() -> Vec<u8>,
{
    let runs = runs.max(2);
    let reference = generate();
    let hash = blake3::hash(&reference).to_hex().to_string();

    for run in 1..runs {
        let output = generate();
        let offset = reference
            .iter()
            .zip(&output)
            .position(|(a, b)| a != b)
            .or_else(|| (reference.len() != output.len()).then(|| reference.len().min(output.len())));
        if let Some(offset) = offset {
            return DeterminismResult {
                is_deterministic: false,
                runs: run + 1,
                hash,
                first_difference: Some((run, offset)),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        hash,
        first_difference: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_runs() {
        let result = verify_determinism(|| vec![1, 2, 3], 3);
        assert!(result.is_deterministic);
        assert_eq!(result.runs, 3);
    }

    #[test]
    fn test_difference_located() {
        let mut n = 0u8;
        let result = verify_determinism(
            || {
                n += 1;
                vec![0, 0, n]
            },
            3,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.first_difference, Some((1, 2)));
    }

    #[test]
    fn test_length_difference_located() {
        let mut len = 2;
        let result = verify_determinism(
            || {
                len += 1;
                vec![7; len]
            },
            2,
        );
        assert_eq!(result.first_difference, Some((1, 3)));
    }
}
