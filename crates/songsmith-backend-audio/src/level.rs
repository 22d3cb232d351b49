//! Peak measurement and clip-safe normalization.

/// Returns the maximum absolute sample value.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
}

/// Scales `samples` so the peak equals `target`, but only if the peak exceeds
/// full scale (1.0).
///
/// Returns true if scaling was applied. Applying this twice is the same as
/// applying it once, since `target` must be at most 1.0.
pub fn normalize_if_clipping(samples: &mut [f64], target: f64) -> bool {
    let peak = peak(samples);
    if peak <= 1.0 || !peak.is_finite() {
        return false;
    }
    let gain = target / peak;
    for s in samples.iter_mut() {
        *s *= gain;
    }
    true
}

/// Converts decibels to a linear amplitude factor.
pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Replaces non-finite samples with silence.
///
/// Returns how many samples were replaced.
pub fn sanitize(samples: &mut [f64]) -> usize {
    let mut replaced = 0;
    for s in samples.iter_mut() {
        if !s.is_finite() {
            *s = 0.0;
            replaced += 1;
        }
    }
    replaced
}
