//! Echo polish fallback.
//!
//! When resynthesis cannot run, the speech is returned with a light room
//! ambience: each tap adds a delayed, decayed copy of the signal onto itself.
//! Taps apply in order, so a later tap also echoes the earlier tap's output.

use songsmith_spec::EchoTap;
use tracing::debug;

use crate::level::normalize_if_clipping;

/// Applies the echo taps and normalizes if the result clips.
pub fn polish(samples: &[f64], sample_rate: u32, taps: &[EchoTap], normalize_peak: f64) -> Vec<f64> {
    let mut out = samples.to_vec();
    for tap in taps {
        apply_tap(&mut out, sample_rate, tap);
    }
    let scaled = normalize_if_clipping(&mut out, normalize_peak);
    debug!(taps = taps.len(), scaled, "ambience polish applied");
    out
}

/// Adds `decay * x[n - delay]` to every sample, reading the pre-tap signal.
///
/// Skipped when the delay rounds to zero samples or reaches past the end.
pub fn apply_tap(samples: &mut [f64], sample_rate: u32, tap: &EchoTap) {
    let delay = delay_samples(tap.delay, sample_rate);
    if delay == 0 || delay >= samples.len() {
        return;
    }
    // Walk backwards so every read sees the value from before this tap.
    for n in (delay..samples.len()).rev() {
        samples[n] += tap.decay * samples[n - delay];
    }
}

/// Delay in whole samples, truncated.
pub fn delay_samples(seconds: f64, sample_rate: u32) -> usize {
    (seconds * sample_rate as f64).floor().max(0.0) as usize
}
