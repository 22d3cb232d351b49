//! WSOLA time stretching.
//!
//! Waveform-similarity overlap-add changes duration without changing pitch:
//! Hann-windowed segments are read from the input at `rate` times the output
//! hop and shifted within a small tolerance so that each segment lines up with
//! the natural continuation of the previous one.

use crate::error::{AudioError, AudioResult};

/// Segment length in seconds.
const SEGMENT_SECONDS: f64 = 0.040;
/// Alignment search tolerance in seconds, either side of the nominal position.
const TOLERANCE_SECONDS: f64 = 0.010;
/// Coarse search stride in samples; the best coarse offset is then refined.
const COARSE_STEP: usize = 4;
/// Minimum segment length in samples.
const MIN_SEGMENT: usize = 64;

/// WSOLA stretcher.
#[derive(Debug, Clone)]
pub struct Wsola {
    segment: usize,
    tolerance: usize,
    rate: f64,
    window: Vec<f64>,
}

impl Wsola {
    /// Creates a stretcher for a sample rate and speed factor.
    ///
    /// `rate` < 1.0 slows the signal down (longer output), > 1.0 speeds it up.
    pub fn new(sample_rate: u32, rate: f64) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if !(rate.is_finite() && rate > 0.0) {
            return Err(AudioError::invalid_param(
                "stretch_rate",
                format!("must be positive and finite, got {}", rate),
            ));
        }
        let mut segment = ((SEGMENT_SECONDS * sample_rate as f64).round() as usize).max(MIN_SEGMENT);
        if segment % 2 == 1 {
            segment += 1;
        }
        let tolerance = (TOLERANCE_SECONDS * sample_rate as f64).round() as usize;
        Ok(Self {
            segment,
            tolerance,
            rate,
            window: periodic_hann(segment),
        })
    }

    /// Output hop in samples.
    pub fn synthesis_hop(&self) -> usize {
        self.segment / 2
    }

    /// Stretches `input`. Output length is `round(len / rate)`.
    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        if input.is_empty() {
            return Vec::new();
        }
        if (self.rate - 1.0).abs() < f64::EPSILON {
            return input.to_vec();
        }

        let out_len = (input.len() as f64 / self.rate).round() as usize;
        let hop_out = self.synthesis_hop();
        let hop_in = hop_out as f64 * self.rate;

        let mut output = vec![0.0; out_len + self.segment];
        let mut norm = vec![0.0; out_len + self.segment];
        let mut prev_pos: Option<isize> = None;

        let mut k = 0usize;
        while k * hop_out < out_len {
            let nominal = (k as f64 * hop_in).round() as isize;
            let pos = match prev_pos {
                None => nominal,
                Some(prev) => nominal + self.best_offset(input, nominal, prev + hop_out as isize),
            };

            let out_start = k * hop_out;
            for (j, w) in self.window.iter().enumerate() {
                output[out_start + j] += sample_at(input, pos + j as isize) * w;
                norm[out_start + j] += w;
            }

            prev_pos = Some(pos);
            k += 1;
        }

        output.truncate(out_len);
        for (y, n) in output.iter_mut().zip(&norm) {
            if *n > 1e-6 {
                *y /= n;
            }
        }
        output
    }

    /// Finds the shift within tolerance that best matches the continuation
    /// segment starting at `natural`.
    fn best_offset(&self, input: &[f64], nominal: isize, natural: isize) -> isize {
        let tol = self.tolerance as isize;
        let overlap = self.synthesis_hop();
        let score = |delta: isize| -> f64 {
            let start = nominal + delta;
            (0..overlap)
                .map(|j| sample_at(input, start + j as isize) * sample_at(input, natural + j as isize))
                .sum()
        };

        let mut best = 0isize;
        let mut best_score = f64::NEG_INFINITY;
        let mut delta = -tol;
        while delta <= tol {
            let s = score(delta);
            if s > best_score {
                best_score = s;
                best = delta;
            }
            delta += COARSE_STEP as isize;
        }

        let fine = COARSE_STEP as isize - 1;
        for delta in (best - fine).max(-tol)..=(best + fine).min(tol) {
            let s = score(delta);
            if s > best_score {
                best_score = s;
                best = delta;
            }
        }
        best
    }
}

/// Stretches `samples` by speed factor `rate` (0.88 gives an output ~14% longer).
pub fn time_stretch(samples: &[f64], sample_rate: u32, rate: f64) -> AudioResult<Vec<f64>> {
    Ok(Wsola::new(sample_rate, rate)?.process(samples))
}

fn sample_at(input: &[f64], index: isize) -> f64 {
    if index < 0 {
        return 0.0;
    }
    input.get(index as usize).copied().unwrap_or(0.0)
}

/// Periodic Hann window; sums to a constant at 50% overlap.
pub(crate) fn periodic_hann(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / len as f64).cos())
        .collect()
}
