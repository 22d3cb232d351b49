//! Pitch-adaptive spectral envelope.
//!
//! For each frame a Hann window three pitch periods long is centred on the
//! frame time. Its power spectrum is smoothed over 2/3 of F0 in frequency and
//! then liftered in the cepstral domain, which removes the harmonic ripple and
//! leaves the vocal-tract envelope. Unvoiced frames use a fixed analysis F0.

use std::f64::consts::PI;

use songsmith_spec::PitchContour;

use super::kernel::FftKernel;

/// Analysis F0 for unvoiced frames.
pub const UNVOICED_F0: f64 = 500.0;
/// Cepstral compensation parameter.
const Q1: f64 = -0.15;
/// Floor added to the power spectrum before taking logarithms.
const POWER_FLOOR: f64 = 1e-12;

/// Lowest F0 whose three-period window fits in the FFT.
pub fn lowest_analysis_f0(sample_rate: u32, fft_size: usize) -> f64 {
    3.0 * sample_rate as f64 / (fft_size as f64 - 3.0)
}

/// Estimates the envelope for every frame of `contour`.
pub fn estimate_envelope(
    kernel: &FftKernel,
    samples: &[f64],
    sample_rate: u32,
    contour: &PitchContour,
) -> Vec<Vec<f64>> {
    let floor_f0 = lowest_analysis_f0(sample_rate, kernel.size());
    contour
        .iter()
        .map(|(t, f0)| {
            let f0 = if f0 > 0.0 { f0 } else { UNVOICED_F0 };
            envelope_frame(kernel, samples, sample_rate, t, f0.max(floor_f0))
        })
        .collect()
}

fn envelope_frame(kernel: &FftKernel, samples: &[f64], sample_rate: u32, time: f64, f0: f64) -> Vec<f64> {
    let sr = sample_rate as f64;
    let segment = windowed_segment(samples, sr, time, f0);
    let power = kernel.power_spectrum(&segment);

    let width_bins = 2.0 * f0 / 3.0 * kernel.size() as f64 / sr;
    let smoothed = smooth_rectangular(&power, width_bins);

    let log_power: Vec<f64> = smoothed.iter().map(|&p| (p + POWER_FLOOR).ln()).collect();
    let mut cep = kernel.cepstrum(&log_power);
    let n = cep.len();
    for (i, c) in cep.iter_mut().enumerate().skip(1) {
        let quefrency = i.min(n - i) as f64 / sr;
        let x = PI * f0 * quefrency;
        let smoothing = x.sin() / x;
        let compensation = (1.0 - 2.0 * Q1) + 2.0 * Q1 * (2.0 * x).cos();
        *c *= smoothing * compensation;
    }

    kernel.from_cepstrum(&cep).into_iter().map(f64::exp).collect()
}

/// Three-period Hann window at `time`, unit energy, with the weighted DC removed.
fn windowed_segment(samples: &[f64], sr: f64, time: f64, f0: f64) -> Vec<f64> {
    let half = (1.5 * sr / f0).round() as isize;
    let center = (time * sr).round() as isize;

    let window: Vec<f64> = (-half..=half)
        .map(|n| 0.5 + 0.5 * (2.0 * PI * n as f64 * f0 / (3.0 * sr)).cos())
        .collect();
    let energy = window.iter().map(|w| w * w).sum::<f64>().sqrt();
    let window: Vec<f64> = window.iter().map(|w| w / energy).collect();

    let raw: Vec<f64> = (-half..=half)
        .map(|n| {
            let idx = center + n;
            if idx < 0 {
                0.0
            } else {
                samples.get(idx as usize).copied().unwrap_or(0.0)
            }
        })
        .collect();

    let weighted: f64 = raw.iter().zip(&window).map(|(x, w)| x * w).sum();
    let mean = weighted / window.iter().sum::<f64>();
    raw.iter()
        .zip(&window)
        .map(|(x, w)| (x - mean) * w)
        .collect()
}

/// Moving average over `width` bins, reflecting at both spectrum edges.
fn smooth_rectangular(power: &[f64], width: f64) -> Vec<f64> {
    let half = ((width / 2.0).round() as isize).max(1);
    let last = power.len() as isize - 1;
    let reflect = |j: isize| -> usize {
        let j = if j < 0 { -j } else { j };
        let j = if j > last { 2 * last - j } else { j };
        j.clamp(0, last) as usize
    };
    (0..power.len() as isize)
        .map(|k| {
            let sum: f64 = (k - half..=k + half).map(|j| power[reflect(j)]).sum();
            sum / (2 * half + 1) as f64
        })
        .collect()
}
