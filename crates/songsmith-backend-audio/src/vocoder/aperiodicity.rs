//! Band aperiodicity.
//!
//! Measures, per 3 kHz band, how much of the power sits between harmonics
//! rather than on them. A four-period Hann window puts its first spectral null
//! exactly half a harmonic spacing away, so for a clean periodic signal the
//! inter-harmonic bins are nearly empty and the ratio approaches 0; for noise
//! it approaches 1. Band values are interpolated linearly across bins.

use std::f64::consts::PI;

use songsmith_spec::PitchContour;

use super::kernel::FftKernel;

/// Width of each aperiodicity band.
pub const BAND_WIDTH_HZ: f64 = 3000.0;
/// Lower clamp for voiced bands.
pub const MIN_APERIODICITY: f64 = 0.001;
/// Value for unvoiced frames and the upper clamp.
pub const MAX_APERIODICITY: f64 = 0.999_999;

/// Estimates per-bin aperiodicity for every frame of `contour`.
pub fn estimate_aperiodicity(
    kernel: &FftKernel,
    samples: &[f64],
    sample_rate: u32,
    contour: &PitchContour,
) -> Vec<Vec<f64>> {
    let min_f0 = 4.0 * sample_rate as f64 / (kernel.size() as f64 - 1.0);
    contour
        .iter()
        .map(|(t, f0)| {
            if f0 <= 0.0 {
                vec![MAX_APERIODICITY; kernel.bins()]
            } else {
                aperiodicity_frame(kernel, samples, sample_rate, t, f0.max(min_f0))
            }
        })
        .collect()
}

fn aperiodicity_frame(kernel: &FftKernel, samples: &[f64], sample_rate: u32, time: f64, f0: f64) -> Vec<f64> {
    let sr = sample_rate as f64;
    let power = kernel.power_spectrum(&four_period_segment(samples, sr, time, f0));
    let bin_hz = sr / kernel.size() as f64;
    let nyquist = sr / 2.0;

    let band_count = ((nyquist / BAND_WIDTH_HZ).ceil() as usize).max(1);
    let half_width = ((f0 / 16.0) / bin_hz).round() as isize;
    let mean_around = |freq: f64| -> f64 {
        let center = (freq / bin_hz).round() as isize;
        let last = power.len() as isize - 1;
        let lo = (center - half_width).clamp(0, last);
        let hi = (center + half_width).clamp(0, last);
        let sum: f64 = (lo..=hi).map(|k| power[k as usize]).sum();
        sum / (hi - lo + 1) as f64
    };

    let mut centers = Vec::with_capacity(band_count);
    let mut values = Vec::with_capacity(band_count);
    for b in 0..band_count {
        let lo = b as f64 * BAND_WIDTH_HZ;
        let hi = ((b + 1) as f64 * BAND_WIDTH_HZ).min(nyquist - f0);
        if hi <= lo {
            break;
        }

        let (mut peak, mut valley) = (0.0, 0.0);
        let mut h = (lo / f0).ceil().max(1.0);
        while h * f0 < hi {
            peak += mean_around(h * f0);
            valley += mean_around((h + 0.5) * f0);
            h += 1.0;
        }

        let ratio = if peak > 0.0 { valley / peak } else { MAX_APERIODICITY };
        centers.push(0.5 * (lo + hi));
        values.push(ratio.clamp(MIN_APERIODICITY, MAX_APERIODICITY));
    }

    if values.is_empty() {
        return vec![MAX_APERIODICITY; kernel.bins()];
    }
    interpolate_bands(&centers, &values, kernel.bins(), bin_hz)
}

/// Four-period Hann window centred at `time`.
fn four_period_segment(samples: &[f64], sr: f64, time: f64, f0: f64) -> Vec<f64> {
    let half = (2.0 * sr / f0).round() as isize;
    let center = (time * sr).round() as isize;
    (-half..=half)
        .map(|n| {
            let w = 0.5 + 0.5 * (PI * n as f64 / half as f64).cos();
            let idx = center + n;
            let x = if idx < 0 {
                0.0
            } else {
                samples.get(idx as usize).copied().unwrap_or(0.0)
            };
            x * w
        })
        .collect()
}

/// Piecewise-linear interpolation of band values onto FFT bins.
fn interpolate_bands(centers: &[f64], values: &[f64], bins: usize, bin_hz: f64) -> Vec<f64> {
    (0..bins)
        .map(|k| {
            let freq = k as f64 * bin_hz;
            let upper = centers.partition_point(|&c| c < freq);
            if upper == 0 {
                values[0]
            } else if upper >= centers.len() {
                values[values.len() - 1]
            } else {
                let (c0, c1) = (centers[upper - 1], centers[upper]);
                let frac = (freq - c0) / (c1 - c0);
                values[upper - 1] + frac * (values[upper] - values[upper - 1])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use rand::Rng;
    use songsmith_spec::FrameGrid;

    const SR: u32 = 16000;

    fn contour(f0: f64, frames: usize) -> PitchContour {
        PitchContour::new(FrameGrid::new(0.01, frames), vec![f0; frames]).unwrap()
    }

    fn mean(row: &[f64]) -> f64 {
        row.iter().sum::<f64>() / row.len() as f64
    }

    #[test]
    fn test_harmonic_signal_is_periodic() {
        let samples: Vec<f64> = (0..8000)
            .map(|i| {
                let t = i as f64 / SR as f64;
                (1..=30)
                    .map(|h| 0.05 * (2.0 * PI * 200.0 * h as f64 * t).sin())
                    .sum()
            })
            .collect();
        let kernel = FftKernel::new(1024);
        let ap = estimate_aperiodicity(&kernel, &samples, SR, &contour(200.0, 40));
        assert!(mean(&ap[20]) < 0.1, "mean {}", mean(&ap[20]));
    }

    #[test]
    fn test_noise_is_aperiodic() {
        let mut rng = create_rng(7);
        let samples: Vec<f64> = (0..8000).map(|_| rng.gen_range(-0.5..0.5)).collect();
        let kernel = FftKernel::new(1024);
        let ap = estimate_aperiodicity(&kernel, &samples, SR, &contour(200.0, 40));
        assert!(mean(&ap[20]) > 0.5, "mean {}", mean(&ap[20]));
    }

    #[test]
    fn test_unvoiced_frames_fully_aperiodic() {
        let kernel = FftKernel::new(512);
        let ap = estimate_aperiodicity(&kernel, &[0.1; 4000], SR, &contour(0.0, 3));
        assert!(ap.iter().flatten().all(|&a| a == MAX_APERIODICITY));
        assert_eq!(ap[0].len(), 257);
    }

    #[test]
    fn test_values_within_bounds() {
        let mut rng = create_rng(11);
        let samples: Vec<f64> = (0..8000)
            .map(|i| (i as f64 * 0.08).sin() * 0.4 + rng.gen_range(-0.05..0.05))
            .collect();
        let kernel = FftKernel::new(1024);
        let ap = estimate_aperiodicity(&kernel, &samples, SR, &contour(203.7, 40));
        assert!(ap
            .iter()
            .flatten()
            .all(|&a| (MIN_APERIODICITY..=MAX_APERIODICITY).contains(&a)));
    }

    #[test]
    fn test_interpolation_endpoints() {
        let out = interpolate_bands(&[1500.0, 4500.0], &[0.2, 0.8], 5, 1500.0);
        assert_eq!(out[0], 0.2);
        assert_eq!(out[1], 0.2);
        assert!((out[2] - 0.5).abs() < 1e-12);
        assert!((out[3] - 0.8).abs() < 1e-12);
        assert_eq!(out[4], 0.8);
    }
}
