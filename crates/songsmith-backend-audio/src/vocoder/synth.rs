//! Source-filter synthesis.
//!
//! Excitation events are placed one pitch period apart (or at a fixed rate in
//! unvoiced regions). Each event contributes
//!
//! - a minimum-phase pulse with power `envelope * (1 - aperiodicity) * T`, and
//! - a burst of white noise of length `T`, shaped by a minimum-phase filter
//!   with power `envelope * aperiodicity`,
//!
//! where `T` is the period in samples. With a unit-energy analysis window this
//! keeps the output power in line with the analysed signal.

use rand::Rng;
use rand_pcg::Pcg32;
use rustfft::num_complex::Complex64;
use songsmith_spec::PitchContour;

use super::envelope::UNVOICED_F0;
use super::kernel::FftKernel;
use super::types::SpectralFrames;
use crate::error::{AudioError, AudioResult};
use crate::rng::create_component_rng;

/// Unit-variance uniform noise amplitude.
const NOISE_AMPLITUDE: f64 = 1.732_050_807_568_877_2;

/// Filters derived from one analysis frame.
struct FrameFilters {
    index: usize,
    /// Causal periodic response for a unit period; scaled by sqrt(T) per pulse.
    pulse: Vec<f64>,
    /// Minimum-phase shaping spectrum for the noise component.
    noise: Vec<Complex64>,
}

/// Renders the waveform for `contour` using `frames`.
///
/// Output length is `round(last_frame_time * sample_rate) + 1`.
pub fn synthesize(contour: &PitchContour, frames: &SpectralFrames, sample_rate: u32) -> AudioResult<Vec<f64>> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: sample_rate });
    }
    if frames.len() != contour.len() {
        return Err(AudioError::FrameGridMismatch {
            expected: contour.len(),
            actual: frames.len(),
        });
    }
    if frames.is_empty() {
        return Ok(Vec::new());
    }

    let kernel = FftKernel::new(frames.fft_size());
    let sr = sample_rate as f64;
    let frame_samples = contour.grid().frame_period() * sr;
    let out_len = (contour.grid().last_time() * sr).round() as usize + 1;
    let mut output = vec![0.0; out_len + kernel.size()];

    let mut rng = create_component_rng(frames.len() as u32, "aperiodic");
    let mut cached: Option<FrameFilters> = None;
    let mut noise = Vec::with_capacity(kernel.size());

    let mut position = 0.0f64;
    loop {
        let p = position.round() as usize;
        if p >= out_len {
            break;
        }
        let index = ((p as f64 / frame_samples).round() as usize).min(frames.len() - 1);
        let f0 = f0_at(contour, p as f64 / sr);
        let voiced = f0 > 0.0;
        let period = if voiced { sr / f0 } else { sr / UNVOICED_F0 };

        let filters = match cached.take() {
            Some(f) if f.index == index => f,
            _ => frame_filters(&kernel, frames, index),
        };

        if voiced {
            let gain = period.sqrt();
            for (slot, &h) in output[p..].iter_mut().zip(&filters.pulse) {
                *slot += gain * h;
            }
        }

        let burst = (period.round() as usize).clamp(1, kernel.size());
        noise.clear();
        noise.extend((0..burst).map(|_| rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE)));
        let shaped = shape_noise(&kernel, &noise, &filters.noise);
        for (slot, &y) in output[p..].iter_mut().zip(&shaped) {
            *slot += y;
        }

        cached = Some(filters);
        position += period;
    }

    output.truncate(out_len);
    Ok(output)
}

fn frame_filters(kernel: &FftKernel, frames: &SpectralFrames, index: usize) -> FrameFilters {
    let (envelope, aperiodicity) = frames.frame(index);
    let periodic: Vec<f64> = envelope
        .iter()
        .zip(aperiodicity)
        .map(|(&s, &a)| (s * (1.0 - a)).max(0.0).sqrt())
        .collect();
    let aperiodic: Vec<f64> = envelope
        .iter()
        .zip(aperiodicity)
        .map(|(&s, &a)| (s * a).max(0.0).sqrt())
        .collect();
    FrameFilters {
        index,
        pulse: kernel.minimum_phase_response(&periodic),
        noise: kernel.minimum_phase(&aperiodic),
    }
}

fn shape_noise(kernel: &FftKernel, noise: &[f64], filter: &[Complex64]) -> Vec<f64> {
    let spectrum: Vec<Complex64> = kernel
        .forward_real(noise)
        .into_iter()
        .zip(filter)
        .map(|(x, h)| x * h)
        .collect();
    kernel.inverse_real(spectrum)
}

/// F0 at `time`, linear between two voiced frames, nearest otherwise.
fn f0_at(contour: &PitchContour, time: f64) -> f64 {
    let f0 = contour.f0();
    let pos = time / contour.grid().frame_period();
    let i0 = (pos.floor() as usize).min(f0.len() - 1);
    let i1 = (i0 + 1).min(f0.len() - 1);
    let frac = pos - i0 as f64;
    if f0[i0] > 0.0 && f0[i1] > 0.0 {
        f0[i0] + frac.clamp(0.0, 1.0) * (f0[i1] - f0[i0])
    } else if frac < 0.5 {
        f0[i0]
    } else {
        f0[i1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songsmith_spec::FrameGrid;

    fn flat_frames(count: usize, fft_size: usize, ap: f64) -> SpectralFrames {
        let bins = fft_size / 2 + 1;
        SpectralFrames::new(fft_size, vec![vec![1e-4; bins]; count], vec![vec![ap; bins]; count]).unwrap()
    }

    #[test]
    fn test_output_length_follows_grid() {
        let contour = PitchContour::new(FrameGrid::new(0.01, 11), vec![150.0; 11]).unwrap();
        let out = synthesize(&contour, &flat_frames(11, 512, 0.1), 16000).unwrap();
        assert_eq!(out.len(), 1601);
    }

    #[test]
    fn test_frame_count_mismatch() {
        let contour = PitchContour::new(FrameGrid::new(0.01, 11), vec![150.0; 11]).unwrap();
        let err = synthesize(&contour, &flat_frames(10, 512, 0.1), 16000).unwrap_err();
        assert!(matches!(err, AudioError::FrameGridMismatch { .. }));
    }

    #[test]
    fn test_deterministic() {
        let contour = PitchContour::new(FrameGrid::new(0.01, 21), vec![0.0; 21]).unwrap();
        let frames = flat_frames(21, 512, 0.9);
        let a = synthesize(&contour, &frames, 16000).unwrap();
        let b = synthesize(&contour, &frames, 16000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_voiced_pulse_train_period() {
        // Periodic-only excitation at 200 Hz puts energy every 80 samples.
        let contour = PitchContour::new(FrameGrid::new(0.01, 21), vec![200.0; 21]).unwrap();
        let frames = flat_frames(21, 512, 0.0);
        let out = synthesize(&contour, &frames, 16000).unwrap();
        for k in 1..20 {
            let at = out[k * 80].abs();
            let between = out[k * 80 + 40].abs();
            assert!(at > between * 10.0, "pulse {} at={} between={}", k, at, between);
        }
    }

    #[test]
    fn test_f0_interpolation() {
        let contour = PitchContour::new(FrameGrid::new(0.01, 3), vec![100.0, 200.0, 0.0]).unwrap();
        assert!((f0_at(&contour, 0.005) - 150.0).abs() < 1e-9);
        assert_eq!(f0_at(&contour, 0.012), 200.0);
        assert_eq!(f0_at(&contour, 0.018), 0.0);
    }
}
