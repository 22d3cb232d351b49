//! FFT kernel shared by the analysis and synthesis stages.

use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// Smallest value allowed inside a logarithm.
const LOG_FLOOR: f64 = 1e-12;

/// Forward and inverse transforms of one fixed size.
#[derive(Clone)]
pub struct FftKernel {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for FftKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftKernel").field("size", &self.size).finish()
    }
}

impl FftKernel {
    /// Plans transforms of `size` points.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }

    /// Transform length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of non-negative frequency bins.
    pub fn bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Spectrum of a real signal, zero-padded or truncated to the kernel size.
    pub fn forward_real(&self, signal: &[f64]) -> Vec<Complex64> {
        let mut buffer = vec![Complex64::new(0.0, 0.0); self.size];
        for (b, &s) in buffer.iter_mut().zip(signal) {
            b.re = s;
        }
        self.forward.process(&mut buffer);
        buffer
    }

    /// Real part of the normalized inverse transform.
    pub fn inverse_real(&self, mut spectrum: Vec<Complex64>) -> Vec<f64> {
        self.inverse.process(&mut spectrum);
        let scale = 1.0 / self.size as f64;
        spectrum.into_iter().map(|c| c.re * scale).collect()
    }

    /// Power spectrum `|X[k]|^2` for the non-negative bins.
    pub fn power_spectrum(&self, signal: &[f64]) -> Vec<f64> {
        self.forward_real(signal)
            .into_iter()
            .take(self.bins())
            .map(|c| c.norm_sqr())
            .collect()
    }

    /// Real cepstrum of a one-sided log spectrum.
    pub fn cepstrum(&self, log_spectrum: &[f64]) -> Vec<f64> {
        self.inverse_real(self.mirror(log_spectrum))
    }

    /// One-sided spectrum back from a real, even cepstrum.
    pub fn from_cepstrum(&self, cepstrum: &[f64]) -> Vec<f64> {
        self.forward_real(cepstrum)
            .into_iter()
            .take(self.bins())
            .map(|c| c.re)
            .collect()
    }

    /// Minimum-phase spectrum with the given one-sided magnitude.
    ///
    /// Folds the real cepstrum of `log|H|` onto positive quefrencies and
    /// exponentiates its transform.
    pub fn minimum_phase(&self, magnitude: &[f64]) -> Vec<Complex64> {
        let log_mag: Vec<f64> = magnitude.iter().map(|&m| m.max(LOG_FLOOR).ln()).collect();
        let cep = self.cepstrum(&log_mag);

        let half = self.size / 2;
        let mut folded = vec![0.0; self.size];
        folded[0] = cep[0];
        for n in 1..half {
            folded[n] = 2.0 * cep[n];
        }
        folded[half] = cep[half];

        self.forward_real(&folded).into_iter().map(|c| c.exp()).collect()
    }

    /// Causal impulse response of the minimum-phase filter with `magnitude`.
    pub fn minimum_phase_response(&self, magnitude: &[f64]) -> Vec<f64> {
        self.inverse_real(self.minimum_phase(magnitude))
    }

    /// Expands a one-sided real spectrum into a full Hermitian buffer.
    fn mirror(&self, one_sided: &[f64]) -> Vec<Complex64> {
        let mut full = vec![Complex64::new(0.0, 0.0); self.size];
        for (k, slot) in full.iter_mut().enumerate() {
            let idx = if k <= self.size / 2 { k } else { self.size - k };
            slot.re = one_sided.get(idx).copied().unwrap_or(0.0);
        }
        full
    }
}
