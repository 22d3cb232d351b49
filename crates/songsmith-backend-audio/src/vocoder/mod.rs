//! Analysis-resynthesis vocoder.
//!
//! [`SpectralResynthesizer`] decomposes a speech signal into a smooth spectral
//! envelope and a per-bin aperiodicity, both estimated pitch-synchronously
//! from a supplied contour, and rebuilds the waveform from those with the
//! contour as excitation. Envelope, aperiodicity and synthesis all use the one
//! FFT size the resynthesizer was built with.

mod aperiodicity;
mod envelope;
mod kernel;
mod synth;
mod types;


use songsmith_spec::{FrameGrid, PitchContour, VocalConfig};
use tracing::debug;

use crate::error::{AudioError, AudioResult};

pub use aperiodicity::{estimate_aperiodicity, MAX_APERIODICITY, MIN_APERIODICITY};
pub use envelope::{estimate_envelope, lowest_analysis_f0};
pub use kernel::FftKernel;
pub use synth::synthesize;
pub use types::SpectralFrames;

/// Smallest accepted FFT size.
pub const MIN_FFT_SIZE: usize = 256;

/// Vocoder bound to one analysis size.
#[derive(Debug, Clone)]
pub struct SpectralResynthesizer {
    kernel: FftKernel,
}

impl SpectralResynthesizer {
    /// Creates a resynthesizer with the given FFT size.
    ///
    /// # Errors
    /// [`AudioError::InvalidParameter`] unless `fft_size` is a power of two of
    /// at least [`MIN_FFT_SIZE`].
    pub fn new(fft_size: usize) -> AudioResult<Self> {
        if !fft_size.is_power_of_two() || fft_size < MIN_FFT_SIZE {
            return Err(AudioError::invalid_param(
                "fft_size",
                format!("must be a power of two >= {}, got {}", MIN_FFT_SIZE, fft_size),
            ));
        }
        Ok(Self {
            kernel: FftKernel::new(fft_size),
        })
    }

    /// Creates a resynthesizer from a vocal config.
    pub fn from_config(config: &VocalConfig) -> AudioResult<Self> {
        Self::new(config.fft_size)
    }

    /// FFT size shared by every stage.
    pub fn fft_size(&self) -> usize {
        self.kernel.size()
    }

    /// Estimates envelope and aperiodicity of `samples` on the contour's grid.
    ///
    /// # Errors
    /// - [`AudioError::BackendUnavailable`] for an empty signal
    /// - [`AudioError::FrameGridMismatch`] if the contour's grid does not
    ///   cover the signal
    pub fn analyze(&self, samples: &[f64], sample_rate: u32, contour: &PitchContour) -> AudioResult<SpectralFrames> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if samples.is_empty() {
            return Err(AudioError::unavailable("spectral analysis", "empty signal"));
        }
        let expected = FrameGrid::for_signal(samples.len(), sample_rate, contour.grid().frame_period());
        if expected.len() != contour.len() {
            return Err(AudioError::FrameGridMismatch {
                expected: expected.len(),
                actual: contour.len(),
            });
        }

        let envelope = estimate_envelope(&self.kernel, samples, sample_rate, contour);
        let aperiodicity = estimate_aperiodicity(&self.kernel, samples, sample_rate, contour);
        SpectralFrames::new(self.kernel.size(), envelope, aperiodicity)
    }

    /// Renders a waveform from analysed frames driven by `contour`.
    pub fn synthesize(&self, contour: &PitchContour, frames: &SpectralFrames, sample_rate: u32) -> AudioResult<Vec<f64>> {
        if frames.fft_size() != self.kernel.size() {
            return Err(AudioError::FftSizeMismatch {
                frames: frames.fft_size(),
                resynthesizer: self.kernel.size(),
            });
        }
        synthesize(contour, frames, sample_rate)
    }

    /// Analyses `samples` with `contour` and resynthesizes them along it.
    ///
    /// # Errors
    /// Any analysis error, or [`AudioError::BackendUnavailable`] if the
    /// rendered signal is not finite.
    pub fn resynthesize(&self, samples: &[f64], sample_rate: u32, contour: &PitchContour) -> AudioResult<Vec<f64>> {
        let frames = self.analyze(samples, sample_rate, contour)?;
        let output = self.synthesize(contour, &frames, sample_rate)?;
        if output.iter().any(|s| !s.is_finite()) {
            return Err(AudioError::unavailable("synthesis", "non-finite output"));
        }
        debug!(
            fft_size = self.fft_size(),
            frames = frames.len(),
            samples = output.len(),
            "resynthesized"
        );
        Ok(output)
    }
}
