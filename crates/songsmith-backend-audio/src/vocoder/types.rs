//! Spectral analysis result.

use crate::error::{AudioError, AudioResult};

/// Per-frame spectral envelope and aperiodicity at one FFT size.
///
/// Both matrices have one row per frame of the shared grid and
/// `fft_size / 2 + 1` columns. Construction rejects anything else, so
/// synthesis never sees mixed analysis sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrames {
    fft_size: usize,
    envelope: Vec<Vec<f64>>,
    aperiodicity: Vec<Vec<f64>>,
}

impl SpectralFrames {
    /// Bundles analysis results, checking shapes.
    pub fn new(fft_size: usize, envelope: Vec<Vec<f64>>, aperiodicity: Vec<Vec<f64>>) -> AudioResult<Self> {
        let bins = fft_size / 2 + 1;
        if envelope.len() != aperiodicity.len() {
            return Err(AudioError::FrameGridMismatch {
                expected: envelope.len(),
                actual: aperiodicity.len(),
            });
        }
        for (env, ap) in envelope.iter().zip(&aperiodicity) {
            if env.len() != bins || ap.len() != bins {
                return Err(AudioError::AnalysisSizeMismatch {
                    envelope: env.len(),
                    aperiodicity: ap.len(),
                });
            }
        }
        Ok(Self {
            fft_size,
            envelope,
            aperiodicity,
        })
    }

    /// FFT size used by every row.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Bins per row.
    pub fn bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.envelope.len()
    }

    /// Returns true if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.envelope.is_empty()
    }

    /// Power spectral envelope rows.
    pub fn envelope(&self) -> &[Vec<f64>] {
        &self.envelope
    }

    /// Aperiodicity rows, each value in [0, 1].
    pub fn aperiodicity(&self) -> &[Vec<f64>] {
        &self.aperiodicity
    }

    /// Envelope and aperiodicity of one frame.
    pub fn frame(&self, index: usize) -> (&[f64], &[f64]) {
        (&self.envelope[index], &self.aperiodicity[index])
    }
}
