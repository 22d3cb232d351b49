//! Error types for audio backend.

use std::path::PathBuf;

use songsmith_spec::{BackendError, SpecError};
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur during vocal processing.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A required input file does not exist.
    #[error("input missing: {}", path.display())]
    InputMissing {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// A resynthesis stage cannot run on this input.
    #[error("{stage} unavailable: {message}")]
    BackendUnavailable {
        /// Stage name.
        stage: &'static str,
        /// Error message.
        message: String,
    },

    /// Two stages disagree on the frame grid.
    #[error("frame grid mismatch: expected {expected} frames, got {actual}")]
    FrameGridMismatch {
        /// Frames on the canonical grid.
        expected: usize,
        /// Frames supplied.
        actual: usize,
    },

    /// Spectral frames were produced with differing analysis sizes.
    #[error("analysis size mismatch: envelope uses {envelope} bins, aperiodicity {aperiodicity}")]
    AnalysisSizeMismatch {
        /// Bins per envelope frame.
        envelope: usize,
        /// Bins per aperiodicity frame.
        aperiodicity: usize,
    },

    /// Frames analysed at one FFT size were handed to a resynthesizer of another.
    #[error("FFT size mismatch: frames were analysed at {frames}, resynthesizer uses {resynthesizer}")]
    FftSizeMismatch {
        /// FFT size the frames were analysed with.
        frames: usize,
        /// FFT size of the resynthesizer.
        resynthesizer: usize,
    },

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// WAV decoding error.
    #[error("WAV error in '{}': {message}", path.display())]
    Wav {
        /// File being read.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Note artifact or config error.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a backend-unavailable error for a stage.
    pub fn unavailable(stage: &'static str, message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            stage,
            message: message.into(),
        }
    }

    /// Lifts a data-model error, keeping missing inputs as [`AudioError::InputMissing`].
    pub fn from_spec(err: SpecError) -> Self {
        match err {
            SpecError::InputMissing { path } => Self::InputMissing { path },
            other => Self::Spec(other),
        }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::InputMissing { .. } => "AUDIO_001",
            AudioError::BackendUnavailable { .. } => "AUDIO_002",
            AudioError::FrameGridMismatch { .. } => "AUDIO_003",
            AudioError::AnalysisSizeMismatch { .. } => "AUDIO_004",
            AudioError::InvalidSampleRate { .. } => "AUDIO_005",
            AudioError::InvalidParameter { .. } => "AUDIO_006",
            AudioError::Wav { .. } => "AUDIO_007",
            AudioError::Spec(_) => "AUDIO_008",
            AudioError::Io(_) => "AUDIO_009",
            AudioError::FftSizeMismatch { .. } => "AUDIO_010",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_helper() {
        let err = AudioError::invalid_param("alpha", "must be between 0 and 1");
        assert!(err.to_string().contains("alpha"));
        assert!(err.to_string().contains("between 0 and 1"));
    }

    #[test]
    fn test_unavailable_names_stage() {
        let err = AudioError::unavailable("spectral envelope", "signal shorter than one frame");
        assert!(err.to_string().starts_with("spectral envelope unavailable"));
        assert_eq!(err.code(), "AUDIO_002");
    }

    #[test]
    fn test_fft_size_mismatch_names_both_sizes() {
        let err = AudioError::FftSizeMismatch {
            frames: 512,
            resynthesizer: 1024,
        };
        let message = err.to_string();
        assert!(message.contains("analysed at 512"));
        assert!(message.contains("resynthesizer uses 1024"));
        assert_eq!(err.code(), "AUDIO_010");
    }

    #[test]
    fn test_from_spec_keeps_input_missing() {
        let err = AudioError::from_spec(SpecError::InputMissing {
            path: PathBuf::from("song.notes.json"),
        });
        assert!(matches!(err, AudioError::InputMissing { .. }));
    }
}
