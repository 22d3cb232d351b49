//! Songsmith Audio Backend
//!
//! This crate turns a flat speech recording into a sung vocal that follows a
//! composed melody, using a classical analysis-resynthesis vocoder.
//!
//! # Overview
//!
//! The vocal pipeline runs these stages in order:
//!
//! 1. **Time stretch** - slow the speech to 88% speed (WSOLA)
//! 2. **F0 extraction** - track pitch every 10 ms and fix octave errors
//! 3. **Target contour** - project the note sequence onto the same frame grid
//! 4. **Blend** - mix speech and melody pitch, median-smooth, floor to 0 Hz
//! 5. **Spectral analysis** - envelope and aperiodicity at one shared FFT size
//! 6. **Synthesis** - drive the vocoder with the blended contour
//!
//! The frame grid produced in step 2 is passed explicitly to every later stage.
//! If any stage fails, [`pipeline::render_vocal`] falls back to the echo
//! [`ambience::polish`] of the original speech; callers always get audio.
//!
//! # Determinism
//!
//! Given the same inputs the output is byte-identical. The only randomness,
//! the vocoder's aperiodic excitation, comes from a PCG32 with a derived seed.
//!
//! # Crate Structure
//!
//! - [`pipeline`] - Entry point with the single try/fallback boundary
//! - [`contour`] - F0 extraction and octave-error refinement
//! - [`target`] - Melody-to-frame projection
//! - [`blend`] - Contour blending, median filter, unvoiced floor
//! - [`stretch`] - WSOLA time stretching
//! - [`vocoder`] - Spectral envelope, aperiodicity, synthesis
//! - [`ambience`] - Echo polish fallback
//! - [`mixdown`] - Vocal-over-instrumental overlay
//! - [`level`] - Peak measurement and clip-safe normalization
//! - [`wav`] - WAV reading (hound) and deterministic writing

pub mod ambience;
pub mod blend;
pub mod contour;
pub mod error;
pub mod level;
pub mod mixdown;
pub mod pipeline;
pub mod rng;
pub mod stretch;
pub mod target;
pub mod vocoder;
pub mod wav;

// Re-export main types at crate root
pub use error::{AudioError, AudioResult};
pub use mixdown::{mix, mix_files};
pub use pipeline::{
    render_vocal, resynthesize_vocal, resynthesize_vocal_with, PitchGuidedBackend, RenderedVocal,
    VocalBackend, VocalOutcome, VocalReport,
};
pub use vocoder::SpectralResynthesizer;
pub use wav::MonoAudio;

/// Backend identifier.
pub const BACKEND_ID: &str = "songsmith-backend-audio";
