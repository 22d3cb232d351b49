//! Speech-to-singing pipeline.
//!
//! [`resynthesize_vocal`] loads the speech and note artifact, renders the vocal
//! and writes it. Rendering goes through [`render_vocal`], the only place a
//! failure turns into the ambience fallback: whatever goes wrong inside the
//! backend, the caller gets a usable waveform and a [`VocalOutcome`] saying
//! which path produced it. Missing input files are the exception and fail the
//! request.

use std::path::{Path, PathBuf};

use songsmith_spec::{read_note_artifact, NoteSequence, VocalConfig};
use tracing::{debug, info, warn};

use crate::ambience::polish;
use crate::blend::{blend, BlendParams};
use crate::contour::extract_f0;
use crate::error::{AudioError, AudioResult};
use crate::level::{normalize_if_clipping, sanitize};
use crate::stretch::time_stretch;
use crate::target::build_target;
use crate::vocoder::SpectralResynthesizer;
use crate::wav::{read_wav, write_wav_file, MonoAudio};

/// Which path produced the vocal.
#[derive(Debug, Clone, PartialEq)]
pub enum VocalOutcome {
    /// Pitch-guided resynthesis succeeded.
    Resynthesized {
        /// Frames on the analysis grid.
        frames: usize,
        /// Frames voiced in the corrected contour.
        voiced_frames: usize,
    },
    /// Resynthesis failed; the speech was echo-polished instead.
    FallbackPolished {
        /// Why resynthesis was abandoned.
        reason: String,
    },
}

impl VocalOutcome {
    /// Returns true for the fallback path.
    pub fn is_fallback(&self) -> bool {
        matches!(self, VocalOutcome::FallbackPolished { .. })
    }
}

/// Waveform produced by a vocal backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedVocal {
    /// Output samples at the speech sample rate.
    pub samples: Vec<f64>,
    /// Frames on the analysis grid.
    pub frames: usize,
    /// Frames voiced in the corrected contour.
    pub voiced_frames: usize,
}

/// A full speech-to-singing renderer.
pub trait VocalBackend {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Renders `speech` sung along `notes`.
    fn render(&self, speech: &MonoAudio, notes: &NoteSequence, config: &VocalConfig) -> AudioResult<RenderedVocal>;
}

/// Time stretch, F0 extraction, melody blend and spectral resynthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct PitchGuidedBackend;

impl VocalBackend for PitchGuidedBackend {
    fn name(&self) -> &'static str {
        "pitch-guided"
    }

    fn render(&self, speech: &MonoAudio, notes: &NoteSequence, config: &VocalConfig) -> AudioResult<RenderedVocal> {
        let sr = speech.sample_rate;
        let stretched = time_stretch(&speech.samples, sr, config.stretch_rate)?;
        debug!(
            input = speech.samples.len(),
            output = stretched.len(),
            rate = config.stretch_rate,
            "time stretched"
        );

        let extracted = extract_f0(&stretched, sr, config)?;
        let target = build_target(notes, extracted.grid());
        let corrected = blend(&extracted, &target, &BlendParams::from_config(config))?;
        debug!(
            frames = corrected.len(),
            voiced = corrected.voiced_count(),
            alpha = config.alpha,
            "contour blended"
        );

        let vocoder = SpectralResynthesizer::from_config(config)?;
        let samples = vocoder.resynthesize(&stretched, sr, &corrected)?;
        Ok(RenderedVocal {
            samples,
            frames: corrected.len(),
            voiced_frames: corrected.voiced_count(),
        })
    }
}

/// Renders a vocal, falling back to the echo polish on any backend failure.
pub fn render_vocal<B: VocalBackend + ?Sized>(
    backend: &B,
    speech: &MonoAudio,
    notes: &NoteSequence,
    config: &VocalConfig,
) -> (MonoAudio, VocalOutcome) {
    match backend.render(speech, notes, config) {
        Ok(rendered) => (
            MonoAudio::new(rendered.samples, speech.sample_rate),
            VocalOutcome::Resynthesized {
                frames: rendered.frames,
                voiced_frames: rendered.voiced_frames,
            },
        ),
        Err(err) => fall_back(speech, config, format!("{}: {}", backend.name(), err)),
    }
}

fn fall_back(speech: &MonoAudio, config: &VocalConfig, reason: String) -> (MonoAudio, VocalOutcome) {
    warn!(%reason, "resynthesis unavailable, using ambience polish");
    let samples = polish(
        &speech.samples,
        speech.sample_rate,
        &config.echo_taps,
        config.normalize_peak,
    );
    (
        MonoAudio::new(samples, speech.sample_rate),
        VocalOutcome::FallbackPolished { reason },
    )
}

/// Result of [`resynthesize_vocal`].
#[derive(Debug, Clone, PartialEq)]
pub struct VocalReport {
    /// Which path produced the vocal.
    pub outcome: VocalOutcome,
    /// Path of the written WAV.
    pub output_path: PathBuf,
    /// Sample rate of the written WAV.
    pub sample_rate: u32,
    /// Duration of the written WAV in seconds.
    pub duration_seconds: f64,
    /// BLAKE3 hash of the PCM data.
    pub pcm_hash: String,
}

/// Turns the speech at `speech_path` into a vocal following the melody in
/// `notes_path` and writes it to `out_path`.
///
/// # Errors
/// - [`AudioError::InputMissing`] if either input file does not exist
/// - [`AudioError::Spec`] if `config` is invalid
/// - [`AudioError::Wav`] if the speech cannot be decoded
/// - [`AudioError::Io`] if the output cannot be written
///
/// Resynthesis failures are not errors; they are reported through
/// [`VocalReport::outcome`].
pub fn resynthesize_vocal(
    speech_path: &Path,
    notes_path: &Path,
    out_path: &Path,
    config: &VocalConfig,
) -> AudioResult<VocalReport> {
    resynthesize_vocal_with(&PitchGuidedBackend, speech_path, notes_path, out_path, config)
}

/// [`resynthesize_vocal`] with an explicit backend.
pub fn resynthesize_vocal_with<B: VocalBackend + ?Sized>(
    backend: &B,
    speech_path: &Path,
    notes_path: &Path,
    out_path: &Path,
    config: &VocalConfig,
) -> AudioResult<VocalReport> {
    config.validate()?;
    let speech = read_wav(speech_path)?;

    let (mut vocal, outcome) = match read_note_artifact(notes_path) {
        Ok(notes) => render_vocal(backend, &speech, &notes, config),
        Err(err) => match AudioError::from_spec(err) {
            missing @ AudioError::InputMissing { .. } => return Err(missing),
            other => fall_back(&speech, config, format!("note artifact unusable: {}", other)),
        },
    };

    let replaced = sanitize(&mut vocal.samples);
    if replaced > 0 {
        warn!(replaced, "non-finite samples replaced with silence");
    }
    normalize_if_clipping(&mut vocal.samples, config.normalize_peak);

    let pcm_hash = write_wav_file(out_path, &vocal)?;
    info!(
        path = %out_path.display(),
        fallback = outcome.is_fallback(),
        seconds = vocal.duration_seconds(),
        "vocal written"
    );

    Ok(VocalReport {
        outcome,
        output_path: out_path.to_path_buf(),
        sample_rate: vocal.sample_rate,
        duration_seconds: vocal.duration_seconds(),
        pcm_hash,
    })
}
