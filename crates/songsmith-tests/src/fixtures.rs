//! Test fixtures: synthetic speech, a stand-in instrumental, and a song workspace.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use songsmith_backend_audio::wav::write_wav_file;
use songsmith_backend_audio::MonoAudio;
use songsmith_spec::{midi_to_hz, NoteSequence};
use tempfile::TempDir;

/// Sample rate used by all fixtures.
pub const FIXTURE_SAMPLE_RATE: u32 = 16000;

/// A gliding vowel with syllable-rate amplitude modulation.
///
/// Rises from 120 Hz to 180 Hz over `seconds`, with ten harmonics, so the
/// pitch tracker and envelope estimator see something close to voiced speech.
pub fn speech_like(seconds: f64) -> Vec<f64> {
    let sr = FIXTURE_SAMPLE_RATE as f64;
    let n = (seconds * sr) as usize;
    let mut phase = 0.0;
    (0..n)
        .map(|i| {
            let t = i as f64 / sr;
            let f0 = 120.0 + 60.0 * t / seconds;
            phase += 2.0 * PI * f0 / sr;
            let env = (PI * (t * 4.0).fract()).sin().powf(0.5);
            env * (1..=10)
                .map(|h| 0.3 / h as f64 * (phase * h as f64).sin())
                .sum::<f64>()
        })
        .collect()
}

/// Renders `notes` as plain sines, truncated to `seconds`.
///
/// Stands in for the external instrumental renderer so mixdown has
/// something to work on.
pub fn render_sine_instrumental(notes: &NoteSequence, seconds: f64) -> Vec<f64> {
    let sr = FIXTURE_SAMPLE_RATE as f64;
    let mut out = vec![0.0; (seconds * sr) as usize];
    for note in &notes.notes {
        let start = (note.start * sr) as usize;
        let end = ((note.end * sr) as usize).min(out.len());
        let freq = midi_to_hz(note.pitch);
        let amp = 0.1 * note.velocity as f64 / 127.0;
        for (i, sample) in out.iter_mut().enumerate().take(end).skip(start) {
            *sample += amp * (2.0 * PI * freq * (i - start) as f64 / sr).sin();
        }
    }
    out
}

/// A temporary directory holding one song's inputs and outputs.
pub struct SongFixture {
    pub root: TempDir,
}

impl SongFixture {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Writes `samples` as a 16-bit WAV at the fixture rate.
    pub fn write_wav(&self, name: &str, samples: Vec<f64>) -> PathBuf {
        let path = self.join(name);
        write_wav_file(&path, &MonoAudio::new(samples, FIXTURE_SAMPLE_RATE))
            .expect("Failed to write fixture WAV");
        path
    }

    /// Writes a speech-like recording of `seconds`.
    pub fn add_speech(&self, seconds: f64) -> PathBuf {
        self.write_wav("speech.wav", speech_like(seconds))
    }
}

impl Default for SongFixture {
    fn default() -> Self {
        Self::new()
    }
}
