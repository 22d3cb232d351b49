//! Artifact writing for the `compose` pipeline entry point.

use std::fs;
use std::path::{Path, PathBuf};

use songsmith_spec::fsutil::write_atomic;
use songsmith_spec::{canonical_sequence_hash, write_note_artifact};
use tracing::{debug, info};

use crate::compose::{compose, Composition};
use crate::error::MusicResult;
use crate::midi::sequence_to_midi_bytes;

/// Files written for one composition.
#[derive(Debug, Clone)]
pub struct ComposeOutput {
    /// Lossless JSON note artifact.
    pub notes_path: PathBuf,
    /// Standard MIDI File for the instrumental renderer.
    pub midi_path: PathBuf,
    /// Realized duration in seconds, rounded to 2 decimals.
    pub duration_seconds: f64,
    /// Canonical BLAKE3 hash of the note sequence.
    pub sequence_hash: String,
    /// BLAKE3 hash of the MIDI bytes.
    pub midi_hash: String,
    /// The composition itself.
    pub composition: Composition,
}

/// Composes and writes `music_<hash>.notes.json` and `music_<hash>.mid` into `out_dir`.
///
/// File names come from the sequence hash, so the same prompt always lands on
/// the same paths. If the MIDI write fails the note artifact is removed again,
/// leaving no half-finished pair behind.
pub fn compose_to_dir(
    prompt: &str,
    emotion: &str,
    genre: &str,
    out_dir: &Path,
) -> MusicResult<ComposeOutput> {
    let composition = compose(prompt, emotion, genre);
    write_composition(composition, out_dir)
}

/// Writes an existing composition into `out_dir`.
pub fn write_composition(composition: Composition, out_dir: &Path) -> MusicResult<ComposeOutput> {
    fs::create_dir_all(out_dir)?;

    let sequence_hash = canonical_sequence_hash(&composition.sequence)?;
    let stem = format!("music_{}", &sequence_hash[..12]);
    let notes_path = out_dir.join(format!("{}.notes.json", stem));
    let midi_path = out_dir.join(format!("{}.mid", stem));

    write_note_artifact(&notes_path, &composition.sequence)?;
    debug!(path = %notes_path.display(), "wrote note artifact");

    let midi_bytes = match sequence_to_midi_bytes(&composition.sequence)
        .and_then(|bytes| write_atomic(&midi_path, &bytes).map(|_| bytes).map_err(Into::into))
    {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&notes_path);
            return Err(e);
        }
    };
    let midi_hash = blake3::hash(&midi_bytes).to_hex().to_string();

    info!(
        notes = %notes_path.display(),
        duration_seconds = composition.duration_seconds,
        "composition written"
    );

    Ok(ComposeOutput {
        notes_path,
        midi_path,
        duration_seconds: composition.duration_seconds,
        sequence_hash,
        midi_hash,
        composition,
    })
}
