//! Persisted note artifact.
//!
//! A note sequence is written once, as versioned JSON, and read back by the
//! instrumental renderer and the vocal pipeline. JSON floats round-trip
//! exactly, so reading an artifact yields the sequence that was written.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::fsutil::write_atomic;
use crate::note::NoteSequence;

/// Current artifact format version.
pub const NOTE_ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoteArtifact {
    version: u32,
    sequence: NoteSequence,
}

/// Serializes a sequence to the artifact JSON text.
pub fn note_artifact_to_string(sequence: &NoteSequence) -> SpecResult<String> {
    let artifact = NoteArtifact {
        version: NOTE_ARTIFACT_VERSION,
        sequence: sequence.clone(),
    };
    Ok(serde_json::to_string_pretty(&artifact)?)
}

/// Parses artifact JSON text, checking version and sequence invariants.
pub fn note_artifact_from_str(text: &str) -> SpecResult<NoteSequence> {
    let artifact: NoteArtifact = serde_json::from_str(text)?;
    if artifact.version != NOTE_ARTIFACT_VERSION {
        return Err(SpecError::UnsupportedVersion {
            expected: NOTE_ARTIFACT_VERSION,
            found: artifact.version,
        });
    }
    artifact.sequence.validate()?;
    Ok(artifact.sequence)
}

/// Writes a note artifact.
///
/// `path` either holds a complete artifact afterwards or does not exist.
pub fn write_note_artifact(path: &Path, sequence: &NoteSequence) -> SpecResult<()> {
    sequence.validate()?;
    let text = note_artifact_to_string(sequence)?;
    write_atomic(path, text.as_bytes())?;
    Ok(())
}

/// Reads a note artifact.
pub fn read_note_artifact(path: &Path) -> SpecResult<NoteSequence> {
    if !path.exists() {
        return Err(SpecError::InputMissing {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    note_artifact_from_str(&text)
}
