//! Error types for the music backend.
//!
//! Composition itself is total; only writing artifacts can fail.

use songsmith_spec::{BackendError, SpecError};
use thiserror::Error;

/// Result type for music operations.
pub type MusicResult<T> = Result<T, MusicError>;

/// Errors that can occur while persisting a composition.
#[derive(Debug, Error)]
pub enum MusicError {
    /// Note artifact could not be written.
    #[error("note artifact error: {0}")]
    Artifact(#[from] SpecError),

    /// MIDI encoding failed.
    #[error("MIDI encoding error: {0}")]
    Midi(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError for MusicError {
    fn code(&self) -> &'static str {
        match self {
            MusicError::Artifact(_) => "MUSIC_001",
            MusicError::Midi(_) => "MUSIC_002",
            MusicError::Io(_) => "MUSIC_003",
        }
    }

    fn category(&self) -> &'static str {
        "music"
    }
}
