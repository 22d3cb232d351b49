//! Error types shared across the songsmith crates.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for data-model operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors that can occur while loading, validating, or hashing data-model values.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A required input file does not exist.
    #[error("input missing: {}", path.display())]
    InputMissing {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Artifact was written by an incompatible version.
    #[error("unsupported note artifact version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version this build understands.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },

    /// A note sequence violates a structural invariant.
    #[error("invalid note sequence: {0}")]
    InvalidSequence(String),

    /// A configuration value is out of range.
    #[error("invalid config '{name}': {message}")]
    InvalidConfig {
        /// Field name.
        name: String,
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Creates an invalid config error.
    pub fn invalid_config(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::InputMissing { .. } => "SPEC_001",
            SpecError::JsonParse(_) => "SPEC_002",
            SpecError::UnsupportedVersion { .. } => "SPEC_003",
            SpecError::InvalidSequence(_) => "SPEC_004",
            SpecError::InvalidConfig { .. } => "SPEC_005",
            SpecError::Io(_) => "SPEC_006",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}

/// Common interface for errors raised by any songsmith backend.
///
/// Gives every error a stable code and category so the CLI can report
/// failures uniformly regardless of which stage produced them.
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "AUDIO_001" or "MUSIC_002". Codes are stable.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    fn category(&self) -> &'static str;
}
