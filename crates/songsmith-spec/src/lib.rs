//! Songsmith Data Model
//!
//! This crate provides the types shared by the composition and vocal backends:
//! note sequences, the genre/emotion profile tables, the pitch-contour frame grid,
//! vocal pipeline configuration, and canonical hashing / seed derivation.
//!
//! # Example
//!
//! ```
//! use songsmith_spec::{EmotionProfile, GenreProfile, Scale};
//! use songsmith_spec::hash::prompt_seed;
//!
//! let genre = GenreProfile::by_name("classical");
//! assert_eq!(genre.instrument, 40);
//!
//! let emotion = EmotionProfile::by_name("calm");
//! assert_eq!(emotion.scale, Scale::Major);
//!
//! // Same prompt (modulo case/whitespace) -> same seed
//! assert_eq!(prompt_seed("  A Calm Evening "), prompt_seed("a calm evening"));
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error types and the [`BackendError`] reporting trait
//! - [`note`]: Note events and note sequences
//! - [`profile`]: Genre, emotion, and scale tables
//! - [`contour`]: Frame grid and pitch contour
//! - [`config`]: Vocal pipeline configuration
//! - [`artifact`]: Persisted note artifact (JSON)
//! - [`fsutil`]: Atomic file writes
//! - [`hash`]: Canonical hashing and prompt seed derivation

pub mod artifact;
pub mod config;
pub mod contour;
pub mod error;
pub mod fsutil;
pub mod hash;
pub mod note;
pub mod profile;

// Re-export commonly used types at the crate root
pub use artifact::{read_note_artifact, write_note_artifact, NOTE_ARTIFACT_VERSION};
pub use config::{EchoTap, VocalConfig};
pub use contour::{FrameGrid, PitchContour};
pub use error::{BackendError, SpecError, SpecResult};
pub use hash::{canonical_sequence_hash, normalize_prompt, prompt_seed};
pub use note::{midi_to_hz, NoteEvent, NoteSequence};
pub use profile::{EmotionProfile, GenreProfile, Scale};
