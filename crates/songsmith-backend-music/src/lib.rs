//! Songsmith Music Backend - Deterministic Melody Composition
//!
//! This crate turns a prompt plus mood/genre names into a [`NoteSequence`]:
//! a chord intro followed by a one-minute monophonic melody.
//!
//! # Determinism
//!
//! The generator is a PCG32 seeded from the BLAKE3 hash of the normalized
//! prompt. A fresh generator is created for every call and threaded through
//! each composition step, so identical arguments always give bit-identical
//! sequences and concurrent requests share no random state.
//!
//! # Example
//!
//! ```
//! use songsmith_backend_music::compose;
//!
//! let a = compose("a calm evening", "calm", "classical");
//! let b = compose("A calm evening ", "calm", "classical");
//! assert_eq!(a.sequence, b.sequence);
//! assert!(a.duration_seconds >= 60.0);
//! ```
//!
//! # Module Structure
//!
//! - [`compose`](mod@compose): The composition engine
//! - [`midi`]: Standard MIDI File export
//! - [`output`]: Artifact writing for the pipeline entry point
//! - [`rng`]: Seeded generator construction

pub mod compose;
pub mod error;
pub mod midi;
pub mod output;
pub mod rng;

pub use compose::{compose, compose_with_rng, Composition, MELODY_TARGET_SECONDS};
pub use error::{MusicError, MusicResult};
pub use output::{compose_to_dir, ComposeOutput};
pub use songsmith_spec::NoteSequence;

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier.
pub const BACKEND_ID: &str = "songsmith-backend-music";
