//! Songsmith End-to-End Test Infrastructure
//!
//! Integration tests for the prompt-to-song flow:
//!
//! - **Determinism**: identical requests give byte-identical artifacts
//! - **Pipeline**: compose -> sing -> mix through the public APIs and CLI commands
//! - **Fallback**: a failing vocal backend still yields a usable waveform
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p songsmith-tests
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{verify_determinism, DeterminismResult};
pub use fixtures::{render_sine_instrumental, speech_like, SongFixture};
