//! Note events and note sequences.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Reference pitch for equal-tempered tuning (A4).
pub const A4_HZ: f64 = 440.0;

/// MIDI note number of A4.
pub const A4_MIDI: u8 = 69;

/// A single sounding note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoteEvent {
    /// MIDI note number (semitones, 60 = middle C).
    pub pitch: u8,
    /// Loudness, 0-127.
    pub velocity: u8,
    /// Onset in seconds.
    pub start: f64,
    /// Release in seconds. Always greater than `start`.
    pub end: f64,
}

impl NoteEvent {
    /// Creates a note event.
    pub fn new(pitch: u8, velocity: u8, start: f64, end: f64) -> Self {
        Self {
            pitch,
            velocity,
            start,
            end,
        }
    }

    /// Length of the note in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Returns true if `time` lies within `[start, end]` (both ends inclusive).
    pub fn covers(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

/// An ordered sequence of notes played by one instrument at one tempo.
///
/// Notes are kept in generation order. Start times are non-decreasing in that
/// order, but chord notes share a start, so the list is not sorted by any key
/// other than insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoteSequence {
    /// Tempo in beats per minute.
    pub tempo: u32,
    /// General MIDI program number.
    pub instrument: u8,
    /// Percussion sequences never act as pitch sources.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_drum: bool,
    /// Notes in generation order.
    pub notes: Vec<NoteEvent>,
}

impl NoteSequence {
    /// Creates an empty melodic sequence.
    pub fn new(tempo: u32, instrument: u8) -> Self {
        Self {
            tempo,
            instrument,
            is_drum: false,
            notes: Vec::new(),
        }
    }

    /// Appends a note.
    pub fn push(&mut self, note: NoteEvent) {
        self.notes.push(note);
    }

    /// Latest note release time in seconds (0 for an empty sequence).
    pub fn end_time(&self) -> f64 {
        self.notes.iter().map(|n| n.end).fold(0.0_f64, f64::max)
    }

    /// Length of one beat in seconds.
    pub fn beat_seconds(&self) -> f64 {
        60.0 / self.tempo as f64
    }

    /// Checks the structural invariants of the sequence.
    pub fn validate(&self) -> SpecResult<()> {
        if self.tempo == 0 {
            return Err(SpecError::InvalidSequence("tempo must be > 0".to_string()));
        }
        if self.instrument > 127 {
            return Err(SpecError::InvalidSequence(format!(
                "instrument {} out of range 0-127",
                self.instrument
            )));
        }

        let mut last_start = 0.0_f64;
        for (i, note) in self.notes.iter().enumerate() {
            if note.pitch > 127 || note.velocity > 127 {
                return Err(SpecError::InvalidSequence(format!(
                    "note {}: pitch/velocity out of range 0-127",
                    i
                )));
            }
            if !note.start.is_finite() || !note.end.is_finite() || note.start < 0.0 {
                return Err(SpecError::InvalidSequence(format!(
                    "note {}: start must be finite and >= 0",
                    i
                )));
            }
            if note.end <= note.start {
                return Err(SpecError::InvalidSequence(format!(
                    "note {}: end {} must be greater than start {}",
                    i, note.end, note.start
                )));
            }
            if note.start < last_start {
                return Err(SpecError::InvalidSequence(format!(
                    "note {}: start {} precedes previous start {}",
                    i, note.start, last_start
                )));
            }
            last_start = note.start;
        }

        Ok(())
    }
}

/// Converts a MIDI note number to frequency in Hz (A4 = 440 Hz).
///
/// # Examples
/// ```
/// use songsmith_spec::midi_to_hz;
///
/// assert!((midi_to_hz(69) - 440.0).abs() < 1e-9);
/// assert!((midi_to_hz(81) - 880.0).abs() < 1e-9);
/// ```
pub fn midi_to_hz(pitch: u8) -> f64 {
    A4_HZ * 2.0_f64.powf((pitch as f64 - A4_MIDI as f64) / 12.0)
}
