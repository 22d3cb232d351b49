//! Melody-to-frame projection.

use songsmith_spec::{midi_to_hz, FrameGrid, NoteSequence};

/// Builds the melody's target F0 on `grid`.
///
/// A frame at time `t` gets the frequency of a note when
/// `start <= t <= end`; frames covered by no note stay at 0 Hz. When notes
/// overlap, the one later in the sequence wins. Drum sequences contribute
/// nothing.
pub fn build_target(sequence: &NoteSequence, grid: &FrameGrid) -> Vec<f64> {
    let times = grid.times();
    let mut target = vec![0.0; times.len()];
    if sequence.is_drum {
        return target;
    }

    for note in &sequence.notes {
        let hz = midi_to_hz(note.pitch);
        let first = times.partition_point(|&t| t < note.start);
        for (slot, &t) in target[first..].iter_mut().zip(&times[first..]) {
            if t > note.end {
                break;
            }
            *slot = hz;
        }
    }
    target
}
