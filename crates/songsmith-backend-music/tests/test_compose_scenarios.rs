//! Composition scenarios across the genre and emotion tables.

use pretty_assertions::assert_eq;
use songsmith_backend_music::{compose, MELODY_TARGET_SECONDS};
use songsmith_spec::artifact::note_artifact_to_string;
use songsmith_spec::{canonical_sequence_hash, GenreProfile, Scale};

#[test]
fn calm_evening_classical() {
    let c = compose("a calm evening", "calm", "classical");

    assert_eq!(c.sequence.instrument, 40);
    assert!((70..=100).contains(&c.sequence.tempo), "tempo {}", c.sequence.tempo);
    assert_eq!(c.scale, Scale::Major);
    assert_eq!(c.scale.pitches(), &[60, 62, 64, 65, 67, 69, 71]);
    assert!(c.duration_seconds >= MELODY_TARGET_SECONDS);

    // Calm has two triads in the intro.
    assert_eq!(c.intro_len, 6);
    let major = Scale::Major.pitches();
    for note in c.melody() {
        let offset_ok = [-12i16, 0, 12]
            .iter()
            .any(|o| major.contains(&((note.pitch as i16 - o) as u8)));
        assert!(offset_ok, "pitch {}", note.pitch);
    }
}

#[test]
fn serialized_output_is_byte_identical() {
    let a = compose("rain on a tin roof", "sad", "pop");
    let b = compose("rain on a tin roof", "sad", "pop");

    let text_a = note_artifact_to_string(&a.sequence).unwrap();
    let text_b = note_artifact_to_string(&b.sequence).unwrap();
    assert_eq!(text_a.as_bytes(), text_b.as_bytes());
    assert_eq!(
        canonical_sequence_hash(&a.sequence).unwrap(),
        canonical_sequence_hash(&b.sequence).unwrap()
    );
}

#[test]
fn every_table_entry_terminates_past_target() {
    for genre in GenreProfile::ALL {
        for mood in ["happy", "sad", "calm", "angry", "neutral"] {
            let c = compose("table sweep", mood, genre.name);
            assert!(c.sequence.notes.iter().all(|n| n.end > n.start));
            assert!(c.duration_seconds >= MELODY_TARGET_SECONDS);
            assert!(
                c.duration_seconds <= MELODY_TARGET_SECONDS + genre.melody_gap.1 + 0.005,
                "{} / {} overshoot {}",
                genre.name,
                mood,
                c.duration_seconds
            );
            assert!(
                c.sequence.tempo >= genre.tempo.0 && c.sequence.tempo <= genre.tempo.1,
                "{} tempo {}",
                genre.name,
                c.sequence.tempo
            );
        }
    }
}

#[test]
fn start_times_non_decreasing_in_generation_order() {
    let c = compose("ordering", "happy", "classical");
    for pair in c.sequence.notes.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
}
