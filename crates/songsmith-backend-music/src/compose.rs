//! Prompt-seeded composition engine.
//!
//! A composition is a chord intro (the mood's voicings in shuffled order, each
//! held for 2, 3, or 4 beats) followed by a melody drawn from the mood's scale
//! until the time cursor reaches [`MELODY_TARGET_SECONDS`]. The final melody
//! note may run past the target; that overshoot is kept.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Pcg32;
use songsmith_spec::{EmotionProfile, GenreProfile, NoteEvent, NoteSequence, Scale};
use tracing::debug;

use crate::rng::create_prompt_rng;

/// The melody loop runs until the cursor reaches this many seconds.
pub const MELODY_TARGET_SECONDS: f64 = 60.0;

/// Velocity of every intro chord note.
pub const INTRO_VELOCITY: u8 = 70;

/// Chord lengths, in beats.
const CHORD_BEATS: [u32; 3] = [2, 3, 4];

/// A composed sequence together with the choices that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// The composed notes.
    pub sequence: NoteSequence,
    /// Final cursor position in seconds, rounded to 2 decimals.
    pub duration_seconds: f64,
    /// Resolved genre table key.
    pub genre: &'static str,
    /// Resolved emotion table key.
    pub emotion: &'static str,
    /// Scale the melody was drawn from.
    pub scale: Scale,
    /// Number of intro notes at the head of `sequence.notes`.
    pub intro_len: usize,
}

impl Composition {
    /// Intro chord notes.
    pub fn intro(&self) -> &[NoteEvent] {
        &self.sequence.notes[..self.intro_len]
    }

    /// Main melody notes.
    pub fn melody(&self) -> &[NoteEvent] {
        &self.sequence.notes[self.intro_len..]
    }
}

/// Composes a sequence for a prompt, mood, and genre.
///
/// The generator is seeded from the normalized prompt, so identical prompts
/// always compose identical sequences. Unknown moods and genres resolve to
/// the neutral/default tables.
pub fn compose(prompt: &str, emotion: &str, genre: &str) -> Composition {
    let mut rng = create_prompt_rng(prompt);
    compose_with_rng(
        &mut rng,
        EmotionProfile::by_name(emotion),
        GenreProfile::by_name(genre),
    )
}

/// Composes with an explicit generator and resolved profiles.
pub fn compose_with_rng(
    rng: &mut Pcg32,
    emotion: &EmotionProfile,
    genre: &GenreProfile,
) -> Composition {
    let tempo = rng.gen_range(genre.tempo.0..=genre.tempo.1);
    let mut sequence = NoteSequence::new(tempo, genre.instrument);

    let mut cursor = write_intro(rng, emotion, sequence.beat_seconds(), &mut sequence);
    let intro_len = sequence.notes.len();

    cursor = write_melody(rng, emotion.scale, genre, cursor, &mut sequence);

    let duration_seconds = round2(cursor);
    debug!(
        tempo,
        genre = genre.name,
        emotion = emotion.name,
        notes = sequence.notes.len(),
        duration_seconds,
        "composed sequence"
    );

    Composition {
        sequence,
        duration_seconds,
        genre: genre.name,
        emotion: emotion.name,
        scale: emotion.scale,
        intro_len,
    }
}

/// Writes the chord intro starting at t = 0 and returns the cursor after it.
fn write_intro(
    rng: &mut Pcg32,
    emotion: &EmotionProfile,
    beat: f64,
    sequence: &mut NoteSequence,
) -> f64 {
    let mut chords: Vec<&[u8]> = emotion.chords.to_vec();
    chords.shuffle(rng);

    let mut cursor = 0.0;
    for chord in chords {
        let beats = CHORD_BEATS[rng.gen_range(0..CHORD_BEATS.len())];
        let duration = beat * beats as f64;
        for &pitch in chord {
            sequence.push(NoteEvent::new(
                pitch,
                INTRO_VELOCITY,
                cursor,
                cursor + duration,
            ));
        }
        cursor += duration;
    }
    cursor
}

/// Writes melody notes from `cursor` until the target is reached; returns the
/// final cursor.
fn write_melody(
    rng: &mut Pcg32,
    scale: Scale,
    genre: &GenreProfile,
    mut cursor: f64,
    sequence: &mut NoteSequence,
) -> f64 {
    let pitches = scale.pitches();
    let (gap_lo, gap_hi) = genre.melody_gap;

    while cursor < MELODY_TARGET_SECONDS {
        let degree = pitches[rng.gen_range(0..pitches.len())];
        let octave = genre.octaves[rng.gen_range(0..genre.octaves.len())];
        let pitch = (degree as i16 + octave as i16).clamp(0, 127) as u8;

        // Half-open range bounded below by a positive gap, so the loop advances.
        let duration = rng.gen_range(gap_lo..gap_hi);
        let velocity = rng.gen_range(genre.velocity.0..=genre.velocity.1);

        sequence.push(NoteEvent::new(pitch, velocity, cursor, cursor + duration));
        cursor += duration;
    }
    cursor
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compose_is_deterministic() {
        let a = compose("moonlit harbor", "sad", "lofi");
        let b = compose("moonlit harbor", "sad", "lofi");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_normalization_applies() {
        let a = compose("Moonlit Harbor", "sad", "lofi");
        let b = compose("  moonlit harbor\n", "sad", "lofi");
        assert_eq!(a.sequence, b.sequence);
    }

    #[test]
    fn test_different_prompts_differ() {
        let a = compose("moonlit harbor", "happy", "pop");
        let b = compose("sunlit meadow", "happy", "pop");
        assert_ne!(a.sequence, b.sequence);
    }

    #[test]
    fn test_intro_uses_every_chord_once() {
        let c = compose("chord check", "happy", "pop");
        let profile = EmotionProfile::HAPPY;
        let expected: usize = profile.chords.iter().map(|ch| ch.len()).sum();
        assert_eq!(c.intro_len, expected);

        let mut seen: Vec<Vec<u8>> = c
            .intro()
            .chunks(3)
            .map(|chunk| chunk.iter().map(|n| n.pitch).collect())
            .collect();
        seen.sort();
        let mut want: Vec<Vec<u8>> = profile.chords.iter().map(|ch| ch.to_vec()).collect();
        want.sort();
        assert_eq!(seen, want);
    }

    #[test]
    fn test_intro_chord_lengths_are_beat_multiples() {
        let c = compose("beat multiples", "happy", "classical");
        let beat = c.sequence.beat_seconds();
        for chunk in c.intro().chunks(3) {
            let first = chunk[0];
            assert!(chunk.iter().all(|n| n.start == first.start && n.end == first.end));
            let beats = first.duration() / beat;
            assert!(
                [2.0, 3.0, 4.0].iter().any(|b| (beats - b).abs() < 1e-9),
                "chord spans {} beats",
                beats
            );
            assert!(chunk.iter().all(|n| n.velocity == INTRO_VELOCITY));
        }
    }

    #[test]
    fn test_melody_is_contiguous_and_in_range() {
        let c = compose("contiguity", "sad", "classical");
        let genre = GenreProfile::CLASSICAL;
        let melody = c.melody();
        assert!(!melody.is_empty());

        let intro_end = c.intro().last().map(|n| n.end).unwrap();
        assert_eq!(melody[0].start, intro_end);

        for pair in melody.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for note in melody {
            let d = note.duration();
            assert!(d >= genre.melody_gap.0 && d < genre.melody_gap.1);
            assert!(note.velocity >= genre.velocity.0 && note.velocity <= genre.velocity.1);
            let base_ok = Scale::Minor.pitches().iter().any(|&p| {
                genre
                    .octaves
                    .iter()
                    .any(|&o| p as i16 + o as i16 == note.pitch as i16)
            });
            assert!(base_ok, "pitch {} not in scale/octave set", note.pitch);
        }
    }

    #[test]
    fn test_duration_overshoot_bounded_by_one_note() {
        for prompt in ["a", "b", "c", "d", "e"] {
            let c = compose(prompt, "happy", "lofi");
            let last = c.sequence.notes.last().copied().unwrap();
            assert!(last.start < MELODY_TARGET_SECONDS);
            assert!(last.end >= MELODY_TARGET_SECONDS);
            assert!(c.duration_seconds >= MELODY_TARGET_SECONDS);
            assert!(c.duration_seconds <= MELODY_TARGET_SECONDS + GenreProfile::LOFI.melody_gap.1);
            assert_eq!(c.duration_seconds, round2(c.sequence.end_time()));
        }
    }

    #[test]
    fn test_every_note_has_positive_length() {
        for genre in ["lofi", "pop", "classical", "unknown"] {
            for mood in ["happy", "sad", "calm", "angry", "whatever"] {
                let c = compose("positive lengths", mood, genre);
                assert!(c.sequence.notes.iter().all(|n| n.end > n.start));
                c.sequence.validate().unwrap();
            }
        }
    }

    #[test]
    fn test_empty_prompt_is_deterministic() {
        let a = compose("", "calm", "pop");
        let b = compose("   ", "calm", "pop");
        assert_eq!(a.sequence, b.sequence);
    }

    #[test]
    fn test_unknown_profiles_resolve_to_defaults() {
        let c = compose("fallbacks", "bewildered", "polka");
        assert_eq!(c.genre, "default");
        assert_eq!(c.emotion, "neutral");
        assert_eq!(c.intro_len, 3);
        assert_eq!(c.sequence.instrument, GenreProfile::LOFI.instrument);
    }

    #[test]
    fn test_compose_with_rng_matches_seeded_generator() {
        let mut rng1 = create_rng(1234);
        let mut rng2 = create_rng(1234);
        let a = compose_with_rng(&mut rng1, &EmotionProfile::CALM, &GenreProfile::POP);
        let b = compose_with_rng(&mut rng2, &EmotionProfile::CALM, &GenreProfile::POP);
        assert_eq!(a, b);
        assert!((90..=120).contains(&a.sequence.tempo));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(60.123_4), 60.12);
        assert_eq!(round2(60.125_1), 60.13);
    }
}
