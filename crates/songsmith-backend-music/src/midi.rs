// Standard MIDI File export.
//
// Writes a NoteSequence as SMF format 0: one track holding the tempo meta
// event, a program change for the instrument, and note on/off pairs. Note
// times are converted from seconds to ticks at the sequence tempo. This file
// feeds the external instrumental renderer; the JSON note artifact stays the
// lossless source of truth.

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use songsmith_spec::NoteSequence;

use crate::error::{MusicError, MusicResult};

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// General MIDI percussion channel (zero-based).
const DRUM_CHANNEL: u8 = 9;

/// Encodes a sequence as SMF bytes.
pub fn sequence_to_midi_bytes(sequence: &NoteSequence) -> MusicResult<Vec<u8>> {
    let smf = sequence_to_smf(sequence);
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| MusicError::Midi(e.to_string()))?;
    Ok(buf)
}

/// Converts seconds to ticks at a fixed tempo.
pub fn seconds_to_ticks(seconds: f64, tempo: u32) -> u32 {
    let beats = seconds * tempo as f64 / 60.0;
    (beats * TICKS_PER_QUARTER as f64).round().max(0.0) as u32
}

#[derive(Debug, Clone, Copy)]
struct TimedEvent {
    tick: u32,
    // Note-offs sort before note-ons on the same tick.
    is_on: bool,
    pitch: u8,
    velocity: u8,
}

fn sequence_to_smf(sequence: &NoteSequence) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let channel = u4::new(if sequence.is_drum { DRUM_CHANNEL } else { 0 });
    let tempo_microseconds = 60_000_000 / sequence.tempo.max(1);

    let mut track: Track<'static> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(sequence.instrument.min(127)),
            },
        },
    });

    let mut events: Vec<TimedEvent> = Vec::with_capacity(sequence.notes.len() * 2);
    for note in &sequence.notes {
        let on = seconds_to_ticks(note.start, sequence.tempo);
        // Keep at least one tick so a very short note still sounds.
        let off = seconds_to_ticks(note.end, sequence.tempo).max(on + 1);
        events.push(TimedEvent {
            tick: on,
            is_on: true,
            pitch: note.pitch.min(127),
            velocity: note.velocity.min(127),
        });
        events.push(TimedEvent {
            tick: off,
            is_on: false,
            pitch: note.pitch.min(127),
            velocity: 0,
        });
    }
    events.sort_by_key(|e| (e.tick, e.is_on));

    let mut last_tick = 0u32;
    for event in events {
        let delta = event.tick - last_tick;
        last_tick = event.tick;
        let message = if event.is_on {
            MidiMessage::NoteOn {
                key: u7::new(event.pitch),
                vel: u7::new(event.velocity),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(event.pitch),
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi { channel, message },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    smf
}

#[cfg(test)]
mod tests {
    use super::*;
    use songsmith_spec::NoteEvent;

    fn two_note_sequence() -> NoteSequence {
        let mut seq = NoteSequence::new(120, 40);
        seq.push(NoteEvent::new(60, 70, 0.0, 0.5));
        seq.push(NoteEvent::new(64, 90, 0.5, 1.0));
        seq
    }

    #[test]
    fn test_seconds_to_ticks() {
        // At 120 BPM one beat is half a second.
        assert_eq!(seconds_to_ticks(0.5, 120), 480);
        assert_eq!(seconds_to_ticks(1.0, 60), 480);
        assert_eq!(seconds_to_ticks(0.0, 100), 0);
    }

    #[test]
    fn test_smf_has_one_track_with_all_events() {
        let smf = sequence_to_smf(&two_note_sequence());
        assert_eq!(smf.tracks.len(), 1);
        // tempo + program + 2 * (on + off) + end of track
        assert_eq!(smf.tracks[0].len(), 7);
    }

    #[test]
    fn test_note_off_precedes_note_on_at_shared_tick() {
        let smf = sequence_to_smf(&two_note_sequence());
        let kinds: Vec<&TrackEventKind> = smf.tracks[0].iter().map(|e| &e.kind).collect();
        assert!(matches!(
            kinds[3],
            TrackEventKind::Midi {
                message: MidiMessage::NoteOff { .. },
                ..
            }
        ));
        assert!(matches!(
            kinds[4],
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_bytes_start_with_header_and_parse_back() {
        let bytes = sequence_to_midi_bytes(&two_note_sequence()).unwrap();
        assert_eq!(&bytes[0..4], b"MThd");
        let parsed = Smf::parse(&bytes).unwrap();
        assert_eq!(parsed.tracks.len(), 1);
        assert_eq!(parsed.header.format, Format::SingleTrack);
    }

    #[test]
    fn test_drum_sequence_uses_channel_ten() {
        let mut seq = two_note_sequence();
        seq.is_drum = true;
        let smf = sequence_to_smf(&seq);
        let on_channel = smf.tracks[0].iter().find_map(|e| match &e.kind {
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn { .. },
            } => Some(channel.as_int()),
            _ => None,
        });
        assert_eq!(on_channel, Some(9));
    }
}
