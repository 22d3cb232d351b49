//! Genre, emotion, and scale tables.
//!
//! The tables are fixed and immutable. Lookups never fail: an unknown genre
//! resolves to [`GenreProfile::DEFAULT`] and an unknown mood resolves to
//! [`EmotionProfile::NEUTRAL`]. Keys are matched after trimming and lowercasing.

use serde::{Deserialize, Serialize};

/// Seven-degree scale used for the main melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// C major, rooted on middle C.
    Major,
    /// C natural minor, rooted on middle C.
    Minor,
}

impl Scale {
    const MAJOR: [u8; 7] = [60, 62, 64, 65, 67, 69, 71];
    const MINOR: [u8; 7] = [60, 62, 63, 65, 67, 68, 70];

    /// Scale-degree pitches in ascending order.
    pub fn pitches(&self) -> &'static [u8; 7] {
        match self {
            Scale::Major => &Self::MAJOR,
            Scale::Minor => &Self::MINOR,
        }
    }

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
        }
    }
}

/// Timing, loudness, and instrument settings for one genre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenreProfile {
    /// Table key.
    pub name: &'static str,
    /// General MIDI program number.
    pub instrument: u8,
    /// Inclusive tempo range in BPM.
    pub tempo: (u32, u32),
    /// Range of melody inter-note durations in seconds.
    pub melody_gap: (f64, f64),
    /// Inclusive melody velocity range.
    pub velocity: (u8, u8),
    /// Octave offsets (in semitones) a melody note may be shifted by.
    pub octaves: &'static [i8],
}

impl GenreProfile {
    /// Piano, slow and soft.
    pub const LOFI: GenreProfile = GenreProfile {
        name: "lofi",
        instrument: 0,
        tempo: (60, 80),
        melody_gap: (0.5, 0.9),
        velocity: (50, 80),
        octaves: &[0],
    };

    /// Guitar, brisk and loud.
    pub const POP: GenreProfile = GenreProfile {
        name: "pop",
        instrument: 24,
        tempo: (90, 120),
        melody_gap: (0.25, 0.45),
        velocity: (80, 120),
        octaves: &[0, 12],
    };

    /// Violin over three octaves.
    pub const CLASSICAL: GenreProfile = GenreProfile {
        name: "classical",
        instrument: 40,
        tempo: (70, 100),
        melody_gap: (0.4, 0.8),
        velocity: (60, 100),
        octaves: &[-12, 0, 12],
    };

    /// Fallback for unknown genres. Shares the lofi settings.
    pub const DEFAULT: GenreProfile = GenreProfile {
        name: "default",
        ..Self::LOFI
    };

    /// All table entries in lookup order.
    pub const ALL: [GenreProfile; 4] = [Self::LOFI, Self::POP, Self::CLASSICAL, Self::DEFAULT];

    /// Looks up a profile by name, falling back to [`GenreProfile::DEFAULT`].
    pub fn by_name(name: &str) -> &'static GenreProfile {
        match name.trim().to_ascii_lowercase().as_str() {
            "lofi" => &Self::LOFI,
            "pop" => &Self::POP,
            "classical" => &Self::CLASSICAL,
            _ => &Self::DEFAULT,
        }
    }

    /// Shortest possible melody note, in seconds.
    pub fn min_gap(&self) -> f64 {
        self.melody_gap.0
    }
}

/// Harmonic settings for one mood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionProfile {
    /// Table key.
    pub name: &'static str,
    /// Intro chord voicings; each entry is a set of simultaneous pitches.
    pub chords: &'static [&'static [u8]],
    /// Scale for the main melody.
    pub scale: Scale,
}

impl EmotionProfile {
    /// Bright major triads.
    pub const HAPPY: EmotionProfile = EmotionProfile {
        name: "happy",
        chords: &[&[60, 64, 67], &[62, 65, 69], &[67, 71, 74]],
        scale: Scale::Major,
    };

    /// Minor and diminished colour.
    pub const SAD: EmotionProfile = EmotionProfile {
        name: "sad",
        chords: &[&[60, 63, 67], &[62, 65, 68]],
        scale: Scale::Minor,
    };

    /// Tonic and subdominant.
    pub const CALM: EmotionProfile = EmotionProfile {
        name: "calm",
        chords: &[&[60, 64, 67], &[65, 69, 72]],
        scale: Scale::Major,
    };

    /// Minor tonic against a diminished leading-tone chord.
    pub const ANGRY: EmotionProfile = EmotionProfile {
        name: "angry",
        chords: &[&[60, 63, 67], &[59, 62, 65]],
        scale: Scale::Minor,
    };

    /// Fallback for unknown moods: a single C major triad.
    pub const NEUTRAL: EmotionProfile = EmotionProfile {
        name: "neutral",
        chords: &[&[60, 64, 67]],
        scale: Scale::Major,
    };

    /// All table entries in lookup order.
    pub const ALL: [EmotionProfile; 5] = [
        Self::HAPPY,
        Self::SAD,
        Self::CALM,
        Self::ANGRY,
        Self::NEUTRAL,
    ];

    /// Looks up a profile by mood name, falling back to [`EmotionProfile::NEUTRAL`].
    pub fn by_name(name: &str) -> &'static EmotionProfile {
        match name.trim().to_ascii_lowercase().as_str() {
            "happy" => &Self::HAPPY,
            "sad" => &Self::SAD,
            "calm" => &Self::CALM,
            "angry" => &Self::ANGRY,
            _ => &Self::NEUTRAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_genre_resolves_to_default() {
        let profile = GenreProfile::by_name("polka");
        assert_eq!(profile.name, "default");
        assert_eq!(profile.instrument, GenreProfile::LOFI.instrument);
        assert_eq!(profile.tempo, GenreProfile::LOFI.tempo);
    }

    #[test]
    fn test_genre_lookup_normalizes_key() {
        assert_eq!(GenreProfile::by_name("  Classical ").name, "classical");
        assert_eq!(GenreProfile::by_name("POP").instrument, 24);
    }

    #[test]
    fn test_unknown_mood_resolves_to_neutral() {
        let profile = EmotionProfile::by_name("melancholic");
        assert_eq!(profile.name, "neutral");
        assert_eq!(profile.chords.len(), 1);
        assert_eq!(profile.scale, Scale::Major);
    }

    #[test]
    fn test_scale_by_mood() {
        assert_eq!(EmotionProfile::by_name("sad").scale, Scale::Minor);
        assert_eq!(EmotionProfile::by_name("angry").scale, Scale::Minor);
        assert_eq!(EmotionProfile::by_name("happy").scale, Scale::Major);
        assert_eq!(EmotionProfile::by_name("calm").scale, Scale::Major);
    }

    #[test]
    fn test_scales_are_ascending() {
        for scale in [Scale::Major, Scale::Minor] {
            let pitches = scale.pitches();
            assert!(pitches.windows(2).all(|w| w[0] < w[1]), "{:?}", scale);
        }
    }

    #[test]
    fn test_genre_gaps_strictly_positive() {
        for profile in GenreProfile::ALL {
            assert!(profile.min_gap() > 0.0, "{}", profile.name);
            assert!(profile.melody_gap.0 < profile.melody_gap.1);
            assert!(profile.tempo.0 <= profile.tempo.1);
            assert!(!profile.octaves.is_empty());
        }
    }

    #[test]
    fn test_every_mood_has_chords() {
        for profile in EmotionProfile::ALL {
            assert!(!profile.chords.is_empty(), "{}", profile.name);
            assert!(profile.chords.iter().all(|c| !c.is_empty()));
        }
    }
}
