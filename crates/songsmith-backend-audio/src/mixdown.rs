//! Vocal-over-instrumental mixdown.

use std::path::Path;

use tracing::info;

use crate::error::{AudioError, AudioResult};
use crate::level::{db_to_gain, normalize_if_clipping};
use crate::wav::{read_wav, write_wav_file, MonoAudio};

/// Gain applied to the vocal before overlaying.
pub const VOCAL_GAIN_DB: f64 = 4.0;
/// Peak level when the mix has to be scaled down.
pub const MIX_NORMALIZE_PEAK: f64 = 0.98;

/// Overlays `vocal` (boosted by `vocal_gain_db`) on `instrumental`.
///
/// The mix is as long as the longer input. It is scaled to
/// [`MIX_NORMALIZE_PEAK`] only if it would clip.
///
/// # Errors
/// [`AudioError::InvalidParameter`] if the sample rates differ.
pub fn mix(instrumental: &MonoAudio, vocal: &MonoAudio, vocal_gain_db: f64) -> AudioResult<MonoAudio> {
    if instrumental.sample_rate != vocal.sample_rate {
        return Err(AudioError::invalid_param(
            "sample_rate",
            format!(
                "instrumental is {} Hz but vocal is {} Hz",
                instrumental.sample_rate, vocal.sample_rate
            ),
        ));
    }

    let gain = db_to_gain(vocal_gain_db);
    let len = instrumental.samples.len().max(vocal.samples.len());
    let mut samples: Vec<f64> = (0..len)
        .map(|i| {
            let a = instrumental.samples.get(i).copied().unwrap_or(0.0);
            let b = vocal.samples.get(i).copied().unwrap_or(0.0);
            a + gain * b
        })
        .collect();
    normalize_if_clipping(&mut samples, MIX_NORMALIZE_PEAK);

    Ok(MonoAudio::new(samples, instrumental.sample_rate))
}

/// Reads both tracks, mixes them and writes the result. Returns the PCM hash.
///
/// # Errors
/// [`AudioError::InputMissing`] if either track is absent; any [`mix`] error.
pub fn mix_files(instrumental_path: &Path, vocal_path: &Path, out_path: &Path) -> AudioResult<String> {
    let instrumental = read_wav(instrumental_path)?;
    let vocal = read_wav(vocal_path)?;
    let mixed = mix(&instrumental, &vocal, VOCAL_GAIN_DB)?;
    let hash = write_wav_file(out_path, &mixed)?;
    info!(
        path = %out_path.display(),
        seconds = mixed.duration_seconds(),
        "mix written"
    );
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocal_boosted_by_four_db() {
        let inst = MonoAudio::new(vec![0.0; 4], 8000);
        let voc = MonoAudio::new(vec![0.1; 4], 8000);
        let out = mix(&inst, &voc, VOCAL_GAIN_DB).unwrap();
        assert!((out.samples[0] - 0.1 * db_to_gain(4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_length_is_longer_track() {
        let inst = MonoAudio::new(vec![0.1; 10], 8000);
        let voc = MonoAudio::new(vec![0.1; 4], 8000);
        assert_eq!(mix(&inst, &voc, 0.0).unwrap().samples.len(), 10);
        assert_eq!(mix(&voc, &inst, 0.0).unwrap().samples.len(), 10);
    }

    #[test]
    fn test_loud_mix_normalized() {
        let inst = MonoAudio::new(vec![0.8; 4], 8000);
        let voc = MonoAudio::new(vec![0.8; 4], 8000);
        let out = mix(&inst, &voc, VOCAL_GAIN_DB).unwrap();
        assert!(out.samples.iter().all(|&s| (s - 0.98).abs() < 1e-12));
    }

    #[test]
    fn test_sample_rate_mismatch() {
        let inst = MonoAudio::new(vec![0.0; 4], 8000);
        let voc = MonoAudio::new(vec![0.0; 4], 16000);
        assert!(mix(&inst, &voc, VOCAL_GAIN_DB).is_err());
    }

    #[test]
    fn test_mix_files_missing_track() {
        let dir = tempfile::tempdir().unwrap();
        let err = mix_files(
            &dir.path().join("inst.wav"),
            &dir.path().join("vocal.wav"),
            &dir.path().join("mix.wav"),
        )
        .unwrap_err();
        assert!(matches!(err, AudioError::InputMissing { .. }));
    }
}
