//! WAV reading and deterministic writing.
//!
//! Reading goes through `hound` and accepts integer (8/16/24/32-bit) and
//! 32-bit float files with any channel count; channels are averaged to mono.
//! Writing emits a fixed 44-byte header and 16-bit PCM with no metadata, so the
//! same samples always produce the same bytes. Files are written to a sibling
//! temp file and persisted into place, so a failed write never leaves a
//! partial artifact behind.

use std::io::{self, Write};
use std::path::Path;

use songsmith_spec::fsutil::write_atomic;

use crate::error::{AudioError, AudioResult};

/// A mono signal with its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoAudio {
    /// Samples, nominally in [-1.0, 1.0].
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl MonoAudio {
    /// Creates a mono signal.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Reads a WAV file as mono f64 samples.
///
/// # Errors
/// - [`AudioError::InputMissing`] if the path does not exist
/// - [`AudioError::Wav`] if the file cannot be decoded
pub fn read_wav(path: &Path) -> AudioResult<MonoAudio> {
    if !path.exists() {
        return Err(AudioError::InputMissing {
            path: path.to_path_buf(),
        });
    }

    let wav_err = |message: String| AudioError::Wav {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = hound::WavReader::open(path).map_err(|e| wav_err(e.to_string()))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: 0 });
    }
    if spec.channels == 0 {
        return Err(wav_err("file declares zero channels".to_string()));
    }

    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let max_val = (1i64 << (bits - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<_, _>>()
                .map_err(|e| wav_err(e.to_string()))?
        }
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(|e| wav_err(e.to_string()))?,
        (format, bits) => {
            return Err(wav_err(format!(
                "unsupported sample format {:?} at {} bits",
                format, bits
            )));
        }
    };

    Ok(MonoAudio::new(
        average_channels(&interleaved, spec.channels),
        spec.sample_rate,
    ))
}

/// Averages interleaved channels down to mono.
fn average_channels(interleaved: &[f64], channels: u16) -> Vec<f64> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    let channels = channels as usize;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

/// Converts f64 samples to 16-bit PCM bytes.
///
/// Values outside [-1.0, 1.0] are clipped.
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16;
        pcm.extend_from_slice(&value.to_le_bytes());
    }
    pcm
}

/// Writes a mono 16-bit PCM WAV stream.
pub fn write_wav<W: Write>(writer: &mut W, sample_rate: u32, pcm_data: &[u8]) -> io::Result<()> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;
    let block_align = CHANNELS * BITS / 8;
    let byte_rate = sample_rate * block_align as u32;
    let data_size = pcm_data.len() as u32;

    writer.write_all(b"RIFF")?;
    writer.write_all(&(36 + data_size).to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // PCM
    writer.write_all(&CHANNELS.to_le_bytes())?;
    writer.write_all(&sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&BITS.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;
    Ok(())
}

/// Encodes a mono signal as WAV bytes.
pub fn encode_wav(audio: &MonoAudio) -> Vec<u8> {
    let pcm = samples_to_pcm16(&audio.samples);
    let mut buffer = Vec::with_capacity(44 + pcm.len());
    // Writing into a Vec cannot fail.
    let _ = write_wav(&mut buffer, audio.sample_rate, &pcm);
    buffer
}

/// Writes a mono signal to `path` atomically and returns the PCM hash.
///
/// The bytes go to a temp file in the destination directory first; it is only
/// renamed into place once fully flushed.
pub fn write_wav_file(path: &Path, audio: &MonoAudio) -> AudioResult<String> {
    if audio.sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: 0 });
    }
    let bytes = encode_wav(audio);
    write_atomic(path, &bytes)?;
    Ok(blake3::hash(&bytes[44..]).to_hex().to_string())
}
