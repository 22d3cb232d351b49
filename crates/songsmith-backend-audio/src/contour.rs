//! F0 extraction.
//!
//! Two passes over the (already time-stretched) speech:
//!
//! 1. [`F0Tracker`] runs a cumulative-mean-normalized difference search (YIN)
//!    per frame, with parabolic interpolation for sub-sample lag accuracy.
//! 2. [`refine`] revisits the same waveform to fix octave errors, using
//!    normalized cross-correlation at the candidate lags and agreement with
//!    neighbouring frames, then drops isolated voiced frames.
//!
//! Unvoiced frames carry 0 Hz. The returned contour owns the frame grid that
//! every downstream stage must reuse.

use songsmith_spec::{FrameGrid, PitchContour, VocalConfig};
use tracing::debug;

use crate::error::{AudioError, AudioResult};

/// Dip threshold for the normalized difference function.
const YIN_THRESHOLD: f64 = 0.15;
/// Best dip above this value means unvoiced.
const VOICING_LIMIT: f64 = 0.35;
/// Frames quieter than this RMS are unvoiced.
const SILENCE_RMS: f64 = 1e-4;
/// A shorter-lag candidate wins if it scores within this fraction of the best.
const OCTAVE_PREFERENCE: f64 = 0.9;
/// Voiced neighbours considered on each side for continuity checks.
const CONTINUITY_RADIUS: usize = 5;
/// Minimum correlation for a continuity correction to be accepted.
const CONTINUITY_MIN_SCORE: f64 = 0.5;

/// Per-frame pitch tracker.
#[derive(Debug, Clone)]
pub struct F0Tracker {
    sample_rate: u32,
    frame_period: f64,
    f0_floor: f64,
    f0_ceiling: f64,
    min_lag: usize,
    max_lag: usize,
}

impl F0Tracker {
    /// Creates a tracker for the given sample rate and search range.
    pub fn new(sample_rate: u32, config: &VocalConfig) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if config.f0_ceiling * 2.0 > sample_rate as f64 {
            return Err(AudioError::invalid_param(
                "f0_ceiling",
                format!(
                    "{} Hz is above half the sample rate ({} Hz)",
                    config.f0_ceiling, sample_rate
                ),
            ));
        }
        let sr = sample_rate as f64;
        let min_lag = ((sr / config.f0_ceiling).floor() as usize).max(2);
        let max_lag = (sr / config.f0_floor).ceil() as usize;
        Ok(Self {
            sample_rate,
            frame_period: config.frame_period,
            f0_floor: config.f0_floor,
            f0_ceiling: config.f0_ceiling,
            min_lag,
            max_lag,
        })
    }

    /// Tracks F0 on the frame grid implied by the signal length.
    pub fn track(&self, samples: &[f64]) -> AudioResult<PitchContour> {
        let grid = FrameGrid::for_signal(samples.len(), self.sample_rate, self.frame_period);
        let f0 = grid
            .times()
            .iter()
            .map(|&t| self.estimate_frame(samples, self.center(t)))
            .collect();
        Ok(PitchContour::new(grid, f0)?)
    }

    fn center(&self, time: f64) -> isize {
        (time * self.sample_rate as f64).round() as isize
    }

    fn estimate_frame(&self, samples: &[f64], center: isize) -> f64 {
        let window = self.max_lag;
        let span = window + self.max_lag + 2;
        let start = center - (span / 2) as isize;
        let frame: Vec<f64> = (0..span).map(|j| sample_at(samples, start + j as isize)).collect();

        let rms = (frame.iter().map(|s| s * s).sum::<f64>() / span as f64).sqrt();
        if rms < SILENCE_RMS {
            return 0.0;
        }

        let cmnd = cumulative_mean_normalized_difference(&frame, window, self.max_lag + 1);
        let Some(lag) = self.pick_lag(&cmnd) else {
            return 0.0;
        };

        let refined = parabolic_vertex(&cmnd, lag);
        let f0 = self.sample_rate as f64 / refined;
        if f0 < self.f0_floor || f0 > self.f0_ceiling {
            0.0
        } else {
            f0
        }
    }

    fn pick_lag(&self, cmnd: &[f64]) -> Option<usize> {
        let last = self.max_lag.min(cmnd.len() - 2);
        let mut tau = self.min_lag;
        while tau <= last {
            if cmnd[tau] < YIN_THRESHOLD {
                while tau < last && cmnd[tau + 1] < cmnd[tau] {
                    tau += 1;
                }
                return Some(tau);
            }
            tau += 1;
        }

        let (best, value) = (self.min_lag..=last)
            .map(|t| (t, cmnd[t]))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        (value < VOICING_LIMIT).then_some(best)
    }
}

/// Extracts the F0 contour of `samples`.
///
/// Runs the per-frame tracker and then the octave-error refinement pass.
pub fn extract_f0(samples: &[f64], sample_rate: u32, config: &VocalConfig) -> AudioResult<PitchContour> {
    let tracker = F0Tracker::new(sample_rate, config)?;
    let raw = tracker.track(samples)?;
    let refined = refine(samples, sample_rate, &raw, config)?;
    debug!(
        frames = refined.len(),
        voiced = refined.voiced_count(),
        raw_voiced = raw.voiced_count(),
        "f0 extracted"
    );
    Ok(refined)
}

/// Corrects octave errors against the waveform and removes isolated voicing.
pub fn refine(
    samples: &[f64],
    sample_rate: u32,
    contour: &PitchContour,
    config: &VocalConfig,
) -> AudioResult<PitchContour> {
    let sr = sample_rate as f64;
    let centers: Vec<isize> = contour
        .grid()
        .times()
        .iter()
        .map(|&t| (t * sr).round() as isize)
        .collect();
    let in_range = |f: f64| f >= config.f0_floor && f <= config.f0_ceiling;

    // Octave check against the frame's own waveform.
    let mut f0: Vec<f64> = contour
        .f0()
        .iter()
        .zip(&centers)
        .map(|(&f, &c)| {
            if f <= 0.0 {
                return 0.0;
            }
            let candidates: Vec<f64> = [f * 2.0, f, f / 2.0]
                .into_iter()
                .filter(|&c| in_range(c))
                .collect();
            let window = (2.0 * sr / (f / 2.0).max(config.f0_floor)).round() as usize;
            let scores: Vec<f64> = candidates
                .iter()
                .map(|&cand| normalized_correlation(samples, c, sr / cand, window))
                .collect();
            let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            candidates
                .iter()
                .zip(&scores)
                .find(|(_, &s)| s >= OCTAVE_PREFERENCE * best)
                .map(|(&cand, _)| cand)
                .unwrap_or(f)
        })
        .collect();

    // Continuity check against neighbouring voiced frames.
    let snapshot = f0.clone();
    for i in 0..snapshot.len() {
        let f = snapshot[i];
        if f <= 0.0 {
            continue;
        }
        let Some(local) = neighbour_median(&snapshot, i, CONTINUITY_RADIUS) else {
            continue;
        };
        let ratio = f / local;
        let corrected = if (1.8..=2.2).contains(&ratio) {
            f / 2.0
        } else if (0.45..=0.55).contains(&ratio) {
            f * 2.0
        } else {
            continue;
        };
        if !in_range(corrected) {
            continue;
        }
        let window = (2.0 * sr / corrected.min(f)).round() as usize;
        if normalized_correlation(samples, centers[i], sr / corrected, window) >= CONTINUITY_MIN_SCORE {
            f0[i] = corrected;
        }
    }

    remove_isolated_voicing(&mut f0);
    Ok(contour.with_f0(f0)?)
}

/// YIN cumulative-mean-normalized difference for lags `0..lags`.
fn cumulative_mean_normalized_difference(frame: &[f64], window: usize, lags: usize) -> Vec<f64> {
    let mut cmnd = vec![1.0; lags + 1];
    let mut running = 0.0;
    for tau in 1..=lags {
        let d: f64 = (0..window)
            .map(|j| {
                let diff = frame[j] - frame.get(j + tau).copied().unwrap_or(0.0);
                diff * diff
            })
            .sum();
        running += d;
        cmnd[tau] = if running > 0.0 { d * tau as f64 / running } else { 1.0 };
    }
    cmnd
}

/// Sub-sample position of the minimum around `index`.
fn parabolic_vertex(values: &[f64], index: usize) -> f64 {
    if index == 0 || index + 1 >= values.len() {
        return index as f64;
    }
    let (a, b, c) = (values[index - 1], values[index], values[index + 1]);
    let denom = a - 2.0 * b + c;
    if denom.abs() < 1e-12 {
        return index as f64;
    }
    let shift = (0.5 * (a - c) / denom).clamp(-1.0, 1.0);
    index as f64 + shift
}

/// Normalized cross-correlation between a window centred at `center` and the
/// same window delayed by `lag` samples (fractional lags are rounded).
fn normalized_correlation(samples: &[f64], center: isize, lag: f64, window: usize) -> f64 {
    let lag = lag.round() as isize;
    let start = center - (window / 2) as isize;
    let (mut xy, mut xx, mut yy) = (0.0, 0.0, 0.0);
    for j in 0..window as isize {
        let x = sample_at(samples, start + j);
        let y = sample_at(samples, start + j + lag);
        xy += x * y;
        xx += x * x;
        yy += y * y;
    }
    let denom = (xx * yy).sqrt();
    if denom > 0.0 {
        xy / denom
    } else {
        0.0
    }
}

/// Median of voiced frames within `radius` of `index`, excluding it.
fn neighbour_median(f0: &[f64], index: usize, radius: usize) -> Option<f64> {
    let lo = index.saturating_sub(radius);
    let hi = (index + radius + 1).min(f0.len());
    let mut neighbours: Vec<f64> = (lo..hi)
        .filter(|&j| j != index && f0[j] > 0.0)
        .map(|j| f0[j])
        .collect();
    if neighbours.len() < 2 {
        return None;
    }
    neighbours.sort_by(f64::total_cmp);
    let mid = neighbours.len() / 2;
    Some(if neighbours.len() % 2 == 0 {
        0.5 * (neighbours[mid - 1] + neighbours[mid])
    } else {
        neighbours[mid]
    })
}

/// Unvoices frames whose neighbours on both sides are unvoiced.
fn remove_isolated_voicing(f0: &mut [f64]) {
    let n = f0.len();
    if n < 2 {
        return;
    }
    let isolated: Vec<usize> = (0..n)
        .filter(|&i| {
            let prev = i > 0 && f0[i - 1] > 0.0;
            let next = i + 1 < n && f0[i + 1] > 0.0;
            f0[i] > 0.0 && !prev && !next
        })
        .collect();
    for i in isolated {
        f0[i] = 0.0;
    }
}

fn sample_at(samples: &[f64], index: isize) -> f64 {
    if index < 0 {
        return 0.0;
    }
    samples.get(index as usize).copied().unwrap_or(0.0)
}
