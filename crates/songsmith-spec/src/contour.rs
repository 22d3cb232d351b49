//! Frame grid and pitch contour.
//!
//! The frame grid is produced once, by F0 extraction, and then handed to every
//! later stage (target building, blending, spectral analysis, synthesis). No
//! stage re-derives frame times on its own.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Uniformly spaced analysis frame times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameGrid {
    /// Distance between frames in seconds.
    frame_period: f64,
    /// Frame centre times in seconds, starting at 0.
    times: Vec<f64>,
}

impl FrameGrid {
    /// Creates a grid of `frame_count` frames spaced `frame_period` seconds apart.
    pub fn new(frame_period: f64, frame_count: usize) -> Self {
        let times = (0..frame_count)
            .map(|i| i as f64 * frame_period)
            .collect();
        Self {
            frame_period,
            times,
        }
    }

    /// Creates the grid covering a signal of `num_samples` samples.
    ///
    /// One frame sits at t = 0 and one at every `frame_period` up to and
    /// including the last instant inside the signal. Durations that are a
    /// whole number of periods count their final frame even when the division
    /// rounds just below the integer.
    pub fn for_signal(num_samples: usize, sample_rate: u32, frame_period: f64) -> Self {
        const SNAP: f64 = 1e-9;
        let seconds = num_samples as f64 / sample_rate as f64;
        let frame_count = (seconds / frame_period + SNAP).floor() as usize + 1;
        Self::new(frame_period, frame_count)
    }

    /// Distance between frames in seconds.
    pub fn frame_period(&self) -> f64 {
        self.frame_period
    }

    /// Frame times in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the grid has no frames.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last frame (0 for an empty grid).
    pub fn last_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

/// Fundamental frequency per frame; 0 Hz marks an unvoiced frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchContour {
    grid: FrameGrid,
    f0: Vec<f64>,
}

impl PitchContour {
    /// Pairs frequencies with a grid. Lengths must match.
    pub fn new(grid: FrameGrid, f0: Vec<f64>) -> SpecResult<Self> {
        if grid.len() != f0.len() {
            return Err(SpecError::InvalidSequence(format!(
                "contour has {} values for {} frames",
                f0.len(),
                grid.len()
            )));
        }
        Ok(Self { grid, f0 })
    }

    /// A contour of all-unvoiced frames.
    pub fn unvoiced(grid: FrameGrid) -> Self {
        let f0 = vec![0.0; grid.len()];
        Self { grid, f0 }
    }

    /// The frame grid.
    pub fn grid(&self) -> &FrameGrid {
        &self.grid
    }

    /// Frequencies in Hz, aligned 1:1 with [`FrameGrid::times`].
    pub fn f0(&self) -> &[f64] {
        &self.f0
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.f0.len()
    }

    /// Returns true if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.f0.is_empty()
    }

    /// Number of frames with non-zero frequency.
    pub fn voiced_count(&self) -> usize {
        self.f0.iter().filter(|&&f| f > 0.0).count()
    }

    /// Iterates `(time, frequency)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.grid.times.iter().copied().zip(self.f0.iter().copied())
    }

    /// Replaces the frequencies, keeping the grid.
    pub fn with_f0(&self, f0: Vec<f64>) -> SpecResult<Self> {
        Self::new(self.grid.clone(), f0)
    }

    /// Splits into grid and frequencies.
    pub fn into_parts(self) -> (FrameGrid, Vec<f64>) {
        (self.grid, self.f0)
    }
}
