//! Contour blending.
//!
//! Produces the corrected contour that drives synthesis:
//!
//! ```text
//! mixed[i]     = (1 - alpha) * extracted[i] + alpha * target[i]   if target[i] > 0
//!              = extracted[i]                                    otherwise
//! corrected    = medfilt(mixed, window)
//! corrected[i] = 0 where corrected[i] < floor
//! ```
//!
//! The median filter runs over the whole array, unvoiced frames included, with
//! zero padding past both ends.

use songsmith_spec::{PitchContour, VocalConfig};

use crate::error::{AudioError, AudioResult};

/// Blending parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendParams {
    /// Weight of the target contour.
    pub alpha: f64,
    /// Odd median filter length.
    pub median_window: usize,
    /// Frames below this frequency become unvoiced.
    pub unvoiced_floor: f64,
}

impl BlendParams {
    /// Takes the blend settings from a vocal config.
    pub fn from_config(config: &VocalConfig) -> Self {
        Self {
            alpha: config.alpha,
            median_window: config.median_window,
            unvoiced_floor: config.unvoiced_floor,
        }
    }
}

impl Default for BlendParams {
    fn default() -> Self {
        Self::from_config(&VocalConfig::default())
    }
}

/// Blends an extracted contour toward a target on the same grid.
///
/// # Errors
/// [`AudioError::FrameGridMismatch`] if `target` has a different frame count,
/// [`AudioError::InvalidParameter`] if `alpha` is outside [0, 1] or the window
/// is even.
pub fn blend(extracted: &PitchContour, target: &[f64], params: &BlendParams) -> AudioResult<PitchContour> {
    if target.len() != extracted.len() {
        return Err(AudioError::FrameGridMismatch {
            expected: extracted.len(),
            actual: target.len(),
        });
    }
    if !(0.0..=1.0).contains(&params.alpha) {
        return Err(AudioError::invalid_param(
            "alpha",
            format!("must be between 0 and 1, got {}", params.alpha),
        ));
    }
    if params.median_window % 2 == 0 {
        return Err(AudioError::invalid_param(
            "median_window",
            format!("must be odd, got {}", params.median_window),
        ));
    }

    let mixed = blend_frames(extracted.f0(), target, params.alpha);
    let mut smoothed = median_filter(&mixed, params.median_window);
    apply_floor(&mut smoothed, params.unvoiced_floor);
    Ok(extracted.with_f0(smoothed)?)
}

/// Frame-wise linear mix `(1 - alpha) * extracted + alpha * target`.
///
/// Frames with no sounding note (`target == 0`) keep the extracted value.
pub fn blend_frames(extracted: &[f64], target: &[f64], alpha: f64) -> Vec<f64> {
    extracted
        .iter()
        .zip(target)
        .map(|(&e, &t)| if t > 0.0 { (1.0 - alpha) * e + alpha * t } else { e })
        .collect()
}

/// Running median with zero padding at both ends.
pub fn median_filter(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return values.to_vec();
    }
    let half = window / 2;
    let mut scratch = Vec::with_capacity(window);
    (0..values.len())
        .map(|i| {
            scratch.clear();
            for k in 0..window {
                let j = i as isize + k as isize - half as isize;
                let v = if j < 0 {
                    0.0
                } else {
                    values.get(j as usize).copied().unwrap_or(0.0)
                };
                scratch.push(v);
            }
            scratch.sort_by(f64::total_cmp);
            scratch[half]
        })
        .collect()
}

/// Sets every value below `floor` to 0.
pub fn apply_floor(values: &mut [f64], floor: f64) {
    for v in values.iter_mut() {
        if *v < floor {
            *v = 0.0;
        }
    }
}
