//! Vocal pipeline configuration.
//!
//! All fields have fixed defaults. A JSON config file may override any subset;
//! unknown keys are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// One echo tap of the ambience fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EchoTap {
    /// Delay in seconds.
    pub delay: f64,
    /// Gain applied to the delayed copy.
    pub decay: f64,
}

/// Parameters of the speech-to-singing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VocalConfig {
    /// Analysis frame period in seconds.
    pub frame_period: f64,
    /// Playback-rate factor applied before analysis (< 1 slows down).
    pub stretch_rate: f64,
    /// Weight of the melodic target in the pitch blend.
    pub alpha: f64,
    /// Median filter width in frames (odd).
    pub median_window: usize,
    /// Blended frequencies below this are forced to 0 Hz.
    pub unvoiced_floor: f64,
    /// Lowest F0 the tracker searches for.
    pub f0_floor: f64,
    /// Highest F0 the tracker searches for.
    pub f0_ceiling: f64,
    /// Analysis FFT size shared by envelope, aperiodicity, and synthesis.
    pub fft_size: usize,
    /// Echo taps of the ambience fallback, applied in order.
    pub echo_taps: Vec<EchoTap>,
    /// Peak level used when a signal must be scaled down.
    pub normalize_peak: f64,
}

impl Default for VocalConfig {
    fn default() -> Self {
        Self {
            frame_period: 0.010,
            stretch_rate: 0.88,
            alpha: 0.50,
            median_window: 7,
            unvoiced_floor: 60.0,
            f0_floor: 71.0,
            f0_ceiling: 800.0,
            fft_size: 2048,
            echo_taps: vec![
                EchoTap {
                    delay: 0.065,
                    decay: 0.22,
                },
                EchoTap {
                    delay: 0.130,
                    decay: 0.12,
                },
            ],
            normalize_peak: 0.98,
        }
    }
}

impl VocalConfig {
    /// Loads a config from a JSON file and validates it.
    pub fn from_json_file(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Err(SpecError::InputMissing {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a config from JSON text and validates it.
    pub fn from_json(text: &str) -> SpecResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different blend weight.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Checks every field against its valid range.
    pub fn validate(&self) -> SpecResult<()> {
        if !(self.frame_period > 0.0 && self.frame_period <= 0.1) {
            return Err(SpecError::invalid_config(
                "frame_period",
                format!("must be in (0, 0.1] seconds, got {}", self.frame_period),
            ));
        }
        if !(self.stretch_rate > 0.0 && self.stretch_rate.is_finite()) {
            return Err(SpecError::invalid_config(
                "stretch_rate",
                format!("must be > 0, got {}", self.stretch_rate),
            ));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(SpecError::invalid_config(
                "alpha",
                format!("must be within [0, 1], got {}", self.alpha),
            ));
        }
        if self.median_window == 0 || self.median_window % 2 == 0 {
            return Err(SpecError::invalid_config(
                "median_window",
                format!("must be odd and > 0, got {}", self.median_window),
            ));
        }
        if self.unvoiced_floor < 0.0 {
            return Err(SpecError::invalid_config(
                "unvoiced_floor",
                format!("must be >= 0, got {}", self.unvoiced_floor),
            ));
        }
        if !(self.f0_floor > 0.0 && self.f0_floor < self.f0_ceiling) {
            return Err(SpecError::invalid_config(
                "f0_floor",
                format!(
                    "must satisfy 0 < f0_floor < f0_ceiling, got {} / {}",
                    self.f0_floor, self.f0_ceiling
                ),
            ));
        }
        if !self.fft_size.is_power_of_two() || self.fft_size < 256 {
            return Err(SpecError::invalid_config(
                "fft_size",
                format!("must be a power of two >= 256, got {}", self.fft_size),
            ));
        }
        for (i, tap) in self.echo_taps.iter().enumerate() {
            if tap.delay <= 0.0 || !(0.0..1.0).contains(&tap.decay) {
                return Err(SpecError::invalid_config(
                    format!("echo_taps[{}]", i),
                    "delay must be > 0 and decay within [0, 1)",
                ));
            }
        }
        if !(self.normalize_peak > 0.0 && self.normalize_peak <= 1.0) {
            return Err(SpecError::invalid_config(
                "normalize_peak",
                format!("must be in (0, 1], got {}", self.normalize_peak),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_valid() {
        let config = VocalConfig::default();
        config.validate().unwrap();
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.stretch_rate, 0.88);
        assert_eq!(config.median_window, 7);
        assert_eq!(config.fft_size, 2048);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = VocalConfig::from_json(r#"{"alpha": 0.75}"#).unwrap();
        assert_eq!(config.alpha, 0.75);
        assert_eq!(config.stretch_rate, 0.88);
        assert_eq!(config.echo_taps.len(), 2);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(VocalConfig::from_json(r#"{"alpah": 0.75}"#).is_err());
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let err = VocalConfig::default().with_alpha(1.5).validate().unwrap_err();
        assert!(err.to_string().contains("alpha"));
    }

    #[test]
    fn test_even_median_window_rejected() {
        let config = VocalConfig {
            median_window: 6,
            ..VocalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_power_of_two_fft_rejected() {
        let config = VocalConfig {
            fft_size: 2000,
            ..VocalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = VocalConfig::from_json_file(Path::new("/nonexistent/vocal.json")).unwrap_err();
        assert!(matches!(err, SpecError::InputMissing { .. }));
    }
}
