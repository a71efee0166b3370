//! Reducer and sample feed configuration.

use crate::audio::WindowFunction;
use crate::error::{BridgeError, Result};

use super::BandPreset;

/// Band reducer configuration
#[derive(Debug, Clone)]
pub struct ReducerConfig {
    /// Active band layout
    pub preset: BandPreset,

    /// Smoothing sensitivity (1/seconds)
    /// Mean levels follow instantaneous levels with time constant `1 / sensitivity`
    pub sensitivity: f32,

    /// Window used when requesting spectra from a spectral source
    /// Only consulted in internal mode
    pub window: WindowFunction,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            preset: BandPreset::TenBand,
            sensitivity: 8.0,
            window: WindowFunction::Blackman,
        }
    }
}

impl ReducerConfig {
    /// Validate configuration (sensitivity must be positive and finite)
    pub fn validate(&self) -> Result<()> {
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(BridgeError::InvalidSensitivity(self.sensitivity));
        }
        Ok(())
    }
}

/// Sample feed configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Sample rate used by the synth feed (Hz)
    pub sample_rate_hz: usize,

    /// Samples of history kept for analysis
    /// Must cover the largest FFT (twice the largest analysis point count)
    pub history_len: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            history_len: 2 * 8192,
        }
    }
}

impl FeedConfig {
    /// Validate configuration (history must hold the largest analysis frame)
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate_hz == 0 {
            return Err(BridgeError::InvalidConfig(
                "sample rate must be > 0".to_string(),
            ));
        }
        let required = BandPreset::ALL
            .iter()
            .map(|p| 2 * p.analysis_point_count())
            .max()
            .unwrap_or(0);
        if self.history_len < required {
            return Err(BridgeError::InvalidConfig(format!(
                "sample history of {} is shorter than the largest analysis frame ({})",
                self.history_len, required
            )));
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Synth block size (samples per rendered block)
    pub const BLOCK_SIZE: usize = 128;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reducer_config() {
        let config = ReducerConfig::default();
        assert_eq!(config.preset, BandPreset::TenBand);
        assert_eq!(config.sensitivity, 8.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_sensitivity() {
        for sensitivity in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = ReducerConfig {
                sensitivity,
                ..ReducerConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(BridgeError::InvalidSensitivity(_))
            ));
        }
    }

    #[test]
    fn test_feed_config_history() {
        assert!(FeedConfig::default().validate().is_ok());

        let short = FeedConfig {
            history_len: 4096,
            ..FeedConfig::default()
        };
        assert!(short.validate().is_err());
    }
}
