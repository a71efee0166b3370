//! Spectrum-to-bands reducer.
//!
//! Turns either pre-reduced backend levels (external mode) or a raw
//! magnitude spectrum (internal mode) into per-band levels and
//! exponentially smoothed mean levels, once per tick.

use tracing::{debug, trace};

use super::backend::{BackendRequest, BandBackend};
use super::levels::{smoothing_filter, BandLevels};
use super::spectrum::{band_peak, magnitude_to_db, SpectralSource};
use super::WindowFunction;
use crate::error::{BridgeError, Result};
use crate::params::{BandPreset, ReducerConfig};

/// Where band energies come from; fixed for the lifetime of a reducer
pub enum BandSource {
    /// Backend delivers band levels directly
    External(Box<dyn BandBackend>),

    /// Raw spectrum is reduced locally and converted to decibels
    Internal {
        source: Box<dyn SpectralSource>,
        /// Working magnitude buffer, sized to the preset's analysis point count
        spectrum: Vec<f32>,
    },
}

impl BandSource {
    /// External-source mode
    pub fn external(backend: impl BandBackend + 'static) -> Self {
        Self::External(Box::new(backend))
    }

    /// Internal-source mode
    pub fn internal(source: impl SpectralSource + 'static) -> Self {
        Self::Internal {
            source: Box::new(source),
            spectrum: Vec::new(),
        }
    }

    /// Mode label for logs and display
    pub fn label(&self) -> &'static str {
        match self {
            Self::External(_) => "external",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Reduces spectra to band levels, one call per tick
pub struct BandReducer {
    config: ReducerConfig,
    source: BandSource,
    levels: BandLevels,
}

impl BandReducer {
    /// Create a reducer; fails if the configuration is invalid
    pub fn new(config: ReducerConfig, source: BandSource) -> Result<Self> {
        config.validate()?;

        debug!(
            "BandReducer created: mode={}, preset={}, sensitivity={}",
            source.label(),
            config.preset,
            config.sensitivity
        );

        Ok(Self {
            config,
            source,
            levels: BandLevels::new(),
        })
    }

    /// Advance one tick of `delta_time` seconds
    ///
    /// On error the previous output is left untouched.
    pub fn update(&mut self, delta_time: f32) -> Result<()> {
        if !(delta_time.is_finite() && delta_time >= 0.0) {
            return Err(BridgeError::InvalidDeltaTime(delta_time));
        }
        let filter = smoothing_filter(self.config.sensitivity, delta_time);
        let preset = self.config.preset;

        match &mut self.source {
            BandSource::External(backend) => {
                update_external(backend.as_mut(), preset, filter, &mut self.levels)
            }
            BandSource::Internal { source, spectrum } => update_internal(
                source.as_mut(),
                spectrum,
                preset,
                self.config.window,
                filter,
                &mut self.levels,
            ),
        }
    }

    /// Instantaneous levels from the last tick
    pub fn levels(&self) -> &[f32] {
        self.levels.levels()
    }

    /// Smoothed levels
    pub fn mean_levels(&self) -> &[f32] {
        self.levels.mean_levels()
    }

    /// Number of bands currently active (0 before the first tick)
    pub fn band_count(&self) -> usize {
        self.levels.band_count()
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    pub fn mode(&self) -> &'static str {
        self.source.label()
    }

    /// Switch band layout; takes effect on the next tick
    pub fn set_preset(&mut self, preset: BandPreset) {
        if preset != self.config.preset {
            debug!("Band preset changed: {} -> {}", self.config.preset, preset);
            self.config.preset = preset;
        }
    }

    /// Change smoothing sensitivity
    pub fn set_sensitivity(&mut self, sensitivity: f32) -> Result<()> {
        let config = ReducerConfig {
            sensitivity,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

fn update_external(
    backend: &mut dyn BandBackend,
    preset: BandPreset,
    filter: f32,
    levels: &mut BandLevels,
) -> Result<()> {
    let request = BackendRequest {
        analysis_point_count: preset.analysis_point_count(),
        preset_id: preset.id(),
    };
    let response = backend.update(&request)?;
    let band_count = response.valid_band_count()?;

    levels.ensure_band_count(band_count);

    for (i, &level) in response.band_levels[..band_count].iter().enumerate() {
        levels.apply(i, level, filter);
    }

    trace!("External tick: {} bands, filter={}", band_count, filter);
    Ok(())
}

fn update_internal(
    source: &mut dyn SpectralSource,
    spectrum: &mut Vec<f32>,
    preset: BandPreset,
    window: WindowFunction,
    filter: f32,
    levels: &mut BandLevels,
) -> Result<()> {
    let point_count = preset.analysis_point_count();
    if spectrum.len() != point_count {
        *spectrum = vec![0.0; point_count];
    }

    source.spectrum_data(spectrum, window)?;

    let sample_rate = source.sample_rate();
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(BridgeError::InvalidSampleRate(sample_rate));
    }

    let centers = preset.center_frequencies();
    let bandwidth = preset.bandwidth_factor();

    levels.ensure_band_count(centers.len());

    for (i, &center) in centers.iter().enumerate() {
        let level_db = magnitude_to_db(band_peak(spectrum, sample_rate, center, bandwidth));
        levels.apply(i, level_db, filter);
    }

    trace!("Internal tick: {} bands, filter={}", centers.len(), filter);
    Ok(())
}
