//! Spectral source interface and spectrum-to-band helpers for internal-source mode.

use crate::error::Result;

use super::WindowFunction;

/// Offset added before the log so silence maps to about -256 dB instead of -inf
pub const DB_EPSILON: f32 = 1.5849e-13;

/// Magnitude that maps to 0 dB
pub const DB_REFERENCE: f32 = 2.5;

/// Source of raw per-bin magnitudes (internal-source mode)
pub trait SpectralSource {
    /// Sample rate of the analysed signal (Hz)
    fn sample_rate(&self) -> f32;

    /// Fill `out` with magnitudes for `out.len()` bins spanning 0 Hz to Nyquist
    fn spectrum_data(&mut self, out: &mut [f32], window: WindowFunction) -> Result<()>;
}

impl<S: SpectralSource + ?Sized> SpectralSource for Box<S> {
    fn sample_rate(&self) -> f32 {
        (**self).sample_rate()
    }

    fn spectrum_data(&mut self, out: &mut [f32], window: WindowFunction) -> Result<()> {
        (**self).spectrum_data(out, window)
    }
}

/// Convert frequency (Hz) to a bin of a `bin_count`-bin spectrum
///
/// The spectrum covers `0 .. sample_rate / 2`; results are clamped to the
/// valid range and NaN maps to bin 0.
pub fn frequency_to_bin(hz: f32, sample_rate: f32, bin_count: usize) -> usize {
    if bin_count == 0 {
        return 0;
    }
    let last = (bin_count - 1) as f32;
    let index = (hz / sample_rate * 2.0 * bin_count as f32).floor();
    if index.is_nan() {
        return 0;
    }
    index.clamp(0.0, last) as usize
}

/// Peak magnitude of the band centred on `center_hz`
///
/// Covers bins `[bin(center / bandwidth), bin(center * bandwidth))`,
/// falling back to the lower bin alone when the range is empty.
pub fn band_peak(spectrum: &[f32], sample_rate: f32, center_hz: f32, bandwidth: f32) -> f32 {
    if spectrum.is_empty() {
        return 0.0;
    }
    let i_min = frequency_to_bin(center_hz / bandwidth, sample_rate, spectrum.len());
    let i_max = frequency_to_bin(center_hz * bandwidth, sample_rate, spectrum.len());
    let end = i_max.max(i_min + 1);

    spectrum[i_min..end]
        .iter()
        .copied()
        .fold(spectrum[i_min], f32::max)
}

/// Convert a band magnitude to decibels
pub fn magnitude_to_db(magnitude: f32) -> f32 {
    20.0 * (magnitude / DB_REFERENCE + DB_EPSILON).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_frequency_to_bin() {
        // 1024 bins over 0..22050 Hz: 21.53 Hz per bin
        assert_eq!(frequency_to_bin(0.0, 44100.0, 1024), 0);
        assert_eq!(frequency_to_bin(21.6, 44100.0, 1024), 1);
        assert_eq!(frequency_to_bin(1000.0, 44100.0, 1024), 46);
        assert_eq!(frequency_to_bin(22050.0, 44100.0, 1024), 1023);
        assert_eq!(frequency_to_bin(96000.0, 44100.0, 1024), 1023);
        assert_eq!(frequency_to_bin(f32::NAN, 44100.0, 1024), 0);
        assert_eq!(frequency_to_bin(f32::INFINITY, 44100.0, 1024), 1023);
    }

    #[test]
    fn test_band_peak_takes_max_over_range() {
        let mut spectrum = vec![0.0; 1024];
        // 1 kHz band with bandwidth 1.414 spans 707..1414 Hz = bins 32..65
        spectrum[40] = 0.7;
        spectrum[50] = 0.9;
        spectrum[65] = 5.0; // excluded upper bound
        assert_eq!(band_peak(&spectrum, 44100.0, 1000.0, 1.414), 0.9);
    }

    #[test]
    fn test_band_peak_degenerate_range() {
        let mut spectrum = vec![0.0; 8];
        spectrum[7] = 0.25;
        // Both edges lie above Nyquist and clamp to the last bin
        assert_eq!(band_peak(&spectrum, 44100.0, 30000.0, 1.122), 0.25);

        // Unit bandwidth collapses the range onto one bin
        let mut spectrum = vec![0.1; 1024];
        spectrum[46] = 0.6;
        assert_eq!(band_peak(&spectrum, 44100.0, 1000.0, 1.0), 0.6);
    }

    #[test]
    fn test_magnitude_to_db() {
        assert_abs_diff_eq!(magnitude_to_db(2.5), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(magnitude_to_db(0.25), -20.0, epsilon = 1e-3);

        let floor = magnitude_to_db(0.0);
        assert!(floor.is_finite());
        assert_abs_diff_eq!(floor, -256.0, epsilon = 0.5);
    }
}
