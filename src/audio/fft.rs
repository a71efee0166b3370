//! FFT analysis over the shared sample history.

use std::collections::HashMap;

use rustfft::{num_complex::Complex, FftPlanner};
use tracing::debug;

use super::backend::{BackendRequest, BackendResponse, BandBackend};
use super::feed::SampleBuffer;
use super::spectrum::{band_peak, SpectralSource};
use super::WindowFunction;
use crate::error::{BridgeError, Result};
use crate::params::BandPreset;

/// Magnitude spectrum of the latest samples
///
/// For an output of `n` bins, runs a forward FFT of size `2n` over the most
/// recent `2n` samples.
pub struct FftSpectrum {
    samples: SampleBuffer,
    sample_rate: u32,
    planner: FftPlanner<f32>,
    frame: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    windows: HashMap<(WindowFunction, usize), Vec<f32>>,
}

impl FftSpectrum {
    pub fn new(samples: SampleBuffer, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            planner: FftPlanner::new(),
            frame: Vec::new(),
            fft_buffer: Vec::new(),
            windows: HashMap::new(),
        }
    }
}

impl SpectralSource for FftSpectrum {
    fn sample_rate(&self) -> f32 {
        self.sample_rate as f32
    }

    fn spectrum_data(&mut self, out: &mut [f32], window: WindowFunction) -> Result<()> {
        let bin_count = out.len();
        if bin_count == 0 {
            return Ok(());
        }
        let fft_size = bin_count * 2;
        if fft_size > self.samples.capacity() {
            return Err(BridgeError::InvalidConfig(format!(
                "FFT size {} exceeds sample history of {}",
                fft_size,
                self.samples.capacity()
            )));
        }

        self.frame.resize(fft_size, 0.0);
        self.samples.latest(&mut self.frame);

        let coefficients = self.windows.entry((window, fft_size)).or_insert_with(|| {
            debug!("Computing {} window for FFT size {}", window, fft_size);
            window.coefficients(fft_size)
        });

        // Apply window
        self.fft_buffer.clear();
        self.fft_buffer.extend(
            self.frame
                .iter()
                .zip(coefficients.iter())
                .map(|(&s, &w)| Complex::new(s * w, 0.0)),
        );

        // Perform FFT (the planner caches plans per size)
        let fft = self.planner.plan_fft_forward(fft_size);
        fft.process(&mut self.fft_buffer);

        let scale = 2.0 / fft_size as f32;
        for (bin, c) in out.iter_mut().zip(self.fft_buffer.iter()) {
            *bin = c.norm() * scale;
        }
        Ok(())
    }
}

/// Band backend computing linear band peaks from an FFT spectrum
///
/// Always reports an explicit band count, so silent bands (level 0.0) are
/// never mistaken for the end of the response.
pub struct FftBandBackend {
    spectrum: FftSpectrum,
    window: WindowFunction,
    magnitudes: Vec<f32>,
}

impl FftBandBackend {
    pub fn new(spectrum: FftSpectrum, window: WindowFunction) -> Self {
        Self {
            spectrum,
            window,
            magnitudes: Vec::new(),
        }
    }
}

impl BandBackend for FftBandBackend {
    fn update(&mut self, request: &BackendRequest) -> Result<BackendResponse> {
        let preset = BandPreset::from_id(request.preset_id)?;
        let bin_count = request.analysis_point_count / 2;
        if bin_count == 0 {
            return Err(BridgeError::Backend(format!(
                "analysis point count {} is too small",
                request.analysis_point_count
            )));
        }

        self.magnitudes.resize(bin_count, 0.0);
        self.spectrum
            .spectrum_data(&mut self.magnitudes, self.window)?;

        let sample_rate = self.spectrum.sample_rate();
        let bandwidth = preset.bandwidth_factor();
        let peaks: Vec<f32> = preset
            .center_frequencies()
            .iter()
            .map(|&center| band_peak(&self.magnitudes, sample_rate, center, bandwidth))
            .collect();

        Ok(BackendResponse::with_levels(&peaks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq_hz: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_sine_peak_lands_in_expected_bin() {
        let buffer = SampleBuffer::new(4096);
        buffer.push(&sine(1000.0, 44100, 4096));

        let mut fft = FftSpectrum::new(buffer, 44100);
        let mut out = vec![0.0; 1024];
        fft.spectrum_data(&mut out, WindowFunction::Hann).unwrap();

        let peak_bin = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();

        // 2048-point FFT at 44.1 kHz: 21.53 Hz per bin, 1 kHz near bin 46
        assert!((45..=47).contains(&peak_bin), "peak at bin {}", peak_bin);
    }

    #[test]
    fn test_silence_gives_zero_spectrum() {
        let buffer = SampleBuffer::new(2048);
        let mut fft = FftSpectrum::new(buffer, 48000);
        let mut out = vec![1.0; 512];
        fft.spectrum_data(&mut out, WindowFunction::Blackman).unwrap();
        assert!(out.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_rejects_frame_larger_than_history() {
        let buffer = SampleBuffer::new(1024);
        let mut fft = FftSpectrum::new(buffer, 44100);
        let mut out = vec![0.0; 1024];
        assert!(fft.spectrum_data(&mut out, WindowFunction::Hann).is_err());
    }

    #[test]
    fn test_band_backend_reports_explicit_count() {
        let buffer = SampleBuffer::new(4096);
        buffer.push(&sine(1000.0, 44100, 4096));

        let mut backend = FftBandBackend::new(
            FftSpectrum::new(buffer, 44100),
            WindowFunction::Blackman,
        );
        let preset = BandPreset::TenBand;
        let response = backend
            .update(&BackendRequest {
                analysis_point_count: preset.analysis_point_count(),
                preset_id: preset.id(),
            })
            .unwrap();

        assert_eq!(response.band_count, Some(10));
        // The 1 kHz band (index 5) dominates
        let loudest = response.band_levels[..10]
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(loudest, 5);
    }

    #[test]
    fn test_band_backend_unknown_preset() {
        let mut backend = FftBandBackend::new(
            FftSpectrum::new(SampleBuffer::new(4096), 44100),
            WindowFunction::Blackman,
        );
        let result = backend.update(&BackendRequest {
            analysis_point_count: 1024,
            preset_id: 42,
        });
        assert!(matches!(result, Err(BridgeError::UnknownPreset(42))));
    }
}
