//! Band analysis: spectrum-to-bands reduction and the sources that feed it.
//!
//! The reducer runs in one of two modes. In external mode a band backend
//! delivers per-band levels directly; in internal mode a spectral source
//! delivers raw magnitudes that are reduced and converted to decibels here.
//! Both modes produce the same pair of outputs: instantaneous levels and
//! exponentially smoothed mean levels.

mod backend;
mod capture;
mod feed;
mod fft;
mod levels;
mod reducer;
mod spectrum;
mod synthesis;
mod wav;
mod window;

// Re-export public types
pub use backend::{
    discover_band_count, BackendRequest, BackendResponse, BandBackend, BAND_CAPACITY,
};
pub use capture::LiveCapture;
pub use feed::{downmix, SampleBuffer, SampleFeed};
pub use fft::{FftBandBackend, FftSpectrum};
pub use levels::{smoothing_filter, BandLevels};
pub use reducer::{BandReducer, BandSource};
pub use spectrum::{
    band_peak, frequency_to_bin, magnitude_to_db, SpectralSource, DB_EPSILON, DB_REFERENCE,
};
pub use synthesis::{SynthFeed, GLICOL_COMPOSITION};
pub use wav::WavPlayback;
pub use window::WindowFunction;
