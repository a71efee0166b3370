//! Window functions applied before the FFT.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window applied to the sample frame before spectral analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowFunction {
    Rectangular,
    Triangle,
    Hamming,
    Hann,
    #[default]
    Blackman,
    BlackmanHarris,
}

impl WindowFunction {
    /// Window coefficient for sample `index` of a `size`-sample frame
    pub fn coefficient(self, index: usize, size: usize) -> f32 {
        if size < 2 {
            return 1.0;
        }
        let n = index as f32;
        let m = (size - 1) as f32;
        let phase = 2.0 * PI * n / m;

        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Triangle => 1.0 - ((n - m / 2.0) / (m / 2.0)).abs(),
            WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
            WindowFunction::Hann => 0.5 * (1.0 - phase.cos()),
            WindowFunction::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
            WindowFunction::BlackmanHarris => {
                0.35875 - 0.48829 * phase.cos() + 0.14128 * (2.0 * phase).cos()
                    - 0.01168 * (3.0 * phase).cos()
            }
        }
    }

    /// Precompute the full window for a frame size
    pub fn coefficients(self, size: usize) -> Vec<f32> {
        (0..size).map(|i| self.coefficient(i, size)).collect()
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowFunction::Rectangular => "rectangular",
            WindowFunction::Triangle => "triangle",
            WindowFunction::Hamming => "hamming",
            WindowFunction::Hann => "hann",
            WindowFunction::Blackman => "blackman",
            WindowFunction::BlackmanHarris => "blackman-harris",
        };
        f.write_str(name)
    }
}

impl FromStr for WindowFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rectangular" | "none" => Ok(WindowFunction::Rectangular),
            "triangle" => Ok(WindowFunction::Triangle),
            "hamming" => Ok(WindowFunction::Hamming),
            "hann" | "hanning" => Ok(WindowFunction::Hann),
            "blackman" => Ok(WindowFunction::Blackman),
            "blackman-harris" | "blackmanharris" => Ok(WindowFunction::BlackmanHarris),
            other => Err(format!("unknown window function '{}'", other)),
        }
    }
}
