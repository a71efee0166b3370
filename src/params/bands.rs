//! Octave band layouts: analysis size, center frequencies and bandwidth per preset.

use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Band layout preset
///
/// Each preset selects one row of the band table. Presets differ only in
/// data; adding a layout means appending a variant and a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BandPreset {
    /// Four octave-ish bands from 125 Hz to 2 kHz
    FourBand,
    /// Four narrow bands in the 250-800 Hz range, tuned for visuals
    FourBandVisual,
    /// Eight bands from 63 Hz to 8 kHz
    EightBand,
    /// Standard ten-band octave layout (31.5 Hz - 16 kHz)
    #[default]
    TenBand,
    /// Third-octave series from 25 Hz to 8 kHz
    TwentySixBand,
    /// Full third-octave series from 20 Hz to 20 kHz
    ThirtyOneBand,
}

/// One row of the band table
struct BandLayout {
    /// Analysis points (spectrum buffer length in internal mode)
    analysis_point_count: usize,
    /// Band center frequencies (Hz), ascending
    center_frequencies: &'static [f32],
    /// Ratio between a band's center and its edges
    bandwidth_factor: f32,
}

static LAYOUTS: [BandLayout; 6] = [
    BandLayout {
        analysis_point_count: 1024,
        center_frequencies: &[125.0, 500.0, 1000.0, 2000.0],
        bandwidth_factor: 1.414, // 2^(1/2)
    },
    BandLayout {
        analysis_point_count: 1024,
        center_frequencies: &[250.0, 400.0, 600.0, 800.0],
        bandwidth_factor: 1.260, // 2^(1/3)
    },
    BandLayout {
        analysis_point_count: 2048,
        center_frequencies: &[63.0, 125.0, 500.0, 1000.0, 2000.0, 4000.0, 6000.0, 8000.0],
        bandwidth_factor: 1.414,
    },
    BandLayout {
        analysis_point_count: 2048,
        center_frequencies: &[
            31.5, 63.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
        ],
        bandwidth_factor: 1.414,
    },
    BandLayout {
        analysis_point_count: 4096,
        center_frequencies: &[
            25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0,
            500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0,
            6300.0, 8000.0,
        ],
        bandwidth_factor: 1.122, // 2^(1/6)
    },
    BandLayout {
        analysis_point_count: 8192,
        center_frequencies: &[
            20.0, 25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0,
            400.0, 500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0,
            5000.0, 6300.0, 8000.0, 10000.0, 12500.0, 16000.0, 20000.0,
        ],
        bandwidth_factor: 1.122,
    },
];

impl BandPreset {
    /// All presets in table order
    pub const ALL: [BandPreset; 6] = [
        BandPreset::FourBand,
        BandPreset::FourBandVisual,
        BandPreset::EightBand,
        BandPreset::TenBand,
        BandPreset::TwentySixBand,
        BandPreset::ThirtyOneBand,
    ];

    fn layout(self) -> &'static BandLayout {
        &LAYOUTS[self.id() as usize]
    }

    /// Stable integer id sent to band backends (the table index)
    pub fn id(self) -> u32 {
        match self {
            BandPreset::FourBand => 0,
            BandPreset::FourBandVisual => 1,
            BandPreset::EightBand => 2,
            BandPreset::TenBand => 3,
            BandPreset::TwentySixBand => 4,
            BandPreset::ThirtyOneBand => 5,
        }
    }

    /// Look up a preset by its backend id
    pub fn from_id(id: u32) -> Result<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(BridgeError::UnknownPreset(id))
    }

    /// Number of analysis points (spectrum length for internal analysis)
    pub fn analysis_point_count(self) -> usize {
        self.layout().analysis_point_count
    }

    /// Band center frequencies in Hz
    pub fn center_frequencies(self) -> &'static [f32] {
        self.layout().center_frequencies
    }

    /// Bandwidth factor: band edges are `center / factor` and `center * factor`
    pub fn bandwidth_factor(self) -> f32 {
        self.layout().bandwidth_factor
    }

    /// Expected band count (length of the center frequency list)
    pub fn band_count(self) -> usize {
        self.center_frequencies().len()
    }

    /// Short name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            BandPreset::FourBand => "four",
            BandPreset::FourBandVisual => "four-visual",
            BandPreset::EightBand => "eight",
            BandPreset::TenBand => "ten",
            BandPreset::TwentySixBand => "twenty-six",
            BandPreset::ThirtyOneBand => "thirty-one",
        }
    }
}

impl fmt::Display for BandPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BandPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "4" | "four" => Ok(BandPreset::FourBand),
            "4v" | "four-visual" => Ok(BandPreset::FourBandVisual),
            "8" | "eight" => Ok(BandPreset::EightBand),
            "10" | "ten" => Ok(BandPreset::TenBand),
            "26" | "twenty-six" => Ok(BandPreset::TwentySixBand),
            "31" | "thirty-one" => Ok(BandPreset::ThirtyOneBand),
            other => Err(format!("unknown band preset '{}'", other)),
        }
    }
}
