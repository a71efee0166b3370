//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::audio::WindowFunction;
use crate::params::{BandPreset, ReducerConfig};

/// Default run length for offline feeds without a natural end (seconds)
const DEFAULT_SYNTH_DURATION_S: f32 = 10.0;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "octave-bridge")]
#[command(about = "Octave band levels from live or recorded audio", long_about = None)]
pub struct Args {
    /// Band preset: four, four-visual, eight, ten (default), twenty-six, thirty-one
    #[arg(long, value_name = "PRESET", default_value = "ten")]
    pub preset: String,

    /// Smoothing sensitivity for mean levels (per second)
    #[arg(long, value_name = "PER_SECOND", default_value = "8.0")]
    pub sensitivity: f32,

    /// Reduction mode: external (default) or internal
    #[arg(long, value_name = "MODE", default_value = "external")]
    pub mode: String,

    /// Window function for spectrum analysis
    #[arg(long, value_name = "WINDOW", default_value = "blackman")]
    pub window: String,

    /// Sample source: synth (default), wav, live
    #[arg(long, value_name = "SOURCE", default_value = "synth")]
    pub source: String,

    /// WAV file to analyse (implies --source wav)
    #[arg(long, value_name = "PATH")]
    pub wav: Option<PathBuf>,

    /// Ticks per second
    #[arg(long, value_name = "HZ", default_value = "60")]
    pub fps: u32,

    /// Run length in seconds (WAV runs to the end of the file, live runs until stopped)
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Print mean levels instead of instantaneous levels
    #[arg(long)]
    pub mean: bool,
}

/// Reducer mode selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    External,
    Internal,
}

/// Sample feed selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedKind {
    Synth,
    Wav(PathBuf),
    Live,
}

impl Args {
    /// Parse band preset from command-line arguments
    pub fn parse_band_preset(&self) -> BandPreset {
        match self.preset.parse::<BandPreset>() {
            Ok(preset) => {
                info!(
                    "Bands: {} ({} bands, {} points)",
                    preset,
                    preset.band_count(),
                    preset.analysis_point_count()
                );
                preset
            }
            Err(e) => {
                warn!("{}, using ten", e);
                BandPreset::TenBand
            }
        }
    }

    /// Parse window function from command-line arguments
    pub fn parse_window(&self) -> WindowFunction {
        self.window.parse().unwrap_or_else(|e| {
            warn!("{}, using blackman", e);
            WindowFunction::Blackman
        })
    }

    /// Parse reducer mode from command-line arguments
    pub fn parse_mode(&self) -> SourceMode {
        match self.mode.to_lowercase().as_str() {
            "external" => SourceMode::External,
            "internal" => SourceMode::Internal,
            other => {
                warn!("Unknown mode '{}', using external", other);
                SourceMode::External
            }
        }
    }

    /// Parse sample feed from command-line arguments
    pub fn parse_feed(&self) -> FeedKind {
        if let Some(path) = &self.wav {
            return FeedKind::Wav(path.clone());
        }
        match self.source.to_lowercase().as_str() {
            "synth" => FeedKind::Synth,
            "live" => FeedKind::Live,
            "wav" => {
                warn!("--source wav needs --wav <PATH>, using synth");
                FeedKind::Synth
            }
            other => {
                warn!("Unknown source '{}', using synth", other);
                FeedKind::Synth
            }
        }
    }

    /// Build reducer configuration from command-line arguments
    pub fn reducer_config(&self) -> ReducerConfig {
        ReducerConfig {
            preset: self.parse_band_preset(),
            sensitivity: self.sensitivity,
            window: self.parse_window(),
        }
    }

    /// Seconds per tick
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Number of ticks to run, `None` for open-ended runs
    pub fn tick_limit(&self, feed: &FeedKind) -> Option<u64> {
        let duration = match (self.duration, feed) {
            (Some(duration), _) => duration.max(0.0),
            (None, FeedKind::Synth) => DEFAULT_SYNTH_DURATION_S,
            (None, _) => return None,
        };
        Some((duration / self.tick_seconds()).ceil() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["octave-bridge"]).unwrap();
        assert_eq!(args.parse_band_preset(), BandPreset::TenBand);
        assert_eq!(args.parse_mode(), SourceMode::External);
        assert_eq!(args.parse_feed(), FeedKind::Synth);
        assert_eq!(args.parse_window(), WindowFunction::Blackman);
        assert_eq!(args.reducer_config().sensitivity, 8.0);
        assert_eq!(args.tick_limit(&FeedKind::Synth), Some(600));
        assert!(!args.mean);
    }

    #[test]
    fn test_explicit_choices() {
        let args = Args::try_parse_from([
            "octave-bridge",
            "--preset",
            "31",
            "--mode",
            "Internal",
            "--window",
            "hann",
            "--wav",
            "song.wav",
            "--fps",
            "30",
            "--mean",
        ])
        .unwrap();
        assert_eq!(args.parse_band_preset(), BandPreset::ThirtyOneBand);
        assert_eq!(args.parse_mode(), SourceMode::Internal);
        assert_eq!(args.parse_window(), WindowFunction::Hann);
        let feed = args.parse_feed();
        assert_eq!(feed, FeedKind::Wav(PathBuf::from("song.wav")));
        assert_eq!(args.tick_limit(&feed), None);
        assert!(args.mean);
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let args = Args::try_parse_from([
            "octave-bridge",
            "--preset",
            "twelve",
            "--mode",
            "sideways",
            "--source",
            "wav",
        ])
        .unwrap();
        assert_eq!(args.parse_band_preset(), BandPreset::TenBand);
        assert_eq!(args.parse_mode(), SourceMode::External);
        assert_eq!(args.parse_feed(), FeedKind::Synth);
    }

    #[test]
    fn test_tick_limit_from_duration() {
        let args =
            Args::try_parse_from(["octave-bridge", "--source", "live", "--duration", "2"]).unwrap();
        let feed = args.parse_feed();
        assert_eq!(feed, FeedKind::Live);
        assert_eq!(args.tick_limit(&feed), Some(120));
    }
}
