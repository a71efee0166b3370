//! WAV file playback into the sample buffer, paced by tick duration.

use std::path::Path;

use hound::{SampleFormat, WavReader};
use tracing::info;

use super::feed::{downmix, samples_for_tick, SampleBuffer, SampleFeed};
use crate::error::Result;

/// Plays a decoded WAV file into a sample buffer, `delta_time` at a time
pub struct WavPlayback {
    samples: Vec<f32>,
    position: usize,
    sample_rate: u32,
    carry: f64,
    buffer: SampleBuffer,
}

impl WavPlayback {
    /// Decode the whole file up front (downmixed to mono)
    pub fn open(path: impl AsRef<Path>, buffer: SampleBuffer) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<Vec<f32>, _>>()?
            }
        };

        let samples: Vec<f32> = downmix(&interleaved, spec.channels as usize).collect();

        info!(
            "WAV: {} ({} Hz, {} channel(s), {:.1}s)",
            path.display(),
            spec.sample_rate,
            spec.channels,
            samples.len() as f32 / spec.sample_rate.max(1) as f32
        );

        Ok(Self::from_samples(samples, spec.sample_rate, buffer))
    }

    /// Play already decoded mono samples
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32, buffer: SampleBuffer) -> Self {
        Self {
            samples,
            position: 0,
            sample_rate,
            carry: 0.0,
            buffer,
        }
    }

    /// Seconds played so far
    pub fn elapsed_secs(&self) -> f32 {
        self.position as f32 / self.sample_rate.max(1) as f32
    }
}

impl SampleFeed for WavPlayback {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn advance(&mut self, delta_time: f32) -> Result<()> {
        let count = samples_for_tick(self.sample_rate, delta_time, &mut self.carry);
        let end = (self.position + count).min(self.samples.len());
        self.buffer.push(&self.samples[self.position..end]);
        self.position = end;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.position >= self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_paces_by_delta_time() {
        let buffer = SampleBuffer::new(1000);
        let mut playback = WavPlayback::from_samples(vec![0.5; 1000], 100, buffer.clone());

        playback.advance(0.5).unwrap();
        assert_eq!(buffer.len(), 50);
        assert_eq!(playback.elapsed_secs(), 0.5);
        assert!(!playback.is_finished());

        playback.advance(20.0).unwrap();
        assert_eq!(buffer.len(), 1000);
        assert!(playback.is_finished());

        // Past the end nothing more is produced
        playback.advance(1.0).unwrap();
        assert_eq!(buffer.len(), 1000);
    }
}
