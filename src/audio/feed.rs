//! Shared sample history and the feeds that fill it.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;

/// Mono sample history shared between a feed and the analysis side
///
/// Keeps at most `capacity` of the most recent samples.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Arc<Mutex<Vec<f32>>>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<f32>> {
        // A panicking producer leaves plain samples behind; keep using them
        self.samples.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append samples, discarding the oldest beyond capacity
    pub fn push(&self, samples: &[f32]) {
        let mut buf = self.lock();
        buf.extend_from_slice(samples);
        if buf.len() > self.capacity {
            let excess = buf.len() - self.capacity;
            buf.drain(0..excess);
        }
    }

    /// Copy the most recent `out.len()` samples into `out`
    ///
    /// When fewer samples are available the front of `out` is zero-filled.
    pub fn latest(&self, out: &mut [f32]) {
        let buf = self.lock();
        let available = buf.len().min(out.len());
        let pad = out.len() - available;
        out[..pad].fill(0.0);
        out[pad..].copy_from_slice(&buf[buf.len() - available..]);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Producer of samples, advanced once per tick before analysis
pub trait SampleFeed {
    /// Sample rate of the produced signal (Hz)
    fn sample_rate(&self) -> u32;

    /// Produce the samples covering the next `delta_time` seconds
    fn advance(&mut self, delta_time: f32) -> Result<()>;

    /// True once the feed has nothing more to produce
    fn is_finished(&self) -> bool {
        false
    }
}

/// Average interleaved frames down to one channel
pub fn downmix(interleaved: &[f32], channels: usize) -> impl Iterator<Item = f32> + '_ {
    let channels = channels.max(1);
    interleaved
        .chunks_exact(channels)
        .map(move |frame| frame.iter().sum::<f32>() / channels as f32)
}

/// Number of samples covering `delta_time` seconds, carrying the fraction over
pub(crate) fn samples_for_tick(sample_rate: u32, delta_time: f32, carry: &mut f64) -> usize {
    let exact = sample_rate as f64 * delta_time.max(0.0) as f64 + *carry;
    let whole = exact.floor();
    *carry = exact - whole;
    whole as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_most_recent() {
        let buffer = SampleBuffer::new(4);
        buffer.push(&[1.0, 2.0, 3.0]);
        buffer.push(&[4.0, 5.0, 6.0]);
        assert_eq!(buffer.len(), 4);

        let mut out = [0.0; 4];
        buffer.latest(&mut out);
        assert_eq!(out, [3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_latest_pads_front_when_short() {
        let buffer = SampleBuffer::new(16);
        buffer.push(&[1.0, 2.0]);

        let mut out = [9.0; 5];
        buffer.latest(&mut out);
        assert_eq!(out, [0.0, 0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_clones_share_history() {
        let buffer = SampleBuffer::new(8);
        let producer = buffer.clone();
        producer.push(&[0.5]);
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_downmix_stereo() {
        let mono: Vec<f32> = downmix(&[1.0, 0.0, 0.5, 0.5, -1.0], 2).collect();
        assert_eq!(mono, vec![0.5, 0.5]);
    }

    #[test]
    fn test_samples_for_tick_carries_fraction() {
        let mut carry = 0.0;
        let total: usize = (0..60)
            .map(|_| samples_for_tick(44100, 1.0 / 60.0, &mut carry))
            .sum();
        assert!((44099..=44100).contains(&total));
    }
}
