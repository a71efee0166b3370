//! Live input capture from the default audio device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use tracing::{error, info};

use super::feed::{SampleBuffer, SampleFeed};
use crate::error::{BridgeError, Result};

/// Captures the default input device into a sample buffer
pub struct LiveCapture {
    /// Audio input stream (kept alive)
    _stream: cpal::Stream,

    sample_rate: u32,
}

impl LiveCapture {
    /// Open the default input device and start capturing
    pub fn start(buffer: SampleBuffer) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(BridgeError::NoInputDevice)?;

        let supported = device
            .default_input_config()
            .map_err(|e| BridgeError::Device(format!("Failed to get input config: {}", e)))?;

        info!(
            "Audio input: {} @ {}Hz, {} channel(s)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            supported.sample_rate().0,
            supported.channels()
        );

        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, buffer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, buffer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, buffer)?,
            other => {
                return Err(BridgeError::Device(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| BridgeError::Device(format!("Failed to start input stream: {}", e)))?;

        Ok(Self {
            _stream: stream,
            sample_rate: config.sample_rate.0,
        })
    }
}

impl SampleFeed for LiveCapture {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    // The stream callback fills the buffer in real time
    fn advance(&mut self, _delta_time: f32) -> Result<()> {
        Ok(())
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: SampleBuffer,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels.max(1) as usize;
    let mut mono = Vec::new();

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                mono.clear();
                mono.extend(data.chunks_exact(channels).map(|frame| {
                    frame.iter().map(|&s| s.to_sample::<f32>()).sum::<f32>() / channels as f32
                }));
                buffer.push(&mono);
            },
            |err| error!("Audio input stream error: {}", err),
            None,
        )
        .map_err(|e| BridgeError::Device(format!("Failed to build input stream: {}", e)))
}
