//! Procedural synth feed for running without an input device.

use glicol::Engine;
use tracing::info;

use super::feed::{samples_for_tick, SampleBuffer, SampleFeed};
use crate::error::{BridgeError, Result};
use crate::params::{audio_constants::BLOCK_SIZE, FeedConfig};

/// Glicol composition (procedural music code)
pub const GLICOL_COMPOSITION: &str = r#"
~gate: speed 2.0 >> seq 60 _60 _~a 48
~a: choose 48 48 48 72 0 0 0
~amp: ~gate >> envperc 0.001 0.1
~pit: ~gate >> mul 261.63
~lead: saw ~pit >> mul ~amp >> lpf ~mod 5.0 >> mul 0.1
~mod: sin 0.2 >> mul 1300 >> add 1500
~sub: sin 55 >> mul 0.2
o: mix ~lead ~sub >> plate 0.1
"#;

/// Renders a Glicol patch block by block into a sample buffer
pub struct SynthFeed {
    engine: Engine<BLOCK_SIZE>,
    sample_rate: u32,
    carry: f64,
    /// Rendered samples not yet pushed
    pending: Vec<f32>,
    buffer: SampleBuffer,
}

impl SynthFeed {
    /// Compile `code` and prepare to render at the configured sample rate
    pub fn new(config: &FeedConfig, code: &str, buffer: SampleBuffer) -> Result<Self> {
        config.validate()?;

        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(config.sample_rate_hz);
        engine.update_with_code(code);
        engine
            .update()
            .map_err(|e| BridgeError::Synth(format!("Glicol engine init failed: {:?}", e)))?;

        info!("Synth: Glicol @ {}Hz", config.sample_rate_hz);

        Ok(Self {
            engine,
            sample_rate: config.sample_rate_hz as u32,
            carry: 0.0,
            pending: Vec::with_capacity(BLOCK_SIZE),
            buffer,
        })
    }
}

impl SampleFeed for SynthFeed {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn advance(&mut self, delta_time: f32) -> Result<()> {
        let needed = samples_for_tick(self.sample_rate, delta_time, &mut self.carry);

        // Generate multiple blocks if needed to cover the tick
        while self.pending.len() < needed {
            let (buffers, _) = self.engine.next_block(vec![]);
            for i in 0..BLOCK_SIZE {
                self.pending.push((buffers[0][i] + buffers[1][i]) * 0.5);
            }
        }

        self.buffer.push(&self.pending[..needed]);
        self.pending.drain(..needed);
        Ok(())
    }
}
