//! Octave-bridge library - octave band levels for audio-reactive visuals

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;

pub use error::{BridgeError, Result};
