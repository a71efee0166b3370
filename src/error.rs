//! Error types for band analysis and the audio feeds behind it.

/// Result type alias for band analysis operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors raised while configuring or ticking the band reducer.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Smoothing sensitivity must be a positive, finite number
    #[error("sensitivity must be > 0, got {0}")]
    InvalidSensitivity(f32),

    /// Tick duration must be finite and non-negative
    #[error("delta time must be >= 0 seconds, got {0}")]
    InvalidDeltaTime(f32),

    /// Backend referenced a preset id outside the band table
    #[error("unknown band preset id {0}")]
    UnknownPreset(u32),

    /// Backend reported more bands than the response buffer holds
    #[error("backend reported {count} bands, capacity is {capacity}")]
    BandCountOverflow { count: usize, capacity: usize },

    /// Spectral source reported an unusable sample rate
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Configuration values rejected by `validate()`
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Band backend call failed
    #[error("band backend failed: {0}")]
    Backend(String),

    /// No capture device is available
    #[error("no audio input device found")]
    NoInputDevice,

    /// Audio device or stream setup failed
    #[error("audio device error: {0}")]
    Device(String),

    /// WAV file could not be read
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Synth engine rejected the patch or failed to render
    #[error("synth engine error: {0}")]
    Synth(String),
}
