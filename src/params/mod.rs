//! Parameter definitions with physical units and documented semantics.
//!
//! All tunables live here with:
//! - Physical units (seconds, Hz, etc.)
//! - Documented ranges and meanings
//! - Validation where values can be out of range

mod analysis;
mod bands;

// Re-export all types
pub use analysis::{audio_constants, FeedConfig, ReducerConfig};
pub use bands::BandPreset;
