//! Band backend interface for external-source mode.
//!
//! A backend computes band energies itself and hands back a fixed-capacity
//! buffer. The band count comes from an explicit field when the backend
//! provides one, otherwise from a bounded scan for the first non-positive
//! sentinel.

use tracing::warn;

use crate::error::{BridgeError, Result};

/// Slots in a backend response
pub const BAND_CAPACITY: usize = 32;

/// Configuration echoed to the backend on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendRequest {
    /// Analysis point count of the active preset
    pub analysis_point_count: usize,
    /// Backend id of the active preset
    pub preset_id: u32,
}

/// Band levels produced by a backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    /// Band levels; unused trailing slots hold a non-positive sentinel
    pub band_levels: [f32; BAND_CAPACITY],
    /// Explicit number of valid bands, authoritative when present
    pub band_count: Option<usize>,
}

impl BackendResponse {
    /// Response with an explicit band count; remaining slots are zeroed
    pub fn with_levels(levels: &[f32]) -> Self {
        let count = levels.len().min(BAND_CAPACITY);
        let mut band_levels = [0.0; BAND_CAPACITY];
        band_levels[..count].copy_from_slice(&levels[..count]);
        Self {
            band_levels,
            band_count: Some(count),
        }
    }

    /// Response relying on the sentinel convention (no explicit count)
    pub fn terminated(band_levels: [f32; BAND_CAPACITY]) -> Self {
        Self {
            band_levels,
            band_count: None,
        }
    }

    /// Number of valid bands in this response
    pub fn valid_band_count(&self) -> Result<usize> {
        match self.band_count {
            Some(count) if count > BAND_CAPACITY => Err(BridgeError::BandCountOverflow {
                count,
                capacity: BAND_CAPACITY,
            }),
            Some(count) => Ok(count),
            None => Ok(discover_band_count(&self.band_levels)),
        }
    }
}

/// Count leading entries strictly greater than zero
///
/// The scan never reads past `BAND_CAPACITY`. A buffer with no sentinel
/// counts as full and is reported.
pub fn discover_band_count(band_levels: &[f32; BAND_CAPACITY]) -> usize {
    match band_levels.iter().position(|&level| level <= 0.0 || level.is_nan()) {
        Some(count) => count,
        None => {
            warn!(
                "Backend response has no sentinel within {} slots; using all of them",
                BAND_CAPACITY
            );
            BAND_CAPACITY
        }
    }
}

/// Source of pre-reduced band levels (external-source mode)
pub trait BandBackend {
    /// Compute band levels for the requested configuration
    fn update(&mut self, request: &BackendRequest) -> Result<BackendResponse>;
}

impl<B: BandBackend + ?Sized> BandBackend for Box<B> {
    fn update(&mut self, request: &BackendRequest) -> Result<BackendResponse> {
        (**self).update(request)
    }
}
