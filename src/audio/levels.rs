//! Per-band output arrays and exponential smoothing.

use tracing::debug;

/// Smoothing coefficient for one tick
///
/// `exp(-sensitivity * delta_time)`: 1.0 keeps the previous mean, 0.0 snaps
/// to the new level.
pub fn smoothing_filter(sensitivity: f32, delta_time: f32) -> f32 {
    (-sensitivity * delta_time).exp()
}

/// Instantaneous and smoothed band levels
///
/// Both vectors always have the same length. They start empty and are
/// recreated (zeroed) whenever the band count changes.
#[derive(Debug, Clone, Default)]
pub struct BandLevels {
    levels: Vec<f32>,
    mean_levels: Vec<f32>,
}

impl BandLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocate both arrays if the band count changed
    ///
    /// Returns true when a reallocation happened (smoothing history is lost).
    pub fn ensure_band_count(&mut self, band_count: usize) -> bool {
        if self.levels.len() == band_count {
            return false;
        }
        debug!(
            "Reallocating band levels: {} -> {} bands",
            self.levels.len(),
            band_count
        );
        self.levels = vec![0.0; band_count];
        self.mean_levels = vec![0.0; band_count];
        true
    }

    /// Store this tick's level for band `index` and advance its mean
    pub fn apply(&mut self, index: usize, level: f32, filter: f32) {
        self.levels[index] = level;
        self.mean_levels[index] = level - (level - self.mean_levels[index]) * filter;
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    pub fn mean_levels(&self) -> &[f32] {
        &self.mean_levels
    }

    pub fn band_count(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_filter_limits() {
        assert_eq!(smoothing_filter(8.0, 0.0), 1.0);
        assert!(smoothing_filter(8.0, 100.0) < 1e-6);
        assert_abs_diff_eq!(smoothing_filter(8.0, 0.125), (-1.0f32).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_starts_empty() {
        let levels = BandLevels::new();
        assert!(levels.levels().is_empty());
        assert!(levels.mean_levels().is_empty());
    }

    #[test]
    fn test_reallocation_only_on_change() {
        let mut levels = BandLevels::new();
        assert!(levels.ensure_band_count(4));
        levels.apply(0, 10.0, 0.5);
        assert!(!levels.ensure_band_count(4));
        assert_eq!(levels.mean_levels()[0], 5.0);

        assert!(levels.ensure_band_count(8));
        assert_eq!(levels.levels().len(), 8);
        assert_eq!(levels.mean_levels(), &[0.0; 8]);
    }

    #[test]
    fn test_apply_smoothing_formula() {
        let mut levels = BandLevels::new();
        levels.ensure_band_count(1);

        // Zero filter snaps to the level
        levels.apply(0, -40.0, 0.0);
        assert_eq!(levels.mean_levels()[0], -40.0);

        // Unit filter holds the previous mean
        levels.apply(0, 0.0, 1.0);
        assert_eq!(levels.levels()[0], 0.0);
        assert_eq!(levels.mean_levels()[0], -40.0);
    }
}
