//! Cursor filter - exponential smoothing of the raw pointer
//!
//! `cursor += (raw - cursor) * alpha`, per axis. A fixed-weight IIR trades a
//! little latency for a stable cursor with no sample history. No clamping is
//! applied; consumers clamp to their own coordinate space.

use handwell_core::NormalizedPoint;
use serde::Deserialize;

/// Cursor filter configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CursorFilterConfig {
    /// Weight of the newest sample, (0, 1]
    pub alpha: f32,
}

impl Default for CursorFilterConfig {
    fn default() -> Self {
        Self { alpha: 0.2 }
    }
}

/// Exponential moving average over a 2D point
#[derive(Debug, Clone)]
pub struct CursorFilter {
    alpha: f32,
    position: NormalizedPoint,
}

impl CursorFilter {
    /// Create a filter resting at the viewport centre. `alpha` is clamped to
    /// (0, 1].
    pub fn new(config: &CursorFilterConfig) -> Self {
        let alpha = if config.alpha.is_finite() {
            config.alpha.clamp(f32::EPSILON, 1.0)
        } else {
            CursorFilterConfig::default().alpha
        };
        Self {
            alpha,
            position: NormalizedPoint::CENTER,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Current smoothed position
    pub fn position(&self) -> NormalizedPoint {
        self.position
    }

    /// Feed one raw sample, returning the new smoothed position
    pub fn update(&mut self, raw: NormalizedPoint) -> NormalizedPoint {
        self.position.x += (raw.x - self.position.x) * self.alpha;
        self.position.y += (raw.y - self.position.y) * self.alpha;
        self.position
    }

    /// Return to the neutral centre position
    pub fn reset(&mut self) {
        self.position = NormalizedPoint::CENTER;
    }
}

impl Default for CursorFilter {
    fn default() -> Self {
        Self::new(&CursorFilterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_without_overshoot() {
        let mut filter = CursorFilter::default();
        let target = NormalizedPoint::new(1.0, 1.0);

        let mut last = filter.position().x;
        for _ in 0..5 {
            let p = filter.update(target);
            assert!(p.x > last);
            assert!(p.x <= 1.0);
            last = p.x;
        }
        // 1 - 0.5 * 0.8^5
        assert!((last - 0.83616).abs() < 1e-4);
    }

    #[test]
    fn test_axes_independent() {
        let mut filter = CursorFilter::default();
        let p = filter.update(NormalizedPoint::new(1.0, 0.5));

        assert!((p.x - 0.6).abs() < 1e-6);
        assert_eq!(p.y, 0.5);
    }

    #[test]
    fn test_no_clamping() {
        let mut filter = CursorFilter::new(&CursorFilterConfig { alpha: 1.0 });
        let p = filter.update(NormalizedPoint::new(1.4, -0.2));

        assert_eq!(p, NormalizedPoint::new(1.4, -0.2));
    }

    #[test]
    fn test_reset_to_centre() {
        let mut filter = CursorFilter::default();
        filter.update(NormalizedPoint::new(0.0, 0.0));
        filter.reset();

        assert_eq!(filter.position(), NormalizedPoint::CENTER);
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(CursorFilter::new(&CursorFilterConfig { alpha: 3.0 }).alpha(), 1.0);
        assert_eq!(
            CursorFilter::new(&CursorFilterConfig { alpha: f32::NAN }).alpha(),
            0.2
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_monotone_approach(start in 0.0f32..1.0, target in 0.0f32..1.0, frames in 1usize..60) {
            let mut filter = CursorFilter::default();
            filter.update(NormalizedPoint::new(start, start));
            let mut gap = (target - filter.position().x).abs();
            for _ in 0..frames {
                let p = filter.update(NormalizedPoint::new(target, target));
                let next_gap = (target - p.x).abs();
                proptest::prop_assert!(next_gap <= gap + 1e-6);
                gap = next_gap;
            }
        }
    }
}
