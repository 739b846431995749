//! Stability selector
//!
//! Fires once when a discrete reading (the extended-finger count) holds the
//! same value for the stability threshold. The reading must change before it
//! can fire again.

use std::time::Duration;

use handwell_core::FrameTime;
use tracing::info;

use crate::activator::{DwellActivator, DwellConfig, DwellUpdate};

/// Outcome of one stability update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityStep {
    pub value: u8,
    /// Time left before the value is accepted, while still pending
    pub pending: Option<Duration>,
    /// Set on the frame the value is accepted
    pub selected: Option<u8>,
}

/// Debounces a discrete reading into one-shot selections
#[derive(Debug, Clone)]
pub struct StabilitySelector {
    dwell: DwellActivator<u8>,
    selected: Option<u8>,
}

impl StabilitySelector {
    pub fn new(config: DwellConfig) -> Self {
        Self {
            dwell: DwellActivator::new(config),
            selected: None,
        }
    }

    /// Last accepted value
    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    pub fn update(&mut self, value: u8, now: FrameTime) -> StabilityStep {
        match self.dwell.update(Some(value), now) {
            DwellUpdate::Progress { elapsed, .. } => StabilityStep {
                value,
                pending: Some(self.dwell.config().threshold.saturating_sub(elapsed)),
                selected: None,
            },
            DwellUpdate::Fired { target } => {
                info!(value = target, "stable value selected");
                self.selected = Some(target);
                StabilityStep {
                    value,
                    pending: None,
                    selected: Some(target),
                }
            }
            _ => StabilityStep {
                value,
                pending: None,
                selected: None,
            },
        }
    }

    /// Hand lost: pending reading discarded
    pub fn reset(&mut self) {
        self.dwell.interrupt();
    }
}

impl Default for StabilitySelector {
    fn default() -> Self {
        Self::new(DwellConfig::stability())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(selector: &mut StabilitySelector, counts: &[u8], spacing_ms: i64) -> Vec<u8> {
        counts
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                selector
                    .update(*c, FrameTime::from_millis(i as i64 * spacing_ms))
                    .selected
            })
            .collect()
    }

    #[test]
    fn test_change_before_stable_never_selects() {
        let mut selector = StabilitySelector::default();

        assert!(run(&mut selector, &[2, 2, 2, 3], 300).is_empty());
        assert_eq!(selector.selected(), None);
    }

    #[test]
    fn test_stable_count_selects_once() {
        let mut selector = StabilitySelector::default();

        assert_eq!(run(&mut selector, &[2, 2, 2, 2, 2], 200), vec![2]);
        assert_eq!(selector.selected(), Some(2));
    }

    #[test]
    fn test_long_hold_selects_once() {
        let mut selector = StabilitySelector::default();

        assert_eq!(run(&mut selector, &[4; 40], 100), vec![4]);
    }

    #[test]
    fn test_pending_countdown() {
        let mut selector = StabilitySelector::default();
        selector.update(1, FrameTime::from_millis(0));
        let step = selector.update(1, FrameTime::from_millis(300));

        assert_eq!(step.pending, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_reset_restarts_timer() {
        let mut selector = StabilitySelector::default();
        selector.update(3, FrameTime::from_millis(0));
        selector.update(3, FrameTime::from_millis(600));
        selector.reset();

        assert_eq!(selector.update(3, FrameTime::from_millis(800)).selected, None);
        assert_eq!(selector.update(3, FrameTime::from_millis(1600)).selected, Some(3));
    }
}
