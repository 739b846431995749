//! Rotation-dial selector
//!
//! The hand is a dial: its angle maps onto an option index, holding an index
//! for the rotation threshold commits it. An option that was the last commit
//! is not committed again until some other option has been committed.

use std::time::Duration;

use handwell_core::FrameTime;
use handwell_gesture::RotationIndexMapper;
use tracing::{debug, info};

use crate::activator::{DwellActivator, DwellConfig, DwellUpdate};

/// Outcome of one rotation update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationStep {
    /// Option under the dial this frame
    pub index: usize,
    /// Time left before commit, while a commit is still possible
    pub remaining: Option<Duration>,
    pub fraction: f32,
    /// Set on the frame an option is committed
    pub committed: Option<usize>,
}

/// Rotation-dial selection state
#[derive(Debug, Clone)]
pub struct RotationSelector {
    mapper: RotationIndexMapper,
    dwell: DwellActivator<usize>,
    preview: Option<usize>,
    last_committed: Option<usize>,
}

impl RotationSelector {
    pub fn new(mapper: RotationIndexMapper, config: DwellConfig) -> Self {
        Self {
            mapper,
            dwell: DwellActivator::new(config),
            preview: None,
            last_committed: None,
        }
    }

    pub fn mapper(&self) -> &RotationIndexMapper {
        &self.mapper
    }

    /// Option currently previewed
    pub fn preview(&self) -> Option<usize> {
        self.preview
    }

    pub fn last_committed(&self) -> Option<usize> {
        self.last_committed
    }

    /// Advance with this frame's hand angle
    pub fn update(&mut self, angle: f32, now: FrameTime) -> RotationStep {
        let index = self.mapper.index(angle as f64);
        if self.preview != Some(index) {
            debug!(index, "rotation preview");
            self.preview = Some(index);
        }

        let blocked = self.last_committed == Some(index);
        match self.dwell.update(Some(index), now) {
            DwellUpdate::Progress {
                elapsed, fraction, ..
            } if !blocked => RotationStep {
                index,
                remaining: Some(self.dwell.config().threshold.saturating_sub(elapsed)),
                fraction,
                committed: None,
            },
            DwellUpdate::Fired { target } if !blocked => {
                info!(index = target, "rotation option committed");
                self.last_committed = Some(target);
                RotationStep {
                    index,
                    remaining: None,
                    fraction: 1.0,
                    committed: Some(target),
                }
            }
            _ => RotationStep {
                index,
                remaining: None,
                fraction: 0.0,
                committed: None,
            },
        }
    }

    /// Drop the preview and its timer; the last commit stays
    pub fn reset_preview(&mut self) {
        self.preview = None;
        self.dwell.interrupt();
    }

    /// Forget everything, including the last commit
    pub fn reset(&mut self) {
        self.reset_preview();
        self.last_committed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn ms(v: i64) -> FrameTime {
        FrameTime::from_millis(v)
    }

    fn selector() -> RotationSelector {
        RotationSelector::new(
            RotationIndexMapper::new(89, 26).unwrap(),
            DwellConfig::rotation(),
        )
    }

    /// Angle at the centre of an option's sector
    fn angle_for(index: usize) -> f32 {
        let turn = (index as f64 + 0.5) / 89.0 - 26.0 / 89.0;
        (PI - turn * 2.0 * PI) as f32
    }

    #[test]
    fn test_angle_helper_lands_on_index() {
        let mapper = RotationIndexMapper::new(89, 26).unwrap();
        for i in [0usize, 3, 26, 50, 88] {
            assert_eq!(mapper.index(angle_for(i) as f64), i);
        }
    }

    #[test]
    fn test_commit_after_hold() {
        let mut sel = selector();
        let a = angle_for(26);

        assert_eq!(sel.update(a, ms(0)).remaining, Some(Duration::from_millis(2000)));
        assert_eq!(sel.update(a, ms(1000)).committed, None);
        let step = sel.update(a, ms(2000));

        assert_eq!(step.committed, Some(26));
        assert_eq!(sel.last_committed(), Some(26));
        assert_eq!(sel.update(a, ms(5000)).committed, None);
    }

    #[test]
    fn test_index_change_restarts_timer() {
        let mut sel = selector();
        sel.update(angle_for(26), ms(0));
        sel.update(angle_for(27), ms(1500));

        assert_eq!(sel.update(angle_for(27), ms(3000)).committed, None);
        assert_eq!(sel.update(angle_for(27), ms(3500)).committed, Some(27));
    }

    #[test]
    fn test_last_commit_not_reselected() {
        let mut sel = selector();
        sel.update(angle_for(10), ms(0));
        sel.update(angle_for(10), ms(2000));

        sel.update(angle_for(11), ms(2100));
        sel.update(angle_for(10), ms(2200));
        let step = sel.update(angle_for(10), ms(5000));

        assert_eq!(step.committed, None);
        assert_eq!(step.remaining, None);
        assert_eq!(sel.preview(), Some(10));
    }

    #[test]
    fn test_reset_preview_keeps_last_commit() {
        let mut sel = selector();
        sel.update(angle_for(5), ms(0));
        sel.update(angle_for(5), ms(2000));
        sel.update(angle_for(6), ms(2100));
        sel.reset_preview();

        assert_eq!(sel.preview(), None);
        assert_eq!(sel.last_committed(), Some(5));
        // timer restarted by the reset
        assert_eq!(sel.update(angle_for(6), ms(3000)).committed, None);
        assert_eq!(sel.update(angle_for(6), ms(5000)).committed, Some(6));
    }

    #[test]
    fn test_reset_allows_recommit() {
        let mut sel = selector();
        sel.update(angle_for(5), ms(0));
        sel.update(angle_for(5), ms(2000));
        sel.reset();

        sel.update(angle_for(5), ms(3000));
        assert_eq!(sel.update(angle_for(5), ms(5000)).committed, Some(5));
    }
}
