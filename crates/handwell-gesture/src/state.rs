//! Per-role gesture state
//!
//! One [`HandTracker`] exists per hand role. It is the only writer of its
//! [`GestureState`] and the only owner of the cursor filter for that role.

use handwell_core::{Handedness, NormalizedPoint};
use tracing::debug;

use crate::classifier::HandFeatures;
use crate::filter::{CursorFilter, CursorFilterConfig};

/// Gesture state for one hand role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    /// Hand present in the latest frame
    pub present: bool,
    /// Smoothed cursor
    pub cursor: NormalizedPoint,
    /// Unsmoothed pointer of the latest frame
    pub raw_pointer: NormalizedPoint,
    pub is_pinching: bool,
    pub pinch_strength: f32,
    pub pinch_distance: f32,
    /// Pinch began this frame
    pub pinch_started: bool,
    pub is_fist: bool,
    /// Fist engaged this frame
    pub fist_started: bool,
    pub rotation: f32,
    pub vertical_position: f32,
    pub extended_fingers: u8,
}

impl GestureState {
    /// State of an absent hand
    pub fn neutral() -> Self {
        Self {
            present: false,
            cursor: NormalizedPoint::CENTER,
            raw_pointer: NormalizedPoint::CENTER,
            is_pinching: false,
            pinch_strength: 0.0,
            pinch_distance: f32::INFINITY,
            pinch_started: false,
            is_fist: false,
            fist_started: false,
            rotation: 0.0,
            vertical_position: 0.5,
            extended_fingers: 0,
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Cross-frame tracker for one hand role
#[derive(Debug, Clone)]
pub struct HandTracker {
    role: Handedness,
    filter: CursorFilter,
    state: GestureState,
}

impl HandTracker {
    pub fn new(role: Handedness, filter: &CursorFilterConfig) -> Self {
        Self {
            role,
            filter: CursorFilter::new(filter),
            state: GestureState::neutral(),
        }
    }

    pub fn role(&self) -> Handedness {
        self.role
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Fold this frame's features into the state
    pub fn observe(&mut self, features: &HandFeatures) -> &GestureState {
        let previous = self.state;
        let cursor = self.filter.update(features.pointer);

        if !previous.present {
            debug!(role = %self.role, "hand acquired");
        }

        self.state = GestureState {
            present: true,
            cursor,
            raw_pointer: features.pointer,
            is_pinching: features.is_pinching,
            pinch_strength: features.pinch_strength,
            pinch_distance: features.pinch_distance,
            pinch_started: features.is_pinching && !previous.is_pinching,
            is_fist: features.is_fist,
            fist_started: features.is_fist && !previous.is_fist,
            rotation: features.rotation,
            vertical_position: features.vertical_position,
            extended_fingers: features.extended_fingers,
        };

        &self.state
    }

    /// Hand absent this frame: return to neutral
    pub fn lose(&mut self) {
        if self.state.present {
            debug!(role = %self.role, "hand lost");
        }
        self.filter.reset();
        self.state = GestureState::neutral();
    }

    /// Frame skipped for a degenerate sample: edge flags clear, the rest holds
    pub fn hold(&mut self) {
        self.state.pinch_started = false;
        self.state.fist_started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tests::open_palm;
    use crate::classifier::GestureClassifier;

    fn features() -> HandFeatures {
        GestureClassifier::default()
            .classify(&open_palm(Handedness::Right))
            .unwrap()
    }

    #[test]
    fn test_observe_smooths_cursor() {
        let mut tracker = HandTracker::new(Handedness::Right, &CursorFilterConfig::default());
        let f = features();

        let state = *tracker.observe(&f);

        assert!(state.present);
        assert_eq!(state.raw_pointer, f.pointer);
        let expected_x = 0.5 + (f.pointer.x - 0.5) * 0.2;
        assert!((state.cursor.x - expected_x).abs() < 1e-6);
    }

    #[test]
    fn test_pinch_edge() {
        let mut tracker = HandTracker::new(Handedness::Right, &CursorFilterConfig::default());
        let mut f = features();
        f.is_pinching = true;

        assert!(tracker.observe(&f).pinch_started);
        assert!(!tracker.observe(&f).pinch_started);
        assert!(tracker.state().is_pinching);
    }

    #[test]
    fn test_fist_edge_and_hold() {
        let mut tracker = HandTracker::new(Handedness::Left, &CursorFilterConfig::default());
        let mut f = features();
        f.is_fist = true;

        assert!(tracker.observe(&f).fist_started);
        tracker.hold();
        assert!(!tracker.state().fist_started);
        assert!(tracker.state().is_fist);
    }

    #[test]
    fn test_lose_resets_to_neutral() {
        let mut tracker = HandTracker::new(Handedness::Right, &CursorFilterConfig::default());
        tracker.observe(&features());
        tracker.lose();

        assert_eq!(*tracker.state(), GestureState::neutral());

        // filter restarts from the centre
        let f = features();
        let state = tracker.observe(&f);
        let expected_x = 0.5 + (f.pointer.x - 0.5) * 0.2;
        assert!((state.cursor.x - expected_x).abs() < 1e-6);
    }
}
