//! Synthetic hand poses
//!
//! A [`HandPose`] describes a hand the way a test thinks about it (where the
//! index tip points on screen, how many fingers are up, pinching or not) and
//! renders it into the raw 21-point shape a landmark source reports.

use std::f64::consts::PI;

use handwell_core::{Handedness, NormalizedPoint, LANDMARK_COUNT};
use handwell_gesture::{OptionAlphabet, RawHand};
use rand::rngs::StdRng;
use rand::Rng;

/// Offsets from the wrist, image space (y grows downward)
const THUMB_CMC: (f32, f32) = (-0.05, -0.05);
const THUMB_MCP: (f32, f32) = (-0.08, -0.10);
const THUMB_IP: (f32, f32) = (-0.10, -0.14);
const THUMB_TIP_OPEN: (f32, f32) = (-0.20, -0.20);
const THUMB_TIP_FOLDED: (f32, f32) = (-0.05, -0.08);
const FINGER_X: [f32; 4] = [-0.06, -0.02, 0.02, 0.06];
const FINGER_MCP_Y: f32 = -0.15;
const FINGER_PIP_Y: f32 = -0.25;
const FINGER_DIP_Y: f32 = -0.32;
const FINGER_TIP_OPEN_Y: f32 = -0.40;
const FINGER_TIP_FOLDED_Y: f32 = -0.20;

/// Half the wrist to middle-MCP span of a fist
const FIST_HALF_SPAN: f32 = 0.125;

/// Gap between thumb and index tips while pinching
pub const PINCH_GAP: f32 = 0.01;

/// A hand to render into a frame
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    pub handedness: Handedness,
    /// Index tip in mirrored screen space
    pub pointer: NormalizedPoint,
    /// Extended fingers, counted index first, thumb fifth
    pub fingers: u8,
    /// Thumb tip placed this far right of the index tip
    pub pinch_gap: Option<f32>,
    /// Wrist to middle-MCP angle override, radians
    pub rotation: Option<f64>,
    /// Closed fist at this vertical position
    pub fist: Option<f32>,
    /// Landmark-source confidence
    pub score: f32,
}

impl HandPose {
    /// Open hand, all five fingers up, pointing at the centre
    pub fn open(handedness: Handedness) -> Self {
        Self {
            handedness,
            pointer: NormalizedPoint::CENTER,
            fingers: 5,
            pinch_gap: None,
            rotation: None,
            fist: None,
            score: 0.95,
        }
    }

    pub fn right() -> Self {
        Self::open(Handedness::Right)
    }

    pub fn left() -> Self {
        Self::open(Handedness::Left)
    }

    /// Point the index tip at a mirrored screen position
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.pointer = NormalizedPoint::new(x, y);
        self
    }

    pub fn fingers(mut self, count: u8) -> Self {
        self.fingers = count.min(5);
        self
    }

    pub fn pinching(self) -> Self {
        self.pinch_gap(PINCH_GAP)
    }

    /// Thumb tip `gap` from the index tip
    pub fn pinch_gap(mut self, gap: f32) -> Self {
        self.pinch_gap = Some(gap);
        self
    }

    /// Turn the hand so the wrist to middle-MCP angle is `angle`
    pub fn turned(mut self, angle: f64) -> Self {
        self.rotation = Some(angle);
        self
    }

    /// Turn the hand onto `option` of an alphabet dial, mid-bucket
    pub fn dialing(self, alphabet: &OptionAlphabet, option: char) -> Self {
        let index = (0..alphabet.len())
            .find(|i| alphabet.get(*i) == Some(option))
            .unwrap_or(alphabet.origin());
        self.turned(dial_angle(index, alphabet.origin(), alphabet.len()))
    }

    /// Closed fist whose wrist and middle MCP average to `vertical`
    pub fn fist(mut self, vertical: f32) -> Self {
        self.fist = Some(vertical);
        self
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Raw landmark-source output for this pose
    pub fn to_raw(&self) -> RawHand {
        let points = match self.fist {
            Some(vertical) => self.fist_points(vertical),
            None => self.open_points(),
        };
        RawHand {
            handedness: self.handedness.as_str().to_string(),
            score: self.score,
            points,
        }
    }

    /// Raw output with every coordinate nudged by up to `amount`
    pub fn to_raw_jittered(&self, rng: &mut StdRng, amount: f32) -> RawHand {
        let mut raw = self.to_raw();
        if amount > 0.0 {
            for p in &mut raw.points {
                p[0] += rng.gen_range(-amount..=amount);
                p[1] += rng.gen_range(-amount..=amount);
            }
        }
        raw
    }

    /// Image-space index tip; the landmark source sees the unmirrored frame
    fn index_tip(&self) -> (f32, f32) {
        (1.0 - self.pointer.x, self.pointer.y)
    }

    fn open_points(&self) -> Vec<[f32; 3]> {
        let (tip_x, tip_y) = self.index_tip();
        let index_tip_y = if self.fingers >= 1 {
            FINGER_TIP_OPEN_Y
        } else {
            FINGER_TIP_FOLDED_Y
        };
        let wx = tip_x - FINGER_X[0];
        let wy = tip_y - index_tip_y;
        let at = |(dx, dy): (f32, f32)| [wx + dx, wy + dy, 0.0];

        let mut points = vec![[wx, wy, 0.0]; LANDMARK_COUNT];
        points[1] = at(THUMB_CMC);
        points[2] = at(THUMB_MCP);
        points[3] = at(THUMB_IP);
        points[4] = at(if self.fingers >= 5 {
            THUMB_TIP_OPEN
        } else {
            THUMB_TIP_FOLDED
        });

        for (f, dx) in FINGER_X.iter().enumerate() {
            let base = 5 + f * 4;
            let tip_y = if (f as u8) < self.fingers {
                FINGER_TIP_OPEN_Y
            } else {
                FINGER_TIP_FOLDED_Y
            };
            points[base] = at((*dx, FINGER_MCP_Y));
            points[base + 1] = at((*dx, FINGER_PIP_Y));
            points[base + 2] = at((*dx, FINGER_DIP_Y));
            points[base + 3] = at((*dx, tip_y));
        }

        if let Some(gap) = self.pinch_gap {
            let index = points[8];
            points[4] = [index[0] + gap, index[1], 0.0];
        }
        if let Some(angle) = self.rotation {
            points[9] = [
                wx + 0.15 * angle.cos() as f32,
                wy + 0.15 * angle.sin() as f32,
                0.0,
            ];
        }
        points
    }

    fn fist_points(&self, vertical: f32) -> Vec<[f32; 3]> {
        let (x, _) = self.index_tip();
        let wrist = [x, vertical + FIST_HALF_SPAN, 0.0];
        let mut points = vec![wrist; LANDMARK_COUNT];
        points[9] = [x, vertical - FIST_HALF_SPAN, 0.0];
        points
    }
}

/// Dial angle landing mid-way into option `index`'s bucket
pub fn dial_angle(index: usize, origin: usize, count: usize) -> f64 {
    PI - ((index as f64 + 0.5) / count as f64 - origin as f64 / count as f64) * 2.0 * PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use handwell_core::FrameTime;
    use handwell_gesture::{sample_from_raw, GestureClassifier};
    use rand::SeedableRng;

    fn classify(pose: &HandPose) -> handwell_gesture::HandFeatures {
        let sample = sample_from_raw(&pose.to_raw(), FrameTime::ZERO).unwrap();
        GestureClassifier::default().classify(&sample).unwrap()
    }

    #[test]
    fn test_pointer_lands_where_asked() {
        let features = classify(&HandPose::right().at(0.3, 0.4));

        assert!((features.pointer.x - 0.3).abs() < 1e-6);
        assert!((features.pointer.y - 0.4).abs() < 1e-6);
        assert!(!features.is_pinching);
        assert!(!features.is_fist);
    }

    #[test]
    fn test_finger_counts() {
        for n in 0..=5 {
            assert_eq!(classify(&HandPose::left().fingers(n)).extended_fingers, n);
        }
    }

    #[test]
    fn test_pinch_gap() {
        let features = classify(&HandPose::right().pinch_gap(0.115));
        assert!((features.pinch_distance - 0.115).abs() < 1e-5);

        assert!(classify(&HandPose::right().pinching()).is_pinching);
    }

    #[test]
    fn test_fist_vertical() {
        let features = classify(&HandPose::left().fist(0.25));

        assert!(features.is_fist);
        assert_eq!(features.vertical_position, 0.25);
    }

    #[test]
    fn test_dialing_selects_option() {
        let alphabet = OptionAlphabet::editor();
        let features = classify(&HandPose::left().dialing(&alphabet, 'q'));

        assert_eq!(alphabet.get(alphabet.mapper().index(features.rotation as f64)), Some('q'));
    }

    #[test]
    fn test_jitter_is_seeded() {
        let pose = HandPose::right().at(0.5, 0.4);
        let a = pose.to_raw_jittered(&mut StdRng::seed_from_u64(7), 0.01);
        let b = pose.to_raw_jittered(&mut StdRng::seed_from_u64(7), 0.01);

        assert_eq!(a, b);
        assert_ne!(a, pose.to_raw());
    }
}
