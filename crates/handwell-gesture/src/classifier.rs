//! Gesture classifier - per-hand, per-frame feature derivation
//!
//! Every feature is a pure function of one [`HandSample`]. Distances are
//! measured in the image plane; the relative depth reported by landmark
//! sources is too noisy to threshold on.

use std::f32::consts::PI;

use handwell_core::{HandLandmark, HandSample, Handedness, NormalizedPoint};
use serde::Deserialize;
use tracing::warn;

/// Classification thresholds, in normalized image units
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Thumb-tip to index-tip distance below which the hand pinches
    pub pinch: f32,
    /// Mean wrist-to-fingertip distance below which the hand is a fist
    pub fist: f32,
    /// How far a fingertip must sit above its PIP joint to count as extended
    pub finger_extension_margin: f32,
    /// Thumb tip must be this many times farther from the wrist than the thumb MCP
    pub thumb_extension_ratio: f32,
    /// Mirror x for a user-facing camera
    pub mirror_x: bool,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            pinch: 0.06,
            fist: 0.15,
            finger_extension_margin: 0.02,
            thumb_extension_ratio: 1.3,
            mirror_x: true,
        }
    }
}

impl GestureThresholds {
    /// Tighter pinch used where pinching drives fine scaling
    pub fn editor() -> Self {
        Self {
            pinch: 0.05,
            ..Self::default()
        }
    }
}

/// Feature set derived from one hand sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandFeatures {
    pub handedness: Handedness,
    /// Index fingertip, mirrored if configured
    pub pointer: NormalizedPoint,
    pub pinch_distance: f32,
    pub is_pinching: bool,
    /// 0 when open, 1 when fingertips touch
    pub pinch_strength: f32,
    /// Mean wrist-to-fingertip distance
    pub fist_distance: f32,
    pub is_fist: bool,
    /// Wrist to middle-finger MCP angle, radians in (-π, π]
    pub rotation: f32,
    /// Mean y of wrist and middle-finger MCP
    pub vertical_position: f32,
    /// 0-5
    pub extended_fingers: u8,
}

impl HandFeatures {
    /// All scalar features are finite numbers
    pub fn is_finite(&self) -> bool {
        self.pointer.is_finite()
            && self.pinch_distance.is_finite()
            && self.pinch_strength.is_finite()
            && self.fist_distance.is_finite()
            && self.rotation.is_finite()
            && self.vertical_position.is_finite()
    }
}

/// Thumb-tip to index-tip distance
pub fn pinch_distance(sample: &HandSample) -> f32 {
    sample
        .point(HandLandmark::ThumbTip)
        .planar_distance(sample.point(HandLandmark::IndexTip))
}

/// `d < threshold`; false for NaN
#[inline]
pub fn is_pinching(distance: f32, threshold: f32) -> bool {
    distance < threshold
}

/// `clamp(1 - d / threshold, 0, 1)`
#[inline]
pub fn pinch_strength(distance: f32, threshold: f32) -> f32 {
    (1.0 - distance / threshold).clamp(0.0, 1.0)
}

/// Mean distance from the wrist to the five fingertips
pub fn fist_distance(sample: &HandSample) -> f32 {
    let wrist = sample.point(HandLandmark::Wrist);
    let tips = HandLandmark::fingertips();
    let total: f32 = tips
        .iter()
        .map(|tip| sample.point(*tip).planar_distance(wrist))
        .sum();
    total / tips.len() as f32
}

/// Steering-wheel angle of the hand: wrist to middle-finger MCP
pub fn hand_rotation(sample: &HandSample) -> f32 {
    let wrist = sample.point(HandLandmark::Wrist);
    let middle = sample.point(HandLandmark::MiddleMcp);
    let angle = (middle.y - wrist.y).atan2(middle.x - wrist.x);
    // atan2 yields -π for (-0.0, negative x); fold it onto π
    if angle <= -PI {
        angle + 2.0 * PI
    } else {
        angle
    }
}

/// Mean y of wrist and middle-finger MCP
pub fn vertical_position(sample: &HandSample) -> f32 {
    let wrist = sample.point(HandLandmark::Wrist);
    let middle = sample.point(HandLandmark::MiddleMcp);
    (wrist.y + middle.y) / 2.0
}

/// Count extended fingers, 0-5
///
/// A non-thumb finger is extended when its tip sits above (smaller y than) its
/// PIP joint by `margin`. The thumb is extended when its tip is at least
/// `thumb_ratio` times farther from the wrist than its MCP joint.
pub fn count_extended_fingers(sample: &HandSample, margin: f32, thumb_ratio: f32) -> u8 {
    let wrist = sample.point(HandLandmark::Wrist);
    let thumb_tip = sample.point(HandLandmark::ThumbTip).planar_distance(wrist);
    let thumb_mcp = sample.point(HandLandmark::ThumbMcp).planar_distance(wrist);

    let mut count = 0;
    if thumb_tip > thumb_mcp * thumb_ratio {
        count += 1;
    }

    for (tip, pip) in HandLandmark::finger_tip_pip_pairs() {
        if sample.point(tip).y < sample.point(pip).y - margin {
            count += 1;
        }
    }

    count
}

/// Pure feature extractor
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    /// Derive features. Returns `None` when the sample yields non-finite
    /// values; the hand is then treated as inactive for this frame only.
    pub fn classify(&self, sample: &HandSample) -> Option<HandFeatures> {
        let t = &self.thresholds;

        let tip = sample.point(HandLandmark::IndexTip);
        let pointer = if t.mirror_x {
            NormalizedPoint::new(1.0 - tip.x, tip.y)
        } else {
            NormalizedPoint::new(tip.x, tip.y)
        };

        let pinch = pinch_distance(sample);
        let fist = fist_distance(sample);

        let features = HandFeatures {
            handedness: sample.handedness,
            pointer,
            pinch_distance: pinch,
            is_pinching: is_pinching(pinch, t.pinch),
            pinch_strength: pinch_strength(pinch, t.pinch),
            fist_distance: fist,
            is_fist: fist < t.fist,
            rotation: hand_rotation(sample),
            vertical_position: vertical_position(sample),
            extended_fingers: count_extended_fingers(
                sample,
                t.finger_extension_margin,
                t.thumb_extension_ratio,
            ),
        };

        if !features.is_finite() {
            warn!(
                handedness = %sample.handedness,
                at = %sample.timestamp,
                "degenerate hand sample, gesture inactive this frame"
            );
            return None;
        }

        Some(features)
    }
}
