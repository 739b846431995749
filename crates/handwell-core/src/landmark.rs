//! Hand landmarks - one detected hand as 21 tracked points
//!
//! The topology follows the common 21-point hand model: wrist first, then four
//! points per digit from the base outward.

use serde::Deserialize;

use crate::{FrameTime, NormalizedPoint};

/// Number of landmarks per hand
pub const LANDMARK_COUNT: usize = 21;

/// Which hand a sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse a landmark-source label ("Left" / "Right", case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("left") {
            Some(Handedness::Left)
        } else if label.eq_ignore_ascii_case("right") {
            Some(Handedness::Right)
        } else {
            None
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Landmark identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,

    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,

    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,

    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,

    RingMcp,
    RingPip,
    RingDip,
    RingTip,

    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// Array index (0-20)
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Fingertips, thumb first
    pub fn fingertips() -> [HandLandmark; 5] {
        [
            HandLandmark::ThumbTip,
            HandLandmark::IndexTip,
            HandLandmark::MiddleTip,
            HandLandmark::RingTip,
            HandLandmark::PinkyTip,
        ]
    }

    /// (tip, proximal joint) pairs of the four non-thumb fingers
    pub fn finger_tip_pip_pairs() -> [(HandLandmark, HandLandmark); 4] {
        [
            (HandLandmark::IndexTip, HandLandmark::IndexPip),
            (HandLandmark::MiddleTip, HandLandmark::MiddlePip),
            (HandLandmark::RingTip, HandLandmark::RingPip),
            (HandLandmark::PinkyTip, HandLandmark::PinkyPip),
        ]
    }
}

/// One tracked point: x, y normalized to the image, z relative depth
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance in the image plane (depth ignored)
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Full 3D distance
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dz = self.z - other.z;
        let planar = self.planar_distance(other);
        (planar * planar + dz * dz).sqrt()
    }

    pub fn lerp(&self, other: &Landmark, t: f32) -> Landmark {
        Landmark {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    pub fn planar(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from(p: [f32; 3]) -> Self {
        Landmark::new(p[0], p[1], p[2])
    }
}

/// One hand in one frame. Produced by the adapter, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct HandSample {
    pub handedness: Handedness,
    pub points: [Landmark; LANDMARK_COUNT],
    pub timestamp: FrameTime,
}

impl HandSample {
    pub fn new(handedness: Handedness, points: [Landmark; LANDMARK_COUNT], timestamp: FrameTime) -> Self {
        Self {
            handedness,
            points,
            timestamp,
        }
    }

    #[inline]
    pub fn point(&self, landmark: HandLandmark) -> &Landmark {
        &self.points[landmark.index()]
    }

    /// True if every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Landmark::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::MiddleMcp.index(), 9);
        assert_eq!(HandLandmark::PinkyTip.index(), LANDMARK_COUNT - 1);
    }

    #[test]
    fn test_handedness_labels() {
        assert_eq!(Handedness::from_label("Left"), Some(Handedness::Left));
        assert_eq!(Handedness::from_label(" right "), Some(Handedness::Right));
        assert_eq!(Handedness::from_label("both"), None);
        assert_eq!(Handedness::Left.opposite(), Handedness::Right);
    }

    #[test]
    fn test_planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 5.0);

        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
        assert!(a.distance(&b) > 5.0);
    }

    #[test]
    fn test_sample_finite_check() {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        let sample = HandSample::new(Handedness::Right, points, FrameTime::ZERO);
        assert!(sample.is_finite());

        points[HandLandmark::IndexTip.index()].x = f32::NAN;
        let sample = HandSample::new(Handedness::Right, points, FrameTime::ZERO);
        assert!(!sample.is_finite());
    }
}
