//! LandmarkFrame adapter - normalizes one inference result into hand samples

use handwell_core::{
    FrameTime, HandSample, Handedness, HandwellError, HandwellResult, Landmark, LANDMARK_COUNT,
};
use serde::Deserialize;
use tracing::warn;

/// One hand as reported by the landmark source
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawHand {
    /// Handedness category label, e.g. "Left"
    pub handedness: String,
    /// Handedness classification score
    #[serde(default = "default_score")]
    pub score: f32,
    /// Landmark coordinates (x, y, z)
    pub points: Vec<[f32; 3]>,
}

fn default_score() -> f32 {
    1.0
}

/// One landmark-source result: zero to two hands
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawLandmarkFrame {
    #[serde(default)]
    pub hands: Vec<RawHand>,
}

impl RawLandmarkFrame {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Adapted frame: at most one sample per handedness
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    pub timestamp: FrameTime,
    hands: Vec<HandSample>,
}

impl LandmarkFrame {
    /// Frame with no hands
    pub fn empty(timestamp: FrameTime) -> Self {
        Self {
            timestamp,
            hands: Vec::new(),
        }
    }

    /// Build from already-validated samples, keeping the first of each handedness
    pub fn from_samples(timestamp: FrameTime, samples: impl IntoIterator<Item = HandSample>) -> Self {
        let mut frame = Self::empty(timestamp);
        for sample in samples {
            frame.push(sample);
        }
        frame
    }

    fn push(&mut self, sample: HandSample) -> bool {
        if self.hand(sample.handedness).is_some() {
            return false;
        }
        self.hands.push(sample);
        true
    }

    /// Sample for a hand role, if present this frame
    pub fn hand(&self, handedness: Handedness) -> Option<&HandSample> {
        self.hands.iter().find(|h| h.handedness == handedness)
    }

    pub fn hands(&self) -> &[HandSample] {
        &self.hands
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }
}

/// Adapter counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterStats {
    pub frames: u64,
    pub hands_accepted: u64,
    pub hands_dropped: u64,
}

/// Converts raw landmark-source output into [`LandmarkFrame`]s
#[derive(Debug, Clone, Default)]
pub struct LandmarkAdapter {
    /// Hands with a handedness score below this are ignored
    min_score: f32,
    stats: AdapterStats,
}

impl LandmarkAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_score(min_score: f32) -> Self {
        Self {
            min_score,
            stats: AdapterStats::default(),
        }
    }

    pub fn stats(&self) -> &AdapterStats {
        &self.stats
    }

    /// Adapt one result. Malformed hands are dropped with a warning; a second
    /// hand claiming an already-seen handedness is ignored.
    pub fn adapt(&mut self, raw: &RawLandmarkFrame, at: FrameTime) -> LandmarkFrame {
        self.stats.frames += 1;
        let mut frame = LandmarkFrame::empty(at);

        for hand in &raw.hands {
            if hand.score < self.min_score {
                self.stats.hands_dropped += 1;
                continue;
            }
            match sample_from_raw(hand, at) {
                Ok(sample) => {
                    let handedness = sample.handedness;
                    if frame.push(sample) {
                        self.stats.hands_accepted += 1;
                    } else {
                        warn!(%handedness, "duplicate hand role in frame, keeping first");
                        self.stats.hands_dropped += 1;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "dropping hand");
                    self.stats.hands_dropped += 1;
                }
            }
        }

        frame
    }
}

/// Validate and convert one raw hand
pub fn sample_from_raw(raw: &RawHand, at: FrameTime) -> HandwellResult<HandSample> {
    let handedness = Handedness::from_label(&raw.handedness)
        .ok_or_else(|| HandwellError::UnknownHandedness(raw.handedness.clone()))?;

    if raw.points.len() != LANDMARK_COUNT {
        return Err(HandwellError::MalformedHand {
            expected: LANDMARK_COUNT,
            actual: raw.points.len(),
        });
    }

    let mut points = [Landmark::default(); LANDMARK_COUNT];
    for (slot, p) in points.iter_mut().zip(&raw.points) {
        *slot = Landmark::from(*p);
    }

    Ok(HandSample::new(handedness, points, at))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_hand(label: &str, n: usize) -> RawHand {
        RawHand {
            handedness: label.to_string(),
            score: 0.9,
            points: (0..n).map(|i| [i as f32 / 40.0, 0.5, 0.0]).collect(),
        }
    }

    #[test]
    fn test_adapt_two_hands() {
        let mut adapter = LandmarkAdapter::new();
        let raw = RawLandmarkFrame {
            hands: vec![raw_hand("Right", 21), raw_hand("Left", 21)],
        };

        let frame = adapter.adapt(&raw, FrameTime::from_millis(40));

        assert_eq!(frame.len(), 2);
        assert!(frame.hand(Handedness::Left).is_some());
        let right = frame.hand(Handedness::Right).unwrap();
        assert_eq!(right.timestamp, FrameTime::from_millis(40));
        assert!((right.points[8].x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_malformed_hand_dropped() {
        let mut adapter = LandmarkAdapter::new();
        let raw = RawLandmarkFrame {
            hands: vec![raw_hand("Right", 5), raw_hand("Unknown", 21)],
        };

        let frame = adapter.adapt(&raw, FrameTime::ZERO);

        assert!(frame.is_empty());
        assert_eq!(adapter.stats().hands_dropped, 2);
    }

    #[test]
    fn test_duplicate_role_keeps_first() {
        let mut adapter = LandmarkAdapter::new();
        let mut second = raw_hand("Right", 21);
        second.points[0] = [0.9, 0.9, 0.0];
        let raw = RawLandmarkFrame {
            hands: vec![raw_hand("Right", 21), second],
        };

        let frame = adapter.adapt(&raw, FrameTime::ZERO);

        assert_eq!(frame.len(), 1);
        assert_eq!(frame.hand(Handedness::Right).unwrap().points[0].x, 0.0);
    }

    #[test]
    fn test_low_score_dropped() {
        let mut adapter = LandmarkAdapter::with_min_score(0.95);
        let raw = RawLandmarkFrame {
            hands: vec![raw_hand("Left", 21)],
        };

        assert!(adapter.adapt(&raw, FrameTime::ZERO).is_empty());
    }

    #[test]
    fn test_sample_errors() {
        let err = sample_from_raw(&raw_hand("Right", 20), FrameTime::ZERO).unwrap_err();
        assert_eq!(
            err,
            HandwellError::MalformedHand {
                expected: 21,
                actual: 20
            }
        );

        let err = sample_from_raw(&raw_hand("Up", 21), FrameTime::ZERO).unwrap_err();
        assert_eq!(err, HandwellError::UnknownHandedness("Up".into()));
    }

    #[test]
    fn test_deserialize_raw_frame() {
        let points: Vec<[f32; 3]> = vec![[0.1, 0.2, 0.0]; 21];
        let json = serde_json::json!({
            "hands": [{ "handedness": "Left", "points": points }]
        });

        let raw: RawLandmarkFrame = serde_json::from_value(json).unwrap();

        assert_eq!(raw.hands.len(), 1);
        assert_eq!(raw.hands[0].score, 1.0);
    }
}
