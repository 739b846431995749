//! Scripted host sources for full session runs
//!
//! [`ScriptedCamera`] yields one list of poses per frame and moves a shared
//! [`ManualClock`]; [`PoseLandmarks`] renders those poses as the landmark
//! source would report them.

use std::collections::VecDeque;
use std::time::Duration;

use handwell_core::{FrameTime, HandwellResult};
use handwell_gesture::RawLandmarkFrame;
use handwell_runtime::{CameraSource, LandmarkSource};
use handwell_time::ManualClock;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::driver::DEFAULT_FRAME_INTERVAL;
use crate::pose::HandPose;

/// Camera feed of pose lists at a fixed interval
#[derive(Debug, Clone)]
pub struct ScriptedCamera {
    frames: VecDeque<Vec<HandPose>>,
    clock: ManualClock,
    interval: Duration,
    delivered: u32,
}

impl ScriptedCamera {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            frames: VecDeque::new(),
            clock,
            interval: DEFAULT_FRAME_INTERVAL,
            delivered: 0,
        }
    }

    /// Append frames showing `hands` for `duration`
    pub fn hold(mut self, hands: &[HandPose], duration: Duration) -> Self {
        let count = (duration.as_micros() / self.interval.as_micros().max(1)) as usize;
        for _ in 0..count {
            self.frames.push_back(hands.to_vec());
        }
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl CameraSource for ScriptedCamera {
    type Frame = Vec<HandPose>;

    fn next_frame(&mut self) -> Option<Vec<HandPose>> {
        let frame = self.frames.pop_front()?;
        self.clock.set(FrameTime::ZERO.saturating_add(self.interval * self.delivered));
        self.delivered += 1;
        Some(frame)
    }
}

/// Renders poses into raw landmark results
#[derive(Debug, Clone)]
pub struct PoseLandmarks {
    rng: StdRng,
    jitter: f32,
}

impl PoseLandmarks {
    pub fn new(jitter: f32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            jitter,
        }
    }
}

impl LandmarkSource<Vec<HandPose>> for PoseLandmarks {
    fn detect(&mut self, frame: &Vec<HandPose>, _at: FrameTime) -> HandwellResult<RawLandmarkFrame> {
        Ok(RawLandmarkFrame {
            hands: frame
                .iter()
                .map(|pose| pose.to_raw_jittered(&mut self.rng, self.jitter))
                .collect(),
        })
    }
}
