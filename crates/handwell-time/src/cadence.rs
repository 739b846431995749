//! Frame cadence estimation
//!
//! The landmark source drives the loop at the host's animation rate, so there
//! is no fixed tick. `FrameCadence` keeps a window of recent frame intervals
//! and reports the observed rate and its jitter.

use std::collections::VecDeque;
use std::time::Duration;

use handwell_core::FrameTime;

/// Sliding-window frame interval statistics
#[derive(Clone, Debug)]
pub struct FrameCadence {
    /// Recent intervals in seconds
    samples: VecDeque<f64>,
    /// Maximum samples to keep
    max_samples: usize,
    last_frame: Option<FrameTime>,
    frames: u64,
}

impl FrameCadence {
    pub fn new() -> Self {
        Self::with_window(120)
    }

    pub fn with_window(max_samples: usize) -> Self {
        FrameCadence {
            samples: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_frame: None,
            frames: 0,
        }
    }

    /// Record a frame timestamp
    pub fn record(&mut self, at: FrameTime) {
        if let Some(last) = self.last_frame {
            let dt = (at - last).as_secs_f64();
            self.samples.push_back(dt);
            if self.samples.len() > self.max_samples {
                self.samples.pop_front();
            }
        }
        self.last_frame = Some(at);
        self.frames += 1;
    }

    /// Total frames recorded
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean frame interval
    pub fn mean_interval(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        Some(Duration::from_secs_f64(mean))
    }

    /// Frames per second implied by the mean interval
    pub fn fps(&self) -> Option<f64> {
        self.mean_interval()
            .filter(|d| !d.is_zero())
            .map(|d| 1.0 / d.as_secs_f64())
    }

    /// Largest deviation of an interval from the mean
    pub fn jitter(&self) -> Duration {
        let Some(mean) = self.mean_interval() else {
            return Duration::ZERO;
        };
        let mean = mean.as_secs_f64();
        let worst = self
            .samples
            .iter()
            .map(|s| (s - mean).abs())
            .fold(0.0, f64::max);
        Duration::from_secs_f64(worst)
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.last_frame = None;
        self.frames = 0;
    }
}

impl Default for FrameCadence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_cadence() {
        let mut cadence = FrameCadence::new();
        for i in 0..31 {
            cadence.record(FrameTime::from_micros(i * 33_333));
        }

        let fps = cadence.fps().unwrap();
        assert!((fps - 30.0).abs() < 0.1);
        assert!(cadence.jitter() < Duration::from_micros(10));
        assert_eq!(cadence.frames(), 31);
    }

    #[test]
    fn test_single_frame_has_no_rate() {
        let mut cadence = FrameCadence::new();
        cadence.record(FrameTime::from_millis(10));

        assert!(cadence.fps().is_none());
        assert_eq!(cadence.jitter(), Duration::ZERO);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut cadence = FrameCadence::with_window(4);
        let mut t = 0;
        for _ in 0..10 {
            t += 10;
            cadence.record(FrameTime::from_millis(t));
        }
        // a slow frame falls out of the window after four more
        t += 500;
        cadence.record(FrameTime::from_millis(t));
        assert!(cadence.jitter() > Duration::from_millis(100));
        for _ in 0..4 {
            t += 10;
            cadence.record(FrameTime::from_millis(t));
        }
        assert!(cadence.jitter() < Duration::from_millis(1));
    }

    proptest::proptest! {
        #[test]
        fn prop_mean_between_bounds(intervals in proptest::collection::vec(1i64..100, 2..50)) {
            let mut cadence = FrameCadence::new();
            let mut t = 0i64;
            cadence.record(FrameTime::from_millis(t));
            for dt in &intervals {
                t += dt;
                cadence.record(FrameTime::from_millis(t));
            }
            let mean = cadence.mean_interval().unwrap().as_secs_f64() * 1000.0;
            let min = *intervals.iter().min().unwrap() as f64;
            let max = *intervals.iter().max().unwrap() as f64;
            proptest::prop_assert!(mean >= min - 1e-6 && mean <= max + 1e-6);
        }
    }
}
