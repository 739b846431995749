//! Time primitives for the gesture pipeline
//!
//! Every frame carries a `FrameTime`: microseconds since the session clock
//! started. Dwell and stability timing are computed purely from these values,
//! never from ambient wall-clock reads.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Frame timestamp, microseconds since session epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameTime(pub i64);

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime(0);
    pub const MAX: FrameTime = FrameTime(i64::MAX);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        FrameTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        FrameTime(millis.saturating_mul(1000))
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        FrameTime((secs * 1_000_000.0) as i64)
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        FrameTime(self.0.saturating_add(duration_micros(duration)))
    }

    #[inline]
    pub fn saturating_sub(self, duration: Duration) -> Self {
        FrameTime(self.0.saturating_sub(duration_micros(duration)))
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub fn since(self, earlier: FrameTime) -> Duration {
        self - earlier
    }
}

/// Whole microseconds in `duration`, capped at `i64::MAX`
#[inline]
fn duration_micros(duration: Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}

impl Add<Duration> for FrameTime {
    type Output = FrameTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<Duration> for FrameTime {
    type Output = FrameTime;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Sub<FrameTime> for FrameTime {
    type Output = Duration;

    /// Clamped at zero: a best-effort clock may step backwards
    #[inline]
    fn sub(self, rhs: FrameTime) -> Self::Output {
        let diff = self.0.saturating_sub(rhs.0);
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({:.3}ms)", self.0 as f64 / 1000.0)
    }
}

impl std::fmt::Display for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

/// Fraction of `threshold` covered by `elapsed`, clamped to [0, 1]
pub fn progress_fraction(elapsed: Duration, threshold: Duration) -> f32 {
    if threshold.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / threshold.as_secs_f64()).clamp(0.0, 1.0) as f32
}
