//! Clock implementations

use std::sync::Arc;
use std::time::{Duration, Instant};

use handwell_core::FrameTime;
use parking_lot::Mutex;

/// Source of frame timestamps
pub trait Clock {
    /// Current time. Best-effort monotonic.
    fn now(&self) -> FrameTime;
}

/// Real clock - microseconds since construction, backed by `Instant`
/// INVARIANT: never goes backwards
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    reference: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            reference: Instant::now(),
        }
    }

    /// Real time elapsed since the clock started
    pub fn elapsed(&self) -> Duration {
        self.reference.elapsed()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> FrameTime {
        FrameTime::ZERO.saturating_add(self.elapsed())
    }
}

/// Fake clock advanced explicitly. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    value: Arc<Mutex<FrameTime>>,
}

impl ManualClock {
    /// Create a manual clock starting at zero
    pub fn new() -> Self {
        Self::starting_at(FrameTime::ZERO)
    }

    pub fn starting_at(start: FrameTime) -> Self {
        ManualClock {
            value: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance by `dt`, returning the new time
    pub fn advance(&self, dt: Duration) -> FrameTime {
        let mut value = self.value.lock();
        *value = value.saturating_add(dt);
        *value
    }

    /// Jump to `t`. Only moves forward.
    pub fn set(&self, t: FrameTime) {
        let mut value = self.value.lock();
        if t > *value {
            *value = t;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> FrameTime {
        *self.value.lock()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> FrameTime {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> FrameTime {
        (**self).now()
    }
}
