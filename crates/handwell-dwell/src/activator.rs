//! Dwell activator
//!
//! ```text
//! IDLE ──target──▶ TRACKING(target, since) ──elapsed ≥ threshold──▶ FIRED
//!   ▲                  │ target changes                               │
//!   │                  └──────▶ TRACKING(new, now) / IDLE             ▼
//!   └─────────────────────────── cooldown over ◀──────────────── COOLDOWN
//! ```
//!
//! FIRED is transient: the firing update returns [`DwellUpdate::Fired`] and the
//! activator is already in cooldown when it returns. `interrupt()` forces IDLE
//! from any state.

use std::fmt::Debug;
use std::time::Duration;

use handwell_core::{progress_fraction, FrameTime};
use tracing::debug;

/// What blocks re-activation after a fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownPolicy {
    /// The fired target cannot re-track until the delay elapses. Other
    /// targets start tracking immediately.
    Fixed(Duration),
    /// Latched until the tracked value changes
    UntilTargetChanges,
}

/// Dwell configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellConfig {
    /// Hold time before activation
    pub threshold: Duration,
    pub cooldown: CooldownPolicy,
}

impl DwellConfig {
    /// Pointer dwell click
    pub fn pointer() -> Self {
        Self {
            threshold: Duration::from_millis(1500),
            cooldown: CooldownPolicy::Fixed(Duration::from_millis(500)),
        }
    }

    /// Rotation-dial option commit
    pub fn rotation() -> Self {
        Self {
            threshold: Duration::from_millis(2000),
            cooldown: CooldownPolicy::UntilTargetChanges,
        }
    }

    /// Finger-count stability
    pub fn stability() -> Self {
        Self {
            threshold: Duration::from_millis(800),
            cooldown: CooldownPolicy::UntilTargetChanges,
        }
    }

    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self::pointer()
    }
}

/// A tracked target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwellSession<K> {
    pub target: K,
    pub started_at: FrameTime,
    pub fired: bool,
    /// Set once fired under a fixed cooldown
    pub cooldown_until: Option<FrameTime>,
}

impl<K> DwellSession<K> {
    fn new(target: K, started_at: FrameTime) -> Self {
        Self {
            target,
            started_at,
            fired: false,
            cooldown_until: None,
        }
    }
}

/// Activator phase
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DwellPhase<K> {
    #[default]
    Idle,
    Tracking(DwellSession<K>),
    Cooldown(DwellSession<K>),
}

/// Result of one update
#[derive(Debug, Clone, PartialEq)]
pub enum DwellUpdate<K> {
    /// Nothing tracked
    Idle,
    /// Tracking, not yet fired
    Progress {
        target: K,
        elapsed: Duration,
        /// `elapsed / threshold` in [0, 1)
        fraction: f32,
    },
    /// Threshold reached this update; reported exactly once per session
    Fired { target: K },
    /// Target is blocked by the cooldown
    CoolingDown { target: K },
}

impl<K> DwellUpdate<K> {
    pub fn fired(&self) -> Option<&K> {
        match self {
            DwellUpdate::Fired { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_fired(&self) -> bool {
        matches!(self, DwellUpdate::Fired { .. })
    }
}

/// Generic dwell state machine over a target key
#[derive(Debug, Clone)]
pub struct DwellActivator<K> {
    config: DwellConfig,
    phase: DwellPhase<K>,
    fires: u64,
}

impl<K: Clone + PartialEq + Debug> DwellActivator<K> {
    pub fn new(config: DwellConfig) -> Self {
        Self {
            config,
            phase: DwellPhase::Idle,
            fires: 0,
        }
    }

    pub fn config(&self) -> &DwellConfig {
        &self.config
    }

    pub fn phase(&self) -> &DwellPhase<K> {
        &self.phase
    }

    /// Total activations since construction
    pub fn fires(&self) -> u64 {
        self.fires
    }

    /// Target currently being tracked (not cooling down)
    pub fn tracking(&self) -> Option<&K> {
        match &self.phase {
            DwellPhase::Tracking(session) => Some(&session.target),
            _ => None,
        }
    }

    /// Time left before the tracked target fires
    pub fn remaining(&self, now: FrameTime) -> Option<Duration> {
        match &self.phase {
            DwellPhase::Tracking(session) => Some(
                self.config
                    .threshold
                    .saturating_sub(now - session.started_at),
            ),
            _ => None,
        }
    }

    /// Advance with this frame's target
    pub fn update(&mut self, target: Option<K>, now: FrameTime) -> DwellUpdate<K> {
        if let DwellPhase::Cooldown(session) = &self.phase {
            match self.config.cooldown {
                CooldownPolicy::Fixed(_) => {
                    let expired = session.cooldown_until.map_or(true, |until| now >= until);
                    if expired {
                        debug!(key = ?session.target, "dwell cooldown over");
                        self.phase = DwellPhase::Idle;
                    } else {
                        match &target {
                            Some(t) if *t == session.target => {
                                return DwellUpdate::CoolingDown { target: t.clone() };
                            }
                            // the cooldown keeps running while nothing is targeted
                            None => return DwellUpdate::Idle,
                            Some(_) => self.phase = DwellPhase::Idle,
                        }
                    }
                }
                CooldownPolicy::UntilTargetChanges => match &target {
                    Some(t) if *t == session.target => {
                        return DwellUpdate::CoolingDown { target: t.clone() };
                    }
                    _ => {
                        debug!(key = ?session.target, "dwell latch released");
                        self.phase = DwellPhase::Idle;
                    }
                },
            }
        }

        let Some(target) = target else {
            if let DwellPhase::Tracking(session) = &self.phase {
                debug!(key = ?session.target, "dwell target lost");
            }
            self.phase = DwellPhase::Idle;
            return DwellUpdate::Idle;
        };

        let restart = match &self.phase {
            DwellPhase::Tracking(session) => session.target != target,
            _ => true,
        };
        if restart {
            debug!(key = ?target, at = %now, "dwell tracking");
            self.phase = DwellPhase::Tracking(DwellSession::new(target.clone(), now));
        }

        let DwellPhase::Tracking(session) = &mut self.phase else {
            return DwellUpdate::Idle;
        };

        let elapsed = now - session.started_at;
        if elapsed < self.config.threshold {
            return DwellUpdate::Progress {
                target,
                elapsed,
                fraction: progress_fraction(elapsed, self.config.threshold),
            };
        }

        session.fired = true;
        if let CooldownPolicy::Fixed(delay) = self.config.cooldown {
            session.cooldown_until = Some(now + delay);
        }
        let session = session.clone();
        self.fires += 1;
        debug!(key = ?target, elapsed_ms = elapsed.as_millis() as u64, "dwell fired");
        self.phase = DwellPhase::Cooldown(session);

        DwellUpdate::Fired { target }
    }

    /// Force IDLE, discarding any progress or cooldown
    pub fn interrupt(&mut self) {
        if !matches!(self.phase, DwellPhase::Idle) {
            debug!("dwell interrupted");
        }
        self.phase = DwellPhase::Idle;
    }
}

impl<K: Clone + PartialEq + Debug> Default for DwellActivator<K> {
    fn default() -> Self {
        Self::new(DwellConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: i64) -> FrameTime {
        FrameTime::from_millis(v)
    }

    /// Hold `target` from 0 to `until_ms` in `step_ms` increments, counting fires
    fn hold(activator: &mut DwellActivator<&'static str>, target: &'static str, until_ms: i64, step_ms: i64) -> usize {
        let mut fired = 0;
        let mut t = 0;
        while t <= until_ms {
            if activator.update(Some(target), ms(t)).is_fired() {
                fired += 1;
            }
            t += step_ms;
        }
        fired
    }

    #[test]
    fn test_fires_once_at_threshold() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());

        assert_eq!(hold(&mut dwell, "submit", 1500, 100), 1);
        assert_eq!(dwell.fires(), 1);
    }

    #[test]
    fn test_fires_once_at_twice_threshold() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());

        assert_eq!(hold(&mut dwell, "submit", 3000, 50), 1);
    }

    #[test]
    fn test_refires_after_cooldown_and_full_cycle() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());

        // fire at 1500, cooldown to 2000, fresh cycle fires at 3500
        assert_eq!(hold(&mut dwell, "submit", 3500, 50), 2);
    }

    #[test]
    fn test_progress_reported() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());
        dwell.update(Some("a"), ms(0));

        match dwell.update(Some("a"), ms(750)) {
            DwellUpdate::Progress { fraction, elapsed, .. } => {
                assert!((fraction - 0.5).abs() < 1e-6);
                assert_eq!(elapsed, Duration::from_millis(750));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(dwell.remaining(ms(750)), Some(Duration::from_millis(750)));
    }

    #[test]
    fn test_target_change_restarts() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());
        dwell.update(Some("a"), ms(0));
        dwell.update(Some("a"), ms(1400));

        // switching at 1400 never fires "a" and restarts at zero for "b"
        match dwell.update(Some("b"), ms(1400)) {
            DwellUpdate::Progress { target, elapsed, .. } => {
                assert_eq!(target, "b");
                assert_eq!(elapsed, Duration::ZERO);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!dwell.update(Some("b"), ms(2800)).is_fired());
        assert!(dwell.update(Some("b"), ms(2900)).is_fired());
    }

    #[test]
    fn test_no_target_clears() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());
        dwell.update(Some("a"), ms(0));

        assert_eq!(dwell.update(None, ms(1000)), DwellUpdate::Idle);
        assert!(!dwell.update(Some("a"), ms(2000)).is_fired());
    }

    #[test]
    fn test_interrupt_discards_progress() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());
        dwell.update(Some("a"), ms(0));
        dwell.update(Some("a"), ms(1000));
        dwell.interrupt();

        assert_eq!(dwell.phase(), &DwellPhase::Idle);
        assert!(!dwell.update(Some("a"), ms(1600)).is_fired());
        assert!(dwell.update(Some("a"), ms(3100)).is_fired());
    }

    #[test]
    fn test_fixed_cooldown_other_target_tracks_immediately() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());
        dwell.update(Some("a"), ms(0));
        assert!(dwell.update(Some("a"), ms(1500)).is_fired());

        assert_eq!(
            dwell.update(Some("a"), ms(1600)),
            DwellUpdate::CoolingDown { target: "a" }
        );
        assert!(matches!(
            dwell.update(Some("b"), ms(1700)),
            DwellUpdate::Progress { target: "b", .. }
        ));
    }

    #[test]
    fn test_fixed_cooldown_survives_brief_miss() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());
        dwell.update(Some("a"), ms(0));
        dwell.update(Some("a"), ms(1500));

        dwell.update(None, ms(1600));
        assert_eq!(
            dwell.update(Some("a"), ms(1700)),
            DwellUpdate::CoolingDown { target: "a" }
        );
        // cooldown over at 2000: tracking restarts from that frame
        assert!(matches!(
            dwell.update(Some("a"), ms(2000)),
            DwellUpdate::Progress { fraction, .. } if fraction == 0.0
        ));
    }

    #[test]
    fn test_latch_until_target_changes() {
        let mut dwell = DwellActivator::new(DwellConfig::stability());
        dwell.update(Some(2u8), ms(0));
        assert!(dwell.update(Some(2), ms(800)).is_fired());

        for t in (1000..10_000).step_by(200) {
            assert!(!dwell.update(Some(2), ms(t)).is_fired());
        }

        dwell.update(Some(3), ms(10_000));
        assert!(dwell.update(Some(3), ms(10_800)).is_fired());
        assert_eq!(dwell.fires(), 2);
    }

    #[test]
    fn test_cooldown_session_marked_fired() {
        let mut dwell = DwellActivator::new(DwellConfig::pointer());
        dwell.update(Some("a"), ms(0));
        dwell.update(Some("a"), ms(1500));

        match dwell.phase() {
            DwellPhase::Cooldown(session) => {
                assert!(session.fired);
                assert_eq!(session.cooldown_until, Some(ms(2000)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unbounded_cooldown_keeps_blocking() {
        let config = DwellConfig {
            threshold: Duration::from_millis(1500),
            cooldown: CooldownPolicy::Fixed(Duration::from_millis(u64::MAX)),
        };
        let mut dwell = DwellActivator::new(config);
        dwell.update(Some("a"), ms(0));
        assert!(dwell.update(Some("a"), ms(1500)).is_fired());

        for t in [1533, 60_000, 86_400_000] {
            assert_eq!(
                dwell.update(Some("a"), ms(t)),
                DwellUpdate::CoolingDown { target: "a" }
            );
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_change_before_threshold_never_fires(switch_ms in 0i64..1500, step in 1i64..200) {
            let mut dwell = DwellActivator::new(DwellConfig::pointer());
            let mut t = 0;
            while t < switch_ms {
                proptest::prop_assert!(!dwell.update(Some(1u32), ms(t)).is_fired());
                t += step;
            }
            // the new target starts from zero at the switch frame
            let mut t = switch_ms;
            while t < switch_ms + 1500 {
                proptest::prop_assert!(!dwell.update(Some(2u32), ms(t)).is_fired());
                t += step;
            }
        }

        #[test]
        fn prop_single_fire_within_cooldown(step in 1i64..100) {
            let mut dwell = DwellActivator::new(DwellConfig::pointer());
            let mut fired = 0;
            let mut t = 0;
            // fire at or after 1500, cooldown at least to 2000, next fire at least 3500
            while t < 3500 {
                if dwell.update(Some(7u32), ms(t)).is_fired() {
                    fired += 1;
                }
                t += step;
            }
            proptest::prop_assert_eq!(fired, 1);
        }
    }
}
