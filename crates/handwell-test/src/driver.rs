//! Frame driver - runs poses through an engine on a fake clock
//!
//! The driver owns the engine, a [`ManualClock`] and a seeded RNG. Each step
//! renders the given poses (optionally jittered) into a raw landmark frame,
//! processes it at the current fake time and advances the clock by the frame
//! interval.

use std::time::Duration;

use handwell_core::{FrameTime, HandwellResult};
use handwell_gesture::RawLandmarkFrame;
use handwell_runtime::{
    Collaborators, Engine, EngineConfig, FeedbackFrame, FeedbackRenderer, RecordedEffect,
    RecordingEffects, RecordingRenderer,
};
use handwell_time::{Clock, ManualClock};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::pose::HandPose;
use crate::scene::ScriptedScene;

/// ~30 fps, the usual landmark-source cadence
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Drives an engine frame by frame
pub struct FrameDriver {
    engine: Engine,
    scene: ScriptedScene,
    effects: RecordingEffects,
    renderer: RecordingRenderer,
    clock: ManualClock,
    rng: StdRng,
    jitter: f32,
    interval: Duration,
}

impl FrameDriver {
    pub fn new(config: EngineConfig, scene: ScriptedScene) -> HandwellResult<Self> {
        Ok(Self {
            engine: Engine::new(config)?,
            scene,
            effects: RecordingEffects::default(),
            renderer: RecordingRenderer::default(),
            clock: ManualClock::new(),
            rng: StdRng::seed_from_u64(0),
            jitter: 0.0,
            interval: DEFAULT_FRAME_INTERVAL,
        })
    }

    /// Nudge every landmark by up to `amount`, reproducibly from `seed`
    pub fn with_jitter(mut self, amount: f32, seed: u64) -> Self {
        self.jitter = amount;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn scene(&self) -> &ScriptedScene {
        &self.scene
    }

    pub fn effects(&self) -> &RecordingEffects {
        &self.effects
    }

    pub fn renderer(&self) -> &RecordingRenderer {
        &self.renderer
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn now(&self) -> FrameTime {
        self.clock.now()
    }

    /// Raw frame for these poses, jittered if configured
    pub fn raw_frame(&mut self, hands: &[HandPose]) -> RawLandmarkFrame {
        RawLandmarkFrame {
            hands: hands
                .iter()
                .map(|pose| pose.to_raw_jittered(&mut self.rng, self.jitter))
                .collect(),
        }
    }

    /// Process one frame at the current time, then advance the clock
    pub fn step(&mut self, hands: &[HandPose]) -> FeedbackFrame {
        let raw = self.raw_frame(hands);
        let at = self.clock.now();

        let feedback = self.engine.process_raw(
            &raw,
            at,
            &mut Collaborators::new(
                &self.scene.layout,
                &mut self.scene.controls,
                &mut self.effects,
            ),
        );
        self.renderer.render(&feedback);
        self.clock.advance(self.interval);
        feedback
    }

    /// Repeat the same poses for `duration`, returning every frame
    pub fn hold(&mut self, hands: &[HandPose], duration: Duration) -> Vec<FeedbackFrame> {
        let until = self.clock.now().saturating_add(duration);
        let mut frames = Vec::new();
        while self.clock.now() < until {
            frames.push(self.step(hands));
        }
        frames
    }

    /// Frames with no hands for `duration`
    pub fn idle(&mut self, duration: Duration) -> Vec<FeedbackFrame> {
        self.hold(&[], duration)
    }

    /// Effects recorded since the driver started, in order
    pub fn log(&self) -> &[RecordedEffect] {
        self.effects.log()
    }
}
