//! Engine - the per-session gesture context

use handwell_core::{
    FrameTime, HandSample, HandwellResult, Landmark, NormalizedPoint, ScreenPoint,
};
use handwell_gesture::{
    GestureClassifier, GestureState, HandFeatures, LandmarkAdapter, LandmarkFrame,
    RawLandmarkFrame, AdapterStats,
};
use handwell_time::FrameCadence;
use tracing::{debug, info};

use crate::auxiliary::AuxiliaryRole;
use crate::config::EngineConfig;
use crate::dispatcher::{ActionDispatcher, DispatchStats};
use crate::feedback::{compose_status, FeedbackFrame};
use crate::host::{Collaborators, ControlRegistry, TargetResolver};
use crate::intent::Intent;
use crate::pointer::PointerRole;

/// Engine counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub frames: u64,
    /// Frames with no hand at all
    pub empty_frames: u64,
    /// Hands skipped for non-finite features
    pub degenerate_hands: u64,
}

/// One hand role's input for a frame
#[derive(Debug, Clone, Copy)]
pub(crate) enum HandInput<'s> {
    Absent,
    /// Present but its features were not usable
    Degenerate,
    Tracked {
        sample: &'s HandSample,
        features: HandFeatures,
    },
}

/// Frame-scoped view handed to the hand roles
pub(crate) struct FrameEnv<'a> {
    pub config: &'a EngineConfig,
    pub now: FrameTime,
    pub targets: &'a dyn TargetResolver,
    pub controls: &'a dyn ControlRegistry,
    pub intents: Vec<Intent>,
    pub feedback: FeedbackFrame,
}

impl FrameEnv<'_> {
    pub fn emit(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn screen(&self, point: NormalizedPoint) -> ScreenPoint {
        self.config.viewport.to_screen(point)
    }

    /// Screen position of a raw landmark, mirrored like the cursor
    pub fn project(&self, landmark: &Landmark) -> ScreenPoint {
        let x = if self.config.thresholds.mirror_x {
            1.0 - landmark.x
        } else {
            landmark.x
        };
        self.screen(NormalizedPoint::new(x, landmark.y))
    }
}

/// Gesture interaction engine
///
/// Owns every piece of cross-frame state: both hand trackers, the dwell and
/// selection machines, and the dispatcher. Nothing is global; two engines
/// never share state.
pub struct Engine {
    config: EngineConfig,
    adapter: LandmarkAdapter,
    classifier: GestureClassifier,
    pointer: PointerRole,
    auxiliary: AuxiliaryRole,
    dispatcher: ActionDispatcher,
    cadence: FrameCadence,
    stats: EngineStats,
}

impl Engine {
    pub fn new(config: EngineConfig) -> HandwellResult<Self> {
        config.validate()?;
        info!(
            profile = ?config.profile,
            pointer_hand = %config.pointer_hand,
            "gesture engine configured"
        );
        Ok(Self {
            adapter: LandmarkAdapter::with_min_score(config.min_hand_score),
            classifier: GestureClassifier::new(config.thresholds.clone()),
            pointer: PointerRole::new(&config),
            auxiliary: AuxiliaryRole::new(&config)?,
            dispatcher: ActionDispatcher::new(),
            cadence: FrameCadence::new(),
            stats: EngineStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn dispatch_stats(&self) -> &DispatchStats {
        self.dispatcher.stats()
    }

    pub fn adapter_stats(&self) -> &AdapterStats {
        self.adapter.stats()
    }

    pub fn cadence(&self) -> &FrameCadence {
        &self.cadence
    }

    pub fn pointer_state(&self) -> &GestureState {
        self.pointer.state()
    }

    pub fn auxiliary_state(&self) -> &GestureState {
        self.auxiliary.state()
    }

    /// Normalize a raw landmark result
    pub fn adapt(&mut self, raw: &RawLandmarkFrame, at: FrameTime) -> LandmarkFrame {
        self.adapter.adapt(raw, at)
    }

    /// Adapt and process in one call
    pub fn process_raw(
        &mut self,
        raw: &RawLandmarkFrame,
        at: FrameTime,
        host: &mut Collaborators<'_>,
    ) -> FeedbackFrame {
        let frame = self.adapt(raw, at);
        self.process_frame(&frame, host)
    }

    /// Run one frame through the pipeline and dispatch its intents
    pub fn process_frame(
        &mut self,
        frame: &LandmarkFrame,
        host: &mut Collaborators<'_>,
    ) -> FeedbackFrame {
        let now = frame.timestamp;
        self.stats.frames += 1;
        self.cadence.record(now);
        if frame.is_empty() {
            self.stats.empty_frames += 1;
        }

        let pointer_input = classify_role(
            &self.classifier,
            &mut self.stats,
            frame.hand(self.config.pointer_hand),
        );
        let aux_input = classify_role(
            &self.classifier,
            &mut self.stats,
            frame.hand(self.config.aux_hand()),
        );

        let mut env = FrameEnv {
            config: &self.config,
            now,
            targets: host.targets,
            controls: &*host.controls,
            intents: Vec::new(),
            feedback: FeedbackFrame::new(now),
        };

        let pointer = self.pointer.step(pointer_input, &mut env);
        let aux = self.auxiliary.step(aux_input, &mut env);
        env.feedback.status = compose_status(self.config.pointer_hand, &pointer, &aux);

        let FrameEnv {
            intents, feedback, ..
        } = env;
        if !intents.is_empty() {
            debug!(at = %now, intents = intents.len(), "dispatching frame");
        }
        self.dispatcher.dispatch_frame(intents, host);

        feedback
    }
}

fn classify_role<'s>(
    classifier: &GestureClassifier,
    stats: &mut EngineStats,
    sample: Option<&'s HandSample>,
) -> HandInput<'s> {
    let Some(sample) = sample else {
        return HandInput::Absent;
    };
    match classifier.classify(sample) {
        Some(features) => HandInput::Tracked { sample, features },
        None => {
            stats.degenerate_hands += 1;
            HandInput::Degenerate
        }
    }
}
