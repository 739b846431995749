//! Pointer role - cursor, hover, pinch drags and dwell click

use std::time::Duration;

use handwell_core::{HandLandmark, NormalizedPoint};
use handwell_dwell::{DwellActivator, DwellUpdate};
use handwell_gesture::{GestureState, HandTracker};
use tracing::{debug, info};

use crate::config::{EngineConfig, InteractionProfile};
use crate::engine::{FrameEnv, HandInput};
use crate::feedback::{
    ActivationEvent, ControlFeedback, CursorFeedback, DwellProgress, Marker, MarkerKind,
    PointerReport,
};
use crate::host::{ControlId, ControlQuery, Target, TargetId, TargetKind};
use crate::intent::Intent;

/// Pinch-drag scroll in progress
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollDrag {
    anchor_y: f32,
    last_y: f32,
    /// Travel from the anchor exceeded the move threshold
    moved: bool,
}

/// Pinch text scaling in progress
#[derive(Debug, Clone, PartialEq)]
struct ScalingDrag {
    control: ControlId,
    start_y: f32,
    start_size: f64,
}

pub(crate) struct PointerRole {
    tracker: HandTracker,
    dwell: DwellActivator<TargetId>,
    scroll: Option<ScrollDrag>,
    scaling: Option<ScalingDrag>,
}

impl PointerRole {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tracker: HandTracker::new(config.pointer_hand, &config.cursor),
            dwell: DwellActivator::new(config.pointer_dwell()),
            scroll: None,
            scaling: None,
        }
    }

    pub fn state(&self) -> &GestureState {
        self.tracker.state()
    }

    pub fn step(&mut self, input: HandInput<'_>, env: &mut FrameEnv<'_>) -> PointerReport {
        let (sample, features) = match input {
            HandInput::Absent => {
                self.lose(env);
                return PointerReport::default();
            }
            HandInput::Degenerate => {
                self.tracker.hold();
                let state = self.tracker.state();
                return PointerReport {
                    present: true,
                    pinching: state.is_pinching,
                    ..Default::default()
                };
            }
            HandInput::Tracked { sample, features } => (sample, features),
        };

        let state = *self.tracker.observe(&features);
        let cursor = state.cursor;
        env.feedback.cursor = Some(CursorFeedback {
            position: cursor,
            screen: env.screen(cursor),
            pinching: state.is_pinching,
        });
        env.feedback.markers.push(Marker {
            kind: MarkerKind::PointerTip,
            at: env.project(sample.point(HandLandmark::IndexTip)),
        });

        let target = env.targets.resolve(cursor);
        let profile = env.config.profile;

        if profile.hover_help() {
            let hovered = target
                .as_ref()
                .filter(|t| t.kind == TargetKind::HoverOnly)
                .map(|t| t.id.clone());
            env.emit(Intent::Hover { target: hovered });
        }
        if profile == InteractionProfile::Glyphs {
            let glyph = match target.as_ref().map(|t| t.kind) {
                Some(TargetKind::Glyph(c)) => Some(c),
                _ => None,
            };
            env.emit(Intent::PreviewOption(glyph));
        }

        let mut report = PointerReport {
            present: true,
            pinching: state.is_pinching,
            ..Default::default()
        };

        if state.is_pinching {
            // pinching is a grab, never a click
            self.dwell.interrupt();
            match profile {
                InteractionProfile::Browse => {
                    report.scrolling = self.scroll_step(state.raw_pointer.y, env)
                }
                InteractionProfile::Editor => report.scaling = self.scaling_step(cursor, env),
                InteractionProfile::Glyphs => {}
            }
        } else {
            self.end_drags();
            report.dwell_remaining = self.dwell_step(target, cursor, env);
        }

        report
    }

    /// Advance the scroll drag; true once it has moved past the threshold
    fn scroll_step(&mut self, y: f32, env: &mut FrameEnv<'_>) -> bool {
        let Some(drag) = self.scroll.as_mut() else {
            debug!(anchor_y = y, "scroll drag started");
            self.scroll = Some(ScrollDrag {
                anchor_y: y,
                last_y: y,
                moved: false,
            });
            return false;
        };

        if !drag.moved && (y - drag.anchor_y).abs() > env.config.scroll_move_threshold {
            debug!(travel = y - drag.anchor_y, "scroll drag moved");
            drag.moved = true;
        }
        let dy = (y - drag.last_y) * env.config.scroll_sensitivity;
        drag.last_y = y;
        if dy != 0.0 {
            env.emit(Intent::Scroll { dy });
        }
        drag.moved
    }

    fn scaling_step(&mut self, cursor: NormalizedPoint, env: &mut FrameEnv<'_>) -> Option<f64> {
        let binding = env
            .controls
            .find(&ControlQuery::Named(env.config.scale_control.clone()))?;

        if self.scaling.is_none() {
            let zone_start = binding.bounds.left + binding.bounds.width() * env.config.scaling_zone;
            if cursor.x <= zone_start {
                return None;
            }
            info!(start_size = binding.current, "text scaling started");
            self.scaling = Some(ScalingDrag {
                control: binding.id.clone(),
                start_y: cursor.y,
                start_size: binding.current,
            });
        }
        let drag = self.scaling.as_ref()?;

        let delta = (cursor.y - drag.start_y) as f64 * env.config.scaling_gain;
        let size = binding.clamp((drag.start_size - delta).round());
        let control = drag.control.clone();

        env.feedback.control = Some(ControlFeedback {
            control: control.clone(),
            value: size,
            at: env.screen(cursor),
        });
        env.emit(Intent::SetControl {
            control,
            value: size,
        });
        Some(size)
    }

    fn dwell_step(
        &mut self,
        target: Option<Target>,
        cursor: NormalizedPoint,
        env: &mut FrameEnv<'_>,
    ) -> Option<Duration> {
        let key = target
            .as_ref()
            .filter(|t| t.is_clickable())
            .map(|t| t.id.clone());
        let at = env.screen(cursor);

        match self.dwell.update(key, env.now) {
            DwellUpdate::Progress {
                elapsed, fraction, ..
            } => {
                let remaining = self.dwell.config().threshold.saturating_sub(elapsed);
                env.feedback.dwell = Some(DwellProgress {
                    fraction,
                    remaining,
                    at,
                });
                Some(remaining)
            }
            DwellUpdate::Fired { .. } => {
                if let Some(target) = target {
                    env.feedback.activation = Some(ActivationEvent {
                        target: target.id.clone(),
                        at,
                    });
                    env.emit(Intent::Activate { target, at });
                }
                None
            }
            DwellUpdate::Idle | DwellUpdate::CoolingDown { .. } => None,
        }
    }

    fn end_drags(&mut self) {
        if let Some(drag) = self.scroll.take() {
            debug!(moved = drag.moved, "scroll drag ended");
        }
        if let Some(drag) = self.scaling.take() {
            info!(control = %drag.control, "text scaling ended");
        }
    }

    fn lose(&mut self, env: &mut FrameEnv<'_>) {
        let was_present = self.tracker.state().present;
        self.tracker.lose();
        self.dwell.interrupt();
        self.end_drags();

        if env.config.profile.hover_help() {
            env.emit(Intent::Hover { target: None });
        }
        if was_present && env.config.profile == InteractionProfile::Glyphs {
            env.emit(Intent::PreviewOption(None));
        }
    }
}
