//! Auxiliary role - slider, finger-count variants, rotation dial and fist
//! distortion

use std::time::Duration;

use handwell_core::{HandLandmark, HandwellResult};
use handwell_dwell::{RotationSelector, StabilitySelector};
use handwell_gesture::{GestureState, HandTracker, LinearMapping, OptionAlphabet};
use tracing::{debug, warn};

use crate::config::{EngineConfig, InteractionProfile};
use crate::engine::{FrameEnv, HandInput};
use crate::feedback::{AuxiliaryReport, ControlFeedback, Marker, MarkerKind, Segment};
use crate::host::{ControlId, ControlQuery};
use crate::intent::Intent;

/// Rotation dial over an option alphabet
struct Dial {
    alphabet: OptionAlphabet,
    selector: RotationSelector,
}

pub(crate) struct AuxiliaryRole {
    tracker: HandTracker,
    /// Editor profile only
    dial: Option<Dial>,
    stability: StabilitySelector,
    /// Control currently under the hand
    slider: Option<ControlId>,
}

impl AuxiliaryRole {
    pub fn new(config: &EngineConfig) -> HandwellResult<Self> {
        let dial = if config.profile == InteractionProfile::Editor {
            let alphabet = config.option_alphabet()?;
            let selector = RotationSelector::new(alphabet.mapper(), config.rotation_dwell());
            Some(Dial { alphabet, selector })
        } else {
            None
        };

        Ok(Self {
            tracker: HandTracker::new(config.aux_hand(), &config.cursor),
            dial,
            stability: StabilitySelector::new(config.stability_dwell()),
            slider: None,
        })
    }

    pub fn state(&self) -> &GestureState {
        self.tracker.state()
    }

    pub fn step(&mut self, input: HandInput<'_>, env: &mut FrameEnv<'_>) -> AuxiliaryReport {
        let (sample, features) = match input {
            HandInput::Absent => {
                self.lose(env);
                return AuxiliaryReport::default();
            }
            HandInput::Degenerate => {
                self.tracker.hold();
                return AuxiliaryReport {
                    present: true,
                    ..Default::default()
                };
            }
            HandInput::Tracked { sample, features } => (sample, features),
        };

        let state = *self.tracker.observe(&features);

        let index = env.project(sample.point(HandLandmark::IndexTip));
        let thumb = env.project(sample.point(HandLandmark::ThumbTip));
        env.feedback.markers.push(Marker {
            kind: MarkerKind::AuxiliaryIndexTip,
            at: index,
        });
        env.feedback.markers.push(Marker {
            kind: MarkerKind::AuxiliaryThumbTip,
            at: thumb,
        });
        env.feedback.segments.push(Segment {
            from: index,
            to: thumb,
        });

        let mut report = AuxiliaryReport {
            present: true,
            ..Default::default()
        };

        match env.config.profile {
            InteractionProfile::Browse => report.slider = self.slider_step(&state, env),
            InteractionProfile::Glyphs => {
                report.fingers_pending = self.fingers_step(state.extended_fingers, env)
            }
            InteractionProfile::Editor => self.editor_step(&state, env, &mut report),
        }

        report
    }

    /// Pinch distance drives the control under the hand
    fn slider_step(&mut self, state: &GestureState, env: &mut FrameEnv<'_>) -> bool {
        let Some(binding) = env.controls.find(&ControlQuery::Near(state.raw_pointer)) else {
            if let Some(id) = self.slider.take() {
                debug!(control = %id, "slider released");
            }
            return false;
        };

        if self.slider.as_ref() != Some(&binding.id) {
            debug!(control = %binding.id, "slider engaged");
            self.slider = Some(binding.id.clone());
        }

        let value = binding.clamp(
            LinearMapping::slider(binding.min, binding.max).map(state.pinch_distance as f64),
        );
        env.feedback.control = Some(ControlFeedback {
            control: binding.id.clone(),
            value,
            at: env.screen(state.raw_pointer),
        });
        env.emit(Intent::SetControl {
            control: binding.id,
            value,
        });
        true
    }

    fn fingers_step(&mut self, fingers: u8, env: &mut FrameEnv<'_>) -> Option<(u8, Duration)> {
        let step = self.stability.update(fingers, env.now);

        if let Some(fingers) = step.selected {
            match env.config.font_variant(fingers) {
                Some(variant) => {
                    let variant = variant.to_string();
                    env.emit(Intent::SelectVariant { fingers, variant });
                }
                None => warn!(fingers, "no variant for finger count"),
            }
        }

        step.pending.map(|remaining| (step.value, remaining))
    }

    fn editor_step(
        &mut self,
        state: &GestureState,
        env: &mut FrameEnv<'_>,
        report: &mut AuxiliaryReport,
    ) {
        let Some(dial) = self.dial.as_mut() else {
            return;
        };

        if state.fist_started {
            debug!("fist: dial preview dropped");
            dial.selector.reset_preview();
        }

        if state.is_fist {
            report.fist = true;
            env.emit(Intent::PreviewOption(None));

            let name = env.config.distortion_control.clone();
            if let Some(binding) = env.controls.find(&ControlQuery::Named(name)) {
                let (min, max) = env.config.distortion_range;
                let value =
                    binding.clamp(LinearMapping::vertical(min, max).map(state.vertical_position as f64));
                env.feedback.control = Some(ControlFeedback {
                    control: binding.id.clone(),
                    value,
                    at: env.screen(state.raw_pointer),
                });
                env.emit(Intent::SetControl {
                    control: binding.id,
                    value,
                });
            }
            return;
        }

        let step = dial.selector.update(state.rotation, env.now);
        let option = dial.alphabet.get(step.index);
        env.emit(Intent::PreviewOption(option));

        if let Some(committed) = step.committed.and_then(|i| dial.alphabet.get(i)) {
            env.emit(Intent::CommitOption(committed));
        }
        report.rotation = option.zip(step.remaining);
    }

    fn lose(&mut self, env: &mut FrameEnv<'_>) {
        if !self.tracker.state().present {
            return;
        }
        self.tracker.lose();
        self.stability.reset();
        self.slider = None;
        if let Some(dial) = self.dial.as_mut() {
            dial.selector.reset();
            env.emit(Intent::PreviewOption(None));
        }
    }
}
