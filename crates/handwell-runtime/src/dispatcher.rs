//! Action dispatcher - executes a frame's intents against the host

use tracing::{debug, info, warn};

use crate::host::{ControlId, Collaborators};
use crate::intent::{Intent, IntentKind};

/// Dispatch counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub frames: u64,
    pub activations: u64,
    pub control_writes: u64,
    /// Control writes dropped as superseded within a frame
    pub control_writes_coalesced: u64,
    pub control_write_errors: u64,
    pub hovers: u64,
    pub scrolls: u64,
    pub previews: u64,
    pub commits: u64,
    pub variants: u64,
}

impl DispatchStats {
    pub fn count(&self, kind: IntentKind) -> u64 {
        match kind {
            IntentKind::Activate => self.activations,
            IntentKind::SetControl => self.control_writes,
            IntentKind::Hover => self.hovers,
            IntentKind::Scroll => self.scrolls,
            IntentKind::PreviewOption => self.previews,
            IntentKind::CommitOption => self.commits,
            IntentKind::SelectVariant => self.variants,
        }
    }
}

/// Executes intents, one frame at a time
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    stats: DispatchStats,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Dispatch one frame's intents in order. Each control is written at most
    /// once, with the last value requested for it this frame.
    pub fn dispatch_frame(&mut self, intents: Vec<Intent>, host: &mut Collaborators<'_>) {
        self.stats.frames += 1;

        let mut writes: Vec<(ControlId, f64)> = Vec::new();
        for intent in intents {
            match intent {
                Intent::SetControl { control, value } => {
                    if let Some(slot) = writes.iter_mut().find(|(id, _)| *id == control) {
                        slot.1 = value;
                        self.stats.control_writes_coalesced += 1;
                    } else {
                        writes.push((control, value));
                    }
                }
                Intent::Activate { target, at } => {
                    info!(target_id = %target.id, x = at.x, y = at.y, "activate");
                    host.effects.activate(&target, at);
                    self.stats.activations += 1;
                }
                Intent::Hover { target } => {
                    host.effects.set_hover(target.as_ref());
                    self.stats.hovers += 1;
                }
                Intent::Scroll { dy } => {
                    host.effects.scroll(dy);
                    self.stats.scrolls += 1;
                }
                Intent::PreviewOption(option) => {
                    host.effects.preview_option(option);
                    self.stats.previews += 1;
                }
                Intent::CommitOption(option) => {
                    info!(%option, "commit option");
                    host.effects.commit_option(option);
                    self.stats.commits += 1;
                }
                Intent::SelectVariant { fingers, variant } => {
                    info!(fingers, %variant, "select variant");
                    host.effects.select_variant(&variant);
                    self.stats.variants += 1;
                }
            }
        }

        for (control, value) in writes {
            debug!(%control, value, "control write");
            match host.controls.write(&control, value) {
                Ok(()) => self.stats.control_writes += 1,
                Err(err) => {
                    warn!(%control, error = %err, "control write failed");
                    self.stats.control_write_errors += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Target, TargetKind};
    use crate::layout::{InMemoryControls, RecordedEffect, RecordingEffects, StaticLayout};
    use handwell_core::{NormalizedRect, ScreenPoint};

    fn controls() -> InMemoryControls {
        let mut controls = InMemoryControls::new();
        controls.insert("size", 8.0, 400.0, 64.0, NormalizedRect::new(0.0, 0.0, 1.0, 1.0));
        controls
    }

    #[test]
    fn test_control_write_last_wins() {
        let layout = StaticLayout::default();
        let mut controls = controls();
        let mut effects = RecordingEffects::default();
        let mut dispatcher = ActionDispatcher::new();

        let intents = vec![
            Intent::SetControl { control: ControlId::new("size"), value: 10.0 },
            Intent::SetControl { control: ControlId::new("size"), value: 20.0 },
        ];
        dispatcher.dispatch_frame(intents, &mut Collaborators::new(&layout, &mut controls, &mut effects));

        assert_eq!(controls.value("size"), Some(20.0));
        assert_eq!(controls.writes("size"), 1);
        assert_eq!(dispatcher.stats().control_writes, 1);
        assert_eq!(dispatcher.stats().control_writes_coalesced, 1);
    }

    #[test]
    fn test_effects_in_order() {
        let layout = StaticLayout::default();
        let mut controls = controls();
        let mut effects = RecordingEffects::default();
        let mut dispatcher = ActionDispatcher::new();
        let target = Target::new("ok", TargetKind::Clickable);

        let intents = vec![
            Intent::Hover { target: None },
            Intent::Activate { target: target.clone(), at: ScreenPoint::new(1.0, 2.0) },
            Intent::Scroll { dy: 12.5 },
        ];
        dispatcher.dispatch_frame(intents, &mut Collaborators::new(&layout, &mut controls, &mut effects));

        assert_eq!(
            effects.log(),
            &[
                RecordedEffect::Hover(None),
                RecordedEffect::Activate(target.id),
                RecordedEffect::Scroll(12.5),
            ]
        );
        assert_eq!(dispatcher.stats().count(IntentKind::Activate), 1);
    }

    #[test]
    fn test_unknown_control_counted() {
        let layout = StaticLayout::default();
        let mut controls = controls();
        let mut effects = RecordingEffects::default();
        let mut dispatcher = ActionDispatcher::new();

        dispatcher.dispatch_frame(
            vec![Intent::SetControl { control: ControlId::new("missing"), value: 1.0 }],
            &mut Collaborators::new(&layout, &mut controls, &mut effects),
        );

        assert_eq!(dispatcher.stats().control_write_errors, 1);
        assert_eq!(dispatcher.stats().control_writes, 0);
    }

    proptest::proptest! {
        #[test]
        fn prop_one_write_per_control(values in proptest::collection::vec(-100.0f64..600.0, 1..20)) {
            let layout = StaticLayout::default();
            let mut controls = controls();
            let mut effects = RecordingEffects::default();
            let mut dispatcher = ActionDispatcher::new();
            let last = *values.last().unwrap();

            let intents = values
                .into_iter()
                .map(|value| Intent::SetControl { control: ControlId::new("size"), value })
                .collect();
            dispatcher.dispatch_frame(intents, &mut Collaborators::new(&layout, &mut controls, &mut effects));

            proptest::prop_assert_eq!(controls.writes("size"), 1);
            proptest::prop_assert_eq!(controls.value("size"), Some(last.clamp(8.0, 400.0)));
        }
    }
}
