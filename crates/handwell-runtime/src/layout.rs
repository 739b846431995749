//! In-memory host collaborators
//!
//! A static layout of rectangles stands in for the page: targets are hit
//! tested by containment, controls keep their values in memory and effects
//! are recorded. Used by the replay tool and by scenario tests.

use handwell_core::{HandwellError, HandwellResult, NormalizedPoint, NormalizedRect, ScreenPoint};
use serde::Deserialize;
use tracing::debug;

use crate::feedback::FeedbackFrame;
use crate::host::{
    ContinuousBinding, ControlId, ControlQuery, ControlRegistry, EffectSink, FeedbackRenderer,
    Target, TargetId, TargetKind, TargetResolver,
};

/// A target rectangle
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetSpec {
    pub id: String,
    pub kind: TargetKind,
    pub bounds: NormalizedRect,
}

/// A control and the section it governs
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControlSpec {
    pub id: String,
    pub min: f64,
    pub max: f64,
    /// Initial value, the range minimum if absent
    #[serde(default)]
    pub value: Option<f64>,
    pub bounds: NormalizedRect,
}

/// Serialized page layout
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub targets: Vec<TargetSpec>,
    pub controls: Vec<ControlSpec>,
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> HandwellResult<Self> {
        serde_json::from_str(json).map_err(|e| HandwellError::InvalidConfig(e.to_string()))
    }

    /// Build the resolver and control registry for this layout
    pub fn build(&self) -> (StaticLayout, InMemoryControls) {
        let layout = StaticLayout {
            targets: self.targets.clone(),
        };
        let mut controls = InMemoryControls::new();
        for spec in &self.controls {
            controls.insert(
                &spec.id,
                spec.min,
                spec.max,
                spec.value.unwrap_or(spec.min),
                spec.bounds,
            );
        }
        (layout, controls)
    }
}

/// Rectangle hit testing; later targets sit on top of earlier ones
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    targets: Vec<TargetSpec>,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, id: &str, kind: TargetKind, bounds: NormalizedRect) -> Self {
        self.targets.push(TargetSpec {
            id: id.to_string(),
            kind,
            bounds,
        });
        self
    }
}

impl TargetResolver for StaticLayout {
    fn resolve(&self, point: NormalizedPoint) -> Option<Target> {
        self.targets
            .iter()
            .rev()
            .find(|t| t.bounds.contains(point))
            .map(|t| Target::new(t.id.clone(), t.kind))
    }
}

#[derive(Debug, Clone)]
struct ControlEntry {
    binding: ContinuousBinding,
    writes: u64,
}

/// Control values held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryControls {
    entries: Vec<ControlEntry>,
}

impl InMemoryControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, min: f64, max: f64, value: f64, bounds: NormalizedRect) {
        let binding = ContinuousBinding {
            id: ControlId::new(id),
            min,
            max,
            current: value,
            bounds,
        };
        let current = binding.clamp(value);
        self.entries.push(ControlEntry {
            binding: ContinuousBinding { current, ..binding },
            writes: 0,
        });
    }

    fn entry(&self, id: &str) -> Option<&ControlEntry> {
        self.entries.iter().find(|e| e.binding.id.0 == id)
    }

    pub fn value(&self, id: &str) -> Option<f64> {
        self.entry(id).map(|e| e.binding.current)
    }

    /// Change notifications fired for a control
    pub fn writes(&self, id: &str) -> u64 {
        self.entry(id).map_or(0, |e| e.writes)
    }
}

impl ControlRegistry for InMemoryControls {
    fn find(&self, query: &ControlQuery) -> Option<ContinuousBinding> {
        let entry = match query {
            // later entries sit on top, as with targets
            ControlQuery::Near(point) => self
                .entries
                .iter()
                .rev()
                .find(|e| e.binding.bounds.contains(*point)),
            ControlQuery::Named(name) => self.entry(name),
        };
        entry.map(|e| e.binding.clone())
    }

    fn write(&mut self, id: &ControlId, value: f64) -> HandwellResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.binding.id == *id)
            .ok_or_else(|| HandwellError::ControlNotFound(id.0.clone()))?;
        entry.binding.current = entry.binding.clamp(value);
        entry.writes += 1;
        Ok(())
    }
}

/// One effect as seen by the host
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEffect {
    Activate(TargetId),
    Hover(Option<TargetId>),
    Scroll(f32),
    Preview(Option<char>),
    Commit(char),
    Variant(String),
}

/// Records effects and tracks the resulting page state
#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    log: Vec<RecordedEffect>,
    hovered: Option<TargetId>,
    preview: Option<char>,
    committed: Option<char>,
    variant: Option<String>,
    scrolled: f32,
}

impl RecordingEffects {
    pub fn log(&self) -> &[RecordedEffect] {
        &self.log
    }

    /// Drop the recorded log, keeping page state
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Activations in order
    pub fn activations(&self) -> Vec<&TargetId> {
        self.log
            .iter()
            .filter_map(|e| match e {
                RecordedEffect::Activate(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Element whose help is currently shown
    pub fn hovered(&self) -> Option<&TargetId> {
        self.hovered.as_ref()
    }

    pub fn preview(&self) -> Option<char> {
        self.preview
    }

    pub fn committed(&self) -> Option<char> {
        self.committed
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Total scroll in pixels
    pub fn scrolled(&self) -> f32 {
        self.scrolled
    }
}

impl EffectSink for RecordingEffects {
    fn activate(&mut self, target: &Target, _at: ScreenPoint) {
        self.log.push(RecordedEffect::Activate(target.id.clone()));
    }

    fn set_hover(&mut self, target: Option<&TargetId>) {
        if self.hovered.as_ref() != target {
            debug!(target_id = ?target, "hover changed");
        }
        self.hovered = target.cloned();
        self.log.push(RecordedEffect::Hover(target.cloned()));
    }

    fn scroll(&mut self, dy: f32) {
        self.scrolled += dy;
        self.log.push(RecordedEffect::Scroll(dy));
    }

    fn preview_option(&mut self, option: Option<char>) {
        self.preview = option;
        self.log.push(RecordedEffect::Preview(option));
    }

    fn commit_option(&mut self, option: char) {
        self.committed = Some(option);
        self.log.push(RecordedEffect::Commit(option));
    }

    fn select_variant(&mut self, variant: &str) {
        self.variant = Some(variant.to_string());
        self.log.push(RecordedEffect::Variant(variant.to_string()));
    }
}

/// Keeps every rendered frame and error
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<FeedbackFrame>,
    pub errors: Vec<HandwellError>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<&FeedbackFrame> {
        self.frames.last()
    }
}

impl FeedbackRenderer for RecordingRenderer {
    fn render(&mut self, frame: &FeedbackFrame) {
        self.frames.push(frame.clone());
    }

    fn show_error(&mut self, error: &HandwellError) {
        self.errors.push(error.clone());
    }
}
