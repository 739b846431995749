//! Host collaborator interfaces
//!
//! The engine never touches a UI toolkit, camera or model directly. Each
//! external concern is a trait here, implemented by the embedding host.

use std::fmt;

use handwell_core::{FrameTime, HandwellError, HandwellResult, NormalizedPoint, NormalizedRect, ScreenPoint};
use handwell_gesture::RawLandmarkFrame;
use serde::Deserialize;

use crate::feedback::FeedbackFrame;

/// Produces landmarks for a camera frame
pub trait LandmarkSource<F> {
    fn detect(&mut self, frame: &F, at: FrameTime) -> HandwellResult<RawLandmarkFrame>;
}

/// Continuous video feed
pub trait CameraSource {
    type Frame;

    /// Next frame, `None` once the feed has ended
    fn next_frame(&mut self) -> Option<Self::Frame>;
}

/// Identifier of an interactive element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an element reacts to the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Activated by dwell
    Clickable,
    /// Only toggles visibility of associated help while hovered
    HoverOnly,
    /// Selectable glyph cell, previewed on hover and activated by dwell
    Glyph(char),
}

/// Element resolved under the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
}

impl Target {
    pub fn new(id: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            id: TargetId::new(id),
            kind,
        }
    }

    /// Eligible for dwell activation
    pub fn is_clickable(&self) -> bool {
        !matches!(self.kind, TargetKind::HoverOnly)
    }
}

/// Hit-tests normalized viewport points
pub trait TargetResolver {
    fn resolve(&self, point: NormalizedPoint) -> Option<Target>;
}

/// Identifier of a bound numeric control
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub String);

impl ControlId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semantic lookup of a control
#[derive(Debug, Clone, PartialEq)]
pub enum ControlQuery {
    /// The control whose section contains this point
    Near(NormalizedPoint),
    /// A control by its well-known name
    Named(String),
}

/// Read handle of an externally owned control
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousBinding {
    pub id: ControlId,
    pub min: f64,
    pub max: f64,
    pub current: f64,
    /// Region the control governs, used for zone tests
    pub bounds: NormalizedRect,
}

impl ContinuousBinding {
    /// Clamp to the declared range, tolerating reversed bounds. A NaN bound
    /// collapses onto the other one; with both NaN the value passes through.
    pub fn clamp(&self, value: f64) -> f64 {
        // f64::min/max skip a NaN operand where f64::clamp would panic
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        value.max(lo).min(hi)
    }
}

/// Bound control registry
pub trait ControlRegistry {
    fn find(&self, query: &ControlQuery) -> Option<ContinuousBinding>;

    /// Write a value and fire the control's change notification
    fn write(&mut self, id: &ControlId, value: f64) -> HandwellResult<()>;
}

/// Page-level effects
pub trait EffectSink {
    /// Native activation of a target, as a click would
    fn activate(&mut self, target: &Target, at: ScreenPoint);

    /// Show help for the hovered element, hide all others
    fn set_hover(&mut self, target: Option<&TargetId>);

    fn scroll(&mut self, dy: f32);

    /// Preview an option, `None` restores the current selection
    fn preview_option(&mut self, option: Option<char>);

    fn commit_option(&mut self, option: char);

    /// Switch to a named variant (font)
    fn select_variant(&mut self, variant: &str);
}

/// Draws engine feedback
pub trait FeedbackRenderer {
    /// Called once per processed frame
    fn render(&mut self, frame: &FeedbackFrame);

    /// Called once on a terminal failure
    fn show_error(&mut self, error: &HandwellError);
}

/// The per-frame collaborators, borrowed for one engine pass
pub struct Collaborators<'a> {
    pub targets: &'a dyn TargetResolver,
    pub controls: &'a mut dyn ControlRegistry,
    pub effects: &'a mut dyn EffectSink,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        targets: &'a dyn TargetResolver,
        controls: &'a mut dyn ControlRegistry,
        effects: &'a mut dyn EffectSink,
    ) -> Self {
        Self {
            targets,
            controls,
            effects,
        }
    }
}
