//! Scripted host scenes
//!
//! A scene is the page the engine acts on: hit-testable targets and bound
//! controls, held in memory. Presets mirror the three interaction profiles.

use handwell_core::{HandwellResult, NormalizedRect};
use handwell_runtime::{InMemoryControls, LayoutConfig, StaticLayout, TargetKind};

/// Targets and controls for one scenario
#[derive(Debug, Clone, Default)]
pub struct ScriptedScene {
    pub layout: StaticLayout,
    pub controls: InMemoryControls,
}

impl ScriptedScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a serialized layout
    pub fn from_json(json: &str) -> HandwellResult<Self> {
        let (layout, controls) = LayoutConfig::from_json_str(json)?.build();
        Ok(Self { layout, controls })
    }

    pub fn target(mut self, id: &str, kind: TargetKind, bounds: NormalizedRect) -> Self {
        self.layout = self.layout.with_target(id, kind, bounds);
        self
    }

    pub fn control(mut self, id: &str, min: f64, max: f64, value: f64, bounds: NormalizedRect) -> Self {
        self.controls.insert(id, min, max, value, bounds);
        self
    }

    /// Type specimen page: a button, a help icon and a size slider in the
    /// lower left
    pub fn specimen_page() -> Self {
        Self::new()
            .target("buy", TargetKind::Clickable, NormalizedRect::new(0.3, 0.2, 0.7, 0.6))
            .target("help", TargetKind::HoverOnly, NormalizedRect::new(0.8, 0.0, 1.0, 0.2))
            .control("size", 8.0, 400.0, 64.0, NormalizedRect::new(0.0, 0.3, 0.5, 0.7))
    }

    /// Glyph grid: a row of four cells across the top half
    pub fn glyph_grid() -> Self {
        ['a', 'k', 'q', 'z']
            .iter()
            .enumerate()
            .fold(Self::new(), |scene, (i, c)| {
                let left = i as f32 * 0.25;
                scene.target(
                    &format!("glyph-{c}"),
                    TargetKind::Glyph(*c),
                    NormalizedRect::new(left, 0.0, left + 0.25, 0.5),
                )
            })
    }

    /// Editor: full-page scale control, off-page weight control and a help
    /// icon
    pub fn editor() -> Self {
        Self::new()
            .target("help", TargetKind::HoverOnly, NormalizedRect::new(0.0, 0.0, 0.1, 0.1))
            .control("scale", 16.0, 400.0, 64.0, NormalizedRect::new(0.0, 0.0, 1.0, 1.0))
            .control("weight", 100.0, 900.0, 400.0, NormalizedRect::new(0.0, 0.0, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handwell_core::NormalizedPoint;
    use handwell_runtime::{ControlQuery, ControlRegistry, TargetId, TargetResolver};

    #[test]
    fn test_specimen_page() {
        let scene = ScriptedScene::specimen_page();

        let target = scene.layout.resolve(NormalizedPoint::new(0.5, 0.4)).unwrap();
        assert_eq!(target.id, TargetId::new("buy"));
        assert!(scene
            .controls
            .find(&ControlQuery::Near(NormalizedPoint::new(0.25, 0.5)))
            .is_some());
    }

    #[test]
    fn test_glyph_grid() {
        let scene = ScriptedScene::glyph_grid();

        let cell = scene.layout.resolve(NormalizedPoint::new(0.6, 0.2)).unwrap();
        assert_eq!(cell.kind, TargetKind::Glyph('q'));
        assert!(scene.layout.resolve(NormalizedPoint::new(0.6, 0.8)).is_none());
    }

    #[test]
    fn test_from_json() {
        let scene = ScriptedScene::from_json(
            r#"{ "controls": [ { "id": "size", "min": 8, "max": 400, "bounds": { "left": 0, "top": 0, "right": 1, "bottom": 1 } } ] }"#,
        )
        .unwrap();

        assert_eq!(scene.controls.value("size"), Some(8.0));
    }
}
