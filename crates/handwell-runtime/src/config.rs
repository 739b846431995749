//! Engine configuration

use std::time::Duration;

use handwell_core::{Handedness, HandwellError, HandwellResult, Viewport};
use handwell_dwell::{CooldownPolicy, DwellConfig};
use handwell_gesture::{CursorFilterConfig, GestureThresholds, OptionAlphabet};
use serde::Deserialize;

/// Upper bound for any configured hold or cooldown, one hour
pub const MAX_TIMING_MS: u64 = 3_600_000;

/// Which behaviour each hand role drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionProfile {
    /// Pointer: dwell click, pinch-drag scroll, help hover. Auxiliary: slider.
    #[default]
    Browse,
    /// Pointer: dwell click, glyph preview. Auxiliary: finger-count font.
    Glyphs,
    /// Pointer: dwell click, pinch text scaling, help hover. Auxiliary:
    /// rotation dial, fist distortion.
    Editor,
}

impl InteractionProfile {
    /// Hover-only targets toggle help in this profile
    pub fn hover_help(self) -> bool {
        matches!(self, InteractionProfile::Browse | InteractionProfile::Editor)
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub profile: InteractionProfile,
    /// Hand that drives the cursor; the other one is auxiliary
    pub pointer_hand: Handedness,
    pub thresholds: GestureThresholds,
    pub cursor: CursorFilterConfig,
    pub viewport: Viewport,
    /// Hands reported with a lower handedness score are ignored
    pub min_hand_score: f32,
    /// Pointer dwell threshold
    pub dwell_ms: u64,
    /// Same-target block after a dwell click
    pub dwell_cooldown_ms: u64,
    pub rotation_dwell_ms: u64,
    /// Finger count must hold this long
    pub stability_ms: u64,
    /// Scroll pixels per unit of normalized pinch travel
    pub scroll_sensitivity: f32,
    /// Travel from the pinch anchor that marks a drag as moved
    pub scroll_move_threshold: f32,
    /// Scaling starts right of this fraction of the scale control's width
    pub scaling_zone: f32,
    /// Size pixels per unit of normalized vertical travel
    pub scaling_gain: f64,
    /// Control name for text scaling
    pub scale_control: String,
    /// Control name for the fist distortion
    pub distortion_control: String,
    pub distortion_range: (f64, f64),
    /// Variant names indexed by extended-finger count
    pub font_variants: Vec<String>,
    /// Rotation dial options, in dial order
    pub alphabet: String,
    /// Dial option at zero turn
    pub alphabet_origin: char,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: InteractionProfile::Browse,
            pointer_hand: Handedness::Right,
            thresholds: GestureThresholds::default(),
            cursor: CursorFilterConfig::default(),
            viewport: Viewport::default(),
            min_hand_score: 0.0,
            dwell_ms: 1500,
            dwell_cooldown_ms: 500,
            rotation_dwell_ms: 2000,
            stability_ms: 800,
            scroll_sensitivity: 2500.0,
            scroll_move_threshold: 0.03,
            scaling_zone: 0.7,
            scaling_gain: 500.0,
            scale_control: "scale".to_string(),
            distortion_control: "weight".to_string(),
            distortion_range: (100.0, 900.0),
            font_variants: vec![
                "font-Hand".to_string(),
                "font-DIST-20".to_string(),
                "font-DIST-40".to_string(),
                "font-DIST-60".to_string(),
                "font-DIST-80".to_string(),
                "font-DIST-100".to_string(),
            ],
            alphabet: OptionAlphabet::EDITOR_CHARS.to_string(),
            alphabet_origin: 'a',
        }
    }
}

impl EngineConfig {
    /// Type-specimen page: scroll and size sliders
    pub fn browse() -> Self {
        Self::default()
    }

    /// Glyph browser: hover preview and finger-count fonts
    pub fn glyphs() -> Self {
        Self {
            profile: InteractionProfile::Glyphs,
            ..Self::default()
        }
    }

    /// Text editor: rotation dial, distortion and text scaling
    pub fn editor() -> Self {
        Self {
            profile: InteractionProfile::Editor,
            thresholds: GestureThresholds::editor(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config; absent fields take defaults
    pub fn from_json_str(json: &str) -> HandwellResult<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| HandwellError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HandwellResult<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.thresholds.pinch) || !positive(self.thresholds.fist) {
            return Err(HandwellError::InvalidConfig(
                "gesture thresholds must be positive".into(),
            ));
        }
        if !positive(self.cursor.alpha) || self.cursor.alpha > 1.0 {
            return Err(HandwellError::InvalidConfig(format!(
                "cursor alpha {} outside (0, 1]",
                self.cursor.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.min_hand_score) {
            return Err(HandwellError::InvalidConfig(format!(
                "min_hand_score {} outside [0, 1]",
                self.min_hand_score
            )));
        }
        if !positive(self.viewport.width) || !positive(self.viewport.height) {
            return Err(HandwellError::InvalidConfig("viewport must be non-empty".into()));
        }
        let timings = [
            ("dwell_ms", self.dwell_ms),
            ("dwell_cooldown_ms", self.dwell_cooldown_ms),
            ("rotation_dwell_ms", self.rotation_dwell_ms),
            ("stability_ms", self.stability_ms),
        ];
        if let Some((name, value)) = timings.iter().find(|(_, v)| *v > MAX_TIMING_MS) {
            return Err(HandwellError::InvalidConfig(format!(
                "{name} {value} exceeds {MAX_TIMING_MS}"
            )));
        }
        if self.profile == InteractionProfile::Editor {
            self.option_alphabet()?;
        }
        Ok(())
    }

    /// Auxiliary role
    pub fn aux_hand(&self) -> Handedness {
        self.pointer_hand.opposite()
    }

    pub fn pointer_dwell(&self) -> DwellConfig {
        DwellConfig {
            threshold: Duration::from_millis(self.dwell_ms),
            cooldown: CooldownPolicy::Fixed(Duration::from_millis(self.dwell_cooldown_ms)),
        }
    }

    pub fn rotation_dwell(&self) -> DwellConfig {
        DwellConfig::rotation().with_threshold(Duration::from_millis(self.rotation_dwell_ms))
    }

    pub fn stability_dwell(&self) -> DwellConfig {
        DwellConfig::stability().with_threshold(Duration::from_millis(self.stability_ms))
    }

    pub fn option_alphabet(&self) -> HandwellResult<OptionAlphabet> {
        OptionAlphabet::from_str_with_origin(&self.alphabet, self.alphabet_origin)
    }

    /// Variant for an extended-finger count
    pub fn font_variant(&self, fingers: u8) -> Option<&str> {
        self.font_variants.get(fingers as usize).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(EngineConfig::browse().profile, InteractionProfile::Browse);
        assert_eq!(EngineConfig::glyphs().profile, InteractionProfile::Glyphs);

        let editor = EngineConfig::editor();
        assert_eq!(editor.profile, InteractionProfile::Editor);
        assert_eq!(editor.thresholds.pinch, 0.05);
        assert_eq!(editor.aux_hand(), Handedness::Left);
    }

    #[test]
    fn test_dwell_configs() {
        let config = EngineConfig::default();

        assert_eq!(config.pointer_dwell(), DwellConfig::pointer());
        assert_eq!(config.rotation_dwell(), DwellConfig::rotation());
        assert_eq!(config.stability_dwell(), DwellConfig::stability());
    }

    #[test]
    fn test_editor_alphabet() {
        let alphabet = EngineConfig::editor().option_alphabet().unwrap();

        assert_eq!(alphabet.len(), 89);
        assert_eq!(alphabet.origin(), 26);
    }

    #[test]
    fn test_font_variants() {
        let config = EngineConfig::glyphs();

        assert_eq!(config.font_variant(0), Some("font-Hand"));
        assert_eq!(config.font_variant(2), Some("font-DIST-40"));
        assert_eq!(config.font_variant(6), None);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json_str(
            r#"{ "profile": "glyphs", "pointer_hand": "Left", "thresholds": { "pinch": 0.07 } }"#,
        )
        .unwrap();

        assert_eq!(config.profile, InteractionProfile::Glyphs);
        assert_eq!(config.pointer_hand, Handedness::Left);
        assert_eq!(config.thresholds.pinch, 0.07);
        assert_eq!(config.thresholds.fist, 0.15);
        assert_eq!(config.dwell_ms, 1500);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "cursor": { "alpha": 0.0 } }"#),
            Err(HandwellError::InvalidConfig(_))
        ));
        assert!(EngineConfig::from_json_str("{ not json").is_err());
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "dwell_cooldown_ms": 18446744073709551615 }"#),
            Err(HandwellError::InvalidConfig(_))
        ));
        assert!(EngineConfig::from_json_str(r#"{ "stability_ms": 3600000 }"#).is_ok());
        assert!(EngineConfig::from_json_str(
            r#"{ "profile": "editor", "alphabet": "xyz", "alphabet_origin": "a" }"#
        )
        .is_err());
    }
}
