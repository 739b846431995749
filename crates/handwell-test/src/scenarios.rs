//! End-to-end gesture scenarios
//!
//! Each scenario plays a short script of poses through a [`FrameDriver`]
//! against a [`ScriptedScene`] and summarizes what the host saw.

use std::time::Duration;

use handwell_core::HandwellResult;
use handwell_gesture::OptionAlphabet;
use handwell_runtime::{EngineConfig, RecordedEffect};

use crate::driver::FrameDriver;
use crate::pose::HandPose;
use crate::scene::ScriptedScene;

/// What a scenario produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioOutcome {
    pub activations: Vec<String>,
    pub commits: Vec<char>,
    pub variants: Vec<String>,
    pub scrolled: f32,
    pub last_status: String,
}

impl ScenarioOutcome {
    pub fn from_driver(driver: &FrameDriver) -> Self {
        let mut outcome = ScenarioOutcome {
            scrolled: driver.effects().scrolled(),
            last_status: driver
                .renderer()
                .last()
                .map(|f| f.status.text.clone())
                .unwrap_or_default(),
            ..Default::default()
        };
        for effect in driver.log() {
            match effect {
                RecordedEffect::Activate(id) => outcome.activations.push(id.to_string()),
                RecordedEffect::Commit(c) => outcome.commits.push(*c),
                RecordedEffect::Variant(v) => outcome.variants.push(v.clone()),
                _ => {}
            }
        }
        outcome
    }
}

/// Hold the pointer on the specimen page button for `hold`, with landmark
/// jitter
pub fn dwell_click(hold: Duration, seed: u64) -> HandwellResult<ScenarioOutcome> {
    let mut driver = FrameDriver::new(EngineConfig::browse(), ScriptedScene::specimen_page())?
        .with_jitter(0.003, seed);
    driver.hold(&[HandPose::right().at(0.5, 0.4)], hold);
    Ok(ScenarioOutcome::from_driver(&driver))
}

/// Pinch and drag the pointer hand down by `travel`
pub fn pinch_scroll(travel: f32, frames: u32) -> HandwellResult<ScenarioOutcome> {
    let mut driver = FrameDriver::new(EngineConfig::browse(), ScriptedScene::specimen_page())?;
    for i in 0..=frames {
        let y = 0.4 + travel * i as f32 / frames as f32;
        driver.step(&[HandPose::right().at(0.5, y).pinching()]);
    }
    driver.step(&[HandPose::right().at(0.5, 0.4 + travel)]);
    Ok(ScenarioOutcome::from_driver(&driver))
}

/// Hold finger counts in sequence on the auxiliary hand
pub fn finger_fonts(counts: &[u8], hold: Duration) -> HandwellResult<ScenarioOutcome> {
    let mut driver = FrameDriver::new(EngineConfig::glyphs(), ScriptedScene::glyph_grid())?;
    for count in counts {
        driver.hold(&[HandPose::left().fingers(*count)], hold);
    }
    Ok(ScenarioOutcome::from_driver(&driver))
}

/// Dial each option in turn on the auxiliary hand
pub fn dial_word(word: &str, hold: Duration) -> HandwellResult<ScenarioOutcome> {
    let alphabet = OptionAlphabet::editor();
    let mut driver = FrameDriver::new(EngineConfig::editor(), ScriptedScene::editor())?;
    for c in word.chars() {
        driver.hold(&[HandPose::left().dialing(&alphabet, c)], hold);
    }
    Ok(ScenarioOutcome::from_driver(&driver))
}
