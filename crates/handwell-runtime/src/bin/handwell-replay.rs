//! handwell-replay - run a landmark recording through the engine
//!
//! ```text
//! handwell-replay <layout.json> <recording.jsonl> [--config engine.json]
//! ```
//!
//! Each recording line is one frame: `{"at_ms": 33, "hands": [...]}` with
//! hands in the raw landmark-source shape. Intents, status changes and final
//! counters are logged. `--log-format json` (or `HANDWELL_LOG_FORMAT=json`)
//! switches to JSON lines.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use handwell_core::{FrameTime, HandwellError, HandwellResult};
use handwell_gesture::{RawHand, RawLandmarkFrame};
use handwell_runtime::{
    init_tracing, CameraSource, Collaborators, Engine, EngineConfig, FeedbackFrame,
    FeedbackRenderer, LandmarkSource, LayoutConfig, LogFormat, RecordingEffects, Session,
};
use handwell_time::ManualClock;
use serde::Deserialize;
use tracing::{error, info};

/// Replay a landmark recording through the gesture engine
#[derive(Parser, Debug)]
#[command(name = "handwell-replay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Layout JSON with targets and controls
    layout: PathBuf,

    /// JSONL recording, one frame per line
    recording: PathBuf,

    /// Engine config JSON (defaults to the browse profile)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output: text or json
    #[arg(long, env = "HANDWELL_LOG_FORMAT", default_value = "text")]
    log_format: String,
}

/// One recorded landmark result
#[derive(Debug, Clone, Deserialize)]
struct RecordedFrame {
    at_ms: i64,
    #[serde(default)]
    hands: Vec<RawHand>,
}

/// Parse a JSONL recording; blank lines are skipped
fn parse_recording(text: &str) -> HandwellResult<Vec<RecordedFrame>> {
    let mut frames = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let frame: RecordedFrame =
            serde_json::from_str(line).map_err(|e| HandwellError::InvalidRecording {
                line: i + 1,
                reason: e.to_string(),
            })?;
        frames.push(frame);
    }
    Ok(frames)
}

/// Plays recorded frames, moving the clock to each frame's time
struct ReplayCamera {
    frames: VecDeque<RecordedFrame>,
    clock: ManualClock,
}

impl CameraSource for ReplayCamera {
    type Frame = RecordedFrame;

    fn next_frame(&mut self) -> Option<RecordedFrame> {
        let frame = self.frames.pop_front()?;
        self.clock.set(FrameTime::from_millis(frame.at_ms));
        Some(frame)
    }
}

/// Hands are already in the recording
struct RecordedLandmarks;

impl LandmarkSource<RecordedFrame> for RecordedLandmarks {
    fn detect(&mut self, frame: &RecordedFrame, _at: FrameTime) -> HandwellResult<RawLandmarkFrame> {
        Ok(RawLandmarkFrame {
            hands: frame.hands.clone(),
        })
    }
}

/// Logs status changes and activations
#[derive(Default)]
struct LogRenderer {
    status: String,
}

impl FeedbackRenderer for LogRenderer {
    fn render(&mut self, frame: &FeedbackFrame) {
        if frame.status.text != self.status {
            info!(at = %frame.timestamp, status = %frame.status.text, "status");
            self.status = frame.status.text.clone();
        }
        if let Some(activation) = &frame.activation {
            info!(
                at = %frame.timestamp,
                target_id = %activation.target,
                x = activation.at.x,
                y = activation.at.y,
                "activation"
            );
        }
    }

    fn show_error(&mut self, error: &HandwellError) {
        error!(error = %error, "session error");
    }
}

async fn read(path: &Path) -> HandwellResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| HandwellError::Io(format!("{}: {e}", path.display())))
}

async fn replay(cli: &Cli) -> HandwellResult<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_str(&read(path).await?)?,
        None => EngineConfig::default(),
    };
    let layout = LayoutConfig::from_json_str(&read(&cli.layout).await?)?;
    let frames = parse_recording(&read(&cli.recording).await?)?;
    info!(
        frames = frames.len(),
        targets = layout.targets.len(),
        controls = layout.controls.len(),
        "recording loaded"
    );

    let clock = ManualClock::new();
    let camera = ReplayCamera {
        frames: frames.into(),
        clock: clock.clone(),
    };
    let mut renderer = LogRenderer::default();
    let mut session = Session::start(
        async { Ok(RecordedLandmarks) },
        async { Ok(camera) },
        clock,
        Engine::new(config)?,
        &mut renderer,
    )
    .await?;

    let (resolver, mut controls) = layout.build();
    let mut effects = RecordingEffects::default();
    session.run(
        &mut Collaborators::new(&resolver, &mut controls, &mut effects),
        &mut renderer,
    );

    for effect in effects.log() {
        info!(?effect, "effect");
    }
    for spec in &layout.controls {
        info!(
            control = %spec.id,
            value = ?controls.value(&spec.id),
            writes = controls.writes(&spec.id),
            "control"
        );
    }

    let engine = session.engine();
    info!(
        frames = engine.stats().frames,
        empty_frames = engine.stats().empty_frames,
        degenerate_hands = engine.stats().degenerate_hands,
        hands_dropped = engine.adapter_stats().hands_dropped,
        activations = engine.dispatch_stats().activations,
        control_writes = engine.dispatch_stats().control_writes,
        detect_errors = session.stats().detect_errors,
        "replay finished"
    );
    if let Some(fps) = engine.cadence().fps() {
        info!(fps, "frame cadence");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(LogFormat::from_name(&cli.log_format)) {
        eprintln!("{e}");
    }

    match replay(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from([
            "handwell-replay",
            "layout.json",
            "session.jsonl",
            "--config",
            "editor.json",
        ])
        .unwrap();

        assert_eq!(cli.layout, PathBuf::from("layout.json"));
        assert_eq!(cli.recording, PathBuf::from("session.jsonl"));
        assert_eq!(cli.config, Some(PathBuf::from("editor.json")));
        assert!(Cli::try_parse_from(["handwell-replay", "layout.json"]).is_err());
    }

    #[test]
    fn test_parse_recording() {
        let text = "{\"at_ms\": 0, \"hands\": []}\n\n{\"at_ms\": 33}\n";

        let frames = parse_recording(text).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].at_ms, 33);
        assert!(frames[1].hands.is_empty());
    }

    #[test]
    fn test_parse_recording_reports_line() {
        let text = "{\"at_ms\": 0}\n{\"at_ms\": \"soon\"}\n";

        let err = parse_recording(text).unwrap_err();

        assert!(matches!(err, HandwellError::InvalidRecording { line: 2, .. }));
    }

    #[test]
    fn test_camera_moves_clock() {
        let clock = ManualClock::new();
        let mut camera = ReplayCamera {
            frames: parse_recording("{\"at_ms\": 40}\n{\"at_ms\": 80}").unwrap().into(),
            clock: clock.clone(),
        };

        camera.next_frame().unwrap();
        assert_eq!(handwell_time::Clock::now(&clock), FrameTime::from_millis(40));
        camera.next_frame().unwrap();
        assert_eq!(handwell_time::Clock::now(&clock), FrameTime::from_millis(80));
        assert!(camera.next_frame().is_none());
    }
}
