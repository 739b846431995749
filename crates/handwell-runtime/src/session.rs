//! Session - two-stage bootstrap and the frame loop
//!
//! ```text
//! start: landmark source ──ok──▶ camera ──ok──▶ RUNNING ──step()──▶ frames
//!               │ err                 │ err
//!               ▼                     ▼
//!        LandmarkSourceUnavailable   CameraUnavailable   (shown once, no retry)
//! ```

use std::future::Future;

use handwell_core::{HandwellError, HandwellResult};
use handwell_gesture::RawLandmarkFrame;
use handwell_time::Clock;
use tracing::{error, info, warn};

use crate::engine::Engine;
use crate::feedback::FeedbackFrame;
use crate::host::{CameraSource, Collaborators, FeedbackRenderer, LandmarkSource};

/// Session counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    /// Detection failures treated as empty frames
    pub detect_errors: u64,
}

/// A running gesture session
pub struct Session<L, C, K> {
    landmarks: L,
    camera: C,
    clock: K,
    engine: Engine,
    stats: SessionStats,
}

impl<L, C, K> Session<L, C, K>
where
    C: CameraSource,
    L: LandmarkSource<C::Frame>,
    K: Clock,
{
    /// Acquire the landmark source, then the camera. The camera future is
    /// not polled when the landmark source fails. A failure is shown once on
    /// the renderer and returned as a terminal error.
    pub async fn start<LF, CF, R>(
        landmarks: LF,
        camera: CF,
        clock: K,
        engine: Engine,
        renderer: &mut R,
    ) -> HandwellResult<Self>
    where
        LF: Future<Output = HandwellResult<L>>,
        CF: Future<Output = HandwellResult<C>>,
        R: FeedbackRenderer + ?Sized,
    {
        // Stage 1: landmark source
        let landmarks = match landmarks.await {
            Ok(source) => source,
            Err(err) => {
                let err = match err {
                    HandwellError::LandmarkSourceUnavailable(_) => err,
                    other => HandwellError::LandmarkSourceUnavailable(other.to_string()),
                };
                return Err(fail(renderer, err));
            }
        };
        info!("landmark source ready");

        // Stage 2: camera
        let camera = match camera.await {
            Ok(camera) => camera,
            Err(err) => {
                let err = match err {
                    HandwellError::CameraUnavailable(_) => err,
                    other => HandwellError::CameraUnavailable(other.to_string()),
                };
                return Err(fail(renderer, err));
            }
        };
        info!("camera ready, session running");

        Ok(Self {
            landmarks,
            camera,
            clock,
            engine,
            stats: SessionStats::default(),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Run one frame to completion. Returns `None` once the camera feed ends.
    pub fn step<R>(
        &mut self,
        host: &mut Collaborators<'_>,
        renderer: &mut R,
    ) -> Option<FeedbackFrame>
    where
        R: FeedbackRenderer + ?Sized,
    {
        let frame = self.camera.next_frame()?;
        let at = self.clock.now();

        let raw = match self.landmarks.detect(&frame, at) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(at = %at, error = %err, "landmark detection failed, frame treated as empty");
                self.stats.detect_errors += 1;
                RawLandmarkFrame::empty()
            }
        };

        let feedback = self.engine.process_raw(&raw, at, host);
        renderer.render(&feedback);
        self.stats.frames += 1;
        Some(feedback)
    }

    /// Step until the camera feed ends, returning the number of frames run
    pub fn run<R>(&mut self, host: &mut Collaborators<'_>, renderer: &mut R) -> u64
    where
        R: FeedbackRenderer + ?Sized,
    {
        let mut frames = 0;
        while self.step(host, renderer).is_some() {
            frames += 1;
        }
        info!(frames, detect_errors = self.stats.detect_errors, "camera feed ended");
        frames
    }
}

fn fail<R: FeedbackRenderer + ?Sized>(renderer: &mut R, err: HandwellError) -> HandwellError {
    error!(error = %err, "session failed to start");
    renderer.show_error(&err);
    err
}
