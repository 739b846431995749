//! handwell Time - clock abstraction for the frame pipeline
//!
//! Dwell timing must be deterministic under test, so nothing in the pipeline
//! reads the wall clock directly. Instead a [`Clock`] is injected:
//! - [`MonotonicClock`]: real time, backed by `Instant`
//! - [`ManualClock`]: shared fake time advanced explicitly by tests and replays
//!
//! [`FrameCadence`] tracks the interval between frames delivered by the
//! landmark source.

pub mod cadence;
pub mod clock;

pub use cadence::*;
pub use clock::*;
