//! handwell Test Harness - simulated hands and end-to-end scenarios
//!
//! This crate provides:
//! - Synthetic hand poses rendered to raw landmark frames
//! - Scripted scenes of targets and controls
//! - A frame driver on a fake clock with seeded landmark jitter
//! - Scripted camera and landmark sources for full session runs
//! - End-to-end scenarios for each interaction profile

pub mod driver;
pub mod pose;
pub mod scenarios;
pub mod scene;
pub mod script;

pub use driver::*;
pub use pose::*;
pub use scenarios::*;
pub use scene::*;
pub use script::*;
