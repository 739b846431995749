//! handwell Dwell - Timed activation state machines
//!
//! A single [`DwellActivator`] turns a sustained value into one activation:
//! - pointer dwell over a clickable target
//! - rotation-dial character selection ([`RotationSelector`])
//! - finger-count font selection ([`StabilitySelector`])
//!
//! Each use differs only in its [`DwellConfig`] and in how the tracked key is
//! derived from the frame.

pub mod activator;
pub mod rotation;
pub mod stability;

pub use activator::*;
pub use rotation::*;
pub use stability::*;
