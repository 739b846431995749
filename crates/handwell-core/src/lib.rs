//! handwell Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every stage of the gesture pipeline:
//! - Hand landmarks and handedness (`HandSample`, `HandLandmark`)
//! - Normalized and screen-space geometry
//! - Frame time primitives
//! - The workspace error type

pub mod error;
pub mod geometry;
pub mod landmark;
pub mod time;

pub use error::*;
pub use geometry::*;
pub use landmark::*;
pub use time::*;
