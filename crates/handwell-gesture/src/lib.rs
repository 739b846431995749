//! handwell Gesture - from landmark frames to gesture features
//!
//! One frame flows through this crate leaf-first:
//!
//! ```text
//! RawLandmarkFrame → LandmarkAdapter → HandSample → GestureClassifier
//!                                                      → HandFeatures
//!                                                      → HandTracker (CursorFilter)
//! ```
//!
//! The classifier is pure. The only cross-frame state lives in
//! [`HandTracker`], which owns the cursor filter and the per-role
//! [`GestureState`]. [`LinearMapping`] and [`RotationIndexMapper`] turn bounded
//! features into control values and discrete option indices.

pub mod adapter;
pub mod classifier;
pub mod filter;
pub mod mapper;
pub mod state;

pub use adapter::*;
pub use classifier::*;
pub use filter::*;
pub use mapper::*;
pub use state::*;
