//! handwell Runtime - Engine context and frame loop
//!
//! One landmark result flows through these stages per frame:
//! 1. Adapt raw hands into per-role samples
//! 2. Classify features for each present hand
//! 3. Update the pointer role (cursor, hover, pinch drags, dwell click)
//! 4. Update the auxiliary role (slider, finger-count or rotation dial)
//! 5. Dispatch intents to the host effects and controls
//! 6. Emit one feedback frame
//!
//! Host collaborators are reached only through the traits in [`host`].

pub mod auxiliary;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod feedback;
pub mod host;
pub mod intent;
pub mod layout;
pub mod observability;
pub mod pointer;
pub mod session;

pub use config::*;
pub use dispatcher::*;
pub use engine::*;
pub use feedback::*;
pub use host::*;
pub use intent::*;
pub use layout::*;
pub use observability::*;
pub use session::*;
