//! Error types for handwell

use thiserror::Error;

/// Core handwell errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandwellError {
    // Initialization errors (terminal for the session)
    #[error("Landmark source unavailable: {0}")]
    LandmarkSourceUnavailable(String),

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    // Input errors
    #[error("Malformed hand: expected {expected} landmarks, got {actual}")]
    MalformedHand { expected: usize, actual: usize },

    #[error("Unknown handedness label: {0}")]
    UnknownHandedness(String),

    #[error("Landmark detection failed: {0}")]
    DetectionFailed(String),

    // Mapping errors
    #[error("Invalid domain: [{min}, {max}]")]
    InvalidDomain { min: f64, max: f64 },

    #[error("Option set is empty")]
    EmptyOptionSet,

    #[error("Origin index {origin} out of range for {count} options")]
    OriginOutOfRange { origin: usize, count: usize },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Control not found: {0}")]
    ControlNotFound(String),

    // Host errors
    #[error("Invalid recording at line {line}: {reason}")]
    InvalidRecording { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Tracing init failed: {0}")]
    TracingInit(String),
}

/// Result type for handwell operations
pub type HandwellResult<T> = Result<T, HandwellError>;

impl HandwellError {
    /// Whether the error ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            HandwellError::LandmarkSourceUnavailable(_) | HandwellError::CameraUnavailable(_)
        )
    }
}
