//! UI intents emitted by the hand roles

use handwell_core::ScreenPoint;

use crate::host::{ControlId, Target, TargetId};

/// One effect requested by a frame
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Dwell fired on a target
    Activate { target: Target, at: ScreenPoint },
    /// Continuous value for a bound control
    SetControl { control: ControlId, value: f64 },
    /// Hover-only target under the cursor this frame, if any
    Hover { target: Option<TargetId> },
    /// Page scroll in pixels
    Scroll { dy: f32 },
    PreviewOption(Option<char>),
    CommitOption(char),
    /// Font variant chosen by finger count
    SelectVariant { fingers: u8, variant: String },
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Activate { .. } => IntentKind::Activate,
            Intent::SetControl { .. } => IntentKind::SetControl,
            Intent::Hover { .. } => IntentKind::Hover,
            Intent::Scroll { .. } => IntentKind::Scroll,
            Intent::PreviewOption(_) => IntentKind::PreviewOption,
            Intent::CommitOption(_) => IntentKind::CommitOption,
            Intent::SelectVariant { .. } => IntentKind::SelectVariant,
        }
    }
}

/// Intent discriminant, for logging and counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Activate,
    SetControl,
    Hover,
    Scroll,
    PreviewOption,
    CommitOption,
    SelectVariant,
}
