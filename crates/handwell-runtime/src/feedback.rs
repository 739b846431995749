//! Per-frame feedback for the host renderer

use std::time::Duration;

use handwell_core::{FrameTime, Handedness, NormalizedPoint, ScreenPoint};

use crate::host::{ControlId, TargetId};

/// Cursor overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFeedback {
    pub position: NormalizedPoint,
    pub screen: ScreenPoint,
    pub pinching: bool,
}

/// Dwell progress ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellProgress {
    /// [0, 1)
    pub fraction: f32,
    pub remaining: Duration,
    pub at: ScreenPoint,
}

/// One-shot activation ripple
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationEvent {
    pub target: TargetId,
    pub at: ScreenPoint,
}

/// Value indicator next to a hand
#[derive(Debug, Clone, PartialEq)]
pub struct ControlFeedback {
    pub control: ControlId,
    pub value: f64,
    pub at: ScreenPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    PointerTip,
    AuxiliaryIndexTip,
    AuxiliaryThumbTip,
}

/// Landmark dot for overlay drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub at: ScreenPoint,
}

/// Line between two landmarks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: ScreenPoint,
    pub to: ScreenPoint,
}

/// Status widget line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Any hand present
    pub active: bool,
    pub text: String,
}

impl StatusLine {
    pub fn idle() -> Self {
        Self {
            active: false,
            text: "Raise hand".to_string(),
        }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::idle()
    }
}

/// What the pointer role did this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerReport {
    pub present: bool,
    pub pinching: bool,
    /// Scroll drag travelled past the move threshold
    pub scrolling: bool,
    pub scaling: Option<f64>,
    pub dwell_remaining: Option<Duration>,
}

/// What the auxiliary role did this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AuxiliaryReport {
    pub present: bool,
    pub slider: bool,
    pub fist: bool,
    pub rotation: Option<(char, Duration)>,
    pub fingers_pending: Option<(u8, Duration)>,
}

/// Build the status line by mode priority
pub fn compose_status(
    pointer_hand: Handedness,
    pointer: &PointerReport,
    aux: &AuxiliaryReport,
) -> StatusLine {
    if !pointer.present && !aux.present {
        return StatusLine::idle();
    }
    let aux_hand = pointer_hand.opposite();

    let text = if let Some(size) = pointer.scaling {
        format!("Scaling text | {size}px")
    } else if aux.slider {
        format!("{aux_hand} Hand | SLIDERS")
    } else if aux.fist {
        format!("{aux_hand} Fist | DISTORTION")
    } else if let Some((option, remaining)) = aux.rotation {
        format!("{option} | {:.1}s", remaining.as_secs_f64())
    } else if let Some((fingers, remaining)) = aux.fingers_pending {
        format!(
            "{aux_hand} Hand | {fingers} fingers ({:.1}s)",
            remaining.as_secs_f64()
        )
    } else if pointer.pinching && pointer.scrolling {
        format!("{pointer_hand} Hand | SCROLLING")
    } else if pointer.pinching {
        format!("{pointer_hand} Hand | PINCH & DRAG")
    } else if let Some(remaining) = pointer.dwell_remaining {
        format!("Clicking in {:.1}s", remaining.as_secs_f64())
    } else {
        "Hand detected".to_string()
    };

    StatusLine { active: true, text }
}

/// Everything the renderer draws for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackFrame {
    pub timestamp: FrameTime,
    /// Present while the pointer hand is tracked
    pub cursor: Option<CursorFeedback>,
    pub dwell: Option<DwellProgress>,
    pub activation: Option<ActivationEvent>,
    pub control: Option<ControlFeedback>,
    pub markers: Vec<Marker>,
    pub segments: Vec<Segment>,
    pub status: StatusLine,
}

impl FeedbackFrame {
    pub fn new(timestamp: FrameTime) -> Self {
        Self {
            timestamp,
            cursor: None,
            dwell: None,
            activation: None,
            control: None,
            markers: Vec::new(),
            segments: Vec::new(),
            status: StatusLine::idle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present_pointer() -> PointerReport {
        PointerReport {
            present: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_hands() {
        let status = compose_status(
            Handedness::Right,
            &PointerReport::default(),
            &AuxiliaryReport::default(),
        );

        assert_eq!(status, StatusLine::idle());
        assert!(!status.active);
    }

    #[test]
    fn test_priority_order() {
        let aux = AuxiliaryReport {
            present: true,
            slider: true,
            ..Default::default()
        };
        let pointer = PointerReport {
            pinching: true,
            scaling: Some(120.0),
            ..present_pointer()
        };

        let status = compose_status(Handedness::Right, &pointer, &aux);
        assert_eq!(status.text, "Scaling text | 120px");

        let pointer = PointerReport {
            pinching: true,
            ..present_pointer()
        };
        let status = compose_status(Handedness::Right, &pointer, &aux);
        assert_eq!(status.text, "Left Hand | SLIDERS");

        let status = compose_status(Handedness::Right, &pointer, &AuxiliaryReport::default());
        assert_eq!(status.text, "Right Hand | PINCH & DRAG");

        let pointer = PointerReport {
            scrolling: true,
            ..pointer
        };
        let status = compose_status(Handedness::Left, &pointer, &AuxiliaryReport::default());
        assert_eq!(status.text, "Left Hand | SCROLLING");
    }

    #[test]
    fn test_countdowns() {
        let pointer = PointerReport {
            dwell_remaining: Some(Duration::from_millis(1200)),
            ..present_pointer()
        };
        assert_eq!(
            compose_status(Handedness::Right, &pointer, &AuxiliaryReport::default()).text,
            "Clicking in 1.2s"
        );

        let aux = AuxiliaryReport {
            present: true,
            rotation: Some(('q', Duration::from_millis(700))),
            ..Default::default()
        };
        assert_eq!(
            compose_status(Handedness::Right, &PointerReport::default(), &aux).text,
            "q | 0.7s"
        );

        let aux = AuxiliaryReport {
            present: true,
            fingers_pending: Some((3, Duration::from_millis(400))),
            ..Default::default()
        };
        assert_eq!(
            compose_status(Handedness::Left, &PointerReport::default(), &aux).text,
            "Right Hand | 3 fingers (0.4s)"
        );
    }

    #[test]
    fn test_idle_with_hand() {
        let status = compose_status(
            Handedness::Right,
            &present_pointer(),
            &AuxiliaryReport::default(),
        );

        assert!(status.active);
        assert_eq!(status.text, "Hand detected");
    }
}
