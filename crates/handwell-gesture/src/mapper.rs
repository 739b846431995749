//! Continuous mapper - bounded scalar features into control ranges
//!
//! The primitive is [`map_range`]. Slider, vertical and rotation-dial mappings
//! are compositions over it with fixed domains and a quantization step.

use std::f64::consts::PI;

use handwell_core::{HandwellError, HandwellResult};

/// Distance from 1.0 within which a wrapped turn snaps back to 0
const WRAP_EPSILON: f64 = 1e-9;

/// Linear map from `[domain_min, domain_max]` to `[range_min, range_max]`
///
/// Exact at both endpoints. Reversed ranges invert the mapping. With `clamp`,
/// inputs outside the domain land on the nearest range endpoint and
/// non-finite inputs land on `range_min`. A degenerate domain maps everything
/// to `range_min`.
pub fn map_range(
    value: f64,
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
    clamp: bool,
) -> f64 {
    let span = domain_max - domain_min;
    if span == 0.0 || !span.is_finite() {
        return range_min;
    }
    let mut t = (value - domain_min) / span;
    if clamp {
        if !t.is_finite() {
            return range_min;
        }
        t = t.clamp(0.0, 1.0);
    }
    // lerp form keeps t == 0 and t == 1 exact
    range_min * (1.0 - t) + range_max * t
}

/// Quantization applied after mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantize {
    #[default]
    None,
    Round,
    Floor,
}

impl Quantize {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Quantize::None => value,
            Quantize::Round => value.round(),
            Quantize::Floor => value.floor(),
        }
    }
}

/// A validated linear mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMapping {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
    clamp: bool,
    quantize: Quantize,
}

impl LinearMapping {
    /// Pinch distance domain used for slider control
    pub const PINCH_DOMAIN: (f64, f64) = (0.03, 0.20);

    /// Clamped, unquantized mapping. `domain.0 < domain.1` is required.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> HandwellResult<Self> {
        let (domain_min, domain_max) = domain;
        if !(domain_min.is_finite() && domain_max.is_finite()) || domain_min >= domain_max {
            return Err(HandwellError::InvalidDomain {
                min: domain_min,
                max: domain_max,
            });
        }
        Ok(Self {
            domain_min,
            domain_max,
            range_min: range.0,
            range_max: range.1,
            clamp: true,
            quantize: Quantize::None,
        })
    }

    /// Pinch distance [0.03, 0.20] → `[min, max]`, rounded
    pub fn slider(min: f64, max: f64) -> Self {
        Self {
            domain_min: Self::PINCH_DOMAIN.0,
            domain_max: Self::PINCH_DOMAIN.1,
            range_min: min,
            range_max: max,
            clamp: true,
            quantize: Quantize::Round,
        }
    }

    /// Normalized y [0, 1], inverted (top of frame = `max`), floored
    pub fn vertical(min: f64, max: f64) -> Self {
        Self {
            domain_min: 0.0,
            domain_max: 1.0,
            range_min: max,
            range_max: min,
            clamp: true,
            quantize: Quantize::Floor,
        }
    }

    pub fn with_quantize(mut self, quantize: Quantize) -> Self {
        self.quantize = quantize;
        self
    }

    pub fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }

    /// Same domain and quantization, new target range
    pub fn retarget(mut self, range_min: f64, range_max: f64) -> Self {
        self.range_min = range_min;
        self.range_max = range_max;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    pub fn map(&self, value: f64) -> f64 {
        let mapped = map_range(
            value,
            self.domain_min,
            self.domain_max,
            self.range_min,
            self.range_max,
            self.clamp,
        );
        self.quantize.apply(mapped)
    }
}

/// Maps a steering angle onto one of `count` discrete options
///
/// `turn = (-angle + π) / 2π + origin / count`, wrapped into [0, 1), then
/// floor-scaled to an index. The angle is negated so turning the hand
/// clockwise (on a mirrored preview) advances through the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationIndexMapper {
    count: usize,
    origin: usize,
}

impl RotationIndexMapper {
    pub fn new(count: usize, origin: usize) -> HandwellResult<Self> {
        if count == 0 {
            return Err(HandwellError::EmptyOptionSet);
        }
        if origin >= count {
            return Err(HandwellError::OriginOutOfRange { origin, count });
        }
        Ok(Self { count, origin })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Unwrapped turn fraction for an angle
    pub fn raw_turn(&self, angle: f64) -> f64 {
        (-angle + PI) / (2.0 * PI) + self.origin as f64 / self.count as f64
    }

    /// Turn fraction wrapped into [0, 1). Values within `1e-9` of a full turn
    /// snap to 0 so the wrap boundary always lands on index 0.
    pub fn turn(&self, angle: f64) -> f64 {
        wrap_turn(self.raw_turn(angle))
    }

    /// Option index for an angle, always in `[0, count - 1]`
    pub fn index(&self, angle: f64) -> usize {
        self.index_for_turn(self.turn(angle))
    }

    /// Option index for an already wrapped turn fraction
    pub fn index_for_turn(&self, turn: f64) -> usize {
        let scaled = (wrap_turn(turn) * self.count as f64).floor();
        if scaled <= 0.0 || !scaled.is_finite() {
            return 0;
        }
        (scaled as usize).min(self.count - 1)
    }

    /// Angle at which the wrap boundary (turn 0 / 1) sits, in (-π, π]
    pub fn boundary_angle(&self) -> f64 {
        let angle = -PI + 2.0 * PI * self.origin as f64 / self.count as f64;
        if angle <= -PI {
            angle + 2.0 * PI
        } else {
            angle
        }
    }
}

fn wrap_turn(turn: f64) -> f64 {
    let wrapped = turn.rem_euclid(1.0);
    if 1.0 - wrapped < WRAP_EPSILON {
        0.0
    } else {
        wrapped
    }
}

/// Ordered set of selectable characters with a designated origin option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionAlphabet {
    options: Vec<char>,
    origin: usize,
}

impl OptionAlphabet {
    /// Characters of the editor dial, in dial order
    pub const EDITOR_CHARS: &'static str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!?.,;:'\"\\-_()[]{}/@#$%*+=& ";

    pub fn new(options: impl Into<Vec<char>>, origin: usize) -> HandwellResult<Self> {
        let options = options.into();
        RotationIndexMapper::new(options.len(), origin)?;
        Ok(Self { options, origin })
    }

    /// Parse from a string, origin given as a character in it
    pub fn from_str_with_origin(chars: &str, origin: char) -> HandwellResult<Self> {
        let options: Vec<char> = chars.chars().collect();
        let origin = options
            .iter()
            .position(|c| *c == origin)
            .ok_or_else(|| HandwellError::InvalidConfig(format!("origin {origin:?} not in alphabet")))?;
        Self::new(options, origin)
    }

    /// Editor dial: 89 characters with lowercase `a` as origin
    pub fn editor() -> Self {
        let options: Vec<char> = Self::EDITOR_CHARS.chars().collect();
        Self { options, origin: 26 }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.options.get(index).copied()
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Rotation mapper over this alphabet
    pub fn mapper(&self) -> RotationIndexMapper {
        RotationIndexMapper {
            count: self.options.len(),
            origin: self.origin,
        }
    }
}

impl Default for OptionAlphabet {
    fn default() -> Self {
        Self::editor()
    }
}
