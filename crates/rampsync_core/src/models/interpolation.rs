//! Interpolation vocabularies and the translation between them.
//!
//! The engine knows seven interpolation kinds, the curve widget only four. Every
//! cubic engine kind shows up as [`UiInterpolation::Cubic`] in the widget, and a
//! cubic key coming back from the widget always becomes
//! [`InterpolationKind::CatmullRom`]. A Bezier point that is edited through the
//! widget therefore comes back as Catmull-Rom; callers that only move a point
//! should reuse the old kind when [`is_interpolation_equivalent`] says so.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Engine-side interpolation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolationKind {
    Constant,
    Linear,
    Bezier,
    BSpline,
    CatmullRom,
    Hermite,
    MonotoneCubic,
    Invalid,
}

/// Curve-widget interpolation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiInterpolation {
    Constant,
    Linear,
    Cubic,
    None,
}

impl InterpolationKind {
    /// Valid kinds in the order the engine presents them in its choice menu.
    pub const CHOICES: [InterpolationKind; 7] = [
        InterpolationKind::Constant,
        InterpolationKind::Linear,
        InterpolationKind::CatmullRom,
        InterpolationKind::MonotoneCubic,
        InterpolationKind::Bezier,
        InterpolationKind::BSpline,
        InterpolationKind::Hermite,
    ];

    /// Engine integer code, as stored in the interpolation choice parameter.
    pub fn code(self) -> i32 {
        match self {
            InterpolationKind::Constant => 0,
            InterpolationKind::Linear => 1,
            InterpolationKind::CatmullRom => 2,
            InterpolationKind::MonotoneCubic => 3,
            InterpolationKind::Bezier => 4,
            InterpolationKind::BSpline => 5,
            InterpolationKind::Hermite => 6,
            InterpolationKind::Invalid => -1,
        }
    }

    /// Decode an engine integer code; unknown codes map to `Invalid`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => InterpolationKind::Constant,
            1 => InterpolationKind::Linear,
            2 => InterpolationKind::CatmullRom,
            3 => InterpolationKind::MonotoneCubic,
            4 => InterpolationKind::Bezier,
            5 => InterpolationKind::BSpline,
            6 => InterpolationKind::Hermite,
            _ => InterpolationKind::Invalid,
        }
    }

    /// Human-readable label used by choice menus.
    pub fn label(self) -> &'static str {
        match self {
            InterpolationKind::Constant => "Constant",
            InterpolationKind::Linear => "Linear",
            InterpolationKind::CatmullRom => "Catmull-Rom",
            InterpolationKind::MonotoneCubic => "Monotone Cubic",
            InterpolationKind::Bezier => "Bezier",
            InterpolationKind::BSpline => "B-Spline",
            InterpolationKind::Hermite => "Hermite",
            InterpolationKind::Invalid => "Invalid",
        }
    }

    /// `true` for the five kinds the widget shows as cubic.
    pub fn is_cubic(self) -> bool {
        matches!(
            self,
            InterpolationKind::Bezier
                | InterpolationKind::BSpline
                | InterpolationKind::CatmullRom
                | InterpolationKind::Hermite
                | InterpolationKind::MonotoneCubic
        )
    }
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a label does not name an interpolation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInterpolation(pub String);

impl fmt::Display for UnknownInterpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown interpolation '{}'", self.0)
    }
}

impl std::error::Error for UnknownInterpolation {}

impl FromStr for InterpolationKind {
    type Err = UnknownInterpolation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::CHOICES
            .into_iter()
            .chain(std::iter::once(InterpolationKind::Invalid))
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownInterpolation(trimmed.to_string()))
    }
}

/// Returns `true` when a widget mode and an engine kind describe the same curve
/// segment shape.
///
/// `Cubic` matches every cubic engine kind; the relation is many-to-one.
pub fn is_interpolation_equivalent(ui: UiInterpolation, engine: InterpolationKind) -> bool {
    match ui {
        UiInterpolation::Linear => engine == InterpolationKind::Linear,
        UiInterpolation::Constant => engine == InterpolationKind::Constant,
        UiInterpolation::Cubic => engine.is_cubic(),
        UiInterpolation::None => engine == InterpolationKind::Invalid,
    }
}

/// Converts a widget mode to the engine kind used when committing it.
///
/// `Cubic` always becomes `CatmullRom`.
pub fn translate_ui_to_engine(ui: UiInterpolation) -> InterpolationKind {
    match ui {
        UiInterpolation::Linear => InterpolationKind::Linear,
        UiInterpolation::Constant => InterpolationKind::Constant,
        UiInterpolation::Cubic => InterpolationKind::CatmullRom,
        UiInterpolation::None => InterpolationKind::Invalid,
    }
}

/// Converts an engine kind to the mode a curve widget can display.
pub fn translate_engine_to_ui(engine: InterpolationKind) -> UiInterpolation {
    match engine {
        InterpolationKind::Linear => UiInterpolation::Linear,
        InterpolationKind::Constant => UiInterpolation::Constant,
        InterpolationKind::Invalid => UiInterpolation::None,
        _ => UiInterpolation::Cubic,
    }
}
