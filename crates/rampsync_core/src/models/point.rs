//! Ramp points and the value domains a ramp can carry.

use crate::constants::{DEFAULT_FLOAT_INSERT_VALUE, NO_INSTANCE};
use crate::models::interpolation::InterpolationKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value domain tag of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RampValueKind {
    Float,
    Color,
}

/// Value stored at each ramp point.
pub trait RampValue:
    Copy + PartialEq + fmt::Debug + Serialize + DeserializeOwned + 'static
{
    /// Domain tag for this value type.
    const KIND: RampValueKind;
    /// Value given to points inserted without an explicit value.
    const DEFAULT_INSERT: Self;
}

impl RampValue for f32 {
    const KIND: RampValueKind = RampValueKind::Float;
    const DEFAULT_INSERT: Self = DEFAULT_FLOAT_INSERT_VALUE;
}

/// Linear-space RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LinearColor {
    pub const BLACK: LinearColor = LinearColor::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: LinearColor = LinearColor::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl RampValue for LinearColor {
    const KIND: RampValueKind = RampValueKind::Color;
    const DEFAULT_INSERT: Self = LinearColor::BLACK;
}

/// Child parameter backing one field of a live point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldParm {
    pub id: u32,
    /// Set when the field was edited locally and must be uploaded.
    #[serde(default)]
    pub changed: bool,
}

impl FieldParm {
    pub fn new(id: u32) -> Self {
        Self { id, changed: false }
    }

    pub fn mark_changed(&mut self) {
        self.changed = true;
    }
}

/// Per-field child parameters of a live point.
///
/// Points that were never wired to the engine (cached points, partially
/// configured parameters) leave these empty, and field edits skip them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBindings {
    pub position: Option<FieldParm>,
    pub value: Option<FieldParm>,
    pub interpolation: Option<FieldParm>,
}

impl PointBindings {
    /// Bindings for all three fields using consecutive ids starting at `first_id`.
    pub fn wired(first_id: u32) -> Self {
        Self {
            position: Some(FieldParm::new(first_id)),
            value: Some(FieldParm::new(first_id + 1)),
            interpolation: Some(FieldParm::new(first_id + 2)),
        }
    }

    /// Returns `true` if any bound field is waiting for upload.
    pub fn any_changed(&self) -> bool {
        [self.position, self.value, self.interpolation]
            .iter()
            .flatten()
            .any(|parm| parm.changed)
    }
}

/// One control point of a ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampPoint<V> {
    pub position: f32,
    pub value: V,
    pub interpolation: InterpolationKind,
    #[serde(default = "no_instance")]
    pub instance_index: i32,
    #[serde(default)]
    pub bindings: PointBindings,
}

fn no_instance() -> i32 {
    NO_INSTANCE
}

impl<V: RampValue> RampPoint<V> {
    /// Create a point that has no engine instance yet.
    pub fn new(position: f32, value: V, interpolation: InterpolationKind) -> Self {
        Self {
            position,
            value,
            interpolation,
            instance_index: NO_INSTANCE,
            bindings: PointBindings::default(),
        }
    }

    /// Create a point confirmed by the engine, with every field wired.
    pub fn live(
        instance_index: i32,
        position: f32,
        value: V,
        interpolation: InterpolationKind,
        bindings: PointBindings,
    ) -> Self {
        Self {
            position,
            value,
            interpolation,
            instance_index,
            bindings,
        }
    }

    /// Copy of the editable fields, detached from any engine instance.
    pub fn detached(&self) -> Self {
        Self::new(self.position, self.value, self.interpolation)
    }

    /// `true` when position, value and interpolation all match.
    pub fn same_fields(&self, other: &Self) -> bool {
        self.position == other.position
            && self.value == other.value
            && self.interpolation == other.interpolation
    }

    /// `true` when any requested field differs from the current one.
    pub fn differs_from(
        &self,
        position: Option<f32>,
        value: Option<V>,
        interpolation: Option<InterpolationKind>,
    ) -> bool {
        position.is_some_and(|p| p != self.position)
            || value.is_some_and(|v| v != self.value)
            || interpolation.is_some_and(|i| i != self.interpolation)
    }

    /// Write requested fields of a live point through its bindings.
    ///
    /// Fields without a binding are skipped. Returns `true` if any field changed.
    pub fn write_bound_fields(
        &mut self,
        position: Option<f32>,
        value: Option<V>,
        interpolation: Option<InterpolationKind>,
    ) -> bool {
        let mut wrote = false;
        if let Some(position) = position.filter(|p| *p != self.position) {
            if let Some(parm) = self.bindings.position.as_mut() {
                self.position = position;
                parm.mark_changed();
                wrote = true;
            }
        }
        if let Some(value) = value.filter(|v| *v != self.value) {
            if let Some(parm) = self.bindings.value.as_mut() {
                self.value = value;
                parm.mark_changed();
                wrote = true;
            }
        }
        if let Some(interpolation) = interpolation.filter(|i| *i != self.interpolation) {
            if let Some(parm) = self.bindings.interpolation.as_mut() {
                self.interpolation = interpolation;
                parm.mark_changed();
                wrote = true;
            }
        }
        wrote
    }

    /// Write requested fields of a cached point directly.
    ///
    /// Returns `true` if any field changed.
    pub fn write_fields(
        &mut self,
        position: Option<f32>,
        value: Option<V>,
        interpolation: Option<InterpolationKind>,
    ) -> bool {
        let changed = self.differs_from(position, value, interpolation);
        if let Some(position) = position {
            self.position = position;
        }
        if let Some(value) = value {
            self.value = value;
        }
        if let Some(interpolation) = interpolation {
            self.interpolation = interpolation;
        }
        changed
    }
}
