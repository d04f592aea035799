//! Scenario files: the parameters of one selection and the edits to replay.

use anyhow::Context;
use rampsync_core::{CurveKey, InterpolationKind, LinearColor, RampPoint, RampValue};
use serde::Deserialize;
use std::path::Path;

/// A scenario for either value domain, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyScenario {
    Float(Scenario<f32>),
    Color(Scenario<LinearColor>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "V: RampValue")]
pub struct Scenario<V> {
    /// Overrides the configured cooking switch at the start of the replay.
    #[serde(default)]
    pub cooking_enabled: Option<bool>,
    pub parameters: Vec<ParameterSpec<V>>,
    #[serde(default)]
    pub steps: Vec<Step<V>>,
}

/// One member of the selection, in view order.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "V: RampValue")]
pub struct ParameterSpec<V> {
    pub name: String,
    #[serde(default = "default_asset")]
    pub asset: u32,
    /// Falls back to the configured auto-update default.
    #[serde(default)]
    pub auto_update: Option<bool>,
    /// Points the engine has already confirmed.
    #[serde(default)]
    pub points: Vec<PointSpec<V>>,
    #[serde(default)]
    pub defaults: Vec<PointSpec<V>>,
}

fn default_asset() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(bound = "V: RampValue")]
pub struct PointSpec<V> {
    pub position: f32,
    pub value: V,
    #[serde(default = "default_interpolation")]
    pub interpolation: InterpolationKind,
}

fn default_interpolation() -> InterpolationKind {
    InterpolationKind::Linear
}

impl<V: RampValue> PointSpec<V> {
    pub fn to_point(self) -> RampPoint<V> {
        RampPoint::new(self.position, self.value, self.interpolation)
    }
}

/// One replayed edit or engine event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", bound = "V: RampValue")]
pub enum Step<V> {
    Insert {
        index: usize,
        position: f32,
        value: V,
        #[serde(default = "default_interpolation")]
        interpolation: InterpolationKind,
    },
    InsertDefault {
        index: usize,
    },
    /// Raw UI indices; `-1` is the last point.
    Delete {
        targets: Vec<i32>,
    },
    Set {
        indices: Vec<usize>,
        #[serde(default)]
        positions: Vec<Option<f32>>,
        #[serde(default)]
        values: Vec<Option<V>>,
        #[serde(default)]
        interpolations: Vec<Option<InterpolationKind>>,
    },
    Replicate,
    /// Run the loopback cook over every parameter waiting for one.
    Cook,
    SetCooking {
        enabled: bool,
    },
    SetAutoUpdate {
        enabled: bool,
    },
    CurveChanged {
        keys: Vec<CurveKey<V>>,
    },
    RestoreDefaults,
    /// Drop a member from the store, leaving its handle stale.
    RemoveParameter {
        member: usize,
    },
    BeginCook {
        asset: u32,
    },
    EndCook {
        asset: u32,
    },
}

impl<V> Step<V> {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Insert { .. } => "insert",
            Step::InsertDefault { .. } => "insert_default",
            Step::Delete { .. } => "delete",
            Step::Set { .. } => "set",
            Step::Replicate => "replicate",
            Step::Cook => "cook",
            Step::SetCooking { .. } => "set_cooking",
            Step::SetAutoUpdate { .. } => "set_auto_update",
            Step::CurveChanged { .. } => "curve_changed",
            Step::RestoreDefaults => "restore_defaults",
            Step::RemoveParameter { .. } => "remove_parameter",
            Step::BeginCook { .. } => "begin_cook",
            Step::EndCook { .. } => "end_cook",
        }
    }
}

/// Parse a scenario from JSON text.
pub fn parse_scenario(text: &str) -> anyhow::Result<AnyScenario> {
    serde_json::from_str(text).context("invalid scenario JSON")
}

/// Read and parse a scenario file.
pub fn load_scenario(path: &Path) -> anyhow::Result<AnyScenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    parse_scenario(&text)
}
