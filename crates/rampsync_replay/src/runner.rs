//! Drives the core API through a scenario, one step at a time.

use crate::scenario::{AnyScenario, Scenario, Step};
use anyhow::Context;
use rampsync_core::loopback;
use rampsync_core::{
    AssetId, Config, CurveEditorAdapter, EditContext, PointTarget, RampHandle, RampParameter,
    RampStore, RampValue, RampView,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

/// Result of one replayed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub op: &'static str,
    pub result: Value,
}

/// Final state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport<V> {
    pub cooking_enabled: bool,
    pub curve_commits: usize,
    pub steps: Vec<StepOutcome>,
    /// One entry per scenario parameter; `None` once removed.
    pub parameters: Vec<Option<RampParameter<V>>>,
}

/// Replay `scenario` and render the report as JSON.
pub fn replay_to_json(
    scenario: &AnyScenario,
    config: &Config,
    pretty: bool,
) -> anyhow::Result<String> {
    let report = match scenario {
        AnyScenario::Float(scenario) => serde_json::to_value(replay(scenario, config)?),
        AnyScenario::Color(scenario) => serde_json::to_value(replay(scenario, config)?),
    }
    .context("failed to encode replay report")?;
    let text = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to render replay report")?;
    Ok(text)
}

struct Session<V> {
    store: RampStore<V>,
    handles: Vec<RampHandle>,
    view: RampView<V>,
    adapter: CurveEditorAdapter<V>,
    commits: Rc<Cell<usize>>,
    cooking_enabled: bool,
    cooking: HashSet<AssetId>,
}

/// Replay every step of `scenario` against a fresh store.
///
/// # Errors
/// Fails on malformed steps (unknown delete targets, bad member indices).
/// Refused ramp operations are not errors; they show up as `false` results.
pub fn replay<V: RampValue>(
    scenario: &Scenario<V>,
    config: &Config,
) -> anyhow::Result<ReplayReport<V>> {
    let mut session = Session::new(scenario, config);
    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let result = session
            .apply(step)
            .with_context(|| format!("step {} ({}) failed", index, step.name()))?;
        tracing::debug!(step = index, op = step.name(), %result, "Replayed step");
        steps.push(StepOutcome {
            step: index,
            op: step.name(),
            result,
        });
    }
    Ok(session.finish(steps))
}

impl<V: RampValue> Session<V> {
    fn new(scenario: &Scenario<V>, config: &Config) -> Self {
        let mut store = RampStore::new();
        let handles: Vec<RampHandle> = scenario
            .parameters
            .iter()
            .map(|spec| {
                let auto_update = spec.auto_update.unwrap_or(config.auto_update);
                let mut parameter =
                    RampParameter::new(spec.name.as_str(), AssetId(spec.asset), auto_update);
                parameter.apply_cooked_points(loopback::confirm(
                    spec.points.iter().map(|point| point.to_point()),
                ));
                parameter.set_default_points(
                    spec.defaults.iter().map(|point| point.to_point()).collect(),
                );
                store.insert(parameter)
            })
            .collect();

        let view = RampView::new(handles.iter().copied());
        let commits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&commits);
        let adapter = CurveEditorAdapter::new(view.clone())
            .with_on_committed(move || counter.set(counter.get() + 1));

        Self {
            store,
            handles,
            view,
            adapter,
            commits,
            cooking_enabled: scenario.cooking_enabled.unwrap_or(config.cooking_enabled),
            cooking: HashSet::new(),
        }
    }

    fn apply(&mut self, step: &Step<V>) -> anyhow::Result<Value> {
        match step {
            Step::SetCooking { enabled } => {
                self.cooking_enabled = *enabled;
                Ok(json!(true))
            }
            Step::BeginCook { asset } => Ok(json!(self.cooking.insert(AssetId(*asset)))),
            Step::EndCook { asset } => Ok(json!(self.cooking.remove(&AssetId(*asset)))),
            Step::RemoveParameter { member } => {
                let handle = self
                    .handles
                    .get(*member)
                    .copied()
                    .with_context(|| format!("no parameter member {}", member))?;
                Ok(json!(self.store.remove(handle).is_some()))
            }
            edit => self.apply_edit(edit),
        }
    }

    fn apply_edit(&mut self, step: &Step<V>) -> anyhow::Result<Value> {
        let ctx = EditContext::with_monitor(self.cooking_enabled, &self.cooking);
        let store = &mut self.store;
        let view = &self.view;
        let result = match step {
            Step::Insert {
                index,
                position,
                value,
                interpolation,
            } => json!(view.insert_point(store, &ctx, *index, *position, *value, *interpolation)),
            Step::InsertDefault { index } => json!(view.insert_point_default(store, &ctx, *index)),
            Step::Delete { targets } => {
                let targets = targets
                    .iter()
                    .map(|raw| {
                        PointTarget::from_raw(*raw)
                            .with_context(|| format!("invalid delete target {}", raw))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                json!(view.delete_points(store, &ctx, &targets))
            }
            Step::Set {
                indices,
                positions,
                values,
                interpolations,
            } => {
                let positions = fill_missing(positions, indices.len());
                let values = fill_missing(values, indices.len());
                let interpolations = fill_missing(interpolations, indices.len());
                json!(view.set_points(store, &ctx, indices, &positions, &values, &interpolations))
            }
            Step::Replicate => serde_json::to_value(view.replicate_all(store, &ctx))?,
            Step::Cook => json!(loopback::cook_pending(store, &ctx)),
            Step::SetAutoUpdate { enabled } => json!(view.set_auto_update(store, &ctx, *enabled)),
            Step::CurveChanged { keys } => {
                json!(self.adapter.on_external_curve_changed(store, &ctx, keys))
            }
            Step::RestoreDefaults => json!(view.restore_defaults(store, &ctx)),
            other => anyhow::bail!("{} does not edit the ramp", other.name()),
        };
        Ok(result)
    }

    fn finish(self, steps: Vec<StepOutcome>) -> ReplayReport<V> {
        let parameters = self
            .handles
            .iter()
            .map(|handle| self.store.get(*handle).cloned())
            .collect();
        ReplayReport {
            cooking_enabled: self.cooking_enabled,
            curve_commits: self.commits.get(),
            steps,
            parameters,
        }
    }
}

/// An omitted batch column means "leave this field alone" for every entry.
fn fill_missing<T: Copy>(column: &[Option<T>], len: usize) -> Vec<Option<T>> {
    if column.is_empty() {
        vec![None; len]
    } else {
        column.to_vec()
    }
}
