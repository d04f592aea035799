//! Shared test-only helpers for rampsync_core.

use crate::loopback;
use crate::models::interpolation::InterpolationKind;
use crate::models::point::{RampPoint, RampValue};
use crate::parameter::RampParameter;
use crate::store::{AssetId, RampHandle, RampStore};
use crate::view::RampView;
use std::sync::{Mutex, OnceLock};

/// Linear float points from `(position, value)` pairs.
pub(crate) fn float_points(pairs: &[(f32, f32)]) -> Vec<RampPoint<f32>> {
    pairs
        .iter()
        .map(|&(position, value)| RampPoint::new(position, value, InterpolationKind::Linear))
        .collect()
}

/// Parameter in auto-update mode whose engine already confirmed `points`.
pub(crate) fn live_parameter<V: RampValue>(
    name: &str,
    owner: AssetId,
    points: Vec<RampPoint<V>>,
) -> RampParameter<V> {
    let mut parameter = RampParameter::new(name, owner, true);
    parameter.apply_cooked_points(loopback::confirm(points));
    parameter
}

/// Parameter in manual-update mode whose cache mirrors `points`.
pub(crate) fn manual_parameter<V: RampValue>(
    name: &str,
    owner: AssetId,
    points: Vec<RampPoint<V>>,
) -> RampParameter<V> {
    let mut parameter = RampParameter::new(name, owner, false);
    parameter.apply_cooked_points(loopback::confirm(points));
    parameter
}

/// Store every parameter and return a view over all of them, in order.
pub(crate) fn view_over<V: RampValue>(
    parameters: Vec<RampParameter<V>>,
) -> (RampStore<V>, RampView<V>, Vec<RampHandle>) {
    let mut store = RampStore::new();
    let handles: Vec<RampHandle> = parameters
        .into_iter()
        .map(|parameter| store.insert(parameter))
        .collect();
    let view = RampView::new(handles.iter().copied());
    (store, view, handles)
}

pub(crate) fn positions<V>(points: &[RampPoint<V>]) -> Vec<f32> {
    points.iter().map(|point| point.position).collect()
}

/// Fields of `points` without instance numbering or bindings.
pub(crate) fn fields<V: RampValue>(points: &[RampPoint<V>]) -> Vec<(f32, V, InterpolationKind)> {
    points
        .iter()
        .map(|point| (point.position, point.value, point.interpolation))
        .collect()
}

/// Asserts that the parameter behind `handle` shows the same fields as `expected`.
///
/// # Panics
/// Panics when the handle is stale or the active points differ.
pub(crate) fn assert_active_fields<V: RampValue>(
    store: &RampStore<V>,
    handle: RampHandle,
    ctx: &crate::store::EditContext<'_>,
    expected: &[RampPoint<V>],
) {
    let parameter = store.get(handle).expect("live handle");
    assert_eq!(
        fields(parameter.active_points(ctx)),
        fields(expected),
        "active points of {} diverged",
        parameter.name()
    );
}

/// Serializes tests that touch the `RAMPSYNC_*` environment.
pub(crate) fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Overrides one environment variable until dropped.
///
/// Only use while holding [`env_lock`].
pub(crate) struct EnvGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, previous }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        Self { key, previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => std::env::set_var(self.key, value),
            None => std::env::remove_var(self.key),
        }
    }
}
