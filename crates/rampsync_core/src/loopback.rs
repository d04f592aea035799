//! In-process stand-in for the remote cook.
//!
//! Applies a parameter's queued events the way the engine's multiparm does:
//! deleted instances disappear, inserted points are appended, and the
//! surviving instances are renumbered from 1 with fresh field bindings.

use crate::models::event::ModificationEvent;
use crate::models::point::{PointBindings, RampPoint, RampValue};
use crate::parameter::RampParameter;
use crate::store::{EditContext, RampStore};
use serde::Serialize;

/// Engine slots per point: position, value, interpolation.
const FIELDS_PER_POINT: u32 = 3;

/// What one loopback cook applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CookSummary {
    pub inserts: usize,
    pub deletes: usize,
    /// Delete events naming an instance that no longer exists.
    pub missed_deletes: usize,
}

/// Number and wire `points` as the engine would after a cook.
pub fn confirm<V: RampValue>(points: impl IntoIterator<Item = RampPoint<V>>) -> Vec<RampPoint<V>> {
    points
        .into_iter()
        .enumerate()
        .map(|(slot, point)| {
            let instance = slot as u32 + 1;
            RampPoint::live(
                instance as i32,
                point.position,
                point.value,
                point.interpolation,
                PointBindings::wired(instance * FIELDS_PER_POINT),
            )
        })
        .collect()
}

/// Cook one parameter if the engine would cook it now.
///
/// # Returns
/// `None` when cooking is disabled or the owning asset is already cooking.
pub fn cook<V: RampValue>(
    parameter: &mut RampParameter<V>,
    ctx: &EditContext<'_>,
) -> Option<CookSummary> {
    if !ctx.cooking_enabled() || ctx.is_mid_cook(parameter.owner()) {
        return None;
    }
    parameter.on_pre_cook(ctx);

    let mut summary = CookSummary::default();
    let mut points = parameter.points().to_vec();
    for event in parameter.take_modification_events() {
        match event {
            ModificationEvent::Insert {
                position,
                value,
                interpolation,
            } => {
                points.push(RampPoint::new(position, value, interpolation));
                summary.inserts += 1;
            }
            ModificationEvent::Delete { instance_index } => {
                let before = points.len();
                points.retain(|point| point.instance_index != instance_index);
                if points.len() == before {
                    summary.missed_deletes += 1;
                } else {
                    summary.deletes += 1;
                }
            }
        }
    }

    parameter.apply_cooked_points(confirm(points));
    parameter.clear_changed();
    tracing::debug!(
        parameter = parameter.name(),
        inserts = summary.inserts,
        deletes = summary.deletes,
        missed_deletes = summary.missed_deletes,
        "Loopback cook applied events"
    );
    Some(summary)
}

/// Cook every live parameter of `store` that is waiting for a cook.
///
/// # Returns
/// Number of parameters cooked.
pub fn cook_pending<V: RampValue>(store: &mut RampStore<V>, ctx: &EditContext<'_>) -> usize {
    let mut cooked = 0;
    for handle in store.handles() {
        let Some(parameter) = store.get_mut(handle) else {
            continue;
        };
        let waiting = parameter.needs_cook()
            || !parameter.modification_events().is_empty()
            || (parameter.is_caching() && parameter.uses_live_points(ctx));
        if waiting && cook(parameter, ctx).is_some() {
            cooked += 1;
        }
    }
    cooked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interpolation::InterpolationKind;
    use crate::store::AssetId;

    fn seeded() -> RampParameter<f32> {
        let mut parameter = RampParameter::new("ramp", AssetId(1), true);
        parameter.apply_cooked_points(confirm([
            RampPoint::new(0.0, 0.0, InterpolationKind::Linear),
            RampPoint::new(0.5, 0.5, InterpolationKind::Linear),
            RampPoint::new(1.0, 1.0, InterpolationKind::Linear),
        ]));
        parameter
    }

    #[test]
    fn cook_applies_deletes_then_appends_and_renumbers() {
        let mut parameter = seeded();
        parameter.create_delete_event(2);
        parameter.create_insert_event(0.75, 0.25, InterpolationKind::Constant);

        let summary = cook(&mut parameter, &EditContext::new(true)).expect("cooked");

        assert_eq!(
            summary,
            CookSummary {
                inserts: 1,
                deletes: 1,
                missed_deletes: 0
            }
        );
        let positions: Vec<f32> = parameter.points().iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0.0, 1.0, 0.75]);
        let instances: Vec<i32> = parameter
            .points()
            .iter()
            .map(|p| p.instance_index)
            .collect();
        assert_eq!(instances, vec![1, 2, 3]);
        assert!(parameter.modification_events().is_empty());
        assert!(!parameter.needs_cook());
        assert_eq!(parameter.cached_points().len(), 3);
    }

    #[test]
    fn cook_is_refused_while_disabled_or_mid_cook() {
        let mut parameter = seeded();
        parameter.create_delete_event(1);
        assert!(cook(&mut parameter, &EditContext::new(false)).is_none());

        let busy: std::collections::HashSet<AssetId> = [AssetId(1)].into_iter().collect();
        let ctx = EditContext::with_monitor(true, &busy);
        assert!(cook(&mut parameter, &ctx).is_none());
        assert_eq!(parameter.modification_events().len(), 1);
    }

    #[test]
    fn delete_of_unknown_instance_is_counted_as_missed() {
        let mut parameter = seeded();
        parameter.create_delete_event(99);
        let summary = cook(&mut parameter, &EditContext::new(true)).expect("cooked");
        assert_eq!(summary.missed_deletes, 1);
        assert_eq!(parameter.points().len(), 3);
    }
}
