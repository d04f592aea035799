//! Keeping secondary parameters convergent with the main one.

use crate::models::point::{RampPoint, RampValue};
use crate::parameter::{RampParameter, ReplicationReport};
use crate::store::EditContext;

/// Reconcile `secondary` against the main parameter's active points.
///
/// The secondary's own mode decides how: live parameters get binding writes
/// and queued events, cached ones are mutated directly. A secondary whose
/// asset is cooking is left untouched.
pub fn replicate_main_into<V: RampValue>(
    main_points: &[RampPoint<V>],
    secondary: &mut RampParameter<V>,
    ctx: &EditContext<'_>,
) -> ReplicationReport {
    if ctx.is_mid_cook(secondary.owner()) {
        tracing::warn!(
            parameter = secondary.name(),
            asset = secondary.owner().0,
            "Skipping replication into a cooking ramp parameter"
        );
        return ReplicationReport::default();
    }

    let report = if secondary.uses_live_points(ctx) {
        secondary.reconcile_live_with(main_points)
    } else {
        secondary.reconcile_cached_with(main_points, ctx.cooking_enabled())
    };
    if !report.is_noop() {
        tracing::trace!(
            parameter = secondary.name(),
            fields = report.fields_updated,
            inserts = report.inserts_queued,
            deletes = report.deletes_queued,
            appended = report.points_appended,
            truncated = report.points_truncated,
            "Replicated main ramp into secondary"
        );
    }
    report
}
