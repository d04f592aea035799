//! Bringing one parameter's active points in line with a source point list.

use super::RampParameter;
use crate::models::event::PendingEventCounts;
use crate::models::interpolation::InterpolationKind;
use crate::models::point::{RampPoint, RampValue};
use serde::Serialize;

/// What a reconcile pass did to one parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplicationReport {
    /// Lock-step points with at least one field written.
    pub fields_updated: usize,
    pub inserts_queued: usize,
    pub deletes_queued: usize,
    pub points_appended: usize,
    pub points_truncated: usize,
}

impl ReplicationReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    /// Fold another report into this one.
    pub fn absorb(&mut self, other: ReplicationReport) {
        self.fields_updated += other.fields_updated;
        self.inserts_queued += other.inserts_queued;
        self.deletes_queued += other.deletes_queued;
        self.points_appended += other.points_appended;
        self.points_truncated += other.points_truncated;
    }
}

impl<V: RampValue> RampParameter<V> {
    /// Reconcile the live points against `source` through bindings and events.
    ///
    /// Points the engine has not created yet are already represented by
    /// pending insert events, and points it has not deleted yet by pending
    /// delete events; both are counted before any range is queued, so a
    /// second pass over the same source queues nothing.
    pub(crate) fn reconcile_live_with(&mut self, source: &[RampPoint<V>]) -> ReplicationReport {
        let mut report = ReplicationReport::default();
        for (point, wanted) in self.points.iter_mut().zip(source) {
            if point.write_bound_fields(
                Some(wanted.position),
                Some(wanted.value),
                Some(wanted.interpolation),
            ) {
                report.fields_updated += 1;
            }
        }

        let lockstep_end = source.len().min(self.points.len());
        let pending = PendingEventCounts::of(&self.modification_events);
        let inserts: Vec<(f32, V, InterpolationKind)> = source
            .iter()
            .skip(lockstep_end + pending.inserts)
            .map(|point| (point.position, point.value, point.interpolation))
            .collect();
        let deletes: Vec<i32> = self
            .points
            .iter()
            .skip(lockstep_end + pending.deletes)
            .map(|point| point.instance_index)
            .collect();

        for (position, value, interpolation) in inserts {
            self.create_insert_event(position, value, interpolation);
            report.inserts_queued += 1;
        }
        for instance_index in deletes {
            self.create_delete_event(instance_index);
            report.deletes_queued += 1;
        }

        if !report.is_noop() {
            self.mark_changed();
        }
        report
    }

    /// Reconcile the cached points against `source` by direct mutation.
    pub(crate) fn reconcile_cached_with(
        &mut self,
        source: &[RampPoint<V>],
        cooking_enabled: bool,
    ) -> ReplicationReport {
        let mut report = ReplicationReport::default();
        for (point, wanted) in self.cached_points.iter_mut().zip(source) {
            if point.write_fields(
                Some(wanted.position),
                Some(wanted.value),
                Some(wanted.interpolation),
            ) {
                report.fields_updated += 1;
            }
        }

        let cached_len = self.cached_points.len();
        if source.len() > cached_len {
            self.cached_points
                .extend(source[cached_len..].iter().map(RampPoint::detached));
            report.points_appended = source.len() - cached_len;
        } else if source.len() < cached_len {
            self.cached_points.truncate(source.len());
            report.points_truncated = cached_len - source.len();
        }

        if !report.is_noop() {
            self.caching = true;
            if !cooking_enabled {
                self.mark_changed();
            }
        }
        report
    }
}
