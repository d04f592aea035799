//! Multi-selection view over ramp parameters.
//!
//! A view edits N parameters as one. The first live handle is the main
//! parameter: reads come from it, and before every edit the other members are
//! reconciled against it so all of them start from the same baseline.

mod replicate;

pub use crate::parameter::{PointTarget, ReplicationReport};
pub use replicate::replicate_main_into;

use crate::constants::{RAMP_END_POSITION, RAMP_START_POSITION};
use crate::error::RampError;
use crate::models::interpolation::InterpolationKind;
use crate::models::point::{RampPoint, RampValue};
use crate::parameter::RampParameter;
use crate::store::{EditContext, RampHandle, RampStore};
use std::marker::PhantomData;

/// Ordered selection of ramp parameters edited together.
#[derive(Debug, Clone)]
pub struct RampView<V> {
    handles: Vec<RampHandle>,
    _value: PhantomData<fn() -> V>,
}

impl<V: RampValue> RampView<V> {
    pub fn new(handles: impl IntoIterator<Item = RampHandle>) -> Self {
        Self {
            handles: handles.into_iter().collect(),
            _value: PhantomData,
        }
    }

    pub fn handles(&self) -> &[RampHandle] {
        &self.handles
    }

    /// First handle whose parameter still exists.
    pub fn main_handle(&self, store: &RampStore<V>) -> Option<RampHandle> {
        self.handles
            .iter()
            .copied()
            .find(|handle| store.is_live(*handle))
    }

    /// Live handles after the main one.
    fn secondary_handles(&self, store: &RampStore<V>, main: RampHandle) -> Vec<RampHandle> {
        self.handles
            .iter()
            .copied()
            .filter(|handle| *handle != main)
            .filter(|handle| {
                let live = store.is_live(*handle);
                if !live {
                    tracing::debug!(?handle, "Skipping stale ramp parameter");
                }
                live
            })
            .collect()
    }

    pub fn point_count(&self, store: &RampStore<V>, ctx: &EditContext<'_>) -> usize {
        self.main_handle(store)
            .and_then(|main| store.get(main))
            .map_or(0, |main| main.point_count(ctx))
    }

    pub fn get_point(
        &self,
        store: &RampStore<V>,
        ctx: &EditContext<'_>,
        index: usize,
    ) -> Option<RampPoint<V>> {
        let main = store.get(self.main_handle(store)?)?;
        main.get_point(ctx, index).cloned()
    }

    /// Snapshot of the main parameter's active points.
    pub fn active_points(&self, store: &RampStore<V>, ctx: &EditContext<'_>) -> Vec<RampPoint<V>> {
        self.main_handle(store)
            .and_then(|main| store.get(main))
            .map(|main| main.active_points(ctx).to_vec())
            .unwrap_or_default()
    }

    /// Resolve the main handle and refuse edits while its asset cooks.
    fn editable_main(
        &self,
        store: &RampStore<V>,
        ctx: &EditContext<'_>,
    ) -> Result<RampHandle, RampError> {
        let main = self.main_handle(store).ok_or(RampError::StaleReference)?;
        let owner = store.get(main).ok_or(RampError::StaleReference)?.owner();
        if ctx.is_mid_cook(owner) {
            return Err(RampError::MidCook);
        }
        Ok(main)
    }

    fn replicate_from(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        main: RampHandle,
    ) -> ReplicationReport {
        let mut report = ReplicationReport::default();
        let Some(source) = store.get(main).map(|main| main.active_points(ctx).to_vec()) else {
            return report;
        };
        for handle in self.secondary_handles(store, main) {
            if let Some(secondary) = store.get_mut(handle) {
                report.absorb(replicate_main_into(&source, secondary, ctx));
            }
        }
        report
    }

    /// Reconcile every secondary parameter against the main one.
    ///
    /// # Errors
    /// - [`RampError::StaleReference`] when no member is live.
    /// - [`RampError::MidCook`] while the main parameter's asset cooks.
    pub fn try_replicate_all(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
    ) -> Result<ReplicationReport, RampError> {
        let main = self.editable_main(store, ctx)?;
        Ok(self.replicate_from(store, ctx, main))
    }

    /// Reconcile every secondary parameter against the main one.
    ///
    /// Refused replication reports no work.
    pub fn replicate_all(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
    ) -> ReplicationReport {
        self.try_replicate_all(store, ctx)
            .unwrap_or_else(|err| refused("replicate_all", err, ReplicationReport::default()))
    }

    /// Resolve the main handle and run `check` against it without mutating.
    fn validated_main(
        &self,
        store: &RampStore<V>,
        ctx: &EditContext<'_>,
        check: impl FnOnce(&RampParameter<V>) -> Result<(), RampError>,
    ) -> Result<RampHandle, RampError> {
        let main = self.editable_main(store, ctx)?;
        check(store.get(main).ok_or(RampError::StaleReference)?)?;
        Ok(main)
    }

    /// Replicate into the secondaries and return the ones that may be edited.
    fn begin_edit(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        main: RampHandle,
    ) -> Vec<RampHandle> {
        self.replicate_from(store, ctx, main);
        self.secondary_handles(store, main)
            .into_iter()
            .filter(|handle| {
                store
                    .get(*handle)
                    .is_some_and(|parameter| !ctx.is_mid_cook(parameter.owner()))
            })
            .collect()
    }

    /// Insert a point into every member.
    ///
    /// # Errors
    /// - [`RampError::StaleReference`] when no member is live.
    /// - [`RampError::MidCook`] while the main parameter's asset cooks.
    /// - [`RampError::OutOfRange`] when the main parameter is cached and
    ///   `index` lies past its end.
    ///
    /// A refused call leaves every member untouched.
    pub fn try_insert_point(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        index: usize,
        position: f32,
        value: V,
        interpolation: InterpolationKind,
    ) -> Result<(), RampError> {
        let main = self.validated_main(store, ctx, |main| main.check_insert(ctx, index))?;
        let secondaries = self.begin_edit(store, ctx, main);
        store
            .get_mut(main)
            .ok_or(RampError::StaleReference)?
            .insert_point(ctx, index, position, value, interpolation)?;

        for handle in secondaries {
            let Some(secondary) = store.get_mut(handle) else {
                continue;
            };
            let index = index.min(secondary.point_count(ctx));
            if let Err(err) = secondary.insert_point(ctx, index, position, value, interpolation) {
                tracing::debug!(?handle, error = %err, "Secondary ramp insert skipped");
            }
        }
        Ok(())
    }

    pub fn insert_point(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        index: usize,
        position: f32,
        value: V,
        interpolation: InterpolationKind,
    ) -> bool {
        self.try_insert_point(store, ctx, index, position, value, interpolation)
            .map(|()| true)
            .unwrap_or_else(|err| refused("insert_point", err, false))
    }

    /// Insert a point between the neighbours of `index` with default fields.
    ///
    /// The position is the midpoint of the neighbouring positions, using the
    /// ramp bounds where a neighbour is missing; an index past the end inserts
    /// after the last point. The value is the value type's
    /// default and the interpolation is copied from the previous point.
    pub fn insert_point_default(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        index: usize,
    ) -> bool {
        let points = self.active_points(store, ctx);
        let index = index.min(points.len());
        let previous = index.checked_sub(1).and_then(|prev| points.get(prev));
        let next = points.get(index);

        let start = previous.map_or(RAMP_START_POSITION, |point| point.position);
        let end = next.map_or(RAMP_END_POSITION, |point| point.position);
        let interpolation = previous.map_or(InterpolationKind::Linear, |point| point.interpolation);

        self.insert_point(
            store,
            ctx,
            index,
            (start + end) / 2.0,
            V::DEFAULT_INSERT,
            interpolation,
        )
    }

    /// Delete the addressed points from every member.
    ///
    /// # Errors
    /// - [`RampError::StaleReference`] when no member is live.
    /// - [`RampError::MidCook`] while the main parameter's asset cooks.
    /// - Any refusal of the main parameter; see [`RampParameter::check_delete`].
    ///
    /// A refused call leaves every member untouched.
    pub fn try_delete_points(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        targets: &[PointTarget],
    ) -> Result<(), RampError> {
        let main = self.validated_main(store, ctx, |main| main.check_delete(ctx, targets))?;
        let secondaries = self.begin_edit(store, ctx, main);
        store
            .get_mut(main)
            .ok_or(RampError::StaleReference)?
            .delete_points(ctx, targets)?;

        for handle in secondaries {
            let Some(secondary) = store.get_mut(handle) else {
                continue;
            };
            if let Err(err) = secondary.delete_points(ctx, targets) {
                tracing::debug!(?handle, error = %err, "Secondary ramp delete skipped");
            }
        }
        Ok(())
    }

    pub fn delete_points(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        targets: &[PointTarget],
    ) -> bool {
        self.try_delete_points(store, ctx, targets)
            .map(|()| true)
            .unwrap_or_else(|err| refused("delete_points", err, false))
    }

    pub fn delete_point(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        target: PointTarget,
    ) -> bool {
        self.delete_points(store, ctx, &[target])
    }

    /// Write a batch of point fields into every member.
    ///
    /// Entry `i` targets point `indices[i]`; `None` fields stay untouched. An
    /// index is skipped when the main parameter has no such point or none of
    /// the requested fields differ from it.
    ///
    /// # Returns
    /// `true` when at least one point changed.
    ///
    /// # Errors
    /// - [`RampError::MismatchedBatchLengths`] when the arrays differ in length.
    /// - [`RampError::StaleReference`] when no member is live.
    /// - [`RampError::MidCook`] while the main parameter's asset cooks.
    pub fn try_set_points(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        indices: &[usize],
        positions: &[Option<f32>],
        values: &[Option<V>],
        interpolations: &[Option<InterpolationKind>],
    ) -> Result<bool, RampError> {
        let len = indices.len();
        if positions.len() != len || values.len() != len || interpolations.len() != len {
            return Err(RampError::MismatchedBatchLengths {
                indices: len,
                positions: positions.len(),
                values: values.len(),
                interpolations: interpolations.len(),
            });
        }
        if indices.is_empty() {
            return Ok(false);
        }

        let main = self.editable_main(store, ctx)?;
        let secondaries = self.begin_edit(store, ctx, main);
        let members: Vec<RampHandle> = std::iter::once(main).chain(secondaries).collect();

        let mut changed = false;
        for (slot, &index) in indices.iter().enumerate() {
            let position = positions[slot];
            let value = values[slot];
            let interpolation = interpolations[slot];
            let differs = store
                .get(main)
                .and_then(|main| main.get_point(ctx, index))
                .is_some_and(|point| point.differs_from(position, value, interpolation));
            if !differs {
                continue;
            }
            for handle in &members {
                if let Some(parameter) = store.get_mut(*handle) {
                    changed |=
                        parameter.write_point_fields(ctx, index, position, value, interpolation);
                }
            }
        }
        Ok(changed)
    }

    pub fn set_points(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        indices: &[usize],
        positions: &[Option<f32>],
        values: &[Option<V>],
        interpolations: &[Option<InterpolationKind>],
    ) -> bool {
        self.try_set_points(store, ctx, indices, positions, values, interpolations)
            .unwrap_or_else(|err| refused("set_points", err, false))
    }

    pub fn set_point_position(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        index: usize,
        position: f32,
    ) -> bool {
        self.set_points(store, ctx, &[index], &[Some(position)], &[None], &[None])
    }

    pub fn set_point_value(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        index: usize,
        value: V,
    ) -> bool {
        self.set_points(store, ctx, &[index], &[None], &[Some(value)], &[None])
    }

    pub fn set_point_interpolation(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        index: usize,
        interpolation: InterpolationKind,
    ) -> bool {
        self.set_points(store, ctx, &[index], &[None], &[None], &[Some(interpolation)])
    }

    /// Switch every member between auto-update and manual-update mode.
    ///
    /// # Returns
    /// `true` when at least one member changed mode.
    pub fn set_auto_update(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        enabled: bool,
    ) -> bool {
        let mut switched = false;
        for handle in self.handles.iter().copied() {
            let Some(parameter) = store.get_mut(handle) else {
                tracing::debug!(?handle, "Skipping stale ramp parameter");
                continue;
            };
            match parameter.set_auto_update(ctx, enabled) {
                Ok(changed) => switched |= changed,
                Err(err) => tracing::debug!(?handle, error = %err, "Auto-update switch skipped"),
            }
        }
        switched
    }

    /// `true` when every live member matches its default points.
    pub fn is_default(&self, store: &RampStore<V>, ctx: &EditContext<'_>) -> bool {
        self.handles
            .iter()
            .filter_map(|handle| store.get(*handle))
            .all(|parameter| parameter.is_default(ctx))
    }

    /// Reset every member to its default points.
    ///
    /// # Returns
    /// `true` when at least one member changed.
    pub fn restore_defaults(&self, store: &mut RampStore<V>, ctx: &EditContext<'_>) -> bool {
        let Ok(main) = self.editable_main(store, ctx) else {
            return false;
        };
        let mut restored = false;
        let members: Vec<RampHandle> = std::iter::once(main)
            .chain(self.secondary_handles(store, main))
            .collect();
        for handle in members {
            let Some(parameter) = store.get_mut(handle) else {
                continue;
            };
            if ctx.is_mid_cook(parameter.owner()) {
                continue;
            }
            restored |= parameter.restore_defaults(ctx);
        }
        restored
    }
}

fn refused<T>(operation: &'static str, err: RampError, fallback: T) -> T {
    tracing::debug!(operation, error = %err, "Ramp operation refused");
    fallback
}
