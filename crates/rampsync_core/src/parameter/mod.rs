//! Ramp parameter entity: confirmed points, cached edits and the event log.
//!
//! `points` belongs to the engine: every cook overwrites it. Local edits made
//! while the parameter is live are queued as [`ModificationEvent`]s instead.
//! While the parameter is in manual-update mode, or cooking is globally off,
//! edits go to `cached_points` and `caching` is raised; the cache is turned
//! into events by [`RampParameter::sync_cached_points`] once the parameter
//! goes live again.

mod reconcile;
#[cfg(test)]
mod tests;

pub use reconcile::ReplicationReport;

use crate::algo::remove_by_index;
use crate::constants::LAST_POINT_INDEX;
use crate::error::RampError;
use crate::models::event::ModificationEvent;
use crate::models::interpolation::InterpolationKind;
use crate::models::point::{RampPoint, RampValue};
use crate::store::{AssetId, EditContext};
use serde::Serialize;
use std::collections::BTreeSet;

/// Which point a delete request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointTarget {
    Index(usize),
    /// The last point present when the request is made.
    Last,
}

impl PointTarget {
    /// Decode a raw UI index where `-1` means the last point.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            LAST_POINT_INDEX => Some(PointTarget::Last),
            index if index >= 0 => Some(PointTarget::Index(index as usize)),
            _ => None,
        }
    }

    /// Raw UI index of this target.
    pub fn raw(self) -> i64 {
        match self {
            PointTarget::Index(index) => index as i64,
            PointTarget::Last => i64::from(LAST_POINT_INDEX),
        }
    }

    /// Concrete index for a ramp of `len` points, if in range.
    pub fn resolve(self, len: usize) -> Option<usize> {
        match self {
            PointTarget::Index(index) => (index < len).then_some(index),
            PointTarget::Last => len.checked_sub(1),
        }
    }
}

impl From<usize> for PointTarget {
    fn from(index: usize) -> Self {
        PointTarget::Index(index)
    }
}

/// A ramp parameter of one asset component.
#[derive(Debug, Clone, Serialize)]
pub struct RampParameter<V> {
    name: String,
    owner: AssetId,
    pub(crate) points: Vec<RampPoint<V>>,
    pub(crate) cached_points: Vec<RampPoint<V>>,
    pub(crate) modification_events: Vec<ModificationEvent<V>>,
    auto_update: bool,
    caching: bool,
    changed: bool,
    default_points: Vec<RampPoint<V>>,
}

impl<V: RampValue> RampParameter<V> {
    pub fn new(name: impl Into<String>, owner: AssetId, auto_update: bool) -> Self {
        Self {
            name: name.into(),
            owner,
            points: Vec::new(),
            cached_points: Vec::new(),
            modification_events: Vec::new(),
            auto_update,
            caching: false,
            changed: false,
            default_points: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> AssetId {
        self.owner
    }

    pub fn is_auto_update(&self) -> bool {
        self.auto_update
    }

    /// `true` while `cached_points` holds edits the engine has not seen.
    pub fn is_caching(&self) -> bool {
        self.caching
    }

    pub fn set_caching(&mut self, caching: bool) {
        self.caching = caching;
    }

    /// `true` once an edit requested a re-cook and the driver has not cleared it.
    pub fn needs_cook(&self) -> bool {
        self.changed
    }

    pub fn mark_changed(&mut self) {
        if !self.changed {
            tracing::trace!(parameter = self.name.as_str(), "Ramp parameter marked changed");
        }
        self.changed = true;
    }

    /// Called by the cook driver once the pending state was uploaded.
    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    pub fn points(&self) -> &[RampPoint<V>] {
        &self.points
    }

    pub fn cached_points(&self) -> &[RampPoint<V>] {
        &self.cached_points
    }

    pub fn modification_events(&self) -> &[ModificationEvent<V>] {
        &self.modification_events
    }

    /// `true` when reads and edits go to `points` rather than `cached_points`.
    pub fn uses_live_points(&self, ctx: &EditContext<'_>) -> bool {
        self.auto_update && ctx.cooking_enabled()
    }

    /// The point list reads are served from under `ctx`.
    pub fn active_points(&self, ctx: &EditContext<'_>) -> &[RampPoint<V>] {
        if self.uses_live_points(ctx) {
            &self.points
        } else {
            &self.cached_points
        }
    }

    pub fn point_count(&self, ctx: &EditContext<'_>) -> usize {
        self.active_points(ctx).len()
    }

    pub fn get_point(&self, ctx: &EditContext<'_>, index: usize) -> Option<&RampPoint<V>> {
        self.active_points(ctx).get(index)
    }

    pub fn create_insert_event(
        &mut self,
        position: f32,
        value: V,
        interpolation: InterpolationKind,
    ) {
        tracing::trace!(
            parameter = self.name.as_str(),
            position,
            "Queued ramp insert event"
        );
        self.modification_events.push(ModificationEvent::Insert {
            position,
            value,
            interpolation,
        });
    }

    pub fn create_delete_event(&mut self, instance_index: i32) {
        tracing::trace!(
            parameter = self.name.as_str(),
            instance_index,
            "Queued ramp delete event"
        );
        self.modification_events
            .push(ModificationEvent::Delete { instance_index });
    }

    /// Hand the queued events to the cook driver.
    pub fn take_modification_events(&mut self) -> Vec<ModificationEvent<V>> {
        std::mem::take(&mut self.modification_events)
    }

    /// Check that [`insert_point`](Self::insert_point) would accept `index`.
    ///
    /// # Errors
    /// [`RampError::OutOfRange`] when a cached insert index lies past the end.
    pub fn check_insert(&self, ctx: &EditContext<'_>, index: usize) -> Result<(), RampError> {
        let len = self.cached_points.len();
        if !self.uses_live_points(ctx) && index > len {
            return Err(RampError::OutOfRange {
                index: index as i64,
                len,
            });
        }
        Ok(())
    }

    /// Insert a point at `index` of the active source.
    ///
    /// Live parameters queue an insert event; the engine decides where the new
    /// instance lands. Cached parameters insert directly.
    ///
    /// # Errors
    /// See [`check_insert`](Self::check_insert).
    pub fn insert_point(
        &mut self,
        ctx: &EditContext<'_>,
        index: usize,
        position: f32,
        value: V,
        interpolation: InterpolationKind,
    ) -> Result<(), RampError> {
        self.check_insert(ctx, index)?;
        if self.uses_live_points(ctx) {
            self.create_insert_event(position, value, interpolation);
            self.mark_changed();
            return Ok(());
        }

        self.cached_points
            .insert(index, RampPoint::new(position, value, interpolation));
        self.caching = true;
        if !ctx.cooking_enabled() {
            // Lets a later cook resumption know this parameter has pending state.
            self.mark_changed();
        }
        Ok(())
    }

    /// Check that [`delete_points`](Self::delete_points) would remove
    /// something for `targets`.
    ///
    /// # Errors
    /// - [`RampError::EmptyRamp`] when there is nothing to delete.
    /// - [`RampError::OutOfRange`] when a live target does not exist.
    /// - [`RampError::NothingRemoved`] when no target resolves.
    pub fn check_delete(
        &self,
        ctx: &EditContext<'_>,
        targets: &[PointTarget],
    ) -> Result<(), RampError> {
        self.resolve_delete_targets(ctx, targets).map(|_| ())
    }

    fn resolve_delete_targets(
        &self,
        ctx: &EditContext<'_>,
        targets: &[PointTarget],
    ) -> Result<BTreeSet<usize>, RampError> {
        let len = self.point_count(ctx);
        if len == 0 {
            return Err(RampError::EmptyRamp);
        }

        let resolved: BTreeSet<usize> = if self.uses_live_points(ctx) {
            targets
                .iter()
                .map(|target| {
                    target.resolve(len).ok_or(RampError::OutOfRange {
                        index: target.raw(),
                        len,
                    })
                })
                .collect::<Result<BTreeSet<usize>, RampError>>()?
        } else {
            targets
                .iter()
                .filter_map(|target| target.resolve(len))
                .collect()
        };
        if resolved.is_empty() {
            return Err(RampError::NothingRemoved);
        }
        Ok(resolved)
    }

    /// Delete the addressed points of the active source.
    ///
    /// Every [`PointTarget::Last`] resolves against the count before the call,
    /// and each point is deleted at most once. Live parameters validate every
    /// target before queuing any event; cached parameters ignore targets that
    /// do not exist.
    ///
    /// # Errors
    /// See [`check_delete`](Self::check_delete).
    pub fn delete_points(
        &mut self,
        ctx: &EditContext<'_>,
        targets: &[PointTarget],
    ) -> Result<(), RampError> {
        let resolved = self.resolve_delete_targets(ctx, targets)?;

        if self.uses_live_points(ctx) {
            let instances: Vec<i32> = resolved
                .iter()
                .map(|&index| self.points[index].instance_index)
                .collect();
            for instance_index in instances {
                self.create_delete_event(instance_index);
            }
            self.mark_changed();
            return Ok(());
        }

        remove_by_index(&mut self.cached_points, |index| resolved.contains(&index));
        self.caching = true;
        if !ctx.cooking_enabled() {
            self.mark_changed();
        }
        Ok(())
    }

    /// Write the requested fields of the point at `index`.
    ///
    /// Live points are written through their field bindings. An index past
    /// the live points addresses the matching pending insert event, so a point
    /// added since the last cook can still be adjusted.
    ///
    /// # Returns
    /// `true` when anything changed.
    pub fn write_point_fields(
        &mut self,
        ctx: &EditContext<'_>,
        index: usize,
        position: Option<f32>,
        value: Option<V>,
        interpolation: Option<InterpolationKind>,
    ) -> bool {
        if !self.uses_live_points(ctx) {
            let Some(point) = self.cached_points.get_mut(index) else {
                return false;
            };
            let wrote = point.write_fields(position, value, interpolation);
            if wrote {
                self.caching = true;
                if !ctx.cooking_enabled() {
                    self.mark_changed();
                }
            }
            return wrote;
        }

        let live_len = self.points.len();
        let wrote = match self.points.get_mut(index) {
            Some(point) => point.write_bound_fields(position, value, interpolation),
            None => {
                self.write_pending_insert(index - live_len, position, value, interpolation)
            }
        };
        if wrote {
            self.mark_changed();
        }
        wrote
    }

    fn write_pending_insert(
        &mut self,
        pending_index: usize,
        new_position: Option<f32>,
        new_value: Option<V>,
        new_interpolation: Option<InterpolationKind>,
    ) -> bool {
        let Some(ModificationEvent::Insert {
            position,
            value,
            interpolation,
        }) = self
            .modification_events
            .iter_mut()
            .filter(|event| event.is_insert())
            .nth(pending_index)
        else {
            return false;
        };

        let mut wrote = false;
        if let Some(new_position) = new_position.filter(|p| p != position) {
            *position = new_position;
            wrote = true;
        }
        if let Some(new_value) = new_value.filter(|v| v != value) {
            *value = new_value;
            wrote = true;
        }
        if let Some(new_interpolation) = new_interpolation.filter(|i| i != interpolation) {
            *interpolation = new_interpolation;
            wrote = true;
        }
        wrote
    }

    /// Turn the cached edits into field writes and events, then stop caching.
    pub fn sync_cached_points(&mut self) -> ReplicationReport {
        let source = self.cached_points.clone();
        let report = self.reconcile_live_with(&source);
        self.caching = false;
        tracing::debug!(
            parameter = self.name.as_str(),
            fields = report.fields_updated,
            inserts = report.inserts_queued,
            deletes = report.deletes_queued,
            "Synced cached ramp points"
        );
        report
    }

    /// Switch between auto-update and manual-update mode.
    ///
    /// Turning auto-update on pushes the cached edits when cooking is enabled;
    /// otherwise the next pre-cook does. Turning it off seeds the cache from
    /// the confirmed points when nothing is cached.
    ///
    /// # Returns
    /// `true` when the mode changed.
    ///
    /// # Errors
    /// [`RampError::MidCook`] while the owning asset cooks.
    pub fn set_auto_update(
        &mut self,
        ctx: &EditContext<'_>,
        enabled: bool,
    ) -> Result<bool, RampError> {
        if ctx.is_mid_cook(self.owner) {
            return Err(RampError::MidCook);
        }
        if enabled {
            if self.auto_update {
                return Ok(false);
            }
            self.auto_update = true;
            // While cooking is paused the cache stays authoritative until `on_pre_cook`.
            if self.caching && ctx.cooking_enabled() {
                self.sync_cached_points();
            }
        } else {
            if !self.auto_update {
                return Ok(false);
            }
            if !self.caching {
                self.cached_points = self.points.iter().map(RampPoint::detached).collect();
            }
            self.auto_update = false;
        }
        Ok(true)
    }

    /// Push cached edits right before a cook, if the parameter is live again.
    pub fn on_pre_cook(&mut self, ctx: &EditContext<'_>) -> Option<ReplicationReport> {
        (self.caching && self.uses_live_points(ctx)).then(|| self.sync_cached_points())
    }

    /// Replace the confirmed points with the result of a finished cook.
    ///
    /// The cache mirrors the new state unless it holds unsynced edits.
    pub fn apply_cooked_points(&mut self, points: Vec<RampPoint<V>>) {
        if !self.caching {
            self.cached_points = points.iter().map(RampPoint::detached).collect();
        }
        self.points = points;
    }

    /// Resize the cache, filling new slots with default points.
    pub fn set_num_cached_points(&mut self, count: usize) {
        if count == self.cached_points.len() {
            return;
        }
        self.cached_points.resize_with(count, || {
            RampPoint::new(0.0, V::DEFAULT_INSERT, InterpolationKind::Linear)
        });
        self.caching = true;
    }

    /// Overwrite the cached point at `index`, appending when `index` is the
    /// current length.
    ///
    /// # Returns
    /// `false` when `index` lies past the end of the cache.
    pub fn set_cached_point_at_index(
        &mut self,
        index: usize,
        position: f32,
        value: V,
        interpolation: InterpolationKind,
    ) -> bool {
        let len = self.cached_points.len();
        match self.cached_points.get_mut(index) {
            Some(point) => {
                point.write_fields(Some(position), Some(value), Some(interpolation));
            }
            None if index == len => {
                self.cached_points
                    .push(RampPoint::new(position, value, interpolation));
            }
            None => return false,
        }
        self.caching = true;
        true
    }

    /// Points the parameter resets to; normally read from the asset definition.
    pub fn set_default_points(&mut self, defaults: Vec<RampPoint<V>>) {
        self.default_points = defaults.iter().map(RampPoint::detached).collect();
    }

    pub fn default_points(&self) -> &[RampPoint<V>] {
        &self.default_points
    }

    /// `true` when the active points match the defaults field for field.
    pub fn is_default(&self, ctx: &EditContext<'_>) -> bool {
        let active = self.active_points(ctx);
        active.len() == self.default_points.len()
            && active
                .iter()
                .zip(&self.default_points)
                .all(|(point, default)| point.same_fields(default))
    }

    /// Reset the ramp to its default points.
    ///
    /// Live parameters drop their pending events and queue a full rebuild.
    ///
    /// # Returns
    /// `false` when the ramp already matched its defaults.
    pub fn restore_defaults(&mut self, ctx: &EditContext<'_>) -> bool {
        if self.is_default(ctx) {
            return false;
        }
        if self.uses_live_points(ctx) {
            self.modification_events.clear();
            let instances: Vec<i32> = self.points.iter().map(|p| p.instance_index).collect();
            for instance_index in instances {
                self.create_delete_event(instance_index);
            }
            let defaults = self.default_points.clone();
            for point in defaults {
                self.create_insert_event(point.position, point.value, point.interpolation);
            }
            self.mark_changed();
        } else {
            self.cached_points = self.default_points.clone();
            self.caching = true;
            if !ctx.cooking_enabled() {
                self.mark_changed();
            }
        }
        true
    }
}
