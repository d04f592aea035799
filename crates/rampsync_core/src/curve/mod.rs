//! Diffing an externally edited curve against a ramp view.
//!
//! A curve widget owns its own key list. After the user edits it, the adapter
//! compares the keys with the view's points and turns the difference into one
//! view operation: a single insert, one batched delete or one batched field
//! write.


use crate::models::interpolation::{
    is_interpolation_equivalent, translate_engine_to_ui, translate_ui_to_engine, InterpolationKind,
    UiInterpolation,
};
use crate::models::point::{RampPoint, RampValue};
use crate::store::{EditContext, RampStore};
use crate::view::{PointTarget, RampView};
use serde::{Deserialize, Serialize};

/// One key of an external curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey<V> {
    pub position: f32,
    pub value: V,
    pub interpolation: UiInterpolation,
}

impl<V: RampValue> CurveKey<V> {
    pub fn new(position: f32, value: V, interpolation: UiInterpolation) -> Self {
        Self {
            position,
            value,
            interpolation,
        }
    }

    /// Key a curve widget should show for `point`.
    pub fn from_point(point: &RampPoint<V>) -> Self {
        Self::new(
            point.position,
            point.value,
            translate_engine_to_ui(point.interpolation),
        )
    }

    /// `true` when the key shows `point` without any visible difference.
    pub fn matches(&self, point: &RampPoint<V>) -> bool {
        self.position == point.position
            && self.value == point.value
            && is_interpolation_equivalent(self.interpolation, point.interpolation)
    }
}

/// Read access to an external curve's keys.
pub trait CurveSource<V> {
    /// `None` when the curve is not in a readable state.
    fn key_count(&self) -> Option<usize>;

    fn key(&self, index: usize) -> Option<CurveKey<V>>;
}

impl<V: RampValue> CurveSource<V> for [CurveKey<V>] {
    fn key_count(&self) -> Option<usize> {
        Some(self.len())
    }

    fn key(&self, index: usize) -> Option<CurveKey<V>> {
        self.get(index).copied()
    }
}

impl<V: RampValue> CurveSource<V> for Vec<CurveKey<V>> {
    fn key_count(&self) -> Option<usize> {
        self.as_slice().key_count()
    }

    fn key(&self, index: usize) -> Option<CurveKey<V>> {
        self.as_slice().key(index)
    }
}

/// The single view operation a curve change maps to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CurveEdit<V> {
    Unchanged,
    Insert {
        index: usize,
        position: f32,
        value: V,
        interpolation: InterpolationKind,
    },
    Delete {
        indices: Vec<usize>,
    },
    Set {
        indices: Vec<usize>,
        positions: Vec<Option<f32>>,
        values: Vec<Option<V>>,
        interpolations: Vec<Option<InterpolationKind>>,
    },
}

/// Compute the edit that brings `points` in line with `keys`.
///
/// More keys than points commits only the first new key; a widget that adds
/// several keys at once needs one call per key.
pub fn plan_curve_edit<V: RampValue>(
    points: &[RampPoint<V>],
    keys: &[CurveKey<V>],
) -> CurveEdit<V> {
    let (n, m) = (points.len(), keys.len());
    let (mut point_index, mut key_index) = (0, 0);

    if m > n {
        while point_index < n && key_index < m {
            let key = &keys[key_index];
            if key.matches(&points[point_index]) {
                point_index += 1;
                key_index += 1;
                continue;
            }
            return CurveEdit::Insert {
                index: point_index,
                position: key.position,
                value: key.value,
                interpolation: translate_ui_to_engine(key.interpolation),
            };
        }
        let key = &keys[key_index];
        return CurveEdit::Insert {
            index: key_index,
            position: key.position,
            value: key.value,
            interpolation: InterpolationKind::Linear,
        };
    }

    if m < n {
        let mut indices = Vec::new();
        while point_index < n && key_index < m {
            if !keys[key_index].matches(&points[point_index]) {
                indices.push(point_index);
            } else {
                key_index += 1;
            }
            point_index += 1;
        }
        indices.extend(point_index..n);
        return CurveEdit::Delete { indices };
    }

    let mut indices = Vec::new();
    let mut positions = Vec::new();
    let mut values = Vec::new();
    let mut interpolations = Vec::new();
    for (index, (point, key)) in points.iter().zip(keys).enumerate() {
        if key.matches(point) {
            continue;
        }
        let interpolation = if is_interpolation_equivalent(key.interpolation, point.interpolation) {
            point.interpolation
        } else {
            translate_ui_to_engine(key.interpolation)
        };
        indices.push(index);
        positions.push(Some(key.position));
        values.push(Some(key.value));
        interpolations.push(Some(interpolation));
    }
    if indices.is_empty() {
        return CurveEdit::Unchanged;
    }
    CurveEdit::Set {
        indices,
        positions,
        values,
        interpolations,
    }
}

/// Applies external curve edits to a ramp view.
pub struct CurveEditorAdapter<V> {
    view: RampView<V>,
    on_committed: Option<Box<dyn FnMut()>>,
}

impl<V: RampValue> CurveEditorAdapter<V> {
    pub fn new(view: RampView<V>) -> Self {
        Self {
            view,
            on_committed: None,
        }
    }

    /// Callback run once after every curve change that mutated the view.
    pub fn with_on_committed(mut self, on_committed: impl FnMut() + 'static) -> Self {
        self.on_committed = Some(Box::new(on_committed));
        self
    }

    pub fn view(&self) -> &RampView<V> {
        &self.view
    }

    /// Plan the edit for `curve` without applying it.
    ///
    /// An unreadable curve plans [`CurveEdit::Unchanged`].
    pub fn plan<C>(&self, store: &RampStore<V>, ctx: &EditContext<'_>, curve: &C) -> CurveEdit<V>
    where
        C: CurveSource<V> + ?Sized,
    {
        let Some(count) = curve.key_count() else {
            tracing::debug!("Curve has no readable key count; ignoring change");
            return CurveEdit::Unchanged;
        };
        let Some(keys) = (0..count)
            .map(|index| curve.key(index))
            .collect::<Option<Vec<_>>>()
        else {
            tracing::debug!(count, "Curve key unreadable; ignoring change");
            return CurveEdit::Unchanged;
        };
        plan_curve_edit(&self.view.active_points(store, ctx), &keys)
    }

    /// Apply a planned edit to the view.
    ///
    /// # Returns
    /// `true` when the view changed.
    pub fn apply(
        &self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        edit: CurveEdit<V>,
    ) -> bool {
        match edit {
            CurveEdit::Unchanged => false,
            CurveEdit::Insert {
                index,
                position,
                value,
                interpolation,
            } => self
                .view
                .insert_point(store, ctx, index, position, value, interpolation),
            CurveEdit::Delete { indices } => {
                let targets: Vec<PointTarget> =
                    indices.into_iter().map(PointTarget::Index).collect();
                self.view.delete_points(store, ctx, &targets)
            }
            CurveEdit::Set {
                indices,
                positions,
                values,
                interpolations,
            } => self
                .view
                .set_points(store, ctx, &indices, &positions, &values, &interpolations),
        }
    }

    /// Reconcile the view with an edited curve and notify on commit.
    ///
    /// # Returns
    /// `true` when the view changed.
    pub fn on_external_curve_changed<C>(
        &mut self,
        store: &mut RampStore<V>,
        ctx: &EditContext<'_>,
        curve: &C,
    ) -> bool
    where
        C: CurveSource<V> + ?Sized,
    {
        let edit = self.plan(store, ctx, curve);
        tracing::trace!(?edit, "Planned curve edit");
        let committed = self.apply(store, ctx, edit);
        if committed {
            if let Some(on_committed) = self.on_committed.as_mut() {
                on_committed();
            }
        }
        committed
    }

    /// Keys a curve widget should display for the view's current points.
    pub fn curve_keys(&self, store: &RampStore<V>, ctx: &EditContext<'_>) -> Vec<CurveKey<V>> {
        self.view
            .active_points(store, ctx)
            .iter()
            .map(CurveKey::from_point)
            .collect()
    }
}
