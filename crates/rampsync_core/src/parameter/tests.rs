//! Parameter-level behavior for live and cached edits.

use super::*;
use crate::loopback;
use crate::models::point::LinearColor;
use crate::test_support::{fields, float_points, live_parameter, manual_parameter, positions};
use std::collections::HashSet;

fn three_points() -> Vec<RampPoint<f32>> {
    float_points(&[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)])
}

fn live_ctx() -> EditContext<'static> {
    EditContext::new(true)
}

#[test]
fn point_target_decodes_raw_ui_indices() {
    assert_eq!(PointTarget::from_raw(-1), Some(PointTarget::Last));
    assert_eq!(PointTarget::from_raw(4), Some(PointTarget::Index(4)));
    assert_eq!(PointTarget::from_raw(-2), None);
    assert_eq!(PointTarget::Last.resolve(0), None);
    assert_eq!(PointTarget::Last.resolve(3), Some(2));
    assert_eq!(PointTarget::Index(3).resolve(3), None);
    assert_eq!(PointTarget::Last.raw(), -1);
}

#[test]
fn active_source_follows_flags_only() {
    let parameter = live_parameter("ramp", AssetId(1), three_points());
    assert!(parameter.uses_live_points(&live_ctx()));
    assert!(!parameter.uses_live_points(&EditContext::new(false)));

    let manual = manual_parameter("ramp", AssetId(1), three_points());
    assert!(!manual.uses_live_points(&live_ctx()));
    assert_eq!(manual.point_count(&live_ctx()), 3);
    assert_eq!(
        manual.get_point(&live_ctx(), 1).map(|p| p.instance_index),
        Some(crate::constants::NO_INSTANCE)
    );
}

#[test]
fn live_insert_queues_an_event_and_leaves_points_alone() {
    let mut parameter = live_parameter("ramp", AssetId(1), three_points());
    parameter
        .insert_point(&live_ctx(), 1, 0.25, 0.75, InterpolationKind::Constant)
        .expect("insert");

    assert_eq!(parameter.point_count(&live_ctx()), 3);
    assert_eq!(
        parameter.modification_events(),
        &[ModificationEvent::Insert {
            position: 0.25,
            value: 0.75,
            interpolation: InterpolationKind::Constant,
        }]
    );
    assert!(parameter.needs_cook());
    assert!(!parameter.is_caching());
}

#[test]
fn cached_insert_marks_changed_only_while_cooking_is_disabled() {
    let mut manual = manual_parameter("ramp", AssetId(1), three_points());
    manual
        .insert_point(&live_ctx(), 1, 0.25, 0.75, InterpolationKind::Linear)
        .expect("insert");
    assert_eq!(positions(manual.cached_points()), vec![0.0, 0.25, 0.5, 1.0]);
    assert!(manual.is_caching());
    assert!(!manual.needs_cook());

    let mut paused = live_parameter("ramp", AssetId(1), three_points());
    let ctx = EditContext::new(false);
    paused
        .insert_point(&ctx, 3, 0.9, 0.1, InterpolationKind::Linear)
        .expect("insert");
    assert_eq!(positions(paused.cached_points()), vec![0.0, 0.5, 1.0, 0.9]);
    assert!(paused.needs_cook());
    assert!(paused.modification_events().is_empty());
}

#[test]
fn cached_insert_past_the_end_is_out_of_range() {
    let mut manual = manual_parameter("ramp", AssetId(1), three_points());
    let err = manual
        .insert_point(&live_ctx(), 5, 0.25, 0.75, InterpolationKind::Linear)
        .expect_err("out of range");
    assert_eq!(err, RampError::OutOfRange { index: 5, len: 3 });
    assert_eq!(manual.cached_points().len(), 3);
    assert!(!manual.is_caching());
}

#[test]
fn live_delete_resolves_last_once_and_dedups() {
    let mut parameter = live_parameter("ramp", AssetId(1), three_points());
    parameter
        .delete_points(
            &live_ctx(),
            &[PointTarget::Last, PointTarget::Last, PointTarget::Index(0)],
        )
        .expect("delete");

    assert_eq!(
        parameter.modification_events(),
        &[
            ModificationEvent::Delete { instance_index: 1 },
            ModificationEvent::Delete { instance_index: 3 },
        ]
    );
    assert!(parameter.needs_cook());
}

#[test]
fn live_delete_with_a_bad_target_queues_nothing() {
    let mut parameter = live_parameter("ramp", AssetId(1), three_points());
    let err = parameter
        .delete_points(&live_ctx(), &[PointTarget::Index(0), PointTarget::Index(7)])
        .expect_err("out of range");
    assert_eq!(err, RampError::OutOfRange { index: 7, len: 3 });
    assert!(parameter.modification_events().is_empty());
    assert!(!parameter.needs_cook());

    let mut empty: RampParameter<f32> = RampParameter::new("empty", AssetId(1), true);
    assert_eq!(
        empty.delete_points(&live_ctx(), &[PointTarget::Last]),
        Err(RampError::EmptyRamp)
    );
}

#[test]
fn cached_delete_keeps_order_and_reports_nothing_removed() {
    let mut manual = manual_parameter(
        "ramp",
        AssetId(1),
        float_points(&[(0.0, 0.0), (0.2, 0.2), (0.4, 0.4), (0.6, 0.6), (1.0, 1.0)]),
    );
    manual
        .delete_points(&live_ctx(), &[PointTarget::Index(1), PointTarget::Last])
        .expect("delete");
    assert_eq!(positions(manual.cached_points()), vec![0.0, 0.4, 0.6]);
    assert!(manual.is_caching());

    assert_eq!(
        manual.delete_points(&live_ctx(), &[PointTarget::Index(9)]),
        Err(RampError::NothingRemoved)
    );
    assert_eq!(manual.cached_points().len(), 3);
}

#[test]
fn live_field_writes_go_through_bindings_only() {
    let mut parameter = live_parameter("ramp", AssetId(1), three_points());
    parameter.points[0].bindings.value = None;

    let wrote = parameter.write_point_fields(&live_ctx(), 0, Some(0.1), Some(0.9), None);

    assert!(wrote);
    assert_eq!(parameter.points()[0].position, 0.1);
    assert_eq!(parameter.points()[0].value, 0.0);
    assert!(parameter.points()[0]
        .bindings
        .position
        .is_some_and(|parm| parm.changed));
    assert!(parameter.needs_cook());
    assert!(parameter.modification_events().is_empty());
}

#[test]
fn field_writes_past_live_points_edit_the_pending_insert() {
    let mut parameter = live_parameter("ramp", AssetId(1), float_points(&[(0.0, 0.0), (1.0, 1.0)]));
    parameter
        .insert_point(&live_ctx(), 2, 0.5, 1.0, InterpolationKind::Linear)
        .expect("insert");

    assert!(parameter.write_point_fields(&live_ctx(), 2, Some(0.6), None, None));
    assert!(!parameter.write_point_fields(&live_ctx(), 3, Some(0.6), None, None));
    assert!(!parameter.write_point_fields(&live_ctx(), 2, Some(0.6), None, None));
    assert_eq!(
        parameter.modification_events(),
        &[ModificationEvent::Insert {
            position: 0.6,
            value: 1.0,
            interpolation: InterpolationKind::Linear,
        }]
    );
}

#[test]
fn enabling_auto_update_syncs_cached_edits_into_events() {
    let ctx = live_ctx();
    let mut parameter = live_parameter("ramp", AssetId(1), three_points());
    assert_eq!(parameter.set_auto_update(&ctx, false), Ok(true));
    assert_eq!(fields(parameter.cached_points()), fields(parameter.points()));

    parameter
        .insert_point(&ctx, 1, 0.25, 0.2, InterpolationKind::Linear)
        .expect("insert");
    assert!(parameter.is_caching());

    assert_eq!(parameter.set_auto_update(&ctx, true), Ok(true));
    assert!(!parameter.is_caching());
    assert!(parameter.is_auto_update());
    assert_eq!(
        parameter.modification_events(),
        &[ModificationEvent::Insert {
            position: 1.0,
            value: 1.0,
            interpolation: InterpolationKind::Linear,
        }]
    );
    assert_eq!(positions(parameter.points()), vec![0.0, 0.25, 0.5]);

    assert!(parameter.sync_cached_points().is_noop());

    loopback::cook(&mut parameter, &ctx).expect("cooked");
    assert_eq!(positions(parameter.points()), vec![0.0, 0.25, 0.5, 1.0]);
    assert_eq!(positions(parameter.cached_points()), vec![0.0, 0.25, 0.5, 1.0]);
}

#[test]
fn mode_switches_are_refused_mid_cook_and_skipped_when_redundant() {
    let mut parameter = live_parameter("ramp", AssetId(4), three_points());
    let busy: HashSet<AssetId> = [AssetId(4)].into_iter().collect();
    let cooking = EditContext::with_monitor(true, &busy);

    assert_eq!(parameter.set_auto_update(&cooking, false), Err(RampError::MidCook));
    assert!(parameter.is_auto_update());
    assert_eq!(parameter.set_auto_update(&live_ctx(), true), Ok(false));

    assert_eq!(parameter.set_auto_update(&live_ctx(), false), Ok(true));
    assert_eq!(parameter.set_auto_update(&live_ctx(), false), Ok(false));
}

#[test]
fn enabling_auto_update_while_paused_defers_the_sync_to_pre_cook() {
    let paused = EditContext::new(false);
    let mut live = live_parameter("ramp", AssetId(1), three_points());
    assert_eq!(live.set_auto_update(&paused, true), Ok(false));

    let mut manual = manual_parameter("ramp", AssetId(1), three_points());
    manual
        .insert_point(&paused, 3, 0.9, 0.1, InterpolationKind::Linear)
        .expect("insert");
    assert_eq!(manual.set_auto_update(&paused, true), Ok(true));
    assert!(manual.is_auto_update());
    assert!(manual.is_caching());
    assert!(manual.modification_events().is_empty());
    assert_eq!(manual.set_auto_update(&paused, true), Ok(false));

    let report = manual.on_pre_cook(&live_ctx()).expect("synced");
    assert_eq!(report.inserts_queued, 1);
    assert!(!manual.is_caching());
}

#[test]
fn cook_results_refresh_the_cache_unless_edits_are_pending() {
    let mut parameter = live_parameter("ramp", AssetId(1), three_points());
    parameter.apply_cooked_points(loopback::confirm(float_points(&[(0.3, 0.3)])));
    assert_eq!(positions(parameter.cached_points()), vec![0.3]);

    parameter.set_cached_point_at_index(0, 0.9, 0.9, InterpolationKind::Constant);
    assert!(parameter.is_caching());
    parameter.apply_cooked_points(loopback::confirm(three_points()));
    assert_eq!(positions(parameter.cached_points()), vec![0.9]);
    assert_eq!(positions(parameter.points()), vec![0.0, 0.5, 1.0]);
}

#[test]
fn pre_cook_sync_runs_only_for_live_caching_parameters() {
    let mut parameter = live_parameter("ramp", AssetId(1), three_points());
    assert!(parameter.on_pre_cook(&live_ctx()).is_none());

    parameter.set_num_cached_points(2);
    assert!(parameter.is_caching());
    assert!(parameter.on_pre_cook(&EditContext::new(false)).is_none());

    let report = parameter.on_pre_cook(&live_ctx()).expect("synced");
    assert_eq!(report.deletes_queued, 1);
    assert_eq!(
        parameter.modification_events(),
        &[ModificationEvent::Delete { instance_index: 3 }]
    );
    assert!(!parameter.is_caching());
}

#[test]
fn cached_point_slots_can_be_resized_and_filled() {
    let mut parameter: RampParameter<LinearColor> = RampParameter::new("color", AssetId(1), false);
    parameter.set_num_cached_points(2);
    assert_eq!(parameter.cached_points()[1].value, LinearColor::BLACK);

    let white = LinearColor::WHITE;
    assert!(parameter.set_cached_point_at_index(1, 0.7, white, InterpolationKind::Bezier));
    assert!(parameter.set_cached_point_at_index(2, 1.0, white, InterpolationKind::Linear));
    assert!(!parameter.set_cached_point_at_index(5, 1.0, white, InterpolationKind::Linear));
    assert_eq!(positions(parameter.cached_points()), vec![0.0, 0.7, 1.0]);
    assert_eq!(parameter.cached_points()[1].interpolation, InterpolationKind::Bezier);
}

#[test]
fn restore_defaults_rebuilds_a_live_ramp_through_events() {
    let ctx = live_ctx();
    let mut parameter = live_parameter("ramp", AssetId(1), float_points(&[(0.0, 0.5), (1.0, 0.5)]));
    parameter.set_default_points(float_points(&[(0.0, 0.0), (1.0, 1.0)]));
    assert!(!parameter.is_default(&ctx));

    assert!(parameter.restore_defaults(&ctx));
    let counts = crate::models::event::PendingEventCounts::of(parameter.modification_events());
    assert_eq!((counts.inserts, counts.deletes), (2, 2));

    loopback::cook(&mut parameter, &ctx).expect("cooked");
    assert!(parameter.is_default(&ctx));
    assert!(!parameter.restore_defaults(&ctx));
}

#[test]
fn restore_defaults_replaces_the_cache_in_manual_mode() {
    let ctx = live_ctx();
    let mut manual = manual_parameter("ramp", AssetId(1), three_points());
    manual.set_default_points(float_points(&[(0.0, 1.0), (1.0, 0.0)]));

    assert!(manual.restore_defaults(&ctx));
    assert!(manual.is_caching());
    assert!(manual.is_default(&ctx));
    assert!(manual.modification_events().is_empty());
}
