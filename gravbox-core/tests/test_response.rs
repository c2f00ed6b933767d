//! Velocity response, restitution, per-axis collision switches and recovery diagnostics

use gravbox_core::tests::test_helpers::{approx_eq_f32, drop_onto_floor, empty_world, run_steps};
use gravbox_core::{BodyDesc, CollisionAxes, DiagnosticKind};
use glam::Vec2;

#[test]
fn test_restitution_reflects_impact_velocity() {
    let (mut world, body, _floor) = drop_onto_floor();
    world.set_restitution(body, 0.5).unwrap();

    // Impact on step 9 at 9 units/s
    run_steps(&mut world, 0.1, 9).unwrap();
    assert_eq!(world.position(body).unwrap().y, 4.0);
    assert!(approx_eq_f32(world.velocity(body).unwrap().y, -4.5, 1e-4));
}

#[test]
fn test_restitution_uses_larger_of_pair() {
    let (mut world, body, floor) = drop_onto_floor();
    world.set_restitution(floor, 0.5).unwrap();

    run_steps(&mut world, 0.1, 9).unwrap();
    assert!(approx_eq_f32(world.velocity(body).unwrap().y, -4.5, 1e-4));
}

#[test]
fn test_bouncing_box_loses_height() {
    let (mut world, body, _floor) = drop_onto_floor();
    world.set_restitution(body, 0.5).unwrap();
    run_steps(&mut world, 0.1, 9).unwrap();

    // Apex of the first bounce is well below the drop height.
    let mut apex = f32::MAX;
    for _ in 0..10 {
        world.step(0.1).unwrap();
        apex = apex.min(world.position(body).unwrap().y);
    }
    assert!(apex > 2.0 && apex < 4.0, "apex = {}", apex);
}

#[test]
fn test_two_dynamic_bodies_share_response() {
    let mut world = empty_world(Vec2::ZERO);
    let left = world
        .insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE).with_velocity(Vec2::new(2.0, 0.0)))
        .unwrap();
    let right = world
        .insert(BodyDesc::dynamic(Vec2::new(1.5, 0.0), Vec2::ONE).with_velocity(Vec2::new(-2.0, 0.0)))
        .unwrap();

    run_steps(&mut world, 0.1, 2).unwrap();

    let lx = world.position(left).unwrap().x;
    let rx = world.position(right).unwrap().x;
    assert!(approx_eq_f32(rx - lx, 1.0, 1e-4), "pushed apart to touching, gap {}", rx - lx);
    assert!(approx_eq_f32(lx + rx, 1.5, 1e-4), "split evenly around the midpoint");
    assert!(approx_eq_f32(world.velocity(left).unwrap().x, 0.0, 1e-4));
    assert!(approx_eq_f32(world.velocity(right).unwrap().x, 0.0, 1e-4));
    assert!(world.contact_flags(left).unwrap().right_wall);
    assert!(world.contact_flags(right).unwrap().left_wall);
}

#[test]
fn test_disabled_y_axis_falls_through_floor() {
    let (mut world, body, _floor) = drop_onto_floor();
    world.set_collision_axes(body, CollisionAxes { x: true, y: false }).unwrap();

    run_steps(&mut world, 0.1, 15).unwrap();
    assert!(world.position(body).unwrap().y > 6.0);
    assert!(!world.contact_flags(body).unwrap().any());
}

#[test]
fn test_disabled_y_axis_still_stops_at_walls() {
    let mut world = empty_world(Vec2::ZERO);
    let body = world
        .insert(
            BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE)
                .with_velocity(Vec2::new(4.0, 0.0))
                .with_axes(CollisionAxes { x: true, y: false }),
        )
        .unwrap();
    world
        .insert(BodyDesc::fixed(Vec2::new(2.0, -2.0), Vec2::new(1.0, 5.0)))
        .unwrap();

    run_steps(&mut world, 0.1, 10).unwrap();
    assert!(approx_eq_f32(world.position(body).unwrap().x, 1.0, 1e-4));
    assert!(world.contact_flags(body).unwrap().right_wall);
}

#[test]
fn test_no_collision_axes_ignores_everything() {
    let (mut world, body, _floor) = drop_onto_floor();
    world.set_collision_axes(body, CollisionAxes::NONE).unwrap();

    let report = world.step(0.1).unwrap();
    assert_eq!(report.candidate_pairs, 0);
    run_steps(&mut world, 0.1, 15).unwrap();
    assert!(world.position(body).unwrap().y > 6.0);
}

#[test]
fn test_overflowing_body_is_held_and_reported() {
    let mut world = empty_world(Vec2::new(0.0, 10.0));
    let runaway = world
        .insert(
            BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE)
                .with_velocity(Vec2::new(f32::MAX, 0.0))
                .with_gravity_scale(0.0),
        )
        .unwrap();
    let faller = world.insert(BodyDesc::dynamic(Vec2::new(10.0, 0.0), Vec2::ONE)).unwrap();

    let report = world.step(10.0).unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::SkippedIntegration);
    assert_eq!(report.diagnostics[0].body, runaway);
    assert_eq!(world.position(runaway).unwrap(), Vec2::ZERO);
    assert_eq!(world.velocity(runaway).unwrap(), Vec2::new(f32::MAX, 0.0));

    // Other bodies still advance.
    assert_eq!(world.position(faller).unwrap(), Vec2::new(10.0, 1000.0));
}

#[test]
fn test_clean_step_report() {
    let (mut world, _body, _floor) = drop_onto_floor();
    let report = world.step(0.1).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.step, 1);
    assert_eq!(report.dt, 0.1);
    assert_eq!(report.bodies, 2);
    assert_eq!(report.passes, 1);
    assert_eq!(world.step_count(), 1);
}
