//! Handle lifetimes and input validation

use gravbox_core::tests::test_helpers::{drop_onto_floor, empty_world, snapshot, snapshots_bit_equal};
use gravbox_core::{BodyDesc, BodyKind, CollisionAxes, PhysicsError, World, WorldConfig};
use glam::Vec2;

#[test]
fn test_stale_handle_is_rejected() {
    let mut world = empty_world(Vec2::ZERO);
    let a = world.create_body(Vec2::ZERO, Vec2::ONE, BodyKind::Dynamic, 1.0).unwrap();
    let b = world.create_body(Vec2::new(3.0, 0.0), Vec2::ONE, BodyKind::Dynamic, 1.0).unwrap();

    let removed = world.remove_body(a).unwrap();
    assert_eq!(removed.position(), Vec2::ZERO);
    assert!(!world.contains(a));
    assert_eq!(world.len(), 1);

    assert_eq!(world.position(a), Err(PhysicsError::InvalidHandle(a)));
    assert_eq!(world.set_velocity(a, Vec2::X), Err(PhysicsError::InvalidHandle(a)));
    assert!(matches!(world.remove_body(a), Err(PhysicsError::InvalidHandle(h)) if h == a));

    // The freed slot is reused under a new generation.
    let c = world.create_body(Vec2::new(6.0, 0.0), Vec2::ONE, BodyKind::Dynamic, 1.0).unwrap();
    assert_eq!(c.index(), a.index());
    assert_ne!(c, a);
    assert!(world.position(a).is_err(), "old handle must not resolve to the new body");
    assert_eq!(world.position(c).unwrap(), Vec2::new(6.0, 0.0));
    assert_eq!(world.position(b).unwrap(), Vec2::new(3.0, 0.0));
}

#[test]
fn test_free_slots_reused_lowest_first() {
    let mut world = empty_world(Vec2::ZERO);
    let handles: Vec<_> = (0..4)
        .map(|i| world.insert(BodyDesc::dynamic(Vec2::new(i as f32 * 2.0, 0.0), Vec2::ONE)).unwrap())
        .collect();
    world.remove_body(handles[2]).unwrap();
    world.remove_body(handles[0]).unwrap();

    let first = world.insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE)).unwrap();
    let second = world.insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE)).unwrap();
    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 2);
}

#[test]
fn test_degenerate_shapes_rejected() {
    let mut world = empty_world(Vec2::ZERO);
    for size in [Vec2::new(0.0, 1.0), Vec2::new(1.0, -2.0), Vec2::new(f32::NAN, 1.0)] {
        let result = world.create_body(Vec2::ZERO, size, BodyKind::Dynamic, 1.0);
        assert!(
            matches!(result, Err(PhysicsError::DegenerateShape { .. })),
            "size {} should be rejected, got {:?}",
            size,
            result
        );
    }
    assert_eq!(
        world.create_body(Vec2::ZERO, Vec2::new(0.0, 1.0), BodyKind::Static, 1.0),
        Err(PhysicsError::DegenerateShape {
            width: 0.0,
            height: 1.0
        })
    );
    assert!(world.is_empty());
}

#[test]
fn test_non_finite_inputs_leave_state_untouched() {
    let (mut world, body, _floor) = drop_onto_floor();
    world.step(0.1).unwrap();
    let before = snapshot(&world);

    assert!(matches!(
        world.set_velocity(body, Vec2::new(f32::NAN, 0.0)),
        Err(PhysicsError::NonFiniteValue { .. })
    ));
    assert!(matches!(
        world.set_position(body, Vec2::new(0.0, f32::INFINITY)),
        Err(PhysicsError::NonFiniteValue { .. })
    ));
    assert!(matches!(
        world.set_gravity_scale(body, f32::NAN),
        Err(PhysicsError::NonFiniteValue { .. })
    ));
    assert!(matches!(
        world.set_gravity(Vec2::new(0.0, f32::NEG_INFINITY)),
        Err(PhysicsError::NonFiniteValue { .. })
    ));
    assert!(matches!(
        world.create_body(Vec2::new(f32::NAN, 0.0), Vec2::ONE, BodyKind::Dynamic, 1.0),
        Err(PhysicsError::NonFiniteValue { .. })
    ));
    assert!(matches!(
        world.insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE).with_velocity(Vec2::splat(f32::INFINITY))),
        Err(PhysicsError::NonFiniteValue { .. })
    ));

    assert_eq!(world.len(), 2);
    assert_eq!(world.gravity(), Vec2::new(0.0, 10.0));
    assert!(snapshots_bit_equal(&before, &snapshot(&world)));
}

#[test]
fn test_invalid_timestep_rejected_without_side_effects() {
    let (mut world, _body, _floor) = drop_onto_floor();
    world.step(0.1).unwrap();
    let before = snapshot(&world);

    for dt in [0.0, -0.1, f32::NAN, f32::INFINITY] {
        let result = world.step(dt);
        assert!(
            matches!(result, Err(PhysicsError::InvalidTimestep(_))),
            "dt {} should be rejected",
            dt
        );
    }
    assert_eq!(world.step_count(), 1);
    assert!(snapshots_bit_equal(&before, &snapshot(&world)));
}

#[test]
fn test_static_bodies_reject_velocity() {
    let (mut world, _body, floor) = drop_onto_floor();
    assert_eq!(
        world.set_velocity(floor, Vec2::new(1.0, 0.0)),
        Err(PhysicsError::StaticBody(floor))
    );
    assert_eq!(world.velocity(floor).unwrap(), Vec2::ZERO);

    // A requested velocity on a static description is dropped.
    let wall = world
        .insert(BodyDesc::fixed(Vec2::new(20.0, 0.0), Vec2::ONE).with_velocity(Vec2::X))
        .unwrap();
    assert_eq!(world.velocity(wall).unwrap(), Vec2::ZERO);

    // Teleporting level geometry is allowed.
    world.set_position(floor, Vec2::new(-5.0, 8.0)).unwrap();
    assert_eq!(world.position(floor).unwrap(), Vec2::new(-5.0, 8.0));
}

#[test]
fn test_negative_restitution_rejected() {
    let (mut world, body, _floor) = drop_onto_floor();
    assert!(matches!(
        world.set_restitution(body, -0.5),
        Err(PhysicsError::InvalidConfig(_))
    ));
    assert!(matches!(
        world.insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE).with_restitution(-1.0)),
        Err(PhysicsError::InvalidConfig(_))
    ));
    assert_eq!(world.body(body).unwrap().restitution(), 0.0);
}

#[test]
fn test_invalid_config_rejected() {
    let bad = [
        WorldConfig::default().with_timestep(0.0),
        WorldConfig::default().with_epsilon(-1.0),
        WorldConfig::default().with_cell_size(0.0),
        WorldConfig::default().with_gravity(Vec2::new(f32::NAN, 0.0)),
    ];
    for config in bad {
        assert!(
            matches!(World::with_config(config.clone()), Err(PhysicsError::InvalidConfig(_))),
            "{:?} should be rejected",
            config
        );
    }

    let mut world = World::new();
    assert!(world.set_config(WorldConfig::default().with_timestep(-1.0)).is_err());
    assert_eq!(world.config(), &WorldConfig::default());
}

#[test]
fn test_setters_apply() {
    let mut world = empty_world(Vec2::ZERO);
    let body = world.insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE)).unwrap();

    world.set_gravity_scale(body, 0.5).unwrap();
    world.set_restitution(body, 0.25).unwrap();
    world.set_collision_axes(body, CollisionAxes { x: true, y: false }).unwrap();

    let b = world.body(body).unwrap();
    assert_eq!(b.gravity_scale(), 0.5);
    assert_eq!(b.restitution(), 0.25);
    assert_eq!(b.axes(), CollisionAxes { x: true, y: false });
    assert_eq!(b.kind(), BodyKind::Dynamic);
    assert_eq!(b.owner(), None);
}

#[test]
fn test_error_messages() {
    let (_world, body, _) = drop_onto_floor();
    let err = PhysicsError::InvalidHandle(body);
    assert_eq!(err.to_string(), format!("invalid body handle {}", body));
    assert_eq!(PhysicsError::InvalidTimestep(0.0).to_string(), "invalid timestep 0");
}
