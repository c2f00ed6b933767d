//! Fast movers must not pass through thin geometry

use gravbox_core::scenes;
use gravbox_core::tests::test_helpers::{approx_eq_f32, empty_world, run_steps};
use gravbox_core::{Axis, BodyDesc};
use glam::Vec2;

#[test]
fn test_bullet_stops_at_wall() {
    let mut world = scenes::find("bullet").unwrap().build().unwrap();
    let (bullet, wall) = {
        let handles: Vec<_> = world.bodies().map(|(h, _)| h).collect();
        (handles[0], handles[1])
    };

    world.step(0.1).unwrap();

    let pos = world.position(bullet).unwrap();
    assert_eq!(pos.x, 4.0, "bullet should be flush with the wall's left face");
    assert_eq!(pos.y, 0.0);
    assert_eq!(world.velocity(bullet).unwrap().x, 0.0);

    let flags = world.contact_flags(bullet).unwrap();
    assert!(flags.right_wall);
    assert!(!flags.grounded);
    assert_eq!(flags.other.map(|c| c.body), Some(wall));

    let manifold = world.contacts()[0];
    assert_eq!(manifold.axis, Axis::X);
    assert_eq!(manifold.normal, Vec2::new(-1.0, 0.0));
    let toi = manifold.toi.expect("swept contact should carry a time of impact");
    assert!(approx_eq_f32(toi, 0.4, 1e-5), "toi = {}", toi);
}

#[test]
fn test_bullet_stays_stopped() {
    let scene = scenes::find("bullet").unwrap();
    let mut world = scene.build().unwrap();
    run_steps(&mut world, scene.dt, scene.steps as usize).unwrap();

    let (bullet, _) = world.bodies().next().unwrap();
    assert_eq!(world.position(bullet).unwrap(), Vec2::new(4.0, 0.0));
    assert_eq!(world.velocity(bullet).unwrap(), Vec2::ZERO);
    assert!(world.contact_flags(bullet).unwrap().right_wall);
}

#[test]
fn test_no_tunneling_across_speeds_and_timesteps() {
    let speeds = [20.0, 50.0, 100.0, 500.0, 1000.0, 5000.0];
    let timesteps = [1.0 / 120.0, 1.0 / 60.0, 0.05, 0.1];

    for &speed in &speeds {
        for &dt in &timesteps {
            let mut world = empty_world(Vec2::ZERO);
            let body = world
                .insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE).with_velocity(Vec2::new(speed, 0.0)))
                .unwrap();
            world
                .insert(BodyDesc::fixed(Vec2::new(5.0, -2.0), Vec2::new(1.0, 5.0)))
                .unwrap();

            let steps = (10.0 / (speed * dt)).ceil() as usize + 2;
            for step in 0..steps {
                world.step(dt).unwrap();
                let x = world.position(body).unwrap().x;
                assert!(
                    x <= 4.0 + 1e-3,
                    "speed {} dt {}: body passed the wall face at step {} (x = {})",
                    speed,
                    dt,
                    step,
                    x
                );
            }

            let x = world.position(body).unwrap().x;
            assert!(
                approx_eq_f32(x, 4.0, 1e-3),
                "speed {} dt {}: body should end against the wall, x = {}",
                speed,
                dt,
                x
            );
            assert!(world.contact_flags(body).unwrap().right_wall);
        }
    }
}

#[test]
fn test_no_tunneling_when_falling_under_gravity() {
    let speeds = [20.0, 50.0, 100.0, 500.0, 1000.0, 5000.0];
    let timesteps = [1.0 / 120.0, 1.0 / 60.0, 0.05, 0.1];

    for &speed in &speeds {
        for &dt in &timesteps {
            let mut world = empty_world(Vec2::new(0.0, 10.0));
            let body = world
                .insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE).with_velocity(Vec2::new(0.0, speed)))
                .unwrap();
            let floor = world
                .insert(BodyDesc::fixed(Vec2::new(-5.0, 10.0), Vec2::new(10.0, 0.5)))
                .unwrap();

            let steps = (9.0 / (speed * dt)).ceil() as usize + 3;
            for step in 0..steps {
                world.step(dt).unwrap();
                let y = world.position(body).unwrap().y;
                assert!(
                    y <= 9.0 + 1e-3,
                    "speed {} dt {}: body sank through the floor at step {} (y = {})",
                    speed,
                    dt,
                    step,
                    y
                );
            }

            let y = world.position(body).unwrap().y;
            assert!(
                approx_eq_f32(y, 9.0, 1e-3),
                "speed {} dt {}: body should rest on the floor, y = {}",
                speed,
                dt,
                y
            );
            assert_eq!(world.velocity(body).unwrap().y, 0.0);
            let flags = world.contact_flags(body).unwrap();
            assert!(flags.grounded);
            assert_eq!(flags.ground.map(|c| c.body), Some(floor));
        }
    }
}

#[test]
fn test_bullet_tunnels_with_sweeping_off() {
    let mut world = scenes::find("bullet").unwrap().build().unwrap();
    let config = world.config().clone().with_swept_collisions(false);
    world.set_config(config).unwrap();
    let (bullet, _) = world.bodies().next().unwrap();

    world.step(0.1).unwrap();

    assert_eq!(world.position(bullet).unwrap().x, 10.0);
    assert_eq!(world.velocity(bullet).unwrap().x, 100.0);
    assert!(!world.contact_flags(bullet).unwrap().any());
    assert!(world.contacts().is_empty());
}

#[test]
fn test_heavy_box_thrown_at_thin_ground() {
    let scene = scenes::find("tnlbig").unwrap();
    let mut world = scene.build().unwrap();
    run_steps(&mut world, scene.dt, scene.steps as usize).unwrap();

    let (player, _) = world.bodies().next().unwrap();
    let pos = world.position(player).unwrap();
    assert_eq!(pos.y, 22.0, "8x8 box should rest on the ground top at y = 30");
    assert_eq!(pos.x, 4.0);
    assert!(world.contact_flags(player).unwrap().grounded);
}

#[test]
fn test_fast_fall_onto_one_unit_tile() {
    let mut world = empty_world(Vec2::new(0.0, 10.0));
    let body = world
        .insert(BodyDesc::dynamic(Vec2::ZERO, Vec2::ONE).with_velocity(Vec2::new(0.0, 400.0)))
        .unwrap();
    world
        .insert(BodyDesc::fixed(Vec2::new(0.0, 20.0), Vec2::ONE))
        .unwrap();

    world.step(0.1).unwrap();

    assert_eq!(world.position(body).unwrap().y, 19.0);
    assert_eq!(world.velocity(body).unwrap().y, 0.0);
    assert!(world.contact_flags(body).unwrap().grounded);
}
