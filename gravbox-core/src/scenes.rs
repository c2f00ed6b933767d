//! Built-in demonstration scenes.
//!
//! The first six are the classic falling/sliding/tunneling setups, in
//! per-frame units (one step is one frame, gravity one unit per frame
//! squared). `rest` and `bullet` are the reference scenarios for resting
//! contact and fast-body wall hits.

use crate::body::{BodyDesc, OwnerId};
use crate::config::WorldConfig;
use crate::error::Result;
use crate::world::World;
use glam::Vec2;

/// A named, reproducible world setup.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub name: &'static str,
    pub description: &'static str,
    /// Timestep the scene is meant to run with.
    pub dt: f32,
    /// Steps to run by default.
    pub steps: u32,
    gravity: Vec2,
    bodies: fn() -> Vec<BodyDesc>,
}

impl Scene {
    /// Builds a fresh world for this scene.
    pub fn build(&self) -> Result<World> {
        let config = WorldConfig::default()
            .with_gravity(self.gravity)
            .with_timestep(self.dt);
        let mut world = World::with_config(config)?;
        for desc in (self.bodies)() {
            world.insert(desc)?;
        }
        Ok(world)
    }
}

const FRAME_GRAVITY: Vec2 = Vec2::new(0.0, 1.0);

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

fn player(position: Vec2, size: Vec2) -> BodyDesc {
    BodyDesc::dynamic(position, size).with_owner(OwnerId(1))
}

fn ground() -> BodyDesc {
    BodyDesc::fixed(v(0.0, 30.0), v(16.0, 3.0)).with_owner(OwnerId(100))
}

fn pillar() -> BodyDesc {
    BodyDesc::fixed(v(12.0, 12.0), v(3.0, 20.0)).with_owner(OwnerId(101))
}

static SCENES: [Scene; 8] = [
    Scene {
        name: "normal",
        description: "box falls from rest onto the ground",
        dt: 1.0,
        steps: 40,
        gravity: FRAME_GRAVITY,
        bodies: || vec![player(v(4.0, 10.0), v(3.0, 3.0)), ground()],
    },
    Scene {
        name: "tunnel",
        description: "box thrown down at the ground",
        dt: 1.0,
        steps: 40,
        gravity: FRAME_GRAVITY,
        bodies: || {
            vec![
                player(v(4.0, 0.0), v(3.0, 3.0)).with_velocity(v(0.0, 2.0)),
                ground(),
            ]
        },
    },
    Scene {
        name: "hslide",
        description: "box moving right lands on the ground and keeps sliding",
        dt: 1.0,
        steps: 40,
        gravity: FRAME_GRAVITY,
        bodies: || {
            vec![
                player(v(-2.0, 20.0), v(3.0, 3.0)).with_velocity(v(2.0, 0.0)),
                ground(),
            ]
        },
    },
    Scene {
        name: "vslide",
        description: "box moving right hits a pillar and slides down its side",
        dt: 1.0,
        steps: 40,
        gravity: FRAME_GRAVITY,
        bodies: || {
            vec![
                player(v(0.0, 0.0), v(3.0, 3.0)).with_velocity(v(2.0, 0.0)),
                pillar(),
            ]
        },
    },
    Scene {
        name: "vsxvel",
        description: "diagonal gravity pulls a box against a pillar",
        dt: 1.0,
        steps: 40,
        gravity: Vec2::new(1.0, 1.0),
        bodies: || vec![player(v(0.0, 0.0), v(3.0, 3.0)), pillar()],
    },
    Scene {
        name: "tnlbig",
        description: "large box thrown hard at a thin ground",
        dt: 1.0,
        steps: 40,
        gravity: FRAME_GRAVITY,
        bodies: || {
            vec![
                player(v(4.0, -4.0), v(8.0, 8.0)).with_velocity(v(0.0, 20.0)),
                ground(),
            ]
        },
    },
    Scene {
        name: "rest",
        description: "unit box dropped on a floor whose top is at y = 5",
        dt: 0.1,
        steps: 100,
        gravity: Vec2::new(0.0, 10.0),
        bodies: || {
            vec![
                player(v(0.0, 0.0), v(1.0, 1.0)),
                BodyDesc::fixed(v(-5.0, 5.0), v(10.0, 1.0)).with_owner(OwnerId(100)),
            ]
        },
    },
    Scene {
        name: "bullet",
        description: "box at 100 units/s against a one unit thick wall",
        dt: 0.1,
        steps: 10,
        gravity: Vec2::ZERO,
        bodies: || {
            vec![
                player(v(0.0, 0.0), v(1.0, 1.0)).with_velocity(v(100.0, 0.0)),
                BodyDesc::fixed(v(5.0, -2.0), v(1.0, 5.0)).with_owner(OwnerId(101)),
            ]
        },
    },
];

pub fn scenes() -> &'static [Scene] {
    &SCENES
}

pub fn find(name: &str) -> Option<&'static Scene> {
    SCENES.iter().find(|scene| scene.name == name)
}
