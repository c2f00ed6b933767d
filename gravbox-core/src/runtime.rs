use crate::body::{BodyHandle, BodyKind, OwnerId};
use crate::contact::ContactFlags;
use crate::diagnostics::StepReport;
use crate::error::{PhysicsError, Result};
use crate::world::World;
use glam::Vec2;

/// Default cap on steps run by a single [`Simulation::advance`] call.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Plain copy of one body's state, for rendering and logging.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub handle: BodyHandle,
    pub kind: BodyKind,
    pub owner: Option<OwnerId>,
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub contacts: ContactFlags,
}

/// Current state of every body in slot order.
pub fn body_states(world: &World) -> Vec<BodyState> {
    world
        .bodies()
        .map(|(handle, body)| BodyState {
            handle,
            kind: body.kind(),
            owner: body.owner(),
            position: body.position(),
            size: body.size(),
            velocity: body.velocity(),
            contacts: *body.contacts(),
        })
        .collect()
}

/// Fixed-timestep driver around a [`World`].
///
/// Real elapsed time is accumulated and consumed in steps of the world's
/// configured timestep, so the simulation behaves the same at any frame rate.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    accumulator: f32,
    max_substeps: u32,
    last_report: Option<StepReport>,
}

impl Simulation {
    pub fn new(world: World) -> Self {
        Self {
            world,
            accumulator: 0.0,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            last_report: None,
        }
    }

    /// Limits how many steps one `advance` may run; the excess backlog is dropped.
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    /// Feeds `elapsed` seconds of real time and runs the steps that fit.
    ///
    /// Returns the number of steps taken.
    pub fn advance(&mut self, elapsed: f32) -> Result<u32> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(PhysicsError::InvalidTimestep(elapsed));
        }
        let dt = self.world.config().timestep;
        self.accumulator += elapsed;

        let mut taken = 0;
        while self.accumulator >= dt && taken < self.max_substeps {
            self.last_report = Some(self.world.tick()?);
            self.accumulator -= dt;
            taken += 1;
        }
        if self.accumulator >= dt {
            log::warn!(
                "simulation fell behind by {:.4}s, dropping backlog",
                self.accumulator
            );
            self.accumulator %= dt;
        }
        Ok(taken)
    }

    /// Runs exactly `steps` fixed steps, ignoring the accumulator.
    pub fn run_steps(&mut self, steps: u32) -> Result<()> {
        for _ in 0..steps {
            self.last_report = Some(self.world.tick()?);
        }
        Ok(())
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.world.config().timestep).clamp(0.0, 1.0)
    }

    pub fn last_report(&self) -> Option<&StepReport> {
        self.last_report.as_ref()
    }

    pub fn snapshot(&self) -> Vec<BodyState> {
        body_states(&self.world)
    }
}
