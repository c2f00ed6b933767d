//! World configuration.

use crate::error::{PhysicsError, Result};
use crate::shape::Axis;
use glam::Vec2;

/// Standard gravity in world units per second squared, pointing down (+y).
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 9.81);

/// Default fixed timestep: 60 steps per second.
pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

/// Default positional tolerance.
pub const DEFAULT_EPSILON: f32 = 1e-4;

/// Axis chosen when a contact penetrates equally on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// Resolve equal-depth contacts as wall hits.
    #[default]
    PreferX,
    /// Resolve equal-depth contacts as floor/ceiling hits.
    PreferY,
}

impl TieBreak {
    pub fn axis(self) -> Axis {
        match self {
            TieBreak::PreferX => Axis::X,
            TieBreak::PreferY => Axis::Y,
        }
    }
}

/// Tunables for a [`World`](crate::World).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Constant acceleration applied to dynamic bodies.
    pub gravity: Vec2,
    /// Step length used by [`World::tick`](crate::World::tick).
    pub timestep: f32,
    /// Distance under which bodies count as touching and penetration counts as resolved.
    pub epsilon: f32,
    /// Broad-phase cell size. `None` sizes cells to the largest body dimension.
    pub cell_size: Option<f32>,
    /// Axis used when penetration depths are equal.
    pub tie_break: TieBreak,
    /// Let the pre-step position decide the contact axis when it is unambiguous.
    pub entry_axis_hint: bool,
    /// Upper bound on resolution passes per step (at least one).
    pub position_iterations: u32,
    /// Sweep pairs that move further than their own size in one step.
    /// Without it fast bodies can pass through thin geometry.
    pub swept_collisions: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            timestep: DEFAULT_TIMESTEP,
            epsilon: DEFAULT_EPSILON,
            cell_size: None,
            tie_break: TieBreak::default(),
            entry_axis_hint: true,
            position_iterations: 4,
            swept_collisions: true,
        }
    }
}

impl WorldConfig {
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_entry_axis_hint(mut self, enabled: bool) -> Self {
        self.entry_axis_hint = enabled;
        self
    }

    pub fn with_position_iterations(mut self, iterations: u32) -> Self {
        self.position_iterations = iterations;
        self
    }

    pub fn with_swept_collisions(mut self, enabled: bool) -> Self {
        self.swept_collisions = enabled;
        self
    }

    /// Sign of "down" on the y axis, derived from gravity. Zero gravity is
    /// treated as screen coordinates (+y down).
    pub fn down_sign(&self) -> f32 {
        if self.gravity.y < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        if let Some(cell) = self.cell_size {
            if !cell.is_finite() || cell <= 0.0 {
                return Err(PhysicsError::InvalidConfig(format!(
                    "cell size must be positive, got {cell}"
                )));
            }
        }
        if self.position_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "position_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
