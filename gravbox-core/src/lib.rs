//! gravbox: a deterministic 2D gravity-and-collision engine for platformers.
//!
//! Bodies are axis-aligned boxes living in a [`World`]. Each call to
//! [`World::step`] integrates gravity and velocity, prunes candidate pairs on
//! a uniform grid, resolves contacts (with a swept test for fast movers) and
//! publishes per-body [`ContactFlags`] such as `grounded`.

pub mod body;
pub mod broadphase;
pub mod config;
pub mod contact;
pub mod diagnostics;
pub mod error;
pub mod integrator;
pub mod narrowphase;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod runtime;
pub mod scenes;
pub mod shape;
pub mod world;

pub use body::{Body, BodyDesc, BodyHandle, BodyKind, CollisionAxes, OwnerId};
pub use config::{TieBreak, WorldConfig, DEFAULT_EPSILON, DEFAULT_GRAVITY, DEFAULT_TIMESTEP};
pub use contact::{ContactFlags, ContactManifold, ContactRef, Side};
pub use diagnostics::{Diagnostic, DiagnosticKind, StepReport};
pub use error::{PhysicsError, Result};
pub use query::RayHit;
pub use runtime::{body_states, BodyState, Simulation};
pub use shape::{Aabb, Axis};
pub use world::World;

// Test helpers module (public for integration tests)
pub mod tests;
