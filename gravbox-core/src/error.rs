//! Error types for world and body operations.

use crate::body::BodyHandle;
use thiserror::Error;

/// Errors returned by fallible [`World`](crate::World) operations.
///
/// None of these are fatal: the world keeps its previous valid state whenever
/// one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PhysicsError {
    /// The handle refers to a body that was removed or never existed.
    #[error("invalid body handle {0}")]
    InvalidHandle(BodyHandle),

    /// Body size must be strictly positive and finite on both axes.
    #[error("degenerate shape: width {width}, height {height}")]
    DegenerateShape { width: f32, height: f32 },

    /// A NaN or infinite value was supplied to a mutating call.
    #[error("non-finite value supplied for {what}")]
    NonFiniteValue { what: &'static str },

    /// Static bodies never move, so they cannot be given a velocity.
    #[error("body {0} is static")]
    StaticBody(BodyHandle),

    /// The step duration must be finite and greater than zero.
    #[error("invalid timestep {0}")]
    InvalidTimestep(f32),

    /// A [`WorldConfig`](crate::WorldConfig) field is out of range.
    #[error("invalid world config: {0}")]
    InvalidConfig(String),
}

impl PhysicsError {
    pub(crate) fn non_finite(what: &'static str) -> Self {
        Self::NonFiniteValue { what }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PhysicsError>;
