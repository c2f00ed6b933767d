//! Bodies: plain data records owned and iterated by the world.

use crate::contact::ContactFlags;
use crate::error::{PhysicsError, Result};
use crate::shape::{Aabb, Axis};
use glam::Vec2;
use std::fmt;

/// Stable reference to a body inside one [`World`](crate::World).
///
/// The generation changes whenever a slot is freed, so a handle kept past
/// `remove_body` never resolves to a later body that reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl BodyHandle {
    /// Slot index, useful as a dense key on the caller's side.
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Opaque identifier the game layer attaches to a body. Never interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnerId(pub u64);

/// Mass class of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyKind {
    /// Affected by gravity and pushed out of contacts.
    Dynamic,
    /// Never moves; obstacle only.
    Static,
    /// Moves with its externally set velocity, ignores gravity, never pushed.
    Kinematic,
}

impl BodyKind {
    pub fn is_dynamic(self) -> bool {
        self == BodyKind::Dynamic
    }

    pub fn is_static(self) -> bool {
        self == BodyKind::Static
    }
}

/// Per-axis collision switches.
///
/// A disabled axis is never resolved for this body: with `y` off a body falls
/// through floors but still stops at walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionAxes {
    pub x: bool,
    pub y: bool,
}

impl CollisionAxes {
    pub const BOTH: Self = Self { x: true, y: true };
    pub const NONE: Self = Self { x: false, y: false };

    pub fn enabled(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn any(self) -> bool {
        self.x || self.y
    }
}

impl Default for CollisionAxes {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Everything needed to create a body. Build one with the kind constructors
/// and chain the `with_*` setters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyDesc {
    pub position: Vec2,
    pub size: Vec2,
    pub kind: BodyKind,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub restitution: f32,
    pub axes: CollisionAxes,
    pub owner: Option<OwnerId>,
}

impl BodyDesc {
    pub fn new(position: Vec2, size: Vec2, kind: BodyKind) -> Self {
        Self {
            position,
            size,
            kind,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            restitution: 0.0,
            axes: CollisionAxes::BOTH,
            owner: None,
        }
    }

    pub fn dynamic(position: Vec2, size: Vec2) -> Self {
        Self::new(position, size, BodyKind::Dynamic)
    }

    pub fn fixed(position: Vec2, size: Vec2) -> Self {
        Self::new(position, size, BodyKind::Static)
    }

    pub fn kinematic(position: Vec2, size: Vec2) -> Self {
        Self::new(position, size, BodyKind::Kinematic)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_axes(mut self, axes: CollisionAxes) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Checks the description and turns it into a body.
    ///
    /// Static bodies always start at rest regardless of the requested velocity.
    pub(crate) fn build(self) -> Result<Body> {
        if !self.size.is_finite() || self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Err(PhysicsError::DegenerateShape {
                width: self.size.x,
                height: self.size.y,
            });
        }
        if !self.position.is_finite() {
            return Err(PhysicsError::non_finite("position"));
        }
        if !self.velocity.is_finite() {
            return Err(PhysicsError::non_finite("velocity"));
        }
        if !self.gravity_scale.is_finite() {
            return Err(PhysicsError::non_finite("gravity scale"));
        }
        check_restitution(self.restitution)?;

        let velocity = if self.kind.is_static() {
            Vec2::ZERO
        } else {
            self.velocity
        };

        Ok(Body {
            shape: Aabb::new(self.position, self.size),
            velocity,
            kind: self.kind,
            gravity_scale: self.gravity_scale,
            restitution: self.restitution,
            axes: self.axes,
            owner: self.owner,
            contacts: ContactFlags::default(),
        })
    }
}

pub(crate) fn check_restitution(restitution: f32) -> Result<()> {
    if !restitution.is_finite() {
        return Err(PhysicsError::non_finite("restitution"));
    }
    if restitution < 0.0 {
        return Err(PhysicsError::InvalidConfig(format!(
            "restitution must be non-negative, got {restitution}"
        )));
    }
    Ok(())
}

/// A simulated box.
///
/// Fields are read through accessors; every mutation goes through
/// [`World`](crate::World) so input validation cannot be bypassed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub(crate) shape: Aabb,
    pub(crate) velocity: Vec2,
    pub(crate) kind: BodyKind,
    pub(crate) gravity_scale: f32,
    pub(crate) restitution: f32,
    pub(crate) axes: CollisionAxes,
    pub(crate) owner: Option<OwnerId>,
    pub(crate) contacts: ContactFlags,
}

impl Body {
    /// Minimum (top-left) corner.
    pub fn position(&self) -> Vec2 {
        self.shape.min
    }

    pub fn size(&self) -> Vec2 {
        self.shape.size
    }

    pub fn aabb(&self) -> Aabb {
        self.shape
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn axes(&self) -> CollisionAxes {
        self.axes
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Contact flags from the most recent step.
    pub fn contacts(&self) -> &ContactFlags {
        &self.contacts
    }
}
