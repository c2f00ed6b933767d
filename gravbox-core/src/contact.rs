//! Contact flags published per body and the manifolds produced during a step.

use crate::body::{BodyHandle, OwnerId};
use crate::shape::Axis;
use glam::Vec2;

/// The other party of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactRef {
    pub body: BodyHandle,
    pub owner: Option<OwnerId>,
}

/// Which sides of a body touched something during the last step.
///
/// Flags only ever get set while a step runs; they are cleared wholesale at
/// the start of the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactFlags {
    /// Standing on something (contact opposing gravity).
    pub grounded: bool,
    /// Something above pressed against the body.
    pub ceiling: bool,
    /// Something on the left (smaller x) side.
    pub left_wall: bool,
    /// Something on the right (larger x) side.
    pub right_wall: bool,
    /// First body contacted this step.
    pub other: Option<ContactRef>,
    /// First body that supported this one from below.
    pub ground: Option<ContactRef>,
}

/// A single side of a body, as seen from that body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Ground,
    Ceiling,
    LeftWall,
    RightWall,
}

impl Side {
    /// The side the other body sees for the same contact.
    pub fn mirrored(self) -> Self {
        match self {
            Side::Ground => Side::Ceiling,
            Side::Ceiling => Side::Ground,
            Side::LeftWall => Side::RightWall,
            Side::RightWall => Side::LeftWall,
        }
    }

    /// Side touched by a body pushed along `normal`.
    ///
    /// `down` is the sign of "down" on the y axis: `1.0` when gravity points
    /// toward +y (screen coordinates), `-1.0` for y-up worlds.
    pub fn from_normal(axis: Axis, normal: Vec2, down: f32) -> Self {
        match axis {
            Axis::X if normal.x > 0.0 => Side::LeftWall,
            Axis::X => Side::RightWall,
            Axis::Y if normal.y * down < 0.0 => Side::Ground,
            Axis::Y => Side::Ceiling,
        }
    }
}

impl ContactFlags {
    pub fn any(&self) -> bool {
        self.grounded || self.ceiling || self.left_wall || self.right_wall
    }

    /// Touching a wall on either side.
    pub fn on_wall(&self) -> bool {
        self.left_wall || self.right_wall
    }

    pub fn touching(&self, side: Side) -> bool {
        match side {
            Side::Ground => self.grounded,
            Side::Ceiling => self.ceiling,
            Side::LeftWall => self.left_wall,
            Side::RightWall => self.right_wall,
        }
    }

    /// Accumulates a contact. Earlier references are kept.
    pub(crate) fn mark(&mut self, side: Side, other: ContactRef) {
        match side {
            Side::Ground => {
                self.grounded = true;
                self.ground.get_or_insert(other);
            }
            Side::Ceiling => self.ceiling = true,
            Side::LeftWall => self.left_wall = true,
            Side::RightWall => self.right_wall = true,
        }
        self.other.get_or_insert(other);
    }
}

/// Description of one resolved (or touching) contact between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactManifold {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Overlap on each axis at the time the contact was evaluated.
    pub depth: Vec2,
    /// Axis along which separation was applied.
    pub axis: Axis,
    /// Unit normal along `axis`, pointing from `b` toward `a`.
    pub normal: Vec2,
    /// Fraction of the step at which the swept test found the impact.
    pub toi: Option<f32>,
}

impl ContactManifold {
    /// Penetration along the resolved axis.
    pub fn penetration(&self) -> f32 {
        self.axis.of(self.depth).max(0.0)
    }
}
