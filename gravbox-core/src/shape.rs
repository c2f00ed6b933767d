//! Axis-aligned box primitives and the overlap math built on them.
//!
//! Coordinates follow screen conventions: x grows to the right, y grows
//! downward, and a box is stored as its minimum (top-left) corner plus its
//! extents.

use glam::Vec2;

/// One of the two coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component of `v` along this axis.
    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Mutable component of `v` along this axis.
    #[inline]
    pub fn of_mut(self, v: &mut Vec2) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }
}

/// Axis-aligned bounding box: minimum corner plus extents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

/// Result of a ray or swept-box cast against an [`Aabb`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabHit {
    /// Fraction of the cast segment at which the ray enters the box.
    ///
    /// Clamped to `0.0` when the ray starts inside.
    pub toi: f32,
    /// Axis whose slab was entered last.
    pub axis: Axis,
    /// Outward surface normal of the face that was hit.
    pub normal: Vec2,
    /// Whether the origin already lay inside the box.
    pub started_inside: bool,
    /// Both slabs were entered at the same fraction: the segment runs into
    /// a corner and `axis` came from the tie-break.
    pub corner: bool,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Grows the box by `margin` on every side.
    pub fn inflated(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            size: self.size + Vec2::splat(2.0 * margin),
        }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Self {
        let min = self.min.min(other.min);
        let max = self.max().max(other.max());
        Self {
            min,
            size: max - min,
        }
    }

    /// Signed overlap per axis.
    ///
    /// Positive components are penetration depths, zero means touching and
    /// negative components are the gap between the boxes on that axis.
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        let lo = self.min.max(other.min);
        let hi = self.max().min(other.max());
        hi - lo
    }

    /// Overlap or contact within `tolerance` on both axes.
    pub fn touches(&self, other: &Aabb, tolerance: f32) -> bool {
        let o = self.overlap(other);
        o.x >= -tolerance && o.y >= -tolerance
    }

    /// Point containment, inclusive of the box edges.
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// Slab test of the segment `origin .. origin + delta` against this box.
    ///
    /// Returns `None` when the segment misses, only grazes an edge or corner,
    /// or runs parallel along a face. When both slabs are entered at the same
    /// fraction the `prefer` axis is reported.
    pub fn cast_segment(&self, origin: Vec2, delta: Vec2, prefer: Axis) -> Option<SlabHit> {
        let (x_near, x_far) = slab(origin.x, delta.x, self.min.x, self.max().x)?;
        let (y_near, y_far) = slab(origin.y, delta.y, self.min.y, self.max().y)?;

        let t_enter = x_near.max(y_near);
        let t_exit = x_far.min(y_far);
        if t_enter >= t_exit || t_exit < 0.0 || t_enter > 1.0 {
            return None;
        }

        let corner = x_near == y_near;
        let axis = if x_near > y_near {
            Axis::X
        } else if y_near > x_near {
            Axis::Y
        } else {
            prefer
        };

        let mut normal = Vec2::ZERO;
        *axis.of_mut(&mut normal) = -axis.of(delta).signum();

        Some(SlabHit {
            // Never -0.0, so times of impact order consistently.
            toi: if t_enter > 0.0 { t_enter } else { 0.0 },
            axis,
            normal,
            started_inside: t_enter < 0.0,
            corner,
        })
    }
}

/// Entry and exit fractions for a single axis, or `None` if a parallel
/// segment lies outside (or exactly on the boundary of) the slab.
fn slab(origin: f32, delta: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if delta.abs() <= f32::EPSILON {
        if origin <= min || origin >= max {
            return None;
        }
        return Some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let inv = 1.0 / delta;
    let t1 = (min - origin) * inv;
    let t2 = (max - origin) * inv;
    Some((t1.min(t2), t1.max(t2)))
}
