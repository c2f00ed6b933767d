//! Exact box-vs-box tests.
//!
//! A pair is first checked with a swept test when it moved further than its
//! own size during the step, so thin geometry cannot be skipped over. All
//! other pairs use the discrete overlap at their current positions and the
//! minimum-translation axis, optionally overridden by the side the body came
//! in from.

use crate::body::BodyHandle;
use crate::config::{TieBreak, WorldConfig};
use crate::contact::ContactManifold;
use crate::shape::{Aabb, Axis, SlabHit};
use glam::Vec2;

/// Knobs the narrow-phase reads from the world configuration.
#[derive(Debug, Clone, Copy)]
pub struct NarrowParams {
    pub epsilon: f32,
    pub tie_break: TieBreak,
    pub entry_axis_hint: bool,
    /// Sign of "down" on the y axis.
    pub down: f32,
    /// Swept testing is only done in the first resolution pass.
    pub sweep: bool,
}

impl NarrowParams {
    pub fn from_config(config: &WorldConfig, sweep: bool) -> Self {
        Self {
            epsilon: config.epsilon,
            tie_break: config.tie_break,
            entry_axis_hint: config.entry_axis_hint,
            down: config.down_sign(),
            sweep: sweep && config.swept_collisions,
        }
    }
}

/// A confirmed contact between `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub axis: Axis,
    /// Unit normal along `axis`, pointing from `b` toward `a`.
    pub normal: Vec2,
    /// Overlap per axis at evaluation time.
    pub depth: Vec2,
    /// Distance `a` must move along `normal` (relative to `b`) to stop penetrating.
    pub penetration: f32,
    pub toi: Option<f32>,
}

impl Contact {
    pub fn manifold(&self, a: BodyHandle, b: BodyHandle) -> ContactManifold {
        ContactManifold {
            a,
            b,
            depth: self.depth,
            axis: self.axis,
            normal: self.normal,
            toi: self.toi,
        }
    }
}

/// Tests `a` against `b`, given where each started the step and where it is now.
pub fn collide(
    a_start: &Aabb,
    a_now: &Aabb,
    b_start: &Aabb,
    b_now: &Aabb,
    params: &NarrowParams,
) -> Option<Contact> {
    if params.sweep {
        if let Some(contact) = swept(a_start, a_now, b_start, b_now, params) {
            return Some(contact);
        }
    }
    discrete(a_start, a_now, b_start, b_now, params)
}

/// Time of impact of `a` against `b` over the whole step, if the pair is
/// moving fast enough to be swept and the sweep hits.
///
/// Used to order first-pass contacts so the earliest impacts are resolved
/// first.
pub fn first_impact(
    a_start: &Aabb,
    a_end: &Aabb,
    b_start: &Aabb,
    b_end: &Aabb,
    params: &NarrowParams,
) -> Option<SlabHit> {
    if !params.sweep {
        return None;
    }
    cast(a_start, a_end, b_start, b_end, params)
}

/// Ray from `a`'s start centre along the relative displacement, against `b`
/// grown by `a`'s half extents, in `b`'s current frame.
fn cast(
    a_start: &Aabb,
    a_now: &Aabb,
    b_start: &Aabb,
    b_now: &Aabb,
    params: &NarrowParams,
) -> Option<SlabHit> {
    let b_shift = b_now.min - b_start.min;
    let delta = (a_now.min - a_start.min) - b_shift;
    let limit = a_now.size.min(b_now.size);
    if delta.x.abs() <= limit.x && delta.y.abs() <= limit.y {
        return None;
    }

    let origin = a_start.center() + b_shift;
    let target = Aabb::new(b_now.min - a_now.half_extents(), b_now.size + a_now.size);
    let hit = target.cast_segment(origin, delta, params.tie_break.axis())?;
    if hit.started_inside {
        return None;
    }
    Some(hit)
}

/// Earliest impact along the relative motion.
fn swept(
    a_start: &Aabb,
    a_now: &Aabb,
    b_start: &Aabb,
    b_now: &Aabb,
    params: &NarrowParams,
) -> Option<Contact> {
    let hit = cast(a_start, a_now, b_start, b_now, params)?;
    let sign = hit.axis.of(hit.normal);
    Some(Contact {
        axis: hit.axis,
        normal: hit.normal,
        depth: a_now.overlap(b_now),
        penetration: penetration_along(hit.axis, sign, a_now, b_now).max(0.0),
        toi: Some(hit.toi),
    })
}

fn discrete(
    a_start: &Aabb,
    a_now: &Aabb,
    b_start: &Aabb,
    b_now: &Aabb,
    params: &NarrowParams,
) -> Option<Contact> {
    let eps = params.epsilon;
    let depth = a_now.overlap(b_now);
    if depth.x < -eps || depth.y < -eps {
        return None;
    }
    // Corners meeting is not a contact.
    if depth.x <= eps && depth.y <= eps {
        return None;
    }

    let start_overlap = a_start.overlap(b_start);
    let entry = if params.entry_axis_hint {
        entry_axis(start_overlap, eps)
    } else {
        None
    };

    let axis = if depth.x <= eps {
        Axis::X
    } else if depth.y <= eps {
        Axis::Y
    } else if let Some(axis) = entry {
        axis
    } else if (depth.x - depth.y).abs() <= eps {
        params.tie_break.axis()
    } else if depth.x < depth.y {
        Axis::X
    } else {
        Axis::Y
    };

    // Push back toward the side the body came from when it was clear of `b`
    // on this axis at the start of the step, otherwise away from b's centre.
    let came_from = axis.of(a_start.center() - b_start.center());
    let offset = axis.of(a_now.center() - b_now.center());
    let sign = if params.entry_axis_hint && axis.of(start_overlap) <= eps && came_from != 0.0 {
        came_from.signum()
    } else if offset.abs() > f32::EPSILON {
        offset.signum()
    } else {
        match axis {
            Axis::X => -1.0,
            Axis::Y => -params.down,
        }
    };

    let mut normal = Vec2::ZERO;
    *axis.of_mut(&mut normal) = sign;
    Some(Contact {
        axis,
        normal,
        depth,
        penetration: penetration_along(axis, sign, a_now, b_now).max(0.0),
        toi: None,
    })
}

/// Axis the body entered along, when the pre-step overlap makes it clear.
///
/// Clear means separated on exactly one axis, or touching on one axis while
/// strictly apart on the other (sliding along a coplanar surface).
fn entry_axis(start_overlap: Vec2, eps: f32) -> Option<Axis> {
    let apart_x = start_overlap.x <= eps;
    let apart_y = start_overlap.y <= eps;
    match (apart_x, apart_y) {
        (true, false) => Some(Axis::X),
        (false, true) => Some(Axis::Y),
        (true, true) => {
            let touching_x = start_overlap.x >= -eps;
            let touching_y = start_overlap.y >= -eps;
            match (touching_x, touching_y) {
                (true, false) => Some(Axis::X),
                (false, true) => Some(Axis::Y),
                _ => None,
            }
        }
        (false, false) => None,
    }
}

/// How far `a` has to travel along `sign` on `axis` to rest against `b`'s face.
fn penetration_along(axis: Axis, sign: f32, a: &Aabb, b: &Aabb) -> f32 {
    if sign > 0.0 {
        axis.of(b.max()) - axis.of(a.min)
    } else {
        axis.of(a.max()) - axis.of(b.min)
    }
}
