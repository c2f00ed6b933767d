//! Spatial queries against the bodies' current boxes.
//!
//! Queries scan the registry in slot order; they are meant for a handful of
//! probes per frame (ground checks, line of sight), not bulk work.

use crate::body::BodyHandle;
use crate::registry::BodyRegistry;
use crate::shape::{Aabb, Axis};
use glam::Vec2;

/// Nearest body hit by [`World::raycast`](crate::World::raycast).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyHandle,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    pub point: Vec2,
    /// Outward normal of the face that was hit; the reversed ray direction
    /// when the origin starts inside the body.
    pub normal: Vec2,
}

pub(crate) fn point(registry: &BodyRegistry, p: Vec2) -> impl Iterator<Item = BodyHandle> + '_ {
    registry
        .iter()
        .filter(move |(_, body)| body.shape.contains_point(p))
        .map(|(handle, _)| handle)
}

pub(crate) fn region(registry: &BodyRegistry, region: Aabb) -> Vec<BodyHandle> {
    registry
        .iter()
        .filter(|(_, body)| body.shape.touches(&region, 0.0))
        .map(|(handle, _)| handle)
        .collect()
}

pub(crate) fn ray(
    registry: &BodyRegistry,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    exclude: Option<BodyHandle>,
) -> Option<RayHit> {
    let direction = direction.try_normalize()?;
    if !origin.is_finite() || !max_distance.is_finite() || max_distance < 0.0 {
        return None;
    }
    let delta = direction * max_distance;

    let mut best: Option<RayHit> = None;
    for (handle, body) in registry.iter() {
        if Some(handle) == exclude {
            continue;
        }
        let Some(hit) = body.shape.cast_segment(origin, delta, Axis::X) else {
            continue;
        };
        let distance = hit.toi * max_distance;
        if best.map_or(true, |b| distance < b.distance) {
            let normal = if hit.started_inside {
                -direction
            } else {
                hit.normal
            };
            best = Some(RayHit {
                body: handle,
                distance,
                point: origin + direction * distance,
                normal,
            });
        }
    }
    best
}
