use crate::body::{Body, BodyHandle, BodyKind, CollisionAxes};
use crate::diagnostics::{Diagnostic, StepReport};
use crate::registry::BodyRegistry;
use crate::shape::Aabb;
use glam::Vec2;

/// Where one body started and ended the integration phase of a step.
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    pub slot: usize,
    pub handle: BodyHandle,
    pub kind: BodyKind,
    pub axes: CollisionAxes,
    pub start: Aabb,
    pub end: Aabb,
}

impl Motion {
    /// Box covering the whole path of the body during the step.
    pub fn swept(&self) -> Aabb {
        self.start.union(&self.end)
    }
}

/// Predicted velocity and position of `body` after `dt` (semi-implicit Euler).
///
/// Gravity only acts on dynamic bodies; static bodies are returned unchanged.
pub fn predict(body: &Body, gravity: Vec2, dt: f32) -> (Vec2, Vec2) {
    let velocity = match body.kind {
        BodyKind::Static => return (body.velocity, body.shape.min),
        BodyKind::Kinematic => body.velocity,
        BodyKind::Dynamic => body.velocity + gravity * body.gravity_scale * dt,
    };
    (velocity, body.shape.min + velocity * dt)
}

/// Step every body forward by dt and record its motion.
///
/// Bodies whose prediction overflows keep their previous state for this step.
pub fn integrate(
    registry: &mut BodyRegistry,
    gravity: Vec2,
    dt: f32,
    report: &mut StepReport,
) -> Vec<Motion> {
    let mut motions = Vec::with_capacity(registry.len());

    for (handle, body) in registry.iter_mut() {
        let start = body.shape;
        if body.kind != BodyKind::Static {
            let (velocity, position) = predict(body, gravity, dt);
            if velocity.is_finite() && position.is_finite() {
                body.velocity = velocity;
                body.shape.min = position;
            } else {
                log::warn!("body {handle} integrated to a non-finite state, holding position");
                report.push(Diagnostic::skipped_integration(handle));
            }
        }

        motions.push(Motion {
            slot: handle.index as usize,
            handle,
            kind: body.kind,
            axes: body.axes,
            start,
            end: body.shape,
        });
    }

    motions
}
