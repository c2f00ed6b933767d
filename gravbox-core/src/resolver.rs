//! Contact response: position correction, velocity response and flags.

use crate::body::{Body, BodyHandle};
use crate::contact::{ContactRef, Side};
use crate::narrowphase::Contact;
use crate::shape::Axis;

/// What resolving one contact did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The contact axis is switched off on one of the bodies.
    Ignored,
    /// Flags were set; nothing needed to move.
    Touching,
    /// At least one body was moved out of penetration.
    Corrected,
    /// The correction was not finite; flags were set without moving.
    Skipped,
}

/// Applies `contact` to the pair.
///
/// Only dynamic bodies move. A dynamic body against a static or kinematic one
/// takes the whole correction and is placed exactly against the other's face;
/// two dynamic bodies split it evenly.
pub fn resolve(
    a: &mut Body,
    b: &mut Body,
    a_handle: BodyHandle,
    b_handle: BodyHandle,
    contact: &Contact,
    down: f32,
    epsilon: f32,
) -> Outcome {
    let axis = contact.axis;
    if !a.axes.enabled(axis) || !b.axes.enabled(axis) {
        return Outcome::Ignored;
    }

    let a_moves = a.kind.is_dynamic();
    let b_moves = b.kind.is_dynamic();
    let sign = axis.of(contact.normal);

    let mut outcome = Outcome::Touching;
    if (a_moves || b_moves) && contact.penetration > epsilon {
        outcome = if correct(a, b, axis, sign, contact.penetration, a_moves, b_moves) {
            Outcome::Corrected
        } else {
            Outcome::Skipped
        };
    }
    if outcome != Outcome::Skipped && (a_moves || b_moves) {
        respond(a, b, axis, sign, a_moves, b_moves);
    }

    let side = Side::from_normal(axis, contact.normal, down);
    if !a.kind.is_static() {
        a.contacts.mark(
            side,
            ContactRef {
                body: b_handle,
                owner: b.owner,
            },
        );
    }
    if !b.kind.is_static() {
        b.contacts.mark(
            side.mirrored(),
            ContactRef {
                body: a_handle,
                owner: a.owner,
            },
        );
    }

    outcome
}

/// Moves the dynamic side(s) apart. Returns false, leaving both bodies
/// untouched, if the result would not be finite.
fn correct(
    a: &mut Body,
    b: &mut Body,
    axis: Axis,
    sign: f32,
    penetration: f32,
    a_moves: bool,
    b_moves: bool,
) -> bool {
    let mut a_pos = a.shape.min;
    let mut b_pos = b.shape.min;

    match (a_moves, b_moves) {
        (true, false) => {
            *axis.of_mut(&mut a_pos) = if sign > 0.0 {
                axis.of(b.shape.max())
            } else {
                axis.of(b.shape.min) - axis.of(a.shape.size)
            };
        }
        (false, true) => {
            *axis.of_mut(&mut b_pos) = if sign > 0.0 {
                axis.of(a.shape.min) - axis.of(b.shape.size)
            } else {
                axis.of(a.shape.max())
            };
        }
        _ => {
            let half = 0.5 * penetration * sign;
            *axis.of_mut(&mut a_pos) += half;
            *axis.of_mut(&mut b_pos) -= half;
        }
    }

    if !a_pos.is_finite() || !b_pos.is_finite() {
        return false;
    }
    a.shape.min = a_pos;
    b.shape.min = b_pos;
    true
}

/// Cancels (or, with restitution, reflects) the approaching part of the
/// relative velocity along `axis`.
fn respond(a: &mut Body, b: &mut Body, axis: Axis, sign: f32, a_moves: bool, b_moves: bool) {
    let relative = axis.of(a.velocity) - axis.of(b.velocity);
    if relative * sign >= 0.0 {
        return;
    }

    let restitution = a.restitution.max(b.restitution);
    let impulse = -(1.0 + restitution) * relative;
    let (a_share, b_share) = match (a_moves, b_moves) {
        (true, true) => (0.5, 0.5),
        (true, false) => (1.0, 0.0),
        _ => (0.0, 1.0),
    };
    *axis.of_mut(&mut a.velocity) += impulse * a_share;
    *axis.of_mut(&mut b.velocity) -= impulse * b_share;
}
