//! The world: body ownership, the step driver and the public query surface.

use crate::body::{check_restitution, Body, BodyDesc, BodyHandle, BodyKind, CollisionAxes, OwnerId};
use crate::broadphase::{auto_cell_size, BroadPhase};
use crate::config::WorldConfig;
use crate::contact::{ContactFlags, ContactManifold};
use crate::diagnostics::{Diagnostic, StepReport};
use crate::error::{PhysicsError, Result};
use crate::integrator::{integrate, Motion};
use crate::narrowphase::{collide, first_impact, NarrowParams};
use crate::query::{self, RayHit};
use crate::registry::BodyRegistry;
use crate::resolver::{resolve, Outcome};
use crate::shape::Aabb;
use glam::Vec2;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Swept and discrete tests over every pair; touching contacts included.
    First,
    /// Discrete tests over pairs with a dynamic body, penetrating contacts only.
    Relax,
    /// Dynamic-vs-static pairs only, run when relaxation did not settle.
    StaticOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Stepping,
}

/// An independent simulation.
///
/// All state lives here; separate worlds share nothing and may be stepped
/// from different threads.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    bodies: BodyRegistry,
    broadphase: BroadPhase,
    contacts: Vec<ContactManifold>,
    steps: u64,
    phase: Phase,
}

impl Default for World {
    fn default() -> Self {
        Self {
            config: WorldConfig::default(),
            bodies: BodyRegistry::new(),
            broadphase: BroadPhase::new(),
            contacts: Vec::new(),
            steps: 0,
            phase: Phase::Idle,
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Replaces the configuration; the old one stays in place if the new one is invalid.
    pub fn set_config(&mut self, config: WorldConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) -> Result<()> {
        if !gravity.is_finite() {
            return Err(PhysicsError::non_finite("gravity"));
        }
        self.config.gravity = gravity;
        Ok(())
    }

    /// Number of completed steps.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    // ------------------------------------------------------------------
    // Bodies
    // ------------------------------------------------------------------

    /// Adds a body with default restitution, collision axes and no owner.
    pub fn create_body(
        &mut self,
        position: Vec2,
        size: Vec2,
        kind: BodyKind,
        gravity_scale: f32,
    ) -> Result<BodyHandle> {
        self.insert(BodyDesc::new(position, size, kind).with_gravity_scale(gravity_scale))
    }

    pub fn insert(&mut self, desc: BodyDesc) -> Result<BodyHandle> {
        let body = desc.build()?;
        let handle = self.bodies.insert(body);
        log::trace!("created body {handle}");
        Ok(handle)
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self.bodies.remove(handle)?;
        log::trace!("removed body {handle}");
        Ok(body)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get(handle)
    }

    /// Live bodies in slot order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    pub fn position(&self, handle: BodyHandle) -> Result<Vec2> {
        Ok(self.bodies.get(handle)?.position())
    }

    pub fn velocity(&self, handle: BodyHandle) -> Result<Vec2> {
        Ok(self.bodies.get(handle)?.velocity())
    }

    pub fn contact_flags(&self, handle: BodyHandle) -> Result<ContactFlags> {
        Ok(*self.bodies.get(handle)?.contacts())
    }

    /// Static bodies cannot be given a velocity.
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> Result<()> {
        if !velocity.is_finite() {
            return Err(PhysicsError::non_finite("velocity"));
        }
        let body = self.bodies.get_mut(handle)?;
        if body.kind.is_static() {
            return Err(PhysicsError::StaticBody(handle));
        }
        body.velocity = velocity;
        Ok(())
    }

    /// Teleports a body. Works for every kind, static level geometry included.
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) -> Result<()> {
        if !position.is_finite() {
            return Err(PhysicsError::non_finite("position"));
        }
        self.bodies.get_mut(handle)?.shape.min = position;
        Ok(())
    }

    pub fn set_gravity_scale(&mut self, handle: BodyHandle, gravity_scale: f32) -> Result<()> {
        if !gravity_scale.is_finite() {
            return Err(PhysicsError::non_finite("gravity scale"));
        }
        self.bodies.get_mut(handle)?.gravity_scale = gravity_scale;
        Ok(())
    }

    pub fn set_restitution(&mut self, handle: BodyHandle, restitution: f32) -> Result<()> {
        check_restitution(restitution)?;
        self.bodies.get_mut(handle)?.restitution = restitution;
        Ok(())
    }

    pub fn set_collision_axes(&mut self, handle: BodyHandle, axes: CollisionAxes) -> Result<()> {
        self.bodies.get_mut(handle)?.axes = axes;
        Ok(())
    }

    pub fn set_owner(&mut self, handle: BodyHandle, owner: Option<OwnerId>) -> Result<()> {
        self.bodies.get_mut(handle)?.owner = owner;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// Advances by the configured fixed timestep.
    pub fn tick(&mut self) -> Result<StepReport> {
        self.step(self.config.timestep)
    }

    /// Advances the simulation by exactly `dt`.
    ///
    /// `dt` is checked before anything changes, so a rejected call leaves the
    /// world as it was. Once started, a step always runs to completion:
    /// contacts that cannot be resolved numerically are skipped and reported
    /// in the returned [`StepReport`].
    pub fn step(&mut self, dt: f32) -> Result<StepReport> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        debug_assert_eq!(self.phase, Phase::Idle);
        self.phase = Phase::Stepping;

        let mut report = StepReport::new(self.steps + 1, dt);
        report.bodies = self.bodies.len();
        self.contacts.clear();
        for (_, body) in self.bodies.iter_mut() {
            body.contacts = ContactFlags::default();
        }

        let motions = integrate(&mut self.bodies, self.config.gravity, dt, &mut report);
        let cell_size = self
            .config
            .cell_size
            .unwrap_or_else(|| auto_cell_size(&motions));
        let pairs = self
            .broadphase
            .find_pairs(&motions, cell_size, self.config.epsilon);
        report.candidate_pairs = pairs.len();
        let first_order = self.impact_order(&motions, &pairs);

        let mut converged = false;
        for pass in 0..self.config.position_iterations {
            let (kind, order) = if pass == 0 {
                (Pass::First, &first_order)
            } else {
                (Pass::Relax, &pairs)
            };
            report.passes += 1;
            if !self.resolve_pass(&motions, order, kind, &mut report) {
                converged = true;
                break;
            }
        }
        if !converged {
            // Dynamic pairs can still be pressing each other into the level;
            // static contacts get the last word.
            report.passes += 1;
            self.resolve_pass(&motions, &pairs, Pass::StaticOnly, &mut report);
        }

        self.steps += 1;
        self.phase = Phase::Idle;
        log::debug!(
            "step {} dt {}: {} bodies, {} pairs, {} contacts, {} corrections, {} passes",
            report.step,
            dt,
            report.bodies,
            report.candidate_pairs,
            report.contacts,
            report.corrections,
            report.passes
        );
        Ok(report)
    }

    /// Candidate pairs in first-pass order: swept hits by time of impact,
    /// face hits before corner hits at the same time, then everything else
    /// in broad-phase order.
    ///
    /// A body sliding fast along a row of tiles sweeps into the side of the
    /// next tile later than it sweeps into the tile under it. Landing on the
    /// row first removes the downward motion, so the seam is never hit.
    fn impact_order(&self, motions: &[Motion], pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let params = NarrowParams::from_config(&self.config, true);
        let mut keyed: Vec<_> = pairs
            .iter()
            .map(|&(i, j)| {
                let (ma, mb) = (&motions[i], &motions[j]);
                let hit = first_impact(&ma.start, &ma.end, &mb.start, &mb.end, &params);
                (hit.map(|h| (h.toi, h.corner)), (i, j))
            })
            .collect();

        // Stable, so equal keys keep the broad-phase order.
        keyed.sort_by(|(x, _), (y, _)| match (x, y) {
            (Some((tx, cx)), Some((ty, cy))) => tx.total_cmp(ty).then(cx.cmp(cy)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        keyed.into_iter().map(|(_, pair)| pair).collect()
    }

    /// Runs narrow-phase and resolution once over `pairs`.
    ///
    /// Returns whether any body was moved.
    fn resolve_pass(
        &mut self,
        motions: &[Motion],
        pairs: &[(usize, usize)],
        pass: Pass,
        report: &mut StepReport,
    ) -> bool {
        let epsilon = self.config.epsilon;
        let down = self.config.down_sign();
        let params = NarrowParams::from_config(&self.config, pass == Pass::First);
        let mut moved = false;

        for &(i, j) in pairs {
            let (ma, mb) = (&motions[i], &motions[j]);
            let wanted = match pass {
                Pass::First => true,
                Pass::Relax => ma.kind.is_dynamic() || mb.kind.is_dynamic(),
                Pass::StaticOnly => {
                    (ma.kind.is_dynamic() && mb.kind.is_static())
                        || (ma.kind.is_static() && mb.kind.is_dynamic())
                }
            };
            if !wanted {
                continue;
            }
            let Some((a, b)) = self.bodies.pair_mut(ma.slot, mb.slot) else {
                continue;
            };
            let Some(contact) = collide(&ma.start, &a.shape, &mb.start, &b.shape, &params) else {
                continue;
            };
            // Only the first pass reports resting contacts.
            if pass != Pass::First && contact.penetration <= epsilon {
                continue;
            }

            match resolve(a, b, ma.handle, mb.handle, &contact, down, epsilon) {
                Outcome::Ignored => continue,
                Outcome::Touching => {}
                Outcome::Corrected => {
                    moved = true;
                    report.corrections += 1;
                }
                Outcome::Skipped => {
                    log::warn!(
                        "contact {} / {} produced a non-finite correction, skipped",
                        ma.handle,
                        mb.handle
                    );
                    report.push(Diagnostic::skipped_resolution(ma.handle, mb.handle));
                }
            }
            log::trace!(
                "contact {} / {} axis {:?} normal {} depth {}",
                ma.handle,
                mb.handle,
                contact.axis,
                contact.normal,
                contact.depth
            );
            report.contacts += 1;
            self.contacts.push(contact.manifold(ma.handle, mb.handle));
        }

        moved
    }

    /// Contacts found during the last step, in resolution order.
    pub fn contacts(&self) -> &[ContactManifold] {
        &self.contacts
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First body (in slot order) whose box contains `point`, edges included.
    pub fn raycast_point(&self, point: Vec2) -> Option<BodyHandle> {
        query::point(&self.bodies, point).next()
    }

    /// Every body whose box contains `point`.
    pub fn query_point(&self, point: Vec2) -> Vec<BodyHandle> {
        query::point(&self.bodies, point).collect()
    }

    /// Every body whose box overlaps or touches `region`, in slot order.
    pub fn query_aabb(&self, region: Aabb) -> Vec<BodyHandle> {
        query::region(&self.bodies, region)
    }

    /// Nearest body along a ray of length `max_distance`, skipping `exclude`.
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit> {
        query::ray(&self.bodies, origin, direction, max_distance, exclude)
    }
}
