//! Generational storage for bodies.

use crate::body::{Body, BodyHandle};
use crate::error::{PhysicsError, Result};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Owns every body of a world and hands out [`BodyHandle`]s.
///
/// Iteration always follows slot order, which keeps stepping deterministic.
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, body: Body) -> BodyHandle {
        self.len += 1;
        // Free slots are reused lowest-first so slot order stays predictable.
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            return BodyHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            body: Some(body),
        });
        BodyHandle {
            index,
            generation: 0,
        }
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Result<Body> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(PhysicsError::InvalidHandle(handle))?;
        let body = slot.body.take().ok_or(PhysicsError::InvalidHandle(handle))?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.free.sort_unstable_by(|a, b| b.cmp(a));
        self.len -= 1;
        Ok(body)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_ok()
    }

    pub fn get(&self, handle: BodyHandle) -> Result<&Body> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_ref())
            .ok_or(PhysicsError::InvalidHandle(handle))
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_mut())
            .ok_or(PhysicsError::InvalidHandle(handle))
    }

    /// Live bodies in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.body.as_ref().map(|body| {
                (
                    BodyHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    body,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.body.as_mut().map(|body| {
                (
                    BodyHandle {
                        index: index as u32,
                        generation,
                    },
                    body,
                )
            })
        })
    }

    /// Mutable access to two distinct slots at once.
    pub(crate) fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
        if a == b || a >= self.slots.len() || b >= self.slots.len() {
            return None;
        }
        let (lo, hi, swapped) = if a < b { (a, b, false) } else { (b, a, true) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].body.as_mut()?;
        let second = tail[0].body.as_mut()?;
        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }
}
