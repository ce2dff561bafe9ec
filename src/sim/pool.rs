//! Fixed-capacity entity pools
//!
//! Every pool is allocated once at world creation. Spawning claims the
//! first dead slot and reinitializes it in place; despawning is implicit
//! (hit points or lifetime reaching zero). A full pool drops the request.

use serde::{Deserialize, Serialize};

/// Anything that can live in a pool slot
pub trait Poolable {
    /// Whether the slot is occupied by a live entity
    fn is_alive(&self) -> bool;
}

/// Stable reference to a pool slot that detects reuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    pub index: u32,
    pub generation: u32,
}

/// Pre-allocated array of reusable entities
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    generations: Vec<u32>,
}

impl<T: Poolable + Default> Pool<T> {
    /// Allocate `capacity` dead slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::default()).collect(),
            generations: vec![0; capacity],
        }
    }
}

impl<T: Poolable> Pool<T> {
    /// Build a pool from already-initialized entities (e.g. static terrain)
    pub fn from_vec(slots: Vec<T>) -> Self {
        let generations = vec![0; slots.len()];
        Self { slots, generations }
    }

    /// Claim the first dead slot and initialize it.
    ///
    /// Returns `None` without touching any slot when the pool is full.
    pub fn spawn(&mut self, init: impl FnOnce(&mut T)) -> Option<Handle> {
        let index = self.slots.iter().position(|slot| !slot.is_alive())?;
        init(&mut self.slots[index]);
        self.generations[index] = self.generations[index].wrapping_add(1);
        Some(Handle {
            index: index as u32,
            generation: self.generations[index],
        })
    }

    /// Spawn up to `count` entities, returning how many slots were claimed
    pub fn spawn_many(&mut self, count: usize, mut init: impl FnMut(&mut T)) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            if self.spawn(&mut init).is_none() {
                break;
            }
            spawned += 1;
        }
        spawned
    }

    /// Resolve a handle; `None` if the slot died or was reused
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let index = handle.index as usize;
        if self.generations.get(index) != Some(&handle.generation) {
            return None;
        }
        self.slots.get(index).filter(|slot| slot.is_alive())
    }

    /// Mutable variant of [`Pool::get`]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let index = handle.index as usize;
        if self.generations.get(index) != Some(&handle.generation) {
            return None;
        }
        self.slots.get_mut(index).filter(|slot| slot.is_alive())
    }

    /// Current handle for the slot at `index`
    pub fn handle_at(&self, index: usize) -> Option<Handle> {
        self.generations.get(index).map(|&generation| Handle {
            index: index as u32,
            generation,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_alive()).count()
    }

    /// Iterate live entities only
    pub fn live(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|slot| slot.is_alive())
    }

    /// All slots, dead or alive
    pub fn as_slice(&self) -> &[T] {
        &self.slots
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }
}
