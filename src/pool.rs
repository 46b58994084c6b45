//! The object pool / arena that backs every [`BananaNode`](crate::node::BananaNode).
//!
//! The original datastructure allocates nodes from a `recycling_object_pool`
//! and links them with raw pointers. Six raw pointers per node, freely
//! reused after `free()`, is exactly the kind of cyclic-pointer-graph design
//! spec.md's design notes flag as unsafe to reimplement directly. Instead we
//! follow the approach the teacher crate's `ost::index_tree` module already
//! takes for its own btree: nodes live in a single `Vec`, addressed by a
//! small newtype-over-`usize` id. We go one step further than `ost` and tag
//! each slot with a generation counter, so that reusing a stale `NodeId`
//! after its slot has been freed and reallocated panics instead of silently
//! reading the wrong node - the safe-Rust stand-in for the "allocation
//! failure is fatal" / dangling-pointer-is-fatal posture of the original.

use std::fmt::Debug;

/// A stable, generation-checked reference to a slot in an [`Arena`].
///
/// Cheap to copy, store inside another node's links, and compare.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Ord, PartialOrd)]
pub struct Id {
    index: u32,
    generation: u32,
}

enum Slot<T> {
    Occupied { value: T, generation: u32 },
    Free { next_free: Option<u32>, generation: u32 },
}

/// A recycling slab allocator: `construct(value) -> Id`, `free(id)`, with
/// O(1) allocation and O(1) release via an intrusive free list.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    live_count: usize,
}

impl<T> Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Occupied { generation, .. } => {
                write!(f, "Occupied {{ generation: {generation} }}")
            }
            Slot::Free { next_free, generation } => {
                write!(f, "Free {{ next_free: {next_free:?}, generation: {generation} }}")
            }
        }
    }
}

// Arenas are intentionally small during debug builds so growth and slot
// reuse get exercised by the test suite, the same trick the teacher crate
// plays with `content_tree::DEFAULT_IE`/`DEFAULT_LE` and `ost::NODE_CHILDREN`.
#[cfg(debug_assertions)]
const INITIAL_CAPACITY: usize = 4;
#[cfg(not(debug_assertions))]
const INITIAL_CAPACITY: usize = 64;

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(INITIAL_CAPACITY),
            free_head: None,
            live_count: 0,
        }
    }

    /// Construct a new object in the pool and return a stable id for it.
    pub fn construct(&mut self, value: T) -> Id {
        self.live_count += 1;
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let generation = match *slot {
                Slot::Free { generation, .. } => generation,
                Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
            };
            let next_free = match *slot {
                Slot::Free { next_free, .. } => next_free,
                Slot::Occupied { .. } => unreachable!(),
            };
            self.free_head = next_free;
            *slot = Slot::Occupied { value, generation };
            Id { index, generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot::Occupied { value, generation: 0 });
            Id { index, generation: 0 }
        }
    }

    /// Release a previously constructed object back to the pool.
    ///
    /// Panics if `id` does not refer to a currently-live object (double
    /// free, or a stale id from a slot that's since been reused).
    pub fn free(&mut self, id: Id) -> T {
        let slot = &mut self.slots[id.index as usize];
        match slot {
            Slot::Occupied { generation, .. } if *generation == id.generation => {
                let next_generation = generation.wrapping_add(1);
                let old = std::mem::replace(
                    slot,
                    Slot::Free { next_free: self.free_head, generation: next_generation },
                );
                self.free_head = Some(id.index);
                self.live_count -= 1;
                match old {
                    Slot::Occupied { value, .. } => value,
                    Slot::Free { .. } => unreachable!(),
                }
            }
            _ => panic!("Arena::free called with a stale or already-freed id: {id:?}"),
        }
    }

    #[inline]
    pub fn get(&self, id: Id) -> &T {
        match &self.slots[id.index as usize] {
            Slot::Occupied { value, generation } if *generation == id.generation => value,
            _ => panic!("Arena::get called with a stale id: {id:?}"),
        }
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id) -> &mut T {
        match &mut self.slots[id.index as usize] {
            Slot::Occupied { value, generation } if *generation == id.generation => value,
            _ => panic!("Arena::get_mut called with a stale id: {id:?}"),
        }
    }

    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
