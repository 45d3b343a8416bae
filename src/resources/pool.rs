//! Fixed-capacity slot allocator.
//!
//! [`FixedPool`] hands out slots from a flat array whose size never changes.
//! Occupancy lives in a parallel flag array and allocation scans forward from
//! a roving cursor, wrapping once. Every slot also carries a generation that is
//! bumped on release, so a [`SlotId`] taken before a release never matches the
//! slot's next occupant.
//!
//! Releasing only does bookkeeping. Callers run any kind-specific cleanup
//! before handing the slot back.

use std::fmt;

/// Default capacity of the entity pool.
pub const POOL_CAPACITY: usize = 256;

/// Handle to an occupied slot: array index plus the generation it was acquired in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: u16,
    generation: u32,
}

impl SlotId {
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Every slot is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolExhausted {
    pub capacity: usize,
}

impl fmt::Display for PoolExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object pool exhausted ({} slots in use)", self.capacity)
    }
}

impl std::error::Error for PoolExhausted {}

#[derive(Debug)]
pub struct FixedPool<T> {
    items: Box<[Option<T>]>,
    active: Box<[bool]>,
    generations: Box<[u32]>,
    cursor: usize,
    len: usize,
}

impl<T> FixedPool<T> {
    /// Create an empty pool. Capacity must fit a `u16` index.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity <= u16::MAX as usize + 1,
            "pool capacity out of range"
        );
        FixedPool {
            items: (0..capacity).map(|_| None).collect(),
            active: vec![false; capacity].into_boxed_slice(),
            generations: vec![0; capacity].into_boxed_slice(),
            cursor: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.active.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Claim the first free slot at or after the cursor, wrapping once, and store `value` in it.
    pub fn acquire(&mut self, value: T) -> Result<SlotId, PoolExhausted> {
        let capacity = self.capacity();
        let start = self.cursor;
        let found = (start..capacity)
            .chain(0..start.min(capacity))
            .find(|&i| !self.active[i]);

        let Some(index) = found else {
            return Err(PoolExhausted { capacity });
        };

        self.active[index] = true;
        self.items[index] = Some(value);
        self.cursor = index + 1;
        self.len += 1;
        Ok(SlotId {
            index: index as u16,
            generation: self.generations[index],
        })
    }

    /// Free a slot and return its contents. Stale or free handles return `None`.
    pub fn release(&mut self, slot: SlotId) -> Option<T> {
        if !self.exists(slot) {
            return None;
        }
        let index = slot.index();
        self.active[index] = false;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.len -= 1;
        self.items[index].take()
    }

    pub fn exists(&self, slot: SlotId) -> bool {
        let index = slot.index();
        index < self.capacity()
            && self.active[index]
            && self.generations[index] == slot.generation
    }

    pub fn get(&self, slot: SlotId) -> Option<&T> {
        if self.exists(slot) {
            self.items[slot.index()].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut T> {
        if self.exists(slot) {
            self.items[slot.index()].as_mut()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_invalidates_old_handle() {
        let mut pool = FixedPool::new(4);
        let a = pool.acquire('a').unwrap();
        assert_eq!(pool.release(a), Some('a'));
        assert!(!pool.exists(a));
        assert_eq!(pool.release(a), None);
    }

    #[test]
    fn test_cursor_wraps_to_reuse_freed_slot() {
        let mut pool = FixedPool::new(3);
        let slots: Vec<_> = (0..3).map(|i| pool.acquire(i).unwrap()).collect();
        pool.release(slots[0]);
        let again = pool.acquire(9).unwrap();
        assert_eq!(again.index(), 0);
        assert_ne!(again, slots[0]);
        assert_eq!(pool.get(again), Some(&9));
    }

    #[test]
    fn test_exhaustion_leaves_pool_intact() {
        let mut pool = FixedPool::new(2);
        pool.acquire(1).unwrap();
        pool.acquire(2).unwrap();
        assert_eq!(pool.acquire(3), Err(PoolExhausted { capacity: 2 }));
        assert_eq!(pool.len(), 2);
    }
}
