//! Fixed-capacity slot arena.
//!
//! Entities carry their own `active` flag; an inactive slot is free. Claiming
//! scans linearly and the lowest free index wins, so draw order (which follows
//! slot order) stays stable. Pools are small (at most a few dozen slots),
//! which keeps the scan cheap. No allocation happens after construction.

/// An entity that can live in a [`Pool`].
pub trait Slot: Default {
    fn is_active(&self) -> bool;
}

pub struct Pool<T: Slot, const N: usize> {
    slots: [T; N],
}

impl<T: Slot, const N: usize> Pool<T, N> {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| T::default()),
        }
    }

    /// First free slot, or `None` when the pool is exhausted.
    ///
    /// The caller is expected to initialize the slot and mark it active.
    pub fn claim(&mut self) -> Option<&mut T> { self.slots.iter_mut().find(|s| !s.is_active()) }

    /// Return every slot to its default (inactive) state.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = T::default();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> { self.slots.iter() }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> { self.slots.iter_mut() }

    pub fn active(&self) -> impl Iterator<Item = &T> { self.slots.iter().filter(|s| s.is_active()) }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut T> { self.slots.iter_mut().filter(|s| s.is_active()) }

    pub fn active_count(&self) -> usize { self.active().count() }

    #[inline]
    pub const fn capacity(&self) -> usize { N }

    #[inline]
    pub fn get(
        &self,
        index: usize,
    ) -> Option<&T> {
        self.slots.get(index)
    }

    #[inline]
    pub fn get_mut(
        &mut self,
        index: usize,
    ) -> Option<&mut T> {
        self.slots.get_mut(index)
    }
}

impl<T: Slot, const N: usize> Default for Pool<T, N> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
