//! # Slot Pool
//!
//! Fixed-size slot allocator backing the actor stage.

use crate::actor::ActorId;

/// A fixed pool of generation-tagged slots.
///
/// All slots are allocated once at creation. Unused slots are threaded into a
/// singly linked free list through their `next_free` index, so acquiring and
/// releasing a slot is **O(1)** with **zero heap allocations**.
///
/// The free list is LIFO: a released slot is the very next one handed out.
/// Every release bumps the slot generation, which invalidates handles to the
/// previous occupant.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is owned by a single stage.
///
/// # Example
///
/// ```rust
/// use starbase_core::SlotPool;
///
/// let mut pool: SlotPool<u32> = SlotPool::new(4);
/// let first = pool.acquire(7).unwrap();
/// assert_eq!(first.index(), 0);
///
/// assert_eq!(pool.release(first), Some(7));
/// let again = pool.acquire(9).unwrap();
/// assert_eq!(again.index(), first.index());
/// assert_ne!(again, first);
/// ```
pub struct SlotPool<T> {
    /// The slot array.
    slots: Box<[Slot<T>]>,
    /// First free slot, if any.
    free_head: Option<u32>,
    /// Number of live slots.
    live_count: usize,
    /// Releases since creation.
    released: u64,
}

/// One pool slot.
struct Slot<T> {
    /// Bumped every time the slot is released.
    generation: u32,
    /// Next slot on the free list. Meaningless while live.
    next_free: Option<u32>,
    /// The occupant. `None` while the slot is free.
    value: Option<T>,
}

impl<T> SlotPool<T> {
    /// Creates a pool with `capacity` slots, all free.
    ///
    /// Slot 0 is at the head of the free list, followed by slot 1, and so on.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            u32::try_from(capacity).is_ok(),
            "Capacity cannot exceed u32::MAX"
        );
        let last = (capacity - 1) as u32;

        let slots = (0..=last)
            .map(|index| Slot {
                generation: 0,
                next_free: (index < last).then_some(index + 1),
                value: None,
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            free_head: Some(0),
            live_count: 0,
            released: 0,
        }
    }

    /// Returns the total number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of live slots.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live_count
    }

    /// Returns the number of releases since the pool was created.
    #[inline]
    #[must_use]
    pub const fn released(&self) -> u64 {
        self.released
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.capacity() - self.live_count
    }

    /// Pops the free-list head and stores `value` in it.
    ///
    /// # Returns
    ///
    /// The handle of the occupied slot, or `None` if every slot is live.
    pub fn acquire(&mut self, value: T) -> Option<ActorId> {
        let index = self.free_head?;
        let slot = &mut self.slots[index as usize];

        self.free_head = slot.next_free.take();
        slot.value = Some(value);
        self.live_count += 1;

        Some(ActorId::new(index, slot.generation))
    }

    /// Frees a live slot and pushes it onto the free-list head.
    ///
    /// # Returns
    ///
    /// The previous occupant, or `None` if the handle was stale.
    pub fn release(&mut self, id: ActorId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }

        let slot = &mut self.slots[id.slot()];
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        slot.next_free = self.free_head;
        self.free_head = Some(id.index());
        self.live_count -= 1;
        self.released += 1;

        value
    }

    /// Checks whether the handle addresses the slot's current occupant.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ActorId) -> bool {
        self.slots
            .get(id.slot())
            .is_some_and(|slot| slot.value.is_some() && slot.generation == id.generation())
    }

    /// Returns the handle of the live occupant of slot `index`.
    #[inline]
    #[must_use]
    pub fn handle_at(&self, index: u32) -> Option<ActorId> {
        let slot = self.slots.get(index as usize)?;
        slot.value
            .as_ref()
            .map(|_| ActorId::new(index, slot.generation))
    }

    /// Gets a reference to a live occupant.
    #[inline]
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.slot()].value.as_ref()
    }

    /// Gets a mutable reference to a live occupant.
    #[inline]
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.slot()].value.as_mut()
    }

    /// Iterates over the free list, head first.
    pub fn free_slots(&self) -> impl Iterator<Item = u32> + '_ {
        std::iter::successors(self.free_head, |&index| {
            self.slots[index as usize].next_free
        })
    }

    /// Iterates over all live occupants in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let value = slot.value.as_ref()?;
            // Capacity fits u32, checked in `new`.
            let index = u32::try_from(index).ok()?;
            Some((ActorId::new(index, slot.generation), value))
        })
    }
}
