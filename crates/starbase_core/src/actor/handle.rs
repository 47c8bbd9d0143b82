//! # Actor Handles
//!
//! Actors are addressed by a lightweight handle consisting of:
//! - The index of the slot that holds the actor
//! - The generation the slot had when the actor was loaded

use std::fmt;

/// Handle to a live actor.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Slot index inside the pool
/// - Upper 32 bits: Generation counter for detecting stale handles
///
/// A handle stays valid from `Stage::load` until the matching unload. Every
/// unload bumps the slot generation, so a handle that outlives its actor is
/// rejected instead of silently addressing the slot's next occupant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates a handle from a slot index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the slot index as a `usize` for indexing.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self.index() as usize
    }

    /// Returns the raw packed representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_parts() {
        let id = ActorId::new(31, 7);
        assert_eq!(id.index(), 31);
        assert_eq!(id.generation(), 7);
        assert_eq!(id.slot(), 31);
        assert_eq!(id.to_bits(), (7 << 32) | 31);
    }

    #[test]
    fn test_generation_distinguishes_handles() {
        let old = ActorId::new(3, 1);
        let new = ActorId::new(3, 2);
        assert_ne!(old, new);
        assert_eq!(old.index(), new.index());
        assert_eq!(format!("{new}"), "#3v2");
    }
}
