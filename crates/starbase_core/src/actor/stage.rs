//! # Actor Stage
//!
//! The central container for all actors: a fixed slot pool plus three
//! independent bucket indices and the per-frame scheduler.
//!
//! ```text
//! Frame N:
//!   update(host)
//!     ├─ clear draw-order table
//!     └─ priority 0 ─► 7, each bucket head ─► tail: update callback
//!   draw(host)
//!     └─ order 0 ─► 511, each bucket head ─► tail: draw callback
//! ```
//!
//! Callbacks receive the stage itself, so they can load, unload, tag and
//! register actors while a pass is running. Each pass captures the members
//! of a bucket before dispatching into it and re-checks every captured
//! member before its callback runs.

use std::fmt;

use super::handle::ActorId;
use super::index::BucketIndex;
use super::{ORDER_LAYERS, PRIORITY_LEVELS, SLOT_BYTES, TAG_GROUPS};
use crate::config::StageConfig;
use crate::error::{ActorError, ActorResult};
use crate::memory::SlotPool;

/// Callback signature shared by `update`, `unload` and `draw`.
///
/// The callback receives the stage, the host context and its own handle.
pub type ActorFn<P, H> = fn(&mut Stage<P, H>, &mut H, ActorId) -> ActorResult<()>;

/// Header and payload of one live actor.
struct Actor<P, H> {
    update: Option<ActorFn<P, H>>,
    unload: Option<ActorFn<P, H>>,
    draw: Option<ActorFn<P, H>>,
    /// Scratch state owned by the current update callback.
    state: i32,
    /// Last order passed to `set_draw`.
    order: usize,
    payload: P,
}

/// Which index a pass walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Chain {
    Priority,
    Order,
    Tag,
}

/// The actor stage.
///
/// `P` is the payload stored next to every actor header, usually a closed
/// enum of the consumer's actor kinds. `H` is the host context handed to
/// every callback.
///
/// # Capacity
///
/// The stage has a fixed number of slots set at creation. Loading into a
/// full stage fails with [`ActorError::PoolExhausted`].
///
/// # Example
///
/// ```rust
/// use starbase_core::{ActorId, ActorResult, Stage, StageConfig};
///
/// fn tick(stage: &mut Stage<u32, Vec<u32>>, log: &mut Vec<u32>, id: ActorId) -> ActorResult<()> {
///     log.push(*stage.payload(id)?);
///     Ok(())
/// }
///
/// let mut stage: Stage<u32, Vec<u32>> = Stage::new(&StageConfig::default());
/// stage.load(Some(tick), 7, 1)?;
/// stage.load(Some(tick), 0, 2)?;
///
/// let mut log = Vec::new();
/// stage.update(&mut log)?;
/// assert_eq!(log, vec![2, 1]);
/// # Ok::<(), starbase_core::ActorError>(())
/// ```
pub struct Stage<P, H = ()> {
    pool: SlotPool<Actor<P, H>>,
    priorities: BucketIndex,
    orders: BucketIndex,
    tags: BucketIndex,
    /// Reused buffer for bucket walks.
    scratch: Vec<ActorId>,
}

impl<P, H> Stage<P, H> {
    /// Rejects payload types that do not fit a slot.
    const PAYLOAD_FITS: () = assert!(
        std::mem::size_of::<P>() <= SLOT_BYTES,
        "actor payload exceeds the slot capacity"
    );

    /// Creates a stage from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero or exceeds `u32::MAX`. Use
    /// [`Stage::try_new`] to get an error instead.
    #[must_use]
    pub fn new(config: &StageConfig) -> Self {
        Self::with_capacity(config.capacity)
    }

    /// Creates a stage after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::InvalidConfig`] if the configuration is invalid.
    pub fn try_new(config: &StageConfig) -> ActorResult<Self> {
        config.validate()?;
        Ok(Self::with_capacity(config.capacity))
    }

    /// Creates a stage with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let () = Self::PAYLOAD_FITS;

        Self {
            pool: SlotPool::new(capacity),
            priorities: BucketIndex::new(PRIORITY_LEVELS, capacity),
            orders: BucketIndex::new(ORDER_LAYERS, capacity),
            tags: BucketIndex::new(TAG_GROUPS, capacity),
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Returns the number of live actors.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.pool.live_count()
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.pool.free_count()
    }

    /// Checks whether `id` refers to a live actor.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: ActorId) -> bool {
        self.pool.contains(id)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Loads a new actor.
    ///
    /// The actor is inserted at the head of its priority bucket, so it is
    /// updated before every actor already in that bucket. `priority` is
    /// clamped to `0..=7`; a `None` update makes a passive actor.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::PoolExhausted`] if every slot is live.
    pub fn load(
        &mut self,
        update: Option<ActorFn<P, H>>,
        priority: i32,
        payload: P,
    ) -> ActorResult<ActorId> {
        let priority = self.priorities.clamp(priority);
        let actor = Actor {
            update,
            unload: None,
            draw: None,
            state: 0,
            order: 0,
            payload,
        };

        let Some(id) = self.pool.acquire(actor) else {
            let capacity = self.capacity();
            tracing::warn!(capacity, "actor pool exhausted");
            return Err(ActorError::PoolExhausted { capacity });
        };

        let index = id.index();
        self.orders.remove(index);
        self.tags.remove(index);
        self.priorities.push_front(priority, index);

        tracing::debug!(actor = %id, priority, "actor loaded");
        Ok(id)
    }

    /// Unloads an actor and returns its slot to the free list.
    ///
    /// The unload callback, if set, runs exactly once before teardown. Then
    /// the tag, draw and priority memberships are removed in that order and
    /// the payload is dropped. Teardown completes even if the callback fails.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is already gone, or
    /// the error returned by the unload callback.
    pub fn unload(&mut self, host: &mut H, id: ActorId) -> ActorResult<()> {
        let result = match self.actor_mut(id)?.unload.take() {
            Some(callback) => callback(self, host, id),
            None => Ok(()),
        };

        // The callback may have unloaded its own actor.
        if !self.pool.contains(id) {
            return result;
        }

        let index = id.index();
        self.tags.remove(index);
        self.orders.remove(index);
        self.priorities.remove(index);
        self.pool.release(id);

        tracing::debug!(actor = %id, "actor unloaded");
        result
    }

    /// Unloads every live actor, priority bucket by priority bucket.
    ///
    /// # Returns
    ///
    /// The number of actors unloaded, counting those freed by unload
    /// callbacks along the way.
    ///
    /// # Errors
    ///
    /// Returns the first unload callback error after all actors are gone.
    pub fn unload_all(&mut self, host: &mut H) -> ActorResult<usize> {
        let released = self.pool.released();
        let mut first_error = None;

        for bucket in 0..PRIORITY_LEVELS {
            let walk = self.take_members(Chain::Priority, bucket);
            for &id in &walk {
                if !self.pool.contains(id) {
                    continue;
                }
                if let Err(e) = self.unload(host, id) {
                    first_error.get_or_insert(e);
                }
            }
            self.scratch = walk;
        }

        let unloaded = self.released_since(released);

        tracing::debug!(unloaded, "all actors unloaded");
        first_error.map_or(Ok(unloaded), Err)
    }

    /// Unloads every actor carrying `tag`.
    ///
    /// # Returns
    ///
    /// The number of actors unloaded, counting those freed by unload
    /// callbacks along the way.
    ///
    /// # Errors
    ///
    /// Returns the first unload callback error after the group is gone.
    pub fn unload_with_tag(&mut self, host: &mut H, tag: i32) -> ActorResult<usize> {
        let bucket = self.tags.clamp(tag);
        let walk = self.take_members(Chain::Tag, bucket);
        let released = self.pool.released();
        let mut first_error = None;

        for &id in &walk {
            if !self.pool.contains(id) {
                continue;
            }
            if let Err(e) = self.unload(host, id) {
                first_error.get_or_insert(e);
            }
        }
        self.scratch = walk;

        let unloaded = self.released_since(released);

        tracing::debug!(tag = bucket, unloaded, "tag group unloaded");
        first_error.map_or(Ok(unloaded), Err)
    }

    // =========================================================================
    // Callbacks and state
    // =========================================================================

    /// Replaces the update callback and resets the scratch state to 0.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn transition(&mut self, id: ActorId, update: Option<ActorFn<P, H>>) -> ActorResult<()> {
        let actor = self.actor_mut(id)?;
        actor.update = update;
        actor.state = 0;
        Ok(())
    }

    /// Sets the callback run once when the actor is unloaded.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn set_unload(&mut self, id: ActorId, unload: Option<ActorFn<P, H>>) -> ActorResult<()> {
        self.actor_mut(id)?.unload = unload;
        Ok(())
    }

    /// Returns the scratch state.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn state(&self, id: ActorId) -> ActorResult<i32> {
        Ok(self.actor(id)?.state)
    }

    /// Overwrites the scratch state.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn set_state(&mut self, id: ActorId, state: i32) -> ActorResult<()> {
        self.actor_mut(id)?.state = state;
        Ok(())
    }

    /// Increments the scratch state and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn advance_state(&mut self, id: ActorId) -> ActorResult<i32> {
        let actor = self.actor_mut(id)?;
        actor.state = actor.state.wrapping_add(1);
        Ok(actor.state)
    }

    /// Returns the actor payload.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn payload(&self, id: ActorId) -> ActorResult<&P> {
        Ok(&self.actor(id)?.payload)
    }

    /// Returns the actor payload mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn payload_mut(&mut self, id: ActorId) -> ActorResult<&mut P> {
        Ok(&mut self.actor_mut(id)?.payload)
    }

    /// Returns the priority bucket the actor was loaded into.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn priority_of(&self, id: ActorId) -> ActorResult<usize> {
        self.actor(id)?;
        // Every live actor is in exactly one priority bucket.
        Ok(self.priorities.bucket_of(id.index()).unwrap_or_default())
    }

    // =========================================================================
    // Draw-order index
    // =========================================================================

    /// Registers the actor for drawing this frame.
    ///
    /// `order` is clamped to `0..=511`. Registering twice in one frame moves
    /// the actor to the head of the new bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn set_draw(&mut self, id: ActorId, draw: ActorFn<P, H>, order: i32) -> ActorResult<()> {
        let order = self.orders.clamp(order);
        let actor = self.actor_mut(id)?;
        actor.draw = Some(draw);
        actor.order = order;
        self.orders.push_front(order, id.index());
        Ok(())
    }

    /// Withdraws the actor from this frame's draw pass.
    ///
    /// Safe to call on an actor that never registered or whose registration
    /// was dropped by the per-frame clear.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn unset_draw(&mut self, id: ActorId) -> ActorResult<()> {
        self.actor(id)?;
        self.orders.remove(id.index());
        Ok(())
    }

    /// Returns the draw order if the actor is registered this frame.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn order_of(&self, id: ActorId) -> ActorResult<Option<usize>> {
        let actor = self.actor(id)?;
        Ok(self
            .orders
            .is_linked(id.index())
            .then_some(actor.order))
    }

    /// Empties the draw-order table.
    ///
    /// Called at the start of every update pass. Actors keep their draw
    /// callbacks but must call [`set_draw`](Self::set_draw) again to be drawn.
    pub fn clear_draw_table(&mut self) {
        self.orders.clear();
    }

    // =========================================================================
    // Tag index
    // =========================================================================

    /// Puts the actor into tag group `tag`, clamped to `0..=15`.
    ///
    /// An actor already in another group leaves it first.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn set_tag(&mut self, id: ActorId, tag: i32) -> ActorResult<()> {
        self.actor(id)?;
        let tag = self.tags.clamp(tag);
        if let Some(previous) = self.tags.bucket_of(id.index()) {
            tracing::trace!(actor = %id, previous, tag, "actor re-tagged");
        }
        self.tags.push_front(tag, id.index());
        Ok(())
    }

    /// Removes the actor from its tag group.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn unset_tag(&mut self, id: ActorId) -> ActorResult<()> {
        self.actor(id)?;
        self.tags.remove(id.index());
        Ok(())
    }

    /// Returns the tag group of the actor, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn tag_of(&self, id: ActorId) -> ActorResult<Option<usize>> {
        self.actor(id)?;
        Ok(self.tags.bucket_of(id.index()))
    }

    /// Returns the first member of tag group `tag`.
    #[must_use]
    pub fn find_with_tag(&self, tag: i32) -> Option<ActorId> {
        let bucket = self.tags.clamp(tag);
        self.tags
            .head(bucket)
            .and_then(|index| self.pool.handle_at(index))
    }

    /// Returns the member after `id` in its tag group.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StaleHandle`] if the actor is gone.
    pub fn next_with_tag(&self, id: ActorId) -> ActorResult<Option<ActorId>> {
        self.actor(id)?;
        Ok(self
            .tags
            .next(id.index())
            .and_then(|index| self.pool.handle_at(index)))
    }

    /// Iterates over the members of tag group `tag`.
    pub fn with_tag(&self, tag: i32) -> impl Iterator<Item = ActorId> + '_ {
        let bucket = self.tags.clamp(tag);
        self.tags
            .iter(bucket)
            .filter_map(|index| self.pool.handle_at(index))
    }

    /// Iterates over every live actor in update order.
    pub fn actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        (0..PRIORITY_LEVELS)
            .flat_map(|bucket| self.priorities.iter(bucket))
            .filter_map(|index| self.pool.handle_at(index))
    }

    // =========================================================================
    // Scheduler
    // =========================================================================

    /// Runs the update pass.
    ///
    /// Clears the draw-order table, then visits priority buckets from 0 to 7
    /// and each bucket from head to tail. An actor loaded during the pass
    /// into a bucket that has not been reached yet runs this frame; one
    /// loaded into the current or an earlier bucket runs next frame.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first update callback error.
    pub fn update(&mut self, host: &mut H) -> ActorResult<()> {
        self.clear_draw_table();
        for bucket in 0..PRIORITY_LEVELS {
            self.dispatch(host, Chain::Priority, bucket, |actor| actor.update)?;
        }
        Ok(())
    }

    /// Runs the draw pass.
    ///
    /// Visits the actors registered this frame from order 0 (back) to 511
    /// (front).
    ///
    /// # Errors
    ///
    /// Stops at and returns the first draw callback error.
    pub fn draw(&mut self, host: &mut H) -> ActorResult<()> {
        for bucket in 0..ORDER_LAYERS {
            if self.orders.is_empty(bucket) {
                continue;
            }
            self.dispatch(host, Chain::Order, bucket, |actor| actor.draw)?;
        }
        Ok(())
    }

    fn dispatch<F>(&mut self, host: &mut H, chain: Chain, bucket: usize, pick: F) -> ActorResult<()>
    where
        F: Fn(&Actor<P, H>) -> Option<ActorFn<P, H>>,
    {
        let walk = self.take_members(chain, bucket);
        let mut result = Ok(());

        for &id in &walk {
            // Skip members removed or freed by an earlier callback.
            if self.index(chain).bucket_of(id.index()) != Some(bucket) {
                continue;
            }
            let Some(callback) = self.pool.get(id).and_then(&pick) else {
                continue;
            };
            if let Err(e) = callback(self, host, id) {
                tracing::warn!(actor = %id, ?chain, error = %e, "actor callback failed");
                result = Err(e);
                break;
            }
        }

        self.scratch = walk;
        result
    }

    /// Captures the live members of a bucket into the scratch buffer.
    fn take_members(&mut self, chain: Chain, bucket: usize) -> Vec<ActorId> {
        let mut walk = std::mem::take(&mut self.scratch);
        walk.clear();
        let index = match chain {
            Chain::Priority => &self.priorities,
            Chain::Order => &self.orders,
            Chain::Tag => &self.tags,
        };
        walk.extend(
            index
                .iter(bucket)
                .filter_map(|slot| self.pool.handle_at(slot)),
        );
        walk
    }

    fn index(&self, chain: Chain) -> &BucketIndex {
        match chain {
            Chain::Priority => &self.priorities,
            Chain::Order => &self.orders,
            Chain::Tag => &self.tags,
        }
    }

    /// Counts the actors unloaded since the pool had released `mark` slots.
    fn released_since(&self, mark: u64) -> usize {
        usize::try_from(self.pool.released() - mark).unwrap_or(usize::MAX)
    }

    fn actor(&self, id: ActorId) -> ActorResult<&Actor<P, H>> {
        self.pool.get(id).ok_or_else(|| stale(id))
    }

    fn actor_mut(&mut self, id: ActorId) -> ActorResult<&mut Actor<P, H>> {
        self.pool.get_mut(id).ok_or_else(|| stale(id))
    }
}

fn stale(id: ActorId) -> ActorError {
    tracing::warn!(actor = %id, "stale actor handle");
    ActorError::StaleHandle(id)
}

impl<P, H> fmt::Debug for Stage<P, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("capacity", &self.capacity())
            .field("live", &self.live_count())
            .finish_non_exhaustive()
    }
}
