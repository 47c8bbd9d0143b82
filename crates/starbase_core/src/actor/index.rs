//! # Bucket Index
//!
//! A fixed set of doubly linked lists over pool slot indices.
//!
//! Every slot can be a member of at most one bucket of a given index. Links
//! are stored as slot indices in a side table owned by the index, so insert
//! and remove are **O(1)** and never chase a dangling pointer.
//!
//! Insertion is always at the bucket head: the most recently inserted member
//! is visited first.
//!
//! ## Epochs
//!
//! [`BucketIndex::clear`] empties every bucket in one step by resetting the
//! heads and advancing the index epoch. Per-slot links are left untouched;
//! a link recorded under an older epoch is simply treated as absent. This
//! keeps removal safe for members that were dropped by a clear and never
//! re-inserted.

/// Membership record for one slot.
#[derive(Clone, Copy, Debug, Default)]
struct Link {
    /// Bucket the slot was last inserted into.
    bucket: usize,
    /// Previous member (towards the head).
    prev: Option<u32>,
    /// Next member (towards the tail).
    next: Option<u32>,
    /// Epoch of the insertion. `None` once removed.
    epoch: Option<u64>,
}

/// Fixed set of intrusive lists keyed by slot index.
#[derive(Debug)]
pub struct BucketIndex {
    /// First member of each bucket.
    heads: Box<[Option<u32>]>,
    /// Membership record per slot.
    links: Box<[Link]>,
    /// Current epoch. Links from older epochs are dead.
    epoch: u64,
}

impl BucketIndex {
    /// Creates an index with `buckets` empty lists over `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `buckets` is zero.
    #[must_use]
    pub fn new(buckets: usize, capacity: usize) -> Self {
        assert!(buckets > 0, "Bucket count must be greater than zero");
        Self {
            heads: vec![None; buckets].into_boxed_slice(),
            links: vec![Link::default(); capacity].into_boxed_slice(),
            epoch: 0,
        }
    }

    /// Returns the number of buckets.
    #[inline]
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    /// Clamps a raw bucket number into `0..bucket_count()`.
    #[inline]
    #[must_use]
    pub fn clamp(&self, value: i32) -> usize {
        let top = self.bucket_count() - 1;
        usize::try_from(value).map_or(0, |v| v.min(top))
    }

    /// Checks whether slot `index` is a member of any bucket.
    #[inline]
    #[must_use]
    pub fn is_linked(&self, index: u32) -> bool {
        self.links
            .get(index as usize)
            .is_some_and(|link| link.epoch == Some(self.epoch))
    }

    /// Returns the bucket slot `index` is currently a member of.
    #[inline]
    #[must_use]
    pub fn bucket_of(&self, index: u32) -> Option<usize> {
        if self.is_linked(index) {
            Some(self.links[index as usize].bucket)
        } else {
            None
        }
    }

    /// Returns the first member of `bucket`.
    #[inline]
    #[must_use]
    pub fn head(&self, bucket: usize) -> Option<u32> {
        self.heads.get(bucket).copied().flatten()
    }

    /// Returns the member after slot `index` in its bucket.
    #[inline]
    #[must_use]
    pub fn next(&self, index: u32) -> Option<u32> {
        if self.is_linked(index) {
            self.links[index as usize].next
        } else {
            None
        }
    }

    /// Inserts slot `index` at the head of `bucket`.
    ///
    /// A slot that is already a member somewhere is unlinked first, so a
    /// slot never appears in two buckets.
    pub fn push_front(&mut self, bucket: usize, index: u32) {
        debug_assert!(bucket < self.bucket_count(), "bucket out of range");
        self.remove(index);

        let head = self.heads[bucket];
        if let Some(head) = head {
            self.links[head as usize].prev = Some(index);
        }
        self.links[index as usize] = Link {
            bucket,
            prev: None,
            next: head,
            epoch: Some(self.epoch),
        };
        self.heads[bucket] = Some(index);
    }

    /// Removes slot `index` from its bucket.
    ///
    /// Removing a slot that is not a member, or whose membership was dropped
    /// by [`clear`](Self::clear), only resets its record.
    ///
    /// # Returns
    ///
    /// The bucket the slot was removed from, if it was a member.
    pub fn remove(&mut self, index: u32) -> Option<usize> {
        let linked = self.is_linked(index);
        let link = std::mem::take(&mut self.links[index as usize]);
        if !linked {
            return None;
        }

        match link.prev {
            Some(prev) => self.links[prev as usize].next = link.next,
            None => self.heads[link.bucket] = link.next,
        }
        if let Some(next) = link.next {
            self.links[next as usize].prev = link.prev;
        }

        Some(link.bucket)
    }

    /// Empties every bucket without visiting the members.
    pub fn clear(&mut self) {
        self.heads.fill(None);
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Iterates over the members of `bucket`, head first.
    pub fn iter(&self, bucket: usize) -> impl Iterator<Item = u32> + '_ {
        std::iter::successors(self.head(bucket), |&index| self.next(index))
    }

    /// Checks whether `bucket` has no members.
    #[must_use]
    pub fn is_empty(&self, bucket: usize) -> bool {
        self.head(bucket).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(index: &BucketIndex, bucket: usize) -> Vec<u32> {
        index.iter(bucket).collect()
    }

    #[test]
    fn test_push_front_is_lifo() {
        let mut index = BucketIndex::new(4, 8);
        index.push_front(2, 0);
        index.push_front(2, 1);
        index.push_front(2, 2);
        assert_eq!(members(&index, 2), vec![2, 1, 0]);
        assert_eq!(index.bucket_of(1), Some(2));
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let mut index = BucketIndex::new(1, 8);
        for slot in 0..5 {
            index.push_front(0, slot);
        }
        // 4 3 2 1 0
        assert_eq!(index.remove(4), Some(0));
        assert_eq!(index.remove(2), Some(0));
        assert_eq!(index.remove(0), Some(0));
        assert_eq!(members(&index, 0), vec![3, 1]);
        assert_eq!(index.bucket_of(2), None);
    }

    #[test]
    fn test_remove_unlinked_is_noop() {
        let mut index = BucketIndex::new(2, 4);
        index.push_front(1, 3);
        assert_eq!(index.remove(0), None);
        assert_eq!(members(&index, 1), vec![3]);
    }

    #[test]
    fn test_reinsert_moves_between_buckets() {
        let mut index = BucketIndex::new(3, 4);
        index.push_front(0, 1);
        index.push_front(0, 2);
        index.push_front(2, 1);
        assert_eq!(members(&index, 0), vec![2]);
        assert_eq!(members(&index, 2), vec![1]);
    }

    #[test]
    fn test_clear_drops_membership_without_corruption() {
        let mut index = BucketIndex::new(4, 4);
        index.push_front(1, 0);
        index.push_front(1, 1);
        index.clear();

        assert!(index.is_empty(1));
        assert!(!index.is_linked(0));

        // Only slot 1 re-registers after the clear.
        index.push_front(1, 1);
        // Stale removal of slot 0 must not touch the fresh list.
        assert_eq!(index.remove(0), None);
        assert_eq!(members(&index, 1), vec![1]);
        assert_eq!(index.remove(1), Some(1));
        assert!(index.is_empty(1));
    }

    #[test]
    fn test_clamp() {
        let index = BucketIndex::new(8, 1);
        assert_eq!(index.clamp(-5), 0);
        assert_eq!(index.clamp(3), 3);
        assert_eq!(index.clamp(99), 7);
    }
}
