use alloc::rc::Rc;

use super::RankSet;
use crate::comparator::Natural;
use crate::raw::RawTree;

impl<T> RankSet<T> {
    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let set: RankSet<i32> = RankSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<T, C> RankSet<T, C> {
    /// Creates an empty set ordered by `comparator` with capacity for at
    /// least `capacity` elements.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        RankSet {
            tree: Rc::new(RawTree::with_capacity(capacity, comparator)),
        }
    }
}

impl<T, C> RankSet<T, C> {
    /// Returns the current capacity of the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let set: RankSet<i32> = RankSet::with_capacity(32);
    /// assert!(set.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }
}
