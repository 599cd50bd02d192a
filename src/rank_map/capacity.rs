use alloc::rc::Rc;

use super::{KeyOrder, RankMap};
use crate::comparator::Natural;
use crate::raw::RawTree;

impl<K, V> RankMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankMap;
    ///
    /// let map: RankMap<i32, &str> = RankMap::with_capacity(16);
    /// assert!(map.is_empty());
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

impl<K, V, C> RankMap<K, V, C> {
    /// Creates an empty map whose keys are ordered by `comparator`, with
    /// capacity for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        RankMap {
            tree: Rc::new(RawTree::with_capacity(capacity, KeyOrder(comparator))),
        }
    }
}

impl<K, V, C> RankMap<K, V, C> {
    /// Returns the current capacity of the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }
}
