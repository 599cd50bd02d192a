use core::ops::Index;

use super::RankMap;
use crate::comparator::Comparator;
use crate::error::Error;
use crate::order_statistic::{Rank, Ranks};
use crate::position::Position;

impl<K, V, C> RankMap<K, V, C> {
    /// Returns the entry at position `rank` in sorted key order.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankMap;
    ///
    /// let map = RankMap::from([(10, "a"), (20, "b"), (30, "c")]);
    /// assert_eq!(map.get_by_rank(1), Some((&20, &"b")));
    /// assert!(map.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        let handle = self.tree.select(rank).ok()?;
        let entry = self.tree.item(handle);
        Some((&entry.key, &entry.value))
    }

    /// Returns a lazy sequence of every valid rank, `Rank(0)` up to
    /// `Rank(len - 1)` in ascending order.
    ///
    /// The sequence is computed from the length at the time of the call;
    /// call `ranks` again after mutating the map for a fresh sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Rank, RankMap};
    ///
    /// let map = RankMap::from([(5, "c"), (3, "a"), (8, "z")]);
    /// let values: Vec<&str> = map.ranks().map(|rank| map[rank]).collect();
    /// assert_eq!(values, ["a", "c", "z"]);
    /// ```
    pub fn ranks(&self) -> Ranks {
        Ranks::new(self.len())
    }

    /// Returns the position of the entry with the least key, if any.
    #[must_use]
    pub fn first_position(&self) -> Option<Position> {
        let handle = self.tree.first();
        (handle != self.tree.nil()).then_some(Position(handle))
    }

    /// Returns the position of the entry with the greatest key, if any.
    #[must_use]
    pub fn last_position(&self) -> Option<Position> {
        let handle = self.tree.last();
        (handle != self.tree.nil()).then_some(Position(handle))
    }

    /// Returns the past-the-end position.
    ///
    /// It never holds an entry but it is the natural exclusive upper
    /// boundary for [`erase_span_if`](RankMap::erase_span_if).
    #[must_use]
    pub fn end_position(&self) -> Position {
        Position(self.tree.nil())
    }

    /// Returns the entry at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if the entry named by `position` has been
    /// removed, or if `position` is the past-the-end position.
    pub fn get_at(&self, position: Position) -> Result<(&K, &V), Error> {
        let handle = self.tree.resolve(position.0)?;
        let entry = self.tree.item(handle);
        Ok((&entry.key, &entry.value))
    }

    /// Returns the current rank of the entry at `position`.
    ///
    /// Ranks shift as entries are inserted and removed around a position;
    /// the position itself stays pinned to its entry.
    ///
    /// # Complexity
    ///
    /// O(log n), computed from the size augmentation rather than by
    /// traversal.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if the entry named by `position` has been
    /// removed, or if `position` is the past-the-end position.
    pub fn rank_of_position(&self, position: Position) -> Result<usize, Error> {
        let handle = self.tree.resolve(position.0)?;
        Ok(self.tree.rank_of_node(handle))
    }
}

impl<K, V, C: Comparator<K>> RankMap<K, V, C> {
    /// Returns the zero-based rank of `key` in sorted order, or `None` if
    /// the key is not present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankMap;
    ///
    /// let map = RankMap::from([(10, "a"), (20, "b")]);
    ///
    /// assert_eq!(map.rank_of_key(&20), Some(1));
    /// assert_eq!(map.rank_of_key(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of_key(&self, key: &K) -> Option<usize> {
        let handle = self.find(key)?;
        Some(self.tree.rank_of_node(handle))
    }

    /// Returns the position of the entry for `key`, if any.
    ///
    /// The returned position stays valid until that entry is removed, no
    /// matter how the map is reshaped around it.
    #[must_use]
    pub fn position_of_key(&self, key: &K) -> Option<Position> {
        self.find(key).map(Position)
    }
}

impl<K: Clone, V: Clone, C: Comparator<K> + Clone> RankMap<K, V, C> {
    /// Removes and returns the entry at position `rank` in sorted key order.
    ///
    /// # Complexity
    ///
    /// O(log n): a single select-and-remove pass over the size
    /// augmentation, not a traversal.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `rank >= len`; the map is left unchanged and
    /// the rank is never clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankMap;
    ///
    /// let mut map = RankMap::from([(5, "c"), (3, "a"), (8, "z")]);
    /// assert_eq!(map.remove_by_rank(0), Ok((3, "a")));
    /// assert_eq!(map.get_by_rank(0), Some((&5, &"c")));
    /// assert!(map.remove_by_rank(2).is_err());
    /// ```
    pub fn remove_by_rank(&mut self, rank: usize) -> Result<(K, V), Error> {
        // Validate against the shared tree first so a bad rank never
        // triggers a copy-on-write clone.
        self.tree.select(rank)?;
        let entry = self.tree_mut().remove_by_rank(rank)?;
        Ok((entry.key, entry.value))
    }

    /// Removes and returns the entry at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if the entry named by `position` has
    /// already been removed, or if `position` is the past-the-end position.
    /// A stale position is detected, never read through; the map is left
    /// unchanged and no copy-on-write promotion happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Error, RankMap};
    ///
    /// let mut map = RankMap::from([(1, "a"), (2, "b")]);
    /// let position = map.position_of_key(&2).unwrap();
    ///
    /// assert_eq!(map.remove_at(position), Ok((2, "b")));
    /// assert_eq!(map.remove_at(position), Err(Error::InvalidPosition));
    /// ```
    pub fn remove_at(&mut self, position: Position) -> Result<(K, V), Error> {
        self.tree.resolve(position.0)?;
        let entry = self.tree_mut().remove_node(position.0);
        Ok((entry.key, entry.value))
    }

    /// Applies `pred` to every entry in the in-order window `[start, end)`,
    /// removing the entries for which it returns `true`. Returns the number
    /// of removals.
    ///
    /// Boundaries are positions, not keys: the window stays coherent even
    /// when `pred` removes the entry at `start` itself. `end` is exclusive
    /// and may be [`end_position`](RankMap::end_position).
    ///
    /// # Complexity
    ///
    /// O(w log n) for a window of w entries.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if either boundary names a removed entry,
    /// or if `start` comes after `end` in order (a reversed window); the
    /// map is left unchanged.
    pub fn erase_span_if<F>(&mut self, start: Position, end: Position, mut pred: F) -> Result<usize, Error>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.tree.resolve_boundary(start.0)?;
        self.tree.resolve_boundary(end.0)?;
        if self.tree.boundary_rank(start.0) > self.tree.boundary_rank(end.0) {
            return Err(Error::InvalidPosition);
        }
        Ok(self.tree_mut().erase_span_if(start.0, end.0, |entry| pred(&entry.key, &entry.value)))
    }
}

/// Indexes into the map by rank, yielding the value of the entry at that
/// sorted position.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use rank_tree::{Rank, RankMap};
///
/// let map = RankMap::from([(10, "a"), (20, "b")]);
/// assert_eq!(map[Rank(1)], "b");
/// ```
impl<K, V, C> Index<Rank> for RankMap<K, V, C> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).map(|(_, value)| value).expect("rank out of bounds")
    }
}

/// Indexes into the map by key.
///
/// # Panics
///
/// Panics if the key is not present in the map.
impl<K, V, C: Comparator<K>> Index<&K> for RankMap<K, V, C> {
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        self.get(key).expect("no entry found for key")
    }
}
