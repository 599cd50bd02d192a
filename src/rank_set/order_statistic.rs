use core::ops::Index;

use super::RankSet;
use crate::comparator::Comparator;
use crate::error::Error;
use crate::order_statistic::{Rank, Ranks};
use crate::position::Position;

impl<T, C> RankSet<T, C> {
    /// Returns the element at position `rank` in sorted order.
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
    /// use rank_tree::RankSet;
    ///
    /// let set = RankSet::from([10, 20, 30]);
    /// assert_eq!(set.get_by_rank(1), Some(&20));
    /// assert!(set.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        let handle = self.tree.select(rank).ok()?;
        Some(self.tree.item(handle))
    }

    /// Returns a lazy sequence of every valid rank, `Rank(0)` up to
    /// `Rank(len - 1)` in ascending order.
    ///
    /// The sequence is computed from the length at the time of the call;
    /// call `ranks` again after mutating the set for a fresh sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Rank, RankSet};
    ///
    /// let set = RankSet::from([5, 3, 8]);
    /// let sorted: Vec<i32> = set.ranks().map(|rank| set[rank]).collect();
    /// assert_eq!(sorted, [3, 5, 8]);
    /// ```
    pub fn ranks(&self) -> Ranks {
        Ranks::new(self.len())
    }

    /// Returns the position of the first (least) element, if any.
    #[must_use]
    pub fn first_position(&self) -> Option<Position> {
        let handle = self.tree.first();
        (handle != self.tree.nil()).then_some(Position(handle))
    }

    /// Returns the position of the last (greatest) element, if any.
    #[must_use]
    pub fn last_position(&self) -> Option<Position> {
        let handle = self.tree.last();
        (handle != self.tree.nil()).then_some(Position(handle))
    }

    /// Returns the past-the-end position.
    ///
    /// It never holds an element (dereferencing it is an error), but it is
    /// the natural exclusive upper boundary for
    /// [`erase_span_if`](RankSet::erase_span_if).
    #[must_use]
    pub fn end_position(&self) -> Position {
        Position(self.tree.nil())
    }

    /// Returns the element at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if the element named by `position` has
    /// been removed, or if `position` is the past-the-end position.
    pub fn get_at(&self, position: Position) -> Result<&T, Error> {
        let handle = self.tree.resolve(position.0)?;
        Ok(self.tree.item(handle))
    }

    /// Returns the current rank of the element at `position`.
    ///
    /// Ranks shift as elements are inserted and removed around a position;
    /// the position itself stays pinned to its element.
    ///
    /// # Complexity
    ///
    /// O(log n), computed from the size augmentation rather than by
    /// traversal.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if the element named by `position` has
    /// been removed, or if `position` is the past-the-end position.
    pub fn rank_of_position(&self, position: Position) -> Result<usize, Error> {
        let handle = self.tree.resolve(position.0)?;
        Ok(self.tree.rank_of_node(handle))
    }
}

impl<T, C: Comparator<T>> RankSet<T, C> {
    /// Returns the zero-based rank of `value` in sorted order, or `None` if
    /// the value is not present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let set = RankSet::from([10, 20]);
    ///
    /// assert_eq!(set.rank_of(&20), Some(1));
    /// assert_eq!(set.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, value: &T) -> Option<usize> {
        let handle = self.find(value)?;
        Some(self.tree.rank_of_node(handle))
    }

    /// Returns the position of the stored element equal to `value`, if any.
    ///
    /// The returned position stays valid until that element is removed, no
    /// matter how the set is reshaped around it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let mut set = RankSet::from([10, 20, 30]);
    /// let position = set.position_of(&20).unwrap();
    ///
    /// set.insert(15);
    /// assert_eq!(set.get_at(position), Ok(&20));
    /// assert_eq!(set.rank_of_position(position), Ok(2));
    /// ```
    #[must_use]
    pub fn position_of(&self, value: &T) -> Option<Position> {
        self.find(value).map(Position)
    }
}

impl<T: Clone, C: Comparator<T> + Clone> RankSet<T, C> {
    /// Removes and returns the element at position `rank` in sorted order.
    ///
    /// # Complexity
    ///
    /// O(log n): a single select-and-remove pass over the size
    /// augmentation, not a traversal.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `rank >= len`; the set is left unchanged and
    /// the rank is never clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let mut set = RankSet::from([5, 3, 8, 1, 4]);
    /// assert_eq!(set.remove_by_rank(0), Ok(1));
    /// assert_eq!(set.get_by_rank(0), Some(&3));
    /// assert!(set.remove_by_rank(4).is_err());
    /// ```
    pub fn remove_by_rank(&mut self, rank: usize) -> Result<T, Error> {
        // Validate against the shared tree first so a bad rank never
        // triggers a copy-on-write clone.
        self.tree.select(rank)?;
        self.tree_mut().remove_by_rank(rank)
    }

    /// Removes and returns the element at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if the element named by `position` has
    /// already been removed, or if `position` is the past-the-end position.
    /// A stale position is detected, never read through; the set is left
    /// unchanged and no copy-on-write promotion happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Error, RankSet};
    ///
    /// let mut set = RankSet::from([1, 2, 3]);
    /// let position = set.position_of(&2).unwrap();
    ///
    /// assert_eq!(set.remove_at(position), Ok(2));
    /// assert_eq!(set.remove_at(position), Err(Error::InvalidPosition));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn remove_at(&mut self, position: Position) -> Result<T, Error> {
        self.tree.resolve(position.0)?;
        Ok(self.tree_mut().remove_node(position.0))
    }

    /// Applies `pred` to every element in the in-order window
    /// `[start, end)`, removing the elements for which it returns `true`.
    /// Returns the number of removals.
    ///
    /// Boundaries are positions, not keys: the window stays coherent even
    /// when `pred` removes the element at `start` itself. `end` is
    /// exclusive and may be [`end_position`](RankSet::end_position).
    ///
    /// # Complexity
    ///
    /// O(w log n) for a window of w elements.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if either boundary names a removed
    /// element, or if `start` comes after `end` in order (a reversed
    /// window); the set is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let mut set = RankSet::from([1, 2, 3, 4, 5, 6]);
    /// let start = set.position_of(&2).unwrap();
    /// let end = set.position_of(&5).unwrap();
    ///
    /// // Removes 2 and 4; 5 is outside the half-open window.
    /// assert_eq!(set.erase_span_if(start, end, |v| v % 2 == 0), Ok(2));
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 5, 6]);
    /// ```
    pub fn erase_span_if<F>(&mut self, start: Position, end: Position, pred: F) -> Result<usize, Error>
    where
        F: FnMut(&T) -> bool,
    {
        self.tree.resolve_boundary(start.0)?;
        self.tree.resolve_boundary(end.0)?;
        if self.tree.boundary_rank(start.0) > self.tree.boundary_rank(end.0) {
            return Err(Error::InvalidPosition);
        }
        Ok(self.tree_mut().erase_span_if(start.0, end.0, pred))
    }
}

/// Indexes into the set by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use rank_tree::{Rank, RankSet};
///
/// let set = RankSet::from([10, 20, 30]);
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<T, C> Index<Rank> for RankSet<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).expect("rank out of bounds")
    }
}
