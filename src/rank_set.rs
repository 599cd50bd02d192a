use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use crate::comparator::{Comparator, Natural};
use crate::raw::{Handle, Inserted, RawTree};

mod capacity;
mod order_statistic;

/// An ordered set with O(log n) rank operations and value semantics.
///
/// `RankSet` keeps its elements sorted under a pluggable [`Comparator`]
/// (by default the element type's [`Ord`] ordering) in a red-black tree
/// augmented with subtree sizes, so element lookup, insertion, removal,
/// rank queries and positional removal are all O(log n).
///
/// Two elements comparing equal under the active comparator are the same
/// element as far as the set is concerned; [`insert`](RankSet::insert) never
/// creates a duplicate.
///
/// # Value semantics
///
/// `clone` is O(1): both copies share storage until one of them mutates, at
/// which point the mutating copy takes a full private copy first
/// (copy-on-write). Read-only operations never copy. Sharing is tracked with
/// a non-atomic reference count, so a `RankSet` is not `Send`/`Sync`;
/// mutating one value from multiple threads requires external
/// synchronization, while genuinely distinct copies are always isolated from
/// each other's mutations.
///
/// It is a logic error for an element to be modified in such a way that its
/// ordering relative to any other element, as determined by the active
/// comparator, changes while it is in the set. The behavior resulting from
/// such a logic error may include missing or misordered elements but never
/// undefined behavior.
///
/// # Examples
///
/// ```
/// use rank_tree::RankSet;
///
/// let mut books = RankSet::new();
///
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
///
/// assert!(books.contains(&"The Odyssey"));
/// assert_eq!(books.get_by_rank(0), Some(&"A Dance With Dragons"));
///
/// books.remove(&"The Odyssey");
/// assert_eq!(books.len(), 2);
/// ```
///
/// A `RankSet` with a known list of items can be initialized from an array:
///
/// ```
/// use rank_tree::RankSet;
///
/// let set = RankSet::from([1, 2, 3]);
/// ```
pub struct RankSet<T, C = Natural> {
    tree: Rc<RawTree<T, C>>,
}

/// An iterator over the items of a `RankSet` in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`RankSet`].
///
/// # Examples
///
/// ```
/// use rank_tree::RankSet;
///
/// let set = RankSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// ```
///
/// [`iter`]: RankSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, C = Natural> {
    tree: &'a RawTree<T, C>,
    front: Handle,
    back: Handle,
    remaining: usize,
}

/// An owning iterator over the items of a `RankSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`RankSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: RankSet#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> RankSet<T> {
    /// Creates an empty set ordered by the element type's native ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let set: RankSet<i32> = RankSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> RankSet<T, C> {
    /// Creates an empty set ordered by `comparator`.
    ///
    /// The comparator must implement a strict weak ordering; see
    /// [`Comparator`] for the contract and an example.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            tree: Rc::new(RawTree::new(comparator)),
        }
    }
}

impl<T, C: Comparator<T>> RankSet<T, C> {
    /// Returns `true` if the set contains a value equal to `value` under the
    /// active comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let set = RankSet::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Returns a reference to the stored element equal to `value` under the
    /// active comparator, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(value).map(|handle| self.tree.item(handle))
    }

    fn find(&self, value: &T) -> Option<Handle> {
        let comparator = self.tree.comparator();
        self.tree.search_by(|stored| comparator.compare(value, stored))
    }
}

impl<T, C> RankSet<T, C> {
    /// Returns the number of elements in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns a reference to the first (least) element, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let set = RankSet::from([3, 1, 2]);
    /// assert_eq!(set.first(), Some(&1));
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        let handle = self.tree.first();
        (handle != self.tree.nil()).then(|| self.tree.item(handle))
    }

    /// Returns a reference to the last (greatest) element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        let handle = self.tree.last();
        (handle != self.tree.nil()).then(|| self.tree.item(handle))
    }

    /// Gets an iterator that visits the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            tree: &self.tree,
            front: self.tree.first(),
            back: self.tree.last(),
            remaining: self.tree.len(),
        }
    }

    /// Returns `true` if `self` and `other` currently share storage, i.e.
    /// one was cloned from the other and neither has mutated since.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let a = RankSet::from([1, 2]);
    /// let mut b = a.clone();
    /// assert!(a.shares_storage(&b));
    ///
    /// b.insert(3); // b takes a private copy
    /// assert!(!a.shares_storage(&b));
    /// assert_eq!(a.len(), 2);
    /// ```
    #[must_use]
    pub fn shares_storage(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }
}

impl<T: Clone, C: Comparator<T> + Clone> RankSet<T, C> {
    /// Ensures exclusive ownership of the storage, cloning the whole tree if
    /// it is currently shared, and returns it mutably. Every mutating entry
    /// point funnels through here.
    fn tree_mut(&mut self) -> &mut RawTree<T, C> {
        Rc::make_mut(&mut self.tree)
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. If the set already has
    /// an element comparing equal, the stored element is kept and `value` is
    /// dropped; see [`replace`](RankSet::replace) for the swapping variant.
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
    /// let mut set = RankSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        matches!(self.tree_mut().insert(value), Inserted::New)
    }

    /// Adds a value to the set, replacing the stored element equal to it,
    /// if any. Returns the replaced element.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let tree = self.tree_mut();
        match tree.insert(value) {
            Inserted::New => None,
            Inserted::Existing(handle, value) => Some(core::mem::replace(tree.item_mut(handle), value)),
        }
    }

    /// Removes the element equal to `value` from the set. Returns whether
    /// such an element was present.
    ///
    /// Removing an absent value is a no-op: the set is unchanged and no
    /// copy-on-write promotion happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let mut set = RankSet::from([2]);
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored element equal to `value`, if any.
    pub fn take(&mut self, value: &T) -> Option<T> {
        // Probe read-only first so an absent value never triggers a clone.
        if !self.contains(value) {
            return None;
        }
        let comparator = self.tree.comparator().clone();
        self.tree_mut().remove_by(|stored| comparator.compare(value, stored))
    }

    /// Removes and returns the first (least) element, if any.
    pub fn pop_first(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let tree = self.tree_mut();
        let first = tree.first();
        Some(tree.remove_node(first))
    }

    /// Removes and returns the last (greatest) element, if any.
    pub fn pop_last(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let tree = self.tree_mut();
        let last = tree.last();
        Some(tree.remove_node(last))
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.tree_mut().clear();
    }

    /// Removes every element for which `pred` returns `true`, visiting the
    /// whole set in ascending order. Returns the number of removals.
    ///
    /// # Complexity
    ///
    /// O(n log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankSet;
    ///
    /// let mut set = RankSet::from([1, 2, 3, 4]);
    /// assert_eq!(set.erase_if(|v| v % 2 == 0), 2);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3]);
    /// ```
    pub fn erase_if<F>(&mut self, pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        if self.is_empty() {
            return 0;
        }
        let tree = self.tree_mut();
        let start = tree.first();
        let end = tree.nil();
        tree.erase_span_if(start, end, pred)
    }

    fn from_unsorted(mut items: Vec<T>, comparator: C) -> Self {
        items.sort_by(|a, b| comparator.compare(a, b));
        // The sort is stable, so keeping the head of each equal run keeps
        // the first occurrence, matching `insert`'s keep-existing semantics.
        items.dedup_by(|later, earlier| comparator.compare(earlier, later) == Ordering::Equal);
        Self {
            tree: Rc::new(RawTree::from_sorted(items, comparator)),
        }
    }
}

impl<T, C> Clone for RankSet<T, C> {
    /// Makes an O(1) copy sharing storage with `self`; whichever copy
    /// mutates first pays for one full clone of the tree at that point.
    fn clone(&self) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
        }
    }
}

impl<T> Default for RankSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RankSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for RankSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq, C> Eq for RankSet<T, C> {}

/// Builds the set from the iterator's items in O(n log n): collect, sort
/// under the comparator, then assemble a balanced tree in one O(n) pass.
///
/// Items comparing equal are collapsed to the **first** occurrence,
/// matching [`insert`](RankSet::insert)'s keep-existing semantics.
impl<T: Clone + Ord> FromIterator<T> for RankSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().collect(), Natural)
    }
}

impl<T: Clone + Ord, const N: usize> From<[T; N]> for RankSet<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Clone, C: Comparator<T> + Clone> Extend<T> for RankSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RankSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}

impl<T: Clone, C: Comparator<T> + Clone> IntoIterator for RankSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let mut tree = Rc::try_unwrap(self.tree).unwrap_or_else(|shared| (*shared).clone());
        IntoIter {
            inner: tree.drain_in_order().into_iter(),
        }
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front;
        self.front = self.tree.successor(handle);
        self.remaining -= 1;
        Some(self.tree.item(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, C> DoubleEndedIterator for Iter<'_, T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back;
        self.back = self.tree.predecessor(handle);
        self.remaining -= 1;
        Some(self.tree.item(handle))
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, C> FusedIterator for Iter<'_, T, C> {}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner.as_slice()).finish()
    }
}
