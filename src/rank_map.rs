use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use crate::comparator::{Comparator, Natural};
use crate::raw::{Handle, Inserted, RawTree};

mod capacity;
mod order_statistic;

/// One stored key-value pair. The comparator only ever sees the key, so the
/// value never participates in ordering.
#[derive(Clone)]
pub(crate) struct MapEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Projects a key comparator onto whole entries, letting the map reuse the
/// set's tree engine unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct KeyOrder<C>(pub(crate) C);

impl<K, V, C: Comparator<K>> Comparator<MapEntry<K, V>> for KeyOrder<C> {
    #[inline]
    fn compare(&self, a: &MapEntry<K, V>, b: &MapEntry<K, V>) -> Ordering {
        self.0.compare(&a.key, &b.key)
    }
}

/// An ordered map with O(log n) rank operations and value semantics.
///
/// `RankMap` keeps its entries sorted by key under a pluggable
/// [`Comparator`] (by default the key type's [`Ord`] ordering), in the same
/// size-augmented red-black tree that backs [`RankSet`](crate::RankSet).
/// Key lookup, insertion, removal, rank queries and positional removal are
/// all O(log n).
///
/// `clone` is O(1) and copy-on-write, exactly as for
/// [`RankSet`](crate::RankSet#value-semantics): copies share storage until
/// one of them mutates.
///
/// # Writing through a key
///
/// Two distinct operations cover the upsert/update split:
///
/// - [`insert`](RankMap::insert) always stores the value, creating the entry
///   if the key is absent (upsert, last write wins).
/// - [`replace_value`](RankMap::replace_value) only overwrites an existing
///   entry's value; **on an absent key it is a deliberate no-op** returning
///   `None` and dropping the offered value.
///
/// # Examples
///
/// ```
/// use rank_tree::{Rank, RankMap};
///
/// let mut scores = RankMap::new();
/// scores.insert("Alice", 100);
/// scores.insert("Bob", 85);
/// scores.insert("Carol", 92);
///
/// assert_eq!(scores.get(&"Bob"), Some(&85));
/// assert_eq!(scores.len(), 3);
///
/// // Order-statistic operations (O(log n))
/// let (name, score) = scores.get_by_rank(1).unwrap();
/// assert_eq!(*name, "Bob"); // Keys are sorted alphabetically
/// assert_eq!(scores.rank_of_key(&"Carol"), Some(2));
/// assert_eq!(scores[Rank(0)], 100); // Alice's score
/// ```
pub struct RankMap<K, V, C = Natural> {
    tree: Rc<RawTree<MapEntry<K, V>, KeyOrder<C>>>,
}

/// An iterator over the entries of a `RankMap` in ascending key order.
///
/// This `struct` is created by the [`iter`] method on [`RankMap`].
///
/// [`iter`]: RankMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V, C = Natural> {
    tree: &'a RawTree<MapEntry<K, V>, KeyOrder<C>>,
    front: Handle,
    back: Handle,
    remaining: usize,
}

/// An iterator over the keys of a `RankMap` in ascending order.
///
/// This `struct` is created by the [`keys`] method on [`RankMap`].
///
/// [`keys`]: RankMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V, C = Natural> {
    inner: Iter<'a, K, V, C>,
}

/// An iterator over the values of a `RankMap` in ascending key order.
///
/// This `struct` is created by the [`values`] method on [`RankMap`].
///
/// [`values`]: RankMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V, C = Natural> {
    inner: Iter<'a, K, V, C>,
}

/// An owning iterator over the entries of a `RankMap` in ascending key
/// order.
///
/// This `struct` is created by the [`into_iter`] method on [`RankMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: RankMap#method.into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> RankMap<K, V> {
    /// Creates an empty map ordered by the key type's native ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankMap;
    ///
    /// let map: RankMap<i32, &str> = RankMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C> RankMap<K, V, C> {
    /// Creates an empty map whose keys are ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            tree: Rc::new(RawTree::new(KeyOrder(comparator))),
        }
    }
}

impl<K, V, C: Comparator<K>> RankMap<K, V, C> {
    /// Returns `true` if the map contains an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns a reference to the value corresponding to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankMap;
    ///
    /// let mut map = RankMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let handle = self.find(key)?;
        Some(&self.tree.item(handle).value)
    }

    /// Returns the stored key-value pair corresponding to `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let handle = self.find(key)?;
        let entry = self.tree.item(handle);
        Some((&entry.key, &entry.value))
    }

    fn find(&self, key: &K) -> Option<Handle> {
        let comparator = self.tree.comparator();
        self.tree.search_by(|entry| comparator.0.compare(key, &entry.key))
    }
}

impl<K, V, C> RankMap<K, V, C> {
    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the entry with the least key, if any.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.tree.first();
        (handle != self.tree.nil()).then(|| {
            let entry = self.tree.item(handle);
            (&entry.key, &entry.value)
        })
    }

    /// Returns the entry with the greatest key, if any.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.tree.last();
        (handle != self.tree.nil()).then(|| {
            let entry = self.tree.item(handle);
            (&entry.key, &entry.value)
        })
    }

    /// Gets an iterator over the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            tree: &self.tree,
            front: self.tree.first(),
            back: self.tree.last(),
            remaining: self.tree.len(),
        }
    }

    /// Gets an iterator over the keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys {
            inner: self.iter(),
        }
    }

    /// Gets an iterator over the values in ascending key order.
    pub fn values(&self) -> Values<'_, K, V, C> {
        Values {
            inner: self.iter(),
        }
    }

    /// Returns `true` if `self` and `other` currently share storage, i.e.
    /// one was cloned from the other and neither has mutated since.
    #[must_use]
    pub fn shares_storage(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }
}

impl<K: Clone, V: Clone, C: Comparator<K> + Clone> RankMap<K, V, C> {
    /// Ensures exclusive ownership of the storage, cloning the whole tree if
    /// it is currently shared, and returns it mutably. Every mutating entry
    /// point funnels through here.
    fn tree_mut(&mut self) -> &mut RawTree<MapEntry<K, V>, KeyOrder<C>> {
        Rc::make_mut(&mut self.tree)
    }

    /// Inserts a key-value pair into the map (upsert).
    ///
    /// If an entry with an equal key exists, its value is overwritten and
    /// the old value returned; the stored key itself is kept. Otherwise a
    /// new entry is created and `None` returned.
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
    /// let mut map = RankMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let tree = self.tree_mut();
        match tree.insert(MapEntry {
            key,
            value,
        }) {
            Inserted::New => None,
            Inserted::Existing(handle, entry) => Some(core::mem::replace(&mut tree.item_mut(handle).value, entry.value)),
        }
    }

    /// Overwrites the value of an existing entry, returning the old value.
    ///
    /// **An absent key is a no-op**: the map is unchanged (no copy-on-write
    /// promotion happens), the offered value is dropped and `None` is
    /// returned. This is the write-through-a-key policy of this map; use
    /// [`insert`](RankMap::insert) when absent keys should be created.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankMap;
    ///
    /// let mut map = RankMap::new();
    /// map.insert("a", 1);
    ///
    /// assert_eq!(map.replace_value(&"a", 10), Some(1));
    /// assert_eq!(map.replace_value(&"b", 20), None);
    /// assert!(!map.contains_key(&"b"));
    /// ```
    pub fn replace_value(&mut self, key: &K, value: V) -> Option<V> {
        if !self.contains_key(key) {
            return None;
        }
        let comparator = self.tree.comparator().clone();
        let tree = self.tree_mut();
        let handle = tree.search_by(|entry| comparator.0.compare(key, &entry.key))?;
        Some(core::mem::replace(&mut tree.item_mut(handle).value, value))
    }

    /// Returns a mutable reference to the value corresponding to `key`.
    ///
    /// An absent key never triggers a copy-on-write promotion.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if !self.contains_key(key) {
            return None;
        }
        let comparator = self.tree.comparator().clone();
        let tree = self.tree_mut();
        let handle = tree.search_by(|entry| comparator.0.compare(key, &entry.key))?;
        Some(&mut tree.item_mut(handle).value)
    }

    /// Removes the entry for `key`, returning its value if it was present.
    ///
    /// Removing an absent key is a no-op: the map is unchanged and no
    /// copy-on-write promotion happens.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry for `key`, returning the stored pair if present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        if !self.contains_key(key) {
            return None;
        }
        let comparator = self.tree.comparator().clone();
        let entry = self.tree_mut().remove_by(|entry| comparator.0.compare(key, &entry.key))?;
        Some((entry.key, entry.value))
    }

    /// Removes and returns the entry with the least key, if any.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        let tree = self.tree_mut();
        let first = tree.first();
        let entry = tree.remove_node(first);
        Some((entry.key, entry.value))
    }

    /// Removes and returns the entry with the greatest key, if any.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        let tree = self.tree_mut();
        let last = tree.last();
        let entry = tree.remove_node(last);
        Some((entry.key, entry.value))
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.tree_mut().clear();
    }

    /// Removes every entry for which `pred` returns `true`, visiting the
    /// whole map in ascending key order. Returns the number of removals.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankMap;
    ///
    /// let mut map: RankMap<i32, i32> = (0..8).map(|k| (k, k * 10)).collect();
    /// assert_eq!(map.erase_if(|k, _| k % 2 == 0), 4);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 5, 7]);
    /// ```
    pub fn erase_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        if self.is_empty() {
            return 0;
        }
        let tree = self.tree_mut();
        let start = tree.first();
        let end = tree.nil();
        tree.erase_span_if(start, end, |entry| pred(&entry.key, &entry.value))
    }

    fn from_unsorted(mut entries: Vec<MapEntry<K, V>>, comparator: C) -> Self {
        let key_order = KeyOrder(comparator);
        entries.sort_by(|a, b| key_order.compare(a, b));
        // The sort is stable, so equal keys keep their input order; swapping
        // before dropping the duplicate keeps the last occurrence, matching
        // `insert`'s overwrite semantics.
        entries.dedup_by(|later, earlier| {
            if key_order.compare(earlier, later) == Ordering::Equal {
                core::mem::swap(earlier, later);
                true
            } else {
                false
            }
        });
        Self {
            tree: Rc::new(RawTree::from_sorted(entries, key_order)),
        }
    }
}

impl<K, V, C> Clone for RankMap<K, V, C> {
    /// Makes an O(1) copy sharing storage with `self`; whichever copy
    /// mutates first pays for one full clone of the tree at that point.
    fn clone(&self) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
        }
    }
}

impl<K, V> Default for RankMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RankMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RankMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RankMap<K, V, C> {}

/// Builds the map from the iterator's pairs in O(n log n): collect, sort by
/// key under the comparator, then assemble a balanced tree in one O(n) pass.
///
/// Pairs with equal keys are collapsed to the **last** occurrence, matching
/// [`insert`](RankMap::insert)'s overwrite semantics.
impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for RankMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| MapEntry {
                key,
                value,
            })
            .collect();
        Self::from_unsorted(entries, Natural)
    }
}

impl<K: Clone + Ord, V: Clone, const N: usize> From<[(K, V); N]> for RankMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Clone, V: Clone, C: Comparator<K> + Clone> Extend<(K, V)> for RankMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RankMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Iter<'a, K, V, C> {
        self.iter()
    }
}

impl<K: Clone, V: Clone, C: Comparator<K> + Clone> IntoIterator for RankMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        let mut tree = Rc::try_unwrap(self.tree).unwrap_or_else(|shared| (*shared).clone());
        let pairs: Vec<(K, V)> = tree.drain_in_order().into_iter().map(|entry| (entry.key, entry.value)).collect();
        IntoIter {
            inner: pairs.into_iter(),
        }
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front;
        self.front = self.tree.successor(handle);
        self.remaining -= 1;
        let entry = self.tree.item(handle);
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back;
        self.back = self.tree.predecessor(handle);
        self.remaining -= 1;
        let entry = self.tree.item(handle);
        Some((&entry.key, &entry.value))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Iter<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Keys<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V, C> ExactSizeIterator for Keys<'_, K, V, C> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Values<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V, C> ExactSizeIterator for Values<'_, K, V, C> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}
