use core::iter::FusedIterator;
use core::ops::Range;

/// A zero-based rank into the sorted order of a set or map.
///
/// # Examples
///
/// ```
/// use rank_tree::{Rank, RankMap};
///
/// let mut map = RankMap::new();
/// map.insert("a", 10);
/// map.insert("b", 20);
///
/// assert_eq!(map[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);

/// A lazy sequence of every valid rank, `Rank(0)` up to `Rank(len - 1)` in
/// ascending order.
///
/// This `struct` is created by the `ranks` method on
/// [`RankSet`](crate::RankSet) and [`RankMap`](crate::RankMap). It is
/// computed from the length at the time of the call; call `ranks` again
/// after mutating to get a fresh sequence.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone, Debug)]
pub struct Ranks {
    inner: Range<usize>,
}

impl Ranks {
    pub(crate) fn new(len: usize) -> Self {
        Self { inner: 0..len }
    }
}

impl Iterator for Ranks {
    type Item = Rank;

    fn next(&mut self) -> Option<Rank> {
        self.inner.next().map(Rank)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Ranks {
    fn next_back(&mut self) -> Option<Rank> {
        self.inner.next_back().map(Rank)
    }
}

impl ExactSizeIterator for Ranks {}
impl FusedIterator for Ranks {}
