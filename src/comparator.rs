use core::cmp::Ordering;

/// A pluggable total-order three-way comparison.
///
/// A comparator is injected when a collection is constructed and defines the
/// collection's notion of "same key": inserting a payload that compares
/// [`Equal`](Ordering::Equal) to a stored one never creates a second node.
///
/// # Contract
///
/// `compare` must be a strict weak ordering: irreflexive on `Less`/`Greater`,
/// transitive, with exactly one of the three results holding for any pair. It
/// is a logic error to violate this, or to mutate stored elements so that
/// their relative order changes. A violation may produce missing or
/// misordered elements, but never memory unsafety; node storage stays sound.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use rank_tree::{Comparator, RankSet};
///
/// #[derive(Clone, Copy, Default)]
/// struct ByMagnitude;
///
/// impl Comparator<i32> for ByMagnitude {
///     fn compare(&self, a: &i32, b: &i32) -> Ordering {
///         a.abs().cmp(&b.abs())
///     }
/// }
///
/// let mut set = RankSet::with_comparator(ByMagnitude);
/// set.insert(-3);
/// set.insert(1);
/// assert!(set.contains(&3)); // equal to -3 under ByMagnitude
/// assert_eq!(set.get_by_rank(1), Some(&-3));
/// ```
pub trait Comparator<T: ?Sized> {
    /// Returns the ordering of `a` relative to `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The default comparator: a type's native [`Ord`] ordering.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}
