use crate::raw::Handle;

/// An opaque, stable reference to one element of a set or map.
///
/// A position names a node, not a rank: it stays valid while that node is
/// alive, no matter how rotations or other insertions and removals reshape
/// the tree around it, and it keeps working across copy-on-write promotion
/// (cloned storage preserves position topology). It is invalidated only by
/// the removal of the element it names; dereferencing it afterwards is
/// detected and reported as [`Error::InvalidPosition`](crate::Error), never
/// answered from recycled storage.
///
/// The special past-the-end position ([`RankSet::end_position`] /
/// [`RankMap::end_position`]) is usable as an exclusive erase-window boundary
/// but holds no element.
///
/// Positions are only meaningful for the collection family (the original and
/// its clones) that produced them; using one with an unrelated collection
/// gives an unspecified, but memory-safe, result.
///
/// [`RankSet::end_position`]: crate::RankSet::end_position
/// [`RankMap::end_position`]: crate::RankMap::end_position
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position(pub(crate) Handle);
