use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::comparator::Comparator;
use crate::error::Error;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};
use super::size::Size;

/// Outcome of [`RawTree::insert`].
pub(crate) enum Inserted<T> {
    /// A new node was created.
    New,
    /// A node comparing equal already exists; the offered payload is handed
    /// back untouched. Upsert callers overwrite the stored payload's non-key
    /// fields themselves through [`RawTree::item_mut`].
    Existing(Handle, T),
}

/// The order-statistic red-black tree backing `RankSet` and `RankMap`.
///
/// All node links are arena handles. One designated sentinel node, always
/// black with size zero, serves as the uniform leaf, as the root's parent and
/// as the past-the-end boundary marker. The comparator is injected at
/// construction and defines element equality.
#[derive(Clone)]
pub(crate) struct RawTree<T, C> {
    /// Arena owning every node, the sentinel included.
    arena: Arena<Node<T>>,
    /// Handle of the sentinel. Allocated first, never freed.
    nil: Handle,
    /// Handle of the root node; `nil` when the tree is empty.
    root: Handle,
    /// Number of live (non-sentinel) nodes.
    len: usize,
    /// The active ordering strategy.
    comparator: C,
}

impl<T, C> RawTree<T, C> {
    /// Creates a new, empty tree ordered by `comparator`.
    pub(crate) fn new(comparator: C) -> Self {
        Self::with_capacity(0, comparator)
    }

    /// Creates a new tree with room for `capacity` elements plus the sentinel.
    pub(crate) fn with_capacity(capacity: usize, comparator: C) -> Self {
        let mut arena = Arena::with_capacity(capacity + 1);
        // The sentinel is the first allocation, so its handle is known up
        // front and the node can be born self-linked.
        let nil = Handle::new(0, 0);
        let allocated = arena.alloc(Node::sentinel(nil));
        debug_assert_eq!(allocated, nil);
        Self {
            arena,
            nil,
            root: nil,
            len: 0,
            comparator,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.arena.capacity().saturating_sub(1)
    }

    pub(crate) fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The sentinel handle, doubling as the past-the-end position.
    pub(crate) fn nil(&self) -> Handle {
        self.nil
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<T> {
        self.arena.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.arena.get_mut(handle)
    }

    /// Returns the payload of a live node. Internal callers only; `handle`
    /// must be valid and not the sentinel.
    #[inline]
    pub(crate) fn item(&self, handle: Handle) -> &T {
        self.node(handle).item()
    }

    #[inline]
    pub(crate) fn item_mut(&mut self, handle: Handle) -> &mut T {
        self.node_mut(handle).item_mut()
    }

    /// Validates a caller-supplied handle: it must name a live, non-sentinel
    /// node in this arena. Stale generations are rejected here.
    pub(crate) fn resolve(&self, handle: Handle) -> Result<Handle, Error> {
        if handle != self.nil && self.arena.try_get(handle).is_some() {
            Ok(handle)
        } else {
            Err(Error::InvalidPosition)
        }
    }

    /// Validates an erase-window boundary, which may also be the sentinel
    /// (past-the-end).
    pub(crate) fn resolve_boundary(&self, handle: Handle) -> Result<Handle, Error> {
        if handle == self.nil {
            Ok(handle)
        } else {
            self.resolve(handle)
        }
    }

    #[inline]
    fn subtree_size(&self, handle: Handle) -> usize {
        self.node(handle).size.to_usize()
    }

    /// Re-derives one node's size from its children.
    fn update_size(&mut self, handle: Handle) {
        let size = self.subtree_size(self.node(handle).left) + self.subtree_size(self.node(handle).right) + 1;
        self.node_mut(handle).size = Size::from_usize(size);
    }

    fn minimum(&self, mut handle: Handle) -> Handle {
        while self.node(handle).left != self.nil {
            handle = self.node(handle).left;
        }
        handle
    }

    fn maximum(&self, mut handle: Handle) -> Handle {
        while self.node(handle).right != self.nil {
            handle = self.node(handle).right;
        }
        handle
    }

    /// Leftmost node, or the sentinel when the tree is empty.
    pub(crate) fn first(&self) -> Handle {
        if self.root == self.nil {
            self.nil
        } else {
            self.minimum(self.root)
        }
    }

    /// Rightmost node, or the sentinel when the tree is empty.
    pub(crate) fn last(&self) -> Handle {
        if self.root == self.nil {
            self.nil
        } else {
            self.maximum(self.root)
        }
    }

    /// In-order successor; the sentinel past the last node.
    pub(crate) fn successor(&self, handle: Handle) -> Handle {
        if self.node(handle).right != self.nil {
            return self.minimum(self.node(handle).right);
        }
        let mut x = handle;
        let mut parent = self.node(x).parent;
        while parent != self.nil && x == self.node(parent).right {
            x = parent;
            parent = self.node(parent).parent;
        }
        parent
    }

    /// In-order predecessor; the sentinel before the first node.
    pub(crate) fn predecessor(&self, handle: Handle) -> Handle {
        if self.node(handle).left != self.nil {
            return self.maximum(self.node(handle).left);
        }
        let mut x = handle;
        let mut parent = self.node(x).parent;
        while parent != self.nil && x == self.node(parent).left {
            x = parent;
            parent = self.node(parent).parent;
        }
        parent
    }

    /// Descends from the root following a three-way probe. The probe reports
    /// the ordering of the sought key relative to the visited payload.
    pub(crate) fn search_by<F>(&self, mut probe: F) -> Option<Handle>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut current = self.root;
        while current != self.nil {
            current = match probe(self.node(current).item()) {
                Ordering::Less => self.node(current).left,
                Ordering::Greater => self.node(current).right,
                Ordering::Equal => return Some(current),
            };
        }
        None
    }

    /// Removes the node matching the probe, if any, returning its payload.
    pub(crate) fn remove_by<F>(&mut self, probe: F) -> Option<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let handle = self.search_by(probe)?;
        Some(self.remove_node(handle))
    }

    /// Zero-based count of nodes strictly less than the one at `handle`,
    /// computed by ascending toward the root. O(log n).
    pub(crate) fn rank_of_node(&self, handle: Handle) -> usize {
        let mut rank = self.subtree_size(self.node(handle).left);
        let mut x = handle;
        while x != self.root {
            let parent = self.node(x).parent;
            if x == self.node(parent).right {
                rank += self.subtree_size(self.node(parent).left) + 1;
            }
            x = parent;
        }
        rank
    }

    /// Rank a window boundary occupies in the in-order sequence. The
    /// sentinel is the past-the-end boundary, at rank `len`.
    pub(crate) fn boundary_rank(&self, handle: Handle) -> usize {
        if handle == self.nil {
            self.len
        } else {
            self.rank_of_node(handle)
        }
    }

    /// The node holding the element of the given rank. O(log n); a rank
    /// outside `[0, len)` is an error, never clamped.
    pub(crate) fn select(&self, rank: usize) -> Result<Handle, Error> {
        if rank >= self.len {
            return Err(Error::OutOfRange {
                rank,
                len: self.len,
            });
        }
        let mut current = self.root;
        let mut remaining = rank;
        loop {
            let left_size = self.subtree_size(self.node(current).left);
            match remaining.cmp(&left_size) {
                Ordering::Equal => return Ok(current),
                Ordering::Less => current = self.node(current).left,
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    current = self.node(current).right;
                }
            }
        }
    }

    /// Positional removal: select plus remove, one O(log n) pass each.
    pub(crate) fn remove_by_rank(&mut self, rank: usize) -> Result<T, Error> {
        let handle = self.select(rank)?;
        Ok(self.remove_node(handle))
    }

    /// Applies `pred` over the in-order half-open window `[start, end)`,
    /// removing matches as they are visited. Boundaries are live handles, so
    /// the window survives the removal of its own start node; the successor
    /// is captured before each potential removal. Returns the removal count.
    ///
    /// `start` must not come after `end` in order; callers check this with
    /// [`boundary_rank`](RawTree::boundary_rank) before mutating.
    pub(crate) fn erase_span_if<F>(&mut self, start: Handle, end: Handle, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        let mut current = start;
        while current != end && current != self.nil {
            let next = self.successor(current);
            if pred(self.node(current).item()) {
                drop(self.remove_node(current));
                removed += 1;
            }
            current = next;
        }
        removed
    }

    /// Moves every payload out in ascending order, leaving the tree empty.
    /// O(n): handles are gathered along the in-order chain before any slot is
    /// freed.
    pub(crate) fn drain_in_order(&mut self) -> Vec<T> {
        let mut handles = Vec::with_capacity(self.len);
        let mut current = self.first();
        while current != self.nil {
            handles.push(current);
            current = self.successor(current);
        }

        let mut items = Vec::with_capacity(handles.len());
        for handle in handles {
            items.push(self.arena.take(handle).into_item());
        }

        let nil = self.nil;
        self.root = nil;
        self.len = 0;
        let sentinel = self.node_mut(nil);
        sentinel.parent = nil;
        sentinel.left = nil;
        sentinel.right = nil;
        items
    }

    /// Removes every element. Freed slots keep their bumped generations, so
    /// positions taken before the clear stay detectably dead.
    pub(crate) fn clear(&mut self) {
        drop(self.drain_in_order());
    }

    /// Tree height in nodes (0 when empty). O(n) diagnostic used to observe
    /// the balancing bound.
    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.height_of(self.root)
    }

    #[cfg(test)]
    fn height_of(&self, handle: Handle) -> usize {
        if handle == self.nil {
            0
        } else {
            1 + core::cmp::max(self.height_of(self.node(handle).left), self.height_of(self.node(handle).right))
        }
    }

    fn rotate_left(&mut self, x: Handle) {
        let y = self.node(x).right;
        debug_assert!(y != self.nil);

        let y_left = self.node(y).left;
        self.node_mut(x).right = y_left;
        if y_left != self.nil {
            self.node_mut(y_left).parent = x;
        }

        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        if x_parent == self.nil {
            self.root = y;
        } else if self.node(x_parent).left == x {
            self.node_mut(x_parent).left = y;
        } else {
            self.node_mut(x_parent).right = y;
        }

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;

        // The only two subtree roots whose membership changed.
        self.update_size(x);
        self.update_size(y);
    }

    fn rotate_right(&mut self, x: Handle) {
        let y = self.node(x).left;
        debug_assert!(y != self.nil);

        let y_right = self.node(y).right;
        self.node_mut(x).left = y_right;
        if y_right != self.nil {
            self.node_mut(y_right).parent = x;
        }

        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        if x_parent == self.nil {
            self.root = y;
        } else if self.node(x_parent).right == x {
            self.node_mut(x_parent).right = y;
        } else {
            self.node_mut(x_parent).left = y;
        }

        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;

        self.update_size(x);
        self.update_size(y);
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v` in `u`'s
    /// parent. `v` may be the sentinel; its parent field is scribbled on
    /// purpose so the deletion fixup can navigate from it.
    fn transplant(&mut self, u: Handle, v: Handle) {
        let parent = self.node(u).parent;
        if parent == self.nil {
            self.root = v;
        } else if u == self.node(parent).left {
            self.node_mut(parent).left = v;
        } else {
            self.node_mut(parent).right = v;
        }
        self.node_mut(v).parent = parent;
    }
}

impl<T, C: Comparator<T>> RawTree<T, C> {
    /// Inserts `item` at its unique ordered position. If a node comparing
    /// equal already exists, no node is created and the payload travels back
    /// in [`Inserted::Existing`].
    pub(crate) fn insert(&mut self, item: T) -> Inserted<T> {
        let nil = self.nil;
        let mut parent = nil;
        let mut current = self.root;
        let mut last_cmp = Ordering::Equal;

        while current != nil {
            parent = current;
            last_cmp = self.comparator.compare(&item, self.node(current).item());
            current = match last_cmp {
                Ordering::Less => self.node(current).left,
                Ordering::Greater => self.node(current).right,
                Ordering::Equal => return Inserted::Existing(current, item),
            };
        }

        let z = self.arena.alloc(Node::leaf(item, nil));
        self.node_mut(z).parent = parent;
        self.len += 1;

        if parent == nil {
            // Empty tree: the new node becomes the black root directly and
            // the fixup is skipped.
            self.node_mut(z).color = Color::Black;
            self.root = z;
            return Inserted::New;
        }

        if last_cmp == Ordering::Less {
            self.node_mut(parent).left = z;
        } else {
            self.node_mut(parent).right = z;
        }

        // Grow the augmentation along the path to the root before recoloring;
        // fixup rotations keep themselves consistent.
        let mut p = parent;
        while p != nil {
            let size = self.subtree_size(p) + 1;
            self.node_mut(p).size = Size::from_usize(size);
            p = self.node(p).parent;
        }

        self.insert_fixup(z);
        Inserted::New
    }

    fn insert_fixup(&mut self, mut z: Handle) {
        while self.node(self.node(z).parent).color == Color::Red {
            let parent = self.node(z).parent;
            let grandparent = self.node(parent).parent;

            if parent == self.node(grandparent).left {
                let uncle = self.node(grandparent).right;
                if self.node(uncle).color == Color::Red {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    z = grandparent;
                } else {
                    if z == self.node(parent).right {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.node(z).parent;
                    let grandparent = self.node(parent).parent;
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.node(grandparent).left;
                if self.node(uncle).color == Color::Red {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    z = grandparent;
                } else {
                    if z == self.node(parent).left {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.node(z).parent;
                    let grandparent = self.node(parent).parent;
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }

        let root = self.root;
        self.node_mut(root).color = Color::Black;
    }
}

impl<T, C> RawTree<T, C> {
    /// Removes the node at `handle` and returns its payload. Deletion never
    /// consults the comparator.
    ///
    /// A node with two children is replaced by relinking its in-order
    /// successor into its place (not by swapping payloads), so every
    /// surviving node keeps its handle; only the removed element's own
    /// handle dies.
    pub(crate) fn remove_node(&mut self, z: Handle) -> T {
        let nil = self.nil;
        let mut y = z;
        let mut removed_color = self.node(y).color;
        let x;

        if self.node(z).left == nil {
            x = self.node(z).right;
            self.transplant(z, x);
        } else if self.node(z).right == nil {
            x = self.node(z).left;
            self.transplant(z, x);
        } else {
            y = self.minimum(self.node(z).right);
            removed_color = self.node(y).color;
            x = self.node(y).right;
            if self.node(y).parent == z {
                self.node_mut(x).parent = y;
            } else {
                self.transplant(y, x);
                let z_right = self.node(z).right;
                self.node_mut(y).right = z_right;
                self.node_mut(z_right).parent = y;
            }
            self.transplant(z, y);
            let z_left = self.node(z).left;
            self.node_mut(y).left = z_left;
            self.node_mut(z_left).parent = y;
            let z_color = self.node(z).color;
            self.node_mut(y).color = z_color;
        }

        // Re-derive sizes from the splice point to the root before the
        // fixup; the walk starts at x's parent, which is correct even when x
        // is the sentinel thanks to the transplant scribble.
        let mut p = self.node(x).parent;
        while p != nil {
            self.update_size(p);
            p = self.node(p).parent;
        }

        if removed_color == Color::Black {
            self.delete_fixup(x);
        }

        // Undo any sentinel scribbling.
        self.node_mut(nil).parent = nil;

        self.len -= 1;
        self.arena.take(z).into_item()
    }

    fn delete_fixup(&mut self, mut x: Handle) {
        while x != self.root && self.node(x).color == Color::Black {
            let parent = self.node(x).parent;

            if x == self.node(parent).left {
                let mut w = self.node(parent).right;
                if self.node(w).color == Color::Red {
                    self.node_mut(w).color = Color::Black;
                    self.node_mut(parent).color = Color::Red;
                    self.rotate_left(parent);
                    w = self.node(parent).right;
                }
                if self.node(self.node(w).left).color == Color::Black && self.node(self.node(w).right).color == Color::Black {
                    self.node_mut(w).color = Color::Red;
                    x = parent;
                } else {
                    if self.node(self.node(w).right).color == Color::Black {
                        let w_left = self.node(w).left;
                        self.node_mut(w_left).color = Color::Black;
                        self.node_mut(w).color = Color::Red;
                        self.rotate_right(w);
                        w = self.node(parent).right;
                    }
                    let parent_color = self.node(parent).color;
                    self.node_mut(w).color = parent_color;
                    self.node_mut(parent).color = Color::Black;
                    let w_right = self.node(w).right;
                    self.node_mut(w_right).color = Color::Black;
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut w = self.node(parent).left;
                if self.node(w).color == Color::Red {
                    self.node_mut(w).color = Color::Black;
                    self.node_mut(parent).color = Color::Red;
                    self.rotate_right(parent);
                    w = self.node(parent).left;
                }
                if self.node(self.node(w).right).color == Color::Black && self.node(self.node(w).left).color == Color::Black {
                    self.node_mut(w).color = Color::Red;
                    x = parent;
                } else {
                    if self.node(self.node(w).left).color == Color::Black {
                        let w_right = self.node(w).right;
                        self.node_mut(w_right).color = Color::Black;
                        self.node_mut(w).color = Color::Red;
                        self.rotate_left(w);
                        w = self.node(parent).left;
                    }
                    let parent_color = self.node(parent).color;
                    self.node_mut(w).color = parent_color;
                    self.node_mut(parent).color = Color::Black;
                    let w_left = self.node(w).left;
                    self.node_mut(w_left).color = Color::Black;
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        self.node_mut(x).color = Color::Black;
    }

    /// Builds a balanced tree from strictly ascending `items` in O(n):
    /// midpoint recursion, with the deepest level colored red and every
    /// other level black, deriving sizes as subtrees are assembled.
    pub(crate) fn from_sorted(items: Vec<T>, comparator: C) -> Self {
        let n = items.len();
        let mut tree = Self::with_capacity(n, comparator);
        if n == 0 {
            return tree;
        }

        // Midpoint recursion places every leaf on the last two levels, so
        // coloring exactly the deepest level red keeps black heights uniform.
        let red_depth = n.ilog2() as usize;
        let mut iter = items.into_iter();
        tree.root = tree.build_span(&mut iter, n, 0, red_depth);
        tree.len = n;
        debug_assert!(iter.next().is_none());
        tree
    }

    fn build_span(&mut self, items: &mut alloc::vec::IntoIter<T>, len: usize, depth: usize, red_depth: usize) -> Handle {
        if len == 0 {
            return self.nil;
        }

        let left_len = len / 2;
        let left = self.build_span(items, left_len, depth + 1, red_depth);
        let item = items.next().expect("`RawTree::build_span()` - sorted input ran out early!");
        let right = self.build_span(items, len - left_len - 1, depth + 1, red_depth);

        let nil = self.nil;
        let mut node = Node::leaf(item, nil);
        node.left = left;
        node.right = right;
        node.size = Size::from_usize(len);
        node.color = if depth == red_depth && depth > 0 {
            Color::Red
        } else {
            Color::Black
        };

        let handle = self.arena.alloc(node);
        if left != nil {
            self.node_mut(left).parent = handle;
        }
        if right != nil {
            self.node_mut(right).parent = handle;
        }
        handle
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
impl<T, C: Comparator<T>> RawTree<T, C> {
    /// Asserts every structural invariant: sentinel/root blackness, no
    /// red-red edge, uniform black height, size augmentation, parent links
    /// and strict in-order ordering under the comparator.
    pub(crate) fn check_invariants(&self) {
        assert_eq!(self.node(self.nil).color, Color::Black, "sentinel must be black");
        assert_eq!(self.node(self.nil).size, Size::ZERO, "sentinel size must be zero");
        assert_eq!(self.node(self.nil).parent, self.nil, "sentinel parent left scribbled");

        if self.root == self.nil {
            assert_eq!(self.len, 0);
            return;
        }

        assert_eq!(self.node(self.root).color, Color::Black, "root must be black");
        assert_eq!(self.node(self.root).parent, self.nil, "root parent must be the sentinel");

        let (_black_height, size) = self.check_subtree(self.root);
        assert_eq!(size, self.len, "size augmentation disagrees with len");

        let mut previous: Option<Handle> = None;
        let mut current = self.first();
        while current != self.nil {
            if let Some(prev) = previous {
                assert_eq!(
                    self.comparator.compare(self.item(prev), self.item(current)),
                    Ordering::Less,
                    "in-order traversal must be strictly ascending"
                );
            }
            previous = Some(current);
            current = self.successor(current);
        }
    }

    fn check_subtree(&self, handle: Handle) -> (usize, usize) {
        if handle == self.nil {
            return (0, 0);
        }

        let left = self.node(handle).left;
        let right = self.node(handle).right;

        if self.node(handle).color == Color::Red {
            assert_eq!(self.node(left).color, Color::Black, "red node with red left child");
            assert_eq!(self.node(right).color, Color::Black, "red node with red right child");
        }
        if left != self.nil {
            assert_eq!(self.node(left).parent, handle, "left child parent link broken");
        }
        if right != self.nil {
            assert_eq!(self.node(right).parent, handle, "right child parent link broken");
        }

        let (left_bh, left_size) = self.check_subtree(left);
        let (right_bh, right_size) = self.check_subtree(right);
        assert_eq!(left_bh, right_bh, "black height mismatch");

        let size = left_size + right_size + 1;
        assert_eq!(self.node(handle).size.to_usize(), size, "size augmentation broken");

        let black = usize::from(self.node(handle).color == Color::Black);
        (left_bh + black, size)
    }
}
