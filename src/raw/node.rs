use super::handle::Handle;
use super::size::Size;

/// Node color for red-black rebalancing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A tree node: payload, color, parent/child links and the subtree-size
/// augmentation.
///
/// Links are always valid handles; "no child" is the tree's sentinel node,
/// never an `Option`. Only the sentinel has an empty `item` slot, and the
/// sentinel is always black with size zero.
#[derive(Clone)]
pub(crate) struct Node<T> {
    item: Option<T>,
    pub(crate) color: Color,
    pub(crate) parent: Handle,
    pub(crate) left: Handle,
    pub(crate) right: Handle,
    pub(crate) size: Size,
}

impl<T> Node<T> {
    /// Creates the sentinel node, self-linked through `nil`.
    pub(crate) fn sentinel(nil: Handle) -> Self {
        Self {
            item: None,
            color: Color::Black,
            parent: nil,
            left: nil,
            right: nil,
            size: Size::ZERO,
        }
    }

    /// Creates a fresh red leaf holding `item`, with all links at `nil`.
    pub(crate) fn leaf(item: T, nil: Handle) -> Self {
        Self {
            item: Some(item),
            color: Color::Red,
            parent: nil,
            left: nil,
            right: nil,
            size: Size::ONE,
        }
    }

    #[inline]
    pub(crate) fn item(&self) -> &T {
        self.item.as_ref().expect("`Node::item()` - the sentinel holds no item!")
    }

    #[inline]
    pub(crate) fn item_mut(&mut self) -> &mut T {
        self.item.as_mut().expect("`Node::item_mut()` - the sentinel holds no item!")
    }

    /// Moves the payload out, leaving the node shell behind for the arena to
    /// free.
    #[inline]
    pub(crate) fn into_item(self) -> T {
        self.item.expect("`Node::into_item()` - the sentinel holds no item!")
    }
}
