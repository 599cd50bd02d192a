use super::handle::Handle;

/// The number of nodes in a subtree, including the subtree root itself.
///
/// Kept as a dedicated type so that the augmentation field cannot be confused
/// with ranks or slot indices, and so that its range is tied to the arena's
/// addressable capacity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(usize);

impl Size {
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ZERO: Self = Self(0);
    pub(crate) const ONE: Self = Self(1);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        Self(size)
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    #[should_panic(expected = "`Size::from_usize()` - `size` > `Size::MAX`!")]
    fn invalid_size() {
        let _ = Size::from_usize(Size::MAX + 1);
    }

    proptest! {
        #[test]
        fn size_round_trip(size in 0..=Size::MAX) {
            let size_value = Size::from_usize(size);
            assert_eq!(size_value.to_usize(), size);
        }
    }
}
