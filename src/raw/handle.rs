use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A stable reference to one arena slot.
///
/// A handle pairs a slot index with the generation the slot carried when the
/// element was allocated. Freeing a slot bumps its generation, so a handle to
/// a removed element can never alias a later occupant of the same slot; it is
/// rejected by [`Arena::try_get`](super::arena::Arena::try_get) instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Handle {
    slot: NonZero<RawHandle>,
    generation: u32,
}

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn new(index: usize, generation: u32) -> Self {
        assert!(index <= Self::MAX, "`Handle::new()` - `index` > `Handle::MAX`!");
        // `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self {
            slot: NonZero::new((index + 1) as RawHandle).unwrap(),
            generation,
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.slot.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}
