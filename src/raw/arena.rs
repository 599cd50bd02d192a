use alloc::vec::Vec;

use super::handle::Handle;

/// One arena slot: the stored element (if any) plus the generation stamp
/// consulted when a handle is dereferenced through [`Arena::try_get`].
#[derive(Clone)]
struct Slot<T> {
    generation: u32,
    element: Option<T>,
}

/// Owning storage for all nodes of one tree, with a free list of recycled
/// slots.
///
/// `Clone` is the copy-on-write promotion: a structurally identical,
/// storage-independent deep copy in which every handle addresses the
/// equivalent slot, because slot indices and generations are preserved.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(index) = self.free.pop() {
            // Reuse a free slot. Its generation was bumped when it was freed,
            // so handles to the previous occupant stay dead.
            let slot = &mut self.slots[index];
            slot.element = Some(element);
            Handle::new(index, slot.generation)
        } else {
            // Use strict less-than so the slot count never exceeds Handle::MAX.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Slot {
                generation: 0,
                element: Some(element),
            });
            Handle::new(self.slots.len() - 1, 0)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].element.as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].element.as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns the element named by `handle`, or `None` if the handle is out
    /// of range, names a freed slot, or carries a stale generation.
    ///
    /// This is the checked dereference backing the public position API; the
    /// tree's own links never go stale and use [`get`](Self::get) instead.
    #[inline]
    pub(crate) fn try_get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.to_index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.element.as_ref()
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.to_index()];
        let element = slot.element.take().expect("`Arena::take()` - `handle` is invalid!");
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.to_index());
        element
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert_eq!(arena.capacity(), 10);
    }

    #[test]
    fn stale_handle_is_rejected() {
        let mut arena: Arena<u32> = Arena::with_capacity(0);
        let handle = arena.alloc(7);
        assert_eq!(arena.try_get(handle), Some(&7));

        assert_eq!(arena.take(handle), 7);
        assert_eq!(arena.try_get(handle), None);

        // The slot is recycled under a new generation; the old handle must
        // not resurrect.
        let reused = arena.alloc(8);
        assert_eq!(reused.to_index(), handle.to_index());
        assert_eq!(arena.try_get(handle), None);
        assert_eq!(arena.try_get(reused), Some(&8));
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::with_capacity(0);

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        model.push((handle, value));
                    }
                    Operation::Get(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        prop_assert_eq!(*arena.get(handle), model[index].1);
                        prop_assert_eq!(arena.try_get(handle), Some(&model[index].1));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        *arena.get_mut(handle) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        let value1 = arena.take(handle);
                        let (_, value2) = model.swap_remove(index);
                        prop_assert_eq!(value1, value2);
                        prop_assert_eq!(arena.try_get(handle), None);
                    }
                }

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        Get(usize),
        GetMut(usize, u32),
        Take(usize),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => any::<usize>().prop_map(Operation::Get),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            10 => any::<usize>().prop_map(Operation::Take),
        ]
    }
}
