use alloc::alloc::{dealloc, Layout};
use alloc::boxed::Box;
use core::any::type_name;
use core::mem::{self, MaybeUninit};
use core::ptr;

use log::trace;

use crate::holder::{ErasedHolder, TypedHolder};
use crate::sptr;
use crate::token::TypeToken;

/// Where the current holder lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tag {
    Empty,
    Small,
    Big,
}

enum Slot<Space> {
    Empty,
    // Only the vtable half is meaningful, the address is rebased onto `space` on access.
    Small(*const dyn ErasedHolder<Space>),
    Big(Box<dyn ErasedHolder<Space>>),
}

/// Inline buffer plus the record of what occupies it.
///
/// The slot decides how a holder is reclaimed: `Small` holders are dropped in
/// place and the buffer is kept, `Big` holders give their allocation back.
pub(crate) struct Storage<Space> {
    space: MaybeUninit<Space>,
    slot: Slot<Space>,
}

impl<Space> Storage<Space> {
    pub(crate) const fn new() -> Storage<Space> {
        Storage {
            space: MaybeUninit::uninit(),
            slot: Slot::Empty,
        }
    }

    /// Returns true if a `T` is placed inline rather than boxed.
    pub(crate) const fn fits<T>() -> bool {
        mem::size_of::<TypedHolder<T>>() <= mem::size_of::<Space>()
            && mem::align_of::<TypedHolder<T>>() <= mem::align_of::<Space>()
    }

    pub(crate) fn tag(&self) -> Tag {
        match self.slot {
            Slot::Empty => Tag::Empty,
            Slot::Small(_) => Tag::Small,
            Slot::Big(_) => Tag::Big,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        matches!(self.slot, Slot::Empty)
    }

    /// Places `value` inline or on the heap and returns the new holder.
    ///
    /// The storage must be empty.
    pub(crate) fn allocate<T>(&mut self, value: T) -> &mut dyn ErasedHolder<Space>
    where
        T: Clone + 'static,
    {
        debug_assert!(self.is_empty(), "allocate on an occupied storage");

        if Self::fits::<T>() {
            let place = self.space.as_mut_ptr().cast::<TypedHolder<T>>();
            unsafe { place.write(TypedHolder(value)) };

            let meta: *const dyn ErasedHolder<Space> = ptr::null::<TypedHolder<T>>();
            self.slot = Slot::Small(meta);
        } else {
            trace!(
                "`{}` ({} bytes) exceeds inline space of {} bytes, boxing",
                type_name::<T>(),
                mem::size_of::<T>(),
                mem::size_of::<Space>()
            );
            self.slot = Slot::Big(Box::new(TypedHolder(value)));
        }

        match self.holder_mut() {
            Some(holder) => holder,
            None => unreachable!(),
        }
    }

    /// Takes ownership of an already boxed value.
    ///
    /// A value that fits is unboxed into the inline buffer, otherwise the box
    /// is kept as is and nothing is allocated. The storage must be empty.
    pub(crate) fn adopt<T>(&mut self, boxed: Box<T>)
    where
        T: Clone + 'static,
    {
        if Self::fits::<T>() {
            self.allocate(*boxed);
        } else {
            debug_assert!(self.is_empty(), "adopt on an occupied storage");
            trace!("adopting boxed `{}`", type_name::<T>());

            // `TypedHolder` is transparent over `T`, so the allocation is reused.
            let raw = Box::into_raw(boxed).cast::<TypedHolder<T>>();
            let holder: Box<dyn ErasedHolder<Space>> = unsafe { Box::from_raw(raw) };
            self.slot = Slot::Big(holder);
        }
    }

    /// Drops the holder and marks the storage empty. No-op when already empty.
    pub(crate) fn free(&mut self) {
        // The slot is reset first so a panicking destructor cannot run twice.
        match mem::replace(&mut self.slot, Slot::Empty) {
            Slot::Empty => {}
            Slot::Small(meta) => unsafe {
                let holder = sptr::with_metadata_of_mut(self.space.as_mut_ptr(), meta);
                ptr::drop_in_place(holder);
            },
            Slot::Big(holder) => drop(holder),
        }
    }

    /// Marks the storage empty after its value has been read out.
    ///
    /// # Safety
    ///
    /// The held value must already have been moved out, it is not dropped.
    unsafe fn release_moved(&mut self) {
        match mem::replace(&mut self.slot, Slot::Empty) {
            Slot::Empty | Slot::Small(_) => {}
            Slot::Big(holder) => {
                let raw = Box::into_raw(holder);
                let layout = Layout::for_value(unsafe { &*raw });
                if layout.size() != 0 {
                    unsafe { dealloc(raw.cast::<u8>(), layout) };
                }
            }
        }
    }

    /// Moves the held value into the empty `dst`, leaving `self` empty.
    ///
    /// Boxed holders change owner without touching the heap, inline holders
    /// are moved value-wise through [`ErasedHolder::move_into`].
    pub(crate) fn relocate(&mut self, dst: &mut Storage<Space>) {
        debug_assert!(dst.is_empty(), "relocate into an occupied storage");

        match mem::replace(&mut self.slot, Slot::Empty) {
            Slot::Empty => {}
            Slot::Small(meta) => unsafe {
                let holder = sptr::with_metadata_of_mut(self.space.as_mut_ptr(), meta);
                // Our slot is already empty, which is all releasing an inline holder takes.
                (*holder).move_into(dst);
            },
            Slot::Big(holder) => dst.slot = Slot::Big(holder),
        }
    }

    /// Exchanges the contents of two storages.
    pub(crate) fn swap(&mut self, other: &mut Storage<Space>) {
        match (self.tag(), other.tag()) {
            (Tag::Empty, Tag::Empty) => {}
            (Tag::Big, Tag::Big) => mem::swap(&mut self.slot, &mut other.slot),
            (left, right) => {
                trace!("value-level swap of {:?} and {:?} holders", left, right);

                let mut tmp = Storage::new();
                self.relocate(&mut tmp);
                other.relocate(self);
                tmp.relocate(other);
            }
        }
    }

    pub(crate) fn holder(&self) -> Option<&dyn ErasedHolder<Space>> {
        match &self.slot {
            Slot::Empty => None,
            Slot::Small(meta) => {
                let holder = sptr::with_metadata_of(self.space.as_ptr(), *meta);
                Some(unsafe { &*holder })
            }
            Slot::Big(holder) => Some(&**holder),
        }
    }

    pub(crate) fn holder_mut(&mut self) -> Option<&mut dyn ErasedHolder<Space>> {
        match &mut self.slot {
            Slot::Empty => None,
            Slot::Small(meta) => {
                let holder = sptr::with_metadata_of_mut(self.space.as_mut_ptr(), *meta);
                Some(unsafe { &mut *holder })
            }
            Slot::Big(holder) => Some(&mut **holder),
        }
    }

    pub(crate) fn type_token(&self) -> TypeToken {
        match self.holder() {
            Some(holder) => holder.type_token(),
            None => TypeToken::none(),
        }
    }

    pub(crate) fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        let holder = self.holder()?;
        if holder.type_token() != TypeToken::of::<T>() {
            return None;
        }
        let typed = ptr::from_ref(holder).cast::<TypedHolder<T>>();
        Some(unsafe { &(*typed).0 })
    }

    pub(crate) fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        let holder = self.holder_mut()?;
        if holder.type_token() != TypeToken::of::<T>() {
            return None;
        }
        let typed = ptr::from_mut(holder).cast::<TypedHolder<T>>();
        Some(unsafe { &mut (*typed).0 })
    }

    /// Moves the held `T` out, leaving the storage empty.
    /// Returns `None` and leaves the storage untouched on a type mismatch.
    pub(crate) fn take<T: 'static>(&mut self) -> Option<T> {
        let value = unsafe { ptr::read(self.downcast_ref::<T>()?) };
        unsafe { self.release_moved() };
        Some(value)
    }
}

impl<Space> Drop for Storage<Space> {
    fn drop(&mut self) {
        self.free();
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use super::{Storage, Tag};
    use crate::space::*;

    #[derive(Clone)]
    struct Counted(Rc<Cell<usize>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_fits() {
        assert!(Storage::<S1>::fits::<usize>());
        assert!(Storage::<S1>::fits::<()>());
        assert!(!Storage::<S1>::fits::<[usize; 2]>());
        assert!(Storage::<S2>::fits::<[usize; 2]>());
        assert!(!Storage::<S1>::fits::<String>());

        // Big enough but under-aligned.
        assert!(Storage::<[u8; 16]>::fits::<[u8; 16]>());
        assert!(!Storage::<[u8; 16]>::fits::<u16>());
    }

    #[test]
    fn test_small_lifecycle() {
        let mut storage = Storage::<S1>::new();
        assert_eq!(storage.tag(), Tag::Empty);

        storage.allocate(42usize);
        assert_eq!(storage.tag(), Tag::Small);
        assert_eq!(storage.downcast_ref::<usize>(), Some(&42));

        storage.free();
        assert_eq!(storage.tag(), Tag::Empty);
        assert!(storage.holder().is_none());
    }

    #[test]
    fn test_big_lifecycle() {
        let mut storage = Storage::<S1>::new();

        storage.allocate([3usize; 4]);
        assert_eq!(storage.tag(), Tag::Big);
        assert_eq!(storage.downcast_ref::<[usize; 4]>(), Some(&[3; 4]));

        storage.free();
        assert_eq!(storage.tag(), Tag::Empty);
    }

    #[test]
    fn test_free_is_idempotent() {
        let drops = Rc::new(Cell::new(0));
        let mut storage = Storage::<S1>::new();

        storage.allocate(Counted(drops.clone()));
        storage.free();
        storage.free();
        assert_eq!(drops.get(), 1);

        drop(storage);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_drop_releases_both_placements() {
        let drops = Rc::new(Cell::new(0));

        let mut small = Storage::<S1>::new();
        small.allocate(Counted(drops.clone()));
        let mut big = Storage::<S1>::new();
        big.allocate((Counted(drops.clone()), [0u64; 8]));

        drop(small);
        drop(big);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn test_relocate_moves_without_drop() {
        let drops = Rc::new(Cell::new(0));

        let mut src = Storage::<S1>::new();
        src.allocate(Counted(drops.clone()));
        let mut dst = Storage::<S1>::new();

        src.relocate(&mut dst);
        assert_eq!(src.tag(), Tag::Empty);
        assert_eq!(dst.tag(), Tag::Small);
        assert_eq!(drops.get(), 0);

        drop(src);
        assert_eq!(drops.get(), 0);
        drop(dst);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_relocate_big_keeps_box() {
        let mut src = Storage::<S1>::new();
        src.allocate(vec![1u8; 32]);
        let before = core::ptr::from_ref(src.downcast_ref::<Vec<u8>>().unwrap());

        // `Vec` is three words, so it is boxed in a one-word space.
        let mut dst = Storage::<S1>::new();
        src.relocate(&mut dst);

        assert_eq!(dst.tag(), Tag::Big);
        assert_eq!(core::ptr::from_ref(dst.downcast_ref::<Vec<u8>>().unwrap()), before);
    }

    #[test]
    fn test_inline_survives_move() {
        let mut storage = Storage::<S2>::new();
        storage.allocate((1u32, 2u32));

        let moved = storage;
        let boxed = alloc::boxed::Box::new(moved);
        assert_eq!(boxed.downcast_ref::<(u32, u32)>(), Some(&(1, 2)));
    }

    #[test]
    fn test_take() {
        let drops = Rc::new(Cell::new(0));

        let mut storage = Storage::<S1>::new();
        storage.allocate((Counted(drops.clone()), [0u64; 8]));

        assert!(storage.take::<u8>().is_none());
        assert_eq!(storage.tag(), Tag::Big);

        let taken = storage.take::<(Counted, [u64; 8])>();
        assert!(taken.is_some());
        assert_eq!(storage.tag(), Tag::Empty);
        assert_eq!(drops.get(), 0);

        drop(taken);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_adopt() {
        let mut small = Storage::<S1>::new();
        small.adopt(alloc::boxed::Box::new(5u32));
        assert_eq!(small.tag(), Tag::Small);

        let boxed = alloc::boxed::Box::new([9u64; 4]);
        let addr = core::ptr::from_ref(&*boxed);

        let mut big = Storage::<S1>::new();
        big.adopt(boxed);
        assert_eq!(big.tag(), Tag::Big);
        assert_eq!(core::ptr::from_ref(big.downcast_ref::<[u64; 4]>().unwrap()), addr);
    }

    #[test]
    fn test_swap_mixed() {
        let mut left = Storage::<S1>::new();
        left.allocate(7u8);
        let mut right = Storage::<S1>::new();
        right.allocate(String::from("big"));

        left.swap(&mut right);

        assert_eq!(left.tag(), Tag::Big);
        assert_eq!(right.tag(), Tag::Small);
        assert_eq!(left.downcast_ref::<String>().map(String::as_str), Some("big"));
        assert_eq!(right.downcast_ref::<u8>(), Some(&7));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "allocate on an occupied storage")]
    fn test_double_allocate() {
        let mut storage = Storage::<S1>::new();
        storage.allocate(1u8);
        storage.allocate(2u8);
    }
}
