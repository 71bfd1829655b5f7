use core::ptr;

use crate::storage::Storage;
use crate::token::TypeToken;

/// Type-erased view of one held value.
///
/// There is exactly one implementation per concrete type, [`TypedHolder`].
pub(crate) trait ErasedHolder<Space> {
    /// Token of the held type.
    fn type_token(&self) -> TypeToken;

    /// Places an independent clone of the held value into the empty `storage`.
    ///
    /// The clone is finished before `storage` is touched, so a panicking
    /// `Clone` leaves `storage` empty.
    fn copy_into(&self, storage: &mut Storage<Space>);

    /// Moves the held value into the empty `storage`.
    ///
    /// # Safety
    ///
    /// The value is read out of `self`. The caller must release the slot that
    /// owned `self` without dropping it, and must not use `self` again.
    unsafe fn move_into(&mut self, storage: &mut Storage<Space>);
}

/// Owns one `T` on behalf of a storage.
#[repr(transparent)]
pub(crate) struct TypedHolder<T>(pub(crate) T);

impl<T, Space> ErasedHolder<Space> for TypedHolder<T>
where
    T: Clone + 'static,
{
    fn type_token(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    fn copy_into(&self, storage: &mut Storage<Space>) {
        let value = self.0.clone();
        storage.allocate(value);
    }

    unsafe fn move_into(&mut self, storage: &mut Storage<Space>) {
        // Checked before the read so a failed check cannot duplicate the value.
        debug_assert!(storage.is_empty(), "move into an occupied storage");
        let value = unsafe { ptr::read(&self.0) };
        storage.allocate(value);
    }
}
