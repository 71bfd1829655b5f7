//! Fat pointer surgery for holders that live in the inline buffer.
//!
//! An inline holder is remembered only by its vtable; the data address is
//! the buffer's, which changes whenever the owning container moves.

#[cfg(feature = "nightly")]
mod implementation {
    pub fn with_metadata_of<T: ?Sized, U: ?Sized>(ptr: *const T, meta: *const U) -> *const U {
        ptr.with_metadata_of(meta)
    }

    pub fn with_metadata_of_mut<T: ?Sized, U: ?Sized>(ptr: *mut T, meta: *const U) -> *mut U {
        ptr.with_metadata_of(meta)
    }
}

#[cfg(not(feature = "nightly"))]
#[allow(clippy::as_conversions)]
mod implementation {
    use core::ptr::addr_of_mut;

    pub fn with_metadata_of<T: ?Sized, U: ?Sized>(ptr: *const T, meta: *const U) -> *const U {
        with_metadata_of_mut(ptr.cast_mut(), meta)
    }

    // The data address is the first word of a trait object pointer, see build.rs.
    pub fn with_metadata_of_mut<T: ?Sized, U: ?Sized>(ptr: *mut T, mut meta: *const U) -> *mut U {
        let addr_slot = addr_of_mut!(meta).cast::<usize>();
        unsafe { addr_slot.write(ptr.cast::<u8>() as usize) }
        meta.cast_mut()
    }
}

pub(crate) use implementation::*;
