//! Typed extraction from an [`Any`].
//!
//! There are two failure policies. The `cast_value`, `cast_ref`, `cast_mut`
//! and `cast_owned` forms treat a mismatch as an error and return [`BadCast`].
//! The `cast_ptr` forms are for probing and return `None` instead.

use crate::any::Any;
use crate::error::BadCast;

/// Returns a clone of the held `T`.
///
/// # Example
///
/// ```
/// use soo_any::{cast_value, Any};
///
/// let a: Any = Any::new(42u32);
/// assert_eq!(cast_value::<u32>(&a), Ok(42));
/// assert!(cast_value::<i64>(&a).is_err());
/// ```
pub fn cast_value<T>(any: &Any<impl Sized>) -> Result<T, BadCast>
where
    T: Clone + 'static,
{
    cast_ref::<T>(any).cloned()
}

/// Moves the held `T` out of the container.
///
/// On a mismatch the container is dropped along with its value.
///
/// # Example
///
/// ```
/// use soo_any::{cast_owned, Any};
///
/// let a: Any = Any::new(String::from("owned"));
/// assert_eq!(cast_owned::<String>(a).unwrap(), "owned");
/// ```
pub fn cast_owned<T>(any: Any<impl Sized>) -> Result<T, BadCast>
where
    T: 'static,
{
    any.downcast::<T>()
        .map_err(|any| BadCast::new::<T>(any.type_token()))
}

/// Returns a reference to the held `T`.
///
/// # Example
///
/// ```
/// use soo_any::{cast_ref, Any};
///
/// let a: Any = Any::new(7u8);
/// assert_eq!(cast_ref::<u8>(&a), Ok(&7));
/// ```
pub fn cast_ref<T>(any: &Any<impl Sized>) -> Result<&T, BadCast>
where
    T: 'static,
{
    any.downcast_ref::<T>()
        .ok_or_else(|| BadCast::new::<T>(any.type_token()))
}

/// Returns a mutable reference to the held `T`.
///
/// # Example
///
/// ```
/// use soo_any::{cast_mut, cast_value, Any};
///
/// let mut a: Any = Any::new(7u8);
/// *cast_mut::<u8>(&mut a).unwrap() += 1;
/// assert_eq!(cast_value::<u8>(&a), Ok(8));
/// ```
pub fn cast_mut<T>(any: &mut Any<impl Sized>) -> Result<&mut T, BadCast>
where
    T: 'static,
{
    let held = any.type_token();
    any.downcast_mut::<T>()
        .ok_or_else(|| BadCast::new::<T>(held))
}

/// Returns a reference to the held `T`, or `None` on a mismatch.
///
/// # Example
///
/// ```
/// use soo_any::{cast_ptr, Any};
///
/// let a: Any = Any::new(7u8);
/// assert_eq!(cast_ptr::<u8>(&a), Some(&7));
/// assert_eq!(cast_ptr::<u16>(&a), None);
/// ```
pub fn cast_ptr<T>(any: &Any<impl Sized>) -> Option<&T>
where
    T: 'static,
{
    any.downcast_ref::<T>()
}

/// Returns a mutable reference to the held `T`, or `None` on a mismatch.
pub fn cast_ptr_mut<T>(any: &mut Any<impl Sized>) -> Option<&mut T>
where
    T: 'static,
{
    any.downcast_mut::<T>()
}
