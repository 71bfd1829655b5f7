use alloc::boxed::Box;
use core::fmt;
use core::mem;

use crate::space::S1;
use crate::storage::{Storage, Tag};
use crate::token::TypeToken;

/// A value of any clonable type, with its concrete type erased.
///
/// Values no larger and no more aligned than `Space` are kept inline,
/// everything else is boxed. The placement is decided by the type alone, so
/// every value of a given type is placed the same way in a given `Space`.
///
/// `Any` is a plain value: it is deep-copied by [`Clone`], moved by Rust
/// moves and owns exactly one held value, if any. It is neither `Send` nor
/// `Sync`, since the held type is not required to be either.
///
/// # Example
///
/// ```
/// use soo_any::Any;
///
/// let mut a: Any = Any::new(42usize);
/// assert!(!a.is_heap());
///
/// let b = a.clone();
/// *a.downcast_mut::<usize>().unwrap() += 1;
///
/// assert_eq!(a.downcast_ref::<usize>(), Some(&43));
/// assert_eq!(b.downcast_ref::<usize>(), Some(&42));
/// ```
pub struct Any<Space = S1> {
    storage: Storage<Space>,
}

impl<Space> Any<Space> {
    /// An empty container.
    ///
    /// # Example
    ///
    /// ```
    /// use soo_any::{Any, TypeToken};
    ///
    /// let a: Any = Any::empty();
    /// assert!(a.is_empty());
    /// assert_eq!(a.type_token(), TypeToken::none());
    /// ```
    pub const fn empty() -> Any<Space> {
        Any {
            storage: Storage::new(),
        }
    }

    /// Wraps `value`, inline if it fits, boxed otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use soo_any::Any;
    ///
    /// let small: Any = Any::new(1u8);
    /// let large: Any = Any::new([0usize; 8]);
    ///
    /// assert!(!small.is_heap());
    /// assert!(large.is_heap());
    /// ```
    pub fn new<T>(value: T) -> Any<Space>
    where
        T: Clone + 'static,
    {
        let mut any = Any::empty();
        any.storage.allocate(value);
        any
    }

    /// Wraps an already boxed value.
    ///
    /// A value that fits is unboxed into the inline space. Otherwise the box
    /// is kept and no allocation is performed.
    ///
    /// # Example
    ///
    /// ```
    /// use soo_any::Any;
    ///
    /// let unboxed: Any = Any::from_box(Box::new(3u16));
    /// assert!(!unboxed.is_heap());
    ///
    /// let kept: Any = Any::from_box(Box::new([1u64; 16]));
    /// assert!(kept.is_heap());
    /// ```
    pub fn from_box<T>(boxed: Box<T>) -> Any<Space>
    where
        T: Clone + 'static,
    {
        let mut any = Any::empty();
        any.storage.adopt(boxed);
        any
    }

    /// Returns `true` if a `T` is stored inline.
    /// If `true`, then `Any::new::<T>` is guaranteed to not allocate.
    ///
    /// # Example
    ///
    /// ```
    /// use soo_any::Any;
    /// use soo_any::space::S4;
    ///
    /// assert!(Any::<S4>::fits::<[usize; 4]>());
    /// assert!(!Any::<S4>::fits::<[usize; 5]>());
    /// ```
    pub const fn fits<T>() -> bool {
        Storage::<Space>::fits::<T>()
    }

    /// Replaces the held value with `value`.
    ///
    /// The old value is dropped before the new one is placed.
    pub fn set<T>(&mut self, value: T)
    where
        T: Clone + 'static,
    {
        self.storage.free();
        self.storage.allocate(value);
    }

    /// Drops the held value, leaving the container empty.
    pub fn clear(&mut self) {
        self.storage.free();
    }

    /// Returns `true` if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns `true` if the held value lives on the heap.
    pub fn is_heap(&self) -> bool {
        self.storage.tag() == Tag::Big
    }

    /// Token of the held type, [`TypeToken::none`] when empty.
    pub fn type_token(&self) -> TypeToken {
        self.storage.type_token()
    }

    /// Returns `true` if the held value is a `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_token() == TypeToken::of::<T>()
    }

    /// Returns a reference to the held value if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.storage.downcast_ref()
    }

    /// Returns a mutable reference to the held value if it is a `T`.
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.storage.downcast_mut()
    }

    /// Takes the held value out if it is a `T`, otherwise returns `self` back.
    ///
    /// # Example
    ///
    /// ```
    /// use soo_any::Any;
    ///
    /// let a: Any = Any::new(5i8);
    /// let a = a.downcast::<u8>().unwrap_err();
    /// assert_eq!(a.downcast::<i8>().ok(), Some(5));
    /// ```
    pub fn downcast<T: 'static>(mut self) -> Result<T, Any<Space>> {
        match self.storage.take::<T>() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }

    /// Moves the held value into a new container, leaving `self` empty.
    ///
    /// # Example
    ///
    /// ```
    /// use soo_any::Any;
    ///
    /// let mut a: Any = Any::new(9u32);
    /// let b = a.take();
    ///
    /// assert!(a.is_empty());
    /// assert_eq!(b.downcast_ref::<u32>(), Some(&9));
    /// ```
    pub fn take(&mut self) -> Any<Space> {
        mem::take(self)
    }

    /// Exchanges the held values of `self` and `other`.
    ///
    /// Two boxed values swap pointers. Any pairing involving an inline value
    /// moves the values across.
    pub fn swap(&mut self, other: &mut Any<Space>) {
        self.storage.swap(&mut other.storage);
    }
}

/// Exchanges the held values of `a` and `b`, same as [`Any::swap`].
pub fn swap<Space>(a: &mut Any<Space>, b: &mut Any<Space>) {
    a.swap(b);
}

impl<Space> Default for Any<Space> {
    fn default() -> Any<Space> {
        Any::empty()
    }
}

impl<Space> Clone for Any<Space> {
    fn clone(&self) -> Any<Space> {
        let mut copy = Any::empty();
        copy.clone_from(self);
        copy
    }

    fn clone_from(&mut self, source: &Any<Space>) {
        self.storage.free();
        if let Some(holder) = source.storage.holder() {
            holder.copy_into(&mut self.storage);
        }
    }
}

impl<Space> fmt::Debug for Any<Space> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Any")
            .field("type", &self.type_token())
            .field("tag", &self.storage.tag())
            .finish()
    }
}
