use core::any::{type_name, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// Uninhabited, so no container can ever hold a value of it.
enum Nothing {}

/// Runtime identity of a held type.
///
/// Two tokens are equal when they name the same type. The name is only used
/// for diagnostics and is not guaranteed to be unique or stable.
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Token of the type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use soo_any::{Any, TypeToken};
    ///
    /// let a: Any = Any::new(42u32);
    /// assert_eq!(a.type_token(), TypeToken::of::<u32>());
    /// ```
    pub fn of<T: ?Sized + 'static>() -> TypeToken {
        TypeToken {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Token reported by an empty container.
    pub fn none() -> TypeToken {
        TypeToken {
            id: TypeId::of::<Nothing>(),
            name: "nothing",
        }
    }

    /// Returns true if this is the token of an empty container.
    pub fn is_none(&self) -> bool {
        self.id == TypeId::of::<Nothing>()
    }

    /// The [`TypeId`] of the type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeToken {
    #[inline]
    fn eq(&self, other: &TypeToken) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::TypeToken;

    #[test]
    fn test_equality() {
        assert_eq!(TypeToken::of::<u32>(), TypeToken::of::<u32>());
        assert_ne!(TypeToken::of::<u32>(), TypeToken::of::<i32>());
        assert_ne!(TypeToken::of::<()>(), TypeToken::none());
    }

    #[test]
    fn test_none() {
        assert!(TypeToken::none().is_none());
        assert!(!TypeToken::of::<()>().is_none());
        assert_eq!(TypeToken::none().name(), "nothing");
    }

    #[test]
    fn test_name() {
        assert_eq!(TypeToken::of::<u8>().name(), "u8");
        assert_eq!(format!("{}", TypeToken::of::<bool>()), "bool");
    }
}
