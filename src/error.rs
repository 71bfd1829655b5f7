use core::fmt;

use crate::token::TypeToken;

/// A required cast asked for a type the container does not hold.
///
/// Returned by [`cast_value`](crate::cast_value), [`cast_ref`](crate::cast_ref),
/// [`cast_mut`](crate::cast_mut) and [`cast_owned`](crate::cast_owned).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BadCast {
    requested: TypeToken,
    held: TypeToken,
}

impl BadCast {
    pub(crate) fn new<T: 'static>(held: TypeToken) -> BadCast {
        BadCast {
            requested: TypeToken::of::<T>(),
            held,
        }
    }

    /// The type the caller asked for.
    pub fn requested(&self) -> TypeToken {
        self.requested
    }

    /// The type actually held, [`TypeToken::none`] if the container was empty.
    pub fn held(&self) -> TypeToken {
        self.held
    }
}

impl fmt::Display for BadCast {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.held.is_none() {
            write!(f, "bad any cast: requested `{}`, holding nothing", self.requested)
        } else {
            write!(
                f,
                "bad any cast: requested `{}`, holding `{}`",
                self.requested, self.held
            )
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BadCast {}
