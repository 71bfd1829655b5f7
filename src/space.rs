//! Inline capacities for [`Any`](crate::Any).
//!
//! Any `Sized` type can serve as a space: only its size and alignment are
//! used, no value of it is ever created or dropped. A held value is placed
//! inline when it is no larger and no more aligned than the space.

/// One machine word. The default space of [`Any`](crate::Any).
pub type S1 = [usize; 1];

/// Two machine words.
pub type S2 = [usize; 2];

/// Four machine words.
pub type S4 = [usize; 4];

/// Eight machine words.
pub type S8 = [usize; 8];

/// Sixteen machine words.
pub type S16 = [usize; 16];

/// Thirty-two machine words.
pub type S32 = [usize; 32];

/// Sixty-four machine words.
pub type S64 = [usize; 64];
