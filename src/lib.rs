//! # soo-any: a type-erased value with inline storage
//!
//! [`Any`] holds a value of any `Clone + 'static` type and forgets its
//! concrete type, while still allowing the value to be recovered safely.
//! Small values are kept inside the container itself. Values that are too
//! large, or too strictly aligned, fall back to a heap allocation.
//!
//! ## Quick Start
//!
//! ```rust
//! use soo_any::{cast_ptr, cast_value, Any};
//!
//! // A word-sized value is stored inline
//! let small: Any = Any::new(42usize);
//! assert!(!small.is_heap());
//!
//! // Larger values are boxed
//! let large: Any = Any::new(String::from("hello"));
//! assert!(large.is_heap());
//!
//! // Required casts report a mismatch as an error
//! assert_eq!(cast_value::<usize>(&small), Ok(42));
//! assert!(cast_value::<u8>(&small).is_err());
//!
//! // Probing casts return `None` instead
//! assert_eq!(cast_ptr::<String>(&large).map(String::as_str), Some("hello"));
//! assert!(cast_ptr::<usize>(&large).is_none());
//! ```
//!
//! ## Value semantics
//!
//! `Any` behaves like the value it holds: [`Clone`] makes an independent
//! deep copy, moving it moves the value, and [`Any::take`] moves the value
//! out and leaves the source empty.
//!
//! ```rust
//! use soo_any::Any;
//!
//! let mut a: Any = Any::new(vec![1, 2, 3]);
//! let mut b = a.clone();
//! b.downcast_mut::<Vec<i32>>().unwrap().push(4);
//! assert_eq!(a.downcast_ref::<Vec<i32>>().unwrap().len(), 3);
//!
//! let c = a.take();
//! assert!(a.is_empty());
//! assert!(c.is::<Vec<i32>>());
//! ```
//!
//! ## Configuration
//!
//! ### Inline space
//!
//! The inline capacity is the `Space` type parameter, one machine word by
//! default. The [`space`] module has ready-made sizes, and any `Sized` type
//! may be used: its size and alignment define the buffer.
//!
//! ```rust
//! use soo_any::Any;
//! use soo_any::space::S4;
//!
//! let a: Any<S4> = Any::new(String::from("inline"));
//! assert!(!a.is_heap());
//! ```
//!
//! **Important**: Space alignment matters! If the space alignment is smaller than the value's
//! required alignment, the value will be heap-allocated regardless of size.
//!
//! ### Feature Flags
//!
//! - **`std`** (enabled by default)
//!   - Implements `std::error::Error` for [`BadCast`]
//!   - Disable for `#![no_std]` environments: `default-features = false`
//!
//! - **`nightly`** (optional, requires nightly)
//!   - Uses the strict provenance pointer APIs to address inline values
//!
//! ## Logging
//!
//! Heap fallbacks and value-level swaps are reported at `trace` level
//! through the [`log`](https://docs.rs/log) facade.

#![cfg_attr(feature = "nightly", feature(set_ptr_value))]
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(stable_features)]
#![deny(missing_docs)]
#![deny(clippy::as_conversions)]

extern crate alloc;

mod any;
mod cast;
mod error;
mod holder;
pub mod space;
mod sptr;
mod storage;
mod token;

pub use crate::any::{swap, Any};
pub use crate::cast::{cast_mut, cast_owned, cast_ptr, cast_ptr_mut, cast_ref, cast_value};
pub use crate::error::BadCast;
pub use crate::token::TypeToken;
