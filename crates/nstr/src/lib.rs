//! Reference-counted immutable strings and byte buffers.
//!
//! The crate provides four small building blocks for runtimes that want
//! cheap, thread-safe sharing of immutable text and binary data:
//!
//! - [`Counted`], a typed shared-ownership handle built on an atomic
//!   [`Refcount`]; dropping the last handle runs the payload's destructor.
//! - [`NStr`], an immutable, UTF-8 validated string that tracks its scalar
//!   count separately from its byte length.
//! - [`NBuf`], an immutable byte buffer that either owns its storage or
//!   borrows a string's allocation without copying.
//! - [`utf8`], the codec used for validation, indexing and iteration.
//!
//! Strings and buffers are never mutated after construction, so every
//! operation except the reference count updates themselves is safe to call
//! concurrently on the same instance.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buf;
mod error;
mod refcount;
mod string;
pub mod utf8;

#[cfg(test)]
mod tests;

pub use buf::NBuf;
pub use error::{Error, OrDie};
pub use refcount::{Counted, Refcount};
pub use string::{Chars, NStr};
pub use utf8::EncodingError;
