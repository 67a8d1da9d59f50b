//! Shared ownership with an observable reference count.
//!
//! [`Counted<T>`] is the ownership primitive the rest of the crate is built
//! on: a heap allocation holding a [`Refcount`] next to the payload, with a
//! handle type whose `Clone` retains and whose `Drop` releases. The payload's
//! destructor runs exactly once, on the handle that performs the final
//! release. Unlike `Arc`, the count is part of the public contract — strings
//! and buffers expose it so borrow bookkeeping stays testable.

use alloc::boxed::Box;
use core::{
    fmt,
    marker::PhantomData,
    ops::Deref,
    ptr::NonNull,
    sync::atomic::{self, AtomicUsize, Ordering},
};

const MAX_REFCOUNT: usize = isize::MAX as usize;

/// Atomic reference counter, initialized to one.
///
/// The counter itself does not know what it guards; [`Counted`] pairs it
/// with a payload and turns the zero transition into a destructor call.
#[derive(Debug)]
pub struct Refcount {
    count: AtomicUsize,
}

impl Refcount {
    /// Creates a counter holding one reference.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicUsize::new(1),
        }
    }

    /// Acquires one additional reference and returns the new count.
    ///
    /// Callable from any thread that already holds a live reference.
    pub fn retain(&self) -> usize {
        let old = self.count.fetch_add(1, Ordering::Relaxed);
        assert!(old < MAX_REFCOUNT, "reference count overflow");
        old + 1
    }

    /// Drops one reference and returns the new count.
    ///
    /// Exactly one caller observes the return value 0; that caller must run
    /// the destructor and must not touch the counter afterwards. The release
    /// ordering on the decrement publishes all prior writes to the eventual
    /// destroying thread; the acquire fence on the zero transition pairs
    /// with it.
    pub fn release(&self) -> usize {
        let old = self.count.fetch_sub(1, Ordering::Release);
        debug_assert!(old != 0, "reference count underflow");
        if old == 1 {
            atomic::fence(Ordering::Acquire);
        }
        old - 1
    }

    /// Current count. Races with concurrent holders, so this is only
    /// meaningful for diagnostics and tests.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for Refcount {
    fn default() -> Self {
        Self::new()
    }
}

struct CountedInner<T> {
    refs: Refcount,
    value: T,
}

/// A shared handle to a reference-counted payload.
///
/// Cloning a handle retains the allocation, dropping a handle releases it;
/// the payload is dropped together with the allocation when the last handle
/// goes away. The payload is only accessible by shared reference, so data
/// behind a `Counted` is immutable for its whole lifetime.
pub struct Counted<T> {
    ptr: NonNull<CountedInner<T>>,
    _marker: PhantomData<CountedInner<T>>,
}

// Same bounds as Arc: the payload is shared across threads and dropped on
// an arbitrary one.
unsafe impl<T: Send + Sync> Send for Counted<T> {}
unsafe impl<T: Send + Sync> Sync for Counted<T> {}

impl<T> Counted<T> {
    /// Moves `value` into a fresh allocation with a count of one.
    pub fn new(value: T) -> Self {
        let inner = Box::new(CountedInner {
            refs: Refcount::new(),
            value,
        });
        Self {
            ptr: NonNull::from(Box::leak(inner)),
            _marker: PhantomData,
        }
    }

    fn inner(&self) -> &CountedInner<T> {
        // SAFETY: the allocation outlives every handle; we hold one.
        unsafe { self.ptr.as_ref() }
    }

    /// The number of live handles to this allocation.
    ///
    /// Associated function rather than a method so it cannot shadow a
    /// payload method of the same name. Racy under concurrent clones and
    /// drops; use for diagnostics and tests only.
    #[must_use]
    pub fn count(this: &Self) -> usize {
        this.inner().refs.count()
    }
}

impl<T> Deref for Counted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner().value
    }
}

impl<T> Clone for Counted<T> {
    fn clone(&self) -> Self {
        self.inner().refs.retain();
        Self {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }
}

impl<T> Drop for Counted<T> {
    fn drop(&mut self) {
        if self.inner().refs.release() == 0 {
            // SAFETY: we observed the final release, so no other handle
            // exists and none can be created.
            drop(unsafe { Box::from_raw(self.ptr.as_ptr()) });
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Counted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}
