//! Immutable, reference-counted byte buffers.

use alloc::{boxed::Box, vec};
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use bstr::BStr;

use crate::{Error, NStr, refcount::Counted};

/// Backing storage of a buffer.
enum Storage {
    /// The buffer owns its bytes and frees them with the last handle.
    Owned(Box<[u8]>),
    /// The buffer aliases a string's content bytes. Holding the string
    /// handle keeps the shared allocation alive; dropping the last buffer
    /// handle drops it, which is the release of the borrow.
    Borrowed(NStr),
}

struct BufRepr {
    storage: Storage,
}

impl BufRepr {
    fn bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(data) => data,
            Storage::Borrowed(s) => s.as_bytes(),
        }
    }
}

/// A fixed-size, immutable byte buffer.
///
/// Like [`NStr`], an `NBuf` is a cheap handle onto shared storage: cloning
/// bumps a reference count, and the storage lives until the last handle is
/// gone. A buffer created with [`from_string`](NBuf::from_string) does not
/// copy any bytes — it shares the string's allocation and participates in
/// its reference count.
///
/// Content is arbitrary bytes; no encoding is assumed. Buffers order and
/// hash by their content, so they work directly as lookup keys.
pub struct NBuf {
    inner: Counted<BufRepr>,
}

impl NBuf {
    /// Creates a zero-filled buffer of `size` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `size` is 0.
    pub fn create(size: usize) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::InvalidArgument("cannot create zero-size buffer"));
        }
        Ok(Self::owned(vec![0; size].into_boxed_slice()))
    }

    /// Creates a buffer holding a copy of `data`. The source is untouched.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `data` is empty.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.is_empty() {
            return Err(Error::InvalidArgument("cannot create zero-size buffer"));
        }
        Ok(Self::owned(data.into()))
    }

    /// Creates a buffer sharing `s`'s content bytes, without copying.
    ///
    /// The string's reference count goes up by one for as long as handles
    /// to the returned buffer exist; the terminator padding is not part of
    /// the buffer.
    #[must_use]
    pub fn from_string(s: &NStr) -> Self {
        Self {
            inner: Counted::new(BufRepr {
                storage: Storage::Borrowed(s.clone()),
            }),
        }
    }

    fn owned(data: Box<[u8]>) -> Self {
        Self {
            inner: Counted::new(BufRepr {
                storage: Storage::Owned(data),
            }),
        }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.bytes().len()
    }

    /// Whether the buffer is empty. Only reachable through
    /// [`from_string`](NBuf::from_string) on an empty string; the byte
    /// constructors reject zero sizes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.bytes().is_empty()
    }

    /// The content bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.bytes()
    }

    /// The byte at position `index`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `index >= self.len()`.
    pub fn byte_at(&self, index: usize) -> Result<u8, Error> {
        self.as_bytes()
            .get(index)
            .copied()
            .ok_or(Error::OutOfRange("buffer index out of bounds"))
    }

    /// Iterates over the content bytes.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_bytes().iter().copied()
    }

    /// Number of live handles to this buffer's allocation. Diagnostics and
    /// tests only.
    #[must_use]
    pub fn refcount(&self) -> usize {
        Counted::count(&self.inner)
    }
}

/// Cloning is zero-copy: the new handle shares the allocation and bumps
/// its reference count.
impl Clone for NBuf {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl PartialEq for NBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for NBuf {}

/// Lexicographic over the content bytes, ties broken by length: a strict
/// prefix sorts before its extension.
impl Ord for NBuf {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialOrd for NBuf {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for NBuf {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Debug for NBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NBuf").field(&BStr::new(self.as_bytes())).finish()
    }
}
