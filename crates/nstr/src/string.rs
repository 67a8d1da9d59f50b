//! Immutable, reference-counted UTF-8 strings.

use alloc::{boxed::Box, vec::Vec};
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    str,
};

use crate::{Error, refcount::Counted, utf8};

/// Number of NUL bytes appended after the content.
///
/// Four rather than one: a decoder positioned at the last content byte may
/// examine up to the full claimed sequence length, and the padding
/// guarantees those reads stay inside the allocation while still failing
/// cleanly on the NUL continuation bytes.
const TERMINATOR: usize = 4;

/// Digit alphabet for the radix conversions, bases 2 through 36.
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Shared string payload. Immutable once constructed.
struct StrRepr {
    /// Scalar values in the content, as distinct from its byte length.
    chars: usize,
    /// Content bytes followed by the [`TERMINATOR`] padding.
    bytes: Box<[u8]>,
}

/// An immutable, UTF-8 validated string.
///
/// `NStr` is a cheap handle: cloning increments a shared reference count
/// instead of copying bytes, and the storage is freed when the last handle
/// (including any buffer borrowing it, see [`NBuf::from_string`]) is
/// dropped. Content never changes after construction, so handles can be
/// shared freely across threads.
///
/// Lengths come in two flavors: [`len`](NStr::len) counts Unicode scalar
/// values, [`byte_len`](NStr::byte_len) counts content bytes.
///
/// [`NBuf::from_string`]: crate::NBuf::from_string
pub struct NStr {
    inner: Counted<StrRepr>,
}

impl NStr {
    /// Builds a string from raw bytes, reading up to the first NUL byte or
    /// the end of the slice.
    ///
    /// The bytes are copied and validated; the source is untouched.
    ///
    /// # Errors
    ///
    /// [`Error::Encoding`] if the content is not well-formed UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let content = &bytes[..utf8::byte_length_unchecked(bytes)];
        let chars = utf8::validate(content)?;
        Ok(Self::copied(content, chars))
    }

    /// Like [`from_bytes`](NStr::from_bytes), but reads at most `max_bytes`
    /// bytes.
    ///
    /// # Errors
    ///
    /// [`Error::Encoding`] if the bounded content is not well-formed UTF-8;
    /// a multi-byte sequence cut off by the bound counts as malformed.
    pub fn from_bytes_bounded(bytes: &[u8], max_bytes: usize) -> Result<Self, Error> {
        Self::from_bytes(&bytes[..max_bytes.min(bytes.len())])
    }

    /// Converts `value` to its textual representation in `radix`.
    ///
    /// Negative values get a leading `-`; the digits are those of
    /// [`from_uint`](NStr::from_uint) applied to the absolute value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `2 <= radix <= 36`.
    pub fn from_int(value: i64, radix: u32) -> Result<Self, Error> {
        check_radix(radix)?;
        let mut out = Vec::new();
        if value < 0 {
            out.push(b'-');
        }
        push_radix(&mut out, value.unsigned_abs(), u64::from(radix));
        let chars = out.len();
        Ok(Self::assemble(out, chars))
    }

    /// Converts `value` to its textual representation in `radix`, using the
    /// digit alphabet `0-9a-z`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `2 <= radix <= 36`.
    pub fn from_uint(value: u64, radix: u32) -> Result<Self, Error> {
        check_radix(radix)?;
        let mut out = Vec::new();
        push_radix(&mut out, value, u64::from(radix));
        let chars = out.len();
        Ok(Self::assemble(out, chars))
    }

    /// A string of `n` copies of `c`; `n == 0` yields the empty string.
    #[must_use]
    pub fn repeat_char(c: char, n: usize) -> Self {
        let mut enc = [0u8; 4];
        let size = utf8::encode_char(c, &mut enc);
        let mut out = Vec::with_capacity(size * n + TERMINATOR);
        for _ in 0..n {
            out.extend_from_slice(&enc[..size]);
        }
        Self::assemble(out, n)
    }

    /// Copies `content` into fresh padded storage.
    fn copied(content: &[u8], chars: usize) -> Self {
        let mut out = Vec::with_capacity(content.len() + TERMINATOR);
        out.extend_from_slice(content);
        Self::assemble(out, chars)
    }

    /// Appends the terminator padding and wraps the storage in a handle.
    /// `content` must be valid UTF-8 holding `chars` scalar values.
    fn assemble(mut content: Vec<u8>, chars: usize) -> Self {
        content.extend_from_slice(&[0; TERMINATOR]);
        Self {
            inner: Counted::new(StrRepr {
                chars,
                bytes: content.into_boxed_slice(),
            }),
        }
    }

    /// Number of Unicode scalar values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.chars
    }

    /// Whether the string holds no scalar values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.chars == 0
    }

    /// Number of content bytes, excluding the terminator padding.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.inner.bytes.len() - TERMINATOR
    }

    /// Total storage size in bytes, including the four-byte terminator.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.bytes.len()
    }

    /// The content bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner.bytes[..self.inner.bytes.len() - TERMINATOR]
    }

    /// The content as `&str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: the content was validated as UTF-8 on construction and is
        // immutable afterwards.
        unsafe { str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// Number of live handles to this string's allocation, including
    /// buffers borrowing it. Diagnostics and tests only.
    #[must_use]
    pub fn refcount(&self) -> usize {
        Counted::count(&self.inner)
    }

    /// The scalar value at position `index`, counting scalars rather than
    /// bytes.
    ///
    /// Walks the content counting sequence-start bytes, so this is O(n) in
    /// `index`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `index >= self.len()`.
    pub fn char_at(&self, index: usize) -> Result<char, Error> {
        let pos = self
            .as_bytes()
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b & 0xc0 != 0x80)
            .nth(index)
            .map(|(i, _)| i)
            .ok_or(Error::OutOfRange("string index out of bounds"))?;
        // decode from the padded storage so the slice can never end inside
        // a claimed sequence
        let (c, _) = utf8::decode_one(&self.inner.bytes[pos..])?;
        Ok(c)
    }

    /// A new string holding `self`'s content followed by `other`'s.
    ///
    /// Both inputs are already valid UTF-8, so the splice is not
    /// re-validated.
    #[must_use]
    pub fn concat(&self, other: &NStr) -> NStr {
        let mut out = Vec::with_capacity(self.byte_len() + other.byte_len() + TERMINATOR);
        out.extend_from_slice(self.as_bytes());
        out.extend_from_slice(other.as_bytes());
        Self::assemble(out, self.inner.chars + other.inner.chars)
    }

    /// The content repeated `n` times.
    ///
    /// `n == 0` yields the empty string and `n == 1` a zero-copy clone.
    #[must_use]
    pub fn repeat(&self, n: usize) -> NStr {
        match n {
            0 => NStr::from(""),
            1 => self.clone(),
            _ => {
                let mut out = Vec::with_capacity(self.byte_len() * n + TERMINATOR);
                for _ in 0..n {
                    out.extend_from_slice(self.as_bytes());
                }
                Self::assemble(out, self.inner.chars * n)
            }
        }
    }

    /// Prepends copies of `fill` until the scalar count reaches
    /// `target_len`.
    ///
    /// A string already at `target_len` comes back as a zero-copy clone.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `target_len < self.len()` — padding cannot
    /// shorten.
    pub fn left_pad(&self, target_len: usize, fill: char) -> Result<NStr, Error> {
        if target_len < self.inner.chars {
            return Err(Error::OutOfRange("string is longer than requested length"));
        }
        if target_len == self.inner.chars {
            return Ok(self.clone());
        }

        let mut enc = [0u8; 4];
        let fill_size = utf8::encode_char(fill, &mut enc);
        let extra = target_len - self.inner.chars;
        let mut out = Vec::with_capacity(extra * fill_size + self.byte_len() + TERMINATOR);
        for _ in 0..extra {
            out.extend_from_slice(&enc[..fill_size]);
        }
        out.extend_from_slice(self.as_bytes());
        Ok(Self::assemble(out, target_len))
    }

    /// Iterates over the scalar values, decoding one per step.
    ///
    /// The iterator is independent of any other iteration over the same
    /// string and can be restarted by calling `chars()` again.
    #[must_use]
    pub fn chars(&self) -> Chars<'_> {
        Chars {
            // padded storage, for the same reason as in char_at
            rest: &self.inner.bytes,
            remaining: self.inner.chars,
        }
    }
}

/// Cloning is zero-copy: the new handle shares the allocation and bumps
/// its reference count. This is a firm contract, observable through
/// [`NStr::refcount`].
impl Clone for NStr {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Infallible construction from `&str`, which is valid UTF-8 by type.
///
/// The whole slice becomes content, embedded NUL bytes included; only the
/// raw-byte constructors treat NUL as a terminator.
impl From<&str> for NStr {
    fn from(s: &str) -> Self {
        Self::copied(s.as_bytes(), s.chars().count())
    }
}

impl Default for NStr {
    fn default() -> Self {
        Self::from("")
    }
}

impl PartialEq for NStr {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for NStr {}

impl PartialEq<str> for NStr {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for NStr {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Byte-wise ordering over the content.
///
/// For well-formed UTF-8 this equals ordering by scalar values — a design
/// property of the encoding, asserted by test. A strict prefix sorts
/// before its extension.
impl Ord for NStr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialOrd for NStr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for NStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for NStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for NStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

/// Iterator over the scalar values of an [`NStr`].
///
/// Decoding works off the validated storage, so it cannot fail; the
/// iterator simply ends after the last scalar.
pub struct Chars<'a> {
    rest: &'a [u8],
    remaining: usize,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.remaining == 0 {
            return None;
        }
        match utf8::decode_one(self.rest) {
            Ok((c, size)) => {
                self.rest = &self.rest[size..];
                self.remaining -= 1;
                Some(c)
            }
            Err(_) => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Chars<'_> {}
impl FusedIterator for Chars<'_> {}

fn check_radix(radix: u32) -> Result<(), Error> {
    if (2..=36).contains(&radix) {
        Ok(())
    } else {
        Err(Error::InvalidArgument("numerical base out of range"))
    }
}

/// Appends the base-`radix` digits of `value`, most significant first.
fn push_radix(out: &mut Vec<u8>, mut value: u64, radix: u64) {
    let start = out.len();
    loop {
        out.push(DIGITS[(value % radix) as usize]);
        value /= radix;
        if value == 0 {
            break;
        }
    }
    out[start..].reverse();
}
