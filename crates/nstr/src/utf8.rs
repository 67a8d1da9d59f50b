//! UTF-8 codec.
//!
//! Conversion between raw byte sequences and Unicode scalar values, per
//! RFC 3629 section 3:
//!
//! ```text
//! Char. number range  |        UTF-8 octet sequence
//!    (hexadecimal)    |              (binary)
//! --------------------+---------------------------------------------
//! 0000 0000-0000 007F | 0xxxxxxx
//! 0000 0080-0000 07FF | 110xxxxx 10xxxxxx
//! 0000 0800-0000 FFFF | 1110xxxx 10xxxxxx 10xxxxxx
//! 0001 0000-0010 FFFF | 11110xxx 10xxxxxx 10xxxxxx 10xxxxxx
//! ```
//!
//! Decoding is strict: overlong (non-canonical) encodings, surrogate code
//! points, and values past U+10FFFF are all rejected, so every scalar this
//! module hands out is a valid Rust `char`.
//!
//! The decoder only ever reads within the slice it is given. When a leading
//! byte claims more bytes than the slice holds, decoding fails with
//! [`EncodingError::Truncated`] instead of reading on. String storage in
//! this crate is padded with four NUL bytes precisely so that decoding at
//! any sequence start inside the content can always examine the full
//! claimed length without hitting the slice end.

use thiserror::Error;

/// Highest Unicode scalar value.
pub const UNICODE_MAX: u32 = 0x0010_ffff;

/// Payload mask of the leading byte, indexed by sequence length.
const LEAD_MASKS: [u8; 5] = [0x00, 0x7f, 0x1f, 0x0f, 0x07];

/// Minimum scalar value per sequence length; anything below is overlong.
const MIN_SCALAR: [u32; 5] = [0, 0, 0x80, 0x800, 0x10000];

/// A malformed byte sequence or an unencodable scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("illegal UTF-8 sequence start byte: 0x{0:02x}")]
    IllegalStartByte(u8),
    /// `index` is the 1-based position within the sequence.
    #[error("byte {index} in UTF-8 sequence invalid: 0x{byte:02x}")]
    InvalidContinuation { index: usize, byte: u8 },
    #[error("non-canonical UTF-8 encoding: {need} byte character stored in {got} bytes")]
    Overlong { need: usize, got: usize },
    #[error("UTF-8 sequence truncated: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },
    #[error("character code not within Unicode range: U+{0:X}")]
    OutOfRange(u32),
    #[error("surrogate code point U+{0:X} is not valid in UTF-8")]
    Surrogate(u32),
}

/// Expected sequence length from the leading byte's high bits.
fn sequence_len(lead: u8) -> Result<usize, EncodingError> {
    match lead {
        0x00..=0x7f => Ok(1),
        0xc0..=0xdf => Ok(2),
        0xe0..=0xef => Ok(3),
        0xf0..=0xf7 => Ok(4),
        // 0x80..=0xbf are continuation bytes, 0xf8..=0xff encode nothing
        _ => Err(EncodingError::IllegalStartByte(lead)),
    }
}

/// Bytes needed to encode `c`, assuming `c` is a valid scalar.
fn size_for(c: u32) -> usize {
    1 + usize::from(c > 0x7f) + usize::from(c > 0x7ff) + usize::from(c > 0xffff)
}

/// Bytes [`encode_one`] would produce for `c`.
///
/// # Errors
///
/// [`EncodingError::OutOfRange`] past U+10FFFF,
/// [`EncodingError::Surrogate`] for U+D800..=U+DFFF.
pub fn scalar_size(c: u32) -> Result<usize, EncodingError> {
    if c > UNICODE_MAX {
        return Err(EncodingError::OutOfRange(c));
    }
    if char::from_u32(c).is_none() {
        return Err(EncodingError::Surrogate(c));
    }
    Ok(size_for(c))
}

/// Decodes exactly one scalar value from the front of `bytes`.
///
/// Returns the scalar and the number of bytes it occupied.
///
/// # Errors
///
/// [`EncodingError::IllegalStartByte`] if `bytes[0]` cannot start a
/// sequence, [`EncodingError::Truncated`] if the slice is shorter than the
/// claimed sequence, [`EncodingError::InvalidContinuation`] if a tail byte
/// is not `10xxxxxx`, [`EncodingError::Overlong`] for non-canonical
/// encodings, and [`EncodingError::OutOfRange`] /
/// [`EncodingError::Surrogate`] for sequences that decode outside the
/// scalar value range.
pub fn decode_one(bytes: &[u8]) -> Result<(char, usize), EncodingError> {
    let Some(&lead) = bytes.first() else {
        return Err(EncodingError::Truncated {
            expected: 1,
            got: 0,
        });
    };
    let len = sequence_len(lead)?;
    if bytes.len() < len {
        return Err(EncodingError::Truncated {
            expected: len,
            got: bytes.len(),
        });
    }

    let mut c = u32::from(lead & LEAD_MASKS[len]);
    for (i, &b) in bytes[1..len].iter().enumerate() {
        if b & 0xc0 != 0x80 {
            return Err(EncodingError::InvalidContinuation {
                index: i + 2,
                byte: b,
            });
        }
        c = (c << 6) | u32::from(b & 0x3f);
    }

    if c < MIN_SCALAR[len] {
        return Err(EncodingError::Overlong {
            need: size_for(c),
            got: len,
        });
    }
    if c > UNICODE_MAX {
        return Err(EncodingError::OutOfRange(c));
    }
    match char::from_u32(c) {
        Some(ch) => Ok((ch, len)),
        None => Err(EncodingError::Surrogate(c)),
    }
}

/// Encodes `c` into the front of `dest`, returning the encoded length.
///
/// The infallible sibling of [`encode_one`] for callers that already hold
/// a `char` (which is a valid scalar by construction).
pub fn encode_char(c: char, dest: &mut [u8; 4]) -> usize {
    let c = u32::from(c);
    let len = size_for(c);
    match len {
        1 => dest[0] = c as u8,
        2 => {
            dest[0] = 0xc0 | (c >> 6) as u8;
            dest[1] = 0x80 | (c & 0x3f) as u8;
        }
        3 => {
            dest[0] = 0xe0 | (c >> 12) as u8;
            dest[1] = 0x80 | ((c >> 6) & 0x3f) as u8;
            dest[2] = 0x80 | (c & 0x3f) as u8;
        }
        _ => {
            dest[0] = 0xf0 | (c >> 18) as u8;
            dest[1] = 0x80 | ((c >> 12) & 0x3f) as u8;
            dest[2] = 0x80 | ((c >> 6) & 0x3f) as u8;
            dest[3] = 0x80 | (c & 0x3f) as u8;
        }
    }
    len
}

/// Encodes the scalar value `c` into the front of `dest`.
///
/// # Errors
///
/// Same as [`scalar_size`].
pub fn encode_one(c: u32, dest: &mut [u8; 4]) -> Result<usize, EncodingError> {
    if c > UNICODE_MAX {
        return Err(EncodingError::OutOfRange(c));
    }
    let ch = char::from_u32(c).ok_or(EncodingError::Surrogate(c))?;
    Ok(encode_char(ch, dest))
}

/// Validates `bytes` up to its end or the first NUL byte, whichever comes
/// first, and returns the number of scalar values seen.
///
/// # Errors
///
/// The first [`decode_one`] failure, unchanged.
pub fn validate(bytes: &[u8]) -> Result<usize, EncodingError> {
    let mut count = 0;
    let mut pos = 0;
    while pos < bytes.len() && bytes[pos] != 0 {
        let (_, size) = decode_one(&bytes[pos..])?;
        pos += size;
        count += 1;
    }
    Ok(count)
}

/// Scalar count of `bytes` up to the first NUL, without validation.
///
/// Counts sequence-start bytes (anything but `10xxxxxx`). Only meaningful
/// when the caller has independent assurance the bytes are well-formed.
#[must_use]
pub fn scalar_count_unchecked(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .filter(|&&b| b & 0xc0 != 0x80)
        .count()
}

/// Byte count of `bytes` up to the first NUL, without validation.
#[must_use]
pub fn byte_length_unchecked(bytes: &[u8]) -> usize {
    bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())
}
