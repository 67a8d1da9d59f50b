//! End-to-end scenarios combining strings, buffers and the codec.

use crate::{Error, NBuf, NStr, utf8::EncodingError};

#[test]
fn plain_ascii_lengths() {
    let s = NStr::from_bytes(b"i'm gay,,,").unwrap();
    assert_eq!(s.len(), 10);
    assert_eq!(s.byte_len(), 10);
    // storage is content plus the four terminator bytes
    assert_eq!(s.capacity(), 14);
    assert_eq!(
        s.char_at(10),
        Err(Error::OutOfRange("string index out of bounds"))
    );
}

#[test]
fn embedded_emoji_counts_as_one_scalar() {
    let s = NStr::from_bytes(b"i'm gay\xf0\x9f\xa5\xba,,,").unwrap();
    assert_eq!(s.len(), 11);
    assert_eq!(s.byte_len(), 14);
    assert_eq!(s.char_at(7), Ok('🥺'));
    assert_eq!(s.char_at(8), Ok(','));
}

#[test]
fn malformed_bytes_never_become_strings() {
    assert_eq!(
        NStr::from_bytes(b"\xff"),
        Err(Error::Encoding(EncodingError::IllegalStartByte(0xff)))
    );
    // overlong encoding of U+0020: locally well-formed bytes, rejected as
    // a whole
    assert_eq!(
        NStr::from_bytes(b"\xf0\x80\x80\xa0"),
        Err(Error::Encoding(EncodingError::Overlong { need: 1, got: 4 }))
    );
}

#[test]
fn numeric_conversions_match_reference_values() {
    assert_eq!(NStr::from_int(-255, 2).unwrap(), "-11111111");
    assert_eq!(
        NStr::from_uint(0xffff_ffff_ffff_ffff, 16).unwrap(),
        "ffffffffffffffff"
    );
    assert!(matches!(
        NStr::from_int(7, 1),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        NStr::from_int(7, 37),
        Err(Error::InvalidArgument(_))
    ));
}

/// Numeric keys flow string → buffer without copying, the way the
/// hashtable consumer produces them.
#[test]
fn numeric_key_via_buffer_borrow() {
    let key = NStr::from_uint(48879, 16).unwrap();
    assert_eq!(key, "beef");

    let buf = NBuf::from_string(&key);
    assert_eq!(buf.as_bytes(), b"beef");
    assert_eq!(buf, NBuf::from_bytes(b"beef").unwrap());
    assert_eq!(key.refcount(), 2);

    drop(key);
    // the buffer alone keeps the allocation alive
    assert_eq!(buf.as_bytes(), b"beef");
    assert_eq!(buf.refcount(), 1);
}

#[test]
fn concat_and_pad_build_on_each_other() {
    let label = NStr::from("x");
    let value = NStr::from_uint(255, 2).unwrap();
    let padded = value.left_pad(8, '0').unwrap();
    assert_eq!(padded, "11111111");
    let padded = NStr::from_uint(5, 2).unwrap().left_pad(8, '0').unwrap();
    assert_eq!(padded, "00000101");
    assert_eq!(label.concat(&padded), "x00000101");
}
