//! The crate surface as a downstream consumer sees it.

#![allow(missing_docs)]

use std::collections::{BTreeSet, HashSet};

use nstr::{Counted, EncodingError, Error, NBuf, NStr, OrDie, Refcount, utf8};

#[test]
fn string_construction_and_derivation() {
    let greeting = NStr::from_bytes(b"hello").or_die();
    let name = NStr::from("w\u{f6}rld");
    let line = greeting.concat(&NStr::from(" ")).concat(&name);

    assert_eq!(line, "hello wörld");
    assert_eq!(line.len(), 11);
    assert_eq!(line.byte_len(), 12);
    assert_eq!(line.char_at(7), Ok('ö'));
    assert_eq!(line.chars().count(), 11);
}

#[test]
fn error_values_compare_and_render() {
    let err = NStr::from_bytes(b"\xf0\x80\x80\xa0").unwrap_err();
    assert_eq!(
        err,
        Error::Encoding(EncodingError::Overlong { need: 1, got: 4 })
    );
    assert_eq!(
        err.to_string(),
        "non-canonical UTF-8 encoding: 1 byte character stored in 4 bytes"
    );
}

#[test]
#[should_panic(expected = "illegal UTF-8 sequence start byte: 0xff")]
fn or_die_is_the_fail_fast_path() {
    let _ = NStr::from_bytes(b"\xff").or_die();
}

#[test]
fn codec_module_is_usable_directly() {
    assert_eq!(utf8::validate("stra\u{df}e".as_bytes()), Ok(6));
    assert_eq!(utf8::decode_one("\u{1f97a}".as_bytes()), Ok(('\u{1f97a}', 4)));
    let mut buf = [0u8; 4];
    assert_eq!(utf8::encode_one(0x1f97a, &mut buf), Ok(4));
    assert_eq!(&buf, b"\xf0\x9f\xa5\xba");
}

#[test]
fn buffers_work_as_collection_keys() {
    let mut ordered = BTreeSet::new();
    ordered.insert(NBuf::from_bytes(b"b").unwrap());
    ordered.insert(NBuf::from_bytes(b"ab").unwrap());
    ordered.insert(NBuf::from_bytes(b"abc").unwrap());
    let keys: Vec<_> = ordered.iter().map(NBuf::as_bytes).collect();
    assert_eq!(keys, [b"ab".as_slice(), b"abc", b"b"]);

    let mut hashed = HashSet::new();
    let s = NStr::from_uint(7, 2).unwrap();
    hashed.insert(NBuf::from_string(&s));
    // an owned buffer with the same bytes is the same key
    assert!(hashed.contains(&NBuf::from_bytes(b"111").unwrap()));
}

#[test]
fn counted_is_reusable_for_other_payloads() {
    #[derive(Debug, PartialEq)]
    struct Blob {
        tag: u32,
    }

    let first = Counted::new(Blob { tag: 9 });
    let second = first.clone();
    assert_eq!(Counted::count(&first), 2);
    assert_eq!(second.tag, 9);
    drop(first);
    assert_eq!(Counted::count(&second), 1);
}

#[test]
fn refcount_primitive_counts() {
    let refs = Refcount::new();
    assert_eq!(refs.retain(), 2);
    assert_eq!(refs.release(), 1);
    assert_eq!(refs.count(), 1);
    assert_eq!(refs.release(), 0);
}
