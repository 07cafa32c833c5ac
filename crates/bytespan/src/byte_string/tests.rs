use alloc::{format, string::ToString, vec, vec::Vec};

use rstest::rstest;

use super::*;
use crate::{FormatError, LineTerminator};

#[test]
fn in_place_mutation_is_visible_through_view() {
    let mut owner = ByteString::from(b"hello world");
    let mut view = ByteString::new();
    view.view_of(&owner);

    owner.replace_self(b'o', b'0');
    assert_eq!(view, "hell0 w0rld");

    owner.to_upper_case_self();
    assert_eq!(view, "HELL0 W0RLD");

    owner.set_byte_at(0, b'J').unwrap();
    assert_eq!(view.byte_at(0), Ok(b'J'));
    assert!(owner.shares_storage_with(&view));
}

#[test]
fn growth_leaves_view_on_old_storage() {
    let mut owner = ByteString::from(b"hello world");
    let mut view = ByteString::new();
    view.view_of(&owner);
    assert_eq!(owner.capacity(), ByteString::MIN_CAPACITY);

    owner.append(&[b'x'; 64]);
    assert!(owner.capacity() > ByteString::MIN_CAPACITY);
    assert!(!owner.shares_storage_with(&view));

    owner.replace_self(b'h', b'J');
    assert!(owner.starts_with("Jello world"));
    assert_eq!(view, "hello world");
}

#[test]
fn reserve_growing_compacts_before_allocating() {
    let mut s = ByteString::from(b"0123456789");
    s.sub_self(5, 10).unwrap();
    assert_eq!(s.spare_capacity(), 22);

    // 27 bytes free from offset 5, but 32 once the content slides to 0.
    s.reserve_growing(30);
    assert_eq!(s.capacity(), 32);
    assert_eq!(s.spare_capacity(), 27);
    assert_eq!(s, "56789");

    s.reserve_growing(40);
    assert_eq!(s.capacity(), 64);
    assert_eq!(s, "56789");
}

#[test]
fn compaction_is_shared_with_views() {
    let mut owner = ByteString::from(b"abcdefgh");
    owner.sub_self(4, 8).unwrap();
    let mut view = ByteString::new();
    view.view_of(&owner);

    owner.reserve_growing(31);
    assert!(owner.shares_storage_with(&view));
    assert_eq!(owner, "efgh");
    // The view still looks at offset 4 of the same array.
    assert_eq!(view, "efgh");
    owner.set_byte_at(0, b'E').unwrap();
    assert_eq!(view, "efgh");
}

#[rstest]
#[case(0, 0)]
#[case(1, 32)]
#[case(32, 32)]
#[case(100, 100)]
fn with_capacity_allocates_at_least_min(#[case] requested: usize, #[case] expected: usize) {
    let s = ByteString::with_capacity(requested);
    assert_eq!(s.capacity(), expected);
    assert!(s.is_empty());
}

#[test]
fn reserve_destructive_only_reallocates_when_too_small() {
    let mut s = ByteString::from(b"abc");
    s.reserve_destructive(10);
    assert_eq!(s.capacity(), 32);
    s.reserve_destructive(100);
    assert_eq!(s.capacity(), 100);
}

#[rstest]
#[case::both_ends(b"  \t hi there \r\n", "hi there")]
#[case::nothing_to_trim(b"x", "x")]
#[case::all_blank(b" \n\t ", "")]
#[case::empty(b"", "")]
#[case::control_bytes(b"\x01\x02a b\x7f", "a b\x7f")]
fn trim_narrows_window(#[case] input: &[u8], #[case] expected: &str) {
    let mut s = ByteString::from(input);
    let capacity = s.capacity();
    s.trim();
    assert_eq!(s, expected);
    assert_eq!(s.capacity(), capacity);
}

#[test]
fn detach_protects_former_views() {
    let mut owner = ByteString::from(b"shared");
    let mut view = ByteString::new();
    view.view_of(&owner);

    owner.detach();
    assert!(owner.is_empty());
    assert_eq!(owner.capacity(), 0);

    owner.append_latin1("fresh");
    assert_eq!(owner, "fresh");
    assert_eq!(view, "shared");
    assert!(!owner.shares_storage_with(&view));
}

#[test]
fn clear_keeps_storage() {
    let mut s = ByteString::from(b"some bytes");
    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.capacity(), 32);
    s.append(b"again");
    assert_eq!(s, "again");
}

#[test]
fn append_from_own_view() {
    let mut owner = ByteString::from(b"ab");
    let mut view = ByteString::new();
    view.view_of(&owner);

    owner.append(&view).append(&view);
    assert_eq!(owner, "ababab");
    assert_eq!(view, "ab");
}

#[test]
fn copy_of_own_view() {
    let mut owner = ByteString::from(b"abcdef");
    let view = owner.sub_view(2, 4).unwrap();
    owner.copy_of(&view);
    assert_eq!(owner, "cd");
}

#[rstest]
#[case(0, "0")]
#[case(7, "7")]
#[case(-1234, "-1234")]
#[case(i64::MAX, "9223372036854775807")]
#[case(i64::MIN, "-9223372036854775808")]
fn append_int_formats_decimal(#[case] value: i64, #[case] expected: &str) {
    let mut s = ByteString::from(b"n=");
    s.append_int(value);
    assert_eq!(s.to_latin1_string(), format!("n={expected}"));

    s.value_of(value);
    assert_eq!(s, expected);
}

#[test]
fn append_byte_and_latin1() {
    let mut s = ByteString::new();
    s.append_byte(b'[').append_latin1("caf\u{e9}").append_byte(b']');
    assert_eq!(s, &[b'[', b'c', b'a', b'f', 0xE9, b']']);
}

#[test]
fn latin1_and_utf8_copies_differ() {
    let mut s = ByteString::new();
    s.copy_of_latin1("\u{e9}");
    assert_eq!(s, &[0xE9]);
    s.copy_of_utf8("\u{e9}");
    assert_eq!(s, &[0xC3, 0xA9]);
}

#[test]
fn copy_of_utf8_leaves_view_alone() {
    let mut owner = ByteString::from(b"old");
    let mut view = ByteString::new();
    view.view_of(&owner);
    owner.copy_of_utf8("new");
    assert_eq!(owner, "new");
    assert_eq!(view, "old");
}

#[test]
fn sub_view_aliases_and_sub_copy_does_not() {
    let mut s = ByteString::from(b"hello world");
    let view = s.sub_view(6, 11).unwrap();
    let copy = s.sub_copy(6, 11).unwrap();
    s.to_upper_case_self();
    assert_eq!(view, "WORLD");
    assert_eq!(copy, "world");
    assert!(!copy.shares_storage_with(&s));
}

#[rstest]
#[case(6, 12)]
#[case(5, 4)]
#[case(12, 12)]
fn sub_view_rejects_bad_ranges(#[case] start: usize, #[case] end: usize) {
    let s = ByteString::from(b"hello world");
    assert_eq!(
        s.sub_view(start, end),
        Err(Error::RangeOutOfRange { start, end, len: 11 })
    );
}

#[test]
fn sub_self_narrows_without_copying() {
    let mut s = ByteString::from(b"[payload]");
    s.sub_self(1, 8).unwrap();
    assert_eq!(s, "payload");
    assert_eq!(s.capacity(), 32);
    assert!(s.sub_self(0, 8).is_err());
}

#[test]
fn set_byte_at_checks_index() {
    let mut s = ByteString::from(b"abc");
    assert_eq!(
        s.set_byte_at(3, b'x'),
        Err(Error::IndexOutOfRange { index: 3, len: 3 })
    );
    s.set_byte_at(2, b'x').unwrap();
    assert_eq!(s, "abx");
}

#[test]
fn set_len_truncates_and_zero_extends() {
    let mut s = ByteString::from(b"abc");
    s.set_len(5);
    assert_eq!(s, b"abc\0\0");
    s.set_len(1);
    assert_eq!(s, "a");
}

#[test]
fn reverse_in_place() {
    let mut s = ByteString::from(b"stressed");
    s.reverse();
    assert_eq!(s, "desserts");
}

#[test]
fn clone_is_an_owned_copy() {
    let mut s = ByteString::from(b"original");
    let copy = s.clone();
    s.replace_self(b'o', b'0');
    assert_eq!(copy, "original");
    assert!(!copy.shares_storage_with(&s));
}

#[test]
fn integer_parsing_with_radix() {
    assert_eq!(ByteString::from("-42").to_int_radix(10), Ok(-42));
    assert_eq!(ByteString::from("zz").to_int_radix(36), Ok(1295));
    assert_eq!(
        ByteString::from("12a").to_int_radix(10),
        Err(FormatError::InvalidDigit {
            byte: b'a',
            position: 2,
            radix: 10,
        })
    );
}

#[test]
fn ordering_and_hashing_follow_content() {
    use std::collections::HashSet;

    let a = ByteString::from("abc");
    let mut b = ByteString::from("xxabcxx");
    b.sub_self(2, 5).unwrap();
    assert_eq!(a, b);
    assert!(ByteString::from("ab") < a);
    assert!(ByteString::from(&[0xFF]) > ByteString::from(&[0x01]));

    let set: HashSet<ByteString> = [a.clone(), b, ByteString::from("abd")].into_iter().collect();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&a));
}

#[test]
fn display_is_latin1_and_debug_escapes() {
    let s = ByteString::from(&[b'c', b'a', b'f', 0xE9]);
    assert_eq!(s.to_string(), "caf\u{e9}");
    assert_eq!(format!("{:?}", ByteString::from(b"a\xffb")), r#""a\xFFb""#);
}

#[test]
fn from_vec_takes_allocation() {
    let s = ByteString::from(vec![1u8, 2, 3]);
    assert_eq!(s.capacity(), 3);
    assert_eq!(s.to_vec(), [1, 2, 3]);
}

#[test]
fn read_line_from_reads_unbuffered() {
    let mut source: &[u8] = b"one\r\ntwo\n\nthree\r";
    let mut line = ByteString::new();
    let mut lines = Vec::new();
    while line.read_line_from(&mut source).unwrap() {
        lines.push(line.to_latin1_string());
    }
    assert_eq!(lines, ["one", "two", "", "three"]);
    assert!(line.is_empty());
}

#[rstest]
#[case::inner_cr(b"a\rb\n", &["ab"])]
#[case::crlf(b"x\r\ny\r\n", &["x", "y"])]
#[case::trailing_cr_at_eof(b"ab\n\r", &["ab"])]
#[case::lone_cr(b"\r", &[])]
#[case::cr_then_eof_after_text(b"ab\r", &["ab"])]
#[case::blank_crlf_line(b"\r\nz", &["", "z"])]
fn read_line_from_drops_every_cr(#[case] input: &[u8], #[case] expected: &[&str]) {
    let mut source = input;
    let mut line = ByteString::new();
    let mut lines = Vec::new();
    while line.read_line_from(&mut source).unwrap() {
        lines.push(line.to_latin1_string());
    }
    assert_eq!(lines, expected);
}

#[test]
fn write_to_appends_terminator() {
    let s = ByteString::from("line");
    let mut out = Vec::new();
    s.write_to(&mut out, LineTerminator::CrLf).unwrap();
    s.write_to(&mut out, LineTerminator::None).unwrap();
    assert_eq!(out, b"line\r\nline");
}

#[test]
fn serde_writes_only_the_window() {
    let owner = ByteString::from("[payload]");
    let view = owner.sub_view(1, 8).unwrap();
    let json = serde_json::to_string(&view).unwrap();
    assert_eq!(json, "[112,97,121,108,111,97,100]");

    let back: ByteString = serde_json::from_str(&json).unwrap();
    assert_eq!(back, "payload");
    assert!(!back.shares_storage_with(&owner));
    let from_text: ByteString = serde_json::from_str(r#""payload""#).unwrap();
    assert_eq!(from_text, back);
}

#[test]
#[should_panic]
fn mutating_while_view_is_borrowed_panics() {
    let mut owner = ByteString::from(b"abc");
    let mut view = ByteString::new();
    view.view_of(&owner);
    let bytes = view.bytes();
    owner.replace_self(b'a', b'b');
    drop(bytes);
}
