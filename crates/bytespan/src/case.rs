//! Latin-1 (ISO-8859-1) case mapping.
//!
//! Only ASCII letters and the two accented-letter blocks of the Latin-1
//! supplement are mapped:
//!
//! | lower         | upper         |
//! |---------------|---------------|
//! | `a`..=`z`     | `A`..=`Z`     |
//! | `0xE0..=0xF6` | `0xC0..=0xD6` |
//! | `0xF8..=0xFE` | `0xD8..=0xDE` |
//!
//! Every other byte (including `0xD7` ×, `0xF7` ÷, `0xDF` ß and `0xFF` ÿ)
//! maps to itself.

const LOWER: [u8; 256] = build(true);
const UPPER: [u8; 256] = build(false);

const fn build(lower: bool) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let b = i as u8;
        table[i] = if lower { fold_lower(b) } else { fold_upper(b) };
        i += 1;
    }
    table
}

const fn fold_lower(b: u8) -> u8 {
    match b {
        b'A'..=b'Z' | 0xC0..=0xD6 | 0xD8..=0xDE => b + 0x20,
        _ => b,
    }
}

const fn fold_upper(b: u8) -> u8 {
    match b {
        b'a'..=b'z' | 0xE0..=0xF6 | 0xF8..=0xFE => b - 0x20,
        _ => b,
    }
}

/// Lowercase version of a Latin-1 byte, or the byte itself.
#[inline]
#[must_use]
pub const fn to_lower(b: u8) -> u8 {
    LOWER[b as usize]
}

/// Uppercase version of a Latin-1 byte, or the byte itself.
#[inline]
#[must_use]
pub const fn to_upper(b: u8) -> u8 {
    UPPER[b as usize]
}

/// Compares two bytes ignoring Latin-1 case.
#[inline]
#[must_use]
pub const fn eq_ignore_case(a: u8, b: u8) -> bool {
    a == b || to_upper(a) == to_upper(b)
}
