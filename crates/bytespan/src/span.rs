//! Read-only capability set shared by every byte span.
//!
//! [`ByteSpan`] is implemented by borrowed views (`[u8]`, `str`, arrays),
//! owned vectors and [`ByteString`]. Call sites that only compare, search or
//! copy take `&impl ByteSpan` and never need mutable access.

use alloc::{string::String, vec::Vec};
use core::{cmp::Ordering, ops::Deref};

use crate::{
    ByteString, Error, FormatError,
    case::{eq_ignore_case, to_lower, to_upper},
    io::{ByteSink, LineTerminator},
    numbers,
};

/// Read-only operations over a contiguous run of bytes.
///
/// Everything except [`bytes`](ByteSpan::bytes) is provided. Operations that
/// produce a different sequence return a new, owned [`ByteString`] or
/// overwrite an explicitly passed target.
///
/// Indices are byte offsets relative to the start of the span. Search
/// operations return `None` when nothing matches.
pub trait ByteSpan {
    /// Guard giving access to the bytes. For plain slices this is just
    /// `&[u8]`; for [`ByteString`] it holds a shared borrow of the backing
    /// storage.
    type Bytes<'a>: Deref<Target = [u8]>
    where
        Self: 'a;

    /// The bytes of this span.
    fn bytes(&self) -> Self::Bytes<'_>;

    /// Number of bytes in the span.
    fn len(&self) -> usize {
        self.bytes().len()
    }

    /// `true` if the span holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    fn byte_at(&self, index: usize) -> Result<u8, Error> {
        let bytes = self.bytes();
        Error::check_index(index, bytes.len())?;
        Ok(bytes[index])
    }

    /// Copies the bytes into a new `Vec`.
    fn to_vec(&self) -> Vec<u8> {
        self.bytes().to_vec()
    }

    /// Lexicographic comparison of unsigned byte values; a proper prefix
    /// orders before the longer span.
    fn compare_to<O: ByteSpan + ?Sized>(&self, other: &O) -> Ordering {
        let (a, b) = (self.bytes(), other.bytes());
        (*a).cmp(&*b)
    }

    /// Byte-for-byte equality.
    fn equals<O: ByteSpan + ?Sized>(&self, other: &O) -> bool {
        let (a, b) = (self.bytes(), other.bytes());
        *a == *b
    }

    /// Equality after Latin-1 case folding.
    fn equals_ignore_case<O: ByteSpan + ?Sized>(&self, other: &O) -> bool {
        let (a, b) = (self.bytes(), other.bytes());
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(&x, &y)| eq_ignore_case(x, y))
    }

    /// Fast, deliberately weak hash.
    ///
    /// Spans shorter than 16 bytes hash every byte with `h = h * 37 + b`;
    /// longer spans sample every `len / 8`-th byte with `h = h * 39 + b`.
    /// Bytes are taken as signed values and arithmetic wraps, so results
    /// match the historical `hashCode` of the same content. This is not the
    /// [`core::hash::Hash`] used by hash maps.
    fn hash_code(&self) -> i32 {
        sampled_hash(&self.bytes())
    }

    /// First index of `b`.
    fn index_of_byte(&self, b: u8) -> Option<usize> {
        self.index_of_byte_from(b, 0)
    }

    /// First index of `b` at or after `from`.
    fn index_of_byte_from(&self, b: u8, from: usize) -> Option<usize> {
        let bytes = self.bytes();
        let tail = bytes.get(from..)?;
        tail.iter().position(|&x| x == b).map(|i| i + from)
    }

    /// Last index of `b`.
    fn last_index_of_byte(&self, b: u8) -> Option<usize> {
        self.last_index_of_byte_from(b, usize::MAX)
    }

    /// Last index of `b` at or before `from`. A `from` past the end searches
    /// the whole span.
    fn last_index_of_byte_from(&self, b: u8, from: usize) -> Option<usize> {
        let bytes = self.bytes();
        let last = bytes.len().checked_sub(1)?;
        bytes[..=from.min(last)].iter().rposition(|&x| x == b)
    }

    /// First index at which `needle` occurs. An empty needle is found at 0.
    fn index_of<O: ByteSpan + ?Sized>(&self, needle: &O) -> Option<usize> {
        self.index_of_from(needle, 0)
    }

    /// First index at or after `from` at which `needle` occurs.
    ///
    /// Naive forward scan. An empty needle is found at `from`.
    fn index_of_from<O: ByteSpan + ?Sized>(&self, needle: &O, from: usize) -> Option<usize> {
        let (hay, needle) = (self.bytes(), needle.bytes());
        if needle.is_empty() {
            return Some(from);
        }
        let max = hay.len().checked_sub(needle.len())?;
        (from..=max).find(|&i| hay[i..i + needle.len()] == *needle)
    }

    /// Last index at which `needle` occurs. An empty needle is found at
    /// `len()`.
    fn last_index_of<O: ByteSpan + ?Sized>(&self, needle: &O) -> Option<usize> {
        self.last_index_of_from(needle, self.len())
    }

    /// Last index at or before `from` at which `needle` starts.
    ///
    /// Naive backward scan. An empty needle is found at `from`.
    fn last_index_of_from<O: ByteSpan + ?Sized>(&self, needle: &O, from: usize) -> Option<usize> {
        let (hay, needle) = (self.bytes(), needle.bytes());
        if needle.is_empty() {
            return Some(from);
        }
        let max = hay.len().checked_sub(needle.len())?;
        (0..=from.min(max))
            .rev()
            .find(|&i| hay[i..i + needle.len()] == *needle)
    }

    /// `true` if `prefix` is a prefix of this span.
    fn starts_with<O: ByteSpan + ?Sized>(&self, prefix: &O) -> bool {
        let (a, b) = (self.bytes(), prefix.bytes());
        a.starts_with(&*b)
    }

    /// `true` if `suffix` is a suffix of this span.
    fn ends_with<O: ByteSpan + ?Sized>(&self, suffix: &O) -> bool {
        let (a, b) = (self.bytes(), suffix.bytes());
        a.ends_with(&*b)
    }

    /// Compares `len` bytes of this span starting at `self_offset` with `len`
    /// bytes of `other` starting at `other_offset`.
    ///
    /// Returns `false` when either region reaches past the end of its span.
    fn region_matches<O: ByteSpan + ?Sized>(
        &self,
        self_offset: usize,
        other: &O,
        other_offset: usize,
        len: usize,
        ignore_case: bool,
    ) -> bool {
        let (a, b) = (self.bytes(), other.bytes());
        let (Some(a), Some(b)) = (region(&a, self_offset, len), region(&b, other_offset, len))
        else {
            return false;
        };
        if ignore_case {
            a.iter().zip(b).all(|(&x, &y)| eq_ignore_case(x, y))
        } else {
            a == b
        }
    }

    /// New owned copy of `start..end`.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if the region is reversed or too long.
    fn sub_copy(&self, start: usize, end: usize) -> Result<ByteString, Error> {
        let bytes = self.bytes();
        Error::check_range(start, end, bytes.len())?;
        Ok(ByteString::from_mapped(&bytes[start..end], core::convert::identity))
    }

    /// Overwrites `target` with a copy of `start..end`, reusing its storage
    /// when large enough.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if the region is reversed or too long.
    fn sub_copy_into(&self, start: usize, end: usize, target: &mut ByteString) -> Result<(), Error> {
        target.assign_mapped(self, start..end, core::convert::identity)
    }

    /// New owned concatenation of this span and `other`.
    fn concat<O: ByteSpan + ?Sized>(&self, other: &O) -> ByteString {
        let (a, b) = (self.bytes(), other.bytes());
        let mut out = ByteString::with_capacity(a.len() + b.len());
        out.append(&*a).append(&*b);
        out
    }

    /// New owned copy with every `from` byte replaced by `to`.
    fn replace_copy(&self, from: u8, to: u8) -> ByteString {
        ByteString::from_mapped(&self.bytes(), |b| if b == from { to } else { b })
    }

    /// Overwrites `target` with a copy in which every `from` byte is
    /// replaced by `to`.
    fn replace_copy_into(&self, from: u8, to: u8, target: &mut ByteString) {
        let len = self.len();
        // The full range is always in bounds.
        let _ = target.assign_mapped(self, 0..len, |b| if b == from { to } else { b });
    }

    /// New owned Latin-1 lowercase copy.
    fn to_lower_case_copy(&self) -> ByteString {
        ByteString::from_mapped(&self.bytes(), to_lower)
    }

    /// New owned Latin-1 uppercase copy.
    fn to_upper_case_copy(&self) -> ByteString {
        ByteString::from_mapped(&self.bytes(), to_upper)
    }

    /// Decodes the bytes as Latin-1: each byte becomes the `char` with the
    /// same code point.
    fn to_latin1_string(&self) -> String {
        self.bytes().iter().copied().map(char::from).collect()
    }

    /// Parses a decimal integer.
    ///
    /// # Errors
    ///
    /// See [`to_int_radix`](ByteSpan::to_int_radix).
    fn to_int(&self) -> Result<i32, FormatError> {
        self.to_int_radix(10)
    }

    /// Parses an integer with an optional leading `-`.
    ///
    /// Digits are `0-9`, then `A-Z` / `a-z` for radices above 10.
    ///
    /// # Errors
    ///
    /// [`FormatError`] on an empty span, a lone sign, a digit outside the
    /// radix, a radix outside `2..=36`, or a value outside `i32`.
    /// A lone `-` and values outside `i32` are rejected here, whereas the
    /// historical parser returned 0 and wrapped silently.
    fn to_int_radix(&self, radix: u32) -> Result<i32, FormatError> {
        numbers::parse_int(&self.bytes(), radix)
    }

    /// Writes the raw bytes followed by `terminator` to `sink`.
    ///
    /// # Errors
    ///
    /// Whatever `sink` reports; nothing is retried.
    fn write_to<W: ByteSink + ?Sized>(
        &self,
        sink: &mut W,
        terminator: LineTerminator,
    ) -> Result<(), W::Error> {
        sink.write_all(&self.bytes())?;
        match terminator {
            LineTerminator::None => Ok(()),
            _ => sink.write_all(terminator.as_bytes()),
        }
    }
}

fn region(bytes: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    bytes.get(offset..offset.checked_add(len)?)
}

pub(crate) fn sampled_hash(bytes: &[u8]) -> i32 {
    let signed = |b: u8| i32::from(i8::from_ne_bytes([b]));
    if bytes.len() < 16 {
        bytes
            .iter()
            .fold(0i32, |h, &b| h.wrapping_mul(37).wrapping_add(signed(b)))
    } else {
        bytes
            .iter()
            .step_by(bytes.len() / 8)
            .fold(0i32, |h, &b| h.wrapping_mul(39).wrapping_add(signed(b)))
    }
}

impl ByteSpan for [u8] {
    type Bytes<'a> = &'a [u8];

    #[inline]
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> ByteSpan for [u8; N] {
    type Bytes<'a> = &'a [u8];

    #[inline]
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSpan for Vec<u8> {
    type Bytes<'a> = &'a [u8];

    #[inline]
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSpan for str {
    type Bytes<'a> = &'a [u8];

    #[inline]
    fn bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}
