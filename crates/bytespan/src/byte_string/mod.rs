//! `ByteString`: a mutable byte string over shared, fixed-size storage.
//!
//! A `ByteString` is a window `offset..offset + len` into a heap array that
//! may be shared with other `ByteString`s (views). The sharing rules are the
//! point of the type:
//!
//! - In-place mutation of existing bytes (`replace_self`, `set_byte_at`,
//!   case mapping, in-place compaction) is visible through every view of the
//!   same storage.
//! - Growth that reallocates rebinds only the growing value. Views keep the
//!   old array and from then on see a stale snapshot.
//! - [`detach`](ByteString::detach) drops the storage reference so later
//!   growth can no longer touch anything a former view still reads.
//!
//! None of this is tracked at runtime. Storage is reference counted and
//! guarded by a `RefCell`, so misuse can only produce stale data or a borrow
//! panic, never undefined behaviour. The type is neither `Send` nor `Sync`.

use alloc::{boxed::Box, rc::Rc, vec, vec::Vec};
use core::{
    cell::{Ref, RefCell},
    fmt,
    hash::{Hash, Hasher},
    ops::{Deref, Range},
};

use crate::{
    ByteSpan, Error,
    case::{to_lower, to_upper},
    io::ByteSource,
    numbers,
};

type Storage = Rc<RefCell<Box<[u8]>>>;

fn new_storage(capacity: usize) -> Storage {
    Rc::new(RefCell::new(vec![0u8; capacity].into_boxed_slice()))
}

/// A mutable, growable byte string that can alias other byte strings.
///
/// See the [module documentation](self) for the aliasing contract.
///
/// # Panics
///
/// Mutating methods panic if a [`BytesRef`] obtained from a view of the same
/// storage is still alive, because the storage is already borrowed.
pub struct ByteString {
    data: Option<Storage>,
    offset: usize,
    len: usize,
}

/// Shared borrow of the bytes of a [`ByteString`].
///
/// Keep it short-lived: mutating any byte string that shares the storage
/// panics while a `BytesRef` is held.
pub struct BytesRef<'a>(Inner<'a>);

enum Inner<'a> {
    Empty,
    Shared(Ref<'a, [u8]>),
}

impl Deref for BytesRef<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match &self.0 {
            Inner::Empty => &[],
            Inner::Shared(bytes) => bytes,
        }
    }
}

impl ByteString {
    /// Smallest array ever allocated for a non-empty byte string.
    pub const MIN_CAPACITY: usize = 32;

    /// Creates an empty byte string without storage.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: None,
            offset: 0,
            len: 0,
        }
    }

    /// Creates an empty byte string with room for at least `capacity` bytes.
    /// Nothing is allocated for a capacity of 0.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut s = Self::new();
        s.reserve_destructive(capacity);
        s
    }

    /// Creates a byte string from text, keeping the low 8 bits of each char.
    ///
    /// Every Latin-1 string survives a round trip through
    /// [`to_latin1_string`](ByteSpan::to_latin1_string).
    #[must_use]
    pub fn from_latin1(text: &str) -> Self {
        let mut s = Self::new();
        s.copy_of_latin1(text);
        s
    }

    pub(crate) fn from_mapped(src: &[u8], map: impl Fn(u8) -> u8) -> Self {
        let mut s = Self::new();
        s.overwrite_with(src, map);
        s
    }

    /// Length of the backing array, or 0 without storage.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.borrow().len())
    }

    /// Bytes available after the end of the content without reallocating
    /// or compacting.
    #[must_use]
    pub fn spare_capacity(&self) -> usize {
        self.capacity() - self.offset - self.len
    }

    /// `true` if both byte strings are backed by the same array.
    #[must_use]
    pub fn shares_storage_with(&self, other: &ByteString) -> bool {
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `false` while someone (typically a view being read from) borrows the
    /// storage.
    fn storage_is_free(&self) -> bool {
        self.data.as_ref().is_none_or(|d| d.try_borrow_mut().is_ok())
    }

    /// Makes sure the array holds at least `capacity` bytes and resets the
    /// offset to 0.
    ///
    /// A new array of `max(capacity, MIN_CAPACITY)` bytes replaces a smaller
    /// one. Existing content is **not** preserved; call this only before
    /// refilling from scratch.
    pub fn reserve_destructive(&mut self, capacity: usize) {
        if self.capacity() < capacity {
            let capacity = capacity.max(Self::MIN_CAPACITY);
            tracing::trace!(capacity, "byte string reallocated");
            self.data = Some(new_storage(capacity));
        }
        self.offset = 0;
    }

    /// Makes sure there is room for `capacity` bytes from the current
    /// offset, keeping the content.
    ///
    /// Slides the content to offset 0 when that frees enough room;
    /// otherwise allocates `max(capacity, MIN_CAPACITY, 2 * old capacity)`
    /// bytes and copies the content over. Views of the old array are not
    /// updated.
    pub fn reserve_growing(&mut self, capacity: usize) {
        let total = self.capacity();
        if total - self.offset >= capacity {
            return;
        }
        let (offset, len) = (self.offset, self.len);
        if total >= capacity {
            if let Some(data) = &self.data {
                tracing::trace!(offset, len, "byte string compacted");
                data.borrow_mut().copy_within(offset..offset + len, 0);
            }
        } else {
            let new_capacity = capacity.max(Self::MIN_CAPACITY).max(total * 2);
            tracing::trace!(old = total, new = new_capacity, "byte string grew");
            let fresh = new_storage(new_capacity);
            if let Some(old) = &self.data {
                fresh.borrow_mut()[..len].copy_from_slice(&old.borrow()[offset..offset + len]);
            }
            self.data = Some(fresh);
        }
        self.offset = 0;
    }

    /// Runs `f` on the live window of the storage.
    fn with_content_mut<R>(&mut self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let (offset, len) = (self.offset, self.len);
        match &self.data {
            Some(data) => f(&mut data.borrow_mut()[offset..offset + len]),
            None => f(&mut []),
        }
    }

    /// Grows the content by `extra` bytes written by `fill`.
    fn extend_with(&mut self, extra: usize, fill: impl FnOnce(&mut [u8])) {
        if extra == 0 {
            return;
        }
        self.reserve_growing(self.len + extra);
        let start = self.offset + self.len;
        if let Some(data) = &self.data {
            fill(&mut data.borrow_mut()[start..start + extra]);
        }
        self.len += extra;
    }

    /// Replaces the content with `map` applied to `src`. `src` must not
    /// borrow this byte string's storage.
    fn overwrite_with(&mut self, src: &[u8], map: impl Fn(u8) -> u8) {
        self.reserve_destructive(src.len());
        self.len = src.len();
        self.with_content_mut(|dst| {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = map(s);
            }
        });
    }

    /// Replaces the content with `map` applied to `src[range]`, copying the
    /// source out first if it lives in this byte string's storage.
    pub(crate) fn assign_mapped<O: ByteSpan + ?Sized>(
        &mut self,
        src: &O,
        range: Range<usize>,
        map: impl Fn(u8) -> u8,
    ) -> Result<(), Error> {
        let bytes = src.bytes();
        Error::check_range(range.start, range.end, bytes.len())?;
        if self.storage_is_free() {
            self.overwrite_with(&bytes[range], map);
        } else {
            let copy = bytes[range].to_vec();
            drop(bytes);
            self.overwrite_with(&copy, map);
        }
        Ok(())
    }

    /// Replaces the content with a copy of `other`.
    pub fn copy_of<O: ByteSpan + ?Sized>(&mut self, other: &O) -> &mut Self {
        let len = other.len();
        // The full range is always in bounds.
        let _ = self.assign_mapped(other, 0..len, core::convert::identity);
        self
    }

    /// Replaces the content with `text`, keeping the low 8 bits of each char.
    pub fn copy_of_latin1(&mut self, text: &str) -> &mut Self {
        let len = text.chars().count();
        self.reserve_destructive(len);
        self.len = len;
        self.with_content_mut(|dst| fill_latin1(dst, text));
        self
    }

    /// Attaches fresh storage holding the UTF-8 encoding of `text`. The
    /// previous array is left untouched for any view still reading it.
    pub fn copy_of_utf8(&mut self, text: &str) -> &mut Self {
        *self = Self::from(text.as_bytes().to_vec());
        self
    }

    /// Replaces the content with the decimal representation of `value`.
    pub fn value_of(&mut self, value: i64) -> &mut Self {
        let len = numbers::decimal_len(value);
        self.reserve_destructive(len);
        self.len = len;
        self.with_content_mut(|dst| numbers::write_decimal(value, dst));
        self
    }

    /// Makes this byte string a view of `other`: same storage, offset and
    /// length.
    pub fn view_of(&mut self, other: &ByteString) -> &mut Self {
        self.data.clone_from(&other.data);
        self.offset = other.offset;
        self.len = other.len;
        self
    }

    /// New view of `start..end` sharing this byte string's storage.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if the region is reversed or too long.
    pub fn sub_view(&self, start: usize, end: usize) -> Result<ByteString, Error> {
        let mut view = ByteString::new();
        self.sub_view_into(start, end, &mut view)?;
        Ok(view)
    }

    /// Makes `target` a view of `start..end` of this byte string.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if the region is reversed or too long.
    pub fn sub_view_into(&self, start: usize, end: usize, target: &mut ByteString) -> Result<(), Error> {
        Error::check_range(start, end, self.len)?;
        target.view_of(self);
        target.offset += start;
        target.len = end - start;
        Ok(())
    }

    /// Narrows this byte string to `start..end` in place. Nothing is copied.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if the region is reversed or too long.
    pub fn sub_self(&mut self, start: usize, end: usize) -> Result<&mut Self, Error> {
        Error::check_range(start, end, self.len)?;
        self.offset += start;
        self.len = end - start;
        Ok(self)
    }

    /// Appends the bytes of `other`, which may be a view of this byte string.
    pub fn append<O: ByteSpan + ?Sized>(&mut self, other: &O) -> &mut Self {
        let bytes = other.bytes();
        if self.storage_is_free() {
            self.extend_with(bytes.len(), |dst| dst.copy_from_slice(&bytes));
        } else {
            let copy = bytes.to_vec();
            drop(bytes);
            self.extend_with(copy.len(), |dst| dst.copy_from_slice(&copy));
        }
        self
    }

    /// Appends a single byte.
    pub fn append_byte(&mut self, b: u8) -> &mut Self {
        self.extend_with(1, |dst| dst[0] = b);
        self
    }

    /// Appends `text`, keeping the low 8 bits of each char.
    pub fn append_latin1(&mut self, text: &str) -> &mut Self {
        self.extend_with(text.chars().count(), |dst| fill_latin1(dst, text));
        self
    }

    /// Appends the decimal representation of `value`.
    pub fn append_int(&mut self, value: i64) -> &mut Self {
        self.extend_with(numbers::decimal_len(value), |dst| {
            numbers::write_decimal(value, dst);
        });
        self
    }

    /// Replaces every `from` byte by `to` in place.
    pub fn replace_self(&mut self, from: u8, to: u8) -> &mut Self {
        self.with_content_mut(|bytes| {
            for b in bytes.iter_mut().filter(|b| **b == from) {
                *b = to;
            }
        });
        self
    }

    /// Converts to Latin-1 lowercase in place.
    pub fn to_lower_case_self(&mut self) -> &mut Self {
        self.with_content_mut(|bytes| bytes.iter_mut().for_each(|b| *b = to_lower(*b)));
        self
    }

    /// Converts to Latin-1 uppercase in place.
    pub fn to_upper_case_self(&mut self) -> &mut Self {
        self.with_content_mut(|bytes| bytes.iter_mut().for_each(|b| *b = to_upper(*b)));
        self
    }

    /// Strips bytes `<= 0x20` from both ends by narrowing the window.
    pub fn trim(&mut self) -> &mut Self {
        let (lead, keep) = {
            let bytes = self.bytes();
            let lead = bytes.iter().take_while(|&&b| b <= 0x20).count();
            let trail = bytes[lead..].iter().rev().take_while(|&&b| b <= 0x20).count();
            (lead, bytes.len() - lead - trail)
        };
        self.offset += lead;
        self.len = keep;
        self
    }

    /// Reverses the byte order in place.
    pub fn reverse(&mut self) -> &mut Self {
        self.with_content_mut(<[u8]>::reverse);
        self
    }

    /// Overwrites the byte at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn set_byte_at(&mut self, index: usize, b: u8) -> Result<(), Error> {
        Error::check_index(index, self.len)?;
        self.with_content_mut(|bytes| bytes[index] = b);
        Ok(())
    }

    /// Truncates to `len` bytes, or extends with zero bytes.
    pub fn set_len(&mut self, len: usize) {
        if len > self.len {
            self.extend_with(len - self.len, |dst| dst.fill(0));
        } else {
            self.len = len;
        }
    }

    /// Sets the length to 0 and keeps the storage for reuse.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Sets the length to 0 and releases the storage reference.
    ///
    /// Call this before reusing a byte string that is, or has, a view:
    /// afterwards neither side can corrupt the other. Bytes a view has
    /// already seen are unaffected.
    pub fn detach(&mut self) {
        self.data = None;
        self.offset = 0;
        self.len = 0;
    }

    /// Reads one line from `source` without buffering, one byte per read.
    ///
    /// The line ends at `\n` or at end of stream. Every `\r` is dropped,
    /// wherever it appears. Returns `false` when end of stream arrives before
    /// any `\n` or other byte was kept, so a stray `\r` at the very end does
    /// not produce an extra empty line.
    ///
    /// # Errors
    ///
    /// Whatever `source` reports. The content is unspecified afterwards.
    pub fn read_line_from<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<bool, S::Error> {
        self.reserve_destructive(128);
        self.len = 0;
        let mut byte = [0u8; 1];
        while source.read(&mut byte)? != 0 {
            match byte[0] {
                b'\n' => return Ok(true),
                b'\r' => {}
                b => {
                    self.append_byte(b);
                }
            }
        }
        Ok(self.len > 0)
    }
}

// Serialized as the bytes of the window only; deserialized into owned storage.
#[cfg(any(test, feature = "serde"))]
mod serde_impls {
    use alloc::vec::Vec;
    use core::fmt;

    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{Error, SeqAccess, Visitor},
    };

    use super::ByteString;
    use crate::ByteSpan;

    impl Serialize for ByteString {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_bytes(&self.bytes())
        }
    }

    struct ByteStringVisitor;

    impl<'de> Visitor<'de> for ByteStringVisitor {
        type Value = ByteString;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a byte array or string")
        }

        fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(ByteString::from(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(ByteString::from(value))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
            while let Some(b) = seq.next_element::<u8>()? {
                bytes.push(b);
            }
            Ok(ByteString::from(bytes))
        }
    }

    impl<'de> Deserialize<'de> for ByteString {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_byte_buf(ByteStringVisitor)
        }
    }
}

fn fill_latin1(dst: &mut [u8], text: &str) {
    for (d, c) in dst.iter_mut().zip(text.chars()) {
        #[allow(clippy::cast_possible_truncation)]
        let narrowed = u32::from(c) as u8;
        *d = narrowed;
    }
}

impl ByteSpan for ByteString {
    type Bytes<'a> = BytesRef<'a>;

    fn bytes(&self) -> BytesRef<'_> {
        let (offset, len) = (self.offset, self.len);
        match &self.data {
            Some(data) if len > 0 => BytesRef(Inner::Shared(Ref::map(data.borrow(), |d| {
                &d[offset..offset + len]
            }))),
            _ => BytesRef(Inner::Empty),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

impl Default for ByteString {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones into independent storage; use [`ByteString::view_of`] to alias.
impl Clone for ByteString {
    fn clone(&self) -> Self {
        Self::from_mapped(&self.bytes(), core::convert::identity)
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        Self::from_mapped(bytes, core::convert::identity)
    }
}

impl<const N: usize> From<&[u8; N]> for ByteString {
    fn from(bytes: &[u8; N]) -> Self {
        Self::from(bytes.as_slice())
    }
}

/// Takes the vector's allocation as storage without copying.
impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Self {
            data: Some(Rc::new(RefCell::new(bytes.into_boxed_slice()))),
            offset: 0,
            len,
        }
    }
}

/// Copies the UTF-8 bytes of `text`. See [`ByteString::from_latin1`] for
/// the narrowing conversion.
impl From<&str> for ByteString {
    fn from(text: &str) -> Self {
        Self::from(text.as_bytes())
    }
}

impl PartialEq for ByteString {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for ByteString {}

impl PartialEq<[u8]> for ByteString {
    fn eq(&self, other: &[u8]) -> bool {
        self.equals(other)
    }
}

impl PartialEq<&[u8]> for ByteString {
    fn eq(&self, other: &&[u8]) -> bool {
        self.equals(*other)
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for ByteString {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.equals(*other)
    }
}

impl PartialEq<str> for ByteString {
    fn eq(&self, other: &str) -> bool {
        self.equals(other)
    }
}

impl PartialEq<&str> for ByteString {
    fn eq(&self, other: &&str) -> bool {
        self.equals(*other)
    }
}

impl PartialOrd for ByteString {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteString {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.compare_to(other)
    }
}

/// Hashes every byte, unlike [`ByteSpan::hash_code`].
impl Hash for ByteString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes().hash(state);
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(bstr::BStr::new(&*self.bytes()), f)
    }
}

/// Renders the bytes as Latin-1 text.
impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        self.bytes()
            .iter()
            .try_for_each(|&b| f.write_char(char::from(b)))
    }
}

#[cfg(test)]
mod tests;
