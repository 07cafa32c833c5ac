use thiserror::Error;

/// Errors raised by [`ByteSpan`](crate::ByteSpan) and
/// [`ByteString`](crate::ByteString) operations.
///
/// I/O failures are not part of this type: they surface unchanged as the
/// error type of the source or sink involved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A single index was outside `0..len`.
    #[error("index {index} out of range for span of length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the span that was indexed.
        len: usize,
    },
    /// A `start..end` region was reversed or reached past the end of the span.
    #[error("range {start}..{end} out of range for span of length {len}")]
    RangeOutOfRange {
        /// Requested start (inclusive).
        start: usize,
        /// Requested end (exclusive).
        end: usize,
        /// Length of the span that was sliced.
        len: usize,
    },
    /// Integer parsing failed.
    ///
    /// The parsing methods return [`FormatError`] on their own; this variant
    /// lets callers that also slice or index use `?` on both.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

/// Why a span could not be parsed as an integer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The span was empty.
    #[error("cannot parse integer from empty span")]
    Empty,
    /// The span held a sign but no digits.
    #[error("no digits after sign")]
    NoDigits,
    /// A byte is not a digit in the requested radix.
    #[error("invalid digit {byte:#04x} at position {position} for radix {radix}")]
    InvalidDigit {
        /// The rejected byte.
        byte: u8,
        /// Its index in the span.
        position: usize,
        /// The radix that was requested.
        radix: u32,
    },
    /// The radix is outside `2..=36`.
    #[error("radix {0} is not in 2..=36")]
    InvalidRadix(u32),
    /// The value does not fit an `i32`.
    #[error("integer overflow")]
    Overflow,
}

impl Error {
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), Error> {
        if index < len {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange { index, len })
        }
    }

    pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), Error> {
        if start <= end && end <= len {
            Ok(())
        } else {
            Err(Error::RangeOutOfRange { start, end, len })
        }
    }
}
