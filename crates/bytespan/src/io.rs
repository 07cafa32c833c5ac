//! The two narrow collaborator interfaces: a blocking byte producer and a
//! blocking byte consumer.
//!
//! With the `std` feature every [`std::io::Read`] is a [`ByteSource`] and
//! every [`std::io::Write`] is a [`ByteSink`]. Without it, byte slices and
//! `Vec<u8>` fill those roles.

/// A blocking producer of bytes.
pub trait ByteSource {
    /// Failure reported by the producer. Propagated unchanged.
    type Error;

    /// Reads up to `buf.len()` bytes into `buf`.
    ///
    /// Returns the number of bytes written; `0` for a non-empty `buf` means
    /// the source is exhausted.
    ///
    /// # Errors
    ///
    /// Whatever the underlying producer reports.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// A blocking consumer of bytes.
pub trait ByteSink {
    /// Failure reported by the consumer. Propagated unchanged.
    type Error;

    /// Writes all of `bytes`.
    ///
    /// # Errors
    ///
    /// Whatever the underlying consumer reports.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

#[cfg(feature = "std")]
impl<R: std::io::Read + ?Sized> ByteSource for R {
    type Error = std::io::Error;

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(self, buf)
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write + ?Sized> ByteSink for W {
    type Error = std::io::Error;

    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        std::io::Write::write_all(self, bytes)
    }
}

#[cfg(not(feature = "std"))]
impl ByteSource for &[u8] {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

#[cfg(not(feature = "std"))]
impl ByteSink for alloc::vec::Vec<u8> {
    type Error = core::convert::Infallible;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Line terminator appended by [`ByteSpan::write_to`](crate::ByteSpan::write_to).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineTerminator {
    /// Write the bytes only.
    #[default]
    None,
    /// Append `\n`.
    Lf,
    /// Append `\r\n`.
    CrLf,
}

impl LineTerminator {
    /// The terminator's bytes.
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            LineTerminator::None => b"",
            LineTerminator::Lf => b"\n",
            LineTerminator::CrLf => b"\r\n",
        }
    }
}
