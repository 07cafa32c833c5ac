//! Byte-oriented string handling and buffered line scanning.
//!
//! - [`ByteSpan`] is the read-only capability set: comparison, search,
//!   Latin-1 case folding, integer parsing, copying and writing. It is
//!   implemented for `[u8]`, `[u8; N]`, `Vec<u8>`, `str` and [`ByteString`].
//! - [`ByteString`] adds in-place mutation, growth and aliasing views over
//!   shared storage.
//! - [`LineScanner`] splits a [`ByteSource`] into lines, returning each line
//!   as a slice of its own buffer.
//!
//! Bytes are interpreted as Latin-1 wherever text is involved: each byte is
//! the code point of the same value.
//!
//! The crate is `no_std` with `alloc`. The default `std` feature makes every
//! `std::io::Read` a [`ByteSource`] and every `std::io::Write` a [`ByteSink`].

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod byte_string;
pub mod case;
mod error;
mod io;
mod numbers;
mod options;
mod scanner;
mod span;


pub use byte_string::{ByteString, BytesRef};
pub use error::{Error, FormatError};
pub use io::{ByteSink, ByteSource, LineTerminator};
pub use options::ScannerOptions;
pub use scanner::{LineScanner, Refill, ScanState, ScanStats, refill_strategy};
pub use span::ByteSpan;
