//! Buffered line scanner over a [`ByteSource`].
//!
//! The scanner owns a single growable buffer. `next_line` returns a slice of
//! that buffer which borrows the scanner, so it is gone before the next call
//! can move or overwrite the bytes behind it. Callers that need a line for
//! longer copy it out with [`LineScanner::next_line_into`] or
//! [`ByteSpan::sub_copy`](crate::ByteSpan::sub_copy).
//!
//! Buffer layout
//! - `buf[..start]` has been consumed and is free for compaction.
//! - `buf[start..end]` is buffered and not yet returned.
//! - `buf[end..]` is the free tail the next read fills.
//! - `cursor` lies in `start..=end` and marks how far the current line has
//!   been searched for `\n`. It only moves forward within a line, so bytes
//!   are never scanned twice however many refills a long line needs.

mod refill;

use alloc::{vec, vec::Vec};
use core::ops::Range;

pub use refill::{Refill, refill_strategy};

use crate::{ByteString, ScannerOptions, io::ByteSource};

/// Where a [`LineScanner`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// Nothing is buffered.
    Empty,
    /// Bytes are buffered and waiting to be returned.
    Scanning,
    /// The source reported end of stream and every byte has been returned.
    /// No further reads are attempted.
    Exhausted,
}

/// Counters describing the work a [`LineScanner`] has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanStats {
    /// Calls made to the source, including the one that reported the end.
    pub reads: u64,
    /// Bytes received from the source.
    pub bytes_read: u64,
    /// Times unconsumed bytes were slid to the front of the buffer.
    pub compactions: u64,
    /// Times the buffer doubled.
    pub grows: u64,
    /// Lines returned, including a final unterminated one.
    pub lines: u64,
}

/// Splits a byte stream into lines.
///
/// A line ends at `\n`; a single `\r` right before it is dropped. Bytes after
/// the last `\n` form a final line. Reaching the end of the stream is
/// reported as `Ok(None)`, which is distinct from an empty line.
///
/// # Examples
///
/// ```rust
/// use bytespan::LineScanner;
///
/// let mut scanner = LineScanner::new(&b"abc\ndef\r\nghi"[..]);
/// let mut lines = Vec::new();
/// while let Some(line) = scanner.next_line().unwrap() {
///     lines.push(line.to_vec());
/// }
/// assert_eq!(lines, [&b"abc"[..], b"def", b"ghi"]);
/// ```
#[derive(Debug)]
pub struct LineScanner<S> {
    source: S,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    cursor: usize,
    state: ScanState,
    stats: ScanStats,
}

impl<S: ByteSource> LineScanner<S> {
    /// Creates a scanner with the default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ScannerOptions::default())
    }

    /// Creates a scanner whose buffer starts at `capacity` bytes.
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self::with_options(
            source,
            ScannerOptions {
                initial_capacity: capacity,
            },
        )
    }

    /// Creates a scanner with the given options.
    pub fn with_options(source: S, options: ScannerOptions) -> Self {
        Self {
            source,
            buf: vec![0; options.effective_capacity()],
            start: 0,
            end: 0,
            cursor: 0,
            state: ScanState::Empty,
            stats: ScanStats::default(),
        }
    }

    /// Returns the next line without its terminator, or `None` at end of
    /// stream.
    ///
    /// The slice points into the scanner's buffer and is valid until the
    /// scanner is used again.
    ///
    /// # Errors
    ///
    /// Whatever the source reports. The scanner should not be used for more
    /// lines afterwards; bytes read before the failure may be lost.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>, S::Error> {
        Ok(self.scan()?.map(|line| &self.buf[line]))
    }

    /// Copies the next line into `target` and returns `true`, or clears
    /// `target` and returns `false` at end of stream.
    ///
    /// `target` is an owned copy that stays valid across later calls.
    ///
    /// # Errors
    ///
    /// See [`next_line`](Self::next_line).
    pub fn next_line_into(&mut self, target: &mut ByteString) -> Result<bool, S::Error> {
        match self.scan()? {
            Some(line) => {
                target.copy_of(&self.buf[line]);
                Ok(true)
            }
            None => {
                target.clear();
                Ok(false)
            }
        }
    }

    /// Reads raw bytes, draining the buffer before reading the source.
    ///
    /// This allows switching from line-oriented to plain reads mid-stream.
    /// Returns 0 only at end of stream or for an empty `out`.
    ///
    /// # Errors
    ///
    /// Whatever the source reports.
    pub fn read_buffered(&mut self, out: &mut [u8]) -> Result<usize, S::Error> {
        if out.is_empty() {
            return Ok(0);
        }
        if self.start < self.end {
            let n = out.len().min(self.end - self.start);
            out[..n].copy_from_slice(&self.buf[self.start..self.start + n]);
            self.start += n;
            self.cursor = self.cursor.max(self.start);
            if self.start == self.end {
                self.state = ScanState::Empty;
            }
            return Ok(n);
        }
        if self.state == ScanState::Exhausted {
            return Ok(0);
        }
        let n = self.source.read(out)?;
        self.record_read(n);
        if n == 0 {
            self.exhaust();
        }
        Ok(n)
    }

    fn scan(&mut self) -> Result<Option<Range<usize>>, S::Error> {
        if self.state == ScanState::Exhausted {
            return Ok(None);
        }
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
            self.cursor = 0;
            if self.fill()? == 0 {
                return Ok(self.finish());
            }
        }
        loop {
            if let Some(i) = self.buf[self.cursor..self.end].iter().position(|&b| b == b'\n') {
                let lf = self.cursor + i;
                let line = self.start..lf;
                self.start = lf + 1;
                self.cursor = self.start;
                if self.start == self.end {
                    self.state = ScanState::Empty;
                }
                return Ok(Some(self.emit(line)));
            }
            self.cursor = self.end;
            self.make_room();
            if self.fill()? == 0 {
                return Ok(self.finish());
            }
        }
    }

    fn make_room(&mut self) {
        let capacity = self.buf.len();
        match refill_strategy(self.start, capacity - self.end, capacity, 1) {
            Refill::Tail => {}
            Refill::Compact => {
                let consumed = self.start;
                tracing::trace!(
                    capacity,
                    consumed,
                    buffered = self.end - self.start,
                    "line scanner compacted"
                );
                self.buf.copy_within(self.start..self.end, 0);
                self.start = 0;
                self.end -= consumed;
                self.cursor -= consumed;
                self.stats.compactions += 1;
            }
            Refill::Grow => {
                let new_capacity = capacity.saturating_mul(2).max(1);
                tracing::trace!(
                    capacity = new_capacity,
                    consumed = self.start,
                    buffered = self.end - self.start,
                    "line scanner grew"
                );
                self.buf.resize(new_capacity, 0);
                self.stats.grows += 1;
            }
        }
    }

    /// One read into the free tail, which must not be empty.
    fn fill(&mut self) -> Result<usize, S::Error> {
        let n = self.source.read(&mut self.buf[self.end..])?;
        self.record_read(n);
        if n > 0 {
            self.end += n;
            self.state = ScanState::Scanning;
        }
        Ok(n)
    }

    fn record_read(&mut self, n: usize) {
        self.stats.reads += 1;
        self.stats.bytes_read += n as u64;
    }

    /// Handles end of stream: whatever is still buffered is the last line.
    fn finish(&mut self) -> Option<Range<usize>> {
        let rest = self.start..self.end;
        self.start = self.end;
        self.cursor = self.end;
        self.exhaust();
        if rest.is_empty() {
            None
        } else {
            Some(self.emit(rest))
        }
    }

    fn exhaust(&mut self) {
        if self.state != ScanState::Exhausted {
            tracing::debug!(
                bytes_read = self.stats.bytes_read,
                lines = self.stats.lines,
                "line scanner reached end of stream"
            );
        }
        self.state = ScanState::Exhausted;
    }

    fn emit(&mut self, mut line: Range<usize>) -> Range<usize> {
        if self.buf[line.clone()].ends_with(b"\r") {
            line.end -= 1;
        }
        self.stats.lines += 1;
        line
    }
}

impl<S> LineScanner<S> {
    /// Bytes read from the source and not yet returned.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.end - self.start
    }

    /// Current size of the internal buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Counters collected so far.
    #[must_use]
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// The underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// The underlying source. Reading from it directly skips buffered bytes.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Returns the source. Buffered bytes are dropped.
    pub fn into_inner(self) -> S {
        self.source
    }
}

#[cfg(feature = "std")]
impl<S: ByteSource<Error = std::io::Error>> std::io::Read for LineScanner<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read_buffered(buf)
    }
}
