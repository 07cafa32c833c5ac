#![no_main]

use arbitrary::Arbitrary;
use bytespan::{ByteSource, ByteString, LineScanner};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    /// Read sizes, used round-robin; 0 entries are bumped to 1.
    sizes: Vec<u8>,
    data: Vec<u8>,
}

struct Partitioned<'a> {
    data: &'a [u8],
    sizes: &'a [u8],
    next: usize,
}

impl ByteSource for Partitioned<'_> {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let size = match self.sizes.len() {
            0 => usize::MAX,
            n => usize::from(self.sizes[self.next % n].max(1)),
        };
        self.next += 1;
        let n = buf.len().min(size).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn reference_lines(input: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = input.split(|&b| b == b'\n').collect();
    if input.is_empty() || input.ends_with(b"\n") {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect()
}

fuzz_target!(|input: Input| {
    let source = Partitioned {
        data: &input.data,
        sizes: &input.sizes,
        next: 0,
    };
    let mut scanner = LineScanner::with_capacity(source, usize::from(input.capacity));
    let expected = reference_lines(&input.data);

    let mut owned = ByteString::new();
    for want in &expected {
        assert_eq!(scanner.next_line_into(&mut owned), Ok(true));
        assert_eq!(owned, *want);
    }
    assert_eq!(scanner.next_line_into(&mut owned), Ok(false));
    assert_eq!(scanner.next_line(), Ok(None));
    assert_eq!(scanner.stats().bytes_read, input.data.len() as u64);
});
