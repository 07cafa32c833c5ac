/// How a [`LineScanner`](crate::LineScanner) makes room before its next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refill {
    /// Read into the free space after the buffered bytes.
    Tail,
    /// Slide the unconsumed bytes to the front of the buffer, then read into
    /// the reclaimed tail. Nothing is allocated.
    Compact,
    /// Double the buffer, then read into the new tail.
    Grow,
}

/// Chooses how to make room for `required` more bytes.
///
/// `consumed` is the already-consumed prefix of a buffer of `capacity`
/// bytes, `free_tail` the unused space after the buffered bytes.
///
/// The free tail wins when it is large enough. Otherwise the buffer is
/// compacted when the consumed prefix covers more than half of it and
/// reclaiming that prefix frees enough room; in every other case it grows.
#[must_use]
pub const fn refill_strategy(
    consumed: usize,
    free_tail: usize,
    capacity: usize,
    required: usize,
) -> Refill {
    if free_tail >= required {
        Refill::Tail
    } else if consumed > capacity / 2 && consumed.saturating_add(free_tail) >= required {
        Refill::Compact
    } else {
        Refill::Grow
    }
}
