/// Configuration options for [`LineScanner`](crate::LineScanner).
///
/// # Examples
///
/// ```rust
/// use bytespan::{LineScanner, ScannerOptions};
///
/// let options = ScannerOptions {
///     initial_capacity: 4096,
/// };
/// let mut scanner = LineScanner::with_options(&b"a\nb\n"[..], options);
/// assert_eq!(scanner.next_line().unwrap(), Some(&b"a"[..]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScannerOptions {
    /// Size of the internal buffer allocated up front.
    ///
    /// The buffer doubles whenever a line does not fit, so this only bounds
    /// the number of early reallocations. A value of 0 is treated as 1.
    ///
    /// # Default
    ///
    /// `256`
    pub initial_capacity: usize,
}

impl ScannerOptions {
    /// Buffer size used when none is given.
    pub const DEFAULT_CAPACITY: usize = 256;

    pub(crate) const fn effective_capacity(&self) -> usize {
        if self.initial_capacity == 0 {
            1
        } else {
            self.initial_capacity
        }
    }
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_CAPACITY,
        }
    }
}
