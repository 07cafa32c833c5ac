use crate::FormatError;

/// Number of bytes in the decimal representation of `n`, sign included.
pub(crate) fn decimal_len(n: i64) -> usize {
    let mut len = usize::from(n < 0) + 1;
    let mut m = n.unsigned_abs();
    while m >= 10 {
        m /= 10;
        len += 1;
    }
    len
}

/// Writes `n` in decimal into `out`, which must be exactly
/// [`decimal_len(n)`](decimal_len) bytes long. Digits are written back to
/// front.
pub(crate) fn write_decimal(n: i64, out: &mut [u8]) {
    debug_assert_eq!(out.len(), decimal_len(n));
    let mut m = n.unsigned_abs();
    for slot in out.iter_mut().rev() {
        #[allow(clippy::cast_possible_truncation)]
        let digit = (m % 10) as u8;
        *slot = b'0' + digit;
        m /= 10;
        if m == 0 {
            break;
        }
    }
    if n < 0 {
        out[0] = b'-';
    }
}

fn digit_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some(u32::from(b - b'0')),
        b'A'..=b'Z' => Some(u32::from(b - b'A') + 10),
        b'a'..=b'z' => Some(u32::from(b - b'a') + 10),
        _ => None,
    }
}

/// Parses an optionally `-`-prefixed integer in `radix`.
pub(crate) fn parse_int(bytes: &[u8], radix: u32) -> Result<i32, FormatError> {
    if !(2..=36).contains(&radix) {
        return Err(FormatError::InvalidRadix(radix));
    }
    let (negative, digits, first) = match bytes {
        [] => return Err(FormatError::Empty),
        [b'-', rest @ ..] => (true, rest, 1),
        _ => (false, bytes, 0),
    };
    if digits.is_empty() {
        return Err(FormatError::NoDigits);
    }

    // i32::MIN has one more unit of magnitude than i32::MAX.
    let limit = i64::from(i32::MAX) + i64::from(negative);
    let mut acc: i64 = 0;
    for (i, &byte) in digits.iter().enumerate() {
        let digit = digit_value(byte)
            .filter(|&d| d < radix)
            .ok_or(FormatError::InvalidDigit {
                byte,
                position: first + i,
                radix,
            })?;
        acc = acc * i64::from(radix) + i64::from(digit);
        if acc > limit {
            return Err(FormatError::Overflow);
        }
    }
    let value = if negative { -acc } else { acc };
    i32::try_from(value).map_err(|_| FormatError::Overflow)
}
