/// Fractional digits kept when a mean does not terminate.
const MAX_FRACTION_DIGITS: usize = 20;

/// The mean of `count` integers summing to `sum`, as a decimal string.
///
/// Terminating means are printed exactly (`"2.5"`); the others are
/// truncated after 20 fractional digits. `None` when `count` is zero.
pub fn exact_average(sum: i128, count: u64) -> Option<String> {
    if count == 0 {
        return None;
    }
    let count = u128::from(count);
    let magnitude = sum.unsigned_abs();
    let whole = magnitude / count;
    let mut remainder = magnitude % count;

    let mut fraction = String::new();
    while remainder != 0 && fraction.len() < MAX_FRACTION_DIGITS {
        remainder *= 10;
        let digit = remainder / count;
        fraction.push(char::from(b'0' + digit as u8));
        remainder %= count;
    }

    let sign = if sum < 0 { "-" } else { "" };
    Some(if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    })
}
