//! Saturating 32-bit arithmetic
//!
//! Page offsets and limits are handed to data sources as `i32` values. Every
//! operation here is computed in `i64` and clamped into `i32::MIN..=i32::MAX`,
//! so an overflowing offset reads as `i32::MAX` instead of wrapping.

/// Clamp a 64-bit value into the `i32` range
pub fn clamp_to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Add two integers, saturating on overflow
pub fn add(a: i32, b: i32) -> i32 {
    clamp_to_i32(i64::from(a) + i64::from(b))
}

/// Subtract two integers, saturating on overflow
pub fn subtract(a: i32, b: i32) -> i32 {
    clamp_to_i32(i64::from(a) - i64::from(b))
}

/// Multiply two integers, saturating on overflow
pub fn multiply(a: i32, b: i32) -> i32 {
    clamp_to_i32(i64::from(a) * i64::from(b))
}

/// Convert a collection length to `i32`, saturating at `i32::MAX`
pub fn len_to_i32(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

/// Integer division rounded up, for non-negative dividends and positive divisors
pub fn ceil_div(dividend: i32, divisor: i32) -> i32 {
    dividend / divisor + i32::from(dividend % divisor != 0)
}
