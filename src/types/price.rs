//! Fixed-point price and size utilities.
//!
//! ## Overview
//!
//! The book never does floating-point math. Prices and sizes are u64 scaled by
//! 10^8, so comparisons and fills are exact and every replay of the same input
//! makes the same matching decisions.
//!
//! Callers holding decimals or floats convert at the boundary with
//! [`decimal_to_fixed`] / [`f64_to_fixed`], or use the `submit_decimal` and
//! `submit_f64` entry points on the book, which validate through
//! [`checked_price`] and [`checked_size`].
//!
//! ## Examples
//!
//! ```
//! use limit_book::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::error::{BookError, BookResult};

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` if parsing fails, the value is negative or out of range.
///
/// ```
/// use limit_book::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64, rounding to 8 decimal places
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert an f64 to fixed-point u64
///
/// Returns `None` for NaN, infinities, negative or out-of-range values.
pub fn f64_to_fixed(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    decimal_to_fixed(Decimal::from_f64(value)?)
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point u64 to a string with 8 decimal places
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Convert fixed-point u64 to a string with trailing zeros trimmed
///
/// ```
/// use limit_book::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    fixed_to_decimal(value).normalize().to_string()
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a fixed-point price: must be strictly positive
pub fn checked_price(price: u64) -> BookResult<u64> {
    if price == 0 {
        return Err(BookError::invalid("price must be positive"));
    }
    Ok(price)
}

/// Validate a fixed-point size: must be strictly positive
pub fn checked_size(size: u64) -> BookResult<u64> {
    if size == 0 {
        return Err(BookError::invalid("size must be positive"));
    }
    Ok(size)
}

/// Convert and validate a decimal amount; `what` names it in the error
pub(crate) fn decimal_amount(value: Decimal, what: &str) -> BookResult<u64> {
    if value.is_sign_negative() || value.is_zero() {
        return Err(BookError::invalid(format!("{what} must be positive, got {value}")));
    }
    match decimal_to_fixed(value) {
        Some(0) => Err(BookError::invalid(format!("{what} {value} is below the 10^-8 tick"))),
        Some(fixed) => Ok(fixed),
        None => Err(BookError::invalid(format!("{what} {value} is out of range"))),
    }
}

/// Convert and validate a float amount; `what` names it in the error
pub(crate) fn f64_amount(value: f64, what: &str) -> BookResult<u64> {
    if !value.is_finite() {
        return Err(BookError::invalid(format!("{what} must be finite, got {value}")));
    }
    let decimal = Decimal::from_f64(value)
        .ok_or_else(|| BookError::invalid(format!("{what} {value} is out of range")))?;
    decimal_amount(decimal, what)
}
