//! Decimal text to binary number conversion.
//!
//! The OBJ loader never goes through `str::parse`. Numeric tokens are decoded
//! here with a small, allocation-free routine:
//!
//! 1. Digits before and after the decimal point are folded into an unsigned
//!    `mantissa`; every fractional digit decrements `exponent_10`.
//! 2. An `e`/`E` suffix with optional sign is added to `exponent_10`.
//! 3. `mantissa * 10^exponent_10` is rewritten as `mantissa_2 * 2^exponent_2`
//!    by moving factors of five into the mantissa while shedding bits into the
//!    binary exponent, so the mantissa never leaves its accumulator width.
//! 4. The result is `mantissa_2` scaled by `2^exponent_2`, an exact binary
//!    operation.
//!
//! Input is an *unsigned* literal: the leading minus sign is a separate token
//! and is applied by the caller.
//!
//! Two accumulator widths are provided. [`parse_decimal_f32`] keeps the
//! mantissa in 32 bits; it is exact for short literals and silently wraps on
//! runs longer than about nine significant digits. [`parse_decimal_f64`] uses
//! a 64-bit accumulator for callers that need the extra digits.

/// Exponents beyond this magnitude produce zero or infinity for any mantissa,
/// so the conversion loops are bounded by it.
const EXPONENT_LIMIT: i64 = 400;

/// A decoded literal: `mantissa * 10^exponent`, before binary conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decimal {
    mantissa: u64,
    exponent: i32,
}

/// Accumulator width, expressed as the mask of usable mantissa bits.
#[derive(Debug, Clone, Copy)]
struct Width {
    mask: u64,
}

impl Width {
    const NARROW: Self = Self {
        mask: u32::MAX as u64,
    };
    const WIDE: Self = Self { mask: u64::MAX };

    /// Highest usable bit.
    #[inline]
    fn top_bit(self) -> u64 {
        (self.mask >> 1) + 1
    }

    /// Top three usable bits; a mantissa with any of them set could overflow
    /// when multiplied by five.
    #[inline]
    fn high_bits(self) -> u64 {
        let top = self.top_bit();
        top | (top >> 1) | (top >> 2)
    }

    #[inline]
    fn push_digit(self, value: u64, digit: u8) -> u64 {
        value
            .wrapping_mul(10)
            .wrapping_add(u64::from(digit - b'0'))
            & self.mask
    }
}

/// Read the digit/point/exponent grammar into a [`Decimal`].
fn scan_decimal(text: &[u8], width: Width) -> Decimal {
    let mut cursor = 0;
    let mut mantissa = 0u64;
    let mut exponent = 0i64;

    while let Some(&c) = text.get(cursor).filter(|c| c.is_ascii_digit()) {
        mantissa = width.push_digit(mantissa, c);
        cursor += 1;
    }

    if text.get(cursor) == Some(&b'.') {
        cursor += 1;
        while let Some(&c) = text.get(cursor).filter(|c| c.is_ascii_digit()) {
            mantissa = width.push_digit(mantissa, c);
            exponent -= 1;
            cursor += 1;
        }
    }

    if matches!(text.get(cursor), Some(b'e' | b'E')) {
        cursor += 1;
        let negative = match text.get(cursor) {
            Some(b'-') => {
                cursor += 1;
                true
            }
            Some(b'+') => {
                cursor += 1;
                false
            }
            _ => false,
        };

        let mut value = 0u32;
        while let Some(&c) = text.get(cursor).filter(|c| c.is_ascii_digit()) {
            value = value.saturating_mul(10).saturating_add(u32::from(c - b'0'));
            cursor += 1;
        }

        let value = i64::from(value);
        exponent += if negative { -value } else { value };
    }

    Decimal {
        mantissa,
        exponent: exponent.clamp(-EXPONENT_LIMIT, EXPONENT_LIMIT) as i32,
    }
}

/// Rewrite `mantissa * 10^exponent_10` as `mantissa_2 * 2^exponent_2`.
///
/// Requires a non-zero mantissa.
fn to_binary(decimal: Decimal, width: Width) -> (u64, i32) {
    let Decimal {
        mut mantissa,
        exponent: mut exponent_10,
    } = decimal;

    // 10^e == 5^e * 2^e: start the binary exponent at e and fold 5^e in.
    let mut exponent_2 = exponent_10;

    while exponent_10 > 0 {
        while mantissa & width.high_bits() != 0 {
            mantissa >>= 1;
            exponent_2 += 1;
        }
        mantissa *= 5;
        exponent_10 -= 1;
    }

    while exponent_10 < 0 {
        while mantissa & width.top_bit() == 0 {
            mantissa <<= 1;
            exponent_2 -= 1;
        }
        mantissa /= 5;
        exponent_10 += 1;
    }

    (mantissa, exponent_2)
}

/// `2^exponent` for exponents within the normal `f64` range.
#[inline]
fn power_of_two(exponent: i32) -> f64 {
    let biased = (exponent + 1023).clamp(1, 2046) as u64;
    f64::from_bits(biased << 52)
}

/// `value * 2^exponent` without intermediate overflow or underflow.
///
/// The scale is applied in two halves of equal sign so that only the final
/// product can round.
fn scale_by_power_of_two(value: f64, exponent: i32) -> f64 {
    let exponent = exponent.clamp(-2044, 2046);
    let half = exponent / 2;
    value * power_of_two(half) * power_of_two(exponent - half)
}

fn convert(text: &[u8], width: Width) -> f64 {
    let decimal = scan_decimal(text, width);
    if decimal.mantissa == 0 {
        return 0.0;
    }
    if decimal.exponent == 0 {
        return decimal.mantissa as f64;
    }

    let (mantissa, exponent_2) = to_binary(decimal, width);
    scale_by_power_of_two(mantissa as f64, exponent_2)
}

/// Convert an unsigned decimal literal to the nearest `f32`, using a 32-bit
/// mantissa accumulator.
///
/// Parsing stops at the first byte that does not fit the
/// `digits [. digits] [(e|E) [+|-] digits]` grammar.
///
/// ```
/// use wfobj_core::decimal::parse_decimal_f32;
///
/// assert_eq!(parse_decimal_f32(b"0.5"), 0.5);
/// assert_eq!(parse_decimal_f32(b"1e3"), 1000.0);
/// ```
pub fn parse_decimal_f32(text: &[u8]) -> f32 {
    // Every narrow intermediate is exact in f64, so this is the only rounding.
    convert(text, Width::NARROW) as f32
}

/// Convert an unsigned decimal literal to `f64`, using a 64-bit mantissa
/// accumulator.
///
/// Holds about nineteen significant digits before wrapping.
pub fn parse_decimal_f64(text: &[u8]) -> f64 {
    convert(text, Width::WIDE)
}

/// Parse the leading decimal digits of `text` as a `u32`.
///
/// Returns the value and whether it overflowed; an overflowing literal
/// saturates at `u32::MAX`.
///
/// ```
/// use wfobj_core::decimal::parse_decimal_u32;
///
/// assert_eq!(parse_decimal_u32(b"42/7"), (42, false));
/// assert_eq!(parse_decimal_u32(b"99999999999"), (u32::MAX, true));
/// ```
pub fn parse_decimal_u32(text: &[u8]) -> (u32, bool) {
    let mut value = 0u32;
    let mut overflowed = false;

    for &c in text.iter().take_while(|c| c.is_ascii_digit()) {
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(c - b'0')))
        {
            Some(next) => value = next,
            None => {
                overflowed = true;
                value = u32::MAX;
                break;
            }
        }
    }

    (value, overflowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_small_values() {
        assert_eq!(parse_decimal_f32(b"0.5"), 0.5);
        assert_eq!(parse_decimal_f32(b"2"), 2.0);
        assert_eq!(parse_decimal_f32(b"0.25"), 0.25);
        assert_eq!(parse_decimal_f32(b"1e3"), 1000.0);
    }

    #[test]
    fn test_zero_literals() {
        assert_eq!(parse_decimal_f32(b"0"), 0.0);
        assert_eq!(parse_decimal_f32(b"0.000"), 0.0);
        assert_eq!(parse_decimal_f32(b"0e10"), 0.0);
        assert_eq!(parse_decimal_f64(b"000.0"), 0.0);
    }

    #[test]
    fn test_exponent_forms() {
        assert_eq!(parse_decimal_f32(b"1E3"), 1000.0);
        assert_eq!(parse_decimal_f32(b"1e+3"), 1000.0);
        assert_eq!(parse_decimal_f32(b"25e-2"), 0.25);
        assert_eq!(parse_decimal_f32(b"0.125e1"), 1.25);
    }

    #[test]
    fn test_stops_at_foreign_byte() {
        assert_eq!(parse_decimal_f32(b"1.5/2"), 1.5);
        assert_eq!(parse_decimal_f32(b"3 4"), 3.0);
    }

    #[test]
    fn test_close_to_std_for_typical_coordinates() {
        for text in ["0.1", "1.000001", "123.456", "0.707107", "3.14159", "9.5e-4"] {
            let expected: f32 = text.parse().unwrap();
            let actual = parse_decimal_f32(text.as_bytes());
            let tolerance = expected.abs() * 4.0 * f32::EPSILON;
            assert!(
                (actual - expected).abs() <= tolerance,
                "{text}: {actual} vs {expected}"
            );
        }
    }

    #[test]
    fn test_wide_accumulator_keeps_long_literals() {
        let text = "0.12345678901234567";
        let expected: f64 = text.parse().unwrap();
        let actual = parse_decimal_f64(text.as_bytes());
        assert!((actual - expected).abs() <= expected * 8.0 * f64::EPSILON);
    }

    #[test]
    fn test_narrow_accumulator_wraps_silently() {
        // 2^32 + 1 wraps to 1 in a 32-bit accumulator.
        assert_eq!(parse_decimal_f32(b"4294967297"), 1.0);
        assert_eq!(parse_decimal_f64(b"4294967297"), 4_294_967_297.0);
    }

    #[test]
    fn test_extreme_exponents_saturate() {
        assert_eq!(parse_decimal_f32(b"1e99999999999"), f32::INFINITY);
        assert_eq!(parse_decimal_f32(b"1e-99999999999"), 0.0);
        assert_eq!(parse_decimal_f64(b"1e400"), f64::INFINITY);
        assert_eq!(parse_decimal_f64(b"1e-400"), 0.0);
    }

    #[test]
    fn test_subnormal_f32() {
        let value = parse_decimal_f32(b"1e-40");
        assert!(value > 0.0 && !value.is_normal());
    }

    #[test]
    fn test_to_binary_transfers_factors() {
        let (mantissa, exponent) = to_binary(
            Decimal {
                mantissa: 1,
                exponent: 3,
            },
            Width::NARROW,
        );
        assert_eq!((mantissa, exponent), (125, 3));
    }

    #[test]
    fn test_parse_u32() {
        assert_eq!(parse_decimal_u32(b"0"), (0, false));
        assert_eq!(parse_decimal_u32(b"4294967295"), (u32::MAX, false));
        assert_eq!(parse_decimal_u32(b"4294967296"), (u32::MAX, true));
        assert_eq!(parse_decimal_u32(b""), (0, false));
    }
}
